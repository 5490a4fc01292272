//! Capability traits consumed from the external HTTP collaborator.
//!
//! The orchestrator and parsers in this crate are generic over these two
//! traits; concrete bindings live under [`crate::impls`]. Establishing
//! TCP/TLS, request framing, redirects, and authentication are all the
//! responsibility of whatever implements [`HttpRequest`] — out of scope
//! here entirely.

use crate::error::Result;

/// One HTTP request/response exchange, driven incrementally.
///
/// Implementations own a single underlying connection for the lifetime of
/// the object; [`HttpRequest::end_request`] must be called (directly or via
/// `Drop`) on every exit path so the connection can be released or reused.
pub trait HttpRequest {
    /// Adds a request header field. Must be called before
    /// [`HttpRequest::begin_request`].
    fn add_header_field(&mut self, name: &str, value: &str);

    /// Sends the request and makes the status code and response headers
    /// available.
    fn begin_request(&mut self) -> Result<()>;

    /// The response's HTTP status code. Only valid after `begin_request`.
    fn request_code(&self) -> u16;

    /// `Content-Length`, if the server sent one.
    fn answer_size(&self) -> Option<u64>;

    /// An arbitrary response header, by case-insensitive name.
    fn answer_header(&self, name: &str) -> Option<String>;

    /// Reads one line (including the trailing `\n`, and `\r\n` if present)
    /// into `buf`, returning the number of bytes read, or `Ok(0)` at
    /// end-of-body.
    fn read_line(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Reads exactly `buf.len()` bytes, or fails.
    fn read_segment(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Reads up to `buf.len()` bytes, returning `0` at end-of-body.
    fn read_block(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Drains and releases the request. Idempotent.
    fn end_request(&mut self);
}

/// Context threading the target resource's identity and the single-range
/// fallback through the orchestrator.
pub trait IoChainContext {
    /// The request URI, fragment and all.
    fn uri(&self) -> &str;

    /// A fragment query parameter, e.g. `multirange` in
    /// `#multirange=false`.
    fn fragment_param(&self, key: &str) -> Option<String>;

    /// Single-range fallback: reads up to `buf.len()` bytes starting at
    /// `offset`, returning the number of bytes actually read.
    fn pread(&mut self, buf: &mut [u8], offset: u64) -> Result<usize>;

    /// Opens a fresh request against the same resource, for the
    /// orchestrator to attach a `Range` header to and send.
    fn open_request(&mut self) -> Box<dyn HttpRequest + '_>;
}

/// RAII guard ensuring [`HttpRequest::end_request`] runs on every exit path
/// from a multirange attempt, including early returns on parse failure.
pub(crate) struct RequestGuard<'a> {
    request: Box<dyn HttpRequest + 'a>,
}

impl<'a> RequestGuard<'a> {
    pub(crate) fn new(request: Box<dyn HttpRequest + 'a>) -> Self {
        Self { request }
    }

    pub(crate) fn get_mut(&mut self) -> &mut (dyn HttpRequest + 'a) {
        &mut *self.request
    }
}

impl Drop for RequestGuard<'_> {
    fn drop(&mut self) {
        self.request.end_request();
    }
}
