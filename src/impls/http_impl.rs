//! A thin [`IoChainContext`] adapter for callers who bring their own
//! synchronous transport rather than `reqwest`, reusing the `http` crate's
//! `Uri`/`HeaderMap` types for the request-side bookkeeping.
//!
//! `http::Uri` is a request-target and, per RFC 7230, carries no fragment —
//! so unlike [`crate::impls::reqwest::ReqwestContext`], which can derive
//! fragment params straight from a `url::Url`, here the caller supplies
//! both the original URI string (fragment and all, for
//! [`IoChainContext::uri`]) and the parsed fragment params directly.

use std::collections::HashMap;

pub use http;

use crate::error::Result;
use crate::io::{HttpRequest, IoChainContext};

/// [`IoChainContext`] built from caller-supplied transport callbacks, typed
/// request parameters via [`http::HeaderMap`].
pub struct HttpIoChainContext<'f> {
    uri: String,
    request_parameters: http::HeaderMap,
    fragment_params: HashMap<String, String>,
    pread: Box<dyn FnMut(&mut [u8], u64) -> Result<usize> + 'f>,
    open_request: Box<dyn FnMut() -> Box<dyn HttpRequest + 'f> + 'f>,
}

impl<'f> HttpIoChainContext<'f> {
    pub fn new(
        uri: impl Into<String>,
        request_parameters: http::HeaderMap,
        fragment_params: HashMap<String, String>,
        pread: impl FnMut(&mut [u8], u64) -> Result<usize> + 'f,
        open_request: impl FnMut() -> Box<dyn HttpRequest + 'f> + 'f,
    ) -> Self {
        Self {
            uri: uri.into(),
            request_parameters,
            fragment_params,
            pread: Box::new(pread),
            open_request: Box::new(open_request),
        }
    }

    /// The typed request parameters passed at construction.
    pub fn request_parameters(&self) -> &http::HeaderMap {
        &self.request_parameters
    }
}

impl<'f> IoChainContext for HttpIoChainContext<'f> {
    fn uri(&self) -> &str {
        &self.uri
    }

    fn fragment_param(&self, key: &str) -> Option<String> {
        self.fragment_params.get(key).cloned()
    }

    fn pread(&mut self, buf: &mut [u8], offset: u64) -> Result<usize> {
        (self.pread)(buf, offset)
    }

    fn open_request(&mut self) -> Box<dyn HttpRequest + '_> {
        (self.open_request)()
    }
}
