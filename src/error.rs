use thiserror::Error;

use crate::variant_from_data;

/// Top-level failure mode of a [`crate::orchestrator::pread_vec`] call.
#[derive(Debug, Error)]
pub enum VectorReadError {
    /// The server's response could not be trusted as a multirange answer.
    #[error(transparent)]
    InvalidServerResponse(#[from] InvalidServerResponse),

    /// The server answered with a status outside `{200, 206}`.
    #[error("unexpected HTTP status {0}")]
    HttpCodeError(u16),

    /// Propagated unchanged from the [`crate::io::HttpRequest`]/
    /// [`crate::io::IoChainContext`] collaborator (connection reset, TLS
    /// failure, short read, etc).
    #[error("transport error: {0}")]
    Transport(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// A response that violated the multipart/byteranges contract in some way.
///
/// Covers every way a multipart/byteranges answer can fail to line up with
/// what was requested.
#[derive(Debug, Error)]
pub enum InvalidServerResponse {
    #[error("Content-Type had no parseable multipart boundary")]
    MissingBoundary,

    #[error("multipart boundary token is not 1-70 ASCII bytes")]
    BoundaryTooLong,

    #[error("part header exceeded {0} lines without a blank line")]
    PartHeaderTooLong(usize),

    #[error("part opened with an unrecognized boundary line")]
    UnexpectedBoundary,

    #[error("malformed part header: {0}")]
    MalformedPartHeader(&'static str),

    #[error("no blank line followed Content-Range")]
    MissingBlankLine,

    #[error("part range {found_offset}-{found_size} does not match the expected range {expected_offset}-{expected_size}")]
    RangeMismatch {
        expected_offset: u64,
        expected_size: u64,
        found_offset: u64,
        found_size: u64,
    },
}

pub type Result<T> = std::result::Result<T, VectorReadError>;

variant_from_data!(VectorReadError, HttpCodeError, u16);
