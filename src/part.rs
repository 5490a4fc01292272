//! Per-part header state machine for one multipart/byteranges part.
//!
//! An explicit loop over an explicit state enum, rather than recursive
//! descent: each state transition is a single decision, easy to bound with
//! a line cap and easy to test in isolation.

use crate::error::{InvalidServerResponse, Result, VectorReadError};
use crate::io::HttpRequest;

/// Parser state for one multipart part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChunkInfo {
    pub bounded: bool,
    pub offset: u64,
    pub size: u64,
}

/// What [`PartHeaderParser::parse_part`] produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartOutcome {
    /// A fully-parsed part header, headers blank-line-terminated.
    Part(ChunkInfo),
    /// The closing boundary (`--<boundary>--`) was seen; no more parts.
    EndOfBody,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Init,
    WantRange,
    WantBlank,
}

/// Drives [`crate::io::HttpRequest::read_line`] through the part-header
/// state machine, honoring the ~100-line-per-part cap.
pub struct PartHeaderParser {
    opening: Vec<u8>,
    closing: Vec<u8>,
    line_cap: usize,
}

impl PartHeaderParser {
    pub const DEFAULT_LINE_CAP: usize = 100;

    pub fn new(boundary: &str) -> Self {
        Self {
            opening: format!("--{boundary}").into_bytes(),
            closing: format!("--{boundary}--").into_bytes(),
            line_cap: Self::DEFAULT_LINE_CAP,
        }
    }

    /// Reads and interprets header lines for one part, using `line_buf` as
    /// scratch space for each line (recommended ≥ 4 KiB).
    pub fn parse_part(
        &self,
        request: &mut dyn HttpRequest,
        line_buf: &mut [u8],
    ) -> Result<PartOutcome> {
        let mut state = State::Init;
        let mut chunk = ChunkInfo::default();
        let mut lines_read = 0usize;

        loop {
            if lines_read >= self.line_cap {
                return Err(VectorReadError::InvalidServerResponse(
                    InvalidServerResponse::PartHeaderTooLong(self.line_cap),
                ));
            }
            let n = request.read_line(line_buf)?;
            lines_read += 1;
            let line = trim_crlf(&line_buf[..n]);

            tracing::trace!(?state, line_len = line.len(), "multipart part header line");

            match state {
                State::Init => {
                    if line.is_empty() {
                        continue;
                    }
                    if line == self.closing.as_slice() {
                        return Ok(PartOutcome::EndOfBody);
                    } else if line == self.opening.as_slice() {
                        chunk.bounded = true;
                        state = State::WantRange;
                    } else {
                        return Err(VectorReadError::InvalidServerResponse(
                            InvalidServerResponse::UnexpectedBoundary,
                        ));
                    }
                }
                State::WantRange => {
                    if line.is_empty() {
                        return Err(VectorReadError::InvalidServerResponse(
                            InvalidServerResponse::MalformedPartHeader(
                                "blank line before Content-Range",
                            ),
                        ));
                    }
                    if let Some(value) = header_value(line, "content-range") {
                        let (offset, size) = parse_content_range_value(value)?;
                        chunk.offset = offset;
                        chunk.size = size;
                        state = State::WantBlank;
                    }
                    // Otherwise: some other header line, ignored; stay in WantRange.
                }
                State::WantBlank => {
                    if line.is_empty() {
                        return Ok(PartOutcome::Part(chunk));
                    }
                    return Err(VectorReadError::InvalidServerResponse(
                        InvalidServerResponse::MissingBlankLine,
                    ));
                }
            }
        }
    }
}

fn trim_crlf(line: &[u8]) -> &[u8] {
    let mut end = line.len();
    while end > 0 && (line[end - 1] == b'\n' || line[end - 1] == b'\r') {
        end -= 1;
    }
    &line[..end]
}

/// If `line` is a `name: value` header whose name case-insensitively
/// matches `name`, returns the trimmed value.
fn header_value<'a>(line: &'a [u8], name: &str) -> Option<&'a str> {
    let line_str = std::str::from_utf8(line).ok()?;
    let (key, value) = line_str.split_once(':')?;
    if key.trim().eq_ignore_ascii_case(name) {
        Some(value.trim())
    } else {
        None
    }
}

/// Parses a `Content-Range` value by splitting on the delimiter byte set
/// `" bytes-/\t"` and taking the first two decimal tokens as
/// `(start, end)`, returning `(offset, size)`.
fn parse_content_range_value(value: &str) -> Result<(u64, u64)> {
    let mut tokens = value
        .split(|c: char| " bytes-/\t".contains(c))
        .filter(|s| !s.is_empty());

    let start_tok = tokens.next().ok_or(VectorReadError::InvalidServerResponse(
        InvalidServerResponse::MalformedPartHeader("Content-Range missing start"),
    ))?;
    let end_tok = tokens.next().ok_or(VectorReadError::InvalidServerResponse(
        InvalidServerResponse::MalformedPartHeader("Content-Range missing end"),
    ))?;

    let start: u64 = start_tok.parse().map_err(|_| {
        VectorReadError::InvalidServerResponse(InvalidServerResponse::MalformedPartHeader(
            "Content-Range start is not a non-negative integer",
        ))
    })?;
    let end: u64 = end_tok.parse().map_err(|_| {
        VectorReadError::InvalidServerResponse(InvalidServerResponse::MalformedPartHeader(
            "Content-Range end is not a non-negative integer",
        ))
    })?;

    if end < start {
        return Err(VectorReadError::InvalidServerResponse(
            InvalidServerResponse::MalformedPartHeader("Content-Range end precedes start"),
        ));
    }

    let size = end
        .checked_sub(start)
        .and_then(|d| d.checked_add(1))
        .ok_or(VectorReadError::InvalidServerResponse(
            InvalidServerResponse::MalformedPartHeader("Content-Range overflowed u64"),
        ))?;

    Ok((start, size))
}
