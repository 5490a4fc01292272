//! Multipart body routing: drives [`PartHeaderParser`] across the ranges
//! expected in one multirange response and scatters the body bytes into
//! the caller's buffers.

use bytes::BytesMut;

use crate::config::VectorReadConfig;
use crate::error::{InvalidServerResponse, Result, VectorReadError};
use crate::io::HttpRequest;
use crate::part::{PartHeaderParser, PartOutcome};
use crate::slot::RangeSlot;

/// Result of routing one 206 multipart response against its expected
/// ranges.
#[derive(Debug)]
pub enum RouterOutcome {
    /// All parts were consumed (or the stream ended early); `total_bytes`
    /// is the sum written across `slots`.
    Complete { total_bytes: u64 },
    /// The very first part could not be parsed as multipart framing — some
    /// object stores answer 206 with the first range's raw bytes and no
    /// MIME framing at all. Not a user-visible error: the orchestrator
    /// retries via simulated multirange.
    NoMultirangeSupported,
}

const DRAIN_BLOCK_SIZE: usize = 4096;
const LINE_BUF_SIZE: usize = 4096;

/// Drives `request`'s multipart body against `slots`, in order.
pub fn route_parts(
    request: &mut dyn HttpRequest,
    boundary: &str,
    slots: &mut [RangeSlot<'_>],
    config: &VectorReadConfig,
) -> Result<RouterOutcome> {
    let parser = PartHeaderParser::new(boundary);
    let mut line_buf = BytesMut::zeroed(LINE_BUF_SIZE);
    let mut total_bytes = 0u64;

    for (i, slot) in slots.iter_mut().enumerate() {
        let chunk = match parser.parse_part(request, &mut line_buf) {
            Ok(PartOutcome::Part(chunk)) => chunk,
            Ok(PartOutcome::EndOfBody) => {
                tracing::debug!(parts_processed = i, "multipart stream ended before all ranges were served");
                return Ok(RouterOutcome::Complete { total_bytes });
            }
            Err(err) => {
                if i == 0 {
                    tracing::debug!(%err, "first multipart part unparseable; falling back to simulated multirange");
                    return Ok(RouterOutcome::NoMultirangeSupported);
                }
                return Err(err);
            }
        };

        if slot.size != 0 && (chunk.offset, chunk.size) != (slot.offset, slot.size) {
            return Err(VectorReadError::InvalidServerResponse(
                InvalidServerResponse::RangeMismatch {
                    expected_offset: slot.offset,
                    expected_size: slot.size,
                    found_offset: chunk.offset,
                    found_size: chunk.size,
                },
            ));
        }

        if slot.size == 0 {
            if config.drain_zero_size_sentinel {
                let mut sentinel = [0u8; 1];
                request.read_segment(&mut sentinel)?;
            }
            slot.written = 0;
        } else {
            request.read_segment(&mut slot.buffer[..slot.size as usize])?;
            slot.written = slot.size;
            total_bytes += slot.size;
        }
    }

    drain_remaining(request);
    Ok(RouterOutcome::Complete { total_bytes })
}

/// Reads and discards whatever is left of the response body so the
/// underlying connection can be reused.
fn drain_remaining(request: &mut dyn HttpRequest) {
    let mut buf = [0u8; DRAIN_BLOCK_SIZE];
    loop {
        match request.read_block(&mut buf) {
            Ok(0) => break,
            Ok(_) => continue,
            Err(_) => break,
        }
    }
}
