//! Top-level dispatch: `pread_vec` decides between a simulated multirange
//! (N single-range GETs), an attempted multirange GET dispatched to the
//! multipart router or the full-body scatterer, and falls back to
//! single-range reads when the server doesn't cooperate.

use crate::boundary::extract_boundary;
use crate::config::VectorReadConfig;
use crate::error::{InvalidServerResponse, Result, VectorReadError};
use crate::header::RangeHeaderBuilder;
use crate::io::{HttpRequest, IoChainContext, RequestGuard};
use crate::router::{route_parts, RouterOutcome};
use crate::scatter::{scatter, should_abandon_for_size};
use crate::slot::RangeSlot;

/// One requested byte range: an offset, a length, and the caller's
/// writable destination.
pub struct RangeRequest<'a> {
    pub offset: u64,
    pub size: u64,
    pub buffer: &'a mut [u8],
}

/// The outcome paired 1:1 by index with a [`RangeRequest`]. `buffer` is
/// literally the same slice as the corresponding request's `buffer`
/// (Invariant R1) — it is moved through the call, never copied or
/// re-borrowed, so the identity holds by construction.
pub struct RangeResult<'a> {
    pub buffer: &'a mut [u8],
    pub size: u64,
}

/// How the vector read was ultimately satisfied.
///
/// There's deliberately no `Error` variant here: a failed call returns
/// `Err(VectorReadError)` from [`pread_vec`] instead, since idiomatic Rust
/// error propagation already carries that state — a variant every success
/// path would have to explicitly exclude would just be a parallel,
/// unenforced error channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultirangeOutcome {
    /// Served via multirange response(s) (or so few ranges multirange was
    /// never attempted).
    Success,
    /// The server answered 200 OK; a full-body scatter produced every
    /// requested range's bytes.
    SuccessButWholeFile,
    /// The server didn't support multirange (or the scatter path was
    /// guarded off); served via N single-range reads instead.
    NoMultirangeSupported,
}

/// The full result of one `pread_vec` call.
pub struct PreadVecOutcome<'a> {
    pub results: Vec<RangeResult<'a>>,
    pub total_bytes: u64,
    pub outcome: MultirangeOutcome,
}

enum MultirangeAttempt {
    Done { total_bytes: u64, whole_file: bool },
    Fallback,
}

/// Vectored read entry point: satisfies every `RangeRequest` in `inputs`
/// with as few round trips as the server allows.
pub fn pread_vec<'a>(
    ctx: &mut dyn IoChainContext,
    inputs: Vec<RangeRequest<'a>>,
    config: &VectorReadConfig,
) -> Result<PreadVecOutcome<'a>> {
    let mut slots: Vec<RangeSlot<'a>> = inputs
        .into_iter()
        .map(|r| RangeSlot::new(r.offset, r.size, r.buffer))
        .collect();

    if slots.is_empty() {
        return Ok(PreadVecOutcome {
            results: Vec::new(),
            total_bytes: 0,
            outcome: MultirangeOutcome::Success,
        });
    }

    let multirange_disabled = ctx.fragment_param("multirange").as_deref() == Some("false");

    if slots.len() == 1 || multirange_disabled {
        tracing::debug!(
            n = slots.len(),
            multirange_disabled,
            "dispatching N single-range preads"
        );
        let total_bytes = pread_all_single(ctx, &mut slots)?;
        return Ok(finish(slots, total_bytes, MultirangeOutcome::Success));
    }

    match try_multirange(ctx, &mut slots, config) {
        Ok(MultirangeAttempt::Done { total_bytes, whole_file: false }) => {
            Ok(finish(slots, total_bytes, MultirangeOutcome::Success))
        }
        Ok(MultirangeAttempt::Done { total_bytes, whole_file: true }) => {
            Ok(finish(slots, total_bytes, MultirangeOutcome::SuccessButWholeFile))
        }
        Ok(MultirangeAttempt::Fallback) => {
            tracing::debug!("multirange unsupported; falling back to single-range preads");
            let total_bytes = pread_all_single(ctx, &mut slots)?;
            Ok(finish(slots, total_bytes, MultirangeOutcome::NoMultirangeSupported))
        }
        Err(err) => Err(err),
    }
}

fn finish(slots: Vec<RangeSlot<'_>>, total_bytes: u64, outcome: MultirangeOutcome) -> PreadVecOutcome<'_> {
    let results = slots
        .into_iter()
        .map(|s| RangeResult {
            buffer: s.buffer,
            size: s.written,
        })
        .collect();
    PreadVecOutcome {
        results,
        total_bytes,
        outcome,
    }
}

fn pread_all_single(ctx: &mut dyn IoChainContext, slots: &mut [RangeSlot<'_>]) -> Result<u64> {
    let mut total = 0u64;
    for slot in slots.iter_mut() {
        let n = ctx.pread(&mut slot.buffer[..slot.size as usize], slot.offset)?;
        slot.written = n as u64;
        total += n as u64;
    }
    Ok(total)
}

fn try_multirange(
    ctx: &mut dyn IoChainContext,
    slots: &mut [RangeSlot<'_>],
    config: &VectorReadConfig,
) -> Result<MultirangeAttempt> {
    let requested_total_bytes: u64 = slots.iter().map(|s| s.size).sum();

    let pairs: Vec<(u64, u64)> = slots
        .iter()
        .map(|s| RangeHeaderBuilder::to_inclusive(s.offset, s.size))
        .collect();
    let builder = RangeHeaderBuilder::new(config.byte_range_header_budget);
    let headers = builder.pack(pairs);

    let mut cursor = 0usize;
    let mut total_bytes = 0u64;

    for header in &headers {
        if header.count == 1 {
            let slot = &mut slots[cursor];
            let n = ctx.pread(&mut slot.buffer[..slot.size as usize], slot.offset)?;
            slot.written = n as u64;
            total_bytes += n as u64;
            cursor += 1;
            continue;
        }

        let mut guard = RequestGuard::new(ctx.open_request());
        let request = guard.get_mut();
        request.add_header_field("Range", &format!("bytes={}", header.value));
        request.begin_request()?;
        let status = request.request_code();

        match status {
            206 => {
                let boundary = extract_boundary_from(request)?;
                let group = &mut slots[cursor..cursor + header.count];
                match route_parts(request, &boundary, group, config)? {
                    RouterOutcome::Complete { total_bytes: part_bytes } => {
                        total_bytes += part_bytes;
                    }
                    RouterOutcome::NoMultirangeSupported => {
                        return Ok(MultirangeAttempt::Fallback);
                    }
                }
                cursor += header.count;
            }
            200 => {
                let content_length = request.answer_size();
                if should_abandon_for_size(content_length, requested_total_bytes, config) {
                    tracing::debug!(
                        ?content_length,
                        requested_total_bytes,
                        "size guard fired; abandoning full-body scatter"
                    );
                    return Ok(MultirangeAttempt::Fallback);
                }
                // The body already covers every original input, not just
                // this header's group.
                let total = scatter(request, slots, config.scatter_block_size)?;
                return Ok(MultirangeAttempt::Done {
                    total_bytes: total,
                    whole_file: true,
                });
            }
            other => return Err(VectorReadError::HttpCodeError(other)),
        }
    }

    Ok(MultirangeAttempt::Done {
        total_bytes,
        whole_file: false,
    })
}

fn extract_boundary_from(request: &mut dyn crate::io::HttpRequest) -> Result<String> {
    let content_type = request
        .answer_header("Content-Type")
        .ok_or(VectorReadError::InvalidServerResponse(InvalidServerResponse::MissingBoundary))?;
    extract_boundary(&content_type).map_err(VectorReadError::InvalidServerResponse)
}
