//! Whole-body scatter: when the server ignores `Range` and answers 200 OK,
//! stream the body once and scatter-copy the overlapping regions into the
//! caller's per-range buffers using a sorted interval index walked by two
//! monotonic cursors.

use crate::config::VectorReadConfig;
use crate::error::Result;
use crate::io::HttpRequest;
use crate::slot::RangeSlot;

/// `true` if the full-body path should be abandoned in favor of N
/// single-range GETs: the response is more than
/// [`VectorReadConfig::size_guard_absolute_bytes`] *and* more than
/// [`VectorReadConfig::size_guard_relative_multiple`] times the total
/// requested bytes. Pulling a multi-gigabyte object to satisfy a few
/// kilobytes of requested ranges is a pathological waste.
pub fn should_abandon_for_size(
    content_length: Option<u64>,
    requested_total_bytes: u64,
    config: &VectorReadConfig,
) -> bool {
    match content_length {
        Some(len) => {
            len > config.size_guard_absolute_bytes
                && len > requested_total_bytes.saturating_mul(config.size_guard_relative_multiple)
        }
        None => false,
    }
}

/// Streams `request`'s body once, in `block_size`-sized chunks, scattering
/// bytes into whichever `slots` they overlap. Returns the total bytes
/// written across all slots.
pub fn scatter(
    request: &mut dyn HttpRequest,
    slots: &mut [RangeSlot<'_>],
    block_size: usize,
) -> Result<u64> {
    // Sort indices by offset once; duplicate offsets (overlapping ranges)
    // are fine, order between them doesn't matter.
    let mut order: Vec<usize> = (0..slots.len()).collect();
    order.sort_by_key(|&i| slots[i].offset);

    let mut start = 0usize;
    let mut end = 0usize;
    let mut pos: u64 = 0;
    let mut block = vec![0u8; block_size.max(1)];
    let mut total = 0u64;

    loop {
        let n = request.read_block(&mut block)?;
        if n == 0 {
            break;
        }
        let len = n as u64;

        // Advance start: entries fully past the current window are done.
        while start < order.len() {
            let s = &slots[order[start]];
            if pos > s.offset + s.size {
                start += 1;
            } else {
                break;
            }
        }

        // Advance end: entries that have begun within this window.
        while end < order.len() && pos + len > slots[order[end]].offset {
            end += 1;
        }

        for &idx in &order[start..end] {
            let slot = &mut slots[idx];
            let write_cursor = slot.offset + slot.written;

            let Some(read_offset_in_block) = write_cursor.checked_sub(pos) else {
                continue;
            };
            if read_offset_in_block >= len {
                continue;
            }
            let read_offset_in_block = read_offset_in_block as usize;

            let remaining_in_slot = slot.size - slot.written;
            let remaining_in_block = len as usize - read_offset_in_block;
            let copy_len = remaining_in_slot.min(remaining_in_block as u64) as usize;

            if copy_len > 0 {
                let dst_start = slot.written as usize;
                slot.buffer[dst_start..dst_start + copy_len]
                    .copy_from_slice(&block[read_offset_in_block..read_offset_in_block + copy_len]);
                slot.written += copy_len as u64;
                total += copy_len as u64;
            }
        }

        pos += len;
    }

    tracing::debug!(total_bytes = total, "full-body scatter complete");
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::test::ScriptedRequest;

    fn resource() -> Vec<u8> {
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123".to_vec()
    }

    #[test]
    fn full_body_scatter_matches_multipart() {
        let resource = resource();
        let mut request = ScriptedRequest::new(200, &[], resource.clone());

        let mut buf_a = [0u8; 4];
        let mut buf_b = [0u8; 4];
        let mut buf_c = [0u8; 4];
        let mut slots = vec![
            RangeSlot::new(0, 4, &mut buf_a),
            RangeSlot::new(10, 4, &mut buf_b),
            RangeSlot::new(20, 4, &mut buf_c),
        ];

        let total = scatter(&mut request, &mut slots, 7).unwrap();
        assert_eq!(total, 12);
        assert_eq!(&buf_a, b"ABCD");
        assert_eq!(&buf_b, b"KLMN");
        assert_eq!(&buf_c, b"UVWX");
    }

    #[test]
    fn overlapping_ranges_each_receive_correct_bytes() {
        let resource = resource();
        let mut request = ScriptedRequest::new(200, &[], resource);

        let mut buf_a = [0u8; 10]; // [0, 10)
        let mut buf_b = [0u8; 6]; // [5, 11) overlaps buf_a
        let mut slots = vec![RangeSlot::new(0, 10, &mut buf_a), RangeSlot::new(5, 6, &mut buf_b)];

        let total = scatter(&mut request, &mut slots, 4).unwrap();
        assert_eq!(total, 16);
        assert_eq!(&buf_a, b"ABCDEFGHIJ");
        assert_eq!(&buf_b, b"FGHIJK");
    }

    #[test]
    fn ranges_beyond_resource_get_partial_bytes_no_error() {
        let resource = resource(); // 30 bytes
        let mut request = ScriptedRequest::new(200, &[], resource);

        let mut buf_a = [0u8; 10];
        let mut slots = vec![RangeSlot::new(25, 10, &mut buf_a)]; // wants [25,35), only 5 available

        let total = scatter(&mut request, &mut slots, 8).unwrap();
        assert_eq!(total, 5);
        assert_eq!(&buf_a[..5], b"Z0123");
        assert_eq!(&buf_a[5..], [0u8; 5]);
    }

    #[test]
    fn oversized_buffer_is_not_written_past_size() {
        // buf_a has more capacity than its range's size; scatter must stop
        // writing at slot.size and leave the rest of the buffer untouched.
        let resource = resource();
        let mut request = ScriptedRequest::new(200, &[], resource);

        let mut buf_a = [0u8; 16];
        let mut slots = vec![RangeSlot::new(0, 4, &mut buf_a)];

        let total = scatter(&mut request, &mut slots, 7).unwrap();
        assert_eq!(total, 4);
        assert_eq!(&buf_a[..4], b"ABCD");
        assert_eq!(&buf_a[4..], [0u8; 12]);
    }

    #[test]
    fn size_guard_fires_for_huge_body_small_request() {
        let config = VectorReadConfig::default();
        assert!(should_abandon_for_size(Some(10_000_000), 12, &config));
        assert!(!should_abandon_for_size(Some(10_000_000), 6_000_000, &config));
        assert!(!should_abandon_for_size(Some(500_000), 12, &config));
        assert!(!should_abandon_for_size(None, 12, &config));
    }
}
