//! Greedy packing of byte ranges into `Range` header values.

/// One packed `Range` header value: the number of ranges it covers and the
/// raw `ofs1-end1,ofs2-end2,…` string (no `bytes=` prefix — the caller of
/// [`RangeHeaderBuilder::pack`] prepends that).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedHeader {
    pub count: usize,
    pub value: String,
}

/// Packs `(begin, end)` inclusive byte ranges into as few header values as
/// possible, each bounded by a byte budget.
#[derive(Debug, Clone, Copy)]
pub struct RangeHeaderBuilder {
    budget: usize,
}

impl RangeHeaderBuilder {
    /// Empirical default used by most servers/intermediaries: a single
    /// header line capped around 4 KiB, with room to spare in the 8 KiB
    /// header-block cap.
    pub const DEFAULT_BUDGET: usize = crate::config::VectorReadConfig::DEFAULT_HEADER_BUDGET;

    pub fn new(budget: usize) -> Self {
        Self { budget }
    }

    /// Converts a single `(offset, size)` request into the inclusive
    /// `(begin, end)` pair the wire format uses. A zero-size range encodes
    /// as `offset-offset`, since HTTP has no way to express an empty range.
    pub fn to_inclusive(offset: u64, size: u64) -> (u64, u64) {
        if size == 0 {
            (offset, offset)
        } else {
            (offset, offset + size - 1)
        }
    }

    /// Greedily packs an ordered sequence of inclusive ranges into header
    /// values no longer than `self.budget`, except that a single range
    /// exceeding the budget on its own is emitted alone (the server may
    /// still accept it; if not, the orchestrator falls back).
    pub fn pack<I: IntoIterator<Item = (u64, u64)>>(&self, ranges: I) -> Vec<PackedHeader> {
        let mut out = Vec::new();
        let mut current = String::new();
        let mut current_count = 0usize;

        for (begin, end) in ranges {
            let piece = format!("{begin}-{end}");
            let extra_len = if current.is_empty() {
                piece.len()
            } else {
                piece.len() + 1 // leading comma
            };

            if !current.is_empty() && current.len() + extra_len > self.budget {
                out.push(PackedHeader {
                    count: current_count,
                    value: std::mem::take(&mut current),
                });
                current_count = 0;
            }

            if !current.is_empty() {
                current.push(',');
            }
            current.push_str(&piece);
            current_count += 1;
        }

        if current_count > 0 {
            out.push(PackedHeader {
                count: current_count,
                value: current,
            });
        }

        out
    }
}

impl Default for RangeHeaderBuilder {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BUDGET)
    }
}
