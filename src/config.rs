/// Tunables for a [`crate::orchestrator::pread_vec`] call.
///
/// None of these are read from the environment or a config file: this is a
/// library with no persisted state of its own. Construct one with
/// [`VectorReadConfig::default`] and override the fields you care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorReadConfig {
    /// Maximum length, in bytes, of a single `Range` header value produced
    /// by [`crate::header::RangeHeaderBuilder`]. Defaults to 3900: many
    /// servers/intermediaries cap a header line at 4 KiB and the whole
    /// header block at 8 KiB.
    pub byte_range_header_budget: usize,

    /// Whether [`crate::router::route_parts`] unconditionally drains one
    /// sentinel byte for a zero-size range, even though a conforming server
    /// need not emit one. Some object stores emit the byte anyway; default
    /// `true` tolerates that without breaking the ones that don't.
    pub drain_zero_size_sentinel: bool,

    /// Block size used by [`crate::scatter::scatter`] while streaming a
    /// 200 OK body.
    pub scatter_block_size: usize,

    /// Absolute Content-Length (bytes) above which the full-body scatter
    /// path is abandoned in favor of N single-range GETs, provided the
    /// relative threshold is also exceeded.
    pub size_guard_absolute_bytes: u64,

    /// Multiple of total requested bytes above which the full-body scatter
    /// path is abandoned, provided the absolute threshold is also
    /// exceeded.
    pub size_guard_relative_multiple: u64,
}

impl VectorReadConfig {
    pub const DEFAULT_HEADER_BUDGET: usize = 3900;
    pub const DEFAULT_SCATTER_BLOCK_SIZE: usize = 32 * 1024;
    pub const DEFAULT_SIZE_GUARD_ABSOLUTE_BYTES: u64 = 1024 * 1024;
    pub const DEFAULT_SIZE_GUARD_RELATIVE_MULTIPLE: u64 = 2;
}

impl Default for VectorReadConfig {
    fn default() -> Self {
        Self {
            byte_range_header_budget: Self::DEFAULT_HEADER_BUDGET,
            drain_zero_size_sentinel: true,
            scatter_block_size: Self::DEFAULT_SCATTER_BLOCK_SIZE,
            size_guard_absolute_bytes: Self::DEFAULT_SIZE_GUARD_ABSOLUTE_BYTES,
            size_guard_relative_multiple: Self::DEFAULT_SIZE_GUARD_RELATIVE_MULTIPLE,
        }
    }
}
