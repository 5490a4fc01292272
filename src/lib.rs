//! Vectored HTTP range reads over `Range`/`Content-Range`.
//!
//! 1. Hand [`orchestrator::pread_vec`] a list of `(offset, size, buffer)`
//!    requests and something implementing [`io::IoChainContext`].
//! 2. It packs the requests into as few `Range` headers as fit the
//!    configured budget ([`header::RangeHeaderBuilder`]), issues the
//!    request, and routes the answer: a `multipart/byteranges` response is
//!    walked part-by-part ([`router::route_parts`]); a plain `200 OK` is
//!    streamed once and scattered into the matching buffers
//!    ([`scatter::scatter`]); anything else falls back to one GET per
//!    range.
//! 3. [`orchestrator::PreadVecOutcome`] hands every buffer back along with
//!    how it was ultimately served.
//!
//! Establishing the connection, TLS, redirects, and authentication are the
//! responsibility of whatever implements [`io::HttpRequest`] and
//! [`io::IoChainContext`] — see [`impls`] for ready-made bindings.

pub mod boundary;
pub mod config;
pub mod error;
pub mod header;
pub mod io;
pub mod orchestrator;
pub mod part;
pub mod router;
pub mod scatter;
mod slot;

mod impls;
pub use impls::*;

pub use config::VectorReadConfig;
pub use error::{InvalidServerResponse, VectorReadError};
pub use io::{HttpRequest, IoChainContext};
pub use orchestrator::{pread_vec, MultirangeOutcome, PreadVecOutcome, RangeRequest, RangeResult};

/// variant_from_data!(EnumType, VariantName, DataType)
///
/// adds `From<D>` for an enum with a variant containing D
#[macro_export]
macro_rules! variant_from_data {
    ($enum:ty, $variant:ident, $data_type:ty) => {
        impl std::convert::From<$data_type> for $enum {
            fn from(c: $data_type) -> Self {
                <$enum>::$variant(c)
            }
        }
    };
}
