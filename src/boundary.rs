//! Extraction of the MIME boundary token from a `Content-Type` header.

use crate::error::InvalidServerResponse;

/// Locates `boundary=` in a `Content-Type` header value and returns the
/// boundary token, terminated by `"`, `;`, or end-of-string, validated to
/// be 1-70 ASCII bytes per RFC 2046 §5.1.1.
pub fn extract_boundary(content_type: &str) -> Result<String, InvalidServerResponse> {
    let idx = content_type
        .find("boundary=")
        .ok_or(InvalidServerResponse::MissingBoundary)?;
    let rest = &content_type[idx + "boundary=".len()..];
    let rest = rest.trim_start_matches('"');

    let end = rest
        .find(|c: char| c == '"' || c == ';')
        .unwrap_or(rest.len());
    let token = &rest[..end];

    if token.is_empty() || token.len() > 70 || !token.is_ascii() {
        return Err(InvalidServerResponse::BoundaryTooLong);
    }

    Ok(token.to_string())
}
