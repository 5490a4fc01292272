//! In-memory [`HttpRequest`]/[`IoChainContext`] test double, built from
//! literal byte strings assembled in each test rather than fixture files —
//! this core drives a streaming request rather than a buffered response, so
//! each test script is small enough to read inline.

use std::collections::{HashMap, VecDeque};

use crate::error::{Result, VectorReadError};
use crate::io::{HttpRequest, IoChainContext};

/// A single scripted request/response exchange.
pub(crate) struct ScriptedRequest {
    raw: Vec<u8>,
    cursor: usize,
    status: u16,
    headers: HashMap<String, String>,
    answer_size: Option<u64>,
}

impl ScriptedRequest {
    /// Builds a request whose body is just the concatenation of `lines`,
    /// for driving [`crate::part::PartHeaderParser`] directly.
    pub(crate) fn from_lines(lines: &[&str]) -> Self {
        Self {
            raw: lines.concat().into_bytes(),
            cursor: 0,
            status: 0,
            headers: HashMap::new(),
            answer_size: None,
        }
    }

    /// Builds a request with an explicit status, headers, and body, for
    /// driving the router/scatterer/orchestrator.
    pub(crate) fn new(status: u16, headers: &[(&str, &str)], body: Vec<u8>) -> Self {
        let mut map = HashMap::new();
        for (k, v) in headers {
            map.insert(k.to_lowercase(), (*v).to_string());
        }
        let answer_size = map
            .get("content-length")
            .and_then(|v| v.parse::<u64>().ok())
            .or(Some(body.len() as u64));
        Self {
            raw: body,
            cursor: 0,
            status,
            headers: map,
            answer_size,
        }
    }
}

impl HttpRequest for ScriptedRequest {
    fn add_header_field(&mut self, _name: &str, _value: &str) {}

    fn begin_request(&mut self) -> Result<()> {
        Ok(())
    }

    fn request_code(&self) -> u16 {
        self.status
    }

    fn answer_size(&self) -> Option<u64> {
        self.answer_size
    }

    fn answer_header(&self, name: &str) -> Option<String> {
        self.headers.get(&name.to_lowercase()).cloned()
    }

    fn read_line(&mut self, buf: &mut [u8]) -> Result<usize> {
        if self.cursor >= self.raw.len() {
            return Ok(0);
        }
        let remaining = &self.raw[self.cursor..];
        let line_len = match remaining.iter().position(|&b| b == b'\n') {
            Some(i) => i + 1,
            None => remaining.len(),
        };
        if line_len > buf.len() {
            return Err(transport_err("scripted line exceeds caller's line buffer"));
        }
        buf[..line_len].copy_from_slice(&remaining[..line_len]);
        self.cursor += line_len;
        Ok(line_len)
    }

    fn read_segment(&mut self, buf: &mut [u8]) -> Result<()> {
        let end = self.cursor + buf.len();
        if end > self.raw.len() {
            return Err(transport_err("scripted body ended before exact-length read completed"));
        }
        buf.copy_from_slice(&self.raw[self.cursor..end]);
        self.cursor = end;
        Ok(())
    }

    fn read_block(&mut self, buf: &mut [u8]) -> Result<usize> {
        if self.cursor >= self.raw.len() {
            return Ok(0);
        }
        let n = buf.len().min(self.raw.len() - self.cursor);
        buf[..n].copy_from_slice(&self.raw[self.cursor..self.cursor + n]);
        self.cursor += n;
        Ok(n)
    }

    fn end_request(&mut self) {}
}

fn transport_err(msg: &'static str) -> VectorReadError {
    VectorReadError::Transport(Box::new(std::io::Error::new(
        std::io::ErrorKind::UnexpectedEof,
        msg,
    )))
}

/// Scripted [`IoChainContext`]: a fixed in-memory resource, a queue of
/// scripted responses handed out one per [`IoChainContext::open_request`]
/// call (in the order the orchestrator would issue them), and optional
/// fragment params.
pub(crate) struct ScriptedContext {
    uri: String,
    resource: Vec<u8>,
    fragment_params: HashMap<String, String>,
    responses: VecDeque<ScriptedRequest>,
    pub(crate) pread_calls: usize,
}

impl ScriptedContext {
    pub(crate) fn new(uri: &str, resource: Vec<u8>) -> Self {
        Self {
            uri: uri.to_string(),
            resource,
            fragment_params: HashMap::new(),
            responses: VecDeque::new(),
            pread_calls: 0,
        }
    }

    pub(crate) fn with_fragment_param(mut self, key: &str, value: &str) -> Self {
        self.fragment_params.insert(key.to_string(), value.to_string());
        self
    }

    pub(crate) fn push_response(&mut self, response: ScriptedRequest) {
        self.responses.push_back(response);
    }
}

impl IoChainContext for ScriptedContext {
    fn uri(&self) -> &str {
        &self.uri
    }

    fn fragment_param(&self, key: &str) -> Option<String> {
        self.fragment_params.get(key).cloned()
    }

    fn pread(&mut self, buf: &mut [u8], offset: u64) -> Result<usize> {
        self.pread_calls += 1;
        let offset = offset as usize;
        if offset >= self.resource.len() {
            return Ok(0);
        }
        let n = buf.len().min(self.resource.len() - offset);
        buf[..n].copy_from_slice(&self.resource[offset..offset + n]);
        Ok(n)
    }

    fn open_request(&mut self) -> Box<dyn HttpRequest + '_> {
        Box::new(
            self.responses
                .pop_front()
                .expect("ScriptedContext: no more scripted responses queued"),
        )
    }
}

/// Builds an RFC 2046-framed `multipart/byteranges` body for `ranges` taken
/// from `resource`.
pub(crate) fn build_multipart_body(
    boundary: &str,
    resource: &[u8],
    ranges: &[(u64, u64)],
) -> Vec<u8> {
    let mut out = Vec::new();
    let total = resource.len();
    for &(offset, size) in ranges {
        out.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        out.extend_from_slice(b"Content-Type: application/octet-stream\r\n");
        let last = if size == 0 { offset } else { offset + size - 1 };
        out.extend_from_slice(format!("Content-Range: bytes {offset}-{last}/{total}\r\n").as_bytes());
        out.extend_from_slice(b"\r\n");
        if size == 0 {
            out.extend_from_slice(b"\xff"); // sentinel byte some servers emit anyway
        } else {
            let start = offset as usize;
            out.extend_from_slice(&resource[start..start + size as usize]);
        }
        out.extend_from_slice(b"\r\n");
    }
    out.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_request_reads_lines_then_body() {
        let mut req = ScriptedRequest::new(
            206,
            &[("Content-Type", "multipart/byteranges; boundary=X")],
            b"line one\r\nline two\r\n".to_vec(),
        );
        let mut buf = [0u8; 64];
        let n = req.read_line(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"line one\r\n");
        let n = req.read_line(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"line two\r\n");
        assert_eq!(req.read_line(&mut buf).unwrap(), 0);
    }

    #[test]
    fn scripted_context_serves_pread() {
        let mut ctx = ScriptedContext::new("https://example.test/file", b"ABCDEFGHIJ".to_vec());
        let mut buf = [0u8; 4];
        let n = ctx.pread(&mut buf, 2).unwrap();
        assert_eq!(&buf[..n], b"CDEF");
    }
}
