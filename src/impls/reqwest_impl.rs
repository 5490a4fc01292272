//! [`HttpRequest`]/[`IoChainContext`] bindings over
//! `reqwest::blocking`.
//!
//! A blocking [`reqwest::blocking::Response`] already implements
//! [`std::io::Read`] incrementally, which is exactly what
//! `read_line`/`read_segment`/`read_block` need — wrapped in a
//! [`std::io::BufReader`] for the line-oriented reads the multipart parser
//! does.

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read};

pub use reqwest;

use crate::error::{Result, VectorReadError};
use crate::io::{HttpRequest, IoChainContext};

fn transport_err(msg: &'static str) -> VectorReadError {
    VectorReadError::Transport(Box::new(std::io::Error::new(std::io::ErrorKind::Other, msg)))
}

/// One GET, issued lazily on [`HttpRequest::begin_request`].
pub struct ReqwestRequest {
    client: reqwest::blocking::Client,
    url: reqwest::Url,
    headers: reqwest::header::HeaderMap,
    response: Option<BufReader<reqwest::blocking::Response>>,
    status: u16,
}

impl ReqwestRequest {
    pub fn new(client: reqwest::blocking::Client, url: reqwest::Url) -> Self {
        Self {
            client,
            url,
            headers: reqwest::header::HeaderMap::new(),
            response: None,
            status: 0,
        }
    }
}

impl HttpRequest for ReqwestRequest {
    fn add_header_field(&mut self, name: &str, value: &str) {
        if let (Ok(name), Ok(value)) = (
            reqwest::header::HeaderName::from_bytes(name.as_bytes()),
            reqwest::header::HeaderValue::from_str(value),
        ) {
            self.headers.insert(name, value);
        }
    }

    fn begin_request(&mut self) -> Result<()> {
        let response = self
            .client
            .get(self.url.clone())
            .headers(self.headers.clone())
            .send()
            .map_err(|e| VectorReadError::Transport(Box::new(e)))?;
        self.status = response.status().as_u16();
        self.response = Some(BufReader::new(response));
        Ok(())
    }

    fn request_code(&self) -> u16 {
        self.status
    }

    fn answer_size(&self) -> Option<u64> {
        self.response.as_ref().and_then(|r| r.get_ref().content_length())
    }

    fn answer_header(&self, name: &str) -> Option<String> {
        self.response
            .as_ref()
            .and_then(|r| r.get_ref().headers().get(name))
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    fn read_line(&mut self, buf: &mut [u8]) -> Result<usize> {
        let reader = self
            .response
            .as_mut()
            .ok_or_else(|| transport_err("read_line before begin_request"))?;
        let mut line = Vec::new();
        let n = reader
            .read_until(b'\n', &mut line)
            .map_err(|e| VectorReadError::Transport(Box::new(e)))?;
        if n > buf.len() {
            return Err(transport_err("line exceeds caller's line buffer"));
        }
        buf[..n].copy_from_slice(&line[..n]);
        Ok(n)
    }

    fn read_segment(&mut self, buf: &mut [u8]) -> Result<()> {
        let reader = self
            .response
            .as_mut()
            .ok_or_else(|| transport_err("read_segment before begin_request"))?;
        reader.read_exact(buf).map_err(|e| VectorReadError::Transport(Box::new(e)))
    }

    fn read_block(&mut self, buf: &mut [u8]) -> Result<usize> {
        let reader = self
            .response
            .as_mut()
            .ok_or_else(|| transport_err("read_block before begin_request"))?;
        reader.read(buf).map_err(|e| VectorReadError::Transport(Box::new(e)))
    }

    fn end_request(&mut self) {
        self.response = None;
    }
}

/// [`IoChainContext`] binding a `reqwest::blocking::Client` to one URL.
pub struct ReqwestContext {
    client: reqwest::blocking::Client,
    url: reqwest::Url,
    fragment_params: HashMap<String, String>,
}

impl ReqwestContext {
    pub fn new(client: reqwest::blocking::Client, url: reqwest::Url) -> Self {
        let fragment_params = url
            .fragment()
            .map(parse_fragment_params)
            .unwrap_or_default();
        Self {
            client,
            url,
            fragment_params,
        }
    }
}

fn parse_fragment_params(fragment: &str) -> HashMap<String, String> {
    fragment
        .split('&')
        .filter_map(|kv| {
            let mut it = kv.splitn(2, '=');
            let key = it.next()?.to_string();
            let value = it.next().unwrap_or("").to_string();
            Some((key, value))
        })
        .collect()
}

impl IoChainContext for ReqwestContext {
    fn uri(&self) -> &str {
        self.url.as_str()
    }

    fn fragment_param(&self, key: &str) -> Option<String> {
        self.fragment_params.get(key).cloned()
    }

    fn pread(&mut self, buf: &mut [u8], offset: u64) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let end = offset + buf.len() as u64 - 1;
        let response = self
            .client
            .get(self.url.clone())
            .header(reqwest::header::RANGE, format!("bytes={offset}-{end}"))
            .send()
            .map_err(|e| VectorReadError::Transport(Box::new(e)))?;
        let bytes = response.bytes().map_err(|e| VectorReadError::Transport(Box::new(e)))?;
        let n = bytes.len().min(buf.len());
        buf[..n].copy_from_slice(&bytes[..n]);
        Ok(n)
    }

    fn open_request(&mut self) -> Box<dyn HttpRequest + '_> {
        Box::new(ReqwestRequest::new(self.client.clone(), self.url.clone()))
    }
}
