//! Entry point for requests the webview routes to the application scheme.

use std::{
    io::{self, Read},
    sync::Arc,
};

use url::Url;

use crate::{logging::LogSink, resource_resolver::ResourceResolver};

/// Sequential reader over a shared, immutable resource buffer.
#[derive(Debug, Clone)]
pub struct ResourceStream {
    bytes: Arc<[u8]>,
    position: usize,
}

impl ResourceStream {
    pub fn new(bytes: Arc<[u8]>) -> Self {
        Self { bytes, position: 0 }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }
}

impl Read for ResourceStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let available = &self.bytes[self.position..];
        let count = available.len().min(buf.len());
        buf[..count].copy_from_slice(&available[..count]);
        self.position += count;
        Ok(count)
    }
}

#[derive(Debug)]
pub struct StreamResponse {
    pub mime_type: &'static str,
    pub stream: ResourceStream,
}

/// Outcome of a scheme request: either a body to stream or a pass back to the webview.
#[derive(Debug)]
pub enum SchemeResponse {
    Stream(StreamResponse),
    Pass,
}

impl SchemeResponse {
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

pub struct SchemeRequestHandler {
    resolver: Arc<ResourceResolver>,
    log: LogSink,
}

impl SchemeRequestHandler {
    pub fn new(resolver: Arc<ResourceResolver>, log: LogSink) -> Self {
        Self { resolver, log }
    }

    /// Answers one request. Never blocks beyond a cache lookup; unknown resources pass.
    pub fn handle(&self, request_url: &str) -> SchemeResponse {
        let url = canonicalize_engine_url(request_url, self.resolver.scheme(), self.resolver.host());
        (self.log)(&format!("handling scheme request {url}"));

        match self.resolver.resolve(&url) {
            Ok(resolved) if !resolved.bytes.is_empty() => SchemeResponse::Stream(StreamResponse {
                mime_type: resolved.mime_type,
                stream: ResourceStream::new(resolved.bytes),
            }),
            Ok(resolved) => {
                (self.log)(&format!(
                    "resource {} resolved to an empty buffer; passing",
                    resolved.canonical_path
                ));
                SchemeResponse::Pass
            }
            Err(error) => {
                (self.log)(&format!("{error}; passing"));
                SchemeResponse::Pass
            }
        }
    }
}

/// Rewrites `http(s)://<scheme>.<host>/...`, the form some webviews use for custom schemes,
/// back to `<scheme>://<host>/...`. Any other URL is returned unchanged.
pub fn canonicalize_engine_url(raw_url: &str, scheme: &str, host: &str) -> String {
    let Ok(parsed) = Url::parse(raw_url.trim()) else {
        return raw_url.to_string();
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return raw_url.to_string();
    }
    let expected_host = format!("{scheme}.{host}");
    let host_matches = parsed
        .host_str()
        .is_some_and(|actual| actual.eq_ignore_ascii_case(&expected_host));
    if !host_matches || parsed.port().is_some() {
        return raw_url.to_string();
    }

    let mut canonical = format!("{scheme}://{host}{}", parsed.path());
    if let Some(query) = parsed.query() {
        canonical.push('?');
        canonical.push_str(query);
    }
    canonical
}
