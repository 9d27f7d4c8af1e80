use async_trait::async_trait;

use crate::{domain::EmailMessage, Result};

/// A GET request for the forum page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub url: String,
    /// `(name, value)` pairs, sent in order.
    pub cookies: Vec<(String, String)>,
}

/// A fully buffered HTTP response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageResponse {
    pub status: u16,
    pub reason: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl PageResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Status line, headers and body in wire order, for diagnostics.
    pub fn dump(&self) -> String {
        let mut out = format!("HTTP/1.1 {} {}\r\n", self.status, self.reason);
        for (name, value) in &self.headers {
            out.push_str(name);
            out.push_str(": ");
            out.push_str(value);
            out.push_str("\r\n");
        }
        out.push_str("\r\n");
        out.push_str(&self.body);
        out
    }
}

/// Port for fetching the forum page.
///
/// `Err` means the request never produced a response. Any HTTP status,
/// including errors, comes back as `Ok`.
#[async_trait]
pub trait PageTransport: Send + Sync {
    async fn get(&self, req: &PageRequest) -> Result<PageResponse>;
}

/// Port for sending operator emails.
#[async_trait]
pub trait MailPort: Send + Sync {
    async fn send(&self, msg: &EmailMessage) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dump_renders_status_headers_and_body() {
        let resp = PageResponse {
            status: 503,
            reason: "Service Unavailable".to_string(),
            headers: vec![("retry-after".to_string(), "30".to_string())],
            body: "down".to_string(),
        };

        assert!(!resp.is_ok());
        assert_eq!(
            resp.dump(),
            "HTTP/1.1 503 Service Unavailable\r\nretry-after: 30\r\n\r\ndown"
        );
    }
}
