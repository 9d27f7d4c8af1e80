//! HTTP adapter for fetching the forum page.
//!
//! Implements the core `PageTransport` port with `reqwest`. Every response is
//! buffered in full, including error pages, so the core can log them.

use std::time::Duration;

use async_trait::async_trait;
use fwatch_core::{
    errors::Error,
    ports::{PageRequest, PageResponse, PageTransport},
    Result,
};
use reqwest::header::COOKIE;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const USER_AGENT: &str = concat!("fwatch/", env!("CARGO_PKG_VERSION"));

#[derive(Clone, Debug)]
pub struct ForumHttpClient {
    http: reqwest::Client,
}

impl ForumHttpClient {
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Transport(format!("http client build error: {e}")))?;
        Ok(Self { http })
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl PageTransport for ForumHttpClient {
    async fn get(&self, req: &PageRequest) -> Result<PageResponse> {
        let mut builder = self.http.get(&req.url);
        if let Some(cookies) = cookie_header(&req.cookies) {
            builder = builder.header(COOKIE, cookies);
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let status = resp.status();
        let headers = resp
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = resp
            .text()
            .await
            .map_err(|e| Error::Transport(format!("error reading response body: {e}")))?;

        debug!("GET {} -> {}", req.url, status);

        Ok(PageResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("").to_string(),
            headers,
            body,
        })
    }
}

/// `name=value` pairs joined with `; `, values verbatim.
pub fn cookie_header(cookies: &[(String, String)]) -> Option<String> {
    if cookies.is_empty() {
        return None;
    }
    Some(
        cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve one canned response and hand back the raw request text.
    fn serve_once(response: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut chunk).unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
            String::from_utf8_lossy(&buf).into_owned()
        });
        (format!("http://{addr}/index.php"), handle)
    }

    fn local_client() -> ForumHttpClient {
        ForumHttpClient::with_client(reqwest::Client::builder().no_proxy().build().unwrap())
    }

    #[test]
    fn cookie_header_joins_in_order() {
        let cookies = vec![
            ("ips4_IPSSessionFront".to_string(), "abc".to_string()),
            ("ips4_member_id".to_string(), "42".to_string()),
            ("__cfduid".to_string(), "d=e".to_string()),
        ];
        assert_eq!(
            cookie_header(&cookies).unwrap(),
            "ips4_IPSSessionFront=abc; ips4_member_id=42; __cfduid=d=e"
        );
        assert_eq!(cookie_header(&[]), None);
    }

    #[tokio::test]
    async fn sends_cookies_and_buffers_body() {
        let (url, server) = serve_once(concat!(
            "HTTP/1.1 200 OK\r\n",
            "Content-Type: text/html\r\n",
            "Content-Length: 5\r\n",
            "Connection: close\r\n\r\n",
            "hello",
        ));
        let client = local_client();

        let resp = client
            .get(&PageRequest {
                url,
                cookies: vec![
                    ("ips4_member_id".to_string(), "42".to_string()),
                    ("ips4_pass_hash".to_string(), "h".to_string()),
                ],
            })
            .await
            .unwrap();

        assert_eq!(resp.status, 200);
        assert_eq!(resp.reason, "OK");
        assert_eq!(resp.body, "hello");
        assert!(resp
            .headers
            .iter()
            .any(|(k, v)| k == "content-type" && v == "text/html"));

        let request = server.join().unwrap().to_lowercase();
        assert!(request.starts_with("get /index.php http/1.1"));
        assert!(request.contains("cookie: ips4_member_id=42; ips4_pass_hash=h"));
    }

    #[tokio::test]
    async fn error_status_is_returned_not_raised() {
        let (url, server) = serve_once(concat!(
            "HTTP/1.1 503 Service Unavailable\r\n",
            "Content-Length: 4\r\n",
            "Connection: close\r\n\r\n",
            "down",
        ));
        let client = local_client();

        let resp = client
            .get(&PageRequest {
                url,
                cookies: vec![],
            })
            .await
            .unwrap();
        server.join().unwrap();

        assert_eq!(resp.status, 503);
        assert_eq!(resp.body, "down");
        assert!(!resp.is_ok());
    }

    #[tokio::test]
    async fn connection_refused_is_a_transport_error() {
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let client = local_client();

        let err = client
            .get(&PageRequest {
                url: format!("http://{addr}/"),
                cookies: vec![],
            })
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Transport(_)));
    }
}
