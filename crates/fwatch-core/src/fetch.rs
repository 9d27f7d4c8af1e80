use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    domain::Credentials,
    errors::Error,
    ports::{PageRequest, PageTransport},
    retry::{send_with_retry, RetryPolicy},
    scrape, Result,
};

/// Fetches the forum page as the logged-in user and reads the notification count.
pub struct NotificationFetcher {
    transport: Arc<dyn PageTransport>,
    url: String,
    retry: RetryPolicy,
}

impl NotificationFetcher {
    pub fn new(
        transport: Arc<dyn PageTransport>,
        url: impl Into<String>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            url: url.into(),
            retry,
        }
    }

    pub fn request(&self, creds: &Credentials) -> PageRequest {
        PageRequest {
            url: self.url.clone(),
            cookies: creds.cookies(),
        }
    }

    pub async fn fetch(&self, creds: &Credentials) -> Result<u64> {
        let req = self.request(creds);
        let resp = send_with_retry(self.transport.as_ref(), &req, self.retry)
            .await
            .map_err(|e| match e {
                Error::Transport(_) => e,
                other => Error::Transport(other.to_string()),
            })?;

        if !resp.is_ok() {
            warn!("{}", resp.dump());
            return Err(Error::HttpStatus {
                status: resp.status,
                reason: resp.reason,
            });
        }

        debug!("fetched {} ({} bytes)", self.url, resp.body.len());
        scrape::extract_count(&resp.body)
    }
}
