//! One watch run: fetch, compare, persist, notify.
//!
//! The run is linear. The only branch is the error report sent when the fetch
//! fails; an `Err` from [`Watcher::run`] means that report could not be sent
//! either and the process should exit non-zero.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::{
    config::Config,
    domain::EmailMessage,
    errors::Error,
    fetch::NotificationFetcher,
    ports::{MailPort, PageTransport},
    retry::RetryPolicy,
    state::StateStore,
    Result,
};

pub const ERROR_SUBJECT: &str = "Error scraping notifications";
pub const NOTIFY_SUBJECT: &str = "ASOIAF notifications";
pub const FORUM_HOME: &str = "https://asoiaf.westeros.org/";

/// What happened at the notify decision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Count went up and the email was sent.
    Notified,
    /// Count did not go up.
    AlreadyNotified,
    /// Count went up but the email failed.
    NotifyFailed(String),
    /// Fetch failed, the report was sent and the run stopped there.
    Halted,
}

/// Summary of one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunReport {
    pub fetched: u64,
    pub previous: Option<u64>,
    pub fetch_error: Option<String>,
    pub outcome: Outcome,
}

/// Notify only when the count grew and there is something to read.
pub fn should_notify(fetched: u64, previous: u64) -> bool {
    fetched > previous && fetched > 0
}

pub fn notification_body(count: u64) -> String {
    format!("You have {count} new notification(s)! Go check {FORUM_HOME}")
}

pub struct Watcher {
    cfg: Arc<Config>,
    fetcher: NotificationFetcher,
    mailer: Arc<dyn MailPort>,
    state: StateStore,
}

impl Watcher {
    pub fn new(
        cfg: Arc<Config>,
        transport: Arc<dyn PageTransport>,
        mailer: Arc<dyn MailPort>,
    ) -> Self {
        Self::with_retry(cfg, transport, mailer, RetryPolicy::default())
    }

    pub fn with_retry(
        cfg: Arc<Config>,
        transport: Arc<dyn PageTransport>,
        mailer: Arc<dyn MailPort>,
        retry: RetryPolicy,
    ) -> Self {
        let fetcher = NotificationFetcher::new(transport, cfg.page_url.clone(), retry);
        let state = StateStore::new(cfg.state_file.clone());
        Self {
            cfg,
            fetcher,
            mailer,
            state,
        }
    }

    pub async fn run(&self) -> Result<RunReport> {
        // FETCH
        let (fetched, fetch_error) = match self.fetcher.fetch(&self.cfg.credentials).await {
            Ok(n) => (n, None),
            Err(e) => {
                let text = self.report_fetch_error(e).await?;
                if self.cfg.halt_on_fetch_error {
                    info!("Fetch failed and was reported; leaving state untouched");
                    return Ok(RunReport {
                        fetched: 0,
                        previous: None,
                        fetch_error: Some(text),
                        outcome: Outcome::Halted,
                    });
                }
                // The count is recorded as 0 after a reported failure, which
                // resets the stored count until the next good fetch.
                (0, Some(text))
            }
        };

        // COMPARE
        let previous = self.state.load();

        // PERSIST
        if let Err(e) = self.state.save(fetched) {
            warn!("Failed to write {}: {e}", self.state.path().display());
        }

        // NOTIFY_DECISION
        let outcome = if should_notify(fetched, previous) {
            debug!("Emailing for {fetched} notification(s)");
            let msg = EmailMessage::new(
                self.cfg.notify_email.clone(),
                NOTIFY_SUBJECT,
                notification_body(fetched),
            );
            match self.mailer.send(&msg).await {
                Ok(()) => {
                    info!("Sent notification email for {fetched} notification(s)");
                    Outcome::Notified
                }
                Err(e) => {
                    error!("Failed to send notification email: {e}");
                    Outcome::NotifyFailed(e.to_string())
                }
            }
        } else {
            debug!(
                "Skipping email because already notified for this number of notifications \
                 ({fetched} <= {previous})"
            );
            Outcome::AlreadyNotified
        };

        Ok(RunReport {
            fetched,
            previous: Some(previous),
            fetch_error,
            outcome,
        })
    }

    /// Email the fetch error to the operator. Returns the error text once the
    /// report is out, or `Error::Unreported` when it could not be sent.
    async fn report_fetch_error(&self, fetch: Error) -> Result<String> {
        let text = fetch.to_string();
        warn!("Fetching notifications failed: {text}");

        let msg = EmailMessage::new(self.cfg.notify_email.clone(), ERROR_SUBJECT, text.clone());
        match self.mailer.send(&msg).await {
            Ok(()) => Ok(text),
            Err(email) => Err(Error::Unreported {
                fetch: Box::new(fetch),
                email: Box::new(email),
            }),
        }
    }
}
