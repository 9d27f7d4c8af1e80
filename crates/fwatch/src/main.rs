use std::{process::ExitCode, sync::Arc};

use fwatch_core::{
    config::Config,
    errors::Error,
    watcher::{Outcome, Watcher},
};
use fwatch_http::ForumHttpClient;
use fwatch_smtp::SmtpMailer;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let cfg = match Config::from_args(std::env::args_os()) {
        Ok(cfg) => Arc::new(cfg),
        Err(Error::Cli(e)) => e.exit(),
        Err(e) => {
            // -v is unknown until parsing succeeds, so log at the default level.
            if let Err(log_err) = fwatch_core::logging::init("fwatch", false) {
                eprintln!("{log_err}");
            }
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = fwatch_core::logging::init("fwatch", cfg.verbose) {
        eprintln!("{e}");
    }

    match run(cfg).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cfg: Arc<Config>) -> Result<(), Error> {
    let transport = Arc::new(ForumHttpClient::new()?);
    let mailer = Arc::new(SmtpMailer::new(&cfg.smtp)?);

    let report = Watcher::new(cfg, transport, mailer).run().await?;

    match &report.outcome {
        Outcome::Notified => info!("{} notification(s), email sent", report.fetched),
        Outcome::NotifyFailed(e) => info!(
            "{} notification(s), email not sent: {e}",
            report.fetched
        ),
        Outcome::AlreadyNotified | Outcome::Halted => {}
    }
    Ok(())
}
