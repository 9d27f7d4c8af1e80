use tracing_subscriber::{fmt, EnvFilter};

use crate::{errors::Error, Result};

/// Initialize logging for the watcher.
///
/// Everything goes to stderr. `RUST_LOG` overrides the default filter, which is
/// `info` for our crates (`debug` when `verbose`) and `warn` for everything else.
pub fn init(service_name: &str, verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(service_name, verbose)));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(false)
        .try_init()
        .map_err(|e| Error::Config(format!("failed to install logger: {e}")))
}

fn default_directives(service_name: &str, verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    let service = service_name.replace('-', "_");
    format!(
        "warn,{service}={level},fwatch_core={level},fwatch_http={level},fwatch_smtp={level}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_raises_our_crates_to_debug() {
        let d = default_directives("fwatch", true);
        assert!(d.starts_with("warn,"));
        assert!(d.contains("fwatch_core=debug"));
        assert!(d.contains("fwatch=debug"));
    }

    #[test]
    fn quiet_keeps_info() {
        let d = default_directives("fwatch", false);
        assert!(d.contains("fwatch_http=info"));
        assert!(!d.contains("debug"));
    }
}
