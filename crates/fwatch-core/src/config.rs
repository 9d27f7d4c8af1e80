use std::{ffi::OsString, fmt, path::PathBuf};

use clap::Parser;

use crate::{domain::Credentials, errors::Error, Result};

pub const PAGE_URL: &str = "https://asoiaf.westeros.org/index.php";
pub const DEFAULT_SMTP_PORT: u16 = 25;

/// Command-line flags as written by the operator.
///
/// Required values are `Option`s so that missing and empty flags get the same
/// "Need to specify" message from [`Config::from_args`].
#[derive(Debug, Parser)]
#[command(
    name = "fwatch",
    about = "Email when the forum notification count goes up",
    version
)]
pub struct Args {
    /// Whether to log verbosely
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// File to store count between invocations
    #[arg(long = "file", value_name = "PATH", allow_hyphen_values = true)]
    pub file: Option<String>,

    /// ips4_IPSSessionFront cookie
    #[arg(long = "ipssessionfront", allow_hyphen_values = true)]
    pub ipssessionfront: Option<String>,

    /// ips4_member_id cookie
    #[arg(long = "memberid", allow_hyphen_values = true)]
    pub memberid: Option<String>,

    /// __cfduid cookie
    #[arg(long = "cfduid", allow_hyphen_values = true)]
    pub cfduid: Option<String>,

    /// ips4_pass_hash cookie
    #[arg(long = "passhash", allow_hyphen_values = true)]
    pub passhash: Option<String>,

    /// Email address to notify
    #[arg(long = "notify_email", allow_hyphen_values = true)]
    pub notify_email: Option<String>,

    /// SMTP server
    #[arg(long = "smtp_server", allow_hyphen_values = true)]
    pub smtp_server: Option<String>,

    /// SMTP user
    #[arg(long = "smtp_user", allow_hyphen_values = true)]
    pub smtp_user: Option<String>,

    /// SMTP password
    #[arg(long = "smtp_password", allow_hyphen_values = true)]
    pub smtp_password: Option<String>,

    /// SMTP port
    #[arg(long = "smtp_port", default_value_t = DEFAULT_SMTP_PORT)]
    pub smtp_port: u16,

    /// Sender address (defaults to the SMTP user)
    #[arg(long = "from_email", allow_hyphen_values = true)]
    pub from_email: Option<String>,

    /// Stop after reporting a failed fetch instead of recording a count of 0
    #[arg(long = "halt_on_fetch_error")]
    pub halt_on_fetch_error: bool,
}

/// SMTP relay settings.
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub from: String,
}

impl fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("from", &self.from)
            .finish()
    }
}

/// Typed configuration, built once at startup and shared by reference.
#[derive(Clone, Debug)]
pub struct Config {
    pub verbose: bool,
    pub state_file: PathBuf,
    pub credentials: Credentials,
    pub notify_email: String,
    pub smtp: SmtpSettings,
    pub page_url: String,
    pub halt_on_fetch_error: bool,
}

impl Config {
    /// Parse flags (including the program name in position 0) and check that
    /// every required value is present.
    pub fn from_args<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let args = Args::try_parse_from(normalize_flags(args))?;
        Self::from_parsed(args)
    }

    pub fn from_parsed(args: Args) -> Result<Self> {
        let state_file = PathBuf::from(required(args.file, "file")?);
        let smtp_host = required(args.smtp_server, "smtp_server")?;
        let smtp_user = required(args.smtp_user, "smtp_user")?;
        let smtp_password = required(args.smtp_password, "smtp_password")?;
        let session_front = required(args.ipssessionfront, "ipssessionfront")?;
        let member_id = required(args.memberid, "memberid")?;
        let cfduid = required(args.cfduid, "cfduid")?;
        let pass_hash = required(args.passhash, "passhash")?;
        let notify_email = required(args.notify_email, "notify_email")?;

        let from = args
            .from_email
            .and_then(non_empty)
            .unwrap_or_else(|| smtp_user.clone());

        Ok(Self {
            verbose: args.verbose,
            state_file,
            credentials: Credentials {
                session_front,
                member_id,
                cfduid,
                pass_hash,
            },
            notify_email,
            smtp: SmtpSettings {
                host: smtp_host,
                port: args.smtp_port,
                user: smtp_user,
                password: smtp_password,
                from,
            },
            page_url: PAGE_URL.to_string(),
            halt_on_fetch_error: args.halt_on_fetch_error,
        })
    }
}

fn required(value: Option<String>, flag: &str) -> Result<String> {
    value
        .and_then(non_empty)
        .ok_or_else(|| Error::Config(format!("Need to specify -{flag}")))
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

const BOOL_FLAGS: &[&str] = &["v", "verbose", "halt_on_fetch_error", "h", "help", "V", "version"];

/// Rewrite single-dash long flags (`-file x`, `-file=x`) to the `--file` form
/// clap expects. Values that follow a value-taking flag are left untouched,
/// and so is everything after a bare `--`.
fn normalize_flags<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut out = Vec::new();
    let mut expecting_value = false;
    let mut passthrough = false;

    for (i, arg) in args.into_iter().enumerate() {
        let arg: OsString = arg.into();
        if i == 0 || passthrough {
            out.push(arg);
            continue;
        }
        if expecting_value {
            expecting_value = false;
            out.push(arg);
            continue;
        }

        let Some(text) = arg.to_str() else {
            out.push(arg);
            continue;
        };

        if text == "--" {
            passthrough = true;
            out.push(arg);
            continue;
        }

        let flag = if let Some(rest) = text.strip_prefix("--") {
            rest
        } else if let Some(rest) = text.strip_prefix('-') {
            rest
        } else {
            out.push(arg);
            continue;
        };

        let (name, has_inline_value) = match flag.split_once('=') {
            Some((name, _)) => (name, true),
            None => (flag, false),
        };
        if !has_inline_value && !BOOL_FLAGS.contains(&name) {
            expecting_value = true;
        }

        if text.starts_with("--") || name.chars().count() <= 1 {
            out.push(arg);
        } else {
            out.push(OsString::from(format!("-{text}")));
        }
    }

    out
}
