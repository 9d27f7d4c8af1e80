use std::fmt;

pub const COOKIE_SESSION_FRONT: &str = "ips4_IPSSessionFront";
pub const COOKIE_MEMBER_ID: &str = "ips4_member_id";
pub const COOKIE_CFDUID: &str = "__cfduid";
pub const COOKIE_PASS_HASH: &str = "ips4_pass_hash";

/// Pre-obtained forum session cookies. Values are echoed back verbatim.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub session_front: String,
    pub member_id: String,
    pub cfduid: String,
    pub pass_hash: String,
}

impl Credentials {
    /// Cookie pairs in the order they are sent.
    pub fn cookies(&self) -> Vec<(String, String)> {
        vec![
            (COOKIE_SESSION_FRONT.to_string(), self.session_front.clone()),
            (COOKIE_MEMBER_ID.to_string(), self.member_id.clone()),
            (COOKIE_CFDUID.to_string(), self.cfduid.clone()),
            (COOKIE_PASS_HASH.to_string(), self.pass_hash.clone()),
        ]
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("session_front", &"<redacted>")
            .field("member_id", &self.member_id)
            .field("cfduid", &"<redacted>")
            .field("pass_hash", &"<redacted>")
            .finish()
    }
}

/// A plain-text email, built at send time and never stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl EmailMessage {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }
}
