//! Alert data models

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Severity of an alert, which drives its presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    /// An operation completed successfully
    Success,
    /// An operation failed
    Error,
    /// Something needs the user's attention
    Warning,
    /// Neutral information
    Info,
}

impl AlertKind {
    /// All kinds, in display order
    pub const ALL: [AlertKind; 4] = [Self::Success, Self::Error, Self::Warning, Self::Info];

    /// Lowercase name as used on the wire
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for AlertKind {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "success" => Ok(Self::Success),
            "error" => Ok(Self::Error),
            "warning" => Ok(Self::Warning),
            "info" => Ok(Self::Info),
            other => Err(crate::error::Error::validation(format!(
                "unknown alert kind '{other}' (expected success, error, warning or info)"
            ))),
        }
    }
}

/// Identifier of an alert, unique for the lifetime of its registry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertId(String);

impl AlertId {
    /// Build the id for the `n`th alert minted by a registry
    pub(crate) fn from_sequence(n: u64) -> Self {
        Self(format!("alert-{n}"))
    }

    /// The id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AlertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AlertId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for AlertId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A single notification shown to the user
///
/// Alerts are never modified once registered; they are only removed whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// Unique identifier (`alert-N`)
    pub id: AlertId,

    /// Severity
    #[serde(rename = "type")]
    pub kind: AlertKind,

    /// Short heading
    pub title: String,

    /// Body text
    pub text: String,

    /// Milliseconds until automatic removal; `0` keeps the alert until it is
    /// removed explicitly
    pub timeout: u64,
}

impl Alert {
    /// Whether the alert stays until explicitly removed
    pub fn is_persistent(&self) -> bool {
        self.timeout == 0
    }

    /// Time until automatic removal, if any
    pub fn expires_after(&self) -> Option<Duration> {
        (self.timeout > 0).then(|| Duration::from_millis(self.timeout))
    }
}

/// Convert a signed millisecond count into an alert timeout
///
/// Zero and negative values mean "never expire".
pub fn timeout_from_millis(ms: i64) -> Duration {
    u64::try_from(ms).map_or(Duration::ZERO, Duration::from_millis)
}
