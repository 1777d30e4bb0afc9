//! Per-browser analysis sessions.
//!
//! A session holds the digest and report of the most recent `/analyze`
//! call so `/chat` can answer follow-up questions about that report only.

pub mod cookie;
pub mod memory;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub use memory::InMemorySessionStore;

/// Opaque session identifier carried in the session cookie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// State kept between `/analyze` and `/chat`
#[derive(Debug, Clone, PartialEq)]
pub struct SessionData {
    pub digest: String,
    pub report: String,
    pub lang: String,
    pub updated_at: DateTime<Utc>,
}

impl SessionData {
    pub fn new(digest: impl Into<String>, report: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            digest: digest.into(),
            report: report.into(),
            lang: lang.into(),
            updated_at: Utc::now(),
        }
    }
}

/// Storage seam for session state. Writes replace the previous value wholesale.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, id: &SessionId) -> Option<SessionData>;

    async fn put(&self, id: &SessionId, data: SessionData);
}
