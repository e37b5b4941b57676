//! The seam between the collector and a messaging platform client.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// One message as returned by the platform, before flattening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedMessage {
    pub date: DateTime<Utc>,
    pub sender_id: Option<i64>,
    pub text: String,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("channel '{0}' could not be resolved")]
    ChannelNotFound(String),
    #[error("access to channel '{channel}' denied: {reason}")]
    AccessDenied { channel: String, reason: String },
    #[error("request for '{channel}' failed: {reason}")]
    Request { channel: String, reason: String },
    #[error("session error: {0}")]
    Session(String),
}

/// An open, authenticated session against a messaging platform.
///
/// Implementations open the session when constructed. [`MessageSource::close`]
/// must be called once the run is over: it persists whatever session state
/// the platform needs for the next run. The connection itself lives as long
/// as the source value and is released when it is dropped.
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Fetches up to `limit` of the most recent messages in `channel`, newest
    /// first, with a single attempt.
    async fn fetch_recent(
        &self,
        channel: &str,
        limit: usize,
    ) -> Result<Vec<FetchedMessage>, SourceError>;

    async fn close(&self) -> Result<(), SourceError>;
}

/// Reduces a channel identifier (`@name`, `t.me/name`, `https://t.me/name`)
/// to the bare username.
pub fn channel_username(identifier: &str) -> &str {
    let trimmed = identifier.trim();
    let without_scheme = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed);
    let without_host = without_scheme
        .strip_prefix("www.")
        .unwrap_or(without_scheme);
    let path = without_host
        .strip_prefix("t.me/")
        .or_else(|| without_host.strip_prefix("telegram.me/"))
        .unwrap_or(without_host);
    let name = path.strip_prefix('@').unwrap_or(path);
    name.split(['/', '?']).next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_every_identifier_shape() {
        assert_eq!(channel_username("@ZemenExpress"), "ZemenExpress");
        assert_eq!(channel_username("ZemenExpress"), "ZemenExpress");
        assert_eq!(channel_username("https://t.me/ZemenExpress"), "ZemenExpress");
        assert_eq!(channel_username("t.me/ZemenExpress/123"), "ZemenExpress");
        assert_eq!(channel_username("http://www.t.me/ZemenExpress?x=1"), "ZemenExpress");
        assert_eq!(channel_username(" telegram.me/@shop "), "shop");
    }
}
