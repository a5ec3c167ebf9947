//! Notification channel configuration.

/// Credentials for the Telegram publisher.
#[derive(Clone)]
pub struct TelegramConfig {
    /// Bot API token
    pub bot_token: String,
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"<redacted>")
            .finish()
    }
}

impl TelegramConfig {
    pub const TOKEN_VAR: &'static str = "PRICE_ALERT_BOT_TOKEN";

    /// Create config from the `PRICE_ALERT_BOT_TOKEN` environment variable.
    /// Returns None when it is unset or empty.
    pub fn from_env() -> Option<Self> {
        let bot_token = std::env::var(Self::TOKEN_VAR).ok()?;
        Self::from_token(bot_token)
    }

    pub fn from_token(bot_token: impl Into<String>) -> Option<Self> {
        let bot_token = bot_token.into();
        if bot_token.trim().is_empty() {
            return None;
        }
        Some(Self { bot_token })
    }
}
