//! Environment-backed configuration.
//!
//! Two independent pieces: where the RPC listener binds, and the fallback
//! bot credentials used when a `start_bot` request carries blank fields.
//! Missing or malformed variables fall back to defaults; configuration
//! never aborts the process.

use botlink_client::ClientConfig;

/// Default RPC listener address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8765";

/// Listener settings for [`RpcServer`](crate::RpcServer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcConfig {
    /// Address the WebSocket listener binds to.
    pub bind_addr: String,
}

impl RpcConfig {
    /// Reads `RPC_BIND_ADDR`, defaulting to [`DEFAULT_BIND_ADDR`].
    pub fn from_env() -> Self {
        Self {
            bind_addr: env_or("RPC_BIND_ADDR", DEFAULT_BIND_ADDR),
        }
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

/// Fallback bot credentials, read from the environment.
///
/// Used by `start_bot` when the request omits a field or carries a blank
/// one: `BOT_USERNAME`, `BOT_PASSWORD`, `BOT_APPEARANCE`, `BOT_SERVER_URL`,
/// `BOT_ORIGIN`. Absent variables resolve to empty strings; whether empty
/// credentials are acceptable is the protocol client's call, at login time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BotCredentials {
    pub username: String,
    pub password: String,
    pub appearance: String,
    pub server_url: String,
    pub origin: String,
}

impl BotCredentials {
    /// Reads all credential variables from the environment.
    pub fn from_env() -> Self {
        Self {
            username: env_or("BOT_USERNAME", ""),
            password: env_or("BOT_PASSWORD", ""),
            appearance: env_or("BOT_APPEARANCE", ""),
            server_url: env_or("BOT_SERVER_URL", ""),
            origin: env_or("BOT_ORIGIN", ""),
        }
    }

    /// Converts to the client configuration the coordinator expects.
    pub fn into_client_config(self) -> ClientConfig {
        ClientConfig {
            username: self.username,
            password: self.password,
            appearance: self.appearance,
            server_url: self.server_url,
            origin: self.origin,
        }
    }
}

/// Reads an environment variable, falling back to `default` when it is
/// unset or not valid Unicode.
fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
