//! Provider endpoint configuration from TOML (`[gateway]` section)

use serde::{Deserialize, Serialize};

/// Groq's OpenAI-compatible API root
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Raw gateway configuration from TOML
///
/// # Example
///
/// ```toml
/// [gateway]
/// base_url = "https://api.groq.com/openai/v1"
/// connect_timeout_secs = 10
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGatewayConfig {
    /// API root; `/chat/completions` is appended
    pub base_url: String,
    /// TCP/TLS connect timeout. Per-request deadlines come from the
    /// orchestration policies.
    pub connect_timeout_secs: u64,
}

impl Default for FileGatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout_secs: 10,
        }
    }
}
