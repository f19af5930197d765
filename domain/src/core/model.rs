//! Model value object representing an LLM model served by a provider

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// LLM models known to the default provider set (Value Object)
///
/// Any other identifier parses into [`Model::Custom`], so configuration can
/// name models this enum has never heard of.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    Llama31Instant,
    Qwen3,
    CompoundMini,
    GptOss20b,
    KimiK2Instruct,
    // Custom
    Custom(String),
}

impl Model {
    /// Get the string identifier for this model
    pub fn as_str(&self) -> &str {
        match self {
            Model::Llama31Instant => "llama-3.1-8b-instant",
            Model::Qwen3 => "qwen/qwen3-32b",
            Model::CompoundMini => "groq/compound-mini",
            Model::GptOss20b => "openai/gpt-oss-20b",
            Model::KimiK2Instruct => "moonshotai/kimi-k2-instruct-0905",
            Model::Custom(s) => s,
        }
    }

    /// The default provider line-up, in registry order.
    ///
    /// The first entry doubles as the consensus model.
    pub fn default_models() -> Vec<Model> {
        vec![
            Model::Llama31Instant,
            Model::Qwen3,
            Model::CompoundMini,
            Model::GptOss20b,
            Model::KimiK2Instruct,
        ]
    }

    /// Identifier without the vendor prefix (`qwen/qwen3-32b` -> `qwen3-32b`)
    pub fn short_name(&self) -> &str {
        let id = self.as_str();
        id.rsplit('/').next().unwrap_or(id)
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "llama-3.1-8b-instant" => Model::Llama31Instant,
            "qwen/qwen3-32b" => Model::Qwen3,
            "groq/compound-mini" => Model::CompoundMini,
            "openai/gpt-oss-20b" => Model::GptOss20b,
            "moonshotai/kimi-k2-instruct-0905" => Model::KimiK2Instruct,
            other => Model::Custom(other.to_string()),
        })
    }
}

impl From<&str> for Model {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(model) => model,
            Err(never) => match never {},
        }
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Model::from(s.as_str()))
    }
}
