use anyhow::Result;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

use crate::types::LLMProvider;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LLMConfig,
    pub upload: UploadConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
            cors_allowed_origins: vec!["*".to_string()],
            static_dir: PathBuf::from("static"),
        }
    }
}

#[derive(Clone, Deserialize)]
pub struct LLMConfig {
    pub provider: LLMProvider,
    pub api_key: String,
    /// Overrides the provider's default OpenAI-compatible base URL
    pub api_base: Option<String>,
    pub report_model: String,
    pub chat_model: String,
    pub report_temperature: f32,
    pub timeout_secs: u64,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::Groq,
            api_key: String::new(),
            api_base: None,
            report_model: "llama-3.3-70b-versatile".to_string(),
            chat_model: "llama-3.3-70b-versatile".to_string(),
            report_temperature: 0.2,
            timeout_secs: 120,
        }
    }
}

// Hand-written so the API key never ends up in logs.
impl std::fmt::Debug for LLMConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LLMConfig")
            .field("provider", &self.provider)
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("api_base", &self.api_base)
            .field("report_model", &self.report_model)
            .field("chat_model", &self.chat_model)
            .field("report_temperature", &self.report_temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    pub max_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self { max_bytes: 25 * 1024 * 1024 }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub cookie_name: String,
    /// Idle lifetime of a session; 0 keeps sessions until the process exits
    pub ttl_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "report_session".to_string(),
            ttl_secs: 24 * 60 * 60,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    pub dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let server_defaults = ServerConfig::default();
        let llm_defaults = LLMConfig::default();
        let session_defaults = SessionConfig::default();

        let provider_id = env::var("LLM_PROVIDER").unwrap_or_else(|_| "groq".to_string());
        let provider = LLMProvider::from_id(&provider_id)
            .ok_or_else(|| anyhow::anyhow!("Unsupported LLM_PROVIDER: {}", provider_id))?;

        let api_key = env::var("LLM_API_KEY")
            .or_else(|_| match provider {
                LLMProvider::Groq => env::var("GROQ_API_KEY"),
                LLMProvider::OpenAI => env::var("OPENAI_API_KEY"),
            })
            .unwrap_or_default();

        Ok(Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .unwrap_or_else(|_| server_defaults.port.to_string())
                    .parse()?,
                host: env::var("HOST").unwrap_or(server_defaults.host),
                cors_allowed_origins: env::var("ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "*".to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                static_dir: env::var("STATIC_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(server_defaults.static_dir),
            },
            llm: LLMConfig {
                provider,
                api_key,
                api_base: env::var("LLM_API_BASE").ok().filter(|s| !s.trim().is_empty()),
                report_model: env::var("REPORT_LLM_MODEL").unwrap_or(llm_defaults.report_model),
                chat_model: env::var("CHAT_LLM_MODEL").unwrap_or(llm_defaults.chat_model),
                report_temperature: env::var("REPORT_TEMPERATURE")
                    .unwrap_or_else(|_| llm_defaults.report_temperature.to_string())
                    .parse()?,
                timeout_secs: env::var("LLM_TIMEOUT_SECS")
                    .unwrap_or_else(|_| llm_defaults.timeout_secs.to_string())
                    .parse()?,
            },
            upload: UploadConfig {
                max_bytes: env::var("MAX_UPLOAD_BYTES")
                    .unwrap_or_else(|_| UploadConfig::default().max_bytes.to_string())
                    .parse()?,
            },
            session: SessionConfig {
                cookie_name: env::var("SESSION_COOKIE_NAME").unwrap_or(session_defaults.cookie_name),
                ttl_secs: env::var("SESSION_TTL_SECS")
                    .unwrap_or_else(|_| session_defaults.ttl_secs.to_string())
                    .parse()?,
            },
            logging: LoggingConfig {
                dir: env::var("LOG_DIR").ok().map(PathBuf::from),
            },
        })
    }
}
