use std::sync::Arc;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::analysis::ChartDescriptor;
use crate::config::Config;
use crate::llm::LLM;
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub llm: Arc<LLM>,
    pub sessions: Arc<dyn SessionStore>,
}

impl AppState {
    pub fn new(config: Config, llm: LLM, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            config,
            llm: Arc::new(llm),
            sessions,
        }
    }
}

// API request/response models

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub report: String,
    pub chart: Option<ChartDescriptor>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(min = 1, message = "query must not be empty"))]
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub provider: String,
    pub model: String,
}
