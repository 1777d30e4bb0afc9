//! Chat Agent
//!
//! Answers follow-up questions strictly from the report and digest stored in
//! the caller's session.

use tracing::info;

use crate::config::LLMConfig;
use crate::llm::LLM;
use crate::session::SessionData;
use crate::types::{AppResult, LLMMessage};

/// Reply the model gives for questions outside the report, translated to the session language
pub const REFUSAL_PHRASE: &str = "I am specialized in the report only";

pub struct ChatAgent;

impl ChatAgent {
    pub fn build_system_prompt(session: &SessionData) -> String {
        format!(
            "You are a Report Assistant. Answer ONLY based on:\n\
             Report: {}\n\
             Data: {}\n\
             Language: {}. If unrelated, say: \"{}\" in {}.",
            session.report, session.digest, session.lang, REFUSAL_PHRASE, session.lang
        )
    }

    pub async fn answer(
        llm: &LLM,
        config: &LLMConfig,
        session: &SessionData,
        question: &str,
    ) -> AppResult<String> {
        info!(
            question_chars = question.chars().count(),
            lang = %session.lang,
            model = %config.chat_model,
            "Answering chat question"
        );

        let messages = vec![
            LLMMessage::system(Self::build_system_prompt(session)),
            LLMMessage::user(question),
        ];

        llm.complete(messages, &config.chat_model, None).await
    }
}
