//! Report Agent
//!
//! Renders the strategic report prompt around a file digest and sends it to
//! the model as a single user message.

use tracing::info;

use crate::config::LLMConfig;
use crate::llm::LLM;
use crate::types::{AppResult, LLMMessage};

pub struct ReportAgent;

impl ReportAgent {
    /// Fixed report template with `digest` appended verbatim.
    pub fn build_report_prompt(digest: &str, lang: &str) -> String {
        format!(
            r#"Role: Senior Strategy & Data Consultant.
Language: {lang}.
Formatting: Use [RED_TITLE] for titles and [BLUE_HEADER] for section headers.

Tasks:
1. [RED_TITLE] In-Depth Strategic Analysis Report [/RED_TITLE]
2. [BLUE_HEADER] 1. Input Data Profile [/BLUE_HEADER]
3. [BLUE_HEADER] 2. Analytical Findings and Insights [/BLUE_HEADER]
   - If the data is numeric: analyze the statistical values and the distribution.
   - If the data is text: give an executive summary of the key points.
   - If the data is an image: analyze the visual content.
4. [BLUE_HEADER] 3. Strategic Recommendations [/BLUE_HEADER]: practical steps built on the analysis.

Input Data: {digest}"#
        )
    }

    pub async fn generate(llm: &LLM, config: &LLMConfig, digest: &str, lang: &str) -> AppResult<String> {
        let prompt = Self::build_report_prompt(digest, lang);
        info!(
            lang = %lang,
            prompt_chars = prompt.chars().count(),
            model = %config.report_model,
            "Generating report"
        );

        llm.complete(
            vec![LLMMessage::user(prompt)],
            &config.report_model,
            Some(config.report_temperature),
        )
        .await
    }
}
