//! Agents
//!
//! - **Report Agent**: turns a file digest into the strategic report
//! - **Chat Agent**: answers follow-up questions from the stored report
//!
//! ```text
//! Upload ──► extract ──► ReportAgent ──► session store
//!                                            │
//! Question ─────────────► ChatAgent ◄────────┘
//! ```

pub mod chat;
pub mod report;

pub use chat::{ChatAgent, REFUSAL_PHRASE};
pub use report::ReportAgent;
