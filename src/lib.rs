// Strategic Report - upload a file, get an LLM-written strategic report, then chat about it

pub mod agents;
pub mod analysis;
pub mod config;
pub mod extract;
pub mod llm;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod session;
pub mod types;
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
