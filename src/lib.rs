// Module declarations
pub mod auth;
pub mod board;
pub mod cli_context;
pub mod client;
pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod formatting;
pub mod interactive;
pub mod logging;
pub mod models;
pub mod notice;
pub mod session;

#[cfg(test)]
mod tests;

// Re-export commonly used items
pub use auth::{AuthGateway, AuthMode};
pub use board::{RequestBoard, RequestFilter};
pub use client::{ApiClient, AuthApi, RequestRepository, UniversityDirectory};
pub use config::{get_api_url, load_config, save_config, Config, ReconcileStrategy};
pub use error::{TeammateError, TeammateResult};
pub use models::*;
pub use notice::{Notice, NoticeKind};
pub use session::{Session, SessionStore};
