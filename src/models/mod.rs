pub mod auth;
pub mod request;
pub mod university;

// Re-export commonly used types
pub use auth::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UserType};
pub use request::{RequestField, TeamRequest};
pub use university::University;
