pub mod gateway;

pub use gateway::{AuthField, AuthFields, AuthGateway, AuthMode};
