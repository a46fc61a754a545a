pub mod api_client;
pub mod traits;

pub use api_client::ApiClient;
pub use traits::{AuthApi, RequestRepository, UniversityDirectory};
