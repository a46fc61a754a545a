pub mod requests;
pub mod utils;

pub use requests::{print_request, print_requests, print_universities};
pub use utils::{days_until, describe_deadline, extract_first_name, first_line, truncate};
