pub mod board;
pub mod filter;

pub use board::{Modal, RequestBoard};
pub use filter::{filter_requests, RequestFilter};
