pub mod api_error;
pub mod exchange_rate_api;

pub use api_error::{ApiError, Response};
pub use exchange_rate_api::{Client, ClientBuilder};
