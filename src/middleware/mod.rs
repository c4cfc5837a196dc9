pub mod app_key;
pub mod auth;
pub mod requester;
pub mod response;

pub use app_key::app_key_middleware;
pub use auth::jwt_auth_middleware;
pub use requester::Requester;
pub use response::{ApiResponse, ApiResult};
