pub mod auth;
pub mod policy;
pub mod response;

pub use auth::{jwt_auth_middleware, AuthUser};
pub use policy::{authorize, Action, Capability};
pub use response::{ApiResponse, ApiResult};
