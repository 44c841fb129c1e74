mod auth_ctx;
mod json;

pub use auth_ctx::{AuthCtx, AuthCtxExtractor};
pub use json::AppJson;
