pub mod auth;
pub mod response;
pub mod tenant;

pub use auth::{jwt_auth_middleware, AuthUser};
pub use response::{ApiResponse, ApiResult};
pub use tenant::{resolve_tenant_middleware, TenantContext, TenantPool};
