//! 认证授权模块
//!
//! 提供 JWT 验证和中间件：
//! - [`JwtService`] - JWT 令牌验证服务
//! - [`CurrentUser`] - 当前用户上下文
//! - [`require_auth`] - 认证中间件

pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::require_auth;
