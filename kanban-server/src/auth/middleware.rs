//! 认证中间件
//!
//! 为 JWT 认证提供 Axum 中间件。

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use crate::utils::AppError;

/// GET 路径中仍会产生变更的端点；方法豁免不适用
const MUTATING_GET_PREFIXES: &[&str] = &["/api/v1/fabrication/orders/deliver/"];

/// 只读请求免认证；变更类请求要求令牌
fn is_exempt(method: &http::Method, path: &str) -> bool {
    if !path.starts_with("/api/") {
        return true;
    }
    if *method == http::Method::OPTIONS || *method == http::Method::HEAD {
        return true;
    }
    *method == http::Method::GET
        && !MUTATING_GET_PREFIXES.iter().any(|p| path.starts_with(p))
}

/// 认证中间件 - 变更类请求要求 Bearer 令牌
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT。
/// 验证成功后将 [`CurrentUser`] 注入请求扩展。
///
/// # 跳过认证的请求
///
/// - `OPTIONS` (CORS 预检) / `HEAD`
/// - 只读 `GET` 路径 (交付推进等变更类 GET 除外)
/// - 非 `/api/` 路径 (健康检查等)
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if is_exempt(req.method(), req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => {
            JwtService::extract_from_header(header).ok_or(AppError::InvalidToken)?
        }
        None => {
            tracing::warn!(target: "auth", uri = %req.uri(), "Missing authorization header");
            return Err(AppError::Unauthorized);
        }
    };

    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            let user = CurrentUser::from(claims);
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(target: "auth", error = %e, uri = %req.uri(), "Token rejected");
            match e {
                crate::auth::JwtError::ExpiredToken => Err(AppError::TokenExpired),
                _ => Err(AppError::InvalidToken),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::is_exempt;
    use http::Method;

    #[test]
    fn read_paths_are_exempt_but_mutating_get_is_not() {
        assert!(is_exempt(&Method::GET, "/api/v1/assembly-store/orders"));
        assert!(is_exempt(&Method::GET, "/health"));
        assert!(is_exempt(&Method::OPTIONS, "/api/v1/kanban/confirm"));
        assert!(!is_exempt(&Method::GET, "/api/v1/fabrication/orders/deliver/42"));
        assert!(!is_exempt(&Method::POST, "/api/v1/assembly-line/orders"));
        assert!(!is_exempt(&Method::PUT, "/api/v1/kanban/confirm"));
    }
}
