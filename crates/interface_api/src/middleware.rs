//! API middleware

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::{info, warn};

use crate::AppState;
use crate::auth::Claims;

/// Authentication middleware
///
/// Validates JWT tokens and extracts user claims
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok());

    let token = match auth_header.and_then(|h| h.strip_prefix("Bearer ")) {
        Some(token) => token,
        None => {
            warn!("Missing or invalid Authorization header");
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    match crate::auth::validate_token(token, &state.config.jwt_secret) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            Ok(next.run(request).await)
        }
        Err(e) => {
            warn!("Token validation failed: {:?}", e);
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

/// Writes any user may make on their own data
///
/// The handlers behind these routes check ownership themselves.
fn is_self_service(method: &Method, path: &str) -> bool {
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    match (method, segments.as_slice()) {
        (&Method::PUT, [.., "users", _, "preferences"]) => true,
        (&Method::POST, [.., "notifications", "read-all"]) => true,
        (&Method::POST, [.., "notifications", _, "read"]) => true,
        (&Method::DELETE, [.., "notifications", _]) => true,
        _ => false,
    }
}

/// Rejects mutating requests from non-admin callers
///
/// Self-service writes (preferences, notification feed) are let through.
/// Must run after `auth_middleware`.
pub async fn admin_write_middleware(request: Request<Body>, next: Next) -> Result<Response, StatusCode> {
    let read_only = [Method::GET, Method::HEAD, Method::OPTIONS].contains(request.method());
    if read_only || is_self_service(request.method(), request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let is_admin = request
        .extensions()
        .get::<Claims>()
        .map(Claims::is_admin)
        .unwrap_or(false);
    if !is_admin {
        warn!(method = %request.method(), uri = %request.uri(), "Write rejected for non-admin caller");
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(next.run(request).await)
}

/// Audit logging middleware
///
/// Logs all API requests for compliance and debugging
pub async fn audit_middleware(
    State(_state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let user_id = request
        .extensions()
        .get::<Claims>()
        .map(|c| c.sub.clone())
        .unwrap_or_else(|| "anonymous".to_string());

    let start = Utc::now();

    let response = next.run(request).await;

    let duration = Utc::now() - start;
    let status = response.status();

    info!(
        method = %method,
        uri = %uri,
        user = %user_id,
        status = %status.as_u16(),
        duration_ms = duration.num_milliseconds(),
        "API request"
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_service_routes() {
        assert!(is_self_service(&Method::PUT, "/users/USR-1/preferences"));
        assert!(is_self_service(&Method::PUT, "/api/v1/users/USR-1/preferences"));
        assert!(is_self_service(&Method::POST, "/notifications/read-all"));
        assert!(is_self_service(&Method::POST, "/notifications/NTF-1/read"));
        assert!(is_self_service(&Method::DELETE, "/notifications/NTF-1"));

        assert!(!is_self_service(&Method::POST, "/notifications"));
        assert!(!is_self_service(&Method::PUT, "/users/USR-1"));
        assert!(!is_self_service(&Method::DELETE, "/users/USR-1"));
        assert!(!is_self_service(&Method::DELETE, "/subscriptions/SUB-1/payment/installments/INST-1"));
    }
}
