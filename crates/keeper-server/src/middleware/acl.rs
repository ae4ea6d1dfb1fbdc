//! IP allow-list and basic authentication.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use base64::{Engine, engine::general_purpose::STANDARD};
use keeper_core::StringRequest;
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// The authenticated account, empty when authentication is disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthUser(pub String);

impl AuthUser {
    /// Checks that this account may read from the request's bucket.
    ///
    /// The account name must be exactly `namespace/bucket`.
    pub fn check_bucket_access(&self, request: &StringRequest) -> Result<(), AppError> {
        let account = request.bucket_account();
        if self.0.is_empty() {
            return Err(AppError::Forbidden("no auth info found".to_string()));
        }
        if self.0 != account {
            return Err(AppError::Forbidden(format!(
                "did not have matched account of {account}"
            )));
        }
        Ok(())
    }
}

/// Rejects callers whose address is not in the allow-list.
pub async fn ip_filter(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let acl = state.acl();
    if acl.ip_acl_enabled {
        let ip = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_canonical().to_string());

        match ip {
            Some(ip) if acl.ip_allowed(&ip) => {},
            other => {
                return Err(AppError::Forbidden(format!(
                    "the ip of {} is not in white list",
                    other.as_deref().unwrap_or("unknown")
                )));
            },
        }
    }

    Ok(next.run(request).await)
}

/// Verifies basic credentials and records the caller as an [`AuthUser`].
pub async fn basic_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let acl = state.acl();
    if !acl.auth_enabled {
        request.extensions_mut().insert(AuthUser::default());
        return Ok(next.run(request).await);
    }

    let (user, password) = basic_credentials(request.headers())
        .ok_or_else(|| AppError::Unauthorized("authorization required".to_string()))?;

    if !acl.credentials_valid(&user, &password) {
        debug!(user = %user, "Rejected credentials");
        return Err(AppError::Unauthorized("authorization required".to_string()));
    }

    request.extensions_mut().insert(AuthUser(user));
    Ok(next.run(request).await)
}

/// Decodes an `Authorization: Basic` header into user and password.
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = String::from_utf8(STANDARD.decode(encoded.trim()).ok()?).ok()?;
    let (user, password) = decoded.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_basic_credentials() {
        let encoded = STANDARD.encode("acme/site1:s3:cret");
        let parsed = basic_credentials(&headers(&format!("Basic {encoded}")));
        assert_eq!(
            parsed,
            Some(("acme/site1".to_string(), "s3:cret".to_string()))
        );

        assert!(basic_credentials(&HeaderMap::new()).is_none());
        assert!(basic_credentials(&headers("Bearer abc")).is_none());
        assert!(basic_credentials(&headers("Basic !!!")).is_none());
        assert!(basic_credentials(&headers(&format!("Basic {}", STANDARD.encode("nocolon")))).is_none());
    }

    #[test]
    fn test_bucket_access() {
        let request = StringRequest::new("acme", "site1", "a.txt");

        assert!(AuthUser("acme/site1".to_string()).check_bucket_access(&request).is_ok());

        let err = AuthUser("acme/site2".to_string())
            .check_bucket_access(&request)
            .unwrap_err();
        assert_eq!(err.to_string(), "did not have matched account of acme/site1");

        let err = AuthUser::default().check_bucket_access(&request).unwrap_err();
        assert_eq!(err.to_string(), "no auth info found");
    }
}
