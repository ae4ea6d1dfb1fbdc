use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use keeper_core::KeeperError;
use tracing::{error, warn};

/// Realm announced on authentication challenges.
const AUTH_REALM: &str = r#"Basic realm="Authorization Required""#;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Falla del backend de strings
    #[error(transparent)]
    Keeper(#[from] KeeperError),

    /// Body ilegible
    #[error("{0}")]
    BadRequest(String),

    /// Credenciales ausentes o invalidas
    #[error("{0}")]
    Unauthorized(String),

    /// IP o cuenta no autorizada
    #[error("{0}")]
    Forbidden(String),
}

impl AppError {
    /// Returns the HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Keeper(err) => match err {
                KeeperError::InvalidRequest { .. } | KeeperError::NotVersionControlled { .. } => {
                    StatusCode::BAD_REQUEST
                },
                KeeperError::NotFound { .. } => StatusCode::NOT_FOUND,
                KeeperError::IsDirectory { .. } | KeeperError::Upstream { .. } => {
                    StatusCode::EXPECTATION_FAILED
                },
                KeeperError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                KeeperError::Io { .. } | KeeperError::Template { .. } => {
                    StatusCode::INTERNAL_SERVER_ERROR
                },
            },
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        if status.is_server_error() {
            error!(status = status.as_u16(), "{}", message);
        } else {
            warn!(status = status.as_u16(), "{}", message);
        }

        let mut response = (status, message).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static(AUTH_REALM));
        }
        response
    }
}
