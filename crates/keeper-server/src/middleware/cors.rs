//! CORS layer built from configuration.

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer, ExposeHeaders};
use tracing::warn;

use crate::config::CorsConfig;

const WILDCARD: &str = "*";

/// Builds the CORS layer.
///
/// Browsers refuse `*` together with credentials, so with credentials
/// enabled a wildcard mirrors the request instead.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let credentials = config.allow_credentials;

    let origins = if has_wildcard(&config.allow_origins) {
        if credentials {
            AllowOrigin::mirror_request()
        } else {
            AllowOrigin::any()
        }
    } else {
        AllowOrigin::list(parse_all(&config.allow_origins, |v| HeaderValue::from_str(v).ok()))
    };

    let methods = if has_wildcard(&config.allow_methods) {
        if credentials {
            AllowMethods::mirror_request()
        } else {
            AllowMethods::any()
        }
    } else {
        AllowMethods::list(parse_all(&config.allow_methods, |v| {
            Method::from_bytes(v.to_ascii_uppercase().as_bytes()).ok()
        }))
    };

    let headers = if has_wildcard(&config.allow_headers) {
        if credentials {
            AllowHeaders::mirror_request()
        } else {
            AllowHeaders::any()
        }
    } else {
        AllowHeaders::list(parse_all(&config.allow_headers, |v| {
            HeaderName::from_bytes(v.as_bytes()).ok()
        }))
    };

    let expose = if has_wildcard(&config.expose_headers) && !credentials {
        ExposeHeaders::any()
    } else {
        ExposeHeaders::list(parse_all(&config.expose_headers, |v| {
            HeaderName::from_bytes(v.as_bytes()).ok()
        }))
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(headers)
        .expose_headers(expose)
        .allow_credentials(credentials)
}

fn has_wildcard(values: &[String]) -> bool {
    values.iter().any(|v| v.trim() == WILDCARD)
}

fn parse_all<T>(values: &[String], parse: impl Fn(&str) -> Option<T>) -> Vec<T> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| *v != WILDCARD)
        .filter_map(|v| {
            let parsed = parse(v);
            if parsed.is_none() {
                warn!("Ignoring invalid CORS entry '{}'", v);
            }
            parsed
        })
        .collect()
}
