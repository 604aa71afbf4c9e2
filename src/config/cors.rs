use axum::http::{header, HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use super::Config;

const PREFLIGHT_MAX_AGE_SECS: u64 = 86400;

/// Build the CORS layer from the configured origin list. An empty or
/// fully-invalid list falls back to permissive settings so local
/// development keeps working.
pub fn create_cors_layer(config: &Config) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allowed_origins(config))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::ORIGIN,
            HeaderName::from_static("x-requested-with"),
        ])
        .expose_headers([header::CONTENT_LENGTH, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(PREFLIGHT_MAX_AGE_SECS))
}

fn allowed_origins(config: &Config) -> AllowOrigin {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("CORS: Invalid origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        tracing::warn!(
            "CORS: No valid origins configured, using permissive settings for development"
        );
        AllowOrigin::any()
    } else {
        tracing::info!("CORS: Configured with {} allowed origin(s)", origins.len());
        AllowOrigin::list(origins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_origins(origins: &[&str]) -> Config {
        Config {
            database_url: String::new(),
            port: 0,
            upload_dir: String::new(),
            allowed_origins: origins.iter().map(|o| o.to_string()).collect(),
            production: false,
        }
    }

    #[test]
    fn test_create_cors_layer() {
        // Should not panic when creating the CORS layer
        let _layer = create_cors_layer(&config_with_origins(&["http://localhost:3000"]));
        let _layer = create_cors_layer(&config_with_origins(&[]));
    }

    #[test]
    fn test_invalid_origins_are_dropped() {
        // An origin that is not a valid header value must not panic either
        let _layer = create_cors_layer(&config_with_origins(&["not a header\nvalue"]));
    }
}
