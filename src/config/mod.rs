use std::env;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::create_security_headers_layer;

const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Directory event images are written to; served under /uploads.
    pub upload_dir: String,
    pub allowed_origins: Vec<String>,
    /// HSTS is only meaningful behind HTTPS, so it is tied to the
    /// production flag.
    pub production: bool,
}

impl Config {
    pub fn from_env() -> Self {
        let allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost/topcity".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3001),
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
            allowed_origins,
            production: env::var("RUST_ENV")
                .map(|v| v.to_lowercase() == "production")
                .unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_origins_parse_into_a_list() {
        let origins: Vec<String> = DEFAULT_ALLOWED_ORIGINS
            .split(',')
            .map(|o| o.trim().to_string())
            .collect();
        assert_eq!(origins.len(), 2);
        assert!(origins.iter().all(|o| o.starts_with("http://localhost")));
    }
}
