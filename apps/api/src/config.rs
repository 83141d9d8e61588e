use anyhow::{Context, Result};

const DEFAULT_SITE_URL: &str = "http://localhost:5173";

/// Application configuration loaded from environment variables.
/// Startup fails if the backend URL or anon key is missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the hosted backend, e.g. `https://xyz.supabase.co`.
    pub backend_url: String,
    pub backend_anon_key: String,
    /// Where magic links send the user back to.
    pub site_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            backend_url: require_env("BACKEND_URL")?
                .trim_end_matches('/')
                .to_string(),
            backend_anon_key: require_env("BACKEND_ANON_KEY")?,
            site_url: std::env::var("SITE_URL").unwrap_or_else(|_| DEFAULT_SITE_URL.to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
