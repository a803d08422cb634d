//! Server configuration resolved from the environment.

use crate::error::{Result, SwotError};

pub const DEFAULT_PORT: u16 = 8080;

/// Cluster host used when only a username and password are supplied.
pub const DEFAULT_MONGO_HOST: &str = "siat.15hko.mongodb.net";

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

/// How the MongoDB connection string was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// `MONGO_URI` was set
    Uri,
    /// Built from `MONGO_USERNAME` / `MONGO_PASSWORD`
    UsernamePassword,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub mongo_uri: String,
    pub credential_source: CredentialSource,
    pub port: u16,
}

impl ServerConfig {
    /// Resolve from the process environment, loading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let (mongo_uri, credential_source) = if let Some(uri) = non_empty("MONGO_URI") {
            (uri, CredentialSource::Uri)
        } else if let (Some(username), Some(password)) =
            (non_empty("MONGO_USERNAME"), non_empty("MONGO_PASSWORD"))
        {
            let host = non_empty("MONGO_HOST").unwrap_or_else(|| DEFAULT_MONGO_HOST.to_string());
            (
                format!(
                    "mongodb+srv://{}:{}@{}/?retryWrites=true&w=majority&appName=siat",
                    username, password, host
                ),
                CredentialSource::UsernamePassword,
            )
        } else {
            return Err(SwotError::MissingCredentials);
        };

        let port = match non_empty("PORT") {
            Some(raw) => parse_port(&raw)?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            mongo_uri,
            credential_source,
            port,
        })
    }

    /// Connection string prefix that is safe to log: the scheme plus a few characters.
    pub fn sanitized_uri(&self) -> String {
        sanitize_uri(&self.mongo_uri)
    }
}

pub fn parse_port(raw: &str) -> Result<u16> {
    raw.trim().parse().map_err(|_| SwotError::InvalidConfig {
        key: "PORT".to_string(),
        message: format!("'{}' is not a valid port", raw),
    })
}

pub fn sanitize_uri(uri: &str) -> String {
    match uri.find("://") {
        Some(idx) => uri.chars().take(idx + 6).collect(),
        None => String::new(),
    }
}

/// Base URL the client stores talk to.
pub fn api_base_url() -> String {
    std::env::var("SWOT_API_BASE_URL")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
}
