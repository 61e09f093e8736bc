use anyhow::Result;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::path::Path;

use crate::utils::read_env::{DotenvFile, Layered, ProcessEnv, ReadEnv};

pub const GOOGLE_CLIENT_ID_VAR: &str = "GOOGLE_CLIENT_ID";
pub const PLACEHOLDER_GOOGLE_CLIENT_ID: &str = "YOUR_GOOGLE_CLIENT_ID";

static GOOGLE_CLIENT_ID: Lazy<String> =
    Lazy::new(|| or_process_env(AppConfig::from_env(), &ProcessEnv).google_client_id);

/// A `.env` that fails to load is logged and resolution continues from `process` alone.
pub fn or_process_env(loaded: Result<AppConfig>, process: &impl ReadEnv) -> AppConfig {
    loaded.unwrap_or_else(|e| {
        tracing::error!("failed to load .env, using process environment only: {:#}", e);
        AppConfig::from_source(process)
    })
}

/// The Google OAuth client id for this process. Resolved once on first call.
pub fn google_client_id() -> &'static str {
    &GOOGLE_CLIENT_ID
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientIdSource {
    Environment,
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppConfig {
    pub google_client_id: String,
    pub source: ClientIdSource,
}

impl AppConfig {
    pub fn new(google_client_id: String, source: ClientIdSource) -> Self {
        Self {
            google_client_id,
            source,
        }
    }

    /// Unset and empty both resolve to the placeholder.
    pub fn from_source(env: &impl ReadEnv) -> Self {
        match env.var(GOOGLE_CLIENT_ID_VAR) {
            Some(value) if !value.is_empty() => {
                if value == PLACEHOLDER_GOOGLE_CLIENT_ID {
                    tracing::warn!("{} is set to the placeholder", GOOGLE_CLIENT_ID_VAR);
                }
                Self::new(value, ClientIdSource::Environment)
            }
            _ => {
                tracing::warn!(
                    "{} unset or empty, using placeholder",
                    GOOGLE_CLIENT_ID_VAR
                );
                Self::new(
                    PLACEHOLDER_GOOGLE_CLIENT_ID.to_string(),
                    ClientIdSource::Placeholder,
                )
            }
        }
    }

    /// Process environment first, then the nearest `.env` file.
    pub fn from_env() -> Result<Self> {
        let dotenv = DotenvFile::discover()?;
        Ok(Self::from_source(&Layered::new(ProcessEnv, dotenv)))
    }

    /// Same as [`AppConfig::from_env`] with `.env` discovery starting at `dir`.
    pub fn from_env_in(dir: impl AsRef<Path>) -> Result<Self> {
        let dotenv = DotenvFile::discover_from(dir)?;
        Ok(Self::from_source(&Layered::new(ProcessEnv, dotenv)))
    }

    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self> {
        let dotenv = DotenvFile::from_path(path)?;
        Ok(Self::from_source(&Layered::new(ProcessEnv, dotenv)))
    }

    /// True for the fallback and for an id explicitly set to the placeholder text.
    pub fn is_placeholder(&self) -> bool {
        self.google_client_id == PLACEHOLDER_GOOGLE_CLIENT_ID
    }
}
