//! API credentials. Read from the environment only, never from the config
//! file, and never printed.

use super::non_empty_env;
use crate::errors::{AppError, AppResult};
use std::fmt;

#[derive(Clone)]
pub struct KimaiCredentials {
    pub token: String,
}

#[derive(Clone)]
pub struct FusionCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl KimaiCredentials {
    pub fn from_env() -> AppResult<Self> {
        let token = non_empty_env("KIMAI_API_TOKEN").ok_or_else(|| {
            AppError::MissingCredentials("KIMAI_API_TOKEN environment variable".to_string())
        })?;
        Ok(Self { token })
    }
}

impl FusionCredentials {
    pub fn from_env() -> AppResult<Self> {
        match (non_empty_env("SF_CLIENT_ID"), non_empty_env("SF_CLIENT_SECRET")) {
            (Some(client_id), Some(client_secret)) => Ok(Self {
                client_id,
                client_secret,
            }),
            _ => Err(AppError::MissingCredentials(
                "SF_CLIENT_ID or SF_CLIENT_SECRET environment variables".to_string(),
            )),
        }
    }
}

impl fmt::Debug for KimaiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KimaiCredentials")
            .field("token", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for FusionCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FusionCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}
