use std::fmt;

use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::role::{Role, UnknownRole};

/// Bearer token issued at login. Never refreshed on the client.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(***)")
    }
}

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn bearer(&self) -> String {
        format!("{}{}", crate::consts::BEARER_PREFIX, self.0)
    }

    /// Decodes the payload segment without verifying the signature.
    pub fn claims(&self) -> Result<TokenClaims, TokenError> {
        let payload = self
            .0
            .split('.')
            .nth(1)
            .filter(|payload| !payload.is_empty())
            .ok_or(TokenError::MissingPayload)?;

        let payload = ::base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))?;
        ::serde_json::from_slice(&payload).map_err(Into::into)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub role: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl TokenClaims {
    pub fn role(&self) -> Result<Role, UnknownRole> {
        self.role.try_into()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp
            .and_then(|exp| DateTime::<Utc>::from_timestamp(exp, 0))
    }

    pub fn check_expiry(&self, now: DateTime<Utc>) -> Result<(), TokenError> {
        match self.expires_at() {
            Some(expires_at) if expires_at <= now => Err(TokenError::Expired(expires_at)),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("the token has no payload segment")]
    MissingPayload,
    #[error("failed to decode the token payload: {0}")]
    Encoding(#[from] ::base64::DecodeError),
    #[error("failed to parse the token claims: {0}")]
    Claims(#[from] ::serde_json::Error),
    #[error("the token has expired at {0}")]
    Expired(DateTime<Utc>),
}
