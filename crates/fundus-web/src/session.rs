//! Signed session cookie issued after a successful birthdate check.
//!
//! The cookie carries an HS256 JWT whose subject is the verified access
//! code. A session authorizes exactly one code.

use axum::http::HeaderMap;
use axum::http::header::COOKIE;
use jiff::{SignedDuration, Timestamp};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use fundus_core::access_code::AccessCode;

use crate::error::ApiError;

pub const COOKIE_NAME: &str = "fundus_session";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Verified access code.
    pub sub: String,
    pub iat: u64,
    pub exp: u64,
}

pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: SignedDuration,
    secure: bool,
}

impl SessionKeys {
    pub fn new(secret: &[u8], ttl: SignedDuration, secure: bool) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
            secure,
        }
    }

    pub fn issue(&self, code: &AccessCode, now: Timestamp) -> Result<String, ApiError> {
        let iat = now.as_second().max(0) as u64;
        let claims = SessionClaims {
            sub: code.as_str().to_string(),
            iat,
            exp: iat + self.ttl.as_secs().max(0) as u64,
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Decode and validate a token. Expired or tampered tokens yield `None`.
    pub fn verify(&self, token: &str) -> Option<SessionClaims> {
        match decode::<SessionClaims>(token, &self.decoding, &self.validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                tracing::debug!(error = %e, "rejected session token");
                None
            }
        }
    }

    /// Session claims from the request cookie, if they cover `code`.
    pub fn current(&self, headers: &HeaderMap, code: &AccessCode) -> Option<SessionClaims> {
        let token = cookie_value(headers, COOKIE_NAME)?;
        self.verify(&token).filter(|claims| claims.sub == code.as_str())
    }

    pub fn authorize(&self, headers: &HeaderMap, code: &AccessCode) -> Result<SessionClaims, ApiError> {
        self.current(headers, code)
            .ok_or_else(|| ApiError::Unauthorized(format!("no session for {code}")))
    }

    pub fn set_cookie(&self, token: &str) -> String {
        format!(
            "{COOKIE_NAME}={token}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax{}",
            self.ttl.as_secs().max(0),
            self.secure_attr()
        )
    }

    pub fn clear_cookie(&self) -> String {
        format!(
            "{COOKIE_NAME}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax{}",
            self.secure_attr()
        )
    }

    fn secure_attr(&self) -> &'static str {
        if self.secure { "; Secure" } else { "" }
    }
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}
