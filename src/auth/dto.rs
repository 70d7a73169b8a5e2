use jsonwebtoken::{DecodingKey, EncodingKey};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use time::OffsetDateTime;
use uuid::Uuid;

/// Token discriminant; a refresh token can never pass as an access token and
/// a reset token carries no session at all.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
    Reset,
}

/// Session claims (access and refresh tokens).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: usize,
    pub iat: usize,
    pub iss: String,
    pub aud: String,
    #[serde(rename = "type")]
    pub kind: TokenKind,
}

/// Password-reset claims: scoped to an email, not a user session.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ResetClaims {
    pub email: String,
    pub exp: usize,
    pub iat: usize,
    pub iss: String,
    pub aud: String,
    #[serde(rename = "type")]
    pub kind: TokenKind,
}

/// Holds JWT signing and verification keys with config data.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub reset_ttl: Duration,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetConfirm {
    pub token: String,
    pub new_password: String,
}

/// Access/refresh pair returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct ResetRequested {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn public_user_carries_optional_full_name() {
        let mut user = PublicUser {
            id: Uuid::new_v4(),
            email: "user@example.com".into(),
            full_name: Some("Ada Lovelace".into()),
            is_active: true,
            created_at: datetime!(2026-08-01 12:00 UTC),
        };
        let body = serde_json::to_value(&user).unwrap();
        assert_eq!(body["full_name"], "Ada Lovelace");

        user.full_name = None;
        let body = serde_json::to_value(&user).unwrap();
        assert!(body["full_name"].is_null());
    }

    #[test]
    fn register_request_tolerates_absent_full_name() {
        let req: RegisterRequest =
            serde_json::from_str(r#"{"email":"a@b.co","password":"hunter22"}"#).unwrap();
        assert_eq!(req.full_name, None);

        let req: RegisterRequest = serde_json::from_str(
            r#"{"email":"a@b.co","full_name":"Ada","password":"hunter22"}"#,
        )
        .unwrap();
        assert_eq!(req.full_name.as_deref(), Some("Ada"));
    }
}
