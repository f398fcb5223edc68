//! Token Service
//!
//! Issues and verifies the HS256 bearer tokens shared by the auth and chat
//! services. Both halves are built once at startup from [`JwtSettings`] and
//! are immutable afterwards; verification touches no store.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, decode_header, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header,
    Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtSettings;

/// The only algorithm tokens are signed with or accepted under.
pub const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

/// Authorization scheme expected in the `Authorization` header.
pub const BEARER_SCHEME: &str = "Bearer";

/// Claims embedded in every token.
///
/// Group ids are a snapshot taken at login; membership changes are only
/// picked up by the next login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: Uuid,
    pub username: String,
    #[serde(default)]
    pub groups: Vec<Uuid>,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Build claims valid from now for `ttl`.
    ///
    /// Fails when the expiry does not fit in a timestamp.
    pub fn new(
        user_id: Uuid,
        username: impl Into<String>,
        groups: Vec<Uuid>,
        ttl: Duration,
    ) -> Result<Self, TokenError> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(ttl)
            .ok_or_else(|| TokenError::Signing("token expiry out of range".into()))?;
        Ok(Self {
            user_id,
            username: username.into(),
            groups,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        })
    }

    pub fn is_member_of(&self, group_id: Uuid) -> bool {
        self.groups.contains(&group_id)
    }
}

/// Reasons a token could not be issued or accepted.
///
/// Callers outside this module must not echo the variant to clients;
/// the HTTP layer collapses all of them into one response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("authorization header missing")]
    MissingHeader,

    #[error("authorization header is not `Bearer <token>`")]
    MalformedHeader,

    #[error("token signed with unexpected algorithm")]
    UnexpectedAlgorithm,

    #[error("token expired")]
    Expired,

    #[error("token invalid")]
    Invalid,

    #[error("token signing failed: {0}")]
    Signing(String),
}

impl TokenError {
    /// Short label for metrics and logs.
    pub fn label(&self) -> &'static str {
        match self {
            TokenError::MissingHeader => "missing",
            TokenError::MalformedHeader => "malformed",
            TokenError::UnexpectedAlgorithm => "algorithm",
            TokenError::Expired => "expired",
            TokenError::Invalid => "invalid",
            TokenError::Signing(_) => "signing",
        }
    }
}

/// A freshly signed token together with the claims it carries.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

/// Signs claims with the server secret.
#[derive(Clone)]
pub struct TokenIssuer {
    key: EncodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(settings: &JwtSettings) -> Self {
        Self {
            key: EncodingKey::from_secret(settings.secret.as_bytes()),
            // Out-of-range lifetimes surface as a signing error at issue time.
            ttl: Duration::try_hours(settings.token_expiry_hours).unwrap_or(Duration::MAX),
        }
    }

    /// Token lifetime applied by [`issue`](Self::issue).
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Build claims for the identity and sign them.
    pub fn issue(
        &self,
        user_id: Uuid,
        username: &str,
        groups: Vec<Uuid>,
    ) -> Result<IssuedToken, TokenError> {
        let claims = Claims::new(user_id, username, groups, self.ttl)?;
        let token = self.sign(&claims)?;
        Ok(IssuedToken { token, claims })
    }

    /// Sign arbitrary claims.
    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(TOKEN_ALGORITHM), claims, &self.key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }
}

/// Checks bearer tokens against the server secret.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(settings: &JwtSettings) -> Self {
        let mut validation = Validation::new(TOKEN_ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            key: DecodingKey::from_secret(settings.secret.as_bytes()),
            validation,
        }
    }

    /// Verify a raw `Authorization` header value.
    pub fn verify_header(&self, header: Option<&str>) -> Result<Claims, TokenError> {
        let header = header.ok_or(TokenError::MissingHeader)?;
        let token = parse_bearer(header).ok_or(TokenError::MalformedHeader)?;
        self.verify(token)
    }

    /// Verify a bare token.
    ///
    /// The header algorithm is checked before the signature so a token
    /// declaring any other algorithm is never handed to a different
    /// verification path.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let header = decode_header(token).map_err(|_| TokenError::Invalid)?;
        if header.alg != TOKEN_ALGORITHM {
            return Err(TokenError::UnexpectedAlgorithm);
        }

        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidAlgorithm => TokenError::UnexpectedAlgorithm,
                _ => TokenError::Invalid,
            })
    }
}

/// Extract the token from an exact `Bearer <token>` header value.
///
/// The scheme must be spelled `Bearer`, followed by a single space and a
/// non-empty token without whitespace.
pub fn parse_bearer(header: &str) -> Option<&str> {
    let token = header.strip_prefix(BEARER_SCHEME)?.strip_prefix(' ')?;
    if token.is_empty() || token.chars().any(char::is_whitespace) {
        return None;
    }
    Some(token)
}
