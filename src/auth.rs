use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_graphql::{Context, Guard};
use axum::http::HeaderMap;
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};

use crate::repository::RepositoryState;

/// Request header carrying the session token, out-of-band from the query body.
pub const TOKEN_HEADER: &str = "x-jwt";

// Token lifetime chosen at issue; verification rejects anything older.
const TOKEN_TTL_SECS: i64 = 60 * 60 * 24 * 14;

/// Claims
///
/// Represents the standard payload structure expected inside a JSON Web Token (JWT).
/// These claims are signed by the server's secret and validated upon every request
/// that presents a token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): The id of the account. This is the primary key used to fetch
    /// the account record from the identity store.
    pub sub: i64,
    /// Expiration Time (exp): Timestamp after which the JWT must not be accepted.
    /// This is crucial for preventing replay attacks and maintaining session freshness.
    pub exp: usize,
    /// Issued At (iat): Timestamp when the JWT was issued.
    pub iat: usize,
}

/// AuthUser
///
/// The resolved identity of an authenticated request, attached to the GraphQL
/// request context once per request. Its presence is the only thing the guard
/// checks; resolvers read the id from it.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
}

/// TokenService
///
/// Issues and verifies the signed session tokens. Verification is stateless: a
/// signature and expiry check against the process-wide secret, with no session
/// store behind it.
#[derive(Clone)]
pub struct TokenService {
    secret: String,
}

impl TokenService {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// issue
    ///
    /// Encodes a signed token bound to the given account id. Called once at
    /// successful login.
    pub fn issue(&self, account_id: i64) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: account_id,
            iat: now as usize,
            exp: (now + TOKEN_TTL_SECS) as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
    }

    /// verify
    ///
    /// Decodes and validates a presented token. Any failure — malformed input,
    /// bad signature, expiry — resolves to `None`: the caller must treat it as
    /// "no identity", not as a request-level error.
    pub fn verify(&self, token: &str) -> Option<i64> {
        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());

        let mut validation = Validation::default();
        // Ensure expiration time validation is always active.
        validation.validate_exp = true;

        match decode::<Claims>(token, &decoding_key, &validation) {
            Ok(data) => Some(data.claims.sub),
            Err(e) => {
                match e.kind() {
                    // Token expired: the most common failure for a valid-but-old token.
                    ErrorKind::ExpiredSignature => {
                        tracing::debug!("rejected expired token");
                    }
                    // All other failure types (bad signature, malformed token, etc.).
                    kind => {
                        tracing::debug!("rejected invalid token: {:?}", kind);
                    }
                }
                None
            }
        }
    }
}

/// resolve_identity
///
/// Runs once per incoming request, before the schema executes. Reads the
/// optional caller-supplied token, verifies it, and confirms the account still
/// exists in the identity store — a valid token for a deleted account resolves
/// to no identity. The result is either `Anonymous` (None) or
/// `Authenticated(id)` (Some); nothing persists across requests beyond what
/// the token itself encodes.
pub async fn resolve_identity(
    headers: &HeaderMap,
    tokens: &TokenService,
    repo: &RepositoryState,
) -> Option<AuthUser> {
    let token = headers.get(TOKEN_HEADER).and_then(|v| v.to_str().ok())?;
    let account_id = tokens.verify(token)?;
    let account = repo.get_account(account_id).await?;
    Some(AuthUser { id: account.id })
}

/// AuthGuard
///
/// Field-level guard for operations annotated as requiring identity. It checks
/// only whether `resolve_identity` attached an `AuthUser` to the request and
/// rejects with the fixed message "Forbidden resource" otherwise. The
/// rejection surfaces in the GraphQL `errors` array, outside the response
/// envelope — intentionally distinct from every domain error, which is data.
pub struct AuthGuard;

impl Guard for AuthGuard {
    async fn check(&self, ctx: &Context<'_>) -> async_graphql::Result<()> {
        match ctx.data_opt::<AuthUser>() {
            Some(_) => Ok(()),
            None => Err(async_graphql::Error::new("Forbidden resource")),
        }
    }
}

// --- Password Hashing ---

/// Hashes a plaintext password with Argon2id and a fresh random salt. The
/// resulting PHC string is the only form in which a password is ever stored.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Verifies a plaintext password against a stored PHC hash string. An
/// unparseable hash counts as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}
