use axum::{extract::State, routing::post, Form, Json, Router};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use skylane_core::password;
use skylane_store::AccountRepository;

use crate::{error::AppError, state::{AppState, AuthConfig}};

/// The one claim a token carries: the account identity, plus expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub account_id: i32,
    pub exp: usize,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub account_id: i32,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// Form-encoded login (username carries the email). Unknown email and
/// wrong password are indistinguishable to the caller.
async fn login(
    State(state): State<AppState>,
    Form(credentials): Form<LoginForm>,
) -> Result<Json<TokenResponse>, AppError> {
    let account = AccountRepository::find_by_email(&state.db.pool, &credentials.username)
        .await?
        .ok_or_else(|| AppError::Forbidden("Invalid credentials.".to_string()))?;

    if !password::verify(&credentials.password, &account.password) {
        return Err(AppError::Forbidden("Invalid credentials.".to_string()));
    }

    let access_token = create_token(&state.auth, account.id)?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        account_id: account.id,
    }))
}

pub fn create_token(auth: &AuthConfig, account_id: i32) -> Result<String, AppError> {
    let exp = (Utc::now() + Duration::minutes(auth.token_minutes as i64)).timestamp() as usize;
    let claims = TokenClaims { account_id, exp };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(auth.secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(format!("Token encoding failed: {}", e)))
}

/// Fails closed: bad signature, malformed payload, missing claim and
/// expiry all collapse into 401, never a partial identity.
pub fn verify_token(auth: &AuthConfig, token: &str) -> Result<TokenClaims, AppError> {
    decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(auth.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            AppError::Unauthenticated("Token has expired".to_string())
        }
        _ => AppError::Unauthenticated("Could not validate credentials".to_string()),
    })
}

/// Strict-equality ownership guard. No roles, no overrides; runs before
/// any existence lookup so a non-owner learns nothing about the target.
pub fn ensure_owner(path_account_id: i32, claims: &TokenClaims) -> Result<(), AppError> {
    if path_account_id != claims.account_id {
        return Err(AppError::Forbidden(
            "Not authorized to perform this action".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_auth() -> AuthConfig {
        AuthConfig {
            secret: "unit-test-secret".to_string(),
            token_minutes: 30,
        }
    }

    #[test]
    fn issued_token_verifies_to_the_same_account() {
        let auth = test_auth();
        let token = create_token(&auth, 17).unwrap();
        let claims = verify_token(&auth, &token).unwrap();
        assert_eq!(claims.account_id, 17);
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let auth = test_auth();
        let mut token = create_token(&auth, 17).unwrap();
        // Flip the last character of the signature segment.
        let last = token.pop().unwrap();
        token.push(if last == 'A' { 'B' } else { 'A' });
        assert!(matches!(
            verify_token(&auth, &token),
            Err(AppError::Unauthenticated(_))
        ));
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let token = create_token(&test_auth(), 17).unwrap();
        let other = AuthConfig {
            secret: "different".to_string(),
            token_minutes: 30,
        };
        assert!(verify_token(&other, &token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let auth = test_auth();
        let claims = TokenClaims {
            account_id: 17,
            exp: (Utc::now() - Duration::hours(2)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(auth.secret.as_bytes()),
        )
        .unwrap();
        match verify_token(&auth, &token) {
            Err(AppError::Unauthenticated(msg)) => assert_eq!(msg, "Token has expired"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn token_without_identity_claim_is_rejected() {
        #[derive(Serialize)]
        struct Anonymous {
            exp: usize,
        }
        let auth = test_auth();
        let token = encode(
            &Header::default(),
            &Anonymous {
                exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
            },
            &EncodingKey::from_secret(auth.secret.as_bytes()),
        )
        .unwrap();
        assert!(verify_token(&auth, &token).is_err());
    }

    #[test]
    fn owner_check_is_strict_equality() {
        let claims = TokenClaims { account_id: 1, exp: 0 };
        assert!(ensure_owner(1, &claims).is_ok());
        assert!(matches!(
            ensure_owner(2, &claims),
            Err(AppError::Forbidden(_))
        ));
    }
}
