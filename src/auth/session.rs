use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration as TimeDuration;
use tracing::warn;

use super::token::SessionKeys;
use super::SESSION_COOKIE;
use crate::accounts::model::Account;
use crate::config::SessionConfig;
use crate::db::AppState;
use crate::error::ApiError;

/// Session gate: extracts the session cookie, validates the token and
/// resolves it to a live account before the handler runs.
pub struct CurrentAccount(pub Account);

#[async_trait]
impl FromRequestParts<AppState> for CurrentAccount {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .ok_or(ApiError::Unauthenticated)?;

        let keys = SessionKeys::from_ref(state);
        let claims = keys.verify(&token).map_err(|_| {
            warn!("invalid or expired session token");
            ApiError::InvalidToken
        })?;

        // The account may have been deleted after the token was issued.
        let account = Account::find_by_id(&state.db, claims.sub)
            .await
            .map_err(ApiError::Internal)?
            .ok_or(ApiError::NotFound)?;

        Ok(CurrentAccount(account))
    }
}

/// Builds the session cookie: HTTP-only, strict same-site, lifetime
/// matching the token's own expiry.
pub fn session_cookie(token: String, config: &SessionConfig) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(config.cookie_secure)
        .path("/")
        .max_age(TimeDuration::hours(config.ttl_hours))
        .build()
}

/// An immediately-expiring replacement cookie, used when the account is
/// removed and the session must not outlive it.
pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .http_only(true)
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(TimeDuration::ZERO)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;

    fn config() -> SessionConfig {
        SessionConfig {
            secret: "unit-test-secret-of-sufficient-length".into(),
            issuer: "test-issuer".into(),
            ttl_hours: 24,
            cookie_secure: false,
        }
    }

    #[test]
    fn session_cookie_attributes() {
        let cookie = session_cookie("signed-token".into(), &config());
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "signed-token");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.secure(), Some(false));
        assert_eq!(cookie.max_age(), Some(TimeDuration::hours(24)));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[test]
    fn session_cookie_is_secure_in_production() {
        let mut cfg = config();
        cfg.cookie_secure = true;
        let cookie = session_cookie("signed-token".into(), &cfg);
        assert_eq!(cookie.secure(), Some(true));
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        let cookie = clear_session_cookie();
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(TimeDuration::ZERO));
    }

    mod guard {
        use super::*;
        use crate::auth::token::Claims;
        use axum::http::Request;
        use time::OffsetDateTime;
        use uuid::Uuid;

        fn parts_with_cookie(cookie: Option<String>) -> axum::http::request::Parts {
            let mut builder = Request::builder().uri("/profile");
            if let Some(cookie) = cookie {
                builder = builder.header("cookie", cookie);
            }
            let (parts, _) = builder.body(()).expect("build request").into_parts();
            parts
        }

        #[tokio::test]
        async fn rejects_request_without_cookie() {
            let state = AppState::fake();
            let mut parts = parts_with_cookie(None);
            let result = CurrentAccount::from_request_parts(&mut parts, &state).await;
            assert!(matches!(result, Err(ApiError::Unauthenticated)));
        }

        #[tokio::test]
        async fn rejects_malformed_token() {
            let state = AppState::fake();
            let mut parts = parts_with_cookie(Some("token=abc".into()));
            let result = CurrentAccount::from_request_parts(&mut parts, &state).await;
            assert!(matches!(result, Err(ApiError::InvalidToken)));
        }

        #[tokio::test]
        async fn rejects_well_formed_but_expired_token() {
            let state = AppState::fake();
            let keys = SessionKeys::from_ref(&state);
            let now = OffsetDateTime::now_utc();
            let claims = Claims {
                sub: Uuid::new_v4(),
                iat: (now - TimeDuration::hours(2)).unix_timestamp() as usize,
                exp: (now - TimeDuration::hours(1)).unix_timestamp() as usize,
                iss: "test-issuer".into(),
            };
            let token = jsonwebtoken::encode(
                &jsonwebtoken::Header::default(),
                &claims,
                &keys.encoding,
            )
            .expect("encode expired token");

            let mut parts = parts_with_cookie(Some(format!("token={token}")));
            let result = CurrentAccount::from_request_parts(&mut parts, &state).await;
            assert!(matches!(result, Err(ApiError::InvalidToken)));
        }
    }
}
