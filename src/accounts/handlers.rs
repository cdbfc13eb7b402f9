use axum::{
    extract::{FromRef, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::CookieJar;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        password::{hash_password, verify_password},
        session::{clear_session_cookie, session_cookie, CurrentAccount},
        token::SessionKeys,
    },
    db::AppState,
    error::{ApiError, FieldViolation},
};

use super::dto::{
    AccountSummary, LoginRequest, LookupQuery, ProfileResponse, SignupRequest,
};
use super::model::Account;
use super::validate::{self, normalize_email};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(profile))
        .route(
            "/user",
            get(lookup).patch(update_profile).delete(delete_account),
        )
        .route("/feed", get(feed))
}

#[instrument(skip(state, jar, payload))]
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, CookieJar, Json<AccountSummary>), ApiError> {
    let new_account = validate::validate_signup(&payload).map_err(|violations| {
        warn!(count = violations.len(), "signup validation failed");
        ApiError::Validation(violations)
    })?;

    // Ensure the email is not taken
    if Account::find_by_email(&state.db, &new_account.email)
        .await
        .map_err(ApiError::Internal)?
        .is_some()
    {
        warn!(email = %new_account.email, "email already registered");
        return Err(ApiError::Conflict);
    }

    let hash = hash_password(&new_account.password).map_err(ApiError::Internal)?;
    // The store's unique constraint catches signups racing past the pre-check.
    let account = Account::create(&state.db, &new_account, &hash)
        .await
        .map_err(ApiError::from)?;

    let keys = SessionKeys::from_ref(&state);
    let token = keys.issue(account.id).map_err(ApiError::Internal)?;
    let jar = jar.add(session_cookie(token, &state.config.session));

    info!(account_id = %account.id, email = %account.email, "account registered");
    Ok((StatusCode::CREATED, jar, Json(AccountSummary::from(&account))))
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AccountSummary>), ApiError> {
    let mut violations = Vec::new();
    let email = normalize_email(payload.email_id.as_deref().unwrap_or(""));
    if email.is_empty() {
        violations.push(FieldViolation::new("emailId", "emailId is required"));
    }
    let password = payload.password.as_deref().unwrap_or("");
    if password.is_empty() {
        violations.push(FieldViolation::new("password", "password is required"));
    }
    if !violations.is_empty() {
        return Err(ApiError::Validation(violations));
    }

    // Unknown email and wrong password are deliberately indistinguishable.
    let account = match Account::find_by_email(&state.db, &email)
        .await
        .map_err(ApiError::Internal)?
    {
        Some(a) => a,
        None => {
            warn!(email = %email, "login with unknown email");
            return Err(ApiError::InvalidCredentials);
        }
    };

    let ok = verify_password(password, &account.password_hash).map_err(ApiError::Internal)?;
    if !ok {
        warn!(account_id = %account.id, "login with invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let keys = SessionKeys::from_ref(&state);
    let token = keys.issue(account.id).map_err(ApiError::Internal)?;
    let jar = jar.add(session_cookie(token, &state.config.session));

    info!(account_id = %account.id, email = %account.email, "account logged in");
    Ok((jar, Json(AccountSummary::from(&account))))
}

#[instrument(skip_all)]
pub async fn profile(
    CurrentAccount(account): CurrentAccount,
) -> Result<Json<ProfileResponse>, ApiError> {
    Ok(Json(ProfileResponse::from(account)))
}

#[instrument(skip(state))]
pub async fn lookup(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let email = normalize_email(query.email_id.as_deref().unwrap_or(""));
    if email.is_empty() {
        return Err(ApiError::Validation(vec![FieldViolation::new(
            "emailId",
            "emailId is required",
        )]));
    }

    let account = Account::find_by_email(&state.db, &email)
        .await
        .map_err(ApiError::Internal)?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(ProfileResponse::from(account)))
}

#[instrument(skip(state))]
pub async fn feed(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProfileResponse>>, ApiError> {
    let accounts = Account::list_all(&state.db)
        .await
        .map_err(ApiError::Internal)?;
    let profiles = accounts.into_iter().map(ProfileResponse::from).collect();
    Ok(Json(profiles))
}

#[instrument(skip(state, account, body))]
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let object = body.as_object().ok_or_else(|| {
        ApiError::Validation(vec![FieldViolation::new("body", "body must be a JSON object")])
    })?;

    let patch = validate::parse_profile_patch(object).map_err(|violations| {
        warn!(account_id = %account.id, count = violations.len(), "profile patch rejected");
        ApiError::Validation(violations)
    })?;

    // Updates are scoped to the authenticated account only.
    let updated = Account::apply_patch(&state.db, account.id, &patch)
        .await
        .map_err(ApiError::Internal)?
        .ok_or(ApiError::NotFound)?;

    info!(account_id = %updated.id, "profile updated");
    Ok(Json(ProfileResponse::from(updated)))
}

#[instrument(skip(state, account, jar))]
pub async fn delete_account(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    jar: CookieJar,
) -> Result<(StatusCode, CookieJar), ApiError> {
    let deleted = Account::delete(&state.db, account.id)
        .await
        .map_err(ApiError::Internal)?;
    if !deleted {
        return Err(ApiError::NotFound);
    }

    info!(account_id = %account.id, "account deleted");
    let jar = jar.add(clear_session_cookie());
    Ok((StatusCode::NO_CONTENT, jar))
}
