use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::model::{Account, Gender};

/// Request body for registration. Fields are optional so that missing
/// values surface as validation violations instead of a deserialization error.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email_id: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Request body for login.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email_id: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Query parameters for the unauthenticated account lookup.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupQuery {
    #[serde(default)]
    pub email_id: Option<String>,
}

/// Validated signup payload, email already trimmed and lowercased.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Partial update limited to the allow-listed profile fields.
#[derive(Debug, Default, Clone)]
pub struct ProfilePatch {
    pub photo_url: Option<String>,
    pub about: Option<String>,
    pub gender: Option<Gender>,
    pub age: Option<i32>,
    pub skills: Option<Vec<String>>,
}

/// Short account summary returned by signup and login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub user_id: Uuid,
    pub email: String,
    pub first_name: String,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            user_id: account.id,
            email: account.email.clone(),
            first_name: account.first_name.clone(),
        }
    }
}

/// Full profile view, sanitized: everything except the password hash.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email_id: String,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub photo_url: Option<String>,
    pub about: String,
    pub skills: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Account> for ProfileResponse {
    fn from(account: Account) -> Self {
        Self {
            user_id: account.id,
            first_name: account.first_name,
            last_name: account.last_name,
            email_id: account.email,
            age: account.age,
            gender: account.gender,
            photo_url: account.photo_url,
            about: account.about,
            skills: account.skills,
            created_at: account.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_account() -> Account {
        Account {
            id: Uuid::new_v4(),
            first_name: "Alice".into(),
            last_name: Some("A".into()),
            email: "a@x.com".into(),
            password_hash: "$argon2id$...".into(),
            age: Some(27),
            gender: Some(Gender::Female),
            photo_url: None,
            about: "default about of user".into(),
            skills: vec!["rust".into()],
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn summary_uses_camel_case_and_omits_password() {
        let summary = AccountSummary::from(&sample_account());
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"userId\""));
        assert!(json.contains("\"email\":\"a@x.com\""));
        assert!(json.contains("\"firstName\":\"Alice\""));
        assert!(!json.contains("password"));
    }

    #[test]
    fn profile_response_is_sanitized() {
        let profile = ProfileResponse::from(sample_account());
        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains("\"emailId\":\"a@x.com\""));
        assert!(json.contains("\"gender\":\"female\""));
        assert!(json.contains("\"createdAt\""));
        assert!(!json.contains("password"));
        assert!(!json.contains("argon2"));
    }

    #[test]
    fn signup_request_accepts_partial_bodies() {
        let payload: SignupRequest =
            serde_json::from_str(r#"{"emailId":"a@x.com"}"#).expect("partial body");
        assert_eq!(payload.email_id.as_deref(), Some("a@x.com"));
        assert!(payload.first_name.is_none());
        assert!(payload.password.is_none());
    }
}
