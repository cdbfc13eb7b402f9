use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Allowed gender values; anything else fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "gender", rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Others,
}

/// Account row in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub photo_url: Option<String>,
    pub about: String,
    pub skills: Vec<String>,
    pub created_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_parses_lowercase_values() {
        for (raw, want) in [
            ("\"male\"", Gender::Male),
            ("\"female\"", Gender::Female),
            ("\"others\"", Gender::Others),
        ] {
            let parsed: Gender = serde_json::from_str(raw).expect("valid gender");
            assert_eq!(parsed, want);
        }
    }

    #[test]
    fn gender_rejects_unknown_values() {
        assert!(serde_json::from_str::<Gender>("\"other\"").is_err());
        assert!(serde_json::from_str::<Gender>("\"MALE\"").is_err());
        assert!(serde_json::from_str::<Gender>("42").is_err());
    }

    #[test]
    fn account_serialization_never_includes_password_hash() {
        let account = Account {
            id: Uuid::new_v4(),
            first_name: "Alice".into(),
            last_name: Some("A".into()),
            email: "a@x.com".into(),
            password_hash: "$argon2id$...".into(),
            age: Some(30),
            gender: None,
            photo_url: None,
            about: "default about of user".into(),
            skills: vec![],
            created_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("argon2"));
    }
}
