use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};

use super::dto::{NewAccount, ProfilePatch, SignupRequest};
use super::model::Gender;
use crate::error::FieldViolation;

/// Fields a profile update may touch. Everything else is rejected.
pub const PATCH_ALLOW_LIST: &[&str] = &["photoUrl", "about", "gender", "age", "skills"];

pub const MAX_SKILLS: usize = 10;
pub const MIN_AGE: i64 = 18;
const FIRST_NAME_MIN: usize = 4;
const FIRST_NAME_MAX: usize = 50;
const PASSWORD_MIN: usize = 8;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Checks every signup constraint and reports all violations at once.
/// On success returns the payload with the email normalized.
pub fn validate_signup(payload: &SignupRequest) -> Result<NewAccount, Vec<FieldViolation>> {
    let mut violations = Vec::new();

    let first_name = payload.first_name.as_deref().unwrap_or("").trim();
    if first_name.is_empty() {
        violations.push(FieldViolation::new("firstName", "firstName is required"));
    } else if first_name.chars().count() < FIRST_NAME_MIN
        || first_name.chars().count() > FIRST_NAME_MAX
    {
        violations.push(FieldViolation::new(
            "firstName",
            "firstName must be between 4 and 50 characters",
        ));
    }

    let last_name = payload.last_name.as_deref().unwrap_or("").trim();
    if last_name.is_empty() {
        violations.push(FieldViolation::new("lastName", "lastName is required"));
    }

    let email = normalize_email(payload.email_id.as_deref().unwrap_or(""));
    if email.is_empty() {
        violations.push(FieldViolation::new("emailId", "emailId is required"));
    } else if !is_valid_email(&email) {
        violations.push(FieldViolation::new("emailId", "emailId is not a valid email"));
    }

    let password = payload.password.as_deref().unwrap_or("");
    if password.is_empty() {
        violations.push(FieldViolation::new("password", "password is required"));
    } else if password.len() < PASSWORD_MIN {
        violations.push(FieldViolation::new(
            "password",
            "password must be at least 8 characters",
        ));
    }

    if !violations.is_empty() {
        return Err(violations);
    }

    Ok(NewAccount {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email,
        password: password.to_string(),
    })
}

/// Turns a raw JSON object into a typed patch, rejecting any key outside
/// the allow-list and any value that breaks a field constraint.
pub fn parse_profile_patch(body: &Map<String, Value>) -> Result<ProfilePatch, Vec<FieldViolation>> {
    let mut violations = Vec::new();
    let mut patch = ProfilePatch::default();

    for key in body.keys() {
        if !PATCH_ALLOW_LIST.contains(&key.as_str()) {
            violations.push(FieldViolation::new(key, "field is not updatable"));
        }
    }

    if let Some(value) = body.get("photoUrl") {
        match value.as_str() {
            Some(s) => patch.photo_url = Some(s.to_string()),
            None => violations.push(FieldViolation::new("photoUrl", "photoUrl must be a string")),
        }
    }

    if let Some(value) = body.get("about") {
        match value.as_str() {
            Some(s) => patch.about = Some(s.to_string()),
            None => violations.push(FieldViolation::new("about", "about must be a string")),
        }
    }

    if let Some(value) = body.get("gender") {
        match serde_json::from_value::<Gender>(value.clone()) {
            Ok(g) => patch.gender = Some(g),
            Err(_) => violations.push(FieldViolation::new(
                "gender",
                "gender must be male, female or others",
            )),
        }
    }

    if let Some(value) = body.get("age") {
        match value.as_i64() {
            Some(age) if age >= MIN_AGE && age <= i32::MAX as i64 => {
                patch.age = Some(age as i32);
            }
            _ => violations.push(FieldViolation::new(
                "age",
                "age must be an integer of at least 18",
            )),
        }
    }

    if let Some(value) = body.get("skills") {
        match value.as_array() {
            Some(entries) if entries.len() <= MAX_SKILLS => {
                let mut skills = Vec::with_capacity(entries.len());
                for entry in entries {
                    match entry.as_str() {
                        Some(s) => skills.push(s.to_string()),
                        None => {
                            violations.push(FieldViolation::new(
                                "skills",
                                "skills must be an array of strings",
                            ));
                            break;
                        }
                    }
                }
                if skills.len() == entries.len() {
                    patch.skills = Some(skills);
                }
            }
            Some(_) => violations.push(FieldViolation::new(
                "skills",
                "skills can hold at most 10 entries",
            )),
            None => violations.push(FieldViolation::new(
                "skills",
                "skills must be an array of strings",
            )),
        }
    }

    if violations.is_empty() {
        Ok(patch)
    } else {
        Err(violations)
    }
}
