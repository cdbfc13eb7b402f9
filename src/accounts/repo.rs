use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use super::dto::{NewAccount, ProfilePatch};
use super::model::Account;
use crate::error::ApiError;

const ACCOUNT_COLUMNS: &str = "id, first_name, last_name, email, password_hash, \
     age, gender, photo_url, about, skills, created_at";

/// Insert failure, with the unique-email constraint split out so that a
/// signup losing a race to another request still reports a conflict.
#[derive(Debug, Error)]
pub enum CreateAccountError {
    #[error("email already registered")]
    DuplicateEmail,
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

impl From<CreateAccountError> for ApiError {
    fn from(e: CreateAccountError) -> Self {
        match e {
            CreateAccountError::DuplicateEmail => ApiError::Conflict,
            CreateAccountError::Db(e) => ApiError::Internal(e.into()),
        }
    }
}

impl Account {
    /// Find an account by its normalized email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(account)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(account)
    }

    /// Insert a new account with an already-hashed password. The store
    /// assigns the id, the about default and the creation timestamp.
    pub async fn create(
        db: &PgPool,
        new_account: &NewAccount,
        password_hash: &str,
    ) -> Result<Account, CreateAccountError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "INSERT INTO accounts (first_name, last_name, email, password_hash) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(&new_account.first_name)
        .bind(&new_account.last_name)
        .bind(&new_account.email)
        .bind(password_hash)
        .fetch_one(db)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                CreateAccountError::DuplicateEmail
            }
            _ => CreateAccountError::Db(e),
        })?;
        Ok(account)
    }

    pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<Account>> {
        let accounts = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY created_at DESC"
        ))
        .fetch_all(db)
        .await?;
        Ok(accounts)
    }

    /// Merge the allow-listed fields into the stored row. Absent patch
    /// fields keep their current value; created_at is never touched.
    pub async fn apply_patch(
        db: &PgPool,
        id: Uuid,
        patch: &ProfilePatch,
    ) -> anyhow::Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "UPDATE accounts SET \
                 photo_url = COALESCE($2, photo_url), \
                 about = COALESCE($3, about), \
                 gender = COALESCE($4, gender), \
                 age = COALESCE($5, age), \
                 skills = COALESCE($6, skills) \
             WHERE id = $1 \
             RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(id)
        .bind(&patch.photo_url)
        .bind(&patch.about)
        .bind(patch.gender)
        .bind(patch.age)
        .bind(&patch.skills)
        .fetch_optional(db)
        .await?;
        Ok(account)
    }

    /// Remove the account. Returns whether a row was actually deleted.
    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
