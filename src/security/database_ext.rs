use crate::{database::Database, security::AccessToken, users::UserId};
use anyhow::Context;
use sqlx::{PgConnection, query, query_as, query_scalar};
use std::collections::HashMap;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(sqlx::FromRow, Debug)]
struct RawAccessToken {
    id_hash: String,
    user_id: Uuid,
    invalid_at: OffsetDateTime,
    is_latest: bool,
}

impl From<RawAccessToken> for AccessToken {
    fn from(raw: RawAccessToken) -> Self {
        AccessToken {
            id: raw.id_hash,
            user_id: raw.user_id.into(),
            invalid_at: raw.invalid_at,
            is_latest: raw.is_latest,
        }
    }
}

/// Extends primary database with the access token management methods.
impl Database {
    /// Retrieves latest, non-expired access tokens, keyed by id.
    pub async fn select_access_tokens_for_auth(
        &self,
    ) -> anyhow::Result<HashMap<String, AccessToken>> {
        Ok(query_as::<_, RawAccessToken>(
            r#"
SELECT id_hash, user_id, invalid_at, is_latest
FROM access_tokens
WHERE is_latest AND invalid_at > NOW()
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .with_context(|| "Failed to select access tokens for authentication.")?
        .into_iter()
        .map(|raw| (raw.id_hash.clone(), AccessToken::from(raw)))
        .collect())
    }

    /// Deprecates the latest access token of the user and stores the new one in one transaction.
    /// Returns the id of the deprecated token, if any.
    pub async fn rotate_access_token(
        &self,
        access_token: &AccessToken,
    ) -> anyhow::Result<Option<String>> {
        let mut transaction = self.begin().await?;

        let deprecated_access_token =
            Database::deprecate_latest_access_token(&mut transaction, access_token.user_id)
                .await?;
        Database::insert_access_token(&mut transaction, access_token).await?;

        transaction
            .commit()
            .await
            .with_context(|| "Failed to commit access token rotation.")?;

        Ok(deprecated_access_token)
    }

    /// Marks the latest access token of the user as not latest. Meant to run inside a transaction
    /// owned by the caller.
    pub(crate) async fn deprecate_latest_access_token(
        connection: &mut PgConnection,
        user_id: UserId,
    ) -> anyhow::Result<Option<String>> {
        Ok(query_scalar::<_, String>(
            r#"
UPDATE access_tokens
SET is_latest = FALSE
WHERE user_id = $1 AND is_latest
RETURNING id_hash
            "#,
        )
        .bind(*user_id)
        .fetch_optional(connection)
        .await?)
    }

    /// Inserts an access token. Meant to run inside a transaction owned by the caller.
    pub(crate) async fn insert_access_token(
        connection: &mut PgConnection,
        access_token: &AccessToken,
    ) -> anyhow::Result<u64> {
        Ok(query(
            r#"
INSERT INTO access_tokens (id_hash, user_id, is_latest, invalid_at)
VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&access_token.id)
        .bind(*access_token.user_id)
        .bind(access_token.is_latest)
        .bind(access_token.invalid_at)
        .execute(connection)
        .await?
        .rows_affected())
    }
}
