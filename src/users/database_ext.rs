mod raw_user;

pub(crate) use self::raw_user::RawUser;
use crate::{
    database::Database,
    users::{User, UserId},
};
use anyhow::Context;
use sqlx::{query, query_as};
use std::collections::HashMap;

/// Extends primary database with the user management-related methods.
impl Database {
    /// Retrieves all active users, keyed by id.
    pub async fn select_users_for_auth(&self) -> anyhow::Result<HashMap<UserId, User>> {
        query_as::<_, RawUser>(
            r#"
SELECT id, name, type, client_secret_hash, is_active
FROM users
WHERE is_active
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .with_context(|| "Failed to select users for authentication.")?
        .into_iter()
        .map(|raw_user| User::try_from(raw_user).map(|user| (user.id, user)))
        .collect()
    }

    /// Retrieves all active users ordered by name.
    pub async fn list_users(&self) -> anyhow::Result<Vec<User>> {
        query_as::<_, RawUser>(
            r#"
SELECT id, name, type, client_secret_hash, is_active
FROM users
WHERE is_active
ORDER BY name, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(User::try_from)
        .collect()
    }

    /// Retrieves active user using user ID.
    pub async fn get_user(&self, id: UserId) -> anyhow::Result<Option<User>> {
        query_as::<_, RawUser>(
            r#"
SELECT id, name, type, client_secret_hash, is_active
FROM users
WHERE id = $1 AND is_active
            "#,
        )
        .bind(*id)
        .fetch_optional(&self.pool)
        .await?
        .map(User::try_from)
        .transpose()
    }

    /// Inserts a new user.
    pub async fn insert_user(&self, user: &User) -> anyhow::Result<u64> {
        Ok(query(
            r#"
INSERT INTO users (id, name, type, client_secret_hash, is_active)
VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(*user.id)
        .bind(&user.name)
        .bind(user.user_type.as_str())
        .bind(&user.client_secret_hash)
        .bind(user.is_active)
        .execute(&self.pool)
        .await?
        .rows_affected())
    }

    /// Inserts a user or updates an existing one with the same id.
    pub async fn upsert_user(&self, user: &User) -> anyhow::Result<u64> {
        Ok(query(
            r#"
INSERT INTO users (id, name, type, client_secret_hash, is_active)
VALUES ($1, $2, $3, $4, $5)
ON CONFLICT (id) DO UPDATE
SET name = excluded.name, type = excluded.type, client_secret_hash = excluded.client_secret_hash,
    is_active = excluded.is_active, updated_at = NOW()
            "#,
        )
        .bind(*user.id)
        .bind(&user.name)
        .bind(user.user_type.as_str())
        .bind(&user.client_secret_hash)
        .bind(user.is_active)
        .execute(&self.pool)
        .await?
        .rows_affected())
    }

    /// Deprecates the latest access token of the user and deactivates the user. Returns the number
    /// of deactivated users and the id of the deprecated access token, if any.
    pub async fn delete_user(&self, id: UserId) -> anyhow::Result<(u64, Option<String>)> {
        let mut transaction = self.begin().await?;

        let deprecated_access_token =
            Database::deprecate_latest_access_token(&mut transaction, id).await?;
        let rows_affected = query(
            r#"
UPDATE users
SET is_active = FALSE, updated_at = NOW()
WHERE id = $1 AND is_active
            "#,
        )
        .bind(*id)
        .execute(&mut *transaction)
        .await?
        .rows_affected();

        transaction
            .commit()
            .await
            .with_context(|| "Failed to commit user deletion.")?;

        Ok((rows_affected, deprecated_access_token))
    }

    /// Replaces the client secret hash of an active user.
    pub async fn rotate_user_secret(
        &self,
        id: UserId,
        client_secret_hash: &str,
    ) -> anyhow::Result<u64> {
        Ok(query(
            r#"
UPDATE users
SET client_secret_hash = $2, updated_at = NOW()
WHERE id = $1 AND is_active
            "#,
        )
        .bind(*id)
        .bind(client_secret_hash)
        .execute(&self.pool)
        .await?
        .rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        database::Database,
        error::{Error as VaultError, ErrorKind},
        security::AccessToken,
        tests::{MockUserBuilder, mock_admin, mock_user},
        users::UserType,
    };
    use sqlx::PgPool;
    use std::time::Duration;
    use time::OffsetDateTime;
    use uuid::uuid;

    #[sqlx::test(migrations = "./migrations/primary")]
    async fn can_insert_and_retrieve_users(pool: PgPool) -> anyhow::Result<()> {
        let db = Database { pool };
        let user = mock_user()?;
        let admin = mock_admin()?;

        assert_eq!(db.insert_user(&user).await?, 1);
        assert_eq!(db.insert_user(&admin).await?, 1);
        assert_eq!(db.get_user(user.id).await?, Some(user.clone()));
        assert!(
            db.get_user(uuid!("00000000-0000-0000-0000-000000000099").into())
                .await?
                .is_none()
        );
        assert_eq!(db.list_users().await?, vec![admin.clone(), user.clone()]);

        let users = db.select_users_for_auth().await?;
        assert_eq!(users.len(), 2);
        assert_eq!(users.get(&admin.id), Some(&admin));

        let err = db.insert_user(&user).await.unwrap_err();
        assert_eq!(VaultError::from(err).kind(), ErrorKind::AlreadyExists);

        Ok(())
    }

    #[sqlx::test(migrations = "./migrations/primary")]
    async fn can_upsert_and_rotate_users(pool: PgPool) -> anyhow::Result<()> {
        let db = Database { pool };
        let user = mock_user()?;
        db.upsert_user(&user).await?;

        let updated_user = MockUserBuilder::new(user.id, "root")
            .set_type(UserType::Admin)
            .set_client_secret("root-secret")
            .build();
        db.upsert_user(&updated_user).await?;
        assert_eq!(db.get_user(user.id).await?, Some(updated_user.clone()));

        assert_eq!(db.rotate_user_secret(user.id, "sha256:00").await?, 1);
        assert_eq!(
            db.get_user(user.id)
                .await?
                .map(|user| user.client_secret_hash),
            Some("sha256:00".to_string())
        );

        Ok(())
    }

    #[sqlx::test(migrations = "./migrations/primary")]
    async fn deletes_users_with_their_latest_token(pool: PgPool) -> anyhow::Result<()> {
        let db = Database { pool };
        let user = mock_user()?;
        db.insert_user(&user).await?;

        // Users without tokens are deleted too.
        let admin = mock_admin()?;
        db.insert_user(&admin).await?;
        assert_eq!(db.delete_user(admin.id).await?, (1, None));

        db.rotate_access_token(&AccessToken {
            id: "sha256:aa".to_string(),
            user_id: user.id,
            invalid_at: OffsetDateTime::now_utc() + Duration::from_secs(3600),
            is_latest: true,
        })
        .await?;

        assert_eq!(
            db.delete_user(user.id).await?,
            (1, Some("sha256:aa".to_string()))
        );
        assert!(db.get_user(user.id).await?.is_none());
        assert!(db.select_users_for_auth().await?.is_empty());
        assert!(db.select_access_tokens_for_auth().await?.is_empty());

        // Deleted users stay deleted.
        assert_eq!(db.delete_user(user.id).await?, (0, None));
        assert_eq!(db.rotate_user_secret(user.id, "sha256:00").await?, 0);

        Ok(())
    }
}
