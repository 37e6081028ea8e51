mod raw_secret;

use self::raw_secret::RawSecret;
use crate::{
    database::Database,
    pagination::Pagination,
    secrets::Secret,
    users::{User, UserId},
};
use sqlx::{query, query_as, query_scalar};
use uuid::Uuid;

/// Read access condition over secret `s`: `$1` is the user id and `$2` whether the user is an
/// admin. Every source is an `EXISTS` check, so a secret is returned once even if several grants
/// match.
const READ_ACCESS_CONDITION: &str = r#"
(
    $2
    OR s.created_by = $1
    OR EXISTS (
        SELECT 1 FROM secret_permissions sp
        WHERE sp.secret_id = s.id AND sp.user_id = $1 AND sp.is_active
    )
    OR EXISTS (
        SELECT 1 FROM secret_group_permissions sgp
        INNER JOIN user_groups ug ON ug.id = sgp.user_group_id AND ug.is_active
        INNER JOIN user_group_members ugm ON ugm.user_group_id = sgp.user_group_id AND ugm.is_active
        WHERE sgp.secret_id = s.id AND sgp.is_active AND ugm.user_id = $1
    )
)"#;

/// Extends primary database with the secrets and secret permissions management methods.
impl Database {
    /// Inserts a new secret, `secret.value` must hold the ciphertext.
    pub async fn insert_secret(&self, secret: &Secret) -> anyhow::Result<u64> {
        Ok(query(
            r#"
INSERT INTO secrets (id, name, value, description, created_by, updated_by)
VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(secret.id)
        .bind(&secret.name)
        .bind(&secret.value)
        .bind(&secret.description)
        .bind(*secret.created_by)
        .bind(*secret.updated_by)
        .execute(&self.pool)
        .await?
        .rows_affected())
    }

    /// Retrieves an active secret (with its ciphertext) by name if the user can read it.
    pub async fn get_secret_by_name(
        &self,
        user: &User,
        name: &str,
    ) -> anyhow::Result<Option<Secret>> {
        let sql = format!(
            r#"
SELECT s.id, s.name, s.value, s.description, s.created_by, s.updated_by
FROM secrets s
WHERE s.is_active AND s.name = $3 AND {READ_ACCESS_CONDITION}
            "#
        );

        Ok(query_as::<_, RawSecret>(&sql)
            .bind(*user.id)
            .bind(user.is_admin())
            .bind(name)
            .fetch_optional(&self.pool)
            .await?
            .map(Secret::from))
    }

    /// Retrieves the id of an active secret by name if the user can modify it.
    pub async fn get_secret_id_with_write_access(
        &self,
        user: &User,
        name: &str,
    ) -> anyhow::Result<Option<Uuid>> {
        Ok(query_scalar::<_, Uuid>(
            r#"
SELECT s.id
FROM secrets s
WHERE s.is_active AND s.name = $3 AND ($2 OR s.created_by = $1)
            "#,
        )
        .bind(*user.id)
        .bind(user.is_admin())
        .bind(name)
        .fetch_optional(&self.pool)
        .await?)
    }

    /// Deactivates a secret.
    pub async fn delete_secret(&self, id: Uuid, deleted_by: UserId) -> anyhow::Result<u64> {
        Ok(query(
            r#"
UPDATE secrets
SET is_active = FALSE, updated_by = $2, updated_at = NOW()
WHERE id = $1 AND is_active
            "#,
        )
        .bind(id)
        .bind(*deleted_by)
        .execute(&self.pool)
        .await?
        .rows_affected())
    }

    /// Lists metadata of the active secrets the user can read, without ciphertext.
    pub async fn list_secrets(
        &self,
        user: &User,
        pagination: Pagination,
    ) -> anyhow::Result<Vec<Secret>> {
        let sql = format!(
            r#"
SELECT s.id, s.name, NULL::TEXT AS value, s.description, s.created_by, s.updated_by
FROM secrets s
WHERE s.is_active AND {READ_ACCESS_CONDITION}
ORDER BY s.name
LIMIT $3 OFFSET $4
            "#
        );

        Ok(query_as::<_, RawSecret>(&sql)
            .bind(*user.id)
            .bind(user.is_admin())
            .bind(pagination.page_size)
            .bind(pagination.offset)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Secret::from)
            .collect())
    }

    /// Grants a user read access to a secret.
    pub async fn insert_secret_permission(
        &self,
        secret_id: Uuid,
        user_id: UserId,
        created_by: UserId,
    ) -> anyhow::Result<u64> {
        Ok(query(
            r#"
INSERT INTO secret_permissions (secret_id, user_id, created_by, updated_by)
VALUES ($1, $2, $3, $3)
            "#,
        )
        .bind(secret_id)
        .bind(*user_id)
        .bind(*created_by)
        .execute(&self.pool)
        .await?
        .rows_affected())
    }

    /// Revokes read access of a user to a secret.
    pub async fn delete_secret_permission(
        &self,
        secret_id: Uuid,
        user_id: UserId,
        deleted_by: UserId,
    ) -> anyhow::Result<u64> {
        Ok(query(
            r#"
UPDATE secret_permissions
SET is_active = FALSE, updated_by = $3, updated_at = NOW()
WHERE secret_id = $1 AND user_id = $2 AND is_active
            "#,
        )
        .bind(secret_id)
        .bind(*user_id)
        .bind(*deleted_by)
        .execute(&self.pool)
        .await?
        .rows_affected())
    }

    /// Grants members of a user group read access to a secret.
    pub async fn insert_secret_group_permission(
        &self,
        secret_id: Uuid,
        user_group_id: Uuid,
        created_by: UserId,
    ) -> anyhow::Result<u64> {
        Ok(query(
            r#"
INSERT INTO secret_group_permissions (secret_id, user_group_id, created_by, updated_by)
VALUES ($1, $2, $3, $3)
            "#,
        )
        .bind(secret_id)
        .bind(user_group_id)
        .bind(*created_by)
        .execute(&self.pool)
        .await?
        .rows_affected())
    }

    /// Revokes read access of a user group to a secret.
    pub async fn delete_secret_group_permission(
        &self,
        secret_id: Uuid,
        user_group_id: Uuid,
        deleted_by: UserId,
    ) -> anyhow::Result<u64> {
        Ok(query(
            r#"
UPDATE secret_group_permissions
SET is_active = FALSE, updated_by = $3, updated_at = NOW()
WHERE secret_id = $1 AND user_group_id = $2 AND is_active
            "#,
        )
        .bind(secret_id)
        .bind(user_group_id)
        .bind(*deleted_by)
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
        pagination::Pagination,
        secrets::Secret,
        tests::{MockUserBuilder, mock_admin},
        user_groups::UserGroup,
        users::{User, UserId},
    };
    use sqlx::PgPool;
    use uuid::{Uuid, uuid};

    fn mock_secret(id: Uuid, name: &str, created_by: UserId) -> Secret {
        Secret {
            id,
            name: name.to_string(),
            value: Some("deadbeef".to_string()),
            description: None,
            created_by,
            updated_by: created_by,
        }
    }

    async fn seed_users(db: &Database) -> anyhow::Result<(User, User, User)> {
        let owner = MockUserBuilder::new(uuid!("00000000-0000-0000-0000-000000000001"), "owner")
            .build();
        let reader = MockUserBuilder::new(uuid!("00000000-0000-0000-0000-000000000002"), "reader")
            .build();
        let admin = mock_admin()?;
        for user in [&owner, &reader, &admin] {
            db.insert_user(user).await?;
        }

        Ok((owner, reader, admin))
    }

    async fn insert_group(db: &Database, id: Uuid, created_by: UserId) -> anyhow::Result<()> {
        db.insert_user_group(&UserGroup {
            id,
            name: format!("group-{id}"),
            created_by,
            updated_by: created_by,
        })
        .await?;
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations/primary")]
    async fn resolves_read_access_from_every_source(pool: PgPool) -> anyhow::Result<()> {
        let db = Database { pool };
        let (owner, reader, admin) = seed_users(&db).await?;
        let secret = mock_secret(
            uuid!("00000000-0000-0000-0000-000000000010"),
            "db-pass",
            owner.id,
        );
        db.insert_secret(&secret).await?;

        assert_eq!(db.get_secret_by_name(&owner, "db-pass").await?, Some(secret.clone()));
        assert_eq!(db.get_secret_by_name(&admin, "db-pass").await?, Some(secret.clone()));
        assert!(db.get_secret_by_name(&reader, "db-pass").await?.is_none());
        assert!(
            db.list_secrets(&reader, Pagination::default())
                .await?
                .is_empty()
        );

        // Direct and group grants that match at the same time yield a single row.
        let group_id = uuid!("00000000-0000-0000-0000-000000000020");
        insert_group(&db, group_id, admin.id).await?;
        assert_eq!(
            db.insert_user_group_member(group_id, reader.id, admin.id)
                .await?,
            1
        );
        db.insert_secret_permission(secret.id, reader.id, owner.id)
            .await?;
        db.insert_secret_group_permission(secret.id, group_id, owner.id)
            .await?;
        assert_eq!(db.get_secret_by_name(&reader, "db-pass").await?, Some(secret.clone()));
        assert_eq!(
            db.list_secrets(&reader, Pagination::default())
                .await?
                .into_iter()
                .map(|secret| secret.id)
                .collect::<Vec<_>>(),
            vec![secret.id]
        );

        // Group grant alone is enough.
        assert_eq!(
            db.delete_secret_permission(secret.id, reader.id, owner.id)
                .await?,
            1
        );
        assert!(db.get_secret_by_name(&reader, "db-pass").await?.is_some());

        // Inactive membership doesn't grant anything.
        assert_eq!(
            db.delete_user_group_member(group_id, reader.id, admin.id)
                .await?,
            1
        );
        assert!(db.get_secret_by_name(&reader, "db-pass").await?.is_none());

        // Neither does an inactive group.
        db.insert_user_group_member(group_id, reader.id, admin.id)
            .await?;
        assert!(db.get_secret_by_name(&reader, "db-pass").await?.is_some());
        assert_eq!(db.delete_user_group(group_id, admin.id).await?, 1);
        assert!(db.get_secret_by_name(&reader, "db-pass").await?.is_none());
        assert!(
            db.list_secrets(&reader, Pagination::default())
                .await?
                .is_empty()
        );

        Ok(())
    }

    #[sqlx::test(migrations = "./migrations/primary")]
    async fn grants_never_confer_write_access(pool: PgPool) -> anyhow::Result<()> {
        let db = Database { pool };
        let (owner, reader, admin) = seed_users(&db).await?;
        let secret = mock_secret(
            uuid!("00000000-0000-0000-0000-000000000010"),
            "db-pass",
            owner.id,
        );
        db.insert_secret(&secret).await?;

        let group_id = uuid!("00000000-0000-0000-0000-000000000020");
        insert_group(&db, group_id, admin.id).await?;
        db.insert_user_group_member(group_id, reader.id, admin.id)
            .await?;
        db.insert_secret_permission(secret.id, reader.id, owner.id)
            .await?;
        db.insert_secret_group_permission(secret.id, group_id, owner.id)
            .await?;

        assert!(db.get_secret_by_name(&reader, "db-pass").await?.is_some());
        assert!(
            db.get_secret_id_with_write_access(&reader, "db-pass")
                .await?
                .is_none()
        );
        assert_eq!(
            db.get_secret_id_with_write_access(&owner, "db-pass")
                .await?,
            Some(secret.id)
        );
        assert_eq!(
            db.get_secret_id_with_write_access(&admin, "db-pass")
                .await?,
            Some(secret.id)
        );

        assert_eq!(db.delete_secret(secret.id, owner.id).await?, 1);
        assert_eq!(db.delete_secret(secret.id, owner.id).await?, 0);
        assert!(
            db.get_secret_id_with_write_access(&owner, "db-pass")
                .await?
                .is_none()
        );
        assert!(db.get_secret_by_name(&admin, "db-pass").await?.is_none());

        Ok(())
    }

    #[sqlx::test(migrations = "./migrations/primary")]
    async fn lists_secrets_without_values(pool: PgPool) -> anyhow::Result<()> {
        let db = Database { pool };
        let (owner, _, admin) = seed_users(&db).await?;
        for (index, name) in ["c-secret", "a-secret", "b-secret"].into_iter().enumerate() {
            db.insert_secret(&mock_secret(
                Uuid::from_u128(0x10 + index as u128),
                name,
                owner.id,
            ))
            .await?;
        }

        let secrets = db.list_secrets(&admin, Pagination::default()).await?;
        assert_eq!(
            secrets
                .iter()
                .map(|secret| secret.name.as_str())
                .collect::<Vec<_>>(),
            vec!["a-secret", "b-secret", "c-secret"]
        );
        assert!(secrets.iter().all(|secret| secret.value.is_none()));

        let page = db
            .list_secrets(
                &owner,
                Pagination {
                    page_size: 2,
                    offset: 1,
                },
            )
            .await?;
        assert_eq!(
            page.iter()
                .map(|secret| secret.name.as_str())
                .collect::<Vec<_>>(),
            vec!["b-secret", "c-secret"]
        );

        Ok(())
    }

    #[sqlx::test(migrations = "./migrations/primary")]
    async fn maps_constraint_violations(pool: PgPool) -> anyhow::Result<()> {
        let db = Database { pool };
        let (owner, reader, _) = seed_users(&db).await?;
        let secret = mock_secret(
            uuid!("00000000-0000-0000-0000-000000000010"),
            "db-pass",
            owner.id,
        );
        db.insert_secret(&secret).await?;

        let duplicate = mock_secret(
            uuid!("00000000-0000-0000-0000-000000000011"),
            "db-pass",
            owner.id,
        );
        let err = db.insert_secret(&duplicate).await.unwrap_err();
        assert_eq!(VaultError::from(err).kind(), ErrorKind::AlreadyExists);

        db.insert_secret_permission(secret.id, reader.id, owner.id)
            .await?;
        let err = db
            .insert_secret_permission(secret.id, reader.id, owner.id)
            .await
            .unwrap_err();
        assert_eq!(VaultError::from(err).kind(), ErrorKind::AlreadyExists);

        let err = db
            .insert_secret_permission(
                secret.id,
                uuid!("00000000-0000-0000-0000-000000000099").into(),
                owner.id,
            )
            .await
            .unwrap_err();
        assert_eq!(VaultError::from(err).kind(), ErrorKind::ClientError);

        // The name is free again once the secret is deleted.
        db.delete_secret(secret.id, owner.id).await?;
        assert_eq!(db.insert_secret(&duplicate).await?, 1);

        Ok(())
    }
}
