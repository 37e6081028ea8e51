use crate::{
    database::Database,
    user_groups::UserGroup,
    users::{User, UserId, database_ext::RawUser},
};
use sqlx::{query, query_as};
use uuid::Uuid;

#[derive(sqlx::FromRow, Debug)]
struct RawUserGroup {
    id: Uuid,
    name: String,
    created_by: Uuid,
    updated_by: Uuid,
}

impl From<RawUserGroup> for UserGroup {
    fn from(raw: RawUserGroup) -> Self {
        UserGroup {
            id: raw.id,
            name: raw.name,
            created_by: raw.created_by.into(),
            updated_by: raw.updated_by.into(),
        }
    }
}

/// Extends primary database with the user groups management methods.
impl Database {
    pub async fn insert_user_group(&self, user_group: &UserGroup) -> anyhow::Result<u64> {
        Ok(query(
            r#"
INSERT INTO user_groups (id, name, created_by, updated_by)
VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(user_group.id)
        .bind(&user_group.name)
        .bind(*user_group.created_by)
        .bind(*user_group.updated_by)
        .execute(&self.pool)
        .await?
        .rows_affected())
    }

    pub async fn list_user_groups(&self) -> anyhow::Result<Vec<UserGroup>> {
        Ok(query_as::<_, RawUserGroup>(
            r#"
SELECT id, name, created_by, updated_by
FROM user_groups
WHERE is_active
ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(UserGroup::from)
        .collect())
    }

    pub async fn get_user_group(&self, id: Uuid) -> anyhow::Result<Option<UserGroup>> {
        Ok(query_as::<_, RawUserGroup>(
            r#"
SELECT id, name, created_by, updated_by
FROM user_groups
WHERE id = $1 AND is_active
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(UserGroup::from))
    }

    pub async fn delete_user_group(&self, id: Uuid, deleted_by: UserId) -> anyhow::Result<u64> {
        Ok(query(
            r#"
UPDATE user_groups
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

    /// Adds a user to an active group, nothing is inserted if the group isn't active.
    pub async fn insert_user_group_member(
        &self,
        user_group_id: Uuid,
        user_id: UserId,
        created_by: UserId,
    ) -> anyhow::Result<u64> {
        Ok(query(
            r#"
INSERT INTO user_group_members (user_group_id, user_id, created_by, updated_by)
SELECT $1, $2, $3, $3
WHERE EXISTS (SELECT 1 FROM user_groups WHERE id = $1 AND is_active)
            "#,
        )
        .bind(user_group_id)
        .bind(*user_id)
        .bind(*created_by)
        .execute(&self.pool)
        .await?
        .rows_affected())
    }

    pub async fn delete_user_group_member(
        &self,
        user_group_id: Uuid,
        user_id: UserId,
        deleted_by: UserId,
    ) -> anyhow::Result<u64> {
        Ok(query(
            r#"
UPDATE user_group_members
SET is_active = FALSE, updated_by = $3, updated_at = NOW()
WHERE user_group_id = $1 AND user_id = $2 AND is_active
            "#,
        )
        .bind(user_group_id)
        .bind(*user_id)
        .bind(*deleted_by)
        .execute(&self.pool)
        .await?
        .rows_affected())
    }

    pub async fn list_users_in_group(&self, user_group_id: Uuid) -> anyhow::Result<Vec<User>> {
        query_as::<_, RawUser>(
            r#"
SELECT u.id, u.name, u.type, u.client_secret_hash, u.is_active
FROM users u
INNER JOIN user_group_members m ON m.user_id = u.id AND m.is_active
INNER JOIN user_groups g ON g.id = m.user_group_id AND g.is_active
WHERE m.user_group_id = $1 AND u.is_active
ORDER BY u.name, u.id
            "#,
        )
        .bind(user_group_id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(User::try_from)
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        database::Database,
        error::{Error as VaultError, ErrorKind},
        tests::{MockUserBuilder, mock_admin, mock_user},
        user_groups::UserGroup,
    };
    use sqlx::PgPool;
    use uuid::uuid;

    fn mock_user_group(name: &str) -> anyhow::Result<UserGroup> {
        let admin = mock_admin()?;
        Ok(UserGroup {
            id: uuid!("00000000-0000-0000-0000-000000000020"),
            name: name.to_string(),
            created_by: admin.id,
            updated_by: admin.id,
        })
    }

    #[sqlx::test(migrations = "./migrations/primary")]
    async fn can_manage_user_groups(pool: PgPool) -> anyhow::Result<()> {
        let db = Database { pool };
        let admin = mock_admin()?;
        db.insert_user(&admin).await?;

        let group = mock_user_group("backend")?;
        assert_eq!(db.insert_user_group(&group).await?, 1);
        assert_eq!(db.get_user_group(group.id).await?, Some(group.clone()));
        assert_eq!(db.list_user_groups().await?, vec![group.clone()]);

        let err = db
            .insert_user_group(&UserGroup {
                id: uuid!("00000000-0000-0000-0000-000000000021"),
                ..group.clone()
            })
            .await
            .unwrap_err();
        assert_eq!(VaultError::from(err).kind(), ErrorKind::AlreadyExists);

        assert_eq!(db.delete_user_group(group.id, admin.id).await?, 1);
        assert_eq!(db.delete_user_group(group.id, admin.id).await?, 0);
        assert!(db.get_user_group(group.id).await?.is_none());
        assert!(db.list_user_groups().await?.is_empty());

        Ok(())
    }

    #[sqlx::test(migrations = "./migrations/primary")]
    async fn can_manage_user_group_members(pool: PgPool) -> anyhow::Result<()> {
        let db = Database { pool };
        let admin = mock_admin()?;
        let user = mock_user()?;
        let inactive_user =
            MockUserBuilder::new(uuid!("00000000-0000-0000-0000-000000000003"), "gone")
                .set_inactive()
                .build();
        for user in [&admin, &user, &inactive_user] {
            db.insert_user(user).await?;
        }

        let group = mock_user_group("backend")?;
        db.insert_user_group(&group).await?;
        for member in [&user, &inactive_user] {
            assert_eq!(
                db.insert_user_group_member(group.id, member.id, admin.id)
                    .await?,
                1
            );
        }
        assert_eq!(db.list_users_in_group(group.id).await?, vec![user.clone()]);

        let err = db
            .insert_user_group_member(group.id, user.id, admin.id)
            .await
            .unwrap_err();
        assert_eq!(VaultError::from(err).kind(), ErrorKind::AlreadyExists);

        let err = db
            .insert_user_group_member(
                group.id,
                uuid!("00000000-0000-0000-0000-000000000099").into(),
                admin.id,
            )
            .await
            .unwrap_err();
        assert_eq!(VaultError::from(err).kind(), ErrorKind::ClientError);

        assert_eq!(
            db.delete_user_group_member(group.id, user.id, admin.id)
                .await?,
            1
        );
        assert_eq!(
            db.delete_user_group_member(group.id, user.id, admin.id)
                .await?,
            0
        );
        assert!(db.list_users_in_group(group.id).await?.is_empty());

        // Members can't be added to, or listed in, a deleted group.
        db.insert_user_group_member(group.id, user.id, admin.id)
            .await?;
        db.delete_user_group(group.id, admin.id).await?;
        assert!(db.list_users_in_group(group.id).await?.is_empty());
        assert_eq!(
            db.insert_user_group_member(group.id, admin.id, admin.id)
                .await?,
            0
        );

        Ok(())
    }
}
