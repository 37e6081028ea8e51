use crate::{
    access_logs::{AccessLog, AccessLogsFilter},
    config::DatabaseConfig,
    database,
    key_vault::KeyVault,
    secrets::KeyMaterial,
};
use anyhow::Context;
use futures::future::BoxFuture;
use sqlx::{PgPool, migrate::Migrator, query, query_as};
use time::OffsetDateTime;
use uuid::Uuid;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations/key_vault");

#[derive(sqlx::FromRow, Debug)]
struct RawKeyMaterial {
    id: Uuid,
    key: String,
    iv: String,
}

#[derive(sqlx::FromRow, Debug)]
struct RawAccessLog {
    user_id: Uuid,
    action_type: String,
    key_name: String,
    access_at: OffsetDateTime,
}

impl TryFrom<RawAccessLog> for AccessLog {
    type Error = anyhow::Error;

    fn try_from(raw: RawAccessLog) -> Result<Self, Self::Error> {
        Ok(AccessLog {
            user_id: raw.user_id.into(),
            action_type: raw.action_type.parse()?,
            key_name: raw.key_name,
            access_at: raw.access_at,
        })
    }
}

/// Key vault backed by a dedicated Postgres database.
#[derive(Clone)]
pub struct KeyVaultDatabase {
    pool: PgPool,
}

impl KeyVaultDatabase {
    /// Connects to the key vault database and applies pending migrations.
    pub async fn open(config: &DatabaseConfig) -> anyhow::Result<Self> {
        let pool = database::connect(config).await?;
        MIGRATOR
            .run(&pool)
            .await
            .with_context(|| "Failed to migrate key vault database.")?;

        Ok(Self { pool })
    }

    async fn insert_key_material(&self, key_material: &KeyMaterial) -> anyhow::Result<u64> {
        Ok(query(
            r#"
INSERT INTO key_materials (id, key, iv)
VALUES ($1, $2, $3)
            "#,
        )
        .bind(key_material.id)
        .bind(&key_material.key)
        .bind(&key_material.iv)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to store key material `{}`.", key_material.id))?
        .rows_affected())
    }

    async fn get_key_material(&self, id: Uuid) -> anyhow::Result<Option<KeyMaterial>> {
        Ok(query_as::<_, RawKeyMaterial>(
            r#"
SELECT id, key, iv
FROM key_materials
WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(|raw| KeyMaterial {
            id: raw.id,
            key: raw.key,
            iv: raw.iv,
        }))
    }

    async fn log_access(&self, access_log: &AccessLog) -> anyhow::Result<u64> {
        Ok(query(
            r#"
INSERT INTO access_logs (user_id, action_type, key_name, access_at)
VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(*access_log.user_id)
        .bind(access_log.action_type.as_str())
        .bind(&access_log.key_name)
        .bind(access_log.access_at)
        .execute(&self.pool)
        .await?
        .rows_affected())
    }

    async fn list_access_logs(&self, filter: &AccessLogsFilter) -> anyhow::Result<Vec<AccessLog>> {
        query_as::<_, RawAccessLog>(
            r#"
SELECT user_id, action_type, key_name, access_at
FROM access_logs
WHERE user_id = $1 AND access_at BETWEEN $2 AND $3
ORDER BY access_at DESC, id DESC
LIMIT $4 OFFSET $5
            "#,
        )
        .bind(*filter.user_id)
        .bind(filter.start_date)
        .bind(filter.end_date)
        .bind(filter.pagination.page_size)
        .bind(filter.pagination.offset)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(AccessLog::try_from)
        .collect()
    }
}

impl KeyVault for KeyVaultDatabase {
    fn insert_key_material<'a>(
        &'a self,
        key_material: &'a KeyMaterial,
    ) -> BoxFuture<'a, anyhow::Result<u64>> {
        Box::pin(KeyVaultDatabase::insert_key_material(self, key_material))
    }

    fn get_key_material<'a>(
        &'a self,
        id: Uuid,
    ) -> BoxFuture<'a, anyhow::Result<Option<KeyMaterial>>> {
        Box::pin(KeyVaultDatabase::get_key_material(self, id))
    }

    fn log_access<'a>(&'a self, access_log: &'a AccessLog) -> BoxFuture<'a, anyhow::Result<u64>> {
        Box::pin(KeyVaultDatabase::log_access(self, access_log))
    }

    fn list_access_logs<'a>(
        &'a self,
        filter: &'a AccessLogsFilter,
    ) -> BoxFuture<'a, anyhow::Result<Vec<AccessLog>>> {
        Box::pin(KeyVaultDatabase::list_access_logs(self, filter))
    }
}

#[cfg(test)]
mod tests {
    use super::KeyVaultDatabase;
    use crate::{
        access_logs::{AccessLog, AccessLogAction, AccessLogsFilter},
        pagination::Pagination,
        secrets::KeyMaterial,
        tests::mock_user,
    };
    use sqlx::PgPool;
    use std::time::Duration;
    use time::OffsetDateTime;
    use uuid::uuid;

    #[sqlx::test(migrations = "./migrations/key_vault")]
    async fn can_store_key_materials(pool: PgPool) -> anyhow::Result<()> {
        let key_vault = KeyVaultDatabase { pool };
        let key_material = KeyMaterial {
            id: uuid!("00000000-0000-0000-0000-000000000010"),
            key: "00".repeat(32),
            iv: "01".repeat(32),
        };

        assert!(key_vault.get_key_material(key_material.id).await?.is_none());
        assert_eq!(key_vault.insert_key_material(&key_material).await?, 1);
        assert_eq!(
            key_vault.get_key_material(key_material.id).await?,
            Some(key_material.clone())
        );
        assert!(key_vault.insert_key_material(&key_material).await.is_err());

        Ok(())
    }

    #[sqlx::test(migrations = "./migrations/key_vault")]
    async fn lists_access_logs_newest_first(pool: PgPool) -> anyhow::Result<()> {
        let key_vault = KeyVaultDatabase { pool };
        let user = mock_user()?;

        // January 1, 2010 11:00:00
        let start = OffsetDateTime::from_unix_timestamp(1262340000)?;
        let actions = [
            AccessLogAction::Create,
            AccessLogAction::Grant,
            AccessLogAction::Read,
            AccessLogAction::Revoke,
            AccessLogAction::Delete,
        ];
        for (index, action) in actions.into_iter().enumerate() {
            key_vault
                .log_access(&AccessLog {
                    user_id: user.id,
                    action_type: action,
                    key_name: "db-pass".to_string(),
                    access_at: start + Duration::from_secs(60 * index as u64),
                })
                .await?;
        }
        key_vault
            .log_access(&AccessLog {
                user_id: uuid!("00000000-0000-0000-0000-000000000002").into(),
                action_type: AccessLogAction::Read,
                key_name: "db-pass".to_string(),
                access_at: start,
            })
            .await?;

        let filter = AccessLogsFilter {
            user_id: user.id,
            pagination: Pagination::default(),
            start_date: OffsetDateTime::UNIX_EPOCH,
            end_date: start + Duration::from_secs(3600),
        };
        let logs = key_vault.list_access_logs(&filter).await?;
        assert_eq!(
            logs.iter().map(|log| log.action_type).collect::<Vec<_>>(),
            actions.into_iter().rev().collect::<Vec<_>>()
        );
        assert_eq!(logs[4].access_at, start);

        let logs = key_vault
            .list_access_logs(&AccessLogsFilter {
                pagination: Pagination {
                    page_size: 2,
                    offset: 1,
                },
                start_date: start + Duration::from_secs(60),
                ..filter
            })
            .await?;
        assert_eq!(
            logs.iter().map(|log| log.action_type).collect::<Vec<_>>(),
            vec![AccessLogAction::Revoke, AccessLogAction::Read]
        );

        Ok(())
    }
}
