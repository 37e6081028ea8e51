mod relational_store;

pub use self::relational_store::RelationalStore;
use crate::{
    config::DatabaseConfig,
    pagination::Pagination,
    secrets::Secret,
    security::AccessToken,
    user_groups::UserGroup,
    users::{User, UserId},
};
use anyhow::Context;
use futures::future::BoxFuture;
use sqlx::{
    PgPool, Postgres, Transaction,
    migrate::Migrator,
    postgres::{PgConnectOptions, PgPoolOptions},
};
use std::collections::HashMap;
use uuid::Uuid;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations/primary");

/// Primary (relational) database: users, access tokens, secrets, permissions and groups.
#[derive(Clone)]
pub struct Database {
    pub(crate) pool: PgPool,
}

/// Common methods for the primary database, extensions are implemented separately in every module.
impl Database {
    /// Connects to the database and applies pending migrations.
    pub async fn open(config: &DatabaseConfig) -> anyhow::Result<Self> {
        let pool = connect(config).await?;
        MIGRATOR
            .run(&pool)
            .await
            .with_context(|| "Failed to migrate primary database.")?;

        Ok(Database { pool })
    }

    /// Starts a `READ COMMITTED` transaction. Dropping it without a commit rolls it back.
    pub(crate) async fn begin(&self) -> anyhow::Result<Transaction<'static, Postgres>> {
        let mut transaction = self
            .pool
            .begin()
            .await
            .with_context(|| "Failed to start transaction.")?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL READ COMMITTED")
            .execute(&mut *transaction)
            .await?;

        Ok(transaction)
    }
}

/// Builds a connection pool for the configured Postgres database.
pub(crate) async fn connect(config: &DatabaseConfig) -> anyhow::Result<PgPool> {
    let mut options = PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.username)
        .database(&config.name);
    if let Some(ref password) = config.password {
        options = options.password(password);
    }

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to database `{}` at {}:{}.",
                config.name, config.host, config.port
            )
        })
}

impl RelationalStore for Database {
    fn select_users_for_auth<'a>(&'a self) -> BoxFuture<'a, anyhow::Result<HashMap<UserId, User>>> {
        Box::pin(Database::select_users_for_auth(self))
    }

    fn list_users<'a>(&'a self) -> BoxFuture<'a, anyhow::Result<Vec<User>>> {
        Box::pin(Database::list_users(self))
    }

    fn get_user<'a>(&'a self, id: UserId) -> BoxFuture<'a, anyhow::Result<Option<User>>> {
        Box::pin(Database::get_user(self, id))
    }

    fn insert_user<'a>(&'a self, user: &'a User) -> BoxFuture<'a, anyhow::Result<u64>> {
        Box::pin(Database::insert_user(self, user))
    }

    fn upsert_user<'a>(&'a self, user: &'a User) -> BoxFuture<'a, anyhow::Result<u64>> {
        Box::pin(Database::upsert_user(self, user))
    }

    fn delete_user<'a>(
        &'a self,
        id: UserId,
    ) -> BoxFuture<'a, anyhow::Result<(u64, Option<String>)>> {
        Box::pin(Database::delete_user(self, id))
    }

    fn rotate_user_secret<'a>(
        &'a self,
        id: UserId,
        client_secret_hash: &'a str,
    ) -> BoxFuture<'a, anyhow::Result<u64>> {
        Box::pin(Database::rotate_user_secret(self, id, client_secret_hash))
    }

    fn select_access_tokens_for_auth<'a>(
        &'a self,
    ) -> BoxFuture<'a, anyhow::Result<HashMap<String, AccessToken>>> {
        Box::pin(Database::select_access_tokens_for_auth(self))
    }

    fn rotate_access_token<'a>(
        &'a self,
        access_token: &'a AccessToken,
    ) -> BoxFuture<'a, anyhow::Result<Option<String>>> {
        Box::pin(Database::rotate_access_token(self, access_token))
    }

    fn insert_secret<'a>(&'a self, secret: &'a Secret) -> BoxFuture<'a, anyhow::Result<u64>> {
        Box::pin(Database::insert_secret(self, secret))
    }

    fn get_secret_by_name<'a>(
        &'a self,
        user: &'a User,
        name: &'a str,
    ) -> BoxFuture<'a, anyhow::Result<Option<Secret>>> {
        Box::pin(Database::get_secret_by_name(self, user, name))
    }

    fn get_secret_id_with_write_access<'a>(
        &'a self,
        user: &'a User,
        name: &'a str,
    ) -> BoxFuture<'a, anyhow::Result<Option<Uuid>>> {
        Box::pin(Database::get_secret_id_with_write_access(self, user, name))
    }

    fn delete_secret<'a>(
        &'a self,
        id: Uuid,
        deleted_by: UserId,
    ) -> BoxFuture<'a, anyhow::Result<u64>> {
        Box::pin(Database::delete_secret(self, id, deleted_by))
    }

    fn list_secrets<'a>(
        &'a self,
        user: &'a User,
        pagination: Pagination,
    ) -> BoxFuture<'a, anyhow::Result<Vec<Secret>>> {
        Box::pin(Database::list_secrets(self, user, pagination))
    }

    fn insert_secret_permission<'a>(
        &'a self,
        secret_id: Uuid,
        user_id: UserId,
        created_by: UserId,
    ) -> BoxFuture<'a, anyhow::Result<u64>> {
        Box::pin(Database::insert_secret_permission(
            self, secret_id, user_id, created_by,
        ))
    }

    fn delete_secret_permission<'a>(
        &'a self,
        secret_id: Uuid,
        user_id: UserId,
        deleted_by: UserId,
    ) -> BoxFuture<'a, anyhow::Result<u64>> {
        Box::pin(Database::delete_secret_permission(
            self, secret_id, user_id, deleted_by,
        ))
    }

    fn insert_secret_group_permission<'a>(
        &'a self,
        secret_id: Uuid,
        user_group_id: Uuid,
        created_by: UserId,
    ) -> BoxFuture<'a, anyhow::Result<u64>> {
        Box::pin(Database::insert_secret_group_permission(
            self,
            secret_id,
            user_group_id,
            created_by,
        ))
    }

    fn delete_secret_group_permission<'a>(
        &'a self,
        secret_id: Uuid,
        user_group_id: Uuid,
        deleted_by: UserId,
    ) -> BoxFuture<'a, anyhow::Result<u64>> {
        Box::pin(Database::delete_secret_group_permission(
            self,
            secret_id,
            user_group_id,
            deleted_by,
        ))
    }

    fn insert_user_group<'a>(
        &'a self,
        user_group: &'a UserGroup,
    ) -> BoxFuture<'a, anyhow::Result<u64>> {
        Box::pin(Database::insert_user_group(self, user_group))
    }

    fn list_user_groups<'a>(&'a self) -> BoxFuture<'a, anyhow::Result<Vec<UserGroup>>> {
        Box::pin(Database::list_user_groups(self))
    }

    fn get_user_group<'a>(&'a self, id: Uuid) -> BoxFuture<'a, anyhow::Result<Option<UserGroup>>> {
        Box::pin(Database::get_user_group(self, id))
    }

    fn delete_user_group<'a>(
        &'a self,
        id: Uuid,
        deleted_by: UserId,
    ) -> BoxFuture<'a, anyhow::Result<u64>> {
        Box::pin(Database::delete_user_group(self, id, deleted_by))
    }

    fn insert_user_group_member<'a>(
        &'a self,
        user_group_id: Uuid,
        user_id: UserId,
        created_by: UserId,
    ) -> BoxFuture<'a, anyhow::Result<u64>> {
        Box::pin(Database::insert_user_group_member(
            self,
            user_group_id,
            user_id,
            created_by,
        ))
    }

    fn delete_user_group_member<'a>(
        &'a self,
        user_group_id: Uuid,
        user_id: UserId,
        deleted_by: UserId,
    ) -> BoxFuture<'a, anyhow::Result<u64>> {
        Box::pin(Database::delete_user_group_member(
            self,
            user_group_id,
            user_id,
            deleted_by,
        ))
    }

    fn list_users_in_group<'a>(
        &'a self,
        user_group_id: Uuid,
    ) -> BoxFuture<'a, anyhow::Result<Vec<User>>> {
        Box::pin(Database::list_users_in_group(self, user_group_id))
    }
}
