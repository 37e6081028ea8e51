mod app_state;
mod extractors;
mod handlers;

use crate::{
    api::Api,
    config::Config,
    database::Database,
    key_vault::KeyVaultDatabase,
    users::builtin_users_initializer,
};
use actix_web::{App, HttpServer, web};
use anyhow::Context;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_actix_web::TracingLogger;

pub use self::app_state::AppState;

#[actix_web::main]
pub async fn run(config: Config) -> Result<(), anyhow::Error> {
    let store = Database::open(&config.db)
        .await
        .context("Cannot open relational store.")?;
    let key_vault = KeyVaultDatabase::open(&config.key_vault)
        .await
        .context("Cannot open key vault.")?;

    // Stops the credential cache workers once the server is down.
    let shutdown = CancellationToken::new();
    let api = Api::start(
        config.clone(),
        Arc::new(store),
        Arc::new(key_vault),
        shutdown.clone(),
    )
    .await?;

    if let Some(ref builtin_users) = config.security.builtin_users {
        builtin_users_initializer(&api, builtin_users)
            .await
            .context("Cannot initialize builtin users.")?;
    }

    let http_server_url = format!("0.0.0.0:{}", config.port);
    let state = web::Data::new(AppState::new(config, api));
    let http_server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(state.clone())
            .configure(configure_routes)
    });

    let http_server = http_server
        .bind(&http_server_url)
        .with_context(|| format!("Failed to bind to {}.", &http_server_url))?;

    info!("Data Vault API server is available at http://{http_server_url}");

    let result = http_server
        .run()
        .await
        .context("Failed to run Data Vault API server.");
    shutdown.cancel();

    result
}

/// Registers all API routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/version", web::get().to(handlers::version_get))
        .route("/access_token", web::get().to(handlers::security_access_token))
        .route("/rotate_secret", web::post().to(handlers::security_rotate_secret))
        .service(
            web::scope("/users")
                .route("", web::get().to(handlers::users_list))
                .route("", web::post().to(handlers::users_create))
                .route("/{user_id}", web::get().to(handlers::users_get))
                .route("/{user_id}", web::delete().to(handlers::users_delete))
                .route(
                    "/{user_id}/access-logs",
                    web::get().to(handlers::users_access_logs),
                ),
        )
        .service(
            web::scope("/user-groups")
                .route("", web::get().to(handlers::user_groups_list))
                .route("", web::post().to(handlers::user_groups_create))
                .route("/{user_group_id}", web::get().to(handlers::user_groups_get))
                .route(
                    "/{user_group_id}",
                    web::delete().to(handlers::user_groups_delete),
                )
                .route(
                    "/{user_group_id}/users",
                    web::get().to(handlers::user_groups_members_list),
                )
                .route(
                    "/{user_group_id}/users",
                    web::post().to(handlers::user_groups_members_add),
                )
                .route(
                    "/{user_group_id}/users",
                    web::delete().to(handlers::user_groups_members_remove),
                ),
        )
        .service(
            web::scope("/secrets")
                .route("", web::get().to(handlers::secrets_list))
                .route("", web::post().to(handlers::secrets_create))
                .route("/{secret_name}", web::get().to(handlers::secrets_get))
                .route("/{secret_name}", web::delete().to(handlers::secrets_delete))
                .route(
                    "/{secret_name}/permissions",
                    web::post().to(handlers::secrets_permissions_grant),
                )
                .route(
                    "/{secret_name}/permissions",
                    web::delete().to(handlers::secrets_permissions_revoke),
                ),
        );
}
