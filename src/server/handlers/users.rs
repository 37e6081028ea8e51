use crate::{
    access_logs::{AccessLogsFilter, AccessLogsQuery},
    error::Error as VaultError,
    server::{
        AppState,
        extractors::{AdminIdentity, AdminTokenIdentity, TokenIdentity},
    },
    users::{UserCreateParams, UserId},
};
use actix_web::{HttpResponse, web};

pub async fn users_list(
    state: web::Data<AppState>,
    _: TokenIdentity,
) -> Result<HttpResponse, VaultError> {
    Ok(HttpResponse::Ok().json(state.api.users().list().await?))
}

pub async fn users_create(
    state: web::Data<AppState>,
    _: AdminIdentity,
    params: web::Json<UserCreateParams>,
) -> Result<HttpResponse, VaultError> {
    Ok(HttpResponse::Created().json(state.api.users().create(params.into_inner()).await?))
}

pub async fn users_get(
    state: web::Data<AppState>,
    _: AdminIdentity,
    user_id: web::Path<UserId>,
) -> Result<HttpResponse, VaultError> {
    match state.api.users().get(*user_id).await? {
        Some(user) => Ok(HttpResponse::Ok().json(user)),
        None => Err(VaultError::not_found("User not found.")),
    }
}

pub async fn users_delete(
    state: web::Data<AppState>,
    _: AdminIdentity,
    user_id: web::Path<UserId>,
) -> Result<HttpResponse, VaultError> {
    state.api.users().delete(*user_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Lists access log entries of the user, newest first.
pub async fn users_access_logs(
    state: web::Data<AppState>,
    _: AdminTokenIdentity,
    user_id: web::Path<UserId>,
    query: web::Query<AccessLogsQuery>,
) -> Result<HttpResponse, VaultError> {
    let filter = AccessLogsFilter::try_from_query(*user_id, &query)?;
    Ok(HttpResponse::Ok().json(state.api.access_logs().list(&filter).await?))
}
