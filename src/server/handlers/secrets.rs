use crate::{
    error::Error as VaultError,
    pagination::{Pagination, PaginationQuery},
    secrets::{PermissionGrantee, PermissionGranteeParams, SecretCreateParams},
    server::{AppState, extractors::TokenIdentity},
};
use actix_web::{HttpResponse, web};

pub async fn secrets_list(
    state: web::Data<AppState>,
    TokenIdentity(user): TokenIdentity,
    query: web::Query<PaginationQuery>,
) -> Result<HttpResponse, VaultError> {
    let pagination = Pagination::try_from(&*query)?;
    Ok(HttpResponse::Ok().json(state.api.secrets(&user).list(pagination).await?))
}

pub async fn secrets_create(
    state: web::Data<AppState>,
    TokenIdentity(user): TokenIdentity,
    params: web::Json<SecretCreateParams>,
) -> Result<HttpResponse, VaultError> {
    Ok(HttpResponse::Created().json(state.api.secrets(&user).create(params.into_inner()).await?))
}

pub async fn secrets_get(
    state: web::Data<AppState>,
    TokenIdentity(user): TokenIdentity,
    secret_name: web::Path<String>,
) -> Result<HttpResponse, VaultError> {
    Ok(HttpResponse::Ok().json(state.api.secrets(&user).get(&secret_name).await?))
}

pub async fn secrets_delete(
    state: web::Data<AppState>,
    TokenIdentity(user): TokenIdentity,
    secret_name: web::Path<String>,
) -> Result<HttpResponse, VaultError> {
    state.api.secrets(&user).delete(&secret_name).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Grants read access to a user or a user group.
pub async fn secrets_permissions_grant(
    state: web::Data<AppState>,
    TokenIdentity(user): TokenIdentity,
    secret_name: web::Path<String>,
    params: web::Json<PermissionGranteeParams>,
) -> Result<HttpResponse, VaultError> {
    let grantee = PermissionGrantee::try_from(params.into_inner())?;
    state.api.secrets(&user).grant(&secret_name, grantee).await?;
    Ok(HttpResponse::Created().finish())
}

pub async fn secrets_permissions_revoke(
    state: web::Data<AppState>,
    TokenIdentity(user): TokenIdentity,
    secret_name: web::Path<String>,
    params: web::Json<PermissionGranteeParams>,
) -> Result<HttpResponse, VaultError> {
    let grantee = PermissionGrantee::try_from(params.into_inner())?;
    state.api.secrets(&user).revoke(&secret_name, grantee).await?;
    Ok(HttpResponse::NoContent().finish())
}
