use crate::{
    error::Error as VaultError,
    server::{
        AppState,
        extractors::{AdminIdentity, TokenIdentity},
    },
    user_groups::{UserGroupCreateParams, UserGroupMemberParams},
};
use actix_web::{HttpResponse, web};
use uuid::Uuid;

pub async fn user_groups_list(
    state: web::Data<AppState>,
    TokenIdentity(user): TokenIdentity,
) -> Result<HttpResponse, VaultError> {
    Ok(HttpResponse::Ok().json(state.api.user_groups(&user).list().await?))
}

pub async fn user_groups_create(
    state: web::Data<AppState>,
    AdminIdentity(user): AdminIdentity,
    params: web::Json<UserGroupCreateParams>,
) -> Result<HttpResponse, VaultError> {
    Ok(HttpResponse::Created().json(
        state
            .api
            .user_groups(&user)
            .create(params.into_inner())
            .await?,
    ))
}

pub async fn user_groups_get(
    state: web::Data<AppState>,
    AdminIdentity(user): AdminIdentity,
    user_group_id: web::Path<Uuid>,
) -> Result<HttpResponse, VaultError> {
    match state.api.user_groups(&user).get(*user_group_id).await? {
        Some(user_group) => Ok(HttpResponse::Ok().json(user_group)),
        None => Err(VaultError::not_found("User group not found.")),
    }
}

pub async fn user_groups_delete(
    state: web::Data<AppState>,
    AdminIdentity(user): AdminIdentity,
    user_group_id: web::Path<Uuid>,
) -> Result<HttpResponse, VaultError> {
    state.api.user_groups(&user).delete(*user_group_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn user_groups_members_list(
    state: web::Data<AppState>,
    TokenIdentity(user): TokenIdentity,
    user_group_id: web::Path<Uuid>,
) -> Result<HttpResponse, VaultError> {
    Ok(HttpResponse::Ok().json(
        state
            .api
            .user_groups(&user)
            .list_members(*user_group_id)
            .await?,
    ))
}

pub async fn user_groups_members_add(
    state: web::Data<AppState>,
    AdminIdentity(user): AdminIdentity,
    user_group_id: web::Path<Uuid>,
    params: web::Json<UserGroupMemberParams>,
) -> Result<HttpResponse, VaultError> {
    state
        .api
        .user_groups(&user)
        .add_member(*user_group_id, params.into_inner())
        .await?;
    Ok(HttpResponse::Created().finish())
}

pub async fn user_groups_members_remove(
    state: web::Data<AppState>,
    AdminIdentity(user): AdminIdentity,
    user_group_id: web::Path<Uuid>,
    params: web::Json<UserGroupMemberParams>,
) -> Result<HttpResponse, VaultError> {
    state
        .api
        .user_groups(&user)
        .remove_member(*user_group_id, params.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
