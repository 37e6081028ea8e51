use crate::{
    error::Error as VaultError,
    server::{AppState, extractors::ClientIdentity},
};
use actix_web::{HttpResponse, web};

/// Issues a new access token and deprecates the previous one.
pub async fn security_access_token(
    state: web::Data<AppState>,
    ClientIdentity(user): ClientIdentity,
) -> Result<HttpResponse, VaultError> {
    Ok(HttpResponse::Ok().json(state.api.security().issue_access_token(&user).await?))
}

/// Replaces the client secret of the caller.
pub async fn security_rotate_secret(
    state: web::Data<AppState>,
    ClientIdentity(user): ClientIdentity,
) -> Result<HttpResponse, VaultError> {
    Ok(HttpResponse::Ok().json(state.api.security().rotate_user_secret(&user).await?))
}
