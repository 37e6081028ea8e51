use crate::{
    error::Error as VaultError,
    security::Credentials,
    server::{
        AppState,
        extractors::credentials::{access_token, client_credentials},
    },
    users::User,
};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use anyhow::anyhow;
use std::{future::Future, pin::Pin};
use tracing::warn;

/// User authenticated with client credentials.
#[derive(Debug, Clone)]
pub struct ClientIdentity(pub User);

/// Admin authenticated with client credentials.
#[derive(Debug, Clone)]
pub struct AdminIdentity(pub User);

/// User authenticated with an access token.
#[derive(Debug, Clone)]
pub struct TokenIdentity(pub User);

/// Admin authenticated with an access token.
#[derive(Debug, Clone)]
pub struct AdminTokenIdentity(pub User);

async fn authenticate(
    req: HttpRequest,
    read_credentials: fn(&HttpRequest) -> Option<Credentials>,
    check_admin: bool,
) -> Result<User, VaultError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| VaultError::from(anyhow!("Application state is not configured.")))?;

    let Some(credentials) = read_credentials(&req) else {
        warn!(
            request.path = req.path(),
            "Credentials headers are missing or repeated."
        );
        return Err(VaultError::unauthorized());
    };

    state
        .api
        .security()
        .authenticate(&credentials, check_admin)
        .await
        .ok_or_else(VaultError::unauthorized)
}

macro_rules! impl_identity_extractor {
    ($identity:ident, $read_credentials:expr, $check_admin:expr) => {
        impl FromRequest for $identity {
            type Error = VaultError;
            type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                let req = req.clone();
                Box::pin(async move {
                    authenticate(req, $read_credentials, $check_admin)
                        .await
                        .map($identity)
                })
            }
        }
    };
}

impl_identity_extractor!(ClientIdentity, client_credentials, false);
impl_identity_extractor!(AdminIdentity, client_credentials, true);
impl_identity_extractor!(TokenIdentity, access_token, false);
impl_identity_extractor!(AdminTokenIdentity, access_token, true);
