use crate::security::Credentials;
use actix_web::{HttpRequest, http::header::HeaderName};

pub static CLIENT_ID_HEADER_NAME: HeaderName = HeaderName::from_static("client-id");
pub static CLIENT_SECRET_HEADER_NAME: HeaderName = HeaderName::from_static("client-secret");
pub static ACCESS_TOKEN_HEADER_NAME: HeaderName = HeaderName::from_static("access-token");

/// Reads `Client-Id` and `Client-Secret` headers.
pub fn client_credentials(req: &HttpRequest) -> Option<Credentials> {
    Some(Credentials::ClientSecret {
        client_id: single_header_value(req, &CLIENT_ID_HEADER_NAME)?,
        client_secret: single_header_value(req, &CLIENT_SECRET_HEADER_NAME)?,
    })
}

/// Reads `Access-Token` header.
pub fn access_token(req: &HttpRequest) -> Option<Credentials> {
    single_header_value(req, &ACCESS_TOKEN_HEADER_NAME).map(Credentials::AccessToken)
}

/// Returns the header value only if the header is present exactly once and is a valid string.
fn single_header_value(req: &HttpRequest, name: &HeaderName) -> Option<String> {
    let mut values = req.headers().get_all(name);
    match (values.next(), values.next()) {
        (Some(value), None) => value.to_str().ok().map(str::to_string),
        _ => None,
    }
}
