/// Credentials presented by a client in the request headers.
#[derive(Clone)]
pub enum Credentials {
    /// `Client-Id` and `Client-Secret` headers.
    ClientSecret {
        client_id: String,
        client_secret: String,
    },
    /// `Access-Token` header.
    AccessToken(String),
}
