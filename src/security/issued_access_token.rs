use crate::users::UserId;
use serde_derive::Serialize;
use time::OffsetDateTime;

/// Access token handed out to the client. `token` is the raw bearer value and is returned once.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct IssuedAccessToken {
    pub token: String,
    pub user_id: UserId,
    #[serde(with = "time::serde::timestamp")]
    pub invalid_at: OffsetDateTime,
    pub is_latest: bool,
}
