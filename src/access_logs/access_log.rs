use crate::{access_logs::AccessLogAction, users::UserId};
use serde_derive::Serialize;
use time::OffsetDateTime;

/// Audit record written for every secret operation.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AccessLog {
    pub user_id: UserId,
    pub action_type: AccessLogAction,
    /// Name of the secret the operation was performed on.
    pub key_name: String,
    #[serde(with = "time::serde::timestamp")]
    pub access_at: OffsetDateTime,
}

impl AccessLog {
    /// Creates a log entry stamped with the current time.
    pub fn now(user_id: UserId, action_type: AccessLogAction, key_name: &str) -> Self {
        Self {
            user_id,
            action_type,
            key_name: key_name.to_string(),
            access_at: OffsetDateTime::now_utc(),
        }
    }
}
