use crate::users::UserId;
use serde_derive::Serialize;
use uuid::Uuid;

/// Named collection of users that secrets can be shared with.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct UserGroup {
    pub id: Uuid,
    pub name: String,
    pub created_by: UserId,
    pub updated_by: UserId,
}
