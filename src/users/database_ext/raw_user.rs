use crate::users::User;
use uuid::Uuid;

#[derive(sqlx::FromRow, Debug, Clone)]
pub(crate) struct RawUser {
    pub id: Uuid,
    pub name: String,
    #[sqlx(rename = "type")]
    pub user_type: String,
    pub client_secret_hash: String,
    pub is_active: bool,
}

impl TryFrom<RawUser> for User {
    type Error = anyhow::Error;

    fn try_from(raw_user: RawUser) -> Result<Self, Self::Error> {
        Ok(User {
            id: raw_user.id.into(),
            name: raw_user.name,
            user_type: raw_user.user_type.parse()?,
            is_active: raw_user.is_active,
            client_secret_hash: raw_user.client_secret_hash,
        })
    }
}
