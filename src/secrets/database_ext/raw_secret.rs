use crate::secrets::Secret;
use uuid::Uuid;

#[derive(sqlx::FromRow, Debug, Clone)]
pub(crate) struct RawSecret {
    pub id: Uuid,
    pub name: String,
    pub value: Option<String>,
    pub description: Option<String>,
    pub created_by: Uuid,
    pub updated_by: Uuid,
}

impl From<RawSecret> for Secret {
    fn from(raw: RawSecret) -> Self {
        Secret {
            id: raw.id,
            name: raw.name,
            value: raw.value,
            description: raw.description,
            created_by: raw.created_by.into(),
            updated_by: raw.updated_by.into(),
        }
    }
}
