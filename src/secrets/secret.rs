use crate::users::UserId;
use serde_derive::Serialize;
use uuid::Uuid;

/// Secret record as stored in the relational store.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Secret {
    pub id: Uuid,
    pub name: String,
    /// Hex-encoded ciphertext, never serialized. Not fetched when listing secrets.
    #[serde(skip_serializing)]
    pub value: Option<String>,
    pub description: Option<String>,
    pub created_by: UserId,
    pub updated_by: UserId,
}

/// Secret with its value decrypted, returned to a caller allowed to read it.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DecryptedSecret {
    pub name: String,
    pub value: String,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{DecryptedSecret, Secret};
    use insta::assert_json_snapshot;
    use uuid::uuid;

    #[test]
    fn serialization() {
        assert_json_snapshot!(Secret {
            id: uuid!("00000000-0000-0000-0000-000000000010"),
            name: "db-pass".to_string(),
            value: Some("deadbeef".to_string()),
            description: Some("Primary database".to_string()),
            created_by: uuid!("00000000-0000-0000-0000-000000000001").into(),
            updated_by: uuid!("00000000-0000-0000-0000-000000000002").into(),
        }, @r###"
        {
          "id": "00000000-0000-0000-0000-000000000010",
          "name": "db-pass",
          "description": "Primary database",
          "created_by": "00000000-0000-0000-0000-000000000001",
          "updated_by": "00000000-0000-0000-0000-000000000002"
        }
        "###);

        assert_json_snapshot!(DecryptedSecret {
            name: "db-pass".to_string(),
            value: "p@ss".to_string(),
            description: None,
        }, @r###"
        {
          "name": "db-pass",
          "value": "p@ss",
          "description": null
        }
        "###);
    }
}
