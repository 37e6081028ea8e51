use crate::users::{UserId, UserType};
use serde_derive::Serialize;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(rename = "type")]
    pub user_type: UserType,
    pub is_active: bool,
    /// `sha256:<hex>` hash of the client secret.
    #[serde(skip_serializing)]
    pub client_secret_hash: String,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.user_type == UserType::Admin
    }
}

#[cfg(test)]
mod tests {
    use crate::tests::{MockUserBuilder, mock_admin, mock_user};
    use insta::assert_json_snapshot;
    use uuid::uuid;

    #[test]
    fn serialization() -> anyhow::Result<()> {
        let user = MockUserBuilder::new(uuid!("00000000-0000-0000-0000-000000000003"), "dev")
            .set_client_secret("some-secret")
            .build();

        assert_json_snapshot!(user, @r###"
        {
          "id": "00000000-0000-0000-0000-000000000003",
          "name": "dev",
          "type": "developer",
          "is_active": true
        }
        "###);

        Ok(())
    }

    #[test]
    fn admin_check() -> anyhow::Result<()> {
        assert!(!mock_user()?.is_admin());
        assert!(mock_admin()?.is_admin());

        Ok(())
    }
}
