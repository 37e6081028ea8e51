use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Role of the user. Admins bypass secret ownership checks and manage users and groups.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Admin,
    Developer,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Developer => "developer",
        }
    }
}

impl FromStr for UserType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Self::Admin),
            "developer" => Ok(Self::Developer),
            _ => bail!("Unknown user type '{value}', expected 'admin' or 'developer'."),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::users::UserType;
    use insta::assert_json_snapshot;

    #[test]
    fn parsing() -> anyhow::Result<()> {
        assert_eq!("admin".parse::<UserType>()?, UserType::Admin);
        assert_eq!("developer".parse::<UserType>()?, UserType::Developer);
        assert_eq!(UserType::Admin.as_str(), "admin");
        assert_eq!(UserType::Developer.as_str(), "developer");

        assert!("Admin".parse::<UserType>().is_err());
        assert!("root".parse::<UserType>().is_err());
        assert!("".parse::<UserType>().is_err());

        Ok(())
    }

    #[test]
    fn serialization() {
        assert_json_snapshot!(UserType::Admin, @r###""admin""###);
        assert_json_snapshot!(UserType::Developer, @r###""developer""###);
    }
}
