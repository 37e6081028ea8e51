use anyhow::bail;
use serde_derive::Serialize;
use std::str::FromStr;

/// Secret operation recorded in the access log.
#[derive(Serialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AccessLogAction {
    Create,
    Read,
    Delete,
    Grant,
    Revoke,
}

impl AccessLogAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Delete => "delete",
            Self::Grant => "grant",
            Self::Revoke => "revoke",
        }
    }
}

impl FromStr for AccessLogAction {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value {
            "create" => Self::Create,
            "read" => Self::Read,
            "delete" => Self::Delete,
            "grant" => Self::Grant,
            "revoke" => Self::Revoke,
            _ => bail!("Unknown access log action '{value}'."),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::AccessLogAction;

    #[test]
    fn parsing() -> anyhow::Result<()> {
        for action in [
            AccessLogAction::Create,
            AccessLogAction::Read,
            AccessLogAction::Delete,
            AccessLogAction::Grant,
            AccessLogAction::Revoke,
        ] {
            assert_eq!(action.as_str().parse::<AccessLogAction>()?, action);
        }

        assert!("update".parse::<AccessLogAction>().is_err());

        Ok(())
    }
}
