use crate::users::UserId;
use time::OffsetDateTime;

/// Stored access token. The raw bearer value is never kept, `id` is its `sha256:<hex>` hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub id: String,
    pub user_id: UserId,
    pub invalid_at: OffsetDateTime,
    pub is_latest: bool,
}

impl AccessToken {
    /// Checks whether the token can still be used to authenticate at the given time.
    pub fn is_valid_at(&self, now: OffsetDateTime) -> bool {
        self.is_latest && self.invalid_at > now
    }
}

#[cfg(test)]
mod tests {
    use super::AccessToken;
    use std::time::Duration;
    use time::OffsetDateTime;
    use uuid::uuid;

    #[test]
    fn validity() -> anyhow::Result<()> {
        // January 1, 2010 11:00:00
        let now = OffsetDateTime::from_unix_timestamp(1262340000)?;
        let token = AccessToken {
            id: "sha256:00".to_string(),
            user_id: uuid!("00000000-0000-0000-0000-000000000001").into(),
            invalid_at: now + Duration::from_secs(60),
            is_latest: true,
        };

        assert!(token.is_valid_at(now));
        assert!(!token.is_valid_at(now + Duration::from_secs(60)));
        assert!(
            !AccessToken {
                is_latest: false,
                ..token
            }
            .is_valid_at(now)
        );

        Ok(())
    }
}
