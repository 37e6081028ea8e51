use crate::{
    access_logs::{AccessLog, AccessLogsFilter},
    api::Api,
};

pub struct AccessLogsApiExt<'a> {
    api: &'a Api,
}

impl<'a> AccessLogsApiExt<'a> {
    pub fn new(api: &'a Api) -> Self {
        Self { api }
    }

    /// Lists access log entries of a user, newest first.
    pub async fn list(&self, filter: &AccessLogsFilter) -> anyhow::Result<Vec<AccessLog>> {
        self.api.key_vault.list_access_logs(filter).await
    }
}

impl Api {
    /// Returns an API to read the access log.
    pub fn access_logs(&self) -> AccessLogsApiExt<'_> {
        AccessLogsApiExt::new(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        access_logs::{AccessLog, AccessLogAction, AccessLogsFilter},
        pagination::Pagination,
        tests::{mock_api, mock_user},
    };
    use std::time::Duration;
    use time::OffsetDateTime;
    use uuid::uuid;

    #[tokio::test]
    async fn lists_access_logs() -> anyhow::Result<()> {
        let api = mock_api().await?;
        let user = mock_user()?;
        let another_user_id = uuid!("00000000-0000-0000-0000-000000000002").into();

        // January 1, 2010 11:00:00
        let start = OffsetDateTime::from_unix_timestamp(1262340000)?;
        for (index, (user_id, action)) in [
            (user.id, AccessLogAction::Create),
            (user.id, AccessLogAction::Read),
            (another_user_id, AccessLogAction::Read),
            (user.id, AccessLogAction::Delete),
        ]
        .into_iter()
        .enumerate()
        {
            api.key_vault
                .log_access(&AccessLog {
                    user_id,
                    action_type: action,
                    key_name: "db-pass".to_string(),
                    access_at: start + Duration::from_secs(60 * index as u64),
                })
                .await?;
        }

        let filter = AccessLogsFilter {
            user_id: user.id,
            pagination: Pagination::default(),
            start_date: OffsetDateTime::UNIX_EPOCH,
            end_date: OffsetDateTime::now_utc(),
        };
        assert_eq!(
            api.access_logs()
                .list(&filter)
                .await?
                .into_iter()
                .map(|log| log.action_type)
                .collect::<Vec<_>>(),
            vec![
                AccessLogAction::Delete,
                AccessLogAction::Read,
                AccessLogAction::Create
            ]
        );

        // Time range and pagination.
        let logs = api
            .access_logs()
            .list(&AccessLogsFilter {
                start_date: start + Duration::from_secs(30),
                pagination: Pagination {
                    page_size: 1,
                    offset: 1,
                },
                ..filter
            })
            .await?;
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].action_type, AccessLogAction::Read);

        assert!(
            api.access_logs()
                .list(&AccessLogsFilter {
                    end_date: start - Duration::from_secs(1),
                    ..filter
                })
                .await?
                .is_empty()
        );

        Ok(())
    }
}
