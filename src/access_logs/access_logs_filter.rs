use crate::{
    error::Error as VaultError,
    pagination::{Pagination, PaginationQuery},
    users::UserId,
};
use serde_derive::Deserialize;
use time::{Date, OffsetDateTime, macros::format_description};

/// Selects a page of access log entries of a single user within a time range.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AccessLogsFilter {
    pub user_id: UserId,
    pub pagination: Pagination,
    pub start_date: OffsetDateTime,
    pub end_date: OffsetDateTime,
}

/// Raw query parameters of the access log listing, dates are `YYYY-MM-DD`.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct AccessLogsQuery {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl AccessLogsFilter {
    /// Builds a filter, `start_date` defaults to the Unix epoch and `end_date` to now.
    pub fn try_from_query(user_id: UserId, query: &AccessLogsQuery) -> anyhow::Result<Self> {
        Ok(Self {
            user_id,
            pagination: Pagination::try_from(&query.pagination)?,
            start_date: parse_date("start_date", query.start_date.as_deref())?
                .unwrap_or(OffsetDateTime::UNIX_EPOCH),
            end_date: parse_date("end_date", query.end_date.as_deref())?
                .unwrap_or_else(OffsetDateTime::now_utc),
        })
    }
}

fn parse_date(name: &str, value: Option<&str>) -> anyhow::Result<Option<OffsetDateTime>> {
    let Some(value) = value else {
        return Ok(None);
    };

    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .map(|date| Some(date.midnight().assume_utc()))
        .map_err(|_| {
            VaultError::client(format!(
                "Expected date in `YYYY-MM-DD` format for `{name}`, got `{value}`."
            ))
            .into()
        })
}
