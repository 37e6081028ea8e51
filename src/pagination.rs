use crate::error::Error as VaultError;
use serde_derive::Deserialize;

/// Default number of items per page.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Page of a listing.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub page_size: i64,
    pub offset: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

/// Raw pagination query parameters. Values are kept as strings so that malformed numbers are
/// reported as client errors instead of generic extraction failures.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct PaginationQuery {
    pub page_size: Option<String>,
    pub offset: Option<String>,
}

impl TryFrom<&PaginationQuery> for Pagination {
    type Error = anyhow::Error;

    fn try_from(query: &PaginationQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            page_size: parse_non_negative(
                "page_size",
                query.page_size.as_deref(),
                DEFAULT_PAGE_SIZE,
            )?,
            offset: parse_non_negative("offset", query.offset.as_deref(), 0)?,
        })
    }
}

fn parse_non_negative(name: &str, value: Option<&str>, default: i64) -> anyhow::Result<i64> {
    let Some(value) = value else {
        return Ok(default);
    };

    match value.parse::<i64>() {
        Ok(parsed) if parsed >= 0 => Ok(parsed),
        _ => Err(VaultError::client(format!(
            "Expected non-negative integer value for `{name}`, got `{value}`."
        ))
        .into()),
    }
}
