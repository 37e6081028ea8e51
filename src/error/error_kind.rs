/// Describes Data Vault specific error types.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Error caused by malformed input on the client side.
    ClientError,
    /// Credentials are missing, invalid, or lack the required role.
    Unauthorized,
    /// Resource is absent or isn't visible to the caller.
    NotFound,
    /// Resource with the same unique key already exists.
    AlreadyExists,
    /// Unknown error.
    Unknown,
}

impl ErrorKind {
    /// Maps a Postgres SQLSTATE code to the error kind, if the code is a known one.
    pub fn from_database_code(code: &str) -> Option<Self> {
        match code {
            // unique_violation
            "23505" => Some(Self::AlreadyExists),
            // foreign_key_violation | invalid_text_representation
            "23503" | "22P02" => Some(Self::ClientError),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorKind;

    #[test]
    fn maps_database_codes() {
        assert_eq!(
            ErrorKind::from_database_code("23505"),
            Some(ErrorKind::AlreadyExists)
        );
        assert_eq!(
            ErrorKind::from_database_code("23503"),
            Some(ErrorKind::ClientError)
        );
        assert_eq!(
            ErrorKind::from_database_code("22P02"),
            Some(ErrorKind::ClientError)
        );
        assert_eq!(ErrorKind::from_database_code("40001"), None);
        assert_eq!(ErrorKind::from_database_code(""), None);
    }
}
