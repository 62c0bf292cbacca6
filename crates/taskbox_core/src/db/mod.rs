//! SQLite file behind the task key-value store.
//!
//! Hosts a single `kv_entries` table; [`open_db`] hands out connections only
//! after the table exists at the latest schema version.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure opening, migrating or querying the task database.
#[derive(Debug)]
pub enum DbError {
    /// SQLite rejected a statement or the file itself.
    Backend(rusqlite::Error),
    /// The directory for the database file could not be created.
    Location(io::Error),
    /// The file was written by a newer build with a schema we do not know.
    SchemaTooNew { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Backend(err) => write!(f, "task database error: {err}"),
            Self::Location(err) => write!(f, "cannot create task database directory: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "task database uses schema v{found}, this build reads up to v{supported}; upgrade taskbox"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Backend(err) => Some(err),
            Self::Location(err) => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Backend(value)
    }
}

impl From<io::Error> for DbError {
    fn from(value: io::Error) -> Self {
        Self::Location(value)
    }
}

#[cfg(test)]
mod tests {
    use super::DbError;
    use std::io;

    #[test]
    fn messages_name_the_task_database() {
        let too_new = DbError::SchemaTooNew {
            found: 3,
            supported: 1,
        };
        assert_eq!(
            too_new.to_string(),
            "task database uses schema v3, this build reads up to v1; upgrade taskbox"
        );

        let location = DbError::from(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        assert!(matches!(location, DbError::Location(_)));
        assert_eq!(
            location.to_string(),
            "cannot create task database directory: denied"
        );
    }
}
