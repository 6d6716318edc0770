use std::fmt;

#[derive(Debug)]
pub enum DatabaseError {
    ConnectionError(sqlx::Error),
    QueryError(sqlx::Error),
    InvalidTableName(String),
    MissingArgument(&'static str),
}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseError::ConnectionError(err) => {
                write!(f, "cannot connect to database: {}", err)
            }
            DatabaseError::QueryError(err) => write!(f, "database statement failed: {}", err),
            DatabaseError::InvalidTableName(name) => {
                write!(f, "'{}' is not a valid table name", name)
            }
            DatabaseError::MissingArgument(what) => write!(f, "missing argument: {}", what),
        }
    }
}

impl std::error::Error for DatabaseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatabaseError::ConnectionError(err) | DatabaseError::QueryError(err) => Some(err),
            DatabaseError::InvalidTableName(_) | DatabaseError::MissingArgument(_) => None,
        }
    }
}
