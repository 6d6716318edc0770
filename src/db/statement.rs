//! SQL text for the recovery marker table.
//!
//! Pod names only ever travel as bound parameters. The table name cannot be
//! bound, so it is accepted only as a plain identifier.

use crate::db::error::DatabaseError;
use std::fmt;

pub const APPLICATION_COLUMN: &str = "APPLICATION_POD_NAME";
pub const RECOVERY_COLUMN: &str = "RECOVERY_POD_NAME";

const MAX_IDENTIFIER_LEN: usize = 64;

/// Placeholder syntax of the target database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    MySql,
}

impl Dialect {
    fn placeholder(&self, position: usize) -> String {
        match self {
            Dialect::Postgres => format!("${}", position),
            Dialect::MySql => "?".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName(String);

impl TableName {
    pub fn parse(name: &str) -> Result<Self, DatabaseError> {
        let mut chars = name.chars();
        let valid_start = chars
            .next()
            .map(|c| c.is_ascii_alphabetic() || c == '_')
            .unwrap_or(false);
        let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

        if valid_start && valid_rest && name.len() <= MAX_IDENTIFIER_LEN {
            Ok(TableName(name.to_string()))
        } else {
            Err(DatabaseError::InvalidTableName(name.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of the marker table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryMarker {
    pub application_pod_name: String,
    pub recovery_pod_name: String,
}

/// Conjunctive row filter; an empty filter matches every row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerFilter {
    pub application_pod_name: Option<String>,
    pub recovery_pod_name: Option<String>,
}

impl MarkerFilter {
    pub fn is_empty(&self) -> bool {
        self.application_pod_name.is_none() && self.recovery_pod_name.is_none()
    }
}

/// Column projected by a select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerColumn {
    Application,
    Recovery,
}

impl MarkerColumn {
    pub fn name(&self) -> &'static str {
        match self {
            MarkerColumn::Application => APPLICATION_COLUMN,
            MarkerColumn::Recovery => RECOVERY_COLUMN,
        }
    }
}

/// SQL text plus the values bound to its placeholders, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    pub binds: Vec<String>,
}

pub fn create_table(table: &TableName) -> Statement {
    Statement {
        sql: format!(
            "CREATE TABLE IF NOT EXISTS {} ({} varchar(255), {} varchar(255))",
            table, APPLICATION_COLUMN, RECOVERY_COLUMN
        ),
        binds: Vec::new(),
    }
}

pub fn insert(dialect: Dialect, table: &TableName, marker: &RecoveryMarker) -> Statement {
    Statement {
        sql: format!(
            "INSERT INTO {} ({}, {}) VALUES ({}, {})",
            table,
            APPLICATION_COLUMN,
            RECOVERY_COLUMN,
            dialect.placeholder(1),
            dialect.placeholder(2)
        ),
        binds: vec![
            marker.application_pod_name.clone(),
            marker.recovery_pod_name.clone(),
        ],
    }
}

pub fn delete(dialect: Dialect, table: &TableName, filter: &MarkerFilter) -> Statement {
    let (clause, binds) = where_clause(dialect, filter);
    Statement {
        sql: format!("DELETE FROM {}{}", table, clause),
        binds,
    }
}

pub fn select(
    dialect: Dialect,
    table: &TableName,
    column: MarkerColumn,
    filter: &MarkerFilter,
) -> Statement {
    let (clause, binds) = where_clause(dialect, filter);
    Statement {
        sql: format!("SELECT {} FROM {}{}", column.name(), table, clause),
        binds,
    }
}

fn where_clause(dialect: Dialect, filter: &MarkerFilter) -> (String, Vec<String>) {
    let mut conditions = Vec::new();
    let mut binds = Vec::new();

    let columns = [
        (APPLICATION_COLUMN, &filter.application_pod_name),
        (RECOVERY_COLUMN, &filter.recovery_pod_name),
    ];
    for (column, value) in columns {
        if let Some(value) = value {
            binds.push(value.clone());
            conditions.push(format!("{} = {}", column, dialect.placeholder(binds.len())));
        }
    }

    if conditions.is_empty() {
        (String::new(), binds)
    } else {
        (format!(" WHERE {}", conditions.join(" AND ")), binds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> TableName {
        TableName::parse("JDBC_RECOVERY").unwrap()
    }

    fn filter(app: Option<&str>, rec: Option<&str>) -> MarkerFilter {
        MarkerFilter {
            application_pod_name: app.map(str::to_string),
            recovery_pod_name: rec.map(str::to_string),
        }
    }

    #[test]
    fn table_name_must_be_identifier() {
        assert!(TableName::parse("JDBC_RECOVERY").is_ok());
        assert!(TableName::parse("_markers2").is_ok());
        assert!(TableName::parse("").is_err());
        assert!(TableName::parse("2markers").is_err());
        assert!(TableName::parse("markers; DROP TABLE x").is_err());
        assert!(TableName::parse("schema.markers").is_err());
        assert!(TableName::parse(&"t".repeat(65)).is_err());
    }

    #[test]
    fn create_is_idempotent_statement() {
        assert_eq!(
            create_table(&table()).sql,
            "CREATE TABLE IF NOT EXISTS JDBC_RECOVERY \
             (APPLICATION_POD_NAME varchar(255), RECOVERY_POD_NAME varchar(255))"
        );
    }

    #[test]
    fn insert_binds_both_names() {
        let marker = RecoveryMarker {
            application_pod_name: "eap-0".to_string(),
            recovery_pod_name: "eap-0'); DROP TABLE JDBC_RECOVERY; --".to_string(),
        };

        let pg = insert(Dialect::Postgres, &table(), &marker);
        assert_eq!(
            pg.sql,
            "INSERT INTO JDBC_RECOVERY (APPLICATION_POD_NAME, RECOVERY_POD_NAME) VALUES ($1, $2)"
        );
        assert_eq!(pg.binds[1], marker.recovery_pod_name);

        let my = insert(Dialect::MySql, &table(), &marker);
        assert!(my.sql.ends_with("VALUES (?, ?)"));
    }

    #[test]
    fn no_filter_means_whole_table() {
        let stmt = select(Dialect::Postgres, &table(), MarkerColumn::Recovery, &filter(None, None));
        assert_eq!(stmt.sql, "SELECT RECOVERY_POD_NAME FROM JDBC_RECOVERY");
        assert!(stmt.binds.is_empty());

        let stmt = delete(Dialect::MySql, &table(), &MarkerFilter::default());
        assert_eq!(stmt.sql, "DELETE FROM JDBC_RECOVERY");
    }

    #[test]
    fn single_filter_uses_first_placeholder() {
        let stmt = select(
            Dialect::Postgres,
            &table(),
            MarkerColumn::Recovery,
            &filter(Some("A"), None),
        );
        assert_eq!(
            stmt.sql,
            "SELECT RECOVERY_POD_NAME FROM JDBC_RECOVERY WHERE APPLICATION_POD_NAME = $1"
        );
        assert_eq!(stmt.binds, vec!["A"]);

        let stmt = select(
            Dialect::Postgres,
            &table(),
            MarkerColumn::Application,
            &filter(None, Some("R1")),
        );
        assert_eq!(
            stmt.sql,
            "SELECT APPLICATION_POD_NAME FROM JDBC_RECOVERY WHERE RECOVERY_POD_NAME = $1"
        );
        assert_eq!(stmt.binds, vec!["R1"]);
    }

    #[test]
    fn both_filters_are_conjunctive() {
        let stmt = delete(Dialect::Postgres, &table(), &filter(Some("A"), Some("R2")));
        assert_eq!(
            stmt.sql,
            "DELETE FROM JDBC_RECOVERY WHERE APPLICATION_POD_NAME = $1 AND RECOVERY_POD_NAME = $2"
        );
        assert_eq!(stmt.binds, vec!["A", "R2"]);

        let stmt = delete(Dialect::MySql, &table(), &filter(Some("A"), Some("R2")));
        assert_eq!(
            stmt.sql,
            "DELETE FROM JDBC_RECOVERY WHERE APPLICATION_POD_NAME = ? AND RECOVERY_POD_NAME = ?"
        );
    }
}
