pub mod error;
pub mod statement;

pub use error::DatabaseError;
pub use statement::{Dialect, MarkerColumn, MarkerFilter, RecoveryMarker, Statement, TableName};

use crate::output::QueryResult;
use clap::ValueEnum;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::{Connection as _, MySql, Postgres};
use tracing::*;

pub const DEFAULT_TABLE_NAME: &str = "JDBC_RECOVERY";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DatabaseType {
    Postgresql,
    Mysql,
}

impl DatabaseType {
    pub fn default_port(&self) -> u16 {
        match self {
            DatabaseType::Postgresql => 5432,
            DatabaseType::Mysql => 3306,
        }
    }

    pub fn dialect(&self) -> Dialect {
        match self {
            DatabaseType::Postgresql => Dialect::Postgres,
            DatabaseType::Mysql => Dialect::MySql,
        }
    }
}

/// Where and as whom to connect.
#[derive(Clone)]
pub struct ConnectionSettings {
    pub database_type: DatabaseType,
    pub host: String,
    pub port: Option<u16>,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl ConnectionSettings {
    pub fn port(&self) -> u16 {
        self.port
            .unwrap_or_else(|| self.database_type.default_port())
    }
}

impl std::fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("database_type", &self.database_type)
            .field("host", &self.host)
            .field("port", &self.port())
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

/// A fully validated request against the marker table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerCommand {
    CreateSchema,
    Insert(RecoveryMarker),
    Delete(MarkerFilter),
    Select {
        column: MarkerColumn,
        filter: MarkerFilter,
    },
}

/// Command names as given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CommandType {
    /// Create the marker table when it does not exist
    Create,
    /// Insert a marker (needs both pod names)
    Insert,
    /// Delete markers matching the given pod names
    Delete,
    /// List recovery pod names of matching markers
    #[value(name = "select_recovery")]
    SelectRecovery,
    /// List application pod names of matching markers
    #[value(name = "select_application")]
    SelectApplication,
}

impl MarkerCommand {
    /// Resolves a command name and the optional pod names into a command.
    /// Empty names count as absent.
    pub fn from_args(
        command: CommandType,
        application_pod_name: Option<String>,
        recovery_pod_name: Option<String>,
    ) -> Result<Self, DatabaseError> {
        let filter = MarkerFilter {
            application_pod_name: application_pod_name.filter(|name| !name.is_empty()),
            recovery_pod_name: recovery_pod_name.filter(|name| !name.is_empty()),
        };

        Ok(match command {
            CommandType::Create => MarkerCommand::CreateSchema,
            CommandType::Insert => {
                let application_pod_name = filter
                    .application_pod_name
                    .ok_or(DatabaseError::MissingArgument("application_pod_name"))?;
                let recovery_pod_name = filter
                    .recovery_pod_name
                    .ok_or(DatabaseError::MissingArgument("recovery_pod_name"))?;
                MarkerCommand::Insert(RecoveryMarker {
                    application_pod_name,
                    recovery_pod_name,
                })
            }
            CommandType::Delete => MarkerCommand::Delete(filter),
            CommandType::SelectRecovery => MarkerCommand::Select {
                column: MarkerColumn::Recovery,
                filter,
            },
            CommandType::SelectApplication => MarkerCommand::Select {
                column: MarkerColumn::Application,
                filter,
            },
        })
    }

    pub fn statement(&self, dialect: Dialect, table: &TableName) -> Statement {
        match self {
            MarkerCommand::CreateSchema => statement::create_table(table),
            MarkerCommand::Insert(marker) => statement::insert(dialect, table, marker),
            MarkerCommand::Delete(filter) => statement::delete(dialect, table, filter),
            MarkerCommand::Select { column, filter } => {
                statement::select(dialect, table, *column, filter)
            }
        }
    }
}

enum DatabaseConnection {
    Postgres(PgConnection),
    MySql(MySqlConnection),
}

/// One open connection and the marker table it works on.
pub struct MarkerStore {
    connection: DatabaseConnection,
    table: TableName,
}

impl MarkerStore {
    pub async fn connect(
        settings: &ConnectionSettings,
        table: TableName,
    ) -> Result<Self, DatabaseError> {
        info!(
            "Connecting to {:?} database {} at {}:{}",
            settings.database_type,
            settings.database,
            settings.host,
            settings.port()
        );

        let connection = match settings.database_type {
            DatabaseType::Postgresql => {
                let options = PgConnectOptions::new()
                    .host(&settings.host)
                    .port(settings.port())
                    .database(&settings.database)
                    .username(&settings.user)
                    .password(&settings.password);
                DatabaseConnection::Postgres(
                    PgConnection::connect_with(&options)
                        .await
                        .map_err(DatabaseError::ConnectionError)?,
                )
            }
            DatabaseType::Mysql => {
                let options = MySqlConnectOptions::new()
                    .host(&settings.host)
                    .port(settings.port())
                    .database(&settings.database)
                    .username(&settings.user)
                    .password(&settings.password);
                DatabaseConnection::MySql(
                    MySqlConnection::connect_with(&options)
                        .await
                        .map_err(DatabaseError::ConnectionError)?,
                )
            }
        };

        Ok(MarkerStore { connection, table })
    }

    fn dialect(&self) -> Dialect {
        match self.connection {
            DatabaseConnection::Postgres(_) => Dialect::Postgres,
            DatabaseConnection::MySql(_) => Dialect::MySql,
        }
    }

    pub async fn run(&mut self, command: &MarkerCommand) -> Result<QueryResult, DatabaseError> {
        let statement = command.statement(self.dialect(), &self.table);
        debug!("executing \"{}\" with {:?}", statement.sql, statement.binds);

        match command {
            MarkerCommand::Select { .. } => {
                let names = self.fetch_column(&statement).await?;
                debug!("select returned {} rows", names.len());
                Ok(QueryResult::List(names))
            }
            MarkerCommand::CreateSchema => {
                self.execute(&statement).await?;
                info!("Table {} is available", self.table);
                Ok(QueryResult::Nothing)
            }
            MarkerCommand::Insert(marker) => {
                self.execute(&statement).await?;
                info!(
                    "Stored recovery marker {} -> {}",
                    marker.application_pod_name, marker.recovery_pod_name
                );
                Ok(QueryResult::Nothing)
            }
            MarkerCommand::Delete(_) => {
                let removed = self.execute(&statement).await?;
                info!("Deleted {} recovery markers from {}", removed, self.table);
                Ok(QueryResult::Nothing)
            }
        }
    }

    async fn execute(&mut self, statement: &Statement) -> Result<u64, DatabaseError> {
        let affected = match &mut self.connection {
            DatabaseConnection::Postgres(conn) => {
                let mut query = sqlx::query::<Postgres>(&statement.sql);
                for value in &statement.binds {
                    query = query.bind(value.as_str());
                }
                query.execute(&mut *conn).await.map(|r| r.rows_affected())
            }
            DatabaseConnection::MySql(conn) => {
                let mut query = sqlx::query::<MySql>(&statement.sql);
                for value in &statement.binds {
                    query = query.bind(value.as_str());
                }
                query.execute(&mut *conn).await.map(|r| r.rows_affected())
            }
        };

        affected.map_err(DatabaseError::QueryError)
    }

    async fn fetch_column(&mut self, statement: &Statement) -> Result<Vec<String>, DatabaseError> {
        let rows: Vec<Option<String>> = match &mut self.connection {
            DatabaseConnection::Postgres(conn) => {
                let mut query = sqlx::query_scalar::<Postgres, Option<String>>(&statement.sql);
                for value in &statement.binds {
                    query = query.bind(value.as_str());
                }
                query.fetch_all(&mut *conn).await
            }
            DatabaseConnection::MySql(conn) => {
                let mut query = sqlx::query_scalar::<MySql, Option<String>>(&statement.sql);
                for value in &statement.binds {
                    query = query.bind(value.as_str());
                }
                query.fetch_all(&mut *conn).await
            }
        }
        .map_err(DatabaseError::QueryError)?;

        // NULL names can only come from rows written outside this tool
        Ok(rows.into_iter().flatten().collect())
    }

    pub async fn close(self) -> Result<(), DatabaseError> {
        match self.connection {
            DatabaseConnection::Postgres(conn) => conn.close().await,
            DatabaseConnection::MySql(conn) => conn.close().await,
        }
        .map_err(DatabaseError::ConnectionError)
    }
}
