//! Command-line helpers for transaction recovery in an application-server
//! cluster: `queryapi` reads and patches the orchestration API, `querydb`
//! keeps recovery markers in a SQL table.

pub mod db;
pub mod environment;
pub mod kube;
pub mod logging;
pub mod output;
pub mod query;
