// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use lexdesk::StoreError;

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// The requested staff member was not found.
    StaffNotFound(String),
    /// The requested client was not found.
    ClientNotFound(String),
    /// The requested case was not found.
    CaseNotFound(String),
    /// The client is not linked to the case.
    ClientCaseNotLinked { client_id: String, case_id: String },
    /// A stored value could not be mapped back to a domain type.
    InvalidStoredValue(String),
    /// The requested resource was not found.
    NotFound(String),
    /// A general error occurred.
    Other(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::StaffNotFound(id) => write!(f, "Staff not found: {id}"),
            Self::ClientNotFound(id) => write!(f, "Client not found: {id}"),
            Self::CaseNotFound(id) => write!(f, "Case not found: {id}"),
            Self::ClientCaseNotLinked { client_id, case_id } => {
                write!(f, "Client {client_id} is not linked to case {case_id}")
            }
            Self::InvalidStoredValue(msg) => write!(f, "Invalid stored value: {msg}"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<PersistenceError> for StoreError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::StaffNotFound(id) => Self::NotFound {
                entity: "staff",
                id,
            },
            PersistenceError::ClientNotFound(id) => Self::NotFound {
                entity: "client",
                id,
            },
            PersistenceError::CaseNotFound(id) => Self::NotFound { entity: "case", id },
            PersistenceError::NotFound(msg) => Self::NotFound {
                entity: "record",
                id: msg,
            },
            other => Self::Backend(other.to_string()),
        }
    }
}
