// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for Lexdesk.
//!
//! Stores staff, clients, cases, client-case links, client-scoped staff
//! assignments and past-client history. Built on Diesel, with `SQLite` as
//! the default backend and `MySQL`/`MariaDB` as an opt-in one.
//!
//! ## Backends
//!
//! - **`SQLite`** (default): development, tests, single-host deployments.
//!   In-memory databases are unique per `Persistence::new_in_memory()`
//!   call so tests never share state.
//! - **`MariaDB`/`MySQL`**: compiled in by default, validated only by the
//!   ignored tests run through `cargo xtask test-mariadb`.
//!
//! Each backend has its own migration directory (`migrations/`,
//! `migrations_mysql/`) with equivalent schemas.
//!
//! ## Reassignment Store
//!
//! `Persistence` implements `lexdesk::ReassignmentStore`. Every
//! `apply_transfer` runs in one database transaction, so a failing client
//! leaves no half-applied case behind.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::{MysqlConnection, SqliteConnection};
use lexdesk::{AssociationChange, CaseTransfer, ReassignmentStore, StoreError};
use lexdesk_domain::{
    Case, CaseId, Client, ClientId, Staff, StaffCaseAssociation, StaffId,
};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generates monomorphic `_sqlite` and `_mysql` variants of a query or
/// mutation from a single body.
///
/// Diesel needs a concrete backend type at compile time, so the body is
/// duplicated with the connection type substituted. Dispatch between the
/// two happens only in `Persistence`.
///
/// ```ignore
/// backend_fn! {
///     pub fn count_staff(conn: &mut _) -> Result<i64, PersistenceError> {
///         Ok(staff::table.count().get_result(conn)?)
///     }
/// }
/// ```
macro_rules! backend_fn {
    (
        $(#[$meta:meta])*
        $vis:vis fn $name:ident (
            $conn:ident : &mut _
            $(, $param:ident : $param_ty:ty)* $(,)?
        ) -> $ret:ty
        $body:block
    ) => {
        pastey::paste! {
            $(#[$meta])*
            $vis fn [<$name _sqlite>] (
                $conn: &mut SqliteConnection
                $(, $param : $param_ty)*
            ) -> $ret
            $body

            $(#[$meta])*
            $vis fn [<$name _mysql>] (
                $conn: &mut MysqlConnection
                $(, $param : $param_ty)*
            ) -> $ret
            $body
        }
    };
}

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{AssignmentData, PastClientData};
pub use error::PersistenceError;

use backend::PersistenceBackend;

/// Backend-specific database connection.
pub enum BackendConnection {
    Sqlite(SqliteConnection),
    Mysql(MysqlConnection),
}

/// Persistence adapter for the case-management store.
///
/// Backend selection happens once at construction time and is transparent
/// to callers.
pub struct Persistence {
    pub(crate) conn: BackendConnection,
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let backend: &str = match self.conn {
            BackendConnection::Sqlite(_) => "sqlite",
            BackendConnection::Mysql(_) => "mysql",
        };
        f.debug_struct("Persistence")
            .field("backend", &backend)
            .finish()
    }
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call gets its own shared-cache database, named from an atomic
    /// counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn: BackendConnection::Sqlite(conn),
        })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn: BackendConnection::Sqlite(conn),
        })
    }

    /// Creates a new persistence adapter with a `MySQL`/`MariaDB` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_mysql(database_url: &str) -> Result<Self, PersistenceError> {
        let mut conn: MysqlConnection = backend::mysql::initialize_database(database_url)?;
        backend::mysql::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn: BackendConnection::Mysql(conn),
        })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => conn.verify_foreign_key_enforcement(),
            BackendConnection::Mysql(conn) => conn.verify_foreign_key_enforcement(),
        }
    }

    // ========================================================================
    // Seeding
    // ========================================================================

    /// Inserts a staff member.
    ///
    /// # Errors
    ///
    /// Returns an error if the ID already exists or the insert fails.
    pub fn create_staff(&mut self, staff: &Staff) -> Result<(), PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => mutations::create_staff_sqlite(conn, staff),
            BackendConnection::Mysql(conn) => mutations::create_staff_mysql(conn, staff),
        }
    }

    /// Inserts a client.
    ///
    /// # Errors
    ///
    /// Returns an error if the ID already exists or the insert fails.
    pub fn create_client(&mut self, client: &Client) -> Result<(), PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => mutations::create_client_sqlite(conn, client),
            BackendConnection::Mysql(conn) => mutations::create_client_mysql(conn, client),
        }
    }

    /// Inserts a case.
    ///
    /// # Errors
    ///
    /// Returns an error if the ID already exists or the insert fails.
    pub fn create_case(&mut self, case: &Case) -> Result<(), PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => mutations::create_case_sqlite(conn, case),
            BackendConnection::Mysql(conn) => mutations::create_case_mysql(conn, case),
        }
    }

    /// Links a client to a case.
    ///
    /// # Errors
    ///
    /// Returns an error if either side is missing or the link exists.
    pub fn link_client_case(
        &mut self,
        client_id: &ClientId,
        case_id: &CaseId,
    ) -> Result<(), PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => {
                mutations::link_client_case_sqlite(conn, client_id.value(), case_id.value())
            }
            BackendConnection::Mysql(conn) => {
                mutations::link_client_case_mysql(conn, client_id.value(), case_id.value())
            }
        }
    }

    /// Assigns a staff member to a case for one client.
    ///
    /// # Returns
    ///
    /// The new assignment ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the staff member is missing, the client is not
    /// linked to the case, or the assignment already exists.
    pub fn assign_staff_to_client_case(
        &mut self,
        staff_id: &StaffId,
        case_id: &CaseId,
        client_id: &ClientId,
    ) -> Result<i64, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => mutations::assign_staff_to_client_case_sqlite(
                conn,
                staff_id.value(),
                case_id.value(),
                client_id.value(),
            ),
            BackendConnection::Mysql(conn) => mutations::assign_staff_to_client_case_mysql(
                conn,
                staff_id.value(),
                case_id.value(),
                client_id.value(),
            ),
        }
    }

    /// Assigns a staff member to a case for every client linked to it.
    ///
    /// # Returns
    ///
    /// The number of assignments created.
    ///
    /// # Errors
    ///
    /// Returns an error if the staff member or case is missing.
    pub fn assign_staff_to_case(
        &mut self,
        staff_id: &StaffId,
        case_id: &CaseId,
    ) -> Result<usize, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => {
                mutations::assign_staff_to_case_sqlite(conn, staff_id.value(), case_id.value())
            }
            BackendConnection::Mysql(conn) => {
                mutations::assign_staff_to_case_mysql(conn, staff_id.value(), case_id.value())
            }
        }
    }

    // ========================================================================
    // Directory Queries
    // ========================================================================

    /// Retrieves a staff member.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::StaffNotFound` if absent.
    pub fn get_staff(&mut self, staff_id: &StaffId) -> Result<Staff, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => queries::get_staff_sqlite(conn, staff_id.value()),
            BackendConnection::Mysql(conn) => queries::get_staff_mysql(conn, staff_id.value()),
        }
    }

    /// Lists every staff member, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_staff(&mut self) -> Result<Vec<Staff>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => queries::list_staff_sqlite(conn),
            BackendConnection::Mysql(conn) => queries::list_staff_mysql(conn),
        }
    }

    /// Retrieves a client.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::ClientNotFound` if absent.
    pub fn get_client(&mut self, client_id: &ClientId) -> Result<Client, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => queries::get_client_sqlite(conn, client_id.value()),
            BackendConnection::Mysql(conn) => queries::get_client_mysql(conn, client_id.value()),
        }
    }

    /// Lists every client, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_clients(&mut self) -> Result<Vec<Client>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => queries::list_clients_sqlite(conn),
            BackendConnection::Mysql(conn) => queries::list_clients_mysql(conn),
        }
    }

    /// Retrieves a case.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::CaseNotFound` if absent.
    pub fn get_case(&mut self, case_id: &CaseId) -> Result<Case, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => queries::get_case_sqlite(conn, case_id.value()),
            BackendConnection::Mysql(conn) => queries::get_case_mysql(conn, case_id.value()),
        }
    }

    // ========================================================================
    // Association Queries
    // ========================================================================

    /// Loads a staff member's case associations with nested clients.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::StaffNotFound` if the staff member does
    /// not exist.
    pub fn load_staff_associations(
        &mut self,
        staff_id: &StaffId,
    ) -> Result<Vec<StaffCaseAssociation>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => {
                queries::load_staff_associations_sqlite(conn, staff_id.value())
            }
            BackendConnection::Mysql(conn) => {
                queries::load_staff_associations_mysql(conn, staff_id.value())
            }
        }
    }

    /// Lists the distinct cases a staff member handles.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_cases_for_staff(&mut self, staff_id: &StaffId) -> Result<Vec<Case>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => {
                queries::list_cases_for_staff_sqlite(conn, staff_id.value())
            }
            BackendConnection::Mysql(conn) => {
                queries::list_cases_for_staff_mysql(conn, staff_id.value())
            }
        }
    }

    /// Lists the past-client records a staff member left behind.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_past_clients(
        &mut self,
        staff_id: &StaffId,
    ) -> Result<Vec<PastClientData>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => {
                queries::list_past_clients_sqlite(conn, staff_id.value())
            }
            BackendConnection::Mysql(conn) => queries::list_past_clients_mysql(conn, staff_id.value()),
        }
    }

    /// Lists every client-scoped assignment on a case.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_case_staff(
        &mut self,
        case_id: &CaseId,
    ) -> Result<Vec<AssignmentData>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => queries::list_case_staff_sqlite(conn, case_id.value()),
            BackendConnection::Mysql(conn) => queries::list_case_staff_mysql(conn, case_id.value()),
        }
    }

    // ========================================================================
    // Transfers
    // ========================================================================

    /// Moves one client's cases away from a departing staff member in a
    /// single transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the client or target is missing, or if the
    /// transaction fails. Nothing is changed in either case.
    pub fn apply_transfer(
        &mut self,
        transfer: &CaseTransfer,
    ) -> Result<Vec<AssociationChange>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => mutations::apply_transfer_sqlite(conn, transfer),
            BackendConnection::Mysql(conn) => mutations::apply_transfer_mysql(conn, transfer),
        }
    }
}

impl ReassignmentStore for Persistence {
    fn load_staff_associations(
        &mut self,
        staff_id: &StaffId,
    ) -> Result<Vec<StaffCaseAssociation>, StoreError> {
        Ok(Self::load_staff_associations(self, staff_id)?)
    }

    fn list_staff(&mut self) -> Result<Vec<Staff>, StoreError> {
        Ok(Self::list_staff(self)?)
    }

    fn apply_transfer(
        &mut self,
        transfer: &CaseTransfer,
    ) -> Result<Vec<AssociationChange>, StoreError> {
        Ok(Self::apply_transfer(self, transfer)?)
    }
}
