// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Query modules for persistence layer.
//!
//! This module contains all read-only queries for the persistence layer.
//!
//! ## Module Organization
//!
//! - `directory`: Staff, client and case lookups
//! - `associations`: Client-scoped staff assignments and past clients
//!
//! ## Backend-Specific Functions
//!
//! All query functions are generated in backend-specific monomorphic versions:
//! - Functions suffixed with `_sqlite` for `SQLite`
//! - Functions suffixed with `_mysql` for `MySQL`/`MariaDB`
//!
//! The `Persistence` adapter in `lib.rs` dispatches to the appropriate version
//! based on the active backend connection.

pub mod associations;
pub mod directory;

pub use associations::{
    list_case_staff_mysql, list_case_staff_sqlite, list_cases_for_staff_mysql,
    list_cases_for_staff_sqlite, list_past_clients_mysql, list_past_clients_sqlite,
    load_staff_associations_mysql, load_staff_associations_sqlite,
};
pub use directory::{
    get_case_mysql, get_case_sqlite, get_client_mysql, get_client_sqlite, get_staff_mysql,
    get_staff_sqlite, list_clients_mysql, list_clients_sqlite, list_staff_mysql,
    list_staff_sqlite,
};
