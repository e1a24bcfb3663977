// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-agnostic mutation modules.
//!
//! This module contains all state-changing operations for the persistence layer.
//! Most mutations use Diesel DSL and are backend-agnostic, with minimal use of
//! backend-specific helpers (e.g., `last_insert_rowid()` for `SQLite`).
//!
//! ## Module Organization
//!
//! - `directory`: Seeding of staff, clients, cases and client-case links
//! - `assignments`: Staff assignment and the transactional case transfer

pub mod assignments;
pub mod directory;

pub use assignments::{
    apply_transfer_mysql, apply_transfer_sqlite, assign_staff_to_case_mysql,
    assign_staff_to_case_sqlite, assign_staff_to_client_case_mysql,
    assign_staff_to_client_case_sqlite,
};
pub use directory::{
    create_case_mysql, create_case_sqlite, create_client_mysql, create_client_sqlite,
    create_staff_mysql, create_staff_sqlite, link_client_case_mysql, link_client_case_sqlite,
};
