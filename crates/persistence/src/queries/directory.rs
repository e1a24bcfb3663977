// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Staff, client and case lookups.

use std::str::FromStr;

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use lexdesk_domain::{Case, CaseId, CaseStatus, Client, ClientId, Staff, StaffId};
use tracing::debug;

use crate::diesel_schema::{cases, clients, staff};
use crate::error::PersistenceError;

/// Diesel Queryable struct for staff rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = staff)]
pub struct StaffRow {
    staff_id: String,
    name: String,
    role: String,
    designation: Option<String>,
}

impl From<StaffRow> for Staff {
    fn from(row: StaffRow) -> Self {
        Self {
            staff_id: StaffId::new(&row.staff_id),
            name: row.name,
            role: row.role,
            designation: row.designation,
        }
    }
}

/// Diesel Queryable struct for client rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = clients)]
pub struct ClientRow {
    client_id: String,
    name: String,
    phone_no: String,
    address: Option<String>,
    email: Option<String>,
}

impl From<ClientRow> for Client {
    fn from(row: ClientRow) -> Self {
        Self {
            client_id: ClientId::new(&row.client_id),
            name: row.name,
            phone_no: row.phone_no,
            address: row.address,
            email: row.email,
        }
    }
}

/// Diesel Queryable struct for case rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = cases)]
pub struct CaseRow {
    case_id: String,
    title: String,
    case_type: String,
    status: String,
}

impl TryFrom<CaseRow> for Case {
    type Error = PersistenceError;

    fn try_from(row: CaseRow) -> Result<Self, Self::Error> {
        let status: CaseStatus = CaseStatus::from_str(&row.status).map_err(|e| {
            PersistenceError::InvalidStoredValue(format!("case {}: {e}", row.case_id))
        })?;
        Ok(Self {
            case_id: CaseId::new(&row.case_id),
            title: row.title,
            case_type: row.case_type,
            status,
        })
    }
}

backend_fn! {
/// Retrieves a staff member by ID.
///
/// # Errors
///
/// Returns `PersistenceError::StaffNotFound` if no such staff member exists.
pub fn get_staff(conn: &mut _, staff_id: &str) -> Result<Staff, PersistenceError> {
    debug!(staff_id, "Looking up staff member");

    let result: Result<StaffRow, diesel::result::Error> = staff::table
        .find(staff_id)
        .select(StaffRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Staff::from(row)),
        Err(diesel::result::Error::NotFound) => {
            Err(PersistenceError::StaffNotFound(staff_id.to_string()))
        }
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Lists every staff member, ordered by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_staff(conn: &mut _) -> Result<Vec<Staff>, PersistenceError> {
    let rows: Vec<StaffRow> = staff::table
        .order(staff::staff_id.asc())
        .select(StaffRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(Staff::from).collect())
}
}

backend_fn! {
/// Retrieves a client by ID.
///
/// # Errors
///
/// Returns `PersistenceError::ClientNotFound` if no such client exists.
pub fn get_client(conn: &mut _, client_id: &str) -> Result<Client, PersistenceError> {
    let result: Result<ClientRow, diesel::result::Error> = clients::table
        .find(client_id)
        .select(ClientRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Client::from(row)),
        Err(diesel::result::Error::NotFound) => {
            Err(PersistenceError::ClientNotFound(client_id.to_string()))
        }
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Lists every client, ordered by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_clients(conn: &mut _) -> Result<Vec<Client>, PersistenceError> {
    let rows: Vec<ClientRow> = clients::table
        .order(clients::client_id.asc())
        .select(ClientRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(Client::from).collect())
}
}

backend_fn! {
/// Retrieves a case by ID.
///
/// # Errors
///
/// Returns `PersistenceError::CaseNotFound` if no such case exists, or
/// `PersistenceError::InvalidStoredValue` if its status is unrecognized.
pub fn get_case(conn: &mut _, case_id: &str) -> Result<Case, PersistenceError> {
    let result: Result<CaseRow, diesel::result::Error> = cases::table
        .find(case_id)
        .select(CaseRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Case::try_from(row),
        Err(diesel::result::Error::NotFound) => {
            Err(PersistenceError::CaseNotFound(case_id.to_string()))
        }
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}
