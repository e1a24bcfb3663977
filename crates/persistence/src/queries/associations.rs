// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Client-scoped staff assignment queries.
//!
//! A staff member's associations are rebuilt from the
//! `staff_case_assignments` rows: one association per case, carrying every
//! client the staff member handles on it. Cases appear in the order the
//! staff member was first assigned to them.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use lexdesk_domain::{Case, Client, StaffCaseAssociation, StaffId};
use tracing::debug;

use crate::data_models::{AssignmentData, PastClientData};
use crate::diesel_schema::{cases, clients, past_clients, staff, staff_case_assignments};
use crate::error::PersistenceError;
use crate::queries::directory::{CaseRow, ClientRow};

/// Diesel Queryable struct for assignment rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = staff_case_assignments)]
struct AssignmentRow {
    assignment_id: i64,
    staff_id: String,
    case_id: String,
    client_id: String,
}

/// Diesel Queryable struct for past-client rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = past_clients)]
struct PastClientRow {
    history_id: i64,
    client_id: String,
    staff_id: String,
    case_id: String,
    recorded_at: String,
}

/// Groups `(case, client)` rows into one association per case.
fn group_associations(
    staff_id: &StaffId,
    rows: Vec<(CaseRow, ClientRow)>,
) -> Result<Vec<StaffCaseAssociation>, PersistenceError> {
    let mut associations: Vec<StaffCaseAssociation> = Vec::new();

    for (case_row, client_row) in rows {
        let case: Case = Case::try_from(case_row)?;
        let client: Client = Client::from(client_row);

        if let Some(existing) = associations
            .iter_mut()
            .find(|a| a.case.case_id == case.case_id)
        {
            if !existing.handles_client(&client.client_id) {
                existing.clients.push(client);
            }
        } else {
            associations.push(StaffCaseAssociation::new(staff_id.clone(), case).with_client(client));
        }
    }

    Ok(associations)
}

backend_fn! {
/// Loads a staff member's case associations with the clients handled on each.
///
/// # Errors
///
/// Returns `PersistenceError::StaffNotFound` if the staff member does not
/// exist, or an error if the database query fails.
pub fn load_staff_associations(
    conn: &mut _,
    staff_id: &str,
) -> Result<Vec<StaffCaseAssociation>, PersistenceError> {
    let staff_count: i64 = staff::table
        .filter(staff::staff_id.eq(staff_id))
        .count()
        .get_result(conn)?;
    if staff_count == 0 {
        return Err(PersistenceError::StaffNotFound(staff_id.to_string()));
    }

    let rows: Vec<(CaseRow, ClientRow)> = staff_case_assignments::table
        .inner_join(cases::table)
        .inner_join(clients::table)
        .filter(staff_case_assignments::staff_id.eq(staff_id))
        .order(staff_case_assignments::assignment_id.asc())
        .select((CaseRow::as_select(), ClientRow::as_select()))
        .load(conn)?;

    debug!(staff_id, rows = rows.len(), "Loaded staff assignments");

    group_associations(&StaffId::new(staff_id), rows)
}
}

backend_fn! {
/// Lists the distinct cases a staff member is assigned to, ordered by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_cases_for_staff(conn: &mut _, staff_id: &str) -> Result<Vec<Case>, PersistenceError> {
    let rows: Vec<CaseRow> = staff_case_assignments::table
        .inner_join(cases::table)
        .filter(staff_case_assignments::staff_id.eq(staff_id))
        .select(CaseRow::as_select())
        .distinct()
        .order(cases::case_id.asc())
        .load(conn)?;

    rows.into_iter().map(Case::try_from).collect()
}
}

backend_fn! {
/// Lists every client-scoped assignment on a case.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_case_staff(conn: &mut _, case_id: &str) -> Result<Vec<AssignmentData>, PersistenceError> {
    let rows: Vec<AssignmentRow> = staff_case_assignments::table
        .filter(staff_case_assignments::case_id.eq(case_id))
        .order(staff_case_assignments::assignment_id.asc())
        .select(AssignmentRow::as_select())
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|row| AssignmentData {
            assignment_id: row.assignment_id,
            staff_id: row.staff_id,
            case_id: row.case_id,
            client_id: row.client_id,
        })
        .collect())
}
}

backend_fn! {
/// Lists the past-client records left behind by a staff member.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_past_clients(
    conn: &mut _,
    staff_id: &str,
) -> Result<Vec<PastClientData>, PersistenceError> {
    let rows: Vec<PastClientRow> = past_clients::table
        .filter(past_clients::staff_id.eq(staff_id))
        .order(past_clients::history_id.asc())
        .select(PastClientRow::as_select())
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|row| PastClientData {
            history_id: row.history_id,
            client_id: row.client_id,
            staff_id: row.staff_id,
            case_id: row.case_id,
            recorded_at: row.recorded_at,
        })
        .collect())
}
}
