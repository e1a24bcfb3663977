// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Staff assignment mutations and the transactional case transfer.
//!
//! Assignments are client-scoped: a row `(staff, case, client)` says the
//! staff member handles the case on behalf of that client, and
//! `(client, case)` must be an existing client-case link.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use lexdesk::{AssociationChange, CaseTransfer};
use lexdesk_domain::StaffId;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::diesel_schema::{cases, client_cases, clients, past_clients, staff, staff_case_assignments};
use crate::error::PersistenceError;

/// Returns the current UTC time as an RFC 3339 string.
fn current_timestamp() -> Result<String, PersistenceError> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::Other(format!("Failed to format timestamp: {e}")))
}

backend_fn! {
/// Assigns a staff member to a case on behalf of one client.
///
/// # Returns
///
/// The new assignment ID.
///
/// # Errors
///
/// Returns `StaffNotFound` if the staff member is missing,
/// `ClientCaseNotLinked` if the client is not linked to the case, or an
/// error if the assignment already exists.
pub fn assign_staff_to_client_case(
    conn: &mut _,
    staff_id: &str,
    case_id: &str,
    client_id: &str,
) -> Result<i64, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let staff_count: i64 = staff::table
            .filter(staff::staff_id.eq(staff_id))
            .count()
            .get_result(conn)?;
        if staff_count == 0 {
            return Err(PersistenceError::StaffNotFound(staff_id.to_string()));
        }

        let link_count: i64 = client_cases::table
            .filter(client_cases::client_id.eq(client_id))
            .filter(client_cases::case_id.eq(case_id))
            .count()
            .get_result(conn)?;
        if link_count == 0 {
            return Err(PersistenceError::ClientCaseNotLinked {
                client_id: client_id.to_string(),
                case_id: case_id.to_string(),
            });
        }

        diesel::insert_into(staff_case_assignments::table)
            .values((
                staff_case_assignments::staff_id.eq(staff_id),
                staff_case_assignments::case_id.eq(case_id),
                staff_case_assignments::client_id.eq(client_id),
            ))
            .execute(conn)?;

        let assignment_id: i64 = conn.get_last_insert_rowid()?;
        info!(assignment_id, staff_id, case_id, client_id, "Assigned staff to client case");
        Ok(assignment_id)
    })
}
}

backend_fn! {
/// Assigns a staff member to a case for every client linked to it.
///
/// Existing assignments are left as they are.
///
/// # Returns
///
/// The number of assignments created.
///
/// # Errors
///
/// Returns `StaffNotFound` or `CaseNotFound` if either is missing, or an
/// error if the database write fails.
pub fn assign_staff_to_case(
    conn: &mut _,
    staff_id: &str,
    case_id: &str,
) -> Result<usize, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let staff_count: i64 = staff::table
            .filter(staff::staff_id.eq(staff_id))
            .count()
            .get_result(conn)?;
        if staff_count == 0 {
            return Err(PersistenceError::StaffNotFound(staff_id.to_string()));
        }

        let case_count: i64 = cases::table
            .filter(cases::case_id.eq(case_id))
            .count()
            .get_result(conn)?;
        if case_count == 0 {
            return Err(PersistenceError::CaseNotFound(case_id.to_string()));
        }

        let client_ids: Vec<String> = client_cases::table
            .filter(client_cases::case_id.eq(case_id))
            .order(client_cases::client_id.asc())
            .select(client_cases::client_id)
            .load(conn)?;

        let mut created: usize = 0;
        for client_id in &client_ids {
            created += diesel::insert_or_ignore_into(staff_case_assignments::table)
                .values((
                    staff_case_assignments::staff_id.eq(staff_id),
                    staff_case_assignments::case_id.eq(case_id),
                    staff_case_assignments::client_id.eq(client_id),
                ))
                .execute(conn)?;
        }

        info!(staff_id, case_id, created, "Assigned staff to case");
        Ok(created)
    })
}
}

backend_fn! {
/// Moves one client's cases away from a departing staff member.
///
/// Runs in a single transaction: either every case is processed or the
/// store is left unchanged. For each case:
///
/// - if the departing staff no longer holds the client-scoped assignment,
///   the case is reported as `AlreadyApplied`;
/// - on retirement the assignment is removed and a past-client record kept;
/// - on reassignment the assignment is removed and the target given the
///   same client-scoped assignment, unless they already hold it.
///
/// # Errors
///
/// Returns `ClientNotFound` or `StaffNotFound` if the client or the target
/// is missing, or an error if any statement fails.
pub fn apply_transfer(
    conn: &mut _,
    transfer: &CaseTransfer,
) -> Result<Vec<AssociationChange>, PersistenceError> {
    let client_id: &str = transfer.client_id.value();
    let from_staff_id: &str = transfer.from_staff_id.value();
    let to_staff_id: Option<&str> = transfer.to_staff_id.as_ref().map(StaffId::value);
    let recorded_at: String = current_timestamp()?;

    conn.transaction::<_, PersistenceError, _>(|conn| {
        let client_count: i64 = clients::table
            .filter(clients::client_id.eq(client_id))
            .count()
            .get_result(conn)?;
        if client_count == 0 {
            return Err(PersistenceError::ClientNotFound(client_id.to_string()));
        }

        if let Some(target) = to_staff_id {
            let target_count: i64 = staff::table
                .filter(staff::staff_id.eq(target))
                .count()
                .get_result(conn)?;
            if target_count == 0 {
                return Err(PersistenceError::StaffNotFound(target.to_string()));
            }
        }

        let mut changes: Vec<AssociationChange> = Vec::with_capacity(transfer.case_ids.len());

        for case_id in &transfer.case_ids {
            let removed: usize = diesel::delete(
                staff_case_assignments::table
                    .filter(staff_case_assignments::staff_id.eq(from_staff_id))
                    .filter(staff_case_assignments::case_id.eq(case_id.value()))
                    .filter(staff_case_assignments::client_id.eq(client_id)),
            )
            .execute(conn)?;

            if removed == 0 {
                debug!(client_id, case_id = %case_id, "Assignment already transferred");
                changes.push(AssociationChange::AlreadyApplied(case_id.clone()));
                continue;
            }

            match to_staff_id {
                None => {
                    diesel::insert_or_ignore_into(past_clients::table)
                        .values((
                            past_clients::client_id.eq(client_id),
                            past_clients::staff_id.eq(from_staff_id),
                            past_clients::case_id.eq(case_id.value()),
                            past_clients::recorded_at.eq(&recorded_at),
                        ))
                        .execute(conn)?;
                    changes.push(AssociationChange::Retired(case_id.clone()));
                }
                Some(target) => {
                    diesel::insert_or_ignore_into(staff_case_assignments::table)
                        .values((
                            staff_case_assignments::staff_id.eq(target),
                            staff_case_assignments::case_id.eq(case_id.value()),
                            staff_case_assignments::client_id.eq(client_id),
                        ))
                        .execute(conn)?;
                    changes.push(AssociationChange::Reassigned(case_id.clone()));
                }
            }
        }

        info!(
            client_id,
            from_staff_id,
            to_staff_id = to_staff_id.unwrap_or("-"),
            changed = changes.iter().filter(|c| c.is_change()).count(),
            "Applied case transfer"
        );
        Ok(changes)
    })
}
}
