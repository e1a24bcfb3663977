// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Seeding mutations for staff, clients, cases and client-case links.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use lexdesk_domain::{Case, Client, Staff};
use tracing::info;

use crate::diesel_schema::{cases, client_cases, clients, staff};
use crate::error::PersistenceError;

backend_fn! {
/// Inserts a staff member.
///
/// # Errors
///
/// Returns an error if the staff ID already exists or the insert fails.
pub fn create_staff(conn: &mut _, member: &Staff) -> Result<(), PersistenceError> {
    diesel::insert_into(staff::table)
        .values((
            staff::staff_id.eq(member.staff_id.value()),
            staff::name.eq(&member.name),
            staff::role.eq(&member.role),
            staff::designation.eq(member.designation.as_deref()),
        ))
        .execute(conn)?;

    info!(staff_id = %member.staff_id, "Created staff member");
    Ok(())
}
}

backend_fn! {
/// Inserts a client.
///
/// # Errors
///
/// Returns an error if the client ID already exists or the insert fails.
pub fn create_client(conn: &mut _, client: &Client) -> Result<(), PersistenceError> {
    diesel::insert_into(clients::table)
        .values((
            clients::client_id.eq(client.client_id.value()),
            clients::name.eq(&client.name),
            clients::phone_no.eq(&client.phone_no),
            clients::address.eq(client.address.as_deref()),
            clients::email.eq(client.email.as_deref()),
        ))
        .execute(conn)?;

    info!(client_id = %client.client_id, "Created client");
    Ok(())
}
}

backend_fn! {
/// Inserts a case.
///
/// # Errors
///
/// Returns an error if the case ID already exists or the insert fails.
pub fn create_case(conn: &mut _, case: &Case) -> Result<(), PersistenceError> {
    diesel::insert_into(cases::table)
        .values((
            cases::case_id.eq(case.case_id.value()),
            cases::title.eq(&case.title),
            cases::case_type.eq(&case.case_type),
            cases::status.eq(case.status.as_str()),
        ))
        .execute(conn)?;

    info!(case_id = %case.case_id, status = case.status.as_str(), "Created case");
    Ok(())
}
}

backend_fn! {
/// Links a client to a case.
///
/// # Errors
///
/// Returns `ClientNotFound` or `CaseNotFound` if either side is missing, or
/// an error if the link already exists.
pub fn link_client_case(
    conn: &mut _,
    client_id: &str,
    case_id: &str,
) -> Result<(), PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let client_count: i64 = clients::table
            .filter(clients::client_id.eq(client_id))
            .count()
            .get_result(conn)?;
        if client_count == 0 {
            return Err(PersistenceError::ClientNotFound(client_id.to_string()));
        }

        let case_count: i64 = cases::table
            .filter(cases::case_id.eq(case_id))
            .count()
            .get_result(conn)?;
        if case_count == 0 {
            return Err(PersistenceError::CaseNotFound(case_id.to_string()));
        }

        diesel::insert_into(client_cases::table)
            .values((
                client_cases::client_id.eq(client_id),
                client_cases::case_id.eq(case_id),
            ))
            .execute(conn)?;

        info!(client_id, case_id, "Linked client to case");
        Ok(())
    })
}
}
