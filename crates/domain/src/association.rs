// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{Case, Client, ClientId, StaffId};
use serde::{Deserialize, Serialize};

/// A staff member's association with one case.
///
/// Carries the case itself and the clients the staff member handles on
/// that case. A staff member may handle a case for only some of the
/// clients linked to it, so `clients` is a subset of the case's full
/// client roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffCaseAssociation {
    /// The staff member holding the association.
    pub staff_id: StaffId,
    /// The associated case.
    pub case: Case,
    /// Clients on this case handled by the staff member, in link order.
    pub clients: Vec<Client>,
}

impl StaffCaseAssociation {
    /// Creates an association with no clients attached yet.
    #[must_use]
    pub const fn new(staff_id: StaffId, case: Case) -> Self {
        Self {
            staff_id,
            case,
            clients: Vec::new(),
        }
    }

    /// Returns the association with an additional client attached.
    #[must_use]
    pub fn with_client(mut self, client: Client) -> Self {
        self.clients.push(client);
        self
    }

    /// Returns whether the staff member handles this case for the given client.
    #[must_use]
    pub fn handles_client(&self, client_id: &ClientId) -> bool {
        self.clients.iter().any(|c| &c.client_id == client_id)
    }
}
