// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

/// A historical relationship left behind when a client is retired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PastClientData {
    pub history_id: i64,
    pub client_id: String,
    pub staff_id: String,
    pub case_id: String,
    pub recorded_at: String,
}

/// One client-scoped staff assignment on a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentData {
    pub assignment_id: i64,
    pub staff_id: String,
    pub case_id: String,
    pub client_id: String,
}
