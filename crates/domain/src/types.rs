// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Generates a string-backed identifier newtype.
///
/// Identifiers are opaque strings issued by the store (UUIDs in practice).
/// Surrounding whitespace is trimmed on construction; emptiness is checked
/// by `validate_identifier`, not here.
macro_rules! string_identifier {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// The identifier kind, used in error messages.
            pub const KIND: &'static str = $kind;

            /// Creates a new identifier from a string value.
            #[must_use]
            pub fn new(value: &str) -> Self {
                Self(value.trim().to_string())
            }

            /// Returns the identifier value.
            #[must_use]
            pub fn value(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_identifier!(
    /// Identifies a staff member (lawyer, paralegal, clerk).
    StaffId,
    "staff"
);
string_identifier!(
    /// Identifies a client of the firm.
    ClientId,
    "client"
);
string_identifier!(
    /// Identifies a case.
    CaseId,
    "case"
);

/// The lifecycle status of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CaseStatus {
    /// The case is being worked.
    #[default]
    Active,
    /// The case is waiting on an external party.
    Pending,
    /// The case has concluded.
    Closed,
    /// The case has been archived and is hidden from active listings.
    Inactive,
}

impl FromStr for CaseStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" | "open" => Ok(Self::Active),
            "pending" => Ok(Self::Pending),
            "closed" => Ok(Self::Closed),
            "inactive" => Ok(Self::Inactive),
            _ => Err(DomainError::InvalidCaseStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl CaseStatus {
    /// Converts this status to its stored string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Pending => "Pending",
            Self::Closed => "Closed",
            Self::Inactive => "INACTIVE",
        }
    }

    /// Returns whether the case appears in active case listings.
    #[must_use]
    pub const fn is_listed(&self) -> bool {
        !matches!(self, Self::Inactive)
    }
}

/// A staff member of the firm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    /// The staff member's identifier.
    pub staff_id: StaffId,
    /// The staff member's name.
    pub name: String,
    /// The staff member's role (e.g. "Lawyer", "Paralegal").
    pub role: String,
    /// Optional job designation (e.g. "Senior Partner").
    pub designation: Option<String>,
}

impl Staff {
    /// Creates a new `Staff` record without a designation.
    #[must_use]
    pub fn new(staff_id: StaffId, name: &str, role: &str) -> Self {
        Self {
            staff_id,
            name: name.to_string(),
            role: role.to_string(),
            designation: None,
        }
    }
}

/// A client of the firm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// The client's identifier.
    pub client_id: ClientId,
    /// The client's name.
    pub name: String,
    /// The client's phone number.
    pub phone_no: String,
    /// Optional postal address.
    pub address: Option<String>,
    /// Optional login email.
    pub email: Option<String>,
}

impl Client {
    /// Creates a new `Client` with only the required fields set.
    #[must_use]
    pub fn new(client_id: ClientId, name: &str, phone_no: &str) -> Self {
        Self {
            client_id,
            name: name.to_string(),
            phone_no: phone_no.to_string(),
            address: None,
            email: None,
        }
    }
}

/// A legal case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
    /// The case identifier.
    pub case_id: CaseId,
    /// The case title.
    pub title: String,
    /// Free-form case type (e.g. "civil", "criminal", "corporate").
    pub case_type: String,
    /// The case status.
    pub status: CaseStatus,
}

impl Case {
    /// Creates a new active `Case`.
    #[must_use]
    pub fn new(case_id: CaseId, title: &str, case_type: &str) -> Self {
        Self {
            case_id,
            title: title.to_string(),
            case_type: case_type.to_string(),
            status: CaseStatus::Active,
        }
    }

    /// Returns the `{case_id, title}` reference for this case.
    #[must_use]
    pub fn case_ref(&self) -> CaseRef {
        CaseRef {
            case_id: self.case_id.clone(),
            title: self.title.clone(),
        }
    }
}

/// A lightweight reference to a case, as shown next to a client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseRef {
    /// The case identifier.
    pub case_id: CaseId,
    /// The case title.
    pub title: String,
}
