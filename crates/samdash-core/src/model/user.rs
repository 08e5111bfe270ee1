// ── User domain types ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::list::Listable;

/// Access level of a user account.
///
/// Gates which sections of the dashboard are offered: guests only read,
/// operators manage devices and reference data, admins also manage users
/// and permissions.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Credential {
    Guest,
    Operator,
    Admin,
    Superadmin,
}

impl Credential {
    /// May create/update/delete devices, locations and email recipients.
    pub fn can_edit(self) -> bool {
        self >= Self::Operator
    }

    /// May manage user accounts and device permissions.
    pub fn can_administer(self) -> bool {
        self >= Self::Admin
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    /// Backend-assigned business identifier (e.g. `U001`), if any.
    pub user_id: Option<String>,
    pub username: String,
    pub credential: Option<Credential>,
}

impl User {
    /// Effective credential; accounts without one are treated as guests.
    pub fn effective_credential(&self) -> Credential {
        self.credential.unwrap_or(Credential::Guest)
    }
}

impl Listable for User {
    fn id(&self) -> i64 {
        self.id
    }

    fn display_key(&self) -> &str {
        &self.username
    }
}
