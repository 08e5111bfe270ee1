// ── Reference data: installation sites and alert recipients ──

use serde::{Deserialize, Serialize};

use crate::list::Listable;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: i64,
    pub name: String,
}

impl Listable for Location {
    fn id(&self) -> i64 {
        self.id
    }

    fn display_key(&self) -> &str {
        &self.name
    }
}

/// An address on the alert recipient list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRecipient {
    pub id: i64,
    pub address: String,
}

impl Listable for EmailRecipient {
    fn id(&self) -> i64 {
        self.id
    }

    fn display_key(&self) -> &str {
        &self.address
    }
}
