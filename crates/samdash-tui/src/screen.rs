//! Screen identifiers, tab order and credential gates.

use std::fmt;

use samdash_core::Credential;

/// Identifies each TUI screen. All but `Login` appear in the tab bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Login,
    Devices,
    Locations,
    Emails,
    Logs,
    Data,
    Users,
    Access,
}

impl ScreenId {
    /// Tab-bar order.
    pub const TABS: [ScreenId; 7] = [
        Self::Devices,
        Self::Locations,
        Self::Emails,
        Self::Logs,
        Self::Data,
        Self::Users,
        Self::Access,
    ];

    /// Lowest credential that may open this screen.
    pub fn required_credential(self) -> Credential {
        match self {
            Self::Users | Self::Access => Credential::Admin,
            _ => Credential::Guest,
        }
    }

    /// Tabs offered to an account, in tab order.
    pub fn visible_to(credential: Credential) -> Vec<ScreenId> {
        Self::TABS
            .into_iter()
            .filter(|s| credential >= s.required_credential())
            .collect()
    }

    /// Screen behind number key `n` (1-based) for this account.
    pub fn from_number(n: u8, credential: Credential) -> Option<Self> {
        let idx = usize::from(n).checked_sub(1)?;
        Self::visible_to(credential).get(idx).copied()
    }

    /// Next visible tab (wraps around).
    pub fn next(self, credential: Credential) -> Self {
        Self::step(self, credential, 1)
    }

    /// Previous visible tab (wraps around).
    pub fn prev(self, credential: Credential) -> Self {
        let len = Self::visible_to(credential).len();
        Self::step(self, credential, len.saturating_sub(1))
    }

    fn step(self, credential: Credential, by: usize) -> Self {
        let tabs = Self::visible_to(credential);
        let idx = tabs.iter().position(|&s| s == self).unwrap_or(0);
        tabs.get((idx + by) % tabs.len().max(1))
            .copied()
            .unwrap_or(Self::Devices)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Devices => "Devices",
            Self::Locations => "Locations",
            Self::Emails => "Emails",
            Self::Logs => "Logs",
            Self::Data => "Data",
            Self::Users => "Users",
            Self::Access => "Access",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
