//! Screen implementations. Each screen is a top-level Component.

pub mod access;
pub mod data;
pub mod devices;
pub mod directory;
pub mod entity;
pub mod login;
pub mod logs;
pub mod users;

use samdash_core::{Device, EmailRecipient, Location, LogEntry, User};

use crate::component::Component;
use crate::screen::ScreenId;

use self::entity::EntityScreen;

/// Create the components behind every tab.
pub fn create_screens(page_size: usize) -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (
            ScreenId::Devices,
            Box::new(EntityScreen::<Device>::new(page_size)),
        ),
        (
            ScreenId::Locations,
            Box::new(EntityScreen::<Location>::new(page_size)),
        ),
        (
            ScreenId::Emails,
            Box::new(EntityScreen::<EmailRecipient>::new(page_size)),
        ),
        (
            ScreenId::Logs,
            Box::new(EntityScreen::<LogEntry>::new(page_size)),
        ),
        (ScreenId::Data, Box::new(data::DataScreen::new(page_size))),
        (
            ScreenId::Users,
            Box::new(EntityScreen::<User>::new(page_size)),
        ),
        (
            ScreenId::Access,
            Box::new(access::AccessScreen::new(page_size)),
        ),
    ]
}
