//! Data bridge: connects [`Controller`] streams to TUI actions.
//!
//! Runs as a background task for the lifetime of one session. Every list
//! snapshot and fetch-state change is forwarded as an [`Action`] through
//! the TUI's action channel.

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use samdash_core::{Controller, EntityKind, FetchState};

use crate::action::Action;

const KINDS: [EntityKind; 8] = [
    EntityKind::Users,
    EntityKind::Devices,
    EntityKind::Locations,
    EntityKind::Emails,
    EntityKind::Logs,
    EntityKind::Permissions,
    EntityKind::AccessibleDevices,
    EntityKind::Telemetry,
];

/// Forward fetch-state transitions for one list until cancelled.
async fn forward_fetch_state(
    kind: EntityKind,
    mut rx: watch::Receiver<FetchState>,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = rx.borrow_and_update().clone();
                if action_tx.send(Action::FetchStateChanged(kind, state)).is_err() {
                    break;
                }
            }
        }
    }
}

/// Push current snapshots, then forward every list change until cancelled.
pub async fn spawn_data_bridge(
    controller: Controller,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    for kind in KINDS {
        let rx = controller.subscribe_fetch_state(kind);
        tokio::spawn(forward_fetch_state(
            kind,
            rx,
            action_tx.clone(),
            cancel.clone(),
        ));
    }

    let mut users = controller.users();
    let mut devices = controller.devices();
    let mut locations = controller.locations();
    let mut emails = controller.emails();
    let mut logs = controller.logs();
    let mut permissions = controller.permissions();
    let mut telemetry = controller.telemetry();

    // Initial snapshots so screens have data immediately
    let _ = action_tx.send(Action::UsersUpdated(users.current().clone()));
    let _ = action_tx.send(Action::DevicesUpdated(devices.current().clone()));
    let _ = action_tx.send(Action::LocationsUpdated(locations.current().clone()));
    let _ = action_tx.send(Action::EmailsUpdated(emails.current().clone()));
    let _ = action_tx.send(Action::LogsUpdated(logs.current().clone()));
    let _ = action_tx.send(Action::TelemetryUpdated(telemetry.current().clone()));

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Some(u) = users.changed() => {
                let _ = action_tx.send(Action::UsersUpdated(u));
            }
            Some(d) = devices.changed() => {
                debug!(count = d.len(), "dispatching DevicesUpdated");
                let _ = action_tx.send(Action::DevicesUpdated(d));
            }
            Some(l) = locations.changed() => {
                let _ = action_tx.send(Action::LocationsUpdated(l));
            }
            Some(e) = emails.changed() => {
                let _ = action_tx.send(Action::EmailsUpdated(e));
            }
            Some(l) = logs.changed() => {
                let _ = action_tx.send(Action::LogsUpdated(l));
            }
            Some(p) = permissions.changed() => {
                let _ = action_tx.send(Action::PermissionsUpdated(p));
            }
            Some(t) = telemetry.changed() => {
                debug!(count = t.len(), "dispatching TelemetryUpdated");
                let _ = action_tx.send(Action::TelemetryUpdated(t));
            }
            else => break,
        }
    }

    debug!("data bridge shut down");
}
