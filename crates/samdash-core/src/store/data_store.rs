// ── Central reactive data store ──
//
// Client-side cache of every list the dashboard shows. Each list is the
// full snapshot returned by the last successful fetch; nothing is merged or
// patched incrementally.

use std::sync::Arc;

use tokio::sync::watch;

use super::collection::EntityCollection;
use super::fetch_state::{FetchCell, FetchState};
use crate::model::{
    Device, EmailRecipient, EntityKind, Location, LogEntry, TelemetryQuery, TelemetryRecord, User,
};
use crate::stream::EntityStream;

/// Central reactive store for all dashboard entities.
pub struct DataStore {
    pub(crate) users: EntityCollection<User>,
    pub(crate) devices: EntityCollection<Device>,
    pub(crate) locations: EntityCollection<Location>,
    pub(crate) emails: EntityCollection<EmailRecipient>,
    pub(crate) logs: EntityCollection<LogEntry>,
    pub(crate) permissions: EntityCollection<Device>,
    pub(crate) accessible_devices: EntityCollection<Device>,
    pub(crate) telemetry: EntityCollection<TelemetryRecord>,

    /// User whose granted devices `permissions` currently holds.
    pub(crate) permissions_owner: watch::Sender<Option<i64>>,
    /// Query that produced the current `telemetry` snapshot.
    pub(crate) telemetry_query: watch::Sender<Option<TelemetryQuery>>,

    users_state: FetchCell,
    devices_state: FetchCell,
    locations_state: FetchCell,
    emails_state: FetchCell,
    logs_state: FetchCell,
    permissions_state: FetchCell,
    accessible_state: FetchCell,
    telemetry_state: FetchCell,
}

impl DataStore {
    pub fn new() -> Self {
        let (permissions_owner, _) = watch::channel(None);
        let (telemetry_query, _) = watch::channel(None);

        Self {
            users: EntityCollection::new(),
            devices: EntityCollection::new(),
            locations: EntityCollection::new(),
            emails: EntityCollection::new(),
            logs: EntityCollection::new(),
            permissions: EntityCollection::new(),
            accessible_devices: EntityCollection::new(),
            telemetry: EntityCollection::new(),
            permissions_owner,
            telemetry_query,
            users_state: FetchCell::new(),
            devices_state: FetchCell::new(),
            locations_state: FetchCell::new(),
            emails_state: FetchCell::new(),
            logs_state: FetchCell::new(),
            permissions_state: FetchCell::new(),
            accessible_state: FetchCell::new(),
            telemetry_state: FetchCell::new(),
        }
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn users_snapshot(&self) -> Arc<Vec<Arc<User>>> {
        self.users.snapshot()
    }

    pub fn devices_snapshot(&self) -> Arc<Vec<Arc<Device>>> {
        self.devices.snapshot()
    }

    pub fn locations_snapshot(&self) -> Arc<Vec<Arc<Location>>> {
        self.locations.snapshot()
    }

    pub fn emails_snapshot(&self) -> Arc<Vec<Arc<EmailRecipient>>> {
        self.emails.snapshot()
    }

    pub fn logs_snapshot(&self) -> Arc<Vec<Arc<LogEntry>>> {
        self.logs.snapshot()
    }

    pub fn permissions_snapshot(&self) -> Arc<Vec<Arc<Device>>> {
        self.permissions.snapshot()
    }

    pub fn accessible_devices_snapshot(&self) -> Arc<Vec<Arc<Device>>> {
        self.accessible_devices.snapshot()
    }

    pub fn telemetry_snapshot(&self) -> Arc<Vec<Arc<TelemetryRecord>>> {
        self.telemetry.snapshot()
    }

    // ── Lookups ──────────────────────────────────────────────────────

    pub fn user(&self, id: i64) -> Option<Arc<User>> {
        self.users.get(id)
    }

    /// Find a device by its samId.
    pub fn device_by_sam_id(&self, sam_id: &str) -> Option<Arc<Device>> {
        self.devices
            .snapshot()
            .iter()
            .find(|d| d.sam_id == sam_id)
            .cloned()
    }

    pub fn permissions_owner(&self) -> Option<i64> {
        *self.permissions_owner.borrow()
    }

    pub fn telemetry_query(&self) -> Option<TelemetryQuery> {
        self.telemetry_query.borrow().clone()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_users(&self) -> EntityStream<User> {
        EntityStream::new(self.users.subscribe())
    }

    pub fn subscribe_devices(&self) -> EntityStream<Device> {
        EntityStream::new(self.devices.subscribe())
    }

    pub fn subscribe_locations(&self) -> EntityStream<Location> {
        EntityStream::new(self.locations.subscribe())
    }

    pub fn subscribe_emails(&self) -> EntityStream<EmailRecipient> {
        EntityStream::new(self.emails.subscribe())
    }

    pub fn subscribe_logs(&self) -> EntityStream<LogEntry> {
        EntityStream::new(self.logs.subscribe())
    }

    pub fn subscribe_permissions(&self) -> EntityStream<Device> {
        EntityStream::new(self.permissions.subscribe())
    }

    pub fn subscribe_telemetry(&self) -> EntityStream<TelemetryRecord> {
        EntityStream::new(self.telemetry.subscribe())
    }

    // ── Fetch state ──────────────────────────────────────────────────

    pub(crate) fn cell(&self, kind: EntityKind) -> &FetchCell {
        match kind {
            EntityKind::Users => &self.users_state,
            EntityKind::Devices => &self.devices_state,
            EntityKind::Locations => &self.locations_state,
            EntityKind::Emails => &self.emails_state,
            EntityKind::Logs => &self.logs_state,
            EntityKind::Permissions => &self.permissions_state,
            EntityKind::AccessibleDevices => &self.accessible_state,
            EntityKind::Telemetry => &self.telemetry_state,
        }
    }

    pub fn fetch_state(&self, kind: EntityKind) -> FetchState {
        self.cell(kind).get()
    }

    pub fn subscribe_fetch_state(&self, kind: EntityKind) -> watch::Receiver<FetchState> {
        self.cell(kind).subscribe()
    }

    // ── Mutations (full replacement) ─────────────────────────────────

    pub(crate) fn apply_users(&self, users: Vec<User>) {
        self.users.replace_all(users);
    }

    pub(crate) fn apply_devices(&self, devices: Vec<Device>) {
        self.devices.replace_all(devices);
    }

    pub(crate) fn apply_locations(&self, locations: Vec<Location>) {
        self.locations.replace_all(locations);
    }

    pub(crate) fn apply_emails(&self, emails: Vec<EmailRecipient>) {
        self.emails.replace_all(emails);
    }

    pub(crate) fn apply_logs(&self, logs: Vec<LogEntry>) {
        self.logs.replace_all(logs);
    }

    pub(crate) fn apply_permissions(&self, user_id: i64, devices: Vec<Device>) {
        self.permissions_owner.send_replace(Some(user_id));
        self.permissions.replace_all(devices);
    }

    pub(crate) fn apply_accessible_devices(&self, devices: Vec<Device>) {
        self.accessible_devices.replace_all(devices);
    }

    pub(crate) fn apply_telemetry(&self, query: TelemetryQuery, records: Vec<TelemetryRecord>) {
        self.telemetry_query.send_replace(Some(query));
        self.telemetry.replace_all(records);
    }

    /// Drop everything cached. Called on logout.
    pub(crate) fn clear(&self) {
        self.users.clear();
        self.devices.clear();
        self.locations.clear();
        self.emails.clear();
        self.logs.clear();
        self.permissions.clear();
        self.accessible_devices.clear();
        self.telemetry.clear();
        self.permissions_owner.send_replace(None);
        self.telemetry_query.send_replace(None);
        for kind in <EntityKind as strum::IntoEnumIterator>::iter() {
            self.cell(kind).reset();
        }
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}
