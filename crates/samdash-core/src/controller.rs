// ── Controller abstraction ──
//
// Session lifecycle, list refreshes, and command routing for one SAM
// backend. Every operation follows the same pattern: flip the list's
// fetch state to loading, talk to the backend, replace the cached list,
// record the outcome, clear loading.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::Local;
use secrecy::SecretString;
use tracing::{debug, info, warn};

use samdash_api::{Ack, NewUser, SamClient, TlsMode, TransportConfig, UserChanges};

use crate::command::{Command, CommandResult, plural};
use crate::config::{ControllerConfig, TlsVerification};
use crate::convert::convert_all;
use crate::error::CoreError;
use crate::export;
use crate::model::{
    Device, EmailRecipient, EntityKind, Location, LogEntry, TelemetryQuery, TelemetryRecord, User,
};
use crate::session::{Session, SessionStore};
use crate::store::{DataStore, FetchState};
use crate::stream::EntityStream;
use crate::validate::{require_field, validate_password};

// ── Controller ───────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ControllerInner>`. Owns the HTTP client, the
/// reactive [`DataStore`], and the current [`Session`].
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: ControllerConfig,
    store: Arc<DataStore>,
    client: SamClient,
    session: RwLock<Option<Session>>,
    session_store: Option<SessionStore>,
}

impl Controller {
    /// Create a controller. Does not contact the backend; call
    /// [`login()`](Self::login) or [`restore_session()`](Self::restore_session).
    pub fn new(config: ControllerConfig) -> Result<Self, CoreError> {
        let transport = build_transport(&config);
        let client = SamClient::new(config.url.clone(), &transport)?;
        let session_store = config.session_path.clone().map(SessionStore::new);

        Ok(Self {
            inner: Arc::new(ControllerInner {
                config,
                store: Arc::new(DataStore::new()),
                client,
                session: RwLock::new(None),
                session_store,
            }),
        })
    }

    /// Access the controller configuration.
    pub fn config(&self) -> &ControllerConfig {
        &self.inner.config
    }

    /// Access the underlying DataStore.
    pub fn store(&self) -> &Arc<DataStore> {
        &self.inner.store
    }

    // ── Session lifecycle ────────────────────────────────────────

    /// Authenticate, persist the session, and attach the token to the client.
    ///
    /// The password length is checked locally before anything is sent.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<Session, CoreError> {
        require_field("Username", username)?;
        validate_password(password)?;

        let login = self.inner.client.login(username.trim(), password).await?;
        self.inner.client.set_token(login.token.clone().into());

        let user: User = match login.user {
            Some(user) => user.into(),
            None => self.inner.client.current_user().await?.into(),
        };
        let session = Session::new(login.token.into(), user);

        if let Some(ref store) = self.inner.session_store {
            store.save(&session)?;
        }
        self.set_session(Some(session.clone()));
        info!(username = %session.user().username, "logged in");
        Ok(session)
    }

    /// Load a persisted session and confirm the token still works.
    ///
    /// Returns `Ok(None)` when there is nothing to restore or the backend
    /// rejects the stored token (the stale file is removed).
    pub async fn restore_session(&self) -> Result<Option<Session>, CoreError> {
        let Some(ref store) = self.inner.session_store else {
            return Ok(None);
        };
        let stored = match store.load() {
            Ok(Some(session)) => session,
            Ok(None) => return Ok(None),
            Err(e) => {
                warn!(error = %e, "discarding unreadable session file");
                store.clear()?;
                return Ok(None);
            }
        };

        self.inner.client.set_token(stored.token().clone());
        match self.inner.client.current_user().await {
            Ok(record) => {
                let session = Session::new(stored.token().clone(), record.into());
                store.save(&session)?;
                self.set_session(Some(session.clone()));
                debug!(username = %session.user().username, "session restored");
                Ok(Some(session))
            }
            Err(e) if e.is_auth_expired() => {
                info!("stored session expired");
                self.inner.client.clear_token();
                store.clear()?;
                Ok(None)
            }
            Err(e) => {
                self.inner.client.clear_token();
                Err(e.into())
            }
        }
    }

    /// Tear the session down: tell the backend, forget the token, remove
    /// the persisted entry, and drop every cached list.
    ///
    /// Local teardown happens even if the backend call fails.
    pub async fn logout(&self) -> Result<(), CoreError> {
        if let Err(e) = self.inner.client.logout().await {
            warn!(error = %e, "backend logout failed; clearing local session anyway");
        }
        self.set_session(None);
        self.inner.store.clear();
        if let Some(ref store) = self.inner.session_store {
            store.clear()?;
        }
        info!("logged out");
        Ok(())
    }

    /// The current session, if logged in.
    pub fn session(&self) -> Option<Session> {
        self.inner
            .session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.session().map(|s| s.user().clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_some()
    }

    fn set_session(&self, session: Option<Session>) {
        *self
            .inner
            .session
            .write()
            .unwrap_or_else(PoisonError::into_inner) = session;
    }

    fn require_session(&self) -> Result<(), CoreError> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(CoreError::NotAuthenticated)
        }
    }

    /// Run a closure against a controller whose persisted session has been
    /// restored. Used by single-shot CLI invocations.
    pub async fn oneshot<F, Fut, T, E>(config: ControllerConfig, f: F) -> Result<T, E>
    where
        F: FnOnce(Controller) -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        E: From<CoreError>,
    {
        let controller = Controller::new(config)?;
        if controller.restore_session().await?.is_none() {
            return Err(CoreError::NotAuthenticated.into());
        }
        f(controller).await
    }

    // ── Refresh (fetch-all) ──────────────────────────────────────

    /// Re-fetch one list with the loading/error lifecycle applied.
    ///
    /// `Permissions` and `Telemetry` re-run their last scope (selected user,
    /// last query); with no scope yet they are a no-op.
    pub async fn refresh(&self, kind: EntityKind) -> Result<(), CoreError> {
        let cell = self.inner.store.cell(kind);
        cell.begin();
        let result = self.fetch_into_store(kind).await;
        if let Err(ref e) = result {
            warn!(%kind, error = %e, "refresh failed");
            cell.fail(e.to_string());
        }
        cell.finish();
        result
    }

    pub async fn refresh_users(&self) -> Result<(), CoreError> {
        self.refresh(EntityKind::Users).await
    }

    pub async fn refresh_devices(&self) -> Result<(), CoreError> {
        self.refresh(EntityKind::Devices).await
    }

    pub async fn refresh_locations(&self) -> Result<(), CoreError> {
        self.refresh(EntityKind::Locations).await
    }

    pub async fn refresh_emails(&self) -> Result<(), CoreError> {
        self.refresh(EntityKind::Emails).await
    }

    pub async fn refresh_logs(&self) -> Result<(), CoreError> {
        self.refresh(EntityKind::Logs).await
    }

    pub async fn refresh_accessible_devices(&self) -> Result<(), CoreError> {
        self.refresh(EntityKind::AccessibleDevices).await
    }

    /// Load the devices granted to `user_id` into the permissions list.
    pub async fn refresh_permissions(&self, user_id: i64) -> Result<(), CoreError> {
        let cell = self.inner.store.cell(EntityKind::Permissions);
        cell.begin();
        let result = self.fetch_permissions(user_id).await;
        if let Err(ref e) = result {
            cell.fail(e.to_string());
        }
        cell.finish();
        result
    }

    /// Run a telemetry query and replace the telemetry list with its result.
    pub async fn query_telemetry(
        &self,
        query: TelemetryQuery,
    ) -> Result<Arc<Vec<Arc<TelemetryRecord>>>, CoreError> {
        query.validate()?;
        let cell = self.inner.store.cell(EntityKind::Telemetry);
        cell.begin();
        let result = self.fetch_telemetry(query).await;
        match result {
            Ok(()) => {
                let count = self.inner.store.telemetry.len();
                cell.succeed(Some(plural(count, "record", "loaded")));
            }
            Err(ref e) => cell.fail(e.to_string()),
        }
        cell.finish();
        result.map(|()| self.inner.store.telemetry_snapshot())
    }

    /// Every reading recorded for one unit.
    pub async fn load_all_telemetry(
        &self,
        sam_id: &str,
    ) -> Result<Arc<Vec<Arc<TelemetryRecord>>>, CoreError> {
        self.query_telemetry(TelemetryQuery::all(sam_id)).await
    }

    /// Backend host information. Not cached.
    pub async fn system_info(&self) -> Result<serde_json::Value, CoreError> {
        self.require_session()?;
        Ok(self.inner.client.system_info().await?)
    }

    async fn fetch_into_store(&self, kind: EntityKind) -> Result<(), CoreError> {
        self.require_session()?;
        let client = &self.inner.client;
        let store = &self.inner.store;
        match kind {
            EntityKind::Users => store.apply_users(convert_all(client.list_users().await?)),
            EntityKind::Devices => store.apply_devices(convert_all(client.list_devices().await?)),
            EntityKind::Locations => {
                store.apply_locations(convert_all(client.list_locations().await?));
            }
            EntityKind::Emails => store.apply_emails(convert_all(client.list_emails().await?)),
            EntityKind::Logs => store.apply_logs(convert_all(client.list_logs().await?)),
            EntityKind::AccessibleDevices => {
                store.apply_accessible_devices(convert_all(client.accessible_devices().await?));
            }
            EntityKind::Permissions => {
                if let Some(user_id) = store.permissions_owner() {
                    self.fetch_permissions(user_id).await?;
                }
            }
            EntityKind::Telemetry => {
                if let Some(query) = store.telemetry_query() {
                    self.fetch_telemetry(query).await?;
                }
            }
        }
        Ok(())
    }

    async fn fetch_permissions(&self, user_id: i64) -> Result<(), CoreError> {
        self.require_session()?;
        let devices = self.inner.client.devices_for_user(user_id).await?;
        self.inner
            .store
            .apply_permissions(user_id, convert_all(devices));
        Ok(())
    }

    async fn fetch_telemetry(&self, query: TelemetryQuery) -> Result<(), CoreError> {
        self.require_session()?;
        let client = &self.inner.client;
        let sam_id = query.sam_id.trim();
        let records = if query.is_unfiltered() {
            client.all_data(sam_id).await?
        } else {
            client.filter_data(sam_id, &query.to_filter()).await?
        };
        self.inner.store.apply_telemetry(query, convert_all(records));
        Ok(())
    }

    // ── Command execution ────────────────────────────────────────

    /// Validate and run a mutation, then re-fetch the affected list.
    ///
    /// Validation failures return before the fetch state is touched. After
    /// the request the list is re-fetched whether or not it succeeded, so a
    /// partially applied bulk delete is still reflected. The command's error
    /// takes precedence over a re-fetch error.
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        cmd.validate()?;
        self.require_session()?;

        let kind = cmd.kind();
        let success = cmd.success_message();
        let cell = self.inner.store.cell(kind);
        cell.begin();

        if let Command::AssignDevices { user_id, .. } | Command::RevokeDevices { user_id, .. } =
            cmd
        {
            self.inner.store.permissions_owner.send_replace(Some(user_id));
        }

        let outcome = route_command(&self.inner.client, cmd).await;
        let refetch = self.fetch_into_store(kind).await;

        match (&outcome, &refetch) {
            (Err(e), _) | (Ok(_), Err(e)) => {
                warn!(%kind, error = %e, "command failed");
                cell.fail(e.to_string());
            }
            (Ok(_), Ok(())) => {
                debug!(%kind, "command succeeded");
                cell.succeed(Some(success));
            }
        }
        cell.finish();

        let result = outcome?;
        refetch?;
        Ok(result)
    }

    // ── Export ───────────────────────────────────────────────────

    /// Export every loaded telemetry record into `dir`, named after the
    /// queried unit and today's date.
    pub fn export_loaded_telemetry(&self, dir: &Path) -> Result<PathBuf, CoreError> {
        let records = self.inner.store.telemetry_snapshot();
        let sam_id = self
            .inner
            .store
            .telemetry_query()
            .map(|q| q.sam_id)
            .or_else(|| records.first().map(|r| r.sam_id.clone()))
            .ok_or(CoreError::NothingToExport)?;
        export::export_telemetry(&records, &sam_id, dir, Local::now().date_naive())
    }

    // ── Snapshot and subscription accessors ──────────────────────

    pub fn fetch_state(&self, kind: EntityKind) -> FetchState {
        self.inner.store.fetch_state(kind)
    }

    pub fn subscribe_fetch_state(
        &self,
        kind: EntityKind,
    ) -> tokio::sync::watch::Receiver<FetchState> {
        self.inner.store.subscribe_fetch_state(kind)
    }

    pub fn users_snapshot(&self) -> Arc<Vec<Arc<User>>> {
        self.inner.store.users_snapshot()
    }

    pub fn devices_snapshot(&self) -> Arc<Vec<Arc<Device>>> {
        self.inner.store.devices_snapshot()
    }

    pub fn locations_snapshot(&self) -> Arc<Vec<Arc<Location>>> {
        self.inner.store.locations_snapshot()
    }

    pub fn emails_snapshot(&self) -> Arc<Vec<Arc<EmailRecipient>>> {
        self.inner.store.emails_snapshot()
    }

    pub fn logs_snapshot(&self) -> Arc<Vec<Arc<LogEntry>>> {
        self.inner.store.logs_snapshot()
    }

    pub fn permissions_snapshot(&self) -> Arc<Vec<Arc<Device>>> {
        self.inner.store.permissions_snapshot()
    }

    pub fn accessible_devices_snapshot(&self) -> Arc<Vec<Arc<Device>>> {
        self.inner.store.accessible_devices_snapshot()
    }

    pub fn telemetry_snapshot(&self) -> Arc<Vec<Arc<TelemetryRecord>>> {
        self.inner.store.telemetry_snapshot()
    }

    pub fn users(&self) -> EntityStream<User> {
        self.inner.store.subscribe_users()
    }

    pub fn devices(&self) -> EntityStream<Device> {
        self.inner.store.subscribe_devices()
    }

    pub fn locations(&self) -> EntityStream<Location> {
        self.inner.store.subscribe_locations()
    }

    pub fn emails(&self) -> EntityStream<EmailRecipient> {
        self.inner.store.subscribe_emails()
    }

    pub fn logs(&self) -> EntityStream<LogEntry> {
        self.inner.store.subscribe_logs()
    }

    pub fn permissions(&self) -> EntityStream<Device> {
        self.inner.store.subscribe_permissions()
    }

    pub fn telemetry(&self) -> EntityStream<TelemetryRecord> {
        self.inner.store.subscribe_telemetry()
    }
}

fn build_transport(config: &ControllerConfig) -> TransportConfig {
    let tls = match &config.tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    };
    TransportConfig {
        tls,
        timeout: config.timeout,
    }
}

// ── Command routing ──────────────────────────────────────────────

async fn route_command(client: &SamClient, cmd: Command) -> Result<CommandResult, CoreError> {
    match cmd {
        // ── Users ────────────────────────────────────────────────
        Command::RegisterUser(req) => {
            client
                .register_user(&NewUser {
                    user_id: req.user_id.filter(|s| !s.trim().is_empty()),
                    username: req.username.trim().to_owned(),
                    password: req.password,
                    credential: req.credential.into(),
                })
                .await?;
            Ok(CommandResult::Ok)
        }
        Command::UpdateUser { id, update } => {
            let changes = UserChanges {
                username: update.username.map(|u| u.trim().to_owned()),
                password: update.password,
                credential: update.credential.map(Into::into),
            };
            client.update_user(id, &changes).await?;
            Ok(CommandResult::Ok)
        }
        Command::DeleteUsers { ids } => {
            delete_sequentially(client, "users", ids.into_iter().map(DeleteTarget::User)).await
        }

        // ── Devices ──────────────────────────────────────────────
        Command::AddDevice(req) => {
            client.add_device(&req.into()).await?;
            Ok(CommandResult::Ok)
        }
        Command::UpdateDevice { id, update } => {
            client.update_device(id, &update.into()).await?;
            Ok(CommandResult::Ok)
        }
        Command::DeleteDevices { sam_ids } => {
            delete_sequentially(
                client,
                "devices",
                sam_ids.into_iter().map(DeleteTarget::Device),
            )
            .await
        }

        // ── Locations ────────────────────────────────────────────
        Command::CreateLocation { name } => {
            client.create_location(name.trim()).await?;
            Ok(CommandResult::Ok)
        }
        Command::UpdateLocation { id, name } => {
            client.update_location(id, name.trim()).await?;
            Ok(CommandResult::Ok)
        }
        Command::DeleteLocations { ids } => {
            delete_sequentially(
                client,
                "locations",
                ids.into_iter().map(DeleteTarget::Location),
            )
            .await
        }

        // ── Alert recipients ─────────────────────────────────────
        Command::CreateEmail { address } => {
            client.create_email(address.trim()).await?;
            Ok(CommandResult::Ok)
        }
        Command::UpdateEmail { id, address } => {
            client.update_email(id, address.trim()).await?;
            Ok(CommandResult::Ok)
        }
        Command::DeleteEmails { ids } => {
            delete_sequentially(client, "recipients", ids.into_iter().map(DeleteTarget::Email))
                .await
        }

        // ── Permissions ──────────────────────────────────────────
        Command::AssignDevices {
            user_id,
            device_ids,
        } => {
            client.assign_devices(user_id, &device_ids).await?;
            Ok(CommandResult::Ok)
        }
        Command::RevokeDevices {
            user_id,
            device_ids,
        } => {
            client.revoke_devices(user_id, &device_ids).await?;
            Ok(CommandResult::Ok)
        }
    }
}

/// One record to remove in a bulk delete.
enum DeleteTarget {
    User(i64),
    Device(String),
    Location(i64),
    Email(i64),
}

impl DeleteTarget {
    fn label(&self) -> String {
        match self {
            Self::User(id) | Self::Location(id) | Self::Email(id) => id.to_string(),
            Self::Device(sam_id) => sam_id.clone(),
        }
    }

    async fn send(&self, client: &SamClient) -> Result<Ack, samdash_api::Error> {
        match self {
            Self::User(id) => client.delete_user(*id).await,
            Self::Device(sam_id) => client.delete_device(sam_id).await,
            Self::Location(id) => client.delete_location(*id).await,
            Self::Email(id) => client.delete_email(*id).await,
        }
    }
}

/// Delete one record per request, in order, stopping at the first failure.
///
/// If anything was removed before the failure the error is
/// [`CoreError::PartialDelete`] naming what was removed; otherwise the
/// failure itself is returned.
async fn delete_sequentially(
    client: &SamClient,
    entity: &'static str,
    targets: impl Iterator<Item = DeleteTarget>,
) -> Result<CommandResult, CoreError> {
    let mut deleted = Vec::new();
    for target in targets {
        match target.send(client).await {
            Ok(_) => deleted.push(target.label()),
            Err(e) if deleted.is_empty() => return Err(e.into()),
            Err(e) => {
                return Err(CoreError::PartialDelete {
                    entity,
                    failed: target.label(),
                    reason: CoreError::from(e).to_string(),
                    deleted,
                });
            }
        }
    }
    Ok(CommandResult::Deleted {
        count: deleted.len(),
    })
}
