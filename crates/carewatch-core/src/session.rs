// ── Session abstraction ──
//
// Full lifecycle management for a connection to the monitoring backend:
// authentication, card refresh, policy-gated alarm handling, and
// ownership of at most one alarm monitor per session. The session role
// is captured once at connect time; changing roles means disconnecting
// and connecting again.

use std::str::FromStr;
use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

use carewatch_api::CareClient;
use carewatch_api::transport::{TlsMode, TransportConfig};

use crate::config::{AuthCredentials, BackendConfig, TlsVerification};
use crate::error::CoreError;
use crate::model::{Card, Role};
use crate::monitor::{AlarmMonitor, AlarmSounder, CardSource};
use crate::policy::{self, PagePolicy};
use crate::store::CardStore;
use crate::stream::CardStream;

// ── ConnectionState ──────────────────────────────────────────────

/// Connection state observable by consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

// ── CareSession ──────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<SessionInner>`. Manages authentication,
/// the shared card store, page/alarm policy checks for the session
/// role, and the alarm notification monitor.
#[derive(Clone)]
pub struct CareSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    config: BackendConfig,
    store: Arc<CardStore>,
    pages: PagePolicy,
    connection_state: watch::Sender<ConnectionState>,
    client: Mutex<Option<Arc<CareClient>>>,
    role: Mutex<Option<Role>>,
    monitor: Mutex<Option<AlarmMonitor>>,
}

impl CareSession {
    /// Create a new session from configuration. Does NOT connect --
    /// call [`connect()`](Self::connect) to authenticate and load data.
    pub fn new(config: BackendConfig) -> Self {
        let (connection_state, _) = watch::channel(ConnectionState::Disconnected);

        Self {
            inner: Arc::new(SessionInner {
                config,
                store: Arc::new(CardStore::new()),
                pages: PagePolicy::new(),
                connection_state,
                client: Mutex::new(None),
                role: Mutex::new(None),
                monitor: Mutex::new(None),
            }),
        }
    }

    /// Access the session configuration.
    pub fn config(&self) -> &BackendConfig {
        &self.inner.config
    }

    /// Access the underlying card store.
    pub fn store(&self) -> &Arc<CardStore> {
        &self.inner.store
    }

    /// The session role, once connected.
    pub async fn role(&self) -> Option<Role> {
        *self.inner.role.lock().await
    }

    // ── Connection lifecycle ─────────────────────────────────────

    /// Connect to the backend.
    ///
    /// Authenticates (or adopts a pre-issued token), resolves the
    /// session role, and performs the initial card refresh.
    pub async fn connect(&self) -> Result<(), CoreError> {
        let _ = self
            .inner
            .connection_state
            .send(ConnectionState::Connecting);

        match self.connect_inner().await {
            Ok(()) => {
                let _ = self.inner.connection_state.send(ConnectionState::Connected);
                info!("connected to backend");
                Ok(())
            }
            Err(e) => {
                let _ = self.inner.connection_state.send(ConnectionState::Failed);
                Err(e)
            }
        }
    }

    async fn connect_inner(&self) -> Result<(), CoreError> {
        let config = &self.inner.config;
        let transport = build_transport(config);

        let (client, role) = match &config.auth {
            AuthCredentials::Token(token) => {
                let role = config.role.ok_or_else(|| CoreError::Config {
                    message: "pre-issued token auth requires an explicit role".into(),
                })?;
                let client =
                    CareClient::with_token(config.url.clone(), token.clone(), &transport)?;
                debug!("using pre-issued token -- skipping login");
                (client, role)
            }
            AuthCredentials::Credentials { account, password } => {
                let client = CareClient::new(config.url.clone(), &transport)?;
                let login = client.login(account, password).await?;
                debug!("session authentication successful");

                let role = match config.role {
                    Some(role) => role,
                    None => {
                        let code = login.role.as_deref().ok_or_else(|| CoreError::Config {
                            message: "backend did not report a session role".into(),
                        })?;
                        Role::from_str(code).map_err(|_| CoreError::Config {
                            message: format!("backend reported unknown role '{code}'"),
                        })?
                    }
                };
                (client, role)
            }
        };

        *self.inner.client.lock().await = Some(Arc::new(client));
        *self.inner.role.lock().await = Some(role);

        // Initial data load
        self.refresh_cards().await?;
        Ok(())
    }

    /// Disconnect from the backend.
    ///
    /// Stops the monitor, logs out if session-based, and resets the
    /// connection state to [`Disconnected`](ConnectionState::Disconnected).
    pub async fn disconnect(&self) {
        self.stop_monitor().await;

        if matches!(self.inner.config.auth, AuthCredentials::Credentials { .. }) {
            if let Some(ref client) = *self.inner.client.lock().await {
                if let Err(e) = client.logout().await {
                    warn!(error = %e, "logout failed (non-fatal)");
                }
            }
        }

        *self.inner.client.lock().await = None;
        *self.inner.role.lock().await = None;
        let _ = self
            .inner
            .connection_state
            .send(ConnectionState::Disconnected);
        debug!("disconnected");
    }

    /// Fetch the current card list and replace the store contents.
    pub async fn refresh_cards(&self) -> Result<(), CoreError> {
        let client = self.client().await?;
        let raw = client.list_cards().await?;
        let cards: Vec<Card> = raw.into_iter().map(Card::from).collect();
        let count = cards.len();

        self.inner.store.apply_snapshot(cards);
        debug!(cards = count, "card refresh complete");
        Ok(())
    }

    // ── Policy ───────────────────────────────────────────────────

    /// Whether the session role may open the page at `path`.
    pub async fn can_access_page(&self, path: &str) -> Result<bool, CoreError> {
        let role = self.require_role().await?;
        Ok(self.inner.pages.can_access(role, path))
    }

    /// Whether the session role may handle the given cached alarm event.
    ///
    /// Events not present in the cache are handleable by definition
    /// (nothing to gate on).
    pub async fn can_handle_alarm(&self, event_id: &str) -> Result<bool, CoreError> {
        let role = self.require_role().await?;
        Ok(self
            .inner
            .store
            .find_alarm_event(event_id)
            .is_none_or(|event| policy::can_handle_alarm(&event, &self.inner.store, role)))
    }

    // ── Alarm handling ───────────────────────────────────────────

    /// Acknowledge an alarm event, applying the alarm-handling policy
    /// first. The backend re-checks and remains the final authority.
    pub async fn acknowledge_alarm(&self, event_id: &str) -> Result<(), CoreError> {
        let role = self.require_role().await?;

        if let Some(event) = self.inner.store.find_alarm_event(event_id) {
            if !policy::can_handle_alarm(&event, &self.inner.store, role) {
                let reason = policy::denial_reason(&event, &self.inner.store, role)
                    .unwrap_or("alarm handling not permitted for this role");
                return Err(CoreError::PermissionDenied {
                    reason: reason.into(),
                });
            }
        }

        let client = self.client().await?;
        client.acknowledge_alarm(event_id).await?;
        info!(event_id, "alarm acknowledged");
        Ok(())
    }

    // ── Monitor ownership ────────────────────────────────────────

    /// Start the alarm notification monitor for this session.
    ///
    /// At most one monitor exists per session; repeated calls reuse it.
    /// Returns `Ok(false)` when nothing was started (already running,
    /// or the session role has no monitoring surface).
    pub async fn start_monitor(&self, sounder: Arc<dyn AlarmSounder>) -> Result<bool, CoreError> {
        let role = self.require_role().await?;

        let mut guard = self.inner.monitor.lock().await;
        let monitor = guard.get_or_insert_with(|| {
            let source = Arc::new(SessionCards {
                inner: Arc::clone(&self.inner),
            });
            AlarmMonitor::new(source, sounder)
                .with_store(Arc::clone(&self.inner.store))
                .with_interval(std::time::Duration::from_secs(
                    self.inner.config.poll_interval_secs,
                ))
        });

        Ok(monitor.start(role).await)
    }

    /// Stop the monitor if it is running. No-op otherwise.
    pub async fn stop_monitor(&self) {
        if let Some(monitor) = &*self.inner.monitor.lock().await {
            monitor.stop().await;
        }
    }

    // ── One-shot convenience ─────────────────────────────────────

    /// One-shot: connect, run closure, disconnect.
    ///
    /// Optimized for CLI commands that need a single request-response
    /// cycle.
    pub async fn oneshot<F, Fut, T>(config: BackendConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(CareSession) -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>>,
    {
        let session = CareSession::new(config);
        session.connect().await?;
        let result = f(session.clone()).await;
        session.disconnect().await;
        result
    }

    // ── State observation ────────────────────────────────────────

    /// Subscribe to connection state changes.
    pub fn connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.connection_state.subscribe()
    }

    /// Subscribe to card snapshot replacements.
    pub fn cards(&self) -> CardStream {
        self.inner.store.subscribe()
    }

    /// Current card snapshot (delegates to the store).
    pub fn cards_snapshot(&self) -> Arc<Vec<Arc<Card>>> {
        self.inner.store.cards_snapshot()
    }

    // ── Helpers ──────────────────────────────────────────────────

    async fn client(&self) -> Result<Arc<CareClient>, CoreError> {
        self.inner
            .client
            .lock()
            .await
            .clone()
            .ok_or(CoreError::SessionDisconnected)
    }

    async fn require_role(&self) -> Result<Role, CoreError> {
        self.inner
            .role
            .lock()
            .await
            .ok_or(CoreError::SessionDisconnected)
    }
}

// ── Card source adapter ──────────────────────────────────────────

/// Feeds the alarm monitor from the session's authenticated client.
struct SessionCards {
    inner: Arc<SessionInner>,
}

impl CardSource for SessionCards {
    fn fetch_cards(&self) -> futures_util::future::BoxFuture<'_, Result<Vec<Card>, CoreError>> {
        Box::pin(async move {
            let client = self
                .inner
                .client
                .lock()
                .await
                .clone()
                .ok_or(CoreError::SessionDisconnected)?;
            let raw = client.list_cards().await?;
            Ok(raw.into_iter().map(Card::from).collect())
        })
    }
}

// ── Helpers ──────────────────────────────────────────────────────

/// Build a [`TransportConfig`] from the backend configuration.
fn build_transport(config: &BackendConfig) -> TransportConfig {
    TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
