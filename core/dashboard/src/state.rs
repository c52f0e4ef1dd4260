//! FILENAME: core/dashboard/src/state.rs
//! Dashboard state: fetch, build, then publish immutable snapshots.
//!
//! Each pipeline (status, label fields, users) owns a watch channel holding
//! the current `Arc` snapshot and the request token that produced it.
//!
//! Rules:
//! - Every load takes the next token of its pipeline before fetching.
//! - A built value is published only if its token is newer than the one
//!   currently published, so the last-triggered load wins even when an older
//!   response completes later.
//! - A provider failure or timeout is logged and leaves the published
//!   snapshot untouched.
//! - A `ValidationError` publishes nothing and is returned to the caller.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use pivot_engine::MultiFieldPivotSet;
use tokio::sync::watch;

use crate::config::DashboardConfig;
use crate::error::{DashboardError, DataSourceError};
use crate::label_fields::LabelFieldPivotBuilder;
use crate::provider::DashboardDataProvider;
use crate::status::{StatusDashboard, StatusPivotBuilder};
use crate::types::{DashboardFilters, DashboardRequest};
use crate::users::{user_options, UserOption};
use crate::{log_debug, log_enter, log_error, log_exit, log_info, log_warn};

// ============================================================================
// SNAPSHOTS
// ============================================================================

/// A published value and the request token that produced it.
/// Token 0 is the initial empty value.
#[derive(Debug)]
pub struct Snapshot<T> {
    pub token: u64,
    pub value: Arc<T>,
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Snapshot {
            token: self.token,
            value: Arc::clone(&self.value),
        }
    }
}

/// What a single pipeline load did to the published state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The new value is now published.
    Applied,
    /// A later-issued load already published; this result was dropped.
    Superseded,
    /// The provider failed; the previous value stays published.
    KeptStale(DataSourceError),
}

impl RefreshOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, RefreshOutcome::Applied)
    }
}

/// Outcome of a multi-pipeline refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardRefresh {
    pub status: RefreshOutcome,
    pub labels: RefreshOutcome,
    /// Only set by `initialize`.
    pub users: Option<RefreshOutcome>,
}

/// Token counter plus the published snapshot for one pipeline.
struct Pipeline<T> {
    name: &'static str,
    category: &'static str,
    tokens: AtomicU64,
    sender: watch::Sender<Snapshot<T>>,
}

impl<T> Pipeline<T> {
    fn new(name: &'static str, category: &'static str, initial: T) -> Self {
        let (sender, _) = watch::channel(Snapshot {
            token: 0,
            value: Arc::new(initial),
        });
        Pipeline {
            name,
            category,
            tokens: AtomicU64::new(0),
            sender,
        }
    }

    fn next_token(&self) -> u64 {
        self.tokens.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn current(&self) -> Snapshot<T> {
        self.sender.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Snapshot<T>> {
        self.sender.subscribe()
    }

    /// Replaces the snapshot unless a newer token is already published.
    fn publish(&self, token: u64, value: T) -> RefreshOutcome {
        let value = Arc::new(value);
        let applied = self.sender.send_if_modified(|current| {
            if token > current.token {
                *current = Snapshot { token, value };
                true
            } else {
                false
            }
        });

        if applied {
            log_info!(self.category, "{} request {} published", self.name, token);
            RefreshOutcome::Applied
        } else {
            log_debug!(
                self.category,
                "{} request {} superseded by request {}",
                self.name,
                token,
                self.sender.borrow().token
            );
            RefreshOutcome::Superseded
        }
    }

    fn keep_stale(&self, token: u64, err: DataSourceError) -> RefreshOutcome {
        log_error!(
            self.category,
            "{} request {} failed, keeping request {}: {}",
            self.name,
            token,
            self.sender.borrow().token,
            err
        );
        RefreshOutcome::KeptStale(err)
    }
}

// ============================================================================
// DASHBOARD STATE
// ============================================================================

pub struct DashboardState {
    config: DashboardConfig,
    status_builder: StatusPivotBuilder,
    label_builder: LabelFieldPivotBuilder,
    status: Pipeline<StatusDashboard>,
    labels: Pipeline<MultiFieldPivotSet>,
    users: Pipeline<Vec<UserOption>>,
}

impl DashboardState {
    pub fn new(config: DashboardConfig) -> Result<Self, DashboardError> {
        config.validate()?;
        let aggregator = config.aggregator();

        Ok(DashboardState {
            status_builder: StatusPivotBuilder::new(aggregator),
            label_builder: LabelFieldPivotBuilder::new(aggregator),
            status: Pipeline::new("status", "REFRESH", StatusDashboard::empty()),
            labels: Pipeline::new("labels", "REFRESH", MultiFieldPivotSet::default()),
            users: Pipeline::new("users", "USERS", vec![UserOption::all()]),
            config,
        })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn status(&self) -> Arc<StatusDashboard> {
        self.status.current().value
    }

    pub fn label_tables(&self) -> Arc<MultiFieldPivotSet> {
        self.labels.current().value
    }

    pub fn user_options(&self) -> Arc<Vec<UserOption>> {
        self.users.current().value
    }

    pub fn has_tables(&self) -> bool {
        self.labels.current().value.has_tables()
    }

    pub fn status_snapshot(&self) -> Snapshot<StatusDashboard> {
        self.status.current()
    }

    pub fn label_tables_snapshot(&self) -> Snapshot<MultiFieldPivotSet> {
        self.labels.current()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<Snapshot<StatusDashboard>> {
        self.status.subscribe()
    }

    pub fn subscribe_label_tables(&self) -> watch::Receiver<Snapshot<MultiFieldPivotSet>> {
        self.labels.subscribe()
    }

    pub fn subscribe_users(&self) -> watch::Receiver<Snapshot<Vec<UserOption>>> {
        self.users.subscribe()
    }

    /// Refreshes the status boxes and the user-by-status table.
    pub async fn load_status<P>(
        &self,
        provider: &P,
        filters: &DashboardFilters,
    ) -> Result<RefreshOutcome, DashboardError>
    where
        P: DashboardDataProvider + ?Sized,
    {
        let token = self.status.next_token();
        let request = DashboardRequest::new(&self.config, filters);
        log_enter!("REFRESH", "load_status", "token={}", token);

        let data = match self.bounded(provider.fetch_status_data(&request)).await {
            Ok(data) => data,
            Err(err) => return Ok(self.status.keep_stale(token, err)),
        };

        let dashboard = self.status_builder.build(&data).map_err(|err| {
            log_error!("REFRESH", "status request {} rejected: {}", token, err);
            err
        })?;

        let outcome = self.status.publish(token, dashboard);
        log_exit!("REFRESH", "load_status", "token={} outcome={:?}", token, outcome);
        Ok(outcome)
    }

    /// Refreshes the per-field tables.
    pub async fn load_label_tables<P>(
        &self,
        provider: &P,
        filters: &DashboardFilters,
    ) -> Result<RefreshOutcome, DashboardError>
    where
        P: DashboardDataProvider + ?Sized,
    {
        let token = self.labels.next_token();
        let request = DashboardRequest::new(&self.config, filters);
        log_enter!("REFRESH", "load_label_tables", "token={}", token);

        let data = match self.bounded(provider.fetch_label_field_data(&request)).await {
            Ok(data) => data,
            Err(err) => return Ok(self.labels.keep_stale(token, err)),
        };

        let set = self
            .label_builder
            .build(&data, &self.config.dashboard_picklist_fields)
            .map_err(|err| {
                log_error!("REFRESH", "labels request {} rejected: {}", token, err);
                err
            })?;

        let outcome = self.labels.publish(token, set);
        log_exit!("REFRESH", "load_label_tables", "token={} outcome={:?}", token, outcome);
        Ok(outcome)
    }

    /// Refreshes the owner filter options.
    pub async fn load_users<P>(&self, provider: &P) -> RefreshOutcome
    where
        P: DashboardDataProvider + ?Sized,
    {
        let token = self.users.next_token();
        log_enter!("USERS", "load_users", "token={}", token);

        let outcome = match self.bounded(provider.fetch_users()).await {
            Ok(users) => self.users.publish(token, user_options(&users)),
            Err(err) => self.users.keep_stale(token, err),
        };
        log_exit!("USERS", "load_users", "token={} outcome={:?}", token, outcome);
        outcome
    }

    /// Re-runs both count pipelines with new filters. The two requests are
    /// issued together and complete independently.
    pub async fn apply<P>(
        &self,
        provider: &P,
        filters: &DashboardFilters,
    ) -> Result<DashboardRefresh, DashboardError>
    where
        P: DashboardDataProvider + ?Sized,
    {
        let (status, labels) = tokio::join!(
            self.load_status(provider, filters),
            self.load_label_tables(provider, filters),
        );

        Ok(DashboardRefresh {
            status: status?,
            labels: labels?,
            users: None,
        })
    }

    /// First load: owner options plus both count pipelines.
    pub async fn initialize<P>(
        &self,
        provider: &P,
        filters: &DashboardFilters,
    ) -> Result<DashboardRefresh, DashboardError>
    where
        P: DashboardDataProvider + ?Sized,
    {
        let (users, refresh) = tokio::join!(self.load_users(provider), self.apply(provider, filters));

        let mut refresh = refresh?;
        if let RefreshOutcome::KeptStale(ref err) = users {
            log_warn!("USERS", "owner options unavailable: {}", err);
        }
        refresh.users = Some(users);
        Ok(refresh)
    }

    /// Bounds a provider call by the configured timeout.
    async fn bounded<T, F>(&self, request: F) -> Result<T, DataSourceError>
    where
        F: Future<Output = Result<T, DataSourceError>>,
    {
        match tokio::time::timeout(self.config.request_timeout(), request).await {
            Ok(result) => result,
            Err(_) => Err(DataSourceError::Timeout(self.config.request_timeout_ms)),
        }
    }
}
