//! Background refresh of every stored terrain
//!
//! Two tasks start with the server: a one-shot pass over all terrains and a
//! periodic loop that repeats the pass after a fixed interval. Both run under a
//! supervisor that captures errors and panics, and publish their state through
//! [`RefreshStatus`] for the health endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::updater::{TerrainUpdater, UpdateOutcome};
use crate::config::RefreshConfig;
use crate::error::AppResult;
use crate::store::TerrainStore;

/// Counts for one pass over all terrains
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PassSummary {
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Lifecycle of a refresh task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    #[default]
    Pending,
    Running,
    /// Waiting for the next periodic pass
    Idle,
    Finished,
    Failed,
}

/// Observable state of one refresh task
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskStatus {
    pub state: TaskState,
    pub passes_completed: u64,
    pub restarts: u32,
    pub last_pass: Option<PassSummary>,
    pub last_pass_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

/// Snapshot of both refresh tasks
#[derive(Debug, Clone, Default, Serialize)]
pub struct RefreshReport {
    pub startup: TaskStatus,
    pub periodic: TaskStatus,
}

#[derive(Debug, Clone, Copy)]
enum RefreshTask {
    Startup,
    Periodic,
}

/// Shared handle on the refresh task states
#[derive(Clone, Default)]
pub struct RefreshStatus {
    inner: Arc<RwLock<RefreshReport>>,
}

impl RefreshStatus {
    pub async fn snapshot(&self) -> RefreshReport {
        self.inner.read().await.clone()
    }

    async fn update(&self, task: RefreshTask, f: impl FnOnce(&mut TaskStatus)) {
        let mut report = self.inner.write().await;
        match task {
            RefreshTask::Startup => f(&mut report.startup),
            RefreshTask::Periodic => f(&mut report.periodic),
        }
    }
}

/// Handles on the spawned refresh tasks
pub struct RefreshTasks {
    pub startup: JoinHandle<()>,
    pub periodic: JoinHandle<()>,
}

impl RefreshTasks {
    pub fn abort(&self) {
        self.startup.abort();
        self.periodic.abort();
    }
}

/// Runs refresh passes over every stored terrain
#[derive(Clone)]
pub struct RefreshScheduler {
    store: Arc<dyn TerrainStore>,
    updater: TerrainUpdater,
    status: RefreshStatus,
    interval: Duration,
    max_restarts: u32,
    restart_backoff: Duration,
}

impl RefreshScheduler {
    /// Create a new RefreshScheduler instance
    pub fn new(store: Arc<dyn TerrainStore>, updater: TerrainUpdater, config: &RefreshConfig) -> Self {
        Self {
            store,
            updater,
            status: RefreshStatus::default(),
            interval: Duration::from_secs(config.interval_secs),
            max_restarts: config.max_restarts,
            restart_backoff: Duration::from_secs(config.restart_backoff_secs),
        }
    }

    pub fn status(&self) -> RefreshStatus {
        self.status.clone()
    }

    /// Update every stored terrain once, sequentially.
    ///
    /// A failing terrain is logged and counted; the pass carries on with the
    /// rest. Only a failure to list the terrains aborts the pass.
    pub async fn run_pass(&self) -> AppResult<PassSummary> {
        let terrains = self.store.list_all().await?;
        let mut summary = PassSummary::default();

        for terrain in &terrains {
            match self.updater.update_terrain(terrain).await {
                Ok(UpdateOutcome::Updated(_)) => summary.updated += 1,
                Ok(UpdateOutcome::Skipped) => summary.skipped += 1,
                Err(e) => {
                    summary.failed += 1;
                    tracing::error!(
                        terrain_id = terrain.terrain_id,
                        "Failed to refresh terrain {}: {}",
                        terrain.terrain_id,
                        e
                    );
                }
            }
        }

        tracing::info!(
            updated = summary.updated,
            skipped = summary.skipped,
            failed = summary.failed,
            "Refresh pass complete"
        );

        Ok(summary)
    }

    /// Run one pass in its own task so a panic is reported instead of lost
    async fn supervised_pass(&self, task: RefreshTask) -> Result<PassSummary, String> {
        self.status
            .update(task, |s| s.state = TaskState::Running)
            .await;

        let this = self.clone();
        let result = match tokio::spawn(async move { this.run_pass().await }).await {
            Ok(Ok(summary)) => Ok(summary),
            Ok(Err(e)) => Err(e.to_string()),
            Err(e) if e.is_panic() => Err("refresh pass panicked".to_string()),
            Err(e) => Err(e.to_string()),
        };

        match &result {
            Ok(summary) => {
                let summary = *summary;
                self.status
                    .update(task, |s| {
                        s.passes_completed += 1;
                        s.last_pass = Some(summary);
                        s.last_pass_at = Some(Utc::now());
                        s.last_error = None;
                    })
                    .await;
            }
            Err(e) => {
                tracing::error!(task = ?task, "Refresh pass failed: {}", e);
                let error = e.clone();
                self.status
                    .update(task, |s| s.last_error = Some(error))
                    .await;
            }
        }

        result
    }

    /// Single pass over all terrains, run once at startup
    pub async fn run_startup(self) {
        let state = match self.supervised_pass(RefreshTask::Startup).await {
            Ok(_) => TaskState::Finished,
            Err(_) => TaskState::Failed,
        };
        self.status
            .update(RefreshTask::Startup, |s| s.state = state)
            .await;
    }

    /// Repeat passes forever, pausing `interval` between them.
    ///
    /// A failed pass is retried after the restart backoff; the task gives up
    /// after more than `max_restarts` consecutive failures.
    pub async fn run_periodic(self) {
        let mut consecutive_failures = 0;

        loop {
            match self.supervised_pass(RefreshTask::Periodic).await {
                Ok(_) => {
                    consecutive_failures = 0;
                    self.status
                        .update(RefreshTask::Periodic, |s| s.state = TaskState::Idle)
                        .await;
                    tokio::time::sleep(self.interval).await;
                }
                Err(_) => {
                    consecutive_failures += 1;
                    if consecutive_failures > self.max_restarts {
                        tracing::error!(
                            "Periodic refresh stopped after {} consecutive failures",
                            consecutive_failures
                        );
                        self.status
                            .update(RefreshTask::Periodic, |s| s.state = TaskState::Failed)
                            .await;
                        return;
                    }

                    tracing::warn!(
                        "Restarting periodic refresh in {:?} (attempt {})",
                        self.restart_backoff,
                        consecutive_failures
                    );
                    self.status
                        .update(RefreshTask::Periodic, |s| {
                            s.restarts += 1;
                            s.state = TaskState::Idle;
                        })
                        .await;
                    tokio::time::sleep(self.restart_backoff).await;
                }
            }
        }
    }

    /// Start the one-shot and periodic tasks; they run concurrently
    pub fn spawn(self) -> RefreshTasks {
        let startup = tokio::spawn(self.clone().run_startup());
        let periodic = tokio::spawn(self.run_periodic());

        RefreshTasks { startup, periodic }
    }
}
