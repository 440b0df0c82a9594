// src/watch/monitor.rs

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::config::{validate_monitor_settings, MonitorSettings};
use crate::errors::{DirpollError, Result};
use crate::fs::{FileSystem, RealFileSystem};
use crate::types::{ChangeEvent, CycleMessage};
use crate::watch::cache::SnapshotCache;
use crate::watch::patterns::PathFilter;
use crate::watch::walker::{DiscardSink, TreeWalker, WalkOptions};

/// Polls a directory tree and reports what changed since the previous pass.
///
/// The monitor owns the snapshot cache; nothing else ever touches it, so the
/// polling loop needs no locking.
pub struct DirectoryMonitor {
    settings: MonitorSettings,
    filter: PathFilter,
    fs: Arc<dyn FileSystem>,
    cache: SnapshotCache,
}

impl fmt::Debug for DirectoryMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectoryMonitor")
            .field("settings", &self.settings)
            .field("cached_entries", &self.cache.len())
            .finish_non_exhaustive()
    }
}

impl DirectoryMonitor {
    /// Monitor backed by the real filesystem.
    pub fn new(settings: MonitorSettings) -> Result<Self> {
        Self::with_fs(settings, Arc::new(RealFileSystem))
    }

    pub fn with_fs(settings: MonitorSettings, fs: Arc<dyn FileSystem>) -> Result<Self> {
        validate_monitor_settings(&settings)?;
        let filter = PathFilter::new(&settings.includes, &settings.excludes);
        Ok(Self {
            settings,
            filter,
            fs,
            cache: SnapshotCache::new(),
        })
    }

    pub fn cache(&self) -> &SnapshotCache {
        &self.cache
    }

    /// Seed the cache without reporting anything, so the first real cycle
    /// doesn't announce every existing file as new.
    pub fn warm_up(&mut self) -> Result<()> {
        let (_, result) = self.pass(false);
        result?;
        info!(entries = self.cache.len(), "warm-up walk complete");
        Ok(())
    }

    /// Run one pass over the tree and return the detected changes in
    /// discovery order.
    pub fn poll_once(&mut self) -> Result<Vec<ChangeEvent>> {
        let (changes, result) = self.pass(true);
        result?;
        debug!(changes = changes.len(), "poll complete");
        Ok(changes)
    }

    /// Spawn the polling loop on the Tokio runtime.
    ///
    /// Dropping the returned handle does not stop the loop; use
    /// [`MonitorHandle::shutdown`] or cancel the token.
    pub fn spawn(self, tx: mpsc::Sender<CycleMessage>, cancel: CancellationToken) -> MonitorHandle {
        let join = tokio::spawn(self.run(tx, cancel.clone()));
        MonitorHandle { join, cancel }
    }

    /// Warm up, then emit one `Start` / changes / `End` cycle per tick until
    /// cancelled, the receiver goes away, or a walk fails.
    ///
    /// Walks run on the blocking pool, so cancellation is seen even in the
    /// middle of a long pass. A failed walk still sends the changes it found
    /// before the error, then its `End`, before the loop stops with the
    /// error. Returning drops `tx`, which closes the channel.
    pub async fn run(
        self,
        tx: mpsc::Sender<CycleMessage>,
        cancel: CancellationToken,
    ) -> Result<()> {
        info!(settings = %self.settings, "directory monitor starting");
        let interval = self.settings.interval;

        let warm_up = self.pass_blocking(false);
        let (mut monitor, _, result) = tokio::select! {
            _ = cancel.cancelled() => {
                info!("monitor cancelled during warm-up; stopping");
                return Ok(());
            }
            res = warm_up => res?,
        };
        result?;
        info!(entries = monitor.cache.len(), "warm-up walk complete");

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("monitor cancelled; stopping");
                    return Ok(());
                }
                _ = ticker.tick() => {}
            }

            if !send(&tx, &cancel, CycleMessage::Start).await {
                return Ok(());
            }

            let walk = monitor.pass_blocking(true);
            let (next, changes, result) = tokio::select! {
                _ = cancel.cancelled() => {
                    info!("monitor cancelled mid-walk; stopping");
                    return Ok(());
                }
                res = walk => res?,
            };
            monitor = next;

            for change in changes {
                if !send(&tx, &cancel, CycleMessage::Change(change)).await {
                    return Ok(());
                }
            }

            if !send(&tx, &cancel, CycleMessage::End).await {
                return Ok(());
            }

            if let Err(err) = result {
                error!(error = %err, "caught fatal error while walking; stopping monitor");
                return Err(err);
            }
        }
    }

    /// One walk over the tree. Changes found before a failure are returned
    /// alongside it; the cache already reflects them.
    fn pass(&mut self, report: bool) -> (Vec<ChangeEvent>, Result<()>) {
        let options = self.walk_options();
        let mut walker = TreeWalker::new(self.fs.as_ref(), &self.filter, &mut self.cache, options);
        let root = &self.settings.root_dir;
        if report {
            let mut changes = Vec::new();
            let result = walker.walk(root, &mut changes);
            (changes, result)
        } else {
            (Vec::new(), walker.walk(root, &mut DiscardSink))
        }
    }

    /// Run [`Self::pass`] on the blocking pool, handing the monitor back.
    async fn pass_blocking(mut self, report: bool) -> Result<(Self, Vec<ChangeEvent>, Result<()>)> {
        tokio::task::spawn_blocking(move || {
            let (changes, result) = self.pass(report);
            (self, changes, result)
        })
        .await
        .map_err(|e| DirpollError::Other(e.into()))
    }

    fn walk_options(&self) -> WalkOptions {
        WalkOptions {
            no_traverse: self.settings.no_traverse,
            compare_mtime: self.settings.compare_mtime,
        }
    }
}

/// Send one message, giving up if the token is cancelled or the reactor has
/// gone away. Returns false when the loop should stop.
async fn send(
    tx: &mpsc::Sender<CycleMessage>,
    cancel: &CancellationToken,
    msg: CycleMessage,
) -> bool {
    tokio::select! {
        _ = cancel.cancelled() => {
            info!("monitor cancelled while sending; stopping");
            false
        }
        res = tx.send(msg) => match res {
            Ok(()) => true,
            Err(_) => {
                info!("change channel closed; stopping monitor");
                false
            }
        }
    }
}

/// Handle for a spawned monitor loop.
#[derive(Debug)]
pub struct MonitorHandle {
    join: JoinHandle<Result<()>>,
    cancel: CancellationToken,
}

impl MonitorHandle {
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the loop to end on its own (fatal error or cancellation).
    pub async fn wait(self) -> Result<()> {
        self.join.await.map_err(anyhow::Error::from)?
    }

    /// Cancel the loop and wait for it to finish.
    pub async fn shutdown(self) -> Result<()> {
        self.cancel.cancel();
        self.wait().await
    }
}
