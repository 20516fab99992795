use std::sync::{mpsc, Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, info_span, warn};

use crate::store::{JsonFileStore, StoreError};

/// Sending side of a persist worker.
///
/// Submitting never blocks on I/O; snapshots are queued and written in order by the
/// worker thread, which only keeps the newest when several are waiting.
#[derive(Debug)]
pub struct Persister<T> {
    tx: mpsc::Sender<T>,
}

impl<T> Clone for Persister<T> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone() }
    }
}

impl<T> Persister<T> {
    /// Queue a snapshot for writing. Returns `false` once the worker has stopped.
    pub fn submit(&self, snapshot: T) -> bool {
        self.tx.send(snapshot).is_ok()
    }
}

/// Persist worker statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PersistStats {
    pub writes_succeeded: u64,
    pub writes_failed: u64,
    /// Snapshots skipped because a newer one was already queued.
    pub snapshots_coalesced: u64,
}

/// Handle to control and join a persist worker.
#[derive(Debug)]
pub struct PersistWorkerHandle {
    shutdown: mpsc::Sender<()>,
    join: Option<thread::JoinHandle<()>>,
    stats: Arc<Mutex<PersistStats>>,
}

impl PersistWorkerHandle {
    /// Request shutdown and wait for the worker to flush its newest pending snapshot.
    pub fn shutdown(mut self) {
        let _ = self.shutdown.send(());
        if let Some(j) = self.join.take() {
            let _ = j.join();
        }
    }

    pub fn stats(&self) -> PersistStats {
        self.stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Serializes writes of one record type to one file.
#[derive(Debug)]
pub struct PersistWorker;

impl PersistWorker {
    /// Spawn a worker thread that writes submitted snapshots to `storage`.
    pub fn spawn<T>(
        name: &'static str,
        storage: JsonFileStore<T>,
    ) -> Result<(Persister<T>, PersistWorkerHandle), StoreError>
    where
        T: Serialize + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<T>();
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
        let stats = Arc::new(Mutex::new(PersistStats::default()));
        let span = info_span!("persist_worker", worker = name, path = %storage.path().display());

        let worker_stats = Arc::clone(&stats);
        let join = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                let _enter = span.enter();
                worker_loop(&storage, &rx, &shutdown_rx, &worker_stats);
            })
            .map_err(StoreError::Worker)?;

        Ok((
            Persister { tx },
            PersistWorkerHandle {
                shutdown: shutdown_tx,
                join: Some(join),
                stats,
            },
        ))
    }
}

fn worker_loop<T: Serialize>(
    storage: &JsonFileStore<T>,
    rx: &mpsc::Receiver<T>,
    shutdown_rx: &mpsc::Receiver<()>,
    stats: &Mutex<PersistStats>,
) {
    let tick = Duration::from_millis(100);
    info!("persist worker started");

    loop {
        if shutdown_rx.try_recv().is_ok() {
            if let Some(snapshot) = newest_pending(rx, None, stats) {
                write(storage, &snapshot, stats);
            }
            break;
        }

        match rx.recv_timeout(tick) {
            Ok(first) => {
                if let Some(snapshot) = newest_pending(rx, Some(first), stats) {
                    write(storage, &snapshot, stats);
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => continue,
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    info!("persist worker stopped");
}

/// Drain the queue and keep only the newest snapshot.
fn newest_pending<T>(
    rx: &mpsc::Receiver<T>,
    first: Option<T>,
    stats: &Mutex<PersistStats>,
) -> Option<T> {
    let mut newest = first;
    let mut skipped = 0;
    for snapshot in rx.try_iter() {
        if newest.replace(snapshot).is_some() {
            skipped += 1;
        }
    }

    if skipped > 0 {
        debug!(skipped, "coalesced queued snapshots");
        stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshots_coalesced += skipped;
    }
    newest
}

fn write<T: Serialize>(storage: &JsonFileStore<T>, snapshot: &T, stats: &Mutex<PersistStats>) {
    let result = storage.save(snapshot);
    let mut stats = stats.lock().unwrap_or_else(PoisonError::into_inner);
    match result {
        Ok(()) => {
            stats.writes_succeeded += 1;
            debug!("persisted snapshot");
        }
        Err(err) => {
            stats.writes_failed += 1;
            warn!(error = %err, "failed to persist snapshot");
        }
    }
}
