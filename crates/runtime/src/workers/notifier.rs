//! Standing consumer of the bounded damage queue.
//!
//! Producers call [`DamageSender::try_notify`], which never waits: when the
//! queue is full the event is dropped and counted. The [`Notifier`] task
//! drains the queue for the lifetime of the session, reads a fresh status
//! from the store for every event, and broadcasts a [`DamageReport`].

use std::sync::Arc;

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use super::metrics::NotifierMetrics;
use crate::api::{DamageReport, Result, RuntimeError};
use crate::store::CombatStore;

/// Damage dealt to the player by the single landed attack of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageEvent {
    pub damage: u32,
}

/// Receiving half of the damage queue, handed to [`Notifier::spawn`].
pub struct DamageReceiver {
    rx: mpsc::Receiver<DamageEvent>,
}

/// Producer half of the bounded damage queue.
#[derive(Clone)]
pub struct DamageSender {
    tx: mpsc::Sender<DamageEvent>,
    metrics: Arc<NotifierMetrics>,
}

/// Creates a queue holding at most `capacity` pending events.
///
/// # Panics
///
/// Panics if `capacity` is 0; [`crate::SessionBuilder::build`] rejects that
/// configuration before reaching here.
pub fn damage_queue(capacity: usize) -> (DamageSender, DamageReceiver) {
    let (tx, rx) = mpsc::channel(capacity);
    let sender = DamageSender {
        tx,
        metrics: Arc::new(NotifierMetrics::new()),
    };
    (sender, DamageReceiver { rx })
}

impl DamageReceiver {
    /// Takes the next pending event without waiting, if any.
    pub fn try_recv(&mut self) -> Option<DamageEvent> {
        self.rx.try_recv().ok()
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

impl DamageSender {
    /// Offers an event without waiting. Returns false if it was dropped.
    pub fn try_notify(&self, damage: u32) -> bool {
        match self.tx.try_send(DamageEvent { damage }) {
            Ok(()) => {
                self.metrics.record_enqueued();
                self.metrics.set_queue_depth(self.pending() as u64);
                true
            }
            Err(TrySendError::Full(_)) => {
                self.metrics.record_dropped();
                warn!(damage, "damage queue full, event dropped");
                false
            }
            Err(TrySendError::Closed(_)) => {
                self.metrics.record_dropped();
                trace!(damage, "damage queue closed, event dropped");
                false
            }
        }
    }

    /// Events currently waiting in the queue.
    pub fn pending(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    pub fn capacity(&self) -> usize {
        self.tx.max_capacity()
    }

    pub fn metrics(&self) -> Arc<NotifierMetrics> {
        Arc::clone(&self.metrics)
    }
}

/// Background task turning damage events into reports.
pub struct Notifier {
    shutdown_tx: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl Notifier {
    /// Starts the consumer on the current tokio runtime.
    pub fn spawn(
        queue: DamageReceiver,
        sender: &DamageSender,
        store: CombatStore,
        report_tx: broadcast::Sender<DamageReport>,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let worker = NotifierWorker {
            rx: queue.rx,
            store,
            report_tx,
            metrics: sender.metrics(),
            shutdown_rx,
        };

        let handle = tokio::spawn(async move {
            worker.run().await;
        });

        Self {
            shutdown_tx,
            handle,
        }
    }

    /// Stops the consumer and waits for it to exit.
    ///
    /// Events still queued at this point are discarded.
    pub async fn shutdown(self) -> Result<()> {
        let _ = self.shutdown_tx.send(());
        self.handle.await.map_err(RuntimeError::NotifierJoin)
    }
}

struct NotifierWorker {
    rx: mpsc::Receiver<DamageEvent>,
    store: CombatStore,
    report_tx: broadcast::Sender<DamageReport>,
    metrics: Arc<NotifierMetrics>,
    shutdown_rx: oneshot::Receiver<()>,
}

impl NotifierWorker {
    /// Main worker loop.
    async fn run(mut self) {
        loop {
            tokio::select! {
                biased;
                _ = &mut self.shutdown_rx => break,
                Some(event) = self.rx.recv() => self.handle_event(event),
                else => break,
            }
        }
        debug!(processed = self.metrics.processed(), "notifier stopped");
    }

    fn handle_event(&mut self, event: DamageEvent) {
        self.metrics.set_queue_depth(self.rx.len() as u64);

        let status = self.store.status();
        let report = DamageReport::from_status(event.damage, &status);

        info!(
            damage = report.damage,
            severity = %report.severity,
            health_percent = report.health_percent,
            alive_hostiles = report.alive_hostiles,
            turn = report.turn,
            "player took damage"
        );

        self.metrics.record_processed();
        // No subscribers is normal
        let _ = self.report_tx.send(report);
    }
}
