//! Bounded job distribution for worker pools.

use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc;

/// Distributes jobs round-robin over a pool of workers.
///
/// Each worker owns a bounded channel; `dispatch` blocks when the selected
/// worker's buffer is full, which is the pipeline's backpressure. Dropping
/// the router closes every channel, and workers drain until closed and
/// empty - that is the only shutdown signal a pool needs.
pub struct JobRouter<J> {
    senders: Vec<mpsc::Sender<J>>,
    next_worker: AtomicUsize,
}

impl<J: Send + 'static> JobRouter<J> {
    /// Create a router and the receivers for `num_workers` workers.
    pub fn new(num_workers: usize, buffer_size: usize) -> (Self, Vec<mpsc::Receiver<J>>) {
        let mut senders = Vec::with_capacity(num_workers);
        let mut receivers = Vec::with_capacity(num_workers);

        for _ in 0..num_workers {
            let (tx, rx) = mpsc::channel(buffer_size);
            senders.push(tx);
            receivers.push(rx);
        }

        let router = Self {
            senders,
            next_worker: AtomicUsize::new(0),
        };

        (router, receivers)
    }

    /// Send a job to the next worker in round-robin order.
    ///
    /// Returns the job back if the worker's channel has closed.
    pub async fn dispatch(&self, job: J) -> Result<(), J> {
        let worker_idx = self.next_worker.fetch_add(1, Ordering::Relaxed) % self.senders.len();
        self.senders[worker_idx].send(job).await.map_err(|e| e.0)
    }

    /// Number of workers this router feeds.
    pub fn num_workers(&self) -> usize {
        self.senders.len()
    }
}
