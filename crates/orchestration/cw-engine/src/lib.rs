//! The prefetch pipeline.
//!
//! A two-stage, concurrency-bounded fan-out: file workers read footers and
//! expand them into column jobs; column workers perform the ranged read and
//! the cache write. Both stages are fixed worker pools draining bounded
//! queues; no task is ever spawned per file or per column, so a prefix with
//! a million objects holds no more buffers than a prefix with ten.

mod engine;
mod router;

pub use engine::PrefetchEngine;
pub use router::JobRouter;
