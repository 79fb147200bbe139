//! Pipeline orchestration.

use crate::router::JobRouter;
use cw_error::Result;
use cw_footer::FooterReader;
use cw_traits::{ColumnCache, ObjectStore};
use cw_types::{ColumnBytes, FileDescriptor, PrefetchRequest, PrefetchingConfig, RequestedColumn};
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Per-worker buffer of the file-job queue. The lister blocks when a
/// worker's buffer fills.
const FILE_QUEUE_BUFFER: usize = 100;

/// One file to expand into column jobs.
struct FileJob {
    bucket: String,
    file: FileDescriptor,
    columns: Arc<HashSet<String>>,
}

/// One column chunk to fetch and cache.
struct ColumnJob {
    bucket: String,
    file_key: String,
    column: RequestedColumn,
}

/// Orchestrates one prefetch run over a listing of Parquet files.
///
/// Two nested pools of `concurrency_limit` workers: file workers read
/// footers and fan out into their own column pools, so up to
/// `concurrency_limit^2` column tasks run at peak. The run is best-effort -
/// per-file and per-column failures are logged and skipped; only a listing
/// failure surfaces to the caller.
#[derive(Clone)]
pub struct PrefetchEngine {
    store: Arc<dyn ObjectStore>,
    cache: Arc<dyn ColumnCache>,
    footer: FooterReader,
    concurrency_limit: usize,
}

impl PrefetchEngine {
    /// Create an engine over shared store and cache clients.
    pub fn new(
        store: Arc<dyn ObjectStore>,
        cache: Arc<dyn ColumnCache>,
        config: &PrefetchingConfig,
    ) -> Self {
        Self {
            footer: FooterReader::new(store.clone()),
            store,
            cache,
            concurrency_limit: config.concurrency_limit,
        }
    }

    /// Run the pipeline for one request.
    ///
    /// Cancelling the token stops workers from pulling new jobs, drops
    /// in-flight I/O, and makes this return `Ok(())` - cancellation is the
    /// expected end of a deadline-bounded run, not an error.
    pub async fn prefetch(&self, request: PrefetchRequest, cancel: CancellationToken) -> Result<()> {
        let Some(listing) = cancel
            .run_until_cancelled(self.store.list(&request.bucket, &request.prefix))
            .await
        else {
            return Ok(());
        };
        let files = listing?;

        info!(
            bucket = %request.bucket,
            prefix = %request.prefix,
            files = files.len(),
            columns = ?request.columns,
            "Listed dataset files for prefetch"
        );

        let columns: Arc<HashSet<String>> = Arc::new(request.columns.iter().cloned().collect());

        let (router, receivers) = JobRouter::new(self.concurrency_limit, FILE_QUEUE_BUFFER);
        let mut workers = Vec::with_capacity(self.concurrency_limit);
        for rx in receivers {
            let engine = self.clone();
            let cancel = cancel.clone();
            workers.push(tokio::spawn(async move {
                engine.file_worker(rx, cancel).await;
            }));
        }

        for file in files {
            // The engine, not the store adapter, filters to columnar files.
            if !file.key.ends_with(".parquet") {
                continue;
            }

            let job = FileJob {
                bucket: request.bucket.clone(),
                file,
                columns: columns.clone(),
            };

            tokio::select! {
                _ = cancel.cancelled() => break,
                result = router.dispatch(job) => {
                    if result.is_err() {
                        break;
                    }
                }
            }
        }
        drop(router);

        for (i, result) in join_all(workers).await.into_iter().enumerate() {
            if let Err(e) = result {
                error!(worker = i, error = %e, "File worker panicked");
            }
        }

        if cancel.is_cancelled() {
            info!(bucket = %request.bucket, prefix = %request.prefix, "Prefetch cancelled");
        }

        info!(
            object_store_total_secs = cw_metrics::object_store_total_secs(),
            cache_total_secs = cw_metrics::cache_total_secs(),
            "Cumulative sequential time in external requests"
        );

        Ok(())
    }

    async fn file_worker(&self, mut rx: mpsc::Receiver<FileJob>, cancel: CancellationToken) {
        loop {
            let job = tokio::select! {
                _ = cancel.cancelled() => break,
                job = rx.recv() => match job {
                    Some(job) => job,
                    None => break,
                },
            };

            if let Err(error) = self.prefetch_file_columns(&job, &cancel).await {
                warn!(
                    key = %job.file.key,
                    error = %error,
                    "Failed to prefetch parquet file, skipping"
                );
            }
        }
    }

    /// Expand one file's footer into column jobs and drain them through this
    /// worker's own column pool.
    async fn prefetch_file_columns(&self, job: &FileJob, cancel: &CancellationToken) -> Result<()> {
        let Some(metadata) = cancel
            .run_until_cancelled(self.footer.read_metadata(
                &job.bucket,
                &job.file.key,
                job.file.size,
            ))
            .await
        else {
            return Ok(());
        };
        let metadata = metadata?;

        let requested = cw_footer::requested_columns(&metadata, &job.columns, job.file.size);
        if requested.is_empty() {
            debug!(key = %job.file.key, "No requested columns present in file");
            return Ok(());
        }
        debug!(key = %job.file.key, chunks = requested.len(), "Dispatching column chunks");

        let (router, receivers) = JobRouter::new(self.concurrency_limit, requested.len());
        let mut workers = Vec::with_capacity(self.concurrency_limit);
        for rx in receivers {
            let engine = self.clone();
            let cancel = cancel.clone();
            workers.push(tokio::spawn(async move {
                engine.column_worker(rx, cancel).await;
            }));
        }

        for column in requested {
            let column_job = ColumnJob {
                bucket: job.bucket.clone(),
                file_key: job.file.key.clone(),
                column,
            };

            tokio::select! {
                _ = cancel.cancelled() => break,
                result = router.dispatch(column_job) => {
                    if result.is_err() {
                        break;
                    }
                }
            }
        }
        drop(router);

        // The file worker returns only after its column pool has drained.
        for (i, result) in join_all(workers).await.into_iter().enumerate() {
            if let Err(e) = result {
                error!(worker = i, key = %job.file.key, error = %e, "Column worker panicked");
            }
        }

        Ok(())
    }

    async fn column_worker(&self, mut rx: mpsc::Receiver<ColumnJob>, cancel: CancellationToken) {
        loop {
            let job = tokio::select! {
                _ = cancel.cancelled() => break,
                job = rx.recv() => match job {
                    Some(job) => job,
                    None => break,
                },
            };

            match cancel.run_until_cancelled(self.fetch_and_cache(&job)).await {
                // Cancelled mid-flight: the GET or SET future was dropped
                None => break,
                Some(Err(error)) => {
                    warn!(
                        key = %job.file_key,
                        column = %job.column.column_name,
                        error = %error,
                        "Failed to prefetch column chunk, skipping"
                    );
                }
                Some(Ok(())) => {}
            }
        }
    }

    async fn fetch_and_cache(&self, job: &ColumnJob) -> Result<()> {
        let ranged = self
            .store
            .get_range(&job.bucket, &job.file_key, job.column.start, job.column.end)
            .await?;

        let column = ColumnBytes {
            bucket: job.bucket.clone(),
            key: job.file_key.clone(),
            column_name: job.column.column_name.clone(),
            data: ranged.data,
            etag: ranged.etag,
            range: ranged.range,
        };

        self.cache.put(column).await
    }
}
