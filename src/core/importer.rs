use crate::domain::model::{ImportedFile, SourceRef};
use crate::domain::ports::FileImporter;
use crate::utils::error::{ImportError, Result};
use std::sync::Arc;
use tokio::task::JoinSet;

pub const DEFAULT_MAX_THREADS: usize = 8;

/// Imports a batch of sources through a worker pool of at most `max_threads`
/// concurrent imports.
///
/// Sources are queued with [`BoundedImporter::add`] and imported by
/// [`BoundedImporter::load`], which takes the queue: a second `load` only sees
/// sources added after the first one.
pub struct BoundedImporter<I: FileImporter + 'static> {
    importer: Arc<I>,
    max_threads: usize,
    pending: Vec<SourceRef>,
}

impl<I: FileImporter + 'static> BoundedImporter<I> {
    pub fn new(importer: I) -> Self {
        Self {
            importer: Arc::new(importer),
            max_threads: DEFAULT_MAX_THREADS,
            pending: Vec::new(),
        }
    }

    pub fn with_max_threads(importer: I, max_threads: usize) -> Result<Self> {
        Self::with_shared(Arc::new(importer), max_threads)
    }

    pub fn with_shared(importer: Arc<I>, max_threads: usize) -> Result<Self> {
        if max_threads == 0 {
            return Err(ImportError::InvalidConfigValueError {
                field: "max_threads".to_string(),
                value: max_threads.to_string(),
                reason: "At least one worker is required".to_string(),
            });
        }

        Ok(Self {
            importer,
            max_threads,
            pending: Vec::new(),
        })
    }

    pub fn add(&mut self, source: impl Into<SourceRef>) {
        self.pending.push(source.into());
    }

    pub fn pending(&self) -> &[SourceRef] {
        &self.pending
    }

    pub fn max_threads(&self) -> usize {
        self.max_threads
    }

    /// Imports every pending source and returns the results in completion
    /// order.
    ///
    /// The first failure observed aborts the remaining in-flight imports and is
    /// returned; results that already completed are discarded.
    pub async fn load(&mut self) -> Result<Vec<ImportedFile>> {
        let sources = std::mem::take(&mut self.pending);
        let expected = sources.len();

        tracing::debug!(
            "Importing {} input files with up to {} workers",
            expected,
            self.max_threads
        );

        let mut results = Vec::with_capacity(expected);
        let mut workers: JoinSet<Result<ImportedFile>> = JoinSet::new();
        let mut queue = sources.into_iter();

        loop {
            while workers.len() < self.max_threads {
                let Some(source) = queue.next() else {
                    break;
                };

                tracing::info!("Importing \"{}\"...", source);
                let importer = Arc::clone(&self.importer);
                workers.spawn(async move {
                    match importer.import_file(&source).await {
                        Ok(handle) => Ok(ImportedFile { source, handle }),
                        Err(e) => Err(ImportError::ImportFailed {
                            source_ref: source.to_string(),
                            cause: Box::new(e),
                        }),
                    }
                });
            }

            let Some(joined) = workers.join_next().await else {
                break;
            };

            match joined {
                Ok(Ok(file)) => {
                    tracing::info!(
                        "File ID \"{}\" (with size=\"{}\") imported successfully.",
                        file.handle.file_id,
                        file.handle.size
                    );
                    results.push(file);
                }
                Ok(Err(e)) => {
                    tracing::error!("{}", e);
                    workers.shutdown().await;
                    return Err(e);
                }
                Err(join_error) => {
                    workers.shutdown().await;
                    return Err(ImportError::WorkerFailed {
                        message: join_error.to_string(),
                    });
                }
            }
        }

        ensure_all_collected(expected, results.len())?;
        Ok(results)
    }
}

fn ensure_all_collected(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        tracing::error!(
            "Incorrect number of files imported: {} != {}",
            expected,
            actual
        );
        return Err(ImportError::CountMismatch { expected, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{FileId, ImportedHandle};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn handle_for(source: &SourceRef) -> ImportedHandle {
        ImportedHandle {
            file_id: FileId::from_content(source.as_str().as_bytes()),
            size: source.as_str().len() as u64,
        }
    }

    #[derive(Default)]
    struct CountingImporter {
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        delay: Duration,
        fail_on: Option<String>,
        panic_on: Option<String>,
    }

    impl CountingImporter {
        fn with_delay(delay: Duration) -> Self {
            Self {
                delay,
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl FileImporter for CountingImporter {
        async fn import_file(&self, source: &SourceRef) -> Result<ImportedHandle> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.panic_on.as_deref() == Some(source.as_str()) {
                panic!("worker blew up on {}", source);
            }
            if self.fail_on.as_deref() == Some(source.as_str()) {
                return Err(ImportError::HttpStatus {
                    url: source.to_string(),
                    status: 404,
                });
            }
            Ok(handle_for(source))
        }
    }

    fn sources(n: usize) -> Vec<String> {
        (0..n)
            .map(|i| format!("http://example.com/file-{}.zip", i))
            .collect()
    }

    #[tokio::test]
    async fn test_load_returns_one_handle_per_source() {
        let stub = Arc::new(CountingImporter::default());
        let mut importer = BoundedImporter::with_shared(stub.clone(), 4).unwrap();
        for source in sources(12) {
            importer.add(source);
        }

        let results = importer.load().await.unwrap();

        assert_eq!(results.len(), 12);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 12);

        let returned: HashSet<String> = results.iter().map(|f| f.source.to_string()).collect();
        let expected: HashSet<String> = sources(12).into_iter().collect();
        assert_eq!(returned, expected);

        for file in &results {
            assert_eq!(file.handle, handle_for(&file.source));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_single_worker_never_overlaps() {
        let stub = Arc::new(CountingImporter::with_delay(Duration::from_millis(10)));
        let mut importer = BoundedImporter::with_shared(stub.clone(), 1).unwrap();
        for source in sources(5) {
            importer.add(source);
        }

        let results = importer.load().await.unwrap();

        assert_eq!(results.len(), 5);
        assert_eq!(stub.max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_in_flight_imports_capped_at_max_threads() {
        let stub = Arc::new(CountingImporter::with_delay(Duration::from_millis(50)));
        let mut importer = BoundedImporter::with_shared(stub.clone(), 3).unwrap();
        for source in sources(10) {
            importer.add(source);
        }

        let results = importer.load().await.unwrap();

        assert_eq!(results.len(), 10);
        assert_eq!(stub.max_in_flight.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_empty_load_does_not_call_importer() {
        let stub = Arc::new(CountingImporter::default());
        let mut importer = BoundedImporter::with_shared(stub.clone(), 8).unwrap();

        let results = importer.load().await.unwrap();

        assert!(results.is_empty());
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_single_failure_fails_whole_load() {
        let all = sources(6);
        let stub = Arc::new(CountingImporter {
            fail_on: Some(all[3].clone()),
            ..Default::default()
        });
        let mut importer = BoundedImporter::with_shared(stub, 2).unwrap();
        for source in &all {
            importer.add(source.as_str());
        }

        match importer.load().await {
            Err(ImportError::ImportFailed { source_ref, cause }) => {
                assert_eq!(source_ref, all[3]);
                assert!(matches!(*cause, ImportError::HttpStatus { status: 404, .. }));
            }
            other => panic!("expected ImportFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_worker_panic_is_reported() {
        let all = sources(3);
        let stub = Arc::new(CountingImporter {
            panic_on: Some(all[1].clone()),
            ..Default::default()
        });
        let mut importer = BoundedImporter::with_shared(stub, 3).unwrap();
        for source in &all {
            importer.add(source.as_str());
        }

        let err = importer.load().await.unwrap_err();
        assert!(matches!(err, ImportError::WorkerFailed { .. }));
    }

    #[tokio::test]
    async fn test_second_load_does_not_resubmit() {
        let stub = Arc::new(CountingImporter::default());
        let mut importer = BoundedImporter::with_shared(stub.clone(), 2).unwrap();
        for source in sources(3) {
            importer.add(source);
        }

        assert_eq!(importer.load().await.unwrap().len(), 3);
        assert!(importer.pending().is_empty());
        assert!(importer.load().await.unwrap().is_empty());
        assert_eq!(stub.calls.load(Ordering::SeqCst), 3);

        importer.add("http://example.com/late.zip");
        let late = importer.load().await.unwrap();
        assert_eq!(late.len(), 1);
        assert_eq!(late[0].source.as_str(), "http://example.com/late.zip");
    }

    #[test]
    fn test_zero_workers_rejected() {
        let result = BoundedImporter::with_max_threads(CountingImporter::default(), 0);
        assert!(matches!(
            result,
            Err(ImportError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_default_worker_limit() {
        let importer = BoundedImporter::new(CountingImporter::default());
        assert_eq!(importer.max_threads(), DEFAULT_MAX_THREADS);
    }

    // Every worker either returns a handle or aborts the load, so `load` cannot
    // lose a result on its own; the post-condition is checked directly here.
    #[test]
    fn test_dropped_result_is_count_mismatch() {
        assert!(ensure_all_collected(4, 4).is_ok());
        assert!(matches!(
            ensure_all_collected(4, 3),
            Err(ImportError::CountMismatch {
                expected: 4,
                actual: 3
            })
        ));
    }
}
