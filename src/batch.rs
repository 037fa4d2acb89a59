/*!
 * Batch processing of annotation documents.
 *
 * Each document is loaded and analysed on the blocking thread pool, with at
 * most `jobs` documents in flight. A document that fails to load or analyse
 * is recorded in the report and never stops the rest of the batch.
 */

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info};

use crate::analysis::DocumentAnalysis;
use crate::app_config::Config;
use crate::eaf::document::EafDocument;
use crate::errors::AppError;
use crate::language_utils::LanguageDetector;

/// Outcome of a batch run, in input order
#[derive(Debug)]
pub struct BatchReport<T> {
    pub successes: Vec<(PathBuf, T)>,
    pub failures: Vec<(PathBuf, AppError)>,
}

impl<T> BatchReport<T> {
    pub fn total(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runs one task over many documents concurrently
pub struct BatchProcessor {
    config: Arc<Config>,
    detector: Arc<dyn LanguageDetector>,
    jobs: usize,
    show_progress: bool,
}

impl BatchProcessor {
    pub fn new(config: Config, detector: Arc<dyn LanguageDetector>) -> Self {
        let jobs = config.batch.jobs.max(1);
        Self {
            config: Arc::new(config),
            detector,
            jobs,
            show_progress: false,
        }
    }

    /// Override the number of concurrent documents
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    fn progress_bar(&self, total: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let progress_bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar
    }

    /// Load every document and run `task` on its analysis
    pub async fn run<T, F>(&self, paths: &[PathBuf], task: F) -> BatchReport<T>
    where
        T: Send + 'static,
        F: Fn(&DocumentAnalysis) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        let task = Arc::new(task);
        let total = paths.len();
        let done = Arc::new(AtomicUsize::new(0));
        let progress_bar = self.progress_bar(total);
        let start_time = Instant::now();

        info!("Processing {} documents with {} jobs", total, self.jobs);

        let mut results = stream::iter(paths.iter().cloned().enumerate())
            .map(|(index, path)| {
                let config = self.config.clone();
                let detector = self.detector.clone();
                let task = task.clone();
                let done = done.clone();
                let progress_bar = progress_bar.clone();

                async move {
                    let worker_path = path.clone();
                    let outcome = tokio::task::spawn_blocking(move || -> Result<T, AppError> {
                        let document = EafDocument::from_path(&worker_path)?;
                        let analysis = DocumentAnalysis::new(&document, &config, detector.as_ref());
                        Ok(task(&analysis)?)
                    })
                    .await
                    .unwrap_or_else(|join_error| Err(AppError::Unknown(format!("worker panicked: {}", join_error))));

                    let current = done.fetch_add(1, Ordering::SeqCst) + 1;
                    progress_bar.set_position(current as u64);
                    progress_bar.set_message(path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default());
                    debug!("Finished {:?} ({}/{})", path, current, total);

                    (index, path, outcome)
                }
            })
            .buffer_unordered(self.jobs)
            .collect::<Vec<_>>()
            .await;

        results.sort_by_key(|(index, _, _)| *index);
        progress_bar.finish_and_clear();

        let mut report = BatchReport {
            successes: Vec::new(),
            failures: Vec::new(),
        };
        for (_, path, outcome) in results {
            match outcome {
                Ok(value) => report.successes.push((path, value)),
                Err(e) => {
                    error!("Failed to process {:?}: {}", path, e);
                    report.failures.push((path, e));
                }
            }
        }

        info!(
            "Processed {} documents in {:?}: {} succeeded, {} failed",
            report.total(),
            start_time.elapsed(),
            report.successes.len(),
            report.failures.len()
        );
        report
    }
}
