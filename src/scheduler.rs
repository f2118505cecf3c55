//! Per-year job scheduling with fixed-delay retries.
//!
//! The scheduler is generic over a [`YearRunner`], one fetch-extract-write
//! cycle for a year, so the same code drives the live scraper and in-memory
//! runners in tests.
//!
//! # Modes
//!
//! - **Sequential** (`concurrency <= 1`): years run in input order on the
//!   calling task, one attempt each. A failure is logged and the next year
//!   starts.
//! - **Pool** (`concurrency > 1`): `concurrency` worker tasks pull [`Job`]s
//!   from a shared FIFO queue. Each job gets up to `1 + retries` attempts with
//!   a fixed `delay` between them; after that it is abandoned.
//!
//! Per job the states are `Pending -> Attempting -> Succeeded | Abandoned`,
//! with a failed attempt looping back to `Attempting` while retries remain.
//! No failure ever stops other jobs, and [`run_jobs`] only returns once every
//! job is in a terminal state.

use crate::error::ScrapeError;
use crate::models::{Job, Outcome, RunResult};
use futures::future::join_all;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Mutex};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// One fetch-extract-write cycle for a year.
pub trait YearRunner: Send + Sync + 'static {
    /// Process `year`, returning the number of records written.
    fn run_year(&self, year: u16) -> impl Future<Output = Result<usize, ScrapeError>> + Send;
}

/// How failed attempts are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first failure.
    pub retries: u32,
    /// Fixed pause between attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(retries: u32, delay: Duration) -> Self {
        Self { retries, delay }
    }

    /// A single attempt, no retries.
    pub fn once() -> Self {
        Self::new(0, Duration::ZERO)
    }

    pub fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }
}

/// Run every year in `years` to a terminal state.
///
/// With `concurrency <= 1` the years run one after another with a single
/// attempt each. Otherwise `concurrency` workers share a FIFO queue and each
/// job is retried per `policy`.
///
/// # Arguments
///
/// * `runner` - Performs one fetch-extract-write cycle for a year
/// * `years` - Years to process, in queueing order
/// * `concurrency` - Number of workers; `0` and `1` mean sequential
/// * `policy` - Retry count and fixed delay between attempts (pool mode)
///
/// # Returns
///
/// Exactly one [`RunResult`] per entry of `years`, in input order. A job whose
/// worker died before reporting is returned as abandoned with 0 attempts.
///
/// # Examples
///
/// ```ignore
/// let scraper = Arc::new(SciScraper::new(config, out_dir)?);
/// let policy = RetryPolicy::new(2, Duration::from_secs(5));
/// let results = run_jobs(scraper, &[2016, 2017, 2018], 4, policy).await;
/// ```
pub async fn run_jobs<R: YearRunner>(
    runner: Arc<R>,
    years: &[u16],
    concurrency: usize,
    policy: RetryPolicy,
) -> Vec<RunResult> {
    let t0 = Instant::now();
    let results = if concurrency <= 1 {
        run_sequential(runner.as_ref(), years).await
    } else {
        run_pool(runner, years, concurrency, policy).await
    };

    let succeeded = results.iter().filter(|r| r.succeeded()).count();
    info!(
        total = results.len(),
        succeeded,
        abandoned = results.len() - succeeded,
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "All jobs finished"
    );
    results
}

async fn run_sequential<R: YearRunner>(runner: &R, years: &[u16]) -> Vec<RunResult> {
    let mut results = Vec::with_capacity(years.len());
    for (seq, &year) in years.iter().enumerate() {
        results.push(attempt_job(runner, Job { seq, year }, RetryPolicy::once(), 0).await);
    }
    results
}

async fn run_pool<R: YearRunner>(
    runner: Arc<R>,
    years: &[u16],
    concurrency: usize,
    policy: RetryPolicy,
) -> Vec<RunResult> {
    let (tx, rx) = mpsc::channel::<Job>(1);
    let rx = Arc::new(Mutex::new(rx));

    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<(usize, RunResult)>();

    let workers: Vec<_> = (1..=concurrency)
        .map(|worker| {
            let runner = Arc::clone(&runner);
            let rx = Arc::clone(&rx);
            let done_tx = done_tx.clone();
            tokio::spawn(async move {
                let mut jobs = 0usize;
                loop {
                    let next = rx.lock().await.recv().await;
                    let Some(job) = next else { break };
                    let seq = job.seq;
                    let result = attempt_job(runner.as_ref(), job, policy, worker).await;
                    jobs += 1;
                    if done_tx.send((seq, result)).is_err() {
                        error!(worker, "Result channel closed");
                        break;
                    }
                }
                debug!(worker, jobs, "Worker idle, queue closed");
            })
        })
        .collect();
    drop(done_tx);

    let queued = years.to_vec();
    let producer = tokio::spawn(async move {
        for (seq, year) in queued.into_iter().enumerate() {
            info!(year, "Queueing year");
            if tx.send(Job { seq, year }).await.is_err() {
                error!(year, "Job queue closed before all years were queued");
                break;
            }
        }
    });

    for joined in join_all(workers).await {
        if let Err(e) = joined {
            error!(error = %e, "Worker task failed");
        }
    }
    if let Err(e) = producer.await {
        error!(error = %e, "Job producer failed");
    }

    let mut slots: Vec<Option<RunResult>> = vec![None; years.len()];
    while let Ok((seq, result)) = done_rx.try_recv() {
        slots[seq] = Some(result);
    }

    slots
        .into_iter()
        .zip(years)
        .map(|(slot, &year)| {
            slot.unwrap_or_else(|| {
                error!(year, "No result reported; marking abandoned");
                RunResult {
                    year,
                    attempts: 0,
                    outcome: Outcome::Abandoned {
                        error: "worker task failed before reporting a result".to_string(),
                    },
                }
            })
        })
        .collect()
}

/// Drive one job to a terminal state. `worker` 0 is the sequential path.
async fn attempt_job<R: YearRunner>(
    runner: &R,
    job: Job,
    policy: RetryPolicy,
    worker: usize,
) -> RunResult {
    let Job { year, .. } = job;
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        info!(worker, year, attempt, "Scraping year");

        match runner.run_year(year).await {
            Ok(records) => {
                info!(worker, year, attempt, records, "Done year");
                return RunResult {
                    year,
                    attempts: attempt,
                    outcome: Outcome::Succeeded { records },
                };
            }
            Err(e) if attempt >= policy.max_attempts() => {
                error!(worker, year, attempts = attempt, error = %e, "Giving up on year");
                return RunResult {
                    year,
                    attempts: attempt,
                    outcome: Outcome::Abandoned {
                        error: e.to_string(),
                    },
                };
            }
            Err(e) => {
                warn!(worker, year, attempt, delay = ?policy.delay, error = %e, "Scrape failed; retrying");
                sleep(policy.delay).await;
            }
        }
    }
}
