//! Fixed-delay scheduler
//!
//! Runs the job once immediately, then sleeps for the period after each
//! cycle completes. Cycle duration adds to the wait; missed periods are never
//! caught up. Job errors are logged here and never stop the loop.

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{error, info};

use crate::error::ScanResult;
use crate::pipeline::BreakoutPipeline;
use crate::types::CycleReport;

/// Unit of work driven by the scheduler, one invocation at a time
#[async_trait]
pub trait Job: Send + Sync {
    async fn run(&self) -> ScanResult<CycleReport>;
}

#[async_trait]
impl Job for BreakoutPipeline {
    async fn run(&self) -> ScanResult<CycleReport> {
        self.run_cycle().await
    }
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    period: Duration,
    max_cycles: Option<u64>,
}

impl Scheduler {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            max_cycles: None,
        }
    }

    /// Stop after `cycles` completed runs
    pub fn with_max_cycles(mut self, cycles: u64) -> Self {
        self.max_cycles = Some(cycles);
        self
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Drive `job` until `shutdown` resolves or the cycle limit is reached.
    ///
    /// Returns the number of cycles that ran to completion.
    pub async fn run<J, S>(&self, job: &J, shutdown: S) -> u64
    where
        J: Job + ?Sized,
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut completed: u64 = 0;

        loop {
            let started = Instant::now();
            let outcome = tokio::select! {
                result = job.run() => Some(result),
                _ = &mut shutdown => None,
            };

            let Some(result) = outcome else {
                info!("Shutdown requested during cycle {}", completed + 1);
                break;
            };
            completed += 1;

            match result {
                Ok(report) => info!(
                    "Cycle {} finished in {:.1}s: {} candidates, {} alerts",
                    completed,
                    started.elapsed().as_secs_f64(),
                    report.candidates,
                    report.dispatched
                ),
                Err(e) => error!("Cycle {} failed: {}", completed, e),
            }

            if self.max_cycles.is_some_and(|max| completed >= max) {
                break;
            }

            info!("Next scan in {}s", self.period.as_secs());
            tokio::select! {
                _ = sleep(self.period) => {}
                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping scheduler");
                    break;
                }
            }
        }

        completed
    }
}
