//! Periodic background jobs.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// A task run on a fixed interval.
#[async_trait::async_trait]
pub trait Job: Send + Sync {
    fn name(&self) -> &'static str;

    /// Time between runs. The first run happens one interval after start.
    fn interval(&self) -> Duration;

    async fn execute(&self) -> Result<(), String>;
}

/// Runs registered jobs on their own tokio tasks until shut down.
pub struct JobScheduler {
    jobs: Vec<Arc<dyn Job>>,
    shutdown_tx: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl JobScheduler {
    pub fn new() -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            jobs: Vec::new(),
            shutdown_tx,
            handles: Vec::new(),
        }
    }

    pub fn register<J: Job + 'static>(&mut self, job: J) {
        self.jobs.push(Arc::new(job));
    }

    pub fn start(&mut self) {
        info!(jobs = self.jobs.len(), "Starting job scheduler");

        for job in &self.jobs {
            let job = Arc::clone(job);
            let mut shutdown_rx = self.shutdown_tx.subscribe();

            self.handles.push(tokio::spawn(async move {
                let name = job.name();
                let mut interval = tokio::time::interval(job.interval());
                interval.tick().await;

                loop {
                    tokio::select! {
                        _ = interval.tick() => run_once(job.as_ref()).await,
                        _ = shutdown_rx.changed() => {
                            if *shutdown_rx.borrow() {
                                info!(job = name, "Job shutting down");
                                break;
                            }
                        }
                    }
                }
            }));
        }
    }

    /// Signals every job to stop after its current run.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    pub async fn wait_for_shutdown(self, timeout: Duration) {
        let all = async {
            for handle in self.handles {
                if let Err(e) = handle.await {
                    warn!("Job task panicked: {}", e);
                }
            }
        };
        if tokio::time::timeout(timeout, all).await.is_err() {
            warn!("Job shutdown timed out after {:?}", timeout);
        }
    }
}

impl Default for JobScheduler {
    fn default() -> Self {
        Self::new()
    }
}

async fn run_once(job: &dyn Job) {
    let start = Instant::now();
    match job.execute().await {
        Ok(()) => info!(
            job = job.name(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Job completed"
        ),
        Err(e) => error!(
            job = job.name(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            error = %e,
            "Job failed"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingJob {
        runs: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl Job for CountingJob {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn interval(&self) -> Duration {
            Duration::from_millis(10)
        }

        async fn execute(&self) -> Result<(), String> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_jobs_run_and_stop() {
        let runs = Arc::new(AtomicUsize::new(0));
        let mut scheduler = JobScheduler::new();
        scheduler.register(CountingJob { runs: runs.clone() });
        scheduler.start();

        tokio::time::sleep(Duration::from_millis(100)).await;
        scheduler.shutdown();
        scheduler.wait_for_shutdown(Duration::from_secs(1)).await;

        let after_stop = runs.load(Ordering::SeqCst);
        assert!(after_stop >= 1);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(runs.load(Ordering::SeqCst), after_stop);
    }
}
