use std::{
    sync::{Mutex, mpsc},
    thread,
};

use evoarena_core::{Agent, Environment};
use rand_pcg::Pcg64Mcg;

use crate::{SetupError, rollout};

/// One unit of rollout work: a disjoint slice of the population plus the
/// job's own RNG.
///
/// Disjointness of the agent slices is guaranteed by the manager's
/// partitioning step; the job mutates nothing outside its slice and its
/// rollout-local state. The RNG is seeded by the manager at partition time so
/// results do not depend on which worker picks the job up.
#[derive(Debug)]
pub struct RolloutJob<'pop> {
    pub agents: &'pop mut [Agent],
    pub rng: Pcg64Mcg,
}

/// Fixed-size pool of worker threads sharing one bounded work queue.
///
/// Workers are spawned per generation and exit when the queue is drained and
/// closed; no worker state survives a generation. The queue is sized to the
/// number of jobs, so dispatch never blocks.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    worker_count: usize,
}

impl WorkerPool {
    pub fn new(worker_count: usize) -> Result<Self, SetupError> {
        if worker_count == 0 {
            return Err(SetupError::NoWorkers);
        }
        Ok(Self { worker_count })
    }

    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Runs every job to completion and returns the number of completion
    /// signals received.
    ///
    /// The return value equals the number of jobs dispatched: each worker
    /// signals once per finished work item (not once per worker), which is
    /// what the manager's completion barrier counts.
    pub fn run_rollouts(&self, environment: &dyn Environment, jobs: Vec<RolloutJob<'_>>) -> usize {
        let job_count = jobs.len();
        let (work_tx, work_rx) = mpsc::sync_channel::<RolloutJob<'_>>(job_count);
        let work_rx = Mutex::new(work_rx);
        let (done_tx, done_rx) = mpsc::channel::<()>();

        thread::scope(|scope| {
            for _ in 0..self.worker_count {
                let work_rx = &work_rx;
                let done_tx = done_tx.clone();
                scope.spawn(move || {
                    loop {
                        // Holding the lock only for the blocking recv; the
                        // rollout itself runs unlocked.
                        let job = work_rx.lock().expect("work queue lock poisoned").recv();
                        let Ok(mut job) = job else { break };
                        rollout::run_rollout(environment, job.agents, &mut job.rng);
                        if done_tx.send(()).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(done_tx);

            // Queue capacity equals the job count, so dispatch cannot block.
            for job in jobs {
                work_tx
                    .send(job)
                    .expect("workers outlive the dispatch loop");
            }
            // Closing the queue tells idle workers there is no more work.
            drop(work_tx);

            done_rx.iter().count()
        })
    }
}
