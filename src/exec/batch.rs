//! Bounded-parallel execution over package directories.
//!
//! Work items are split into consecutive batches of at most
//! [ConcurrencyCeiling] items. Every item of a batch is launched before any
//! is awaited, and the next batch starts only once the whole current batch
//! has finished. A failing batch still runs to completion (in-flight
//! processes are not cancelled) but no later batch is started.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::thread;

use crate::error::{ReleaseError, Result};
use crate::exec::{command_line, CommandRunner, OutputMode};

/// Used when the host cannot report its parallelism.
const FALLBACK_CEILING: NonZeroUsize = match NonZeroUsize::new(4) {
    Some(limit) => limit,
    None => NonZeroUsize::MIN,
};

/// Upper bound on external processes running at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConcurrencyCeiling(NonZeroUsize);

impl ConcurrencyCeiling {
    /// Returns `None` for zero.
    pub fn new(limit: usize) -> Option<Self> {
        NonZeroUsize::new(limit).map(ConcurrencyCeiling)
    }

    /// Hardware parallelism of the current host.
    pub fn from_host() -> Self {
        ConcurrencyCeiling(thread::available_parallelism().unwrap_or(FALLBACK_CEILING))
    }

    /// Picks the first explicit limit, falling back to the host.
    pub fn resolve(explicit: Option<usize>) -> Result<Self> {
        match explicit {
            Some(limit) => Self::new(limit)
                .ok_or_else(|| ReleaseError::config("concurrency must be at least 1")),
            None => Ok(Self::from_host()),
        }
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

/// Splits `items` into ordered batches of at most `ceiling` items.
///
/// Yields `ceil(len / ceiling)` batches; all but the last are full.
pub fn partition<T>(items: &[T], ceiling: ConcurrencyCeiling) -> Vec<&[T]> {
    items.chunks(ceiling.get()).collect()
}

/// Summary of a fully successful batched run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub batches: usize,
    pub completed: Vec<PathBuf>,
}

/// Runs one command against many package directories, batch by batch.
pub struct BatchExecutor<'a> {
    runner: &'a dyn CommandRunner,
    ceiling: ConcurrencyCeiling,
}

impl<'a> BatchExecutor<'a> {
    pub fn new(runner: &'a dyn CommandRunner, ceiling: ConcurrencyCeiling) -> Self {
        BatchExecutor { runner, ceiling }
    }

    pub fn ceiling(&self) -> ConcurrencyCeiling {
        self.ceiling
    }

    /// Run `program args` once in every directory of `items`.
    ///
    /// # Returns
    /// * `Ok(BatchReport)` - Every item succeeded
    /// * `Err(ReleaseError::Package)` - The first failing item (in input
    ///   order) of the first failing batch; later batches never started
    pub fn run_batched<P>(
        &self,
        program: &str,
        args: &[String],
        items: &[P],
        mode: OutputMode,
    ) -> Result<BatchReport>
    where
        P: AsRef<Path> + Sync,
    {
        let batches = partition(items, self.ceiling);
        let total = batches.len();
        let mut completed = Vec::with_capacity(items.len());

        for (index, batch) in batches.into_iter().enumerate() {
            tracing::debug!(
                batch = index + 1,
                of = total,
                size = batch.len(),
                command = %command_line(program, args),
                "starting batch"
            );

            let results = self.run_batch(program, args, batch, mode);

            let mut failure = None;
            for (dir, result) in results {
                match result {
                    Ok(_) => completed.push(dir.to_path_buf()),
                    Err(err) => {
                        tracing::warn!(package = %dir.display(), error = %err, "batch item failed");
                        if failure.is_none() {
                            failure = Some(ReleaseError::in_package(dir, err));
                        }
                    }
                }
            }

            if let Some(err) = failure {
                tracing::warn!(
                    skipped_batches = total - index - 1,
                    "halting after failed batch"
                );
                return Err(err);
            }
        }

        Ok(BatchReport {
            batches: total,
            completed,
        })
    }

    fn run_batch<'p, P>(
        &self,
        program: &str,
        args: &[String],
        batch: &'p [P],
        mode: OutputMode,
    ) -> Vec<(&'p Path, Result<String>)>
    where
        P: AsRef<Path> + Sync,
    {
        let runner = self.runner;
        thread::scope(|scope| {
            let handles: Vec<_> = batch
                .iter()
                .map(|item| {
                    let dir = item.as_ref();
                    (dir, scope.spawn(move || runner.run(program, args, dir, mode)))
                })
                .collect();

            handles
                .into_iter()
                .map(|(dir, handle)| {
                    let result = handle.join().unwrap_or_else(|_| {
                        Err(ReleaseError::command_failed(
                            command_line(program, args),
                            None,
                            "worker thread panicked",
                        ))
                    });
                    (dir, result)
                })
                .collect()
        })
    }
}
