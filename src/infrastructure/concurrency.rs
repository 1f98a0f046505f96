//! Thread pool setup for batch commands.
//! Leaves half the machine to the editor that launched us.

use anyhow::{Context, Result};

/// Initialize the global rayon thread pool with half the cores, minimum 1.
pub fn init_thread_pool() -> Result<usize> {
    let cores = num_cpus::get();
    let workers = std::cmp::max(1, cores / 2);

    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build_global()
        .context("global thread pool already initialized")?;

    log::info!(
        "[StyleLens] Initialized thread pool: {} workers (system has {} cores)",
        workers, cores
    );

    Ok(workers)
}
