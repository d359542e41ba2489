//! Local worker pool built from the host process's own resources.

use tracing::info;

use crate::error::{ClusterError, Result};

/// Rayon thread pool scaled to an exact worker count.
///
/// Unlike the batch and gateway variants this one executes work: the
/// raster fill runs inside the pool when the local backend is selected.
pub struct LocalCluster {
    pool: rayon::ThreadPool,
    workers: usize,
}

impl LocalCluster {
    pub fn start(workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(ClusterError::invalid_config(
                "local cluster needs at least one worker",
            ));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("dash-worker-{}", i))
            .build()
            .map_err(|e| ClusterError::spawn(format!("{}", e)))?;
        info!("started local worker pool with {} threads", workers);
        Ok(Self { pool, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn pool(&self) -> &rayon::ThreadPool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_is_scaled_to_the_requested_count() {
        let cluster = LocalCluster::start(3).unwrap();
        assert_eq!(cluster.workers(), 3);
        let inside = cluster.pool().install(rayon::current_num_threads);
        assert_eq!(inside, 3);
    }

    #[test]
    fn test_zero_workers_is_rejected() {
        assert!(matches!(
            LocalCluster::start(0),
            Err(ClusterError::InvalidConfig(_))
        ));
    }
}
