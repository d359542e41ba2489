//! Backend selection and the provisioned-cluster handle.

use crate::config::{GatewayOptions, PbsOptions};
use crate::error::Result;
use crate::gateway::GatewayCluster;
use crate::local::LocalCluster;
use crate::pbs::PbsCluster;

/// Which backend to provision, with its settings.
///
/// Exactly one variant is constructed per run. The variants share no
/// state and there is no fallback between them: whatever the chosen
/// backend returns, success or failure, is the outcome.
#[derive(Debug, Clone)]
pub enum ClusterSpec {
    Local {
        workers: usize,
    },
    Pbs {
        workers: usize,
        options: PbsOptions,
    },
    Gateway {
        workers: usize,
        options: GatewayOptions,
    },
}

impl ClusterSpec {
    pub async fn provision(self) -> Result<ClusterHandle> {
        match self {
            ClusterSpec::Local { workers } => {
                Ok(ClusterHandle::Local(LocalCluster::start(workers)?))
            }
            ClusterSpec::Pbs { workers, options } => {
                Ok(ClusterHandle::Pbs(PbsCluster::submit(workers, &options).await?))
            }
            ClusterSpec::Gateway { workers, options } => Ok(ClusterHandle::Gateway(
                GatewayCluster::connect(workers, &options).await?,
            )),
        }
    }
}

/// A provisioned cluster, held for the process lifetime.
pub enum ClusterHandle {
    Local(LocalCluster),
    Pbs(PbsCluster),
    Gateway(GatewayCluster),
}

impl ClusterHandle {
    pub fn workers(&self) -> usize {
        match self {
            ClusterHandle::Local(c) => c.workers(),
            ClusterHandle::Pbs(c) => c.workers(),
            ClusterHandle::Gateway(c) => c.workers(),
        }
    }

    /// One-line description for logs and the health endpoint.
    pub fn describe(&self) -> String {
        match self {
            ClusterHandle::Local(c) => format!("local pool ({} threads)", c.workers()),
            ClusterHandle::Pbs(c) => format!("pbs ({} jobs queued)", c.job_ids().len()),
            ClusterHandle::Gateway(c) => format!("gateway cluster {}", c.name()),
        }
    }

    /// Runs `f` inside the local worker pool when that backend is
    /// selected; otherwise runs it on the calling thread. Rayon-based
    /// work inside `f` picks up the pool automatically.
    pub fn run<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        match self {
            ClusterHandle::Local(c) => c.pool().install(f),
            _ => f(),
        }
    }
}
