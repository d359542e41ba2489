//! Compute-cluster provisioning for the dashboard.
//!
//! Three mutually exclusive backends: a local rayon pool, a PBS batch
//! queue driven through `qsub`, and a remote cluster gateway spoken to
//! over HTTP. Provisioning failures propagate to the caller unhandled.

pub mod cluster;
pub mod config;
pub mod error;
pub mod gateway;
pub mod local;
pub mod pbs;

pub use cluster::{ClusterHandle, ClusterSpec};
pub use config::{GatewayOptions, PbsOptions};
pub use error::{ClusterError, Result};
pub use gateway::GatewayCluster;
pub use local::LocalCluster;
pub use pbs::PbsCluster;
