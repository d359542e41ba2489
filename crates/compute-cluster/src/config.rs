//! Backend options for the PBS and gateway cluster variants.

use serde::{Deserialize, Serialize};

/// Per-job resources and submission settings for the PBS backend.
///
/// The defaults reproduce the fixed single-core job profile used on the
/// `casper` queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PbsOptions {
    pub queue: String,
    pub walltime: String,
    pub memory: String,
    pub cores: usize,
    pub processes: usize,
    /// Command the batch job launches.
    pub worker_command: String,
    /// Scheduler submission binary.
    pub submit_command: String,
}

impl Default for PbsOptions {
    fn default() -> Self {
        Self {
            queue: "casper".to_string(),
            walltime: "0:10:00".to_string(),
            memory: "4GB".to_string(),
            cores: 1,
            processes: 1,
            worker_command: "dash-worker".to_string(),
            submit_command: "qsub".to_string(),
        }
    }
}

impl PbsOptions {
    /// PBS select expression for one job.
    pub fn select_statement(&self) -> String {
        format!("select=1:ncpus={}:mem={}", self.cores, self.memory)
    }
}

/// Connection settings for the HTTP cluster gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayOptions {
    pub base_url: String,
    /// Bearer token sent with every gateway request when present.
    pub token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pbs_profile_matches_the_casper_queue() {
        let options = PbsOptions::default();
        assert_eq!(options.queue, "casper");
        assert_eq!(options.walltime, "0:10:00");
        assert_eq!(options.memory, "4GB");
        assert_eq!(options.cores, 1);
        assert_eq!(options.processes, 1);
        assert_eq!(options.select_statement(), "select=1:ncpus=1:mem=4GB");
    }

    #[test]
    fn test_select_statement_tracks_overrides() {
        let options = PbsOptions {
            cores: 4,
            memory: "16GB".to_string(),
            ..PbsOptions::default()
        };
        assert_eq!(options.select_statement(), "select=1:ncpus=4:mem=16GB");
    }
}
