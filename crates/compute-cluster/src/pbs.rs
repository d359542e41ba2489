//! PBS batch-queue provisioning via `qsub`.

use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, instrument};

use crate::config::PbsOptions;
use crate::error::{ClusterError, Result};

/// Handle over a set of submitted batch jobs.
///
/// Provision-only: the jobs start workers on the scheduler's side and
/// nothing here talks to them afterwards. Job ids are retained so the
/// run can be traced back in the queue.
pub struct PbsCluster {
    job_ids: Vec<String>,
    workers: usize,
}

/// Batch job script carrying the per-job resource directives.
pub(crate) fn job_script(options: &PbsOptions) -> String {
    format!(
        "#!/usr/bin/env bash\n\
         #PBS -N dash-worker\n\
         #PBS -q {}\n\
         #PBS -l {}\n\
         #PBS -l walltime={}\n\
         exec {} --cores {} --processes {}\n",
        options.queue,
        options.select_statement(),
        options.walltime,
        options.worker_command,
        options.cores,
        options.processes,
    )
}

impl PbsCluster {
    /// Submits one job per requested worker.
    ///
    /// Any submission failure aborts provisioning; jobs already accepted
    /// by the scheduler are left to run out their walltime.
    #[instrument(skip(options), fields(queue = %options.queue))]
    pub async fn submit(workers: usize, options: &PbsOptions) -> Result<Self> {
        if workers == 0 {
            return Err(ClusterError::invalid_config(
                "PBS cluster needs at least one job",
            ));
        }
        let script = job_script(options);
        debug!("PBS job script:\n{}", script);
        let mut job_ids = Vec::with_capacity(workers);
        for _ in 0..workers {
            job_ids.push(submit_one(&options.submit_command, &script).await?);
        }
        info!(
            "submitted {} PBS jobs to queue {}: {}",
            job_ids.len(),
            options.queue,
            job_ids.join(", ")
        );
        Ok(Self { job_ids, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn job_ids(&self) -> &[String] {
        &self.job_ids
    }
}

async fn submit_one(submit_command: &str, script: &str) -> Result<String> {
    let mut child = Command::new(submit_command)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| ClusterError::submit(format!("could not run {}: {}", submit_command, e)))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(script.as_bytes())
            .await
            .map_err(|e| ClusterError::submit(format!("could not write job script: {}", e)))?;
    }

    let output = child
        .wait_with_output()
        .await
        .map_err(|e| ClusterError::submit(format!("{} did not complete: {}", submit_command, e)))?;
    if !output.status.success() {
        return Err(ClusterError::submit(format!(
            "{} exited with {}: {}",
            submit_command,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let job_id = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if job_id.is_empty() {
        return Err(ClusterError::submit("scheduler returned no job id"));
    }
    Ok(job_id)
}
