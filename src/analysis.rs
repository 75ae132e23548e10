use crate::config::Config;
use crate::error::{Error, Result};

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tokio::runtime::Runtime;
use tokio::select;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

struct Job {
    path: PathBuf,
    token: CancellationToken,
    join: JoinHandle<Result<()>>,
}

/// Runs auto-editor in the background, one file at a time.
pub struct Analyzer {
    rt: Runtime,
    job: Option<Job>,
}

impl Analyzer {
    pub fn new() -> Result<Self> {
        let rt = Runtime::new().map_err(|e| Error::AnalysisFailed(format!("no runtime: {}", e)))?;
        Ok(Self { rt, job: None })
    }

    pub fn is_running(&self) -> bool {
        self.job.is_some()
    }

    pub fn request<P: AsRef<Path>>(&mut self, config: &Config, path: P) -> Result<()> {
        if self.job.is_some() {
            return Err(Error::AnalysisInProgress);
        }

        let path = path.as_ref().to_path_buf();
        let mut command = Command::new(&config.auto_editor_bin);
        command
            .arg(&path)
            .args(config.analysis_args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        log::info!("Running {} on {}", config.auto_editor_bin, path.display());

        let token = CancellationToken::new();
        let join = self.rt.spawn(Self::run(command, token.clone()));

        self.job = Some(Job { path, token, join });
        Ok(())
    }

    /// Returns the analysed path with its outcome once the job is done. Never blocks on a running job.
    pub fn finish(&mut self) -> Option<(PathBuf, Result<()>)> {
        if !self.job.as_ref()?.join.is_finished() {
            return None;
        }

        let job = self.job.take()?;
        let result = match self.rt.block_on(job.join) {
            Ok(result) => result,
            Err(e) => Err(Error::AnalysisFailed(e.to_string())),
        };
        Some((job.path, result))
    }

    pub fn stop(&mut self) {
        if let Some(job) = self.job.take() {
            job.token.cancel();
            if let Err(e) = self.rt.block_on(job.join) {
                log::error!("Analysis task failed: {}", e);
            }
        }
    }

    async fn run(mut command: Command, token: CancellationToken) -> Result<()> {
        let child = command
            .spawn()
            .map_err(|e| Error::AnalysisFailed(format!("failed to run auto-editor: {}", e)))?;

        select! {
            output = child.wait_with_output() => match output {
                Ok(output) if output.status.success() => Ok(()),
                Ok(output) => Err(Error::AnalysisFailed(format!(
                    "auto-editor {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ))),
                Err(e) => Err(Error::AnalysisFailed(e.to_string())),
            },
            _ = token.cancelled() => Err(Error::AnalysisCancelled),
        }
    }
}

impl Drop for Analyzer {
    fn drop(&mut self) {
        self.stop();
    }
}
