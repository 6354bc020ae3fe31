//! yt-dlp acquisition adapter
//!
//! Downloads a video with the yt-dlp executable and reports where it landed.
//! Two strategies are available: a plain download and a hardened one that
//! presents as a mobile client and can carry a cookie bundle.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, info};

use crate::domain::errors::{AcquisitionError, AcquisitionFailure};
use crate::domain::model::AcquiredMedia;
use crate::ports::{AcquisitionPort, AcquisitionRequest, AcquisitionStrategy};

const STANDARD_FORMAT: &str = "best[ext=mp4]/best";
const HARDENED_FORMAT: &str = "best";
const HARDENED_EXTRACTOR_ARGS: &str =
    "youtube:player_client=android_creator,ios,mweb;player_skip=configs,webpage";
const HARDENED_USER_AGENT: &str =
    "com.google.android.apps.youtube.creator/23.43.101 (Linux; U; Android 13; en_US)";

/// Printed once the file has been moved to its final location
const RESULT_TEMPLATE: &str = "after_move:%(.{title,filepath,duration})j";

/// Fields read back from yt-dlp after download
#[derive(Debug, Deserialize)]
struct DownloadReport {
    title: Option<String>,
    filepath: Option<String>,
    duration: Option<f64>,
}

/// Acquisition through the yt-dlp command-line tool
pub struct YtDlpAcquisition {
    executable: PathBuf,
    strategy: AcquisitionStrategy,
}

impl YtDlpAcquisition {
    pub fn new(executable: impl Into<PathBuf>, strategy: AcquisitionStrategy) -> Self {
        Self {
            executable: executable.into(),
            strategy,
        }
    }

    /// Output template: `{dir}/{request id}_{title}.{ext}`
    pub fn output_template(request: &AcquisitionRequest) -> String {
        request
            .output_dir
            .join(request.context.namespaced("%(title)s.%(ext)s"))
            .to_string_lossy()
            .into_owned()
    }

    /// Command-line arguments for `request` under this strategy
    pub fn build_args(&self, request: &AcquisitionRequest) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "--no-playlist".into(),
            "--no-warnings".into(),
            "--no-progress".into(),
            "--no-simulate".into(),
            "--print".into(),
            RESULT_TEMPLATE.into(),
            "-o".into(),
            Self::output_template(request),
        ];

        match self.strategy {
            AcquisitionStrategy::Standard => {
                args.extend(["-f".into(), STANDARD_FORMAT.into()]);
            }
            AcquisitionStrategy::Hardened => {
                args.extend([
                    "-f".into(),
                    HARDENED_FORMAT.into(),
                    "--extractor-args".into(),
                    HARDENED_EXTRACTOR_ARGS.into(),
                    "--user-agent".into(),
                    HARDENED_USER_AGENT.into(),
                ]);
                if let Some(cookies) = &request.cookies {
                    args.extend(["--cookies".into(), cookies.to_string_lossy().into_owned()]);
                }
            }
        }

        args.push("--".into());
        args.push(request.url.clone());
        args
    }

    /// Interpret yt-dlp's stdout after a successful exit
    fn parse_report(stdout: &str) -> Result<AcquiredMedia, AcquisitionError> {
        let line = stdout
            .lines()
            .rev()
            .map(str::trim)
            .find(|l| l.starts_with('{'))
            .ok_or_else(|| {
                AcquisitionError::new(AcquisitionFailure::Failed, "Video download failed: no result reported")
            })?;

        let report: DownloadReport = serde_json::from_str(line).map_err(|e| {
            AcquisitionError::new(
                AcquisitionFailure::Failed,
                format!("Video download failed: unreadable result ({})", e),
            )
        })?;

        let path = report.filepath.ok_or_else(|| {
            AcquisitionError::new(AcquisitionFailure::Failed, "Video download failed: no file path reported")
        })?;

        Ok(AcquiredMedia {
            path: PathBuf::from(path),
            title: report.title.unwrap_or_default(),
            duration_hint: report.duration,
        })
    }
}

#[async_trait]
impl AcquisitionPort for YtDlpAcquisition {
    async fn acquire(&self, request: &AcquisitionRequest) -> Result<AcquiredMedia, AcquisitionError> {
        info!(
            url = %request.url,
            strategy = self.strategy.as_str(),
            request_id = request.context.id(),
            "Downloading video"
        );

        let args = self.build_args(request);
        debug!(executable = %self.executable.display(), ?args, "Spawning yt-dlp");

        let output = Command::new(&self.executable)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                AcquisitionError::new(
                    AcquisitionFailure::Failed,
                    format!("could not run {}: {}", self.executable.display(), e),
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AcquisitionError::classify(&stderr));
        }

        let media = Self::parse_report(&String::from_utf8_lossy(&output.stdout))?;
        if !Path::new(&media.path).is_file() {
            return Err(AcquisitionError::new(
                AcquisitionFailure::Failed,
                "Video download failed",
            ));
        }

        info!(path = %media.path.display(), title = %media.title, "Video downloaded");
        Ok(media)
    }

    fn strategy(&self) -> AcquisitionStrategy {
        self.strategy
    }
}
