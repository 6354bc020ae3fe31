// Process interactor - Orchestrates URL to document conversion

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::engine::SamplingEngine;
use crate::ports::*;

/// Interactor for the download, sample and assemble use case
pub struct ProcessInteractor {
    acquisition: Arc<dyn AcquisitionPort>,
    storage: Arc<dyn StoragePort>,
    engine: Arc<SamplingEngine>,
}

impl ProcessInteractor {
    /// Create new process interactor with injected ports
    pub fn new(
        acquisition: Arc<dyn AcquisitionPort>,
        storage: Arc<dyn StoragePort>,
        engine: Arc<SamplingEngine>,
    ) -> Self {
        Self {
            acquisition,
            storage,
            engine,
        }
    }

    /// Execute a processing request, reporting progress through `tracing`
    pub async fn process(&self, request: ProcessRequest) -> Result<ProcessResponse, ProcessError> {
        self.process_with_observer(request, Arc::new(TracingObserver))
            .await
    }

    /// Execute a processing request with a caller-supplied progress observer
    pub async fn process_with_observer(
        &self,
        request: ProcessRequest,
        observer: Arc<dyn SamplingObserver>,
    ) -> Result<ProcessResponse, ProcessError> {
        let (url, sampling) = request.validate()?;

        let context = RequestContext::generate();
        info!(
            request_id = context.id(),
            url = %url,
            interval = sampling.interval_seconds(),
            strategy = self.acquisition.strategy().as_str(),
            "Processing request"
        );

        let mut staged = StagedFiles::new(Arc::clone(&self.storage), context.clone());
        let cookies = match request.cookies.as_deref() {
            Some(bytes) if !bytes.is_empty() => {
                let path = self
                    .storage
                    .put(&context.namespaced("cookies.txt"), bytes)
                    .await?;
                staged.track(path.clone());
                Some(path)
            }
            _ => None,
        };

        let result = self
            .run(url, sampling, &context, cookies, &mut staged, observer)
            .await;

        drop(staged);

        match &result {
            Ok(response) => info!(
                request_id = context.id(),
                filename = %response.summary.filename,
                frames = response.summary.frame_count,
                "Request completed"
            ),
            Err(e) => warn!(request_id = context.id(), kind = e.error_kind(), "Request failed: {}", e),
        }
        result
    }

    async fn run(
        &self,
        url: String,
        sampling: SamplingSpec,
        context: &RequestContext,
        cookies: Option<PathBuf>,
        staged: &mut StagedFiles,
        observer: Arc<dyn SamplingObserver>,
    ) -> Result<ProcessResponse, ProcessError> {
        let acquisition_request = AcquisitionRequest {
            url,
            output_dir: self.storage.root().to_path_buf(),
            context: context.clone(),
            cookies,
        };

        let media = self.acquisition.acquire(&acquisition_request).await?;
        staged.track(media.path.clone());

        if !media.exists() {
            return Err(ProcessError::Acquisition(AcquisitionError::new(
                AcquisitionFailure::Failed,
                "Video download failed",
            )));
        }

        info!(
            request_id = context.id(),
            path = %media.path.display(),
            title = %media.title,
            duration_hint = ?media.duration_hint,
            "Video acquired"
        );
        observer.on_media_acquired(&media);

        let job = ExtractionJob::new(media.path.clone(), sampling, media.title.clone(), context.clone());
        let engine = Arc::clone(&self.engine);
        let outcome = tokio::task::spawn_blocking(move || engine.extract_and_assemble(&job, observer.as_ref()))
            .await
            .map_err(|e| PipelineError::assembly(format!("extraction task failed: {}", e)))??;

        match outcome {
            Outcome::Success(summary) => Ok(ProcessResponse {
                request_id: context.id().to_string(),
                summary,
            }),
            Outcome::NoFrames { duration_seconds } => Err(ProcessError::NoFrames { duration_seconds }),
        }
    }
}

/// Temporary files of one request: the cookie bundle, the downloaded media
/// and anything the downloader left under the request's prefix.
///
/// Removal happens on drop, so files are cleaned up whether the request
/// finished, failed or was cancelled mid-flight.
struct StagedFiles {
    storage: Arc<dyn StoragePort>,
    context: RequestContext,
    paths: Vec<PathBuf>,
}

impl StagedFiles {
    fn new(storage: Arc<dyn StoragePort>, context: RequestContext) -> Self {
        Self {
            storage,
            context,
            paths: Vec::new(),
        }
    }

    fn track(&mut self, path: PathBuf) {
        self.paths.push(path);
    }
}

impl Drop for StagedFiles {
    fn drop(&mut self) {
        for path in &self.paths {
            self.storage.discard(path);
        }
        self.storage.discard_namespace(&self.context);
    }
}

/// Request for a URL to document conversion
#[derive(Debug, Clone, Default)]
pub struct ProcessRequest {
    pub url: String,
    /// Interval as typed by the user, validated before any work starts
    pub interval: String,
    /// Optional cookie bundle forwarded to acquisition
    pub cookies: Option<Vec<u8>>,
}

impl ProcessRequest {
    pub fn new(url: impl Into<String>, interval: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            interval: interval.into(),
            cookies: None,
        }
    }

    pub fn with_cookies(mut self, cookies: Vec<u8>) -> Self {
        self.cookies = Some(cookies);
        self
    }

    /// Boundary validation: a URL must be present and the interval must be a
    /// positive integer
    pub fn validate(&self) -> Result<(String, SamplingSpec), ProcessError> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err(ProcessError::InvalidRequest(
                "Please provide a video URL".to_string(),
            ));
        }
        let sampling = SamplingSpec::parse(&self.interval)?;
        Ok((url.to_string(), sampling))
    }
}

/// Response from a successful conversion
#[derive(Debug, Clone)]
pub struct ProcessResponse {
    pub request_id: String,
    pub summary: ExtractionSummary,
}
