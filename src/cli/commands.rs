//! Command implementations

use std::io::{BufRead, IsTerminal, Write};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use dialoguer::{theme::ColorfulTheme, Input};
use tracing::info;

use crate::adapters::AppConfig;
use crate::app::{AppContainer, DefaultAppContainer, ProcessRequest};
use crate::cli::args::{ConvertArgs, ServeArgs};
use crate::domain::errors::ProcessError;
use crate::domain::model::{AcquiredMedia, MediaSource};
use crate::ports::{AcquisitionStrategy, SamplingObserver};

/// Prints the step-by-step narration shown to terminal users
pub struct ConsoleObserver {
    interval_seconds: u32,
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleObserver {
    pub fn new(interval_seconds: u32) -> Self {
        Self::with_writer(interval_seconds, Box::new(std::io::stdout()))
    }

    pub fn with_writer(interval_seconds: u32, out: Box<dyn Write + Send>) -> Self {
        Self {
            interval_seconds,
            out: Mutex::new(out),
        }
    }

    fn say(&self, line: std::fmt::Arguments<'_>) {
        if let Ok(mut out) = self.out.lock() {
            // A closed stdout is not a conversion failure
            let _ = writeln!(out, "{}", line);
        }
    }
}

impl SamplingObserver for ConsoleObserver {
    fn on_media_acquired(&self, media: &AcquiredMedia) {
        self.say(format_args!("Video downloaded successfully: {}", media.title));
        self.say(format_args!("Video saved as: {}", media.path.display()));
    }

    fn on_source_opened(&self, _source: &MediaSource, _step: u64) {
        self.say(format_args!(
            "[2/3] Extracting frames every {} seconds...",
            self.interval_seconds
        ));
    }

    fn on_frame_captured(&self, captured: usize, timestamp_seconds: f64) {
        self.say(format_args!(
            "  Captured frame {} at {:.1} seconds",
            captured, timestamp_seconds
        ));
    }

    fn on_sampling_finished(&self, captured: usize) {
        self.say(format_args!("Total frames captured: {}", captured));
    }

    fn on_assembling(&self, _pages: usize) {
        self.say(format_args!("[3/3] Creating PDF..."));
    }
}

/// Execute the interactive command
pub async fn interactive(config: AppConfig) -> Result<()> {
    let url = prompt("Enter your video link")?;
    let interval = prompt("Enter the frame interval in seconds")?;
    run_conversion(config, ProcessRequest::new(url, interval)).await
}

/// Execute the convert command
pub async fn convert(mut config: AppConfig, args: ConvertArgs) -> Result<()> {
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }
    if let Some(strategy) = &args.strategy {
        config.strategy = AcquisitionStrategy::parse(strategy)?;
    }

    let interval = args
        .interval
        .unwrap_or_else(|| config.default_interval.to_string());
    let mut request = ProcessRequest::new(args.url, interval);
    if let Some(path) = &args.cookies {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read cookies file {}", path.display()))?;
        request = request.with_cookies(bytes);
    }

    run_conversion(config, request).await
}

/// Execute the serve command
pub async fn serve(mut config: AppConfig, args: ServeArgs) -> Result<()> {
    if let Some(bind) = args.bind {
        config.bind = bind;
    }
    let bind = config.bind.clone();

    info!("Output directory: {}", config.output_dir.display());
    let container = DefaultAppContainer::new(config).context("Failed to initialize server")?;
    crate::http::serve(&container, &bind).await
}

async fn run_conversion(config: AppConfig, request: ProcessRequest) -> Result<()> {
    // Reject bad input before anything touches the filesystem.
    request.validate()?;

    let container = DefaultAppContainer::new(config).context("Failed to initialize pipeline")?;
    run_with(&container, request).await
}

/// Run one request against `container` and narrate it on stdout.
///
/// A video that yields no frames is reported and is not an error.
pub async fn run_with(container: &dyn AppContainer, request: ProcessRequest) -> Result<()> {
    let (_, sampling) = request.validate()?;

    println!("[1/3] Downloading video...");
    let observer = Arc::new(ConsoleObserver::new(sampling.interval_seconds()));
    let result = container
        .process_interactor()
        .process_with_observer(request, observer)
        .await;

    let response = match result {
        Ok(response) => response,
        Err(ProcessError::NoFrames { .. }) => {
            println!("No frames were captured!");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let summary = response.summary;
    println!(
        "PDF created with {} frames ({} seconds of video)",
        summary.frame_count,
        summary.duration_display()
    );
    println!("Saved to: {}", summary.output_path.display());
    Ok(())
}

/// Read one answer, through dialoguer on a terminal or a plain line otherwise
fn prompt(label: &str) -> Result<String> {
    if std::io::stdin().is_terminal() {
        let answer: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(label)
            .allow_empty(true)
            .interact_text()?;
        return Ok(answer.trim().to_string());
    }

    print!("{}: ", label);
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
