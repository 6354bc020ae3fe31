//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Arguments for the convert command
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Video page URL
    #[arg(short, long)]
    pub url: String,

    /// Seconds between captured frames (defaults to the configured interval)
    #[arg(short, long)]
    pub interval: Option<String>,

    /// Netscape cookies file passed to the downloader
    #[arg(long)]
    pub cookies: Option<PathBuf>,

    /// Acquisition strategy (standard or hardened)
    #[arg(long)]
    pub strategy: Option<String>,

    /// Directory for the finished document
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Listen address, e.g. 0.0.0.0:5000
    #[arg(long)]
    pub bind: Option<String>,
}
