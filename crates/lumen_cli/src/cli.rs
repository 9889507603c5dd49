use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use lumen_renderer::DEFAULT_BUCKET_SIZE;

/// Log levels accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Framebuffer layout to render into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Layout {
    /// Interleaved RGB pixels
    Aos,
    /// One plane per channel
    Soa,
    /// Render both and check they match
    Both,
}

#[derive(Debug, Parser)]
#[command(name = "lumen")]
#[command(about = "Offline CPU path tracer for spheres and cylinders")]
pub struct Args {
    /// Render configuration file
    pub config: PathBuf,

    /// Scene description file
    pub scene: PathBuf,

    /// Output image (.png for PNG, anything else for plain PPM)
    pub output: PathBuf,

    /// Framebuffer layout
    #[arg(long, value_enum, default_value_t = Layout::Aos)]
    pub layout: Layout,

    /// Bucket edge length in pixels
    #[arg(long, default_value_t = DEFAULT_BUCKET_SIZE, value_parser = clap::value_parser!(u32).range(1..))]
    pub bucket_size: u32,

    /// Worker threads (defaults to one per core)
    #[arg(long)]
    pub threads: Option<NonZeroUsize>,

    /// Logging level (RUST_LOG is used when not given)
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,
}
