use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use super::app::OneShot;

/// Get direct download links for media on supported Jewish media sites.
///
/// Without a URL an interactive session starts.
#[derive(Debug, Clone, Parser)]
#[command(name = "torahdl", version)]
pub struct Cli {
    /// Media page to resolve once, printing the result and exiting.
    pub url: Option<String>,

    /// Print the supported sites and exit.
    #[arg(long, conflicts_with = "url")]
    pub sites: bool,

    /// Also save the media into the output directory (with a URL).
    #[arg(long, requires = "url")]
    pub save: bool,

    /// Save the media to this file (or into this directory) instead.
    #[arg(short, long, value_name = "PATH", requires = "url")]
    pub output: Option<PathBuf>,

    /// Print only the direct download link (with a URL).
    #[arg(long, requires = "url", conflicts_with_all = ["save", "output"])]
    pub url_only: bool,

    /// Base origin of the extraction API.
    #[arg(long, value_name = "URL", env = "TORAHDL_API_BASE_URL")]
    pub api_base_url: Option<String>,

    /// Config file to read instead of ./torahdl.ron.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory saved media is written to.
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Where log output goes.
    #[arg(long, value_enum, default_value_t = LogTarget::File)]
    pub log: LogTarget,

    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// How a one-shot run should behave. `--output` implies `--save`.
    pub fn one_shot(&self) -> OneShot {
        OneShot {
            url_only: self.url_only,
            save: self.save || self.output.is_some(),
            target: self.output.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
}
