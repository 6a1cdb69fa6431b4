use clap::{Parser, Subcommand};

use crate::config::{get_config_dir, get_data_dir};
use crate::feed::FeedSource;

#[derive(Parser, Debug)]
#[command(author, version = version(), about, args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Feed manifests to browse: local paths or http(s) URLs
    #[arg(value_name = "FEED")]
    pub feeds: Vec<FeedSource>,

    /// An initial search to run once the feeds are loaded
    #[arg(short, long)]
    pub search: Option<String>,

    /// Tick rate, i.e. number of ticks per second
    #[arg(short, long = "tps", value_name = "FLOAT", default_value_t = 4.0)]
    pub tick_rate: f64,

    /// Frame rate, i.e. number of frames per second
    #[arg(short, long = "fps", value_name = "FLOAT", default_value_t = 30.0)]
    pub frame_rate: f64,

    /// Show TPS/FPS counter
    #[arg(long)]
    pub counter: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate feed manifests and print diagnostics
    Lint {
        /// Feed manifests to lint
        #[arg(value_name = "FEED", required = true)]
        feeds: Vec<FeedSource>,

        /// Exit non-zero on warnings as well as errors
        #[arg(long)]
        strict: bool,
    },

    /// Resolve the download URLs of a macro or module
    Resolve {
        /// Feed manifest: a local path or an http(s) URL
        #[arg(value_name = "FEED")]
        feed: FeedSource,

        /// Dotted namespace, e.g. arch.AegisubChain
        namespace: String,

        /// Release channel (the record's default channel when omitted)
        #[arg(short, long)]
        channel: Option<String>,
    },

    /// Show details and changelog of a macro or module
    Show {
        /// Feed manifest: a local path or an http(s) URL
        #[arg(value_name = "FEED")]
        feed: FeedSource,

        /// Dotted namespace, e.g. arch.AegisubChain
        namespace: String,
    },
}

const VERSION_MESSAGE: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "-",
    env!("VERGEN_GIT_DESCRIBE"),
    " (",
    env!("VERGEN_BUILD_DATE"),
    ")"
);

pub fn version() -> String {
    let author = clap::crate_authors!();

    let config_dir_path = get_config_dir().display().to_string();
    let data_dir_path = get_data_dir().display().to_string();

    format!(
        "\
{VERSION_MESSAGE}

Authors: {author}

Config directory: {config_dir_path}
Data directory: {data_dir_path}"
    )
}
