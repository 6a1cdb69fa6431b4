mod action;
mod app;
mod cli;
mod commands;
mod components;
mod config;
mod errors;
mod feed;
mod logging;
mod search;
mod tui;
mod util;

use clap::Parser;
use cli::{Cli, Command};
use color_eyre::Result;

use crate::app::App;
use crate::feed::FeedSource;

#[tokio::main]
async fn main() -> Result<()> {
    errors::init()?;
    logging::init()?;

    let args = Cli::parse();

    match args.command {
        Some(Command::Lint { feeds, strict }) => commands::lint(feeds, strict).await?,
        Some(Command::Resolve {
            feed,
            namespace,
            channel,
        }) => commands::resolve(feed, &namespace, channel.as_deref()).await?,
        Some(Command::Show { feed, namespace }) => commands::show(feed, &namespace).await?,
        None => {
            let mut feeds = args.feeds;
            if feeds.is_empty() {
                let config = config::Config::new()?;
                feeds = config
                    .config
                    .default_feeds
                    .iter()
                    .filter_map(|source| source.parse::<FeedSource>().ok())
                    .collect();
            }

            let mut app = App::new(
                args.tick_rate,
                args.frame_rate,
                args.counter,
                feeds,
                args.search,
            )?;
            app.run().await?;
        }
    }

    Ok(())
}
