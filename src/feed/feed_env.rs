use std::collections::HashMap;

use tracing::warn;

use crate::errors::AppResult;
use crate::feed::client;
use crate::feed::manifest::{Feed, ScriptRecord};
use crate::feed::source::FeedSource;

/// A feed manifest together with where it was loaded from.
pub struct LoadedFeed {
    pub source: Option<FeedSource>,
    pub manifest: Feed,
}

/// The feeds loaded for this session.
///
/// Sources that fail to load are kept in `load_errors` instead of aborting
/// the whole refresh, so one dead mirror does not blank the browser.
pub struct FeedEnv {
    pub sources: Vec<FeedSource>,
    pub feeds: Vec<LoadedFeed>,
    pub load_errors: Vec<(FeedSource, String)>,
    module_index: HashMap<String, usize>,
}

impl FeedEnv {
    pub fn new(sources: Vec<FeedSource>) -> Self {
        Self {
            sources,
            feeds: Vec::new(),
            load_errors: Vec::new(),
            module_index: HashMap::new(),
        }
    }

    /// An environment over already-parsed manifests (used by tests and by
    /// callers that do their own loading).
    pub fn with_feeds(feeds: Vec<Feed>) -> Self {
        let mut env = Self::new(Vec::new());
        env.feeds = feeds
            .into_iter()
            .map(|manifest| LoadedFeed {
                source: None,
                manifest,
            })
            .collect();
        env.reindex();
        env
    }

    /// Reloads every source and rebuilds the namespace index.
    pub async fn load(&mut self) -> AppResult<()> {
        self.feeds.clear();
        self.load_errors.clear();

        for source in self.sources.clone() {
            match Self::load_source(&source).await {
                Ok(manifest) => self.feeds.push(LoadedFeed {
                    source: Some(source),
                    manifest,
                }),
                Err(err) => {
                    warn!("failed to load feed {source}: {err}");
                    self.load_errors.push((source, err.to_string()));
                }
            }
        }

        self.reindex();
        Ok(())
    }

    /// Loads and parses one feed manifest.
    pub async fn load_source(source: &FeedSource) -> AppResult<Feed> {
        match source {
            FeedSource::Path(path) => Ok(std::fs::read_to_string(path)?.parse()?),
            FeedSource::Url(url) => client::fetch_feed(url).await,
        }
    }

    fn reindex(&mut self) {
        self.module_index = self
            .feeds
            .iter()
            .enumerate()
            .flat_map(|(ix, loaded)| {
                loaded
                    .manifest
                    .modules
                    .keys()
                    .map(move |namespace| (namespace.clone(), ix))
            })
            .collect();
    }

    /// A module advertised by any loaded feed.
    pub fn find_module(&self, namespace: &str) -> Option<&ScriptRecord> {
        let ix = *self.module_index.get(namespace)?;
        self.feeds[ix].manifest.modules.get(namespace)
    }

    pub fn record_count(&self) -> usize {
        self.feeds
            .iter()
            .map(|loaded| loaded.manifest.record_count())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::SAMPLE_FEED;
    use pretty_assertions::assert_eq;

    #[test]
    fn indexes_modules_across_feeds() {
        let feed: Feed = SAMPLE_FEED.parse().unwrap();
        let env = FeedEnv::with_feeds(vec![feed]);

        assert_eq!(env.record_count(), 2);
        assert!(env.find_module("arch.Util").is_some());
        assert!(env.find_module("arch.AegisubChain").is_none());
        assert!(env.find_module("l0.DependencyControl").is_none());
    }

    #[tokio::test]
    async fn missing_files_become_load_errors() {
        let mut env = FeedEnv::new(vec![FeedSource::Path("does/not/exist.json".into())]);
        env.load().await.unwrap();
        assert_eq!(env.feeds.len(), 0);
        assert_eq!(env.load_errors.len(), 1);
    }
}
