use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::{oneshot, RwLock};
use tokio::task::JoinHandle;

use crate::action::{Action, SearchAction};
use crate::errors::AppResult;
use crate::feed::lint::Diagnostic;
use crate::feed::manifest::RecordKind;
use crate::feed::version::Version;
use crate::feed::FeedEnv;
use crate::search::{ScriptItem, Scope, SearchOptions, SearchResults, Sort, PAGE_SIZE};

/// Runs searches over the loaded feeds on a background task. A new search
/// cancels whatever the previous one was still doing.
pub struct ScriptSearchManager {
    cancel_tx: Option<oneshot::Sender<()>>,
    action_tx: UnboundedSender<Action>,
}

impl ScriptSearchManager {
    pub fn new(action_tx: UnboundedSender<Action>) -> AppResult<Self> {
        Ok(ScriptSearchManager {
            cancel_tx: None,
            action_tx,
        })
    }

    pub fn search(
        &mut self,
        options: SearchOptions,
        feed_env: Arc<RwLock<FeedEnv>>,
    ) -> JoinHandle<()> {
        if let Some(cancel_tx) = self.cancel_tx.take() {
            let _ = cancel_tx.send(());
        }

        let (cancel_tx, mut cancel_rx) = oneshot::channel();
        self.cancel_tx = Some(cancel_tx);
        let tx = self.action_tx.clone();

        tokio::spawn(async move {
            if cancel_rx.try_recv().is_ok() {
                return;
            }

            let feed_env = feed_env.read().await;
            let term = options.term.unwrap_or_default().to_lowercase();
            let page = options.page.unwrap_or(1);
            let per_page = options.per_page.unwrap_or(PAGE_SIZE);

            let mut items = Self::collect(&feed_env, &options.scope, &term);

            if cancel_rx.try_recv().is_ok() {
                return;
            }

            Self::sort(&mut items, &options.sort);

            let mut search_results = SearchResults::new(page);
            search_results.total_count = items.len();
            search_results.scripts = items
                .into_iter()
                .skip(page.saturating_sub(1) * per_page)
                .take(per_page)
                .collect();

            tx.send(Action::Search(SearchAction::Render(search_results)))
                .ok();
        })
    }

    fn collect(env: &FeedEnv, scope: &Scope, term: &str) -> Vec<ScriptItem> {
        let mut items = Vec::new();

        for loaded in &env.feeds {
            for (kind, namespace, record) in loaded.manifest.records() {
                let in_scope = match scope {
                    Scope::All => true,
                    Scope::Macros => kind == RecordKind::Macro,
                    Scope::Modules => kind == RecordKind::Module,
                };
                if !in_scope {
                    continue;
                }

                let mut item = ScriptItem::from_record(&loaded.manifest, kind, namespace, record);
                if !Self::matches(&item, term) {
                    continue;
                }

                item.exact_match = !term.is_empty()
                    && (item.namespace.to_lowercase() == term
                        || item.name.to_lowercase() == term);
                items.push(item);
            }
        }

        items
    }

    fn matches(item: &ScriptItem, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }
        item.namespace.to_lowercase().contains(term)
            || item.name.to_lowercase().contains(term)
            || item
                .author
                .as_deref()
                .unwrap_or_default()
                .to_lowercase()
                .contains(term)
            || item
                .description
                .as_deref()
                .unwrap_or_default()
                .to_lowercase()
                .contains(term)
    }

    fn sort(items: &mut [ScriptItem], sort: &Sort) {
        match sort {
            Sort::Name => {
                items.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
            }
            Sort::Namespace => {
                items.sort_by(|a, b| a.namespace.cmp(&b.namespace));
            }
            Sort::Author => {
                items.sort_by(|a, b| {
                    let a_author = a.author.as_deref().unwrap_or_default().to_lowercase();
                    let b_author = b.author.as_deref().unwrap_or_default().to_lowercase();
                    a_author.cmp(&b_author).then_with(|| a.name.cmp(&b.name))
                });
            }
            Sort::Released => {
                // ISO dates compare correctly as strings; undated records sink
                // to the bottom.
                items.sort_by(|a, b| match (&a.released, &b.released) {
                    (Some(a_date), Some(b_date)) => {
                        b_date.cmp(a_date).then_with(|| a.name.cmp(&b.name))
                    }
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => a.name.cmp(&b.name),
                });
            }
            Sort::Version => {
                let parsed = |item: &ScriptItem| -> Option<Version> {
                    item.version.as_deref().and_then(|v| v.parse().ok())
                };
                items.sort_by(|a, b| match (parsed(a), parsed(b)) {
                    (Some(a_version), Some(b_version)) => {
                        b_version.cmp(&a_version).then_with(|| a.name.cmp(&b.name))
                    }
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => a.name.cmp(&b.name),
                });
            }
        }
    }

    /// Key for the lint index built by the lint-all action.
    pub fn lint_key(feed_name: &str, kind: RecordKind, namespace: &str) -> String {
        format!("{feed_name}::{}.{namespace}", kind.key())
    }

    /// Back-fills diagnostics onto result rows after a lint run.
    pub fn apply_lint(results: &mut SearchResults, index: &HashMap<String, Vec<Diagnostic>>) {
        for item in &mut results.scripts {
            if let Some(diags) = index.get(&Self::lint_key(&item.feed_name, item.kind, &item.namespace)) {
                item.diagnostics = Some(diags.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::manifest::Feed;
    use crate::feed::SAMPLE_FEED;
    use pretty_assertions::assert_eq;
    use tokio::sync::mpsc;

    fn env() -> FeedEnv {
        let feed: Feed = SAMPLE_FEED.parse().unwrap();
        FeedEnv::with_feeds(vec![feed])
    }

    async fn run_search(options: SearchOptions) -> SearchResults {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();
        let mut manager = ScriptSearchManager::new(action_tx).unwrap();
        let feed_env = Arc::new(RwLock::new(env()));

        manager.search(options, feed_env).await.unwrap();

        match action_rx.recv().await {
            Some(Action::Search(SearchAction::Render(results))) => results,
            other => panic!("expected rendered results, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn an_empty_term_lists_everything() {
        let results = run_search(SearchOptions::default()).await;
        assert_eq!(results.total_count, 2);
        assert_eq!(results.current_page_count(), 2);
    }

    #[tokio::test]
    async fn scope_filters_by_kind() {
        let results = run_search(SearchOptions {
            scope: Scope::Modules,
            ..SearchOptions::default()
        })
        .await;
        assert_eq!(results.total_count, 1);
        assert_eq!(results.scripts[0].namespace, "arch.Util");
    }

    #[tokio::test]
    async fn terms_match_names_case_insensitively() {
        let results = run_search(SearchOptions {
            term: Some("CHAIN".into()),
            ..SearchOptions::default()
        })
        .await;
        assert_eq!(results.total_count, 1);
        assert_eq!(results.scripts[0].name, "AegisubChain");
    }

    #[tokio::test]
    async fn exact_namespace_matches_are_flagged() {
        let results = run_search(SearchOptions {
            term: Some("arch.util".into()),
            ..SearchOptions::default()
        })
        .await;
        assert_eq!(results.total_count, 1);
        assert!(results.scripts[0].exact_match);
    }

    #[tokio::test]
    async fn released_sort_puts_newest_first() {
        let results = run_search(SearchOptions {
            sort: Sort::Released,
            ..SearchOptions::default()
        })
        .await;
        let namespaces: Vec<&str> = results
            .scripts
            .iter()
            .map(|item| item.namespace.as_str())
            .collect();
        assert_eq!(namespaces, vec!["arch.AegisubChain", "arch.Util"]);
    }
}
