mod action_handler;
mod draw;
mod focusable;
mod key_handler;

use super::Component;

use async_trait::async_trait;
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::RwLock;
use tui_input::Input;

use crate::action::{Action, SearchAction};
use crate::app::Mode;
use crate::components::home::action_handler::handle_action;
use crate::components::home::draw::render;
use crate::components::home::key_handler::handle_key;
use crate::components::status_bar::StatusLevel;
use crate::components::ux::Dropdown;
use crate::config::Config;
use crate::errors::AppResult;
use crate::feed::lint::Diagnostic;
use crate::feed::FeedEnv;
use crate::search::{Scope, ScriptSearchManager, SearchResults, Sort};
use crate::tui::Tui;
pub use focusable::Focusable;

pub struct Home {
    feed_env: Arc<RwLock<FeedEnv>>,
    input: Input,
    scope_dropdown: Dropdown<Scope>,
    sort_dropdown: Dropdown<Sort>,
    show_usage: bool,
    focused: Focusable,
    search_manager: ScriptSearchManager,
    is_searching: bool,
    search_results: Option<SearchResults>,
    /// Per-record diagnostics from the last lint-all run, applied to result
    /// rows as they are rendered.
    lint_index: Option<HashMap<String, Vec<Diagnostic>>>,
    spinner_state: throbber_widgets_tui::ThrobberState,
    action_tx: UnboundedSender<Action>,
    config: Config,
    pub left_column_width_percent: u16,
    pub vertical_usage_scroll: usize,
}

impl Home {
    pub fn new(
        initial_search_term: Option<String>,
        feed_env: Arc<RwLock<FeedEnv>>,
        action_tx: UnboundedSender<Action>,
    ) -> AppResult<Self> {
        let tx = action_tx.clone();
        let tx2 = action_tx.clone();

        Ok(Self {
            feed_env,
            input: Input::new(initial_search_term.unwrap_or_default()),
            scope_dropdown: Dropdown::new(
                "Search in".into(),
                0,
                Box::new(move |selected: &Scope| {
                    tx.send(Action::Search(SearchAction::Scope(selected.clone())))
                        .ok();
                }),
            ),
            sort_dropdown: Dropdown::new(
                "Sort by".into(),
                0,
                Box::new(move |selected: &Sort| {
                    tx2.send(Action::Search(SearchAction::SortBy(selected.clone())))
                        .ok();
                }),
            ),
            show_usage: true,
            focused: Focusable::default(),
            search_results: None,
            lint_index: None,
            search_manager: ScriptSearchManager::new(action_tx.clone())?,
            is_searching: false,
            spinner_state: throbber_widgets_tui::ThrobberState::default(),
            action_tx,
            config: Config::default(),
            left_column_width_percent: 50,
            vertical_usage_scroll: 0,
        })
    }

    fn reset(&mut self) -> AppResult<()> {
        self.input.reset();
        self.search_results = None;
        self.action_tx
            .send(Action::UpdateStatus(StatusLevel::Info, "ready".into()))?;
        Ok(())
    }

    pub fn go_to_page(&self, page: usize, query: String) -> AppResult<()> {
        if let Some(results) = &self.search_results {
            let requested_page = if page >= results.page_count() {
                results.page_count()
            } else {
                page
            };

            if requested_page == results.current_page() {
                return Ok(());
            }

            self.action_tx.send(Action::Search(SearchAction::Search {
                term: query,
                page: requested_page,
                status: Some(format!("Loading page {}", requested_page)),
            }))?;
        }

        Ok(())
    }

    pub fn go_pages_back(&self, pages: usize, query: String) -> AppResult<()> {
        if let Some(results) = &self.search_results {
            let requested_page = if pages >= results.current_page() {
                1
            } else {
                results.current_page() - pages
            };

            if requested_page == results.current_page() {
                return Ok(());
            }

            self.action_tx.send(Action::Search(SearchAction::Search {
                term: query,
                page: requested_page,
                status: Some(format!("Loading page {}", requested_page)),
            }))?;
        }

        Ok(())
    }

    pub fn go_pages_forward(&self, pages: usize, query: String) -> AppResult<()> {
        if let Some(results) = &self.search_results {
            let mut requested_page = results.current_page() + pages;

            if requested_page > results.page_count() {
                requested_page = results.page_count();
            }

            if requested_page == results.current_page() {
                return Ok(());
            }

            self.action_tx.send(Action::Search(SearchAction::Search {
                term: query,
                page: requested_page,
                status: Some(format!("Loading page {}", requested_page)),
            }))?;
        }

        Ok(())
    }
}

#[async_trait]
impl Component for Home {
    fn register_config_handler(&mut self, config: Config) -> AppResult<()> {
        self.sort_dropdown.register_config_handler(config.clone())?;
        self.scope_dropdown.register_config_handler(config.clone())?;
        self.config = config;
        Ok(())
    }

    fn init(&mut self, tui: &mut Tui) -> AppResult<()> {
        let _ = tui; // to appease clippy
        self.action_tx.send(Action::Search(SearchAction::Search {
            term: self.input.value().to_string(),
            page: 1,
            status: Some("Loading feeds".into()),
        }))?;
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> AppResult<Option<Action>> {
        handle_key(self, key)
    }

    async fn update(&mut self, action: Action) -> AppResult<Option<Action>> {
        handle_action(self, action).await
    }

    fn draw(&mut self, mode: &Mode, frame: &mut Frame, area: Rect) -> AppResult<()> {
        if *mode != Mode::Home {
            return Ok(());
        }
        render(self, frame, area)
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{Action, FeedAction};
    use crate::feed::manifest::Feed;
    use crate::feed::SAMPLE_FEED;
    use pretty_assertions::assert_eq;
    use tokio::sync::mpsc;

    // The receiver must stay alive for the duration of a test: handlers send
    // follow-up actions and a closed channel would turn into an error.
    fn get_home() -> (Home, mpsc::UnboundedReceiver<Action>) {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let feed: Feed = SAMPLE_FEED.parse().unwrap();
        let home = Home::new(
            None,
            Arc::new(RwLock::new(FeedEnv::with_feeds(vec![feed]))),
            action_tx,
        )
        .unwrap();
        (home, action_rx)
    }

    async fn execute_update(action: Action) -> (Home, mpsc::UnboundedReceiver<Action>) {
        let (mut home, action_rx) = get_home();

        execute_update_with_home(&mut home, action).await;
        (home, action_rx)
    }

    async fn execute_update_with_home(home: &mut Home, action: Action) {
        let mut ac: Option<Action> = Some(action);

        while ac.is_some() {
            match home.update(ac.clone().unwrap()).await {
                Ok(action) => {
                    ac = action;
                }
                Err(err) => {
                    panic!("{}", err)
                }
            }
        }
    }

    fn sample_results() -> SearchResults {
        let mut results = SearchResults::new(1);
        let feed: Feed = SAMPLE_FEED.parse().unwrap();
        for (kind, namespace, record) in feed.records() {
            results.scripts.push(crate::search::ScriptItem::from_record(
                &feed, kind, namespace, record,
            ));
        }
        results.total_count = results.scripts.len();
        results
    }

    #[tokio::test]
    async fn test_usage_shown_at_start() {
        let (home, _rx) = get_home();
        assert_eq!(home.show_usage, true);
    }

    #[tokio::test]
    async fn test_toggle_usage() {
        let (mut home, _rx) = execute_update(Action::ToggleUsage).await;

        assert_eq!(home.show_usage, false);

        execute_update_with_home(&mut home, Action::ToggleUsage).await;

        assert_eq!(home.show_usage, true);
    }

    #[tokio::test]
    async fn test_default_focus_is_search() {
        let (home, _rx) = get_home();
        assert_eq!(home.focused, Focusable::Search);
    }

    #[tokio::test]
    async fn test_focus_action() {
        let (home, _rx) = execute_update(Action::Focus(Focusable::Results)).await;
        assert_eq!(home.focused, Focusable::Results);
    }

    #[tokio::test]
    async fn test_rendered_results_select_the_first_row() {
        let (mut home, _rx) = get_home();

        execute_update_with_home(&mut home, Action::Search(SearchAction::Render(sample_results())))
            .await;

        assert_eq!(home.show_usage, false);
        let rendered = home.search_results.as_ref().unwrap();
        assert_eq!(rendered.selected_index(), Some(0));
    }

    #[tokio::test]
    async fn test_validate_selected_attaches_diagnostics() {
        let (mut home, _rx) = get_home();

        let mut results = sample_results();
        results.select_index(Some(0));
        home.search_results = Some(results);

        execute_update_with_home(&mut home, Action::Feed(FeedAction::ValidateSelected)).await;

        let selected = home.search_results.as_ref().unwrap().selected().unwrap();
        assert!(selected.is_validated());
        // The sample feed is clean.
        assert_eq!(selected.error_count(), 0);
    }

    #[tokio::test]
    async fn test_refresh_invalidates_the_lint_index() {
        let (mut home, mut rx) = get_home();
        home.lint_index = Some(std::collections::HashMap::new());

        execute_update_with_home(&mut home, Action::Feed(FeedAction::Refreshed)).await;

        assert_eq!(home.lint_index, None);
        // The handler chains into a fresh search for the current input.
        let mut saw_progress = false;
        while let Ok(action) = rx.try_recv() {
            if matches!(action, Action::UpdateStatus(..)) {
                saw_progress = true;
            }
        }
        assert!(saw_progress);
    }
}
