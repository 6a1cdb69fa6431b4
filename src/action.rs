use serde::Deserialize;
use strum::Display;

use crate::components::home::Focusable;
use crate::components::status_bar::{StatusDuration, StatusLevel};
use crate::search::{Scope, SearchResults, Sort};

#[derive(Debug, Clone, PartialEq, Eq, Display, Deserialize)]
pub enum Action {
    Tick,
    Render,
    Resize(u16, u16),
    Suspend,
    Resume,
    Quit,
    ClearScreen,
    Error(String),

    ToggleUsage,
    Focus(Focusable),
    FocusNext,
    FocusPrevious,

    UpdateStatus(StatusLevel, String),
    UpdateStatusWithDuration(StatusLevel, StatusDuration, String),

    Search(SearchAction),
    Feed(FeedAction),

    OpenWeb,
    OpenFeed,
}

#[derive(Debug, Clone, PartialEq, Eq, Display, Deserialize)]
pub enum SearchAction {
    Clear,
    Search {
        term: String,
        page: usize,
        status: Option<String>,
    },
    SortBy(Sort),
    Scope(Scope),
    Error(String),
    Render(SearchResults),

    NavPagesForward(usize),
    NavPagesBack(usize),
    NavFirstPage,
    NavLastPage,
    SelectIndex(Option<usize>),
    SelectNext,
    SelectPrev,
    SelectFirst,
    SelectLast,
}

#[derive(Debug, Clone, PartialEq, Eq, Display, Deserialize)]
pub enum FeedAction {
    Refresh,
    Refreshed,
    ValidateSelected,
    LintAll,
}
