use ratatui::widgets::ListState;
use serde::Deserialize;

use crate::search::ScriptItem;

pub const PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchResults {
    pub scripts: Vec<ScriptItem>,
    pub total_count: usize,
    pub list_state: ListState,
    current_page: usize,
}

impl SearchResults {
    pub fn new(page: usize) -> Self {
        SearchResults {
            scripts: Vec::default(),
            total_count: 0,
            current_page: page,
            list_state: ListState::default(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.total_count.div_ceil(PAGE_SIZE)
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn current_page_count(&self) -> usize {
        self.scripts.len()
    }

    pub fn has_next_page(&self) -> bool {
        let so_far = self.current_page * PAGE_SIZE;
        so_far < self.total_count
    }

    pub fn has_prev_page(&self) -> bool {
        self.current_page > 1
    }

    pub fn selected_index(&self) -> Option<usize> {
        if let Some(index) = self.list_state.selected() {
            if index == usize::MAX {
                // Index can be usize::MAX to denote last item
                return Some(self.scripts.len().saturating_sub(1));
            }
            return Some(index);
        }
        None
    }

    pub fn selected(&self) -> Option<&ScriptItem> {
        self.selected_index().and_then(|ix| self.scripts.get(ix))
    }

    pub fn selected_mut(&mut self) -> Option<&mut ScriptItem> {
        let ix = self.selected_index()?;
        self.scripts.get_mut(ix)
    }

    pub fn select_index(&mut self, index: Option<usize>) -> Option<&ScriptItem> {
        self.list_state.select(index);
        self.selected()
    }

    pub fn select_next(&mut self) -> Option<&ScriptItem> {
        self.list_state.select_next();
        self.selected()
    }

    pub fn select_previous(&mut self) -> Option<&ScriptItem> {
        self.list_state.select_previous();
        self.selected()
    }

    pub fn select_first(&mut self) -> Option<&ScriptItem> {
        self.list_state.select_first();
        self.selected()
    }

    pub fn select_last(&mut self) -> Option<&ScriptItem> {
        self.list_state.select_last();
        self.selected()
    }
}
