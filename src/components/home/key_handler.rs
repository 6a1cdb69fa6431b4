use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tui_input::backend::crossterm::EventHandler;

use crate::action::{Action, FeedAction, SearchAction};
use crate::components::home::focusable::is_results_or_details_focused;
use crate::components::home::{Focusable, Home};
use crate::components::Component;
use crate::errors::AppResult;
use crate::search::ScriptItem;

pub fn handle_key(home: &mut Home, key: KeyEvent) -> AppResult<Option<Action>> {
    if let Some(action) = handle_global_shortcuts(home, key)? {
        return Ok(Some(action));
    }

    match home.focused {
        Focusable::Search => handle_search_focus(home, key),
        Focusable::Results => handle_results_focus(home, key),
        Focusable::Sort => handle_sort_focus(home, key),
        Focusable::Scope => handle_scope_focus(home, key),
        _ => Ok(None),
    }
}

fn handle_global_shortcuts(home: &mut Home, key: KeyEvent) -> AppResult<Option<Action>> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('h') if ctrl && home.search_results.is_some() => {
            return Ok(Some(Action::ToggleUsage));
        }
        KeyCode::Char('r') if ctrl => {
            return Ok(Some(Action::Feed(FeedAction::Refresh)));
        }
        KeyCode::Esc => {
            return if home.focused == Focusable::Search {
                Ok(Some(Action::Search(SearchAction::Clear)))
            } else {
                Ok(Some(Action::Focus(Focusable::Search)))
            };
        }
        KeyCode::Char('s') if ctrl => {
            return Ok(Some(Action::Focus(if home.focused == Focusable::Sort {
                Focusable::Search
            } else {
                Focusable::Sort
            })));
        }
        KeyCode::Char('a') if ctrl => {
            return Ok(Some(Action::Focus(if home.focused == Focusable::Scope {
                Focusable::Search
            } else {
                Focusable::Scope
            })));
        }
        KeyCode::Char('/') if home.focused != Focusable::Search => {
            return Ok(Some(Action::Focus(Focusable::Search)));
        }
        KeyCode::BackTab => {
            return Ok(Some(Action::FocusPrevious));
        }
        KeyCode::Tab => {
            return Ok(Some(Action::FocusNext));
        }
        KeyCode::Enter => match home.focused {
            Focusable::Search => {
                return Ok(Some(Action::Search(SearchAction::Search {
                    term: home.input.value().to_string(),
                    page: 1,
                    status: None,
                })));
            }
            Focusable::WebButton => {
                return Ok(Some(Action::OpenWeb));
            }
            Focusable::FeedButton => {
                return Ok(Some(Action::OpenFeed));
            }
            _ => {}
        },
        KeyCode::Up => {
            if home.focused == Focusable::Usage && home.vertical_usage_scroll > 0 {
                home.vertical_usage_scroll -= 1;
            }
        }
        KeyCode::Down => {
            if home.focused == Focusable::Usage && home.vertical_usage_scroll < 24 {
                home.vertical_usage_scroll += 1;
            }
        }
        KeyCode::Left => {
            if ctrl && home.left_column_width_percent >= 10 {
                home.left_column_width_percent -= 10;
                return Ok(None);
            }
            if home.focused == Focusable::FeedButton {
                return Ok(Some(Action::Focus(Focusable::WebButton)));
            }
        }
        KeyCode::Right => {
            if ctrl && home.left_column_width_percent <= 90 {
                home.left_column_width_percent += 10;
                return Ok(None);
            }
            if home.focused == Focusable::WebButton {
                return Ok(Some(Action::Focus(Focusable::FeedButton)));
            }
        }
        KeyCode::Char('v') => {
            if get_focused_script(home).is_some() {
                return Ok(Some(Action::Feed(FeedAction::ValidateSelected)));
            }
        }
        KeyCode::Char('l') => {
            if is_results_or_details_focused(&home.focused) && home.search_results.is_some() {
                return Ok(Some(Action::Feed(FeedAction::LintAll)));
            }
        }
        KeyCode::Char('o') => {
            if get_focused_script(home).is_some() {
                return Ok(Some(Action::OpenWeb));
            }
        }
        _ => {}
    }

    Ok(None)
}

fn handle_search_focus(home: &mut Home, key: KeyEvent) -> AppResult<Option<Action>> {
    match key.code {
        KeyCode::Down => {
            if home.search_results.is_some() {
                return Ok(Some(Action::Focus(Focusable::Results)));
            }
        }
        _ => {
            // Send to input box
            home.input.handle_event(&crossterm::event::Event::Key(key));
        }
    }
    Ok(None)
}

fn handle_results_focus(home: &mut Home, key: KeyEvent) -> AppResult<Option<Action>> {
    if let Some(results) = &home.search_results {
        if results.scripts.is_empty() {
            return Ok(None);
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            // List navigation
            KeyCode::Up => {
                if results.selected_index() == Some(0) {
                    return Ok(Some(Action::Focus(Focusable::Search)));
                }

                return Ok(Some(Action::Search(SearchAction::SelectPrev)));
            }
            KeyCode::Down => {
                return Ok(Some(Action::Search(SearchAction::SelectNext)));
            }
            KeyCode::Home if !ctrl => {
                return Ok(Some(Action::Search(SearchAction::SelectFirst)));
            }
            KeyCode::End if !ctrl => {
                return Ok(Some(Action::Search(SearchAction::SelectLast)));
            }
            // Page navigation
            KeyCode::Right if results.has_next_page() => {
                return Ok(Some(Action::Search(SearchAction::NavPagesForward(1))));
            }
            KeyCode::Left if results.has_prev_page() => {
                return Ok(Some(Action::Search(SearchAction::NavPagesBack(1))));
            }
            KeyCode::Home if ctrl => {
                return Ok(Some(Action::Search(SearchAction::NavFirstPage)));
            }
            KeyCode::End if ctrl => {
                return Ok(Some(Action::Search(SearchAction::NavLastPage)));
            }
            _ => {}
        }
    }

    Ok(None)
}

fn handle_sort_focus(home: &mut Home, key: KeyEvent) -> AppResult<Option<Action>> {
    home.sort_dropdown.handle_key_event(key)
}

fn handle_scope_focus(home: &mut Home, key: KeyEvent) -> AppResult<Option<Action>> {
    home.scope_dropdown.handle_key_event(key)
}

fn get_focused_script(home: &Home) -> Option<&ScriptItem> {
    if !is_results_or_details_focused(&home.focused) {
        return None;
    }
    home.search_results
        .as_ref()
        .and_then(|results| results.selected())
}
