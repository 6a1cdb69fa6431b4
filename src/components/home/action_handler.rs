use reqwest::Url;
use std::collections::HashMap;
use std::sync::Arc;

use crate::action::{Action, FeedAction, SearchAction};
use crate::components::home::focusable::Focusable;
use crate::components::home::Home;
use crate::components::status_bar::{StatusDuration, StatusLevel};
use crate::errors::AppResult;
use crate::feed::lint::{self, Diagnostic};
use crate::feed::manifest::RecordKind;
use crate::feed::template;
use crate::search::{ScriptSearchManager, SearchOptions, PAGE_SIZE};

pub async fn handle_action(home: &mut Home, action: Action) -> AppResult<Option<Action>> {
    match action {
        Action::Tick => {
            if home.is_searching {
                home.spinner_state.calc_next();
            }
        }
        Action::Focus(focusable) => {
            home.sort_dropdown
                .set_is_focused(focusable == Focusable::Sort);
            home.scope_dropdown
                .set_is_focused(focusable == Focusable::Scope);
            home.focused = focusable;
        }
        Action::FocusNext => {
            let has_search_results = home.search_results.is_some();
            let show_usage = home.show_usage;

            if !has_search_results || show_usage {
                return if home.focused == Focusable::Usage {
                    Ok(Some(Action::Focus(Focusable::Search)))
                } else {
                    Ok(Some(Action::Focus(Focusable::Usage)))
                };
            }

            let mut next = home.focused.next();
            while next == Focusable::Usage || next == Focusable::Sort || next == Focusable::Scope {
                next = next.next();
            }

            return Ok(Some(Action::Focus(next)));
        }
        Action::FocusPrevious => {
            let has_search_results = home.search_results.is_some();
            let show_usage = home.show_usage;

            if !has_search_results || show_usage {
                return if home.focused == Focusable::Usage {
                    Ok(Some(Action::Focus(Focusable::Search)))
                } else {
                    Ok(Some(Action::Focus(Focusable::Usage)))
                };
            }

            let mut prev = home.focused.prev();
            while prev == Focusable::Usage || prev == Focusable::Sort || prev == Focusable::Scope {
                prev = prev.prev();
            }

            return Ok(Some(Action::Focus(prev)));
        }
        Action::ToggleUsage => {
            let was_showing = home.show_usage;
            home.show_usage = !home.show_usage;
            home.vertical_usage_scroll = 0;
            return if was_showing {
                Ok(Some(Action::Focus(Focusable::Search)))
            } else {
                Ok(Some(Action::Focus(Focusable::Usage)))
            };
        }
        Action::Search(action) => match action {
            SearchAction::Clear => home.reset()?,
            SearchAction::Search { term, page, status } => {
                let scope = home.scope_dropdown.get_selected();
                let sort = home.sort_dropdown.get_selected();

                let status = status.unwrap_or("Searching".into());
                home.action_tx
                    .send(Action::UpdateStatus(StatusLevel::Progress, status))?;

                home.is_searching = true;
                home.search_manager.search(
                    SearchOptions {
                        term: Some(term),
                        scope,
                        sort,
                        page: Some(page),
                        per_page: Some(PAGE_SIZE),
                    },
                    Arc::clone(&home.feed_env),
                );

                return Ok(None);
            }
            SearchAction::Error(err) => {
                home.is_searching = false;
                home.action_tx
                    .send(Action::UpdateStatus(StatusLevel::Error, err))
                    .ok();
            }
            SearchAction::SortBy(sort) => {
                home.action_tx.send(Action::Focus(Focusable::Search))?;

                if home.search_results.is_none() {
                    return Ok(None);
                }

                let status = format!("Sorting by: {}", sort);
                return Ok(Some(Action::Search(SearchAction::Search {
                    term: home.input.value().into(),
                    page: 1,
                    status: Some(status),
                })));
            }
            SearchAction::Scope(scope) => {
                home.action_tx.send(Action::Focus(Focusable::Search))?;

                if home.search_results.is_none() {
                    return Ok(None);
                }

                let status = format!("Scoped to: {}", scope);
                return Ok(Some(Action::Search(SearchAction::Search {
                    term: home.input.value().into(),
                    page: 1,
                    status: Some(status),
                })));
            }
            SearchAction::Render(mut results) => {
                home.is_searching = false;

                let results_len = results.current_page_count();

                let exact_match_ix = results.scripts.iter().position(|item| item.exact_match);
                if exact_match_ix.is_some() {
                    results.select_index(exact_match_ix);
                    home.action_tx.send(Action::Focus(Focusable::Results))?;
                } else if results_len > 0 {
                    results.select_index(Some(0));
                }

                if let Some(index) = &home.lint_index {
                    ScriptSearchManager::apply_lint(&mut results, index);
                }

                home.search_results = Some(results);
                home.show_usage = false;

                home.action_tx.send(Action::UpdateStatusWithDuration(
                    StatusLevel::Success,
                    StatusDuration::Short,
                    if results_len > 0 {
                        format!("Loaded {results_len} results")
                    } else {
                        "No results".to_string()
                    },
                ))?;
            }
            SearchAction::NavPagesForward(pages) => {
                home.go_pages_forward(pages, home.input.value().to_string())?;
            }
            SearchAction::NavPagesBack(pages) => {
                home.go_pages_back(pages, home.input.value().to_string())?;
            }
            SearchAction::NavFirstPage => {
                home.go_to_page(1, home.input.value().to_string())?;
            }
            SearchAction::NavLastPage => {
                home.go_to_page(usize::MAX, home.input.value().to_string())?;
            }
            _ => {
                if let Some(results) = home.search_results.as_mut() {
                    match action {
                        SearchAction::SelectIndex(index) => {
                            results.select_index(index);
                        }
                        SearchAction::SelectNext => {
                            results.select_next();
                        }
                        SearchAction::SelectPrev => {
                            results.select_previous();
                        }
                        SearchAction::SelectFirst => {
                            results.select_first();
                        }
                        SearchAction::SelectLast => {
                            results.select_last();
                        }
                        _ => {}
                    }
                }
            }
        },
        Action::Feed(action) => match action {
            FeedAction::Refreshed => {
                // Anything linted before the reload refers to stale manifests.
                home.lint_index = None;
                return Ok(Some(Action::Search(SearchAction::Search {
                    term: home.input.value().into(),
                    page: 1,
                    status: None,
                })));
            }
            FeedAction::ValidateSelected => {
                let diags = validate_selected(home).await;
                if let Some(diags) = diags {
                    let errors = lint::error_count(&diags);
                    let warnings = lint::warning_count(&diags);

                    if let Some(results) = home.search_results.as_mut() {
                        if let Some(item) = results.selected_mut() {
                            item.diagnostics = Some(diags);
                        }
                    }

                    home.action_tx.send(Action::UpdateStatus(
                        if errors > 0 {
                            StatusLevel::Error
                        } else {
                            StatusLevel::Success
                        },
                        format!("{errors} errors, {warnings} warnings"),
                    ))?;
                }
            }
            FeedAction::LintAll => {
                let (index, errors, warnings) = lint_all(home).await;

                if let Some(results) = home.search_results.as_mut() {
                    ScriptSearchManager::apply_lint(results, &index);
                }
                home.lint_index = Some(index);

                home.action_tx.send(Action::UpdateStatus(
                    if errors > 0 {
                        StatusLevel::Error
                    } else {
                        StatusLevel::Success
                    },
                    format!("Lint: {errors} errors, {warnings} warnings"),
                ))?;
            }
            _ => {}
        },
        Action::OpenWeb => {
            if let Some(url) = home
                .search_results
                .as_ref()
                .and_then(|results| results.selected())
                .and_then(|item| item.url.as_ref())
                .and_then(|url| Url::parse(url).ok())
            {
                open::that(url.to_string())?;
            }
        }
        Action::OpenFeed => {
            if let Some(url) = home
                .search_results
                .as_ref()
                .and_then(|results| results.selected())
                .and_then(|item| item.feed_url.as_ref())
                .and_then(|url| Url::parse(url).ok())
            {
                open::that(url.to_string())?;
            }
        }
        _ => {}
    }
    Ok(None)
}

async fn validate_selected(home: &Home) -> Option<Vec<Diagnostic>> {
    let item = home
        .search_results
        .as_ref()
        .and_then(|results| results.selected())?;

    let env = home.feed_env.read().await;
    let mut diags = Vec::new();

    for loaded in &env.feeds {
        let feed = &loaded.manifest;
        if feed.name != item.feed_name {
            continue;
        }
        let record = match item.kind {
            RecordKind::Macro => feed.macros.get(&item.namespace),
            RecordKind::Module => feed.modules.get(&item.namespace),
        };
        if let Some(record) = record {
            let scope = template::feed_scope(feed);
            lint::lint_record(
                feed,
                &scope,
                item.kind,
                &item.namespace,
                record,
                Some(&*env),
                &mut diags,
            );
        }
        break;
    }

    Some(diags)
}

async fn lint_all(home: &Home) -> (HashMap<String, Vec<Diagnostic>>, usize, usize) {
    let env = home.feed_env.read().await;
    let mut index = HashMap::new();
    let mut errors = 0;
    let mut warnings = 0;

    for loaded in &env.feeds {
        let feed = &loaded.manifest;

        let all = lint::lint_feed(feed, Some(&*env));
        errors += lint::error_count(&all);
        warnings += lint::warning_count(&all);

        let scope = template::feed_scope(feed);
        for (kind, namespace, record) in feed.records() {
            let mut diags = Vec::new();
            lint::lint_record(feed, &scope, kind, namespace, record, Some(&*env), &mut diags);
            index.insert(
                ScriptSearchManager::lint_key(&feed.name, kind, namespace),
                diags,
            );
        }
    }

    (index, errors, warnings)
}
