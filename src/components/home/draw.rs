use chrono::{Local, NaiveDate};
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Style, Styled, Stylize},
    text::{Line, Text},
    widgets::{
        block::{Position, Title},
        Block, Borders, List, ListItem, Padding, Paragraph, Wrap,
    },
    Frame,
};

use crate::app::Mode;
use crate::components::home::focusable::Focusable;
use crate::components::home::Home;
use crate::components::ux::{Button, State, GRAY, ORANGE};
use crate::components::Component;
use crate::errors::AppResult;
use crate::feed::lint::Severity;
use crate::feed::manifest::RecordKind;
use crate::search::ScriptItem;
use crate::util::Util;

pub fn render(home: &mut Home, frame: &mut Frame, area: Rect) -> AppResult<()> {
    let [left_col_area, right_col_area] = Layout::horizontal([
        Constraint::Percentage(home.left_column_width_percent),
        Constraint::Percentage(100 - home.left_column_width_percent),
    ])
    .areas(area);

    render_left(home, frame, left_col_area)?;
    render_right(home, frame, right_col_area)?;
    Ok(())
}

fn render_left(home: &mut Home, frame: &mut Frame, area: Rect) -> AppResult<()> {
    let [search_area, results_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(5)]).areas(area);

    render_search(home, frame, search_area)?;
    render_results(home, frame, results_area)?;
    home.scope_dropdown.draw(&Mode::Home, frame, area)?;
    home.sort_dropdown.draw(&Mode::Home, frame, area)?;

    Ok(())
}

fn render_search(home: &mut Home, frame: &mut Frame, area: Rect) -> AppResult<()> {
    let spinner_width = if home.is_searching { 3 } else { 0 };

    let [search_area, spinner_area] =
        Layout::horizontal([Constraint::Min(1), Constraint::Length(spinner_width)]).areas(area);

    // The width of the input area, removing 2 for the width of the border on each side
    let scroll_width = search_area.width.saturating_sub(2);
    let input_scroll = home.input.visual_scroll(scroll_width as usize);
    let input = Paragraph::new(home.input.value())
        .scroll((0, input_scroll as u16))
        .block(
            Block::default()
                .title(" Search ")
                .borders(Borders::ALL)
                .border_style(match home.focused {
                    Focusable::Search => home.config.styles[&Mode::App]["accent_active"],
                    _ => Style::default(),
                }),
        );
    frame.render_widget(input, search_area);

    if home.focused == Focusable::Search {
        // Make the cursor visible and ask ratatui to put it at the specified coordinates after rendering
        frame.set_cursor_position((
            // Put cursor past the end of the input text
            search_area.x
                + (home.input.visual_cursor().max(input_scroll) - input_scroll) as u16
                + 1,
            // Move one line down, from the border to the input line
            search_area.y + 1,
        ))
    }

    if home.is_searching {
        let throbber_border = Block::default().padding(Padding::uniform(1));
        frame.render_widget(&throbber_border, spinner_area);

        let throbber = throbber_widgets_tui::Throbber::default()
            .style(home.config.styles[&Mode::App]["throbber"])
            .throbber_set(throbber_widgets_tui::BRAILLE_EIGHT)
            .use_type(throbber_widgets_tui::WhichUse::Spin);

        frame.render_stateful_widget(
            throbber,
            throbber_border.inner(spinner_area),
            &mut home.spinner_state,
        );
    }

    Ok(())
}

fn render_results(home: &mut Home, frame: &mut Frame, area: Rect) -> AppResult<()> {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(match home.focused {
            Focusable::Results => home.config.styles[&Mode::App]["accent_active"],
            _ => Style::default(),
        })
        .title(
            Title::from(
                format!(" ▼ {} ", home.scope_dropdown.get_selected()).set_style(
                    if home.focused == Focusable::Scope {
                        home.config.styles[&Mode::App]["title"]
                    } else {
                        Style::default()
                    },
                ),
            )
            .alignment(Alignment::Right),
        )
        .title(
            Title::from(
                format!(" ▼ {} ", home.sort_dropdown.get_selected()).set_style(
                    if home.focused == Focusable::Sort {
                        home.config.styles[&Mode::App]["title"]
                    } else {
                        Style::default()
                    },
                ),
            )
            .alignment(Alignment::Right),
        );

    if let Some(results) = home.search_results.as_mut() {
        let selected_index = results.selected_index();
        let correction = 2;

        let list_items: Vec<ListItem> = results
            .scripts
            .iter()
            .map(|item| {
                let tag = if item.error_count() > 0 {
                    "! "
                } else if item.warning_count() > 0 {
                    "~ "
                } else {
                    match item.kind {
                        RecordKind::Macro => "M ",
                        RecordKind::Module => "m ",
                    }
                };

                let name = item.name.to_string();
                let version = item.version.clone().unwrap_or_default();

                let mut white_space = area.width as i32
                    - name.len() as i32
                    - tag.len() as i32
                    - version.len() as i32
                    - correction;
                if white_space < 1 {
                    white_space = 1;
                }

                let details = format!("{}{}{}", name, " ".repeat(white_space as usize), version);

                let style = if item.error_count() > 0 {
                    Style::default().fg(Color::LightRed)
                } else if item.warning_count() > 0 {
                    Style::default().fg(Color::Yellow)
                } else if item.kind == RecordKind::Module {
                    Style::default().fg(Color::LightCyan)
                } else {
                    Style::default()
                };

                ListItem::new(Line::from(vec![tag.bold(), details.into()]).set_style(style))
            })
            .collect();

        let current_page = results.current_page();
        let items_in_prev_pages = if current_page < 1 {
            0
        } else {
            (current_page - 1) * crate::search::PAGE_SIZE
        };

        let selected_item_num = match selected_index {
            None => 0,
            Some(ix) => {
                if ix == usize::MAX {
                    results.current_page_count()
                } else if ix == usize::MIN {
                    1
                } else if ix > results.current_page_count().saturating_sub(1) {
                    // ListState select_next() increments selected even after last item is selected
                    ix
                } else {
                    ix + 1
                }
            }
        };

        let selected_item_num_in_total = items_in_prev_pages + selected_item_num;
        let selected = results.selected();

        let list = List::new(list_items)
            .block(
                block
                    .title(Title::from(format!(
                        " {}/{} ",
                        selected_item_num_in_total,
                        Util::format_number(results.total_count)
                    )))
                    .title(
                        Title::from(format!(
                            " Page {}/{} ",
                            results.current_page(),
                            results.page_count(),
                        ))
                        .position(Position::Bottom)
                        .alignment(Alignment::Right),
                    ),
            )
            // Selected row highlight style
            .highlight_style(if selected.is_some_and(|s| s.error_count() > 0) {
                Style::default().bold().bg(Color::LightRed).fg(Color::Black)
            } else if selected.is_some_and(|s| s.kind == RecordKind::Module) {
                Style::default()
                    .bold()
                    .bg(Color::LightCyan)
                    .fg(Color::Black)
            } else {
                Style::default()
                    .bold()
                    .bg(home.config.styles[&Mode::App]["accent"]
                        .fg
                        .unwrap_or(Color::Yellow))
                    .fg(Color::Black)
            });

        frame.render_stateful_widget(list, area, &mut results.list_state);
    } else {
        frame.render_widget(block, area);
    }

    Ok(())
}

fn render_right(home: &mut Home, frame: &mut Frame, area: Rect) -> AppResult<()> {
    if home.show_usage || home.search_results.is_none() {
        render_usage(home, frame, area)?;
        return Ok(());
    }

    let selected_script = {
        let search_results = home.search_results.as_ref().unwrap();
        search_results.selected().cloned()
    };

    if let Some(item) = selected_script {
        render_script_details(home, &item, frame, area)?;
    } else {
        render_no_results(home, frame, area)?;
    }

    Ok(())
}

fn render_usage(home: &mut Home, frame: &mut Frame, area: Rect) -> AppResult<()> {
    let header_style = Style::default().bold();
    let prop_style = home.config.styles[&Mode::App]["accent"].bold();
    let desc_style = Style::default();

    const PAD: usize = 20;

    let text = Text::from(vec![
        Line::from(vec![
            format!("{:<PAD$}", "SYMBOLS:").set_style(header_style),
            "M ".bold(),
            "macro".set_style(desc_style),
            "   ".into(),
            "m ".light_cyan().bold(),
            "module".set_style(desc_style),
            "   ".into(),
            "! ".light_red().bold(),
            "errors".set_style(desc_style),
            "   ".into(),
            "~ ".yellow().bold(),
            "warnings".set_style(desc_style),
        ]),
        Line::default(),
        Line::from(vec!["SEARCH".set_style(header_style)]),
        Line::from(vec![
            format!("{:<PAD$}", "Enter:").set_style(prop_style),
            "Run search".set_style(desc_style),
        ]),
        Line::from(vec![
            format!("{:<PAD$}", "Ctrl + s:").set_style(prop_style),
            "Sort".set_style(desc_style),
        ]),
        Line::from(vec![
            format!("{:<PAD$}", "Ctrl + a:").set_style(prop_style),
            "Search scope".set_style(desc_style),
        ]),
        Line::default(),
        Line::from(vec!["NAVIGATION".set_style(header_style)]),
        Line::from(vec![
            format!("{:<PAD$}", "TAB:").set_style(prop_style),
            "Switch between boxes".set_style(desc_style),
        ]),
        Line::from(vec![
            format!("{:<PAD$}", "ESC:").set_style(prop_style),
            "Go back to search; again to clear results".set_style(desc_style),
        ]),
        Line::from(vec![
            format!("{:<PAD$}", "Ctrl + Left/Right:").set_style(prop_style),
            "Change column width".set_style(desc_style),
        ]),
        Line::from(vec![
            format!("{:<PAD$}", "Ctrl + h:").set_style(prop_style),
            "Toggle this usage screen".set_style(desc_style),
        ]),
        Line::from(vec![
            format!("{:<PAD$}", "Ctrl + c:").set_style(prop_style),
            "Quit".set_style(desc_style),
        ]),
        Line::default(),
        Line::from(vec!["RESULTS".set_style(header_style)]),
        Line::from(vec![
            format!("{:<PAD$}", "v:").set_style(prop_style),
            "Validate selected record".set_style(desc_style),
        ]),
        Line::from(vec![
            format!("{:<PAD$}", "l:").set_style(prop_style),
            "Lint all loaded feeds".set_style(desc_style),
        ]),
        Line::from(vec![
            format!("{:<PAD$}", "o:").set_style(prop_style),
            "Open the record's web page".set_style(desc_style),
        ]),
        Line::from(vec![
            format!("{:<PAD$}", "Ctrl + r:").set_style(prop_style),
            "Reload feeds".set_style(desc_style),
        ]),
        Line::default(),
        Line::from(vec![
            format!("{:<PAD$}", "Up, Down:").set_style(prop_style),
            "Select record in list".set_style(desc_style),
        ]),
        Line::from(vec![
            format!("{:<PAD$}", "Left, Right:").set_style(prop_style),
            "Go previous/next page".set_style(desc_style),
        ]),
        Line::from(vec![
            format!("{:<PAD$}", "Home, End:").set_style(prop_style),
            "Go to first/last record in page".set_style(desc_style),
        ]),
        Line::from(vec![
            format!("{:<PAD$}", "Ctrl + Home/End:").set_style(prop_style),
            "Go to first/last page".set_style(desc_style),
        ]),
    ]);

    let block = Block::default()
        .title(" 📖 Usage ")
        .title_style(home.config.styles[&Mode::App]["title"])
        .padding(Padding::uniform(1))
        .borders(Borders::ALL)
        .border_style(match home.focused {
            Focusable::Usage => home.config.styles[&Mode::App]["accent_active"],
            _ => Style::default(),
        });

    frame.render_widget(&block, area);

    frame.render_widget(
        Paragraph::new(text)
            .wrap(Wrap { trim: false })
            .scroll((home.vertical_usage_scroll as u16, 0)),
        block.inner(area),
    );

    Ok(())
}

fn render_script_details(
    home: &Home,
    item: &ScriptItem,
    frame: &mut Frame,
    area: Rect,
) -> AppResult<()> {
    let details_focused =
        home.focused == Focusable::WebButton || home.focused == Focusable::FeedButton;

    let main_block = Block::default()
        .title(format!(" 🧐 {} ", item.name))
        .title_style(home.config.styles[&Mode::App]["title"])
        .padding(Padding::horizontal(1))
        .borders(Borders::ALL)
        .border_style(if details_focused {
            home.config.styles[&Mode::App]["accent_active"]
        } else {
            Style::default()
        });

    let left_column_width = 16;

    let prop_style = home.config.styles[&Mode::App][if details_focused {
        "accent_active"
    } else {
        "accent"
    }]
    .bold();

    let mut text = Text::default();

    text.lines.extend(vec![
        Line::from(vec![
            format!("{:<left_column_width$}", "Namespace:").set_style(prop_style),
            item.namespace.clone().into(),
        ]),
        Line::from(vec![
            format!("{:<left_column_width$}", "Kind:").set_style(prop_style),
            item.kind.to_string().into(),
        ]),
        Line::from(vec![
            format!("{:<left_column_width$}", "Feed:").set_style(prop_style),
            item.feed_name.clone().into(),
        ]),
        Line::from(vec![
            format!("{:<left_column_width$}", "Author:").set_style(prop_style),
            item.author.clone().unwrap_or_default().into(),
        ]),
        Line::from(vec![
            format!("{:<left_column_width$}", "Channel:").set_style(prop_style),
            item.channel.clone().unwrap_or_default().into(),
        ]),
        Line::from(vec![
            format!("{:<left_column_width$}", "Version:").set_style(prop_style),
            item.version.clone().unwrap_or_default().bold(),
        ]),
        Line::from(vec![
            format!("{:<left_column_width$}", "Released:").set_style(prop_style),
            released_line(item.released.as_deref()).into(),
        ]),
        Line::from(vec![
            format!("{:<left_column_width$}", "Description:").set_style(prop_style),
            item.description.clone().unwrap_or_default().into(),
        ]),
        Line::from(vec![
            format!("{:<left_column_width$}", "Web:").set_style(prop_style),
            item.url.clone().unwrap_or_default().into(),
        ]),
    ]);

    if !item.files.is_empty() {
        text.lines.push(Line::default());
        text.lines.push(Line::from("FILES".bold()));
        for file in &item.files {
            let sha1 = file.sha1.as_deref().unwrap_or("-");
            let short_sha1 = if sha1.len() >= 8 { &sha1[..8] } else { sha1 };
            text.lines.push(Line::from(vec![
                format!("{:<left_column_width$}", file.name).set_style(prop_style),
                format!("{short_sha1}  {}", file.url).into(),
            ]));
        }
    }

    if !item.required_modules.is_empty() {
        text.lines.push(Line::default());
        text.lines.push(Line::from("REQUIRES".bold()));
        for required in &item.required_modules {
            let version = required
                .version
                .as_deref()
                .map(|v| format!(" >= {v}"))
                .unwrap_or_default();
            let external = if required.feed.is_some() {
                " (external feed)"
            } else {
                ""
            };
            text.lines.push(Line::from(format!(
                "{}{}{}",
                required.module_name, version, external
            )));
        }
    }

    if !item.changelog.is_empty() {
        text.lines.push(Line::default());
        text.lines.push(Line::from("CHANGELOG".bold()));
        for (version, entries) in item.changelog.iter().take(3) {
            text.lines
                .push(Line::from(format!("{version}:").set_style(prop_style)));
            for entry in entries {
                text.lines.push(Line::from(format!("  - {entry}")));
            }
        }
    }

    text.lines.push(Line::default());
    match &item.diagnostics {
        None => {
            text.lines
                .push(Line::from("Press v to validate this record".dim()));
        }
        Some(diags) if diags.is_empty() => {
            text.lines.push(Line::from("✔ no problems found".green()));
        }
        Some(diags) => {
            text.lines.push(Line::from("DIAGNOSTICS".bold()));
            for diag in diags {
                let line = format!("{}: {}", diag.target, diag.message);
                text.lines.push(match diag.severity {
                    Severity::Error => Line::from(line.light_red()),
                    Severity::Warning => Line::from(line.yellow()),
                });
            }
        }
    }

    let details_paragraph = Paragraph::new(text).wrap(Wrap { trim: false });

    frame.render_widget(&main_block, area);

    let [details_area, _, buttons_area] = Layout::vertical([
        Constraint::Min(0),    // details
        Constraint::Length(1), // empty line
        Constraint::Length(1), // buttons row
    ])
    .areas(main_block.inner(area));

    frame.render_widget(details_paragraph, details_area);

    let [_, button1_area, _, button2_area] = Layout::horizontal([
        Constraint::Length(left_column_width as u16),
        Constraint::Length(12),
        Constraint::Length(1),
        Constraint::Length(12),
    ])
    .areas(buttons_area);

    if item.url.is_some() {
        frame.render_widget(
            Button::new("Web")
                .theme(ORANGE)
                .state(match home.focused == Focusable::WebButton {
                    true => State::Selected,
                    _ => State::Normal,
                }),
            button1_area,
        );
    }

    if item.feed_url.is_some() {
        frame.render_widget(
            Button::new("Feed")
                .theme(GRAY)
                .state(match home.focused == Focusable::FeedButton {
                    true => State::Selected,
                    _ => State::Normal,
                }),
            button2_area,
        );
    }

    Ok(())
}

fn released_line(released: Option<&str>) -> String {
    let Some(released) = released else {
        return String::new();
    };

    match NaiveDate::parse_from_str(released, "%Y-%m-%d") {
        Err(_) => released.to_string(),
        Ok(date) => {
            let today = Local::now().date_naive();
            format!("{released} ({})", Util::relative_date(date, today))
        }
    }
}

fn render_no_results(home: &mut Home, frame: &mut Frame, area: Rect) -> AppResult<()> {
    let main_block = Block::default()
        .title(" No results ")
        .title_style(home.config.styles[&Mode::App]["title"])
        .padding(Padding::uniform(1))
        .borders(Borders::ALL);

    let text = Text::raw("0 scripts found");
    let centered = center(
        main_block.inner(area),
        Constraint::Length(text.width() as u16),
        Constraint::Length(1),
    )?;

    frame.render_widget(main_block, area);
    frame.render_widget(text, centered);

    Ok(())
}

fn center(area: Rect, horizontal: Constraint, vertical: Constraint) -> AppResult<Rect> {
    let [area] = Layout::horizontal([horizontal])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::vertical([vertical]).flex(Flex::Center).areas(area);
    Ok(area)
}
