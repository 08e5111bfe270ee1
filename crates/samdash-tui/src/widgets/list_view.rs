//! Filtered, sorted, paged table with row checkboxes.
//!
//! Every list screen (users, devices, locations, emails, logs, permissions)
//! renders through a `ListView`. The view owns the list parameters and the
//! checked-row selection; the screen supplies columns and cells.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState},
};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tui_input::Input;

use samdash_core::{ListPage, ListQuery, Listable, Selection, SortKey};

use crate::theme;

pub struct ListView<T: Listable> {
    records: Arc<Vec<Arc<T>>>,
    query: ListQuery,
    page: ListPage<T>,
    cursor: usize,
    selection: Selection,
    /// `Some` while the filter prompt is open.
    filter: Option<Input>,
    loading: bool,
    throbber: ThrobberState,
}

impl<T: Listable> ListView<T> {
    pub fn new(page_size: usize) -> Self {
        let query = ListQuery {
            page_size,
            ..ListQuery::default()
        };
        let page = query.apply(&[]);
        Self {
            records: Arc::new(Vec::new()),
            query,
            page,
            cursor: 0,
            selection: Selection::new(),
            filter: None,
            loading: false,
            throbber: ThrobberState::default(),
        }
    }

    /// Replace the snapshot. Checked rows that disappeared are dropped.
    pub fn set_records(&mut self, records: Arc<Vec<Arc<T>>>) {
        let ids: Vec<i64> = records.iter().map(|r| r.id()).collect();
        self.selection.retain_existing(&ids);
        self.records = records;
        self.rebuild();
    }

    pub fn records(&self) -> &Arc<Vec<Arc<T>>> {
        &self.records
    }

    /// Record under the cursor.
    pub fn current(&self) -> Option<&Arc<T>> {
        self.page.items.get(self.cursor)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Checked records, in the order they were checked.
    pub fn selected_records(&self) -> Vec<Arc<T>> {
        self.selection
            .ids()
            .iter()
            .filter_map(|id| self.records.iter().find(|r| r.id() == *id).cloned())
            .collect()
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn tick(&mut self) {
        if self.loading {
            self.throbber.calc_next();
        }
    }

    pub fn is_filtering(&self) -> bool {
        self.filter.is_some()
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    fn rebuild(&mut self) {
        self.page = self.query.apply(&self.records);
        // The current page can vanish when the filter narrows or rows are deleted.
        if self.page.items.is_empty() && self.query.page > 1 {
            self.query.page = self.page.total_pages.max(1);
            self.page = self.query.apply(&self.records);
        }
        self.cursor = self.cursor.min(self.page.items.len().saturating_sub(1));
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = self.page.items.len();
        if len == 0 {
            return;
        }
        self.cursor = self.cursor.saturating_add_signed(delta).min(len - 1);
    }

    fn cycle_sort(&mut self) {
        self.query.sort = match self.query.sort {
            None | Some(SortKey::Id) => Some(SortKey::Name),
            Some(SortKey::Name) => Some(SortKey::Id),
        };
        self.query.page = 1;
        self.rebuild();
    }

    /// Handle list navigation keys. Returns `false` if the key was not used.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if let Some(input) = self.filter.as_mut() {
            match key.code {
                KeyCode::Enter => self.filter = None,
                KeyCode::Esc => {
                    self.filter = None;
                    self.query.set_filter("");
                    self.rebuild();
                }
                _ => {
                    if super::input::edit(input, key) {
                        let text = input.value().to_owned();
                        self.query.set_filter(text);
                        self.cursor = 0;
                        self.rebuild();
                    }
                }
            }
            return true;
        }

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.move_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_cursor(-1),
            KeyCode::Char('g') | KeyCode::Home => self.cursor = 0,
            KeyCode::Char('G') | KeyCode::End => {
                self.cursor = self.page.items.len().saturating_sub(1);
            }
            KeyCode::Char(']') | KeyCode::PageDown | KeyCode::Right => {
                self.query.next_page(self.page.matched);
                self.cursor = 0;
                self.rebuild();
            }
            KeyCode::Char('[') | KeyCode::PageUp | KeyCode::Left => {
                self.query.prev_page();
                self.cursor = 0;
                self.rebuild();
            }
            KeyCode::Char('/') => {
                self.filter = Some(Input::new(self.query.filter.clone()));
            }
            KeyCode::Char('s') => self.cycle_sort(),
            KeyCode::Char('r') => {
                self.query.direction = self.query.direction.reversed();
                self.rebuild();
            }
            KeyCode::Char(' ') => {
                if let Some(id) = self.current().map(|r| r.id()) {
                    self.selection.toggle(id);
                    self.move_cursor(1);
                }
            }
            _ => return false,
        }
        true
    }

    fn status_line(&self) -> Line<'static> {
        let mut spans = vec![Span::styled(
            format!(
                " page {}/{} · {} matching",
                self.page.page, self.page.total_pages, self.page.matched
            ),
            theme::key_hint(),
        )];
        if let Some(key) = self.query.sort {
            spans.push(Span::styled(
                format!(" · sort {key} {}", self.query.direction),
                theme::key_hint(),
            ));
        }
        if !self.query.filter.is_empty() && self.filter.is_none() {
            spans.push(Span::styled(
                format!(" · filter \"{}\"", self.query.filter),
                theme::key_hint(),
            ));
        }
        if !self.selection.is_empty() {
            spans.push(Span::styled(
                format!(" · {} selected ", self.selection.len()),
                Style::default().fg(theme::AMBER),
            ));
        }
        Line::from(spans)
    }

    /// Draw the table. `columns` pairs each header with its width; `row`
    /// builds the matching cells after the checkbox column.
    pub fn render<'a, F>(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        focused: bool,
        columns: &[(&'static str, Constraint)],
        row: F,
    ) where
        F: Fn(&T) -> Vec<Cell<'a>>,
    {
        let block = Block::default()
            .title(format!(" {title} ({}) ", self.records.len()))
            .title_style(theme::title_style())
            .title_bottom(self.status_line())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let (table_area, prompt_area) = if self.filter.is_some() {
            let [table, prompt] =
                ratatui::layout::Layout::vertical([Constraint::Min(1), Constraint::Length(1)])
                    .areas(inner);
            (table, Some(prompt))
        } else {
            (inner, None)
        };

        if self.loading && self.records.is_empty() {
            let throbber = Throbber::default()
                .label(" Loading...")
                .style(Style::default().fg(theme::CYAN))
                .throbber_style(Style::default().fg(theme::ACCENT));
            frame.render_stateful_widget(throbber, table_area, &mut self.throbber.clone());
            return;
        }

        if self.page.items.is_empty() {
            let message = if self.records.is_empty() {
                " Nothing here yet"
            } else {
                " No rows match the filter"
            };
            frame.render_widget(
                Paragraph::new(Span::styled(message, theme::key_hint())),
                table_area,
            );
        } else {
            let header_row = Row::new(
                std::iter::once(Cell::from(""))
                    .chain(columns.iter().map(|(h, _)| Cell::from(*h)))
                    .map(|c| c.style(theme::table_header())),
            );
            let rows = self.page.items.iter().map(|record| {
                let checked = self.selection.contains(record.id());
                let mark = if checked { "[x]" } else { "[ ]" };
                let style = if checked {
                    theme::table_checked()
                } else {
                    theme::table_row()
                };
                Row::new(std::iter::once(Cell::from(mark)).chain(row(record))).style(style)
            });
            let constraints: Vec<Constraint> = std::iter::once(Constraint::Length(3))
                .chain(columns.iter().map(|(_, w)| *w))
                .collect();
            let table = Table::new(rows, constraints)
                .header(header_row)
                .row_highlight_style(theme::table_cursor());
            let mut state = TableState::default().with_selected(Some(self.cursor));
            frame.render_stateful_widget(table, table_area, &mut state);
        }

        if let (Some(input), Some(prompt)) = (self.filter.as_ref(), prompt_area) {
            let line = Line::from(vec![
                Span::styled(" / ", theme::key_hint_key()),
                Span::styled(input.value().to_owned(), theme::input_focused()),
            ]);
            frame.render_widget(Paragraph::new(line), prompt);
            let x = prompt.x.saturating_add(super::cells(3 + input.visual_cursor()));
            frame.set_cursor_position((x, prompt.y));
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    use samdash_core::{Location, SortDirection};

    use super::*;

    fn locations(names: &[&str]) -> Arc<Vec<Arc<Location>>> {
        Arc::new(
            names
                .iter()
                .zip(1..)
                .map(|(name, id)| {
                    Arc::new(Location {
                        id,
                        name: (*name).to_owned(),
                    })
                })
                .collect(),
        )
    }

    fn press(view: &mut ListView<Location>, code: KeyCode) {
        view.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn names(view: &ListView<Location>) -> Vec<String> {
        view.page.items.iter().map(|l| l.name.clone()).collect()
    }

    #[test]
    fn filter_prompt_narrows_live_and_esc_clears() {
        let mut view = ListView::new(10);
        view.set_records(locations(&["Depot", "Gate-A", "Gate-B"]));

        press(&mut view, KeyCode::Char('/'));
        assert!(view.is_filtering());
        for c in "gate".chars() {
            press(&mut view, KeyCode::Char(c));
        }
        assert_eq!(names(&view), vec!["Gate-A", "Gate-B"]);

        press(&mut view, KeyCode::Esc);
        assert!(!view.is_filtering());
        assert_eq!(view.page.matched, 3);
    }

    #[test]
    fn enter_keeps_the_filter() {
        let mut view = ListView::new(10);
        view.set_records(locations(&["Depot", "Gate-A"]));
        press(&mut view, KeyCode::Char('/'));
        press(&mut view, KeyCode::Char('d'));
        press(&mut view, KeyCode::Enter);
        assert!(!view.is_filtering());
        assert_eq!(names(&view), vec!["Depot"]);
    }

    #[test]
    fn sort_cycles_and_reverses() {
        let mut view = ListView::new(10);
        view.set_records(locations(&["beta", "Alpha", "gamma"]));

        press(&mut view, KeyCode::Char('s'));
        assert_eq!(view.query().sort, Some(SortKey::Name));
        assert_eq!(names(&view), vec!["Alpha", "beta", "gamma"]);

        press(&mut view, KeyCode::Char('r'));
        assert_eq!(view.query().direction, SortDirection::Desc);
        assert_eq!(names(&view), vec!["gamma", "beta", "Alpha"]);

        press(&mut view, KeyCode::Char('s'));
        assert_eq!(view.query().sort, Some(SortKey::Id));
    }

    #[test]
    fn paging_stays_in_bounds() {
        let mut view = ListView::new(2);
        view.set_records(locations(&["a", "b", "c"]));

        press(&mut view, KeyCode::Char(']'));
        assert_eq!(names(&view), vec!["c"]);
        press(&mut view, KeyCode::Char(']'));
        assert_eq!(view.page.page, 2);
        press(&mut view, KeyCode::Char('['));
        press(&mut view, KeyCode::Char('['));
        assert_eq!(view.page.page, 1);
    }

    #[test]
    fn space_checks_rows_and_refresh_drops_missing_ones() {
        let mut view = ListView::new(10);
        view.set_records(locations(&["a", "b", "c"]));

        press(&mut view, KeyCode::Char(' '));
        press(&mut view, KeyCode::Char(' '));
        assert_eq!(view.selection().ids(), &[1, 2]);

        view.set_records(Arc::new(vec![Arc::new(Location {
            id: 2,
            name: "b".into(),
        })]));
        assert_eq!(view.selection().ids(), &[2]);
        assert_eq!(view.selected_records()[0].name, "b");
    }

    #[test]
    fn last_page_follows_deletions() {
        let mut view = ListView::new(2);
        view.set_records(locations(&["a", "b", "c"]));
        press(&mut view, KeyCode::Char(']'));

        view.set_records(locations(&["a", "b"]));
        assert_eq!(view.page.page, 1);
        assert_eq!(names(&view), vec!["a", "b"]);
    }
}
