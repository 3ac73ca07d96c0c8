//! Generic list screen: paged table, detail panel, search, delete.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState, Wrap};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tokio::sync::{mpsc, watch};
use tourdesk_core::{ListState, Notification, Operation, OrderStats};
use tracing::debug;

use crate::action::Action;
use crate::component::Component;
use crate::screen::ScreenId;
use crate::theme;
use crate::worker::ScreenCommand;

use super::columns::TableRow;

pub struct EntityScreen<T: TableRow> {
    id: ScreenId,
    focused: bool,
    /// First focus triggers the initial load.
    activated: bool,
    state: watch::Receiver<ListState<T>>,
    commands: mpsc::UnboundedSender<ScreenCommand<T>>,
    selected: usize,
    page: u32,
    detail_open: bool,
    throbber: ThrobberState,
}

impl<T: TableRow> EntityScreen<T> {
    pub fn new(
        id: ScreenId,
        state: watch::Receiver<ListState<T>>,
        commands: mpsc::UnboundedSender<ScreenCommand<T>>,
    ) -> Self {
        Self {
            id,
            focused: false,
            activated: false,
            state,
            commands,
            selected: 0,
            page: 1,
            detail_open: false,
            throbber: ThrobberState::default(),
        }
    }

    fn send(&self, cmd: ScreenCommand<T>) {
        if self.commands.send(cmd).is_err() {
            debug!(screen = %self.id, "list worker gone");
        }
    }

    fn row_count(&self) -> usize {
        self.state.borrow().visible.len()
    }

    fn selected_record(&self) -> Option<T> {
        self.state.borrow().visible.get(self.selected).cloned()
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        self.selected = self.selected.saturating_add_signed(delta).min(len - 1);
    }

    fn toggle_detail(&mut self) {
        if self.detail_open {
            self.close_detail();
        } else if let Some(record) = self.selected_record() {
            self.detail_open = true;
            self.send(ScreenCommand::OpenDetails(record));
        }
    }

    fn close_detail(&mut self) {
        if self.detail_open {
            self.detail_open = false;
            self.send(ScreenCommand::CloseDetails);
        }
    }

    /// Keep the selection on a row after the rows change.
    fn settle(&mut self) {
        let (page, len) = {
            let state = self.state.borrow();
            (state.page, state.visible.len())
        };
        if page != self.page {
            self.page = page;
            self.selected = 0;
            self.close_detail();
        }
        if len == 0 {
            self.selected = 0;
            self.close_detail();
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    fn request_delete(&self) -> Option<Action> {
        if !T::RESOURCE.supports(Operation::Delete) {
            return Some(Action::Notify(Notification::warning(format!(
                "{} cannot be deleted",
                T::RESOURCE.label()
            ))));
        }
        self.selected_record().map(|r| Action::RequestDelete {
            id: r.id().to_owned(),
            title: r.title().to_owned(),
        })
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect, record: &T) {
        let block = Block::default()
            .title(format!(" {} ", record.title()))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines: Vec<Line> = record
            .detail()
            .into_iter()
            .map(|(label, value)| {
                Line::from(vec![
                    Span::styled(format!("  {label:<12}"), Style::default().fg(theme::FOAM)),
                    Span::styled(value, Style::default().fg(theme::LAGOON)),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }

    fn stats_line(stats: &OrderStats) -> Line<'static> {
        let counts = [
            ("total", stats.total, theme::FOAM),
            ("pending", stats.pending, theme::SAND),
            ("confirmed", stats.confirmed, theme::LAGOON),
            ("completed", stats.completed, theme::PALM),
            ("canceled", stats.canceled, theme::CORAL_RED),
        ];
        let mut spans = vec![Span::raw(" ")];
        for (label, count, color) in counts {
            spans.push(Span::styled(format!(" {label} "), theme::key_hint()));
            spans.push(Span::styled(
                count.to_string(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw(" "));
        }
        Line::from(spans)
    }

    fn hints(&self, state: &ListState<T>) -> Line<'static> {
        let mut spans = vec![Span::styled(
            format!("  page {}/{}  ", state.page, state.total_pages.max(1)),
            Style::default().fg(theme::SAND),
        )];
        let mut hint = |key: &'static str, label: &'static str| {
            spans.push(Span::styled(format!("{key} "), theme::key_hint_key()));
            spans.push(Span::styled(format!("{label}  "), theme::key_hint()));
        };
        if state.can_prev() {
            hint("p", "prev");
        }
        if state.can_next() {
            hint("n", "next");
        }
        hint("Enter", "details");
        if T::RESOURCE.supports(Operation::Delete) {
            hint("d", "delete");
        }
        if T::CYCLES_STATUS {
            hint("s", "status");
        }
        hint("r", "refresh");
        Line::from(spans)
    }
}

impl<T: TableRow> Component for EntityScreen<T> {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::Char('g') | KeyCode::Home => self.selected = 0,
            KeyCode::Char('G') | KeyCode::End => self.selected = self.row_count().saturating_sub(1),
            KeyCode::Char('n') | KeyCode::Right => self.send(ScreenCommand::Next),
            KeyCode::Char('p') | KeyCode::Left => self.send(ScreenCommand::Prev),
            KeyCode::Char('r') => self.send(ScreenCommand::Refresh),
            KeyCode::Enter => self.toggle_detail(),
            KeyCode::Esc => self.close_detail(),
            KeyCode::Char('d') => return Ok(self.request_delete()),
            KeyCode::Char('s') if T::CYCLES_STATUS => {
                if let Some(record) = self.selected_record() {
                    self.send(ScreenCommand::CycleStatus(record));
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Tick => {
                self.settle();
                if self.state.borrow().fetching {
                    self.throbber.calc_next();
                }
            }
            Action::SearchInput(input) => self.send(ScreenCommand::Search(input.clone())),
            Action::SearchSubmit => self.send(ScreenCommand::FlushSearch),
            Action::CloseSearch => {
                self.send(ScreenCommand::Search(String::new()));
                self.send(ScreenCommand::FlushSearch);
            }
            Action::Delete(id) => {
                let record = self
                    .state
                    .borrow()
                    .visible
                    .iter()
                    .find(|r| r.id() == id)
                    .cloned();
                if let Some(record) = record {
                    self.close_detail();
                    self.send(ScreenCommand::Delete(record));
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let state = self.state.borrow();

        let title = if state.search.is_empty() {
            format!(" {} ({}) ", self.id.label(), state.total)
        } else {
            format!(" {} ({}) · / {} ", self.id.label(), state.total, state.search)
        };
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let detail = if self.detail_open {
            state.visible.get(self.selected)
        } else {
            None
        };
        let (list_area, detail_area) = if detail.is_some() {
            let chunks =
                Layout::vertical([Constraint::Percentage(55), Constraint::Percentage(45)])
                    .split(inner);
            (chunks[0], Some(chunks[1]))
        } else {
            (inner, None)
        };

        let layout = Layout::vertical([
            Constraint::Length(1), // status
            Constraint::Length(u16::from(state.stats.is_some())),
            Constraint::Min(1),    // table
            Constraint::Length(1), // hints
        ])
        .split(list_area);

        if state.fetching {
            let label = if state.loading { " Loading…" } else { " Refreshing…" };
            let throbber = Throbber::default()
                .label(label)
                .style(Style::default().fg(theme::LAGOON))
                .throbber_style(Style::default().fg(theme::SUNSET));
            frame.render_stateful_widget(throbber, layout[0], &mut self.throbber.clone());
        } else if let Some(ref error) = state.error {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!(" ✗ {error}"),
                    Style::default().fg(theme::CORAL_RED),
                )),
                layout[0],
            );
        }

        if let Some(ref stats) = state.stats {
            frame.render_widget(Paragraph::new(Self::stats_line(stats)), layout[1]);
        }

        let header = Row::new(
            T::HEADERS
                .iter()
                .map(|h| Cell::from(*h).style(theme::table_header())),
        );
        let rows = state.visible.iter().enumerate().map(|(i, record)| {
            let is_selected = i == self.selected;
            let mut cells = record.cells().into_iter();
            let first = cells.next().unwrap_or_default();
            let prefix = if is_selected { "▸" } else { " " };
            let lead = Cell::from(format!("{prefix}{first}")).style(
                Style::default()
                    .fg(theme::LAGOON)
                    .add_modifier(if is_selected {
                        Modifier::BOLD
                    } else {
                        Modifier::empty()
                    }),
            );
            let row = std::iter::once(lead).chain(cells.map(Cell::from));
            Row::new(row).style(if is_selected {
                theme::table_selected()
            } else {
                theme::table_row()
            })
        });

        let table = Table::new(rows, T::WIDTHS.iter().copied())
            .header(header)
            .row_highlight_style(theme::table_selected());
        let mut table_state = TableState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(table, layout[2], &mut table_state);

        if state.visible.is_empty() && !state.loading {
            let empty = if state.search.is_empty() {
                "  Nothing here yet"
            } else {
                "  No matches"
            };
            frame.render_widget(
                Paragraph::new(Span::styled(empty, theme::key_hint())),
                Rect {
                    y: layout[2].y.saturating_add(1),
                    height: 1.min(layout[2].height),
                    ..layout[2]
                },
            );
        }

        frame.render_widget(Paragraph::new(self.hints(&state)), layout[3]);

        if let (Some(area), Some(record)) = (detail_area, detail) {
            self.render_detail(frame, area, record);
        }
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if focused && !self.activated {
            self.activated = true;
            self.send(ScreenCommand::Load);
        }
    }

    fn has_overlay(&self) -> bool {
        self.detail_open
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use tourdesk_core::{Order, OrderStatus, Restaurant};

    fn order(id: &str) -> Order {
        Order {
            id: id.into(),
            item_name: format!("Item {id}"),
            store_name: "La Esquina".into(),
            quantity: 1,
            total_price: 3.5,
            status: OrderStatus::Pending,
            created_at: None,
        }
    }

    fn loaded<T: Clone>(rows: Vec<T>) -> ListState<T> {
        ListState {
            visible: rows.clone(),
            rows,
            page: 1,
            limit: 7,
            total: 2,
            total_pages: 1,
            stats: None,
            search: String::new(),
            loading: false,
            fetching: false,
            error: None,
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn first_focus_loads_once() {
        let (_state_tx, state_rx) = watch::channel(loaded::<Order>(Vec::new()));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut screen = EntityScreen::new(ScreenId::Orders, state_rx, tx);

        screen.set_focused(true);
        screen.set_focused(false);
        screen.set_focused(true);
        assert!(matches!(rx.try_recv().unwrap(), ScreenCommand::Load));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn status_key_cycles_selected_order() {
        let (_state_tx, state_rx) = watch::channel(loaded(vec![order("o1"), order("o2")]));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut screen = EntityScreen::new(ScreenId::Orders, state_rx, tx);

        screen.handle_key_event(key(KeyCode::Down)).unwrap();
        screen.handle_key_event(key(KeyCode::Char('s'))).unwrap();
        let ScreenCommand::CycleStatus(record) = rx.try_recv().unwrap() else {
            panic!("expected a status change");
        };
        assert_eq!(record.id, "o2");
    }

    #[test]
    fn delete_asks_for_confirmation() {
        let (_state_tx, state_rx) = watch::channel(loaded(vec![order("o1")]));
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut screen = EntityScreen::new(ScreenId::Orders, state_rx, tx);

        let action = screen.handle_key_event(key(KeyCode::Char('d'))).unwrap();
        let Some(Action::RequestDelete { id, title }) = action else {
            panic!("expected a delete request");
        };
        assert_eq!(id, "o1");
        assert_eq!(title, "Item o1");
    }

    #[test]
    fn restaurants_cannot_be_deleted() {
        let (_state_tx, state_rx) = watch::channel(loaded::<Restaurant>(Vec::new()));
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut screen = EntityScreen::new(ScreenId::Restaurants, state_rx, tx);

        let action = screen.handle_key_event(key(KeyCode::Char('d'))).unwrap();
        assert!(matches!(action, Some(Action::Notify(_))));
    }

    #[test]
    fn new_page_resets_selection() {
        let (state_tx, state_rx) = watch::channel(loaded(vec![order("o1"), order("o2")]));
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut screen = EntityScreen::new(ScreenId::Orders, state_rx, tx);

        screen.handle_key_event(key(KeyCode::Char('G'))).unwrap();
        assert_eq!(screen.selected, 1);

        state_tx.send_modify(|s| s.page = 2);
        screen.update(&Action::Tick).unwrap();
        assert_eq!(screen.selected, 0);
    }

    #[test]
    fn order_stats_show_above_the_table() {
        use ratatui::{Terminal, backend::TestBackend};

        let mut state = loaded(vec![order("o1")]);
        state.stats = Some(OrderStats {
            total: 12,
            pending: 5,
            confirmed: 3,
            completed: 3,
            canceled: 1,
        });
        let (_state_tx, state_rx) = watch::channel(state);
        let (tx, _rx) = mpsc::unbounded_channel();
        let screen = EntityScreen::new(ScreenId::Orders, state_rx, tx);

        let mut terminal = Terminal::new(TestBackend::new(100, 12)).unwrap();
        terminal
            .draw(|frame| screen.render(frame, frame.area()))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect();
        assert!(text.contains("total 12"));
        assert!(text.contains("pending 5"));
        assert!(text.contains("canceled 1"));
    }
}
