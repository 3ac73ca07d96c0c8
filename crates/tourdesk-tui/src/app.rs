//! Application core: event loop, screen switching and action dispatch.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tourdesk_core::{Notification, NotificationLevel, QueryClient};
use tracing::{debug, info, warn};

use crate::action::{Action, ConfirmAction};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::{ScreenContext, create_screens};
use crate::theme;
use crate::tui::Tui;

const TOAST_TTL: Duration = Duration::from_secs(4);

pub struct App {
    active_screen: ScreenId,
    previous_screen: Option<ScreenId>,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    running: bool,
    help_visible: bool,
    search_active: bool,
    search_query: String,
    /// Blocks all other input while set.
    pending_confirm: Option<ConfirmAction>,
    notification: Option<(Notification, Instant)>,
    /// Shown in the status bar.
    api_url: String,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Stops every list worker on exit.
    cancel: CancellationToken,
}

impl App {
    /// Build the app and spawn one list worker per screen.
    pub fn new(client: QueryClient, debounce: Duration) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let api_url = client.api().base_url().to_string();

        let ctx = ScreenContext {
            client,
            action_tx: action_tx.clone(),
            debounce,
            cancel: cancel.clone(),
        };
        let screens = create_screens(&ctx).into_iter().collect();

        Self {
            active_screen: ScreenId::default(),
            previous_screen: None,
            screens,
            running: true,
            help_visible: false,
            search_active: false,
            search_query: String::new(),
            pending_confirm: None,
            notification: None,
            api_url,
            action_tx,
            action_rx,
            cancel,
        }
    }

    fn active(&mut self) -> Option<&mut Box<dyn Component>> {
        self.screens.get_mut(&self.active_screen)
    }

    /// Run until the user quits.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        if let Some(screen) = self.active() {
            screen.set_focused(true);
        }

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!(api = %self.api_url, "TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;
                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        self.cancel.cancel();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key to an action. Global keys first, then the active screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.pending_confirm.is_some() {
            return Ok(match key.code {
                KeyCode::Char('y' | 'Y') | KeyCode::Enter => Some(Action::ConfirmYes),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Action::ConfirmNo),
                _ => None,
            });
        }

        if self.search_active {
            return Ok(match key.code {
                KeyCode::Esc => Some(Action::CloseSearch),
                KeyCode::Enter => Some(Action::SearchSubmit),
                KeyCode::Backspace => {
                    self.search_query.pop();
                    Some(Action::SearchInput(self.search_query.clone()))
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.search_query.push(c);
                    Some(Action::SearchInput(self.search_query.clone()))
                }
                _ => None,
            });
        }

        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c'))
            | (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),
            (KeyModifiers::NONE, KeyCode::Char('/')) => return Ok(Some(Action::OpenSearch)),
            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='9')) => {
                let n = u8::try_from(c).map_or(0, |b| b - b'0');
                if let Some(screen) = ScreenId::from_number(n) {
                    return Ok(Some(Action::SwitchScreen(screen)));
                }
            }
            (KeyModifiers::NONE, KeyCode::Tab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.next())));
            }
            (KeyModifiers::SHIFT, KeyCode::BackTab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.prev())));
            }
            (KeyModifiers::NONE, KeyCode::Esc)
                if !self.active().is_some_and(|s| s.has_overlay()) =>
            {
                return Ok(Some(Action::GoBack));
            }
            _ => {}
        }

        match self.active() {
            Some(screen) => screen.handle_key_event(key),
            None => Ok(None),
        }
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::Render | Action::Resize(..) => {}

            Action::Tick => {
                if self
                    .notification
                    .as_ref()
                    .is_some_and(|(_, shown)| shown.elapsed() > TOAST_TTL)
                {
                    self.notification = None;
                }
                self.forward(action)?;
            }

            Action::SwitchScreen(target) => {
                if *target != self.active_screen {
                    debug!("switching screen: {} → {}", self.active_screen, target);
                    if let Some(screen) = self.active() {
                        screen.set_focused(false);
                    }
                    self.previous_screen = Some(self.active_screen);
                    self.active_screen = *target;
                    if let Some(screen) = self.active() {
                        screen.set_focused(true);
                    }
                }
            }

            Action::GoBack => {
                if let Some(prev) = self.previous_screen.take() {
                    self.action_tx.send(Action::SwitchScreen(prev))?;
                }
            }

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            // ── Search ──────────────────────────────────────────────
            Action::OpenSearch => {
                self.search_active = true;
                self.search_query.clear();
            }
            Action::CloseSearch => {
                self.search_active = false;
                self.search_query.clear();
                self.forward(action)?;
            }
            Action::SearchSubmit => {
                self.search_active = false;
                self.forward(action)?;
            }
            Action::SearchInput(_) => self.forward(action)?,

            // ── Delete confirmation ─────────────────────────────────
            Action::RequestDelete { id, title } => {
                self.pending_confirm = Some(ConfirmAction::Delete {
                    screen: self.active_screen,
                    id: id.clone(),
                    title: title.clone(),
                });
            }
            Action::ShowConfirm(confirm) => self.pending_confirm = Some(confirm.clone()),
            Action::ConfirmYes => {
                if let Some(ConfirmAction::Delete { screen, id, .. }) = self.pending_confirm.take() {
                    let follow_up = match self.screens.get_mut(&screen) {
                        Some(screen) => screen.update(&Action::Delete(id))?,
                        None => None,
                    };
                    if let Some(follow_up) = follow_up {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }
            Action::ConfirmNo => self.pending_confirm = None,
            Action::Delete(_) => self.forward(action)?,

            Action::Notify(notification) => {
                if notification.level == NotificationLevel::Error {
                    warn!(message = %notification.message, "error shown to user");
                }
                self.notification = Some((notification.clone(), Instant::now()));
            }
        }
        Ok(())
    }

    /// Hand an action to the active screen and queue its follow-up.
    fn forward(&mut self, action: &Action) -> Result<()> {
        let follow_up = match self.active() {
            Some(screen) => screen.update(action)?,
            None => None,
        };
        if let Some(follow_up) = follow_up {
            self.action_tx.send(follow_up)?;
        }
        Ok(())
    }

    // ── Rendering ───────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let layout = Layout::vertical([
            Constraint::Min(1),    // screen
            Constraint::Length(1), // tabs
            Constraint::Length(1), // status
        ])
        .split(area);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, layout[0]);
        }
        self.render_tab_bar(frame, layout[1]);
        self.render_status_bar(frame, layout[2]);

        if self.help_visible {
            render_help_overlay(frame, area);
        }
        if let Some(ref confirm) = self.pending_confirm {
            render_confirm_dialog(frame, area, confirm);
        }
        if let Some((ref notification, _)) = self.notification {
            render_notification(frame, area, notification);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let narrow = area.width < 110;
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                let style = if id == self.active_screen {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                let label = if narrow {
                    id.label().chars().take(4).collect::<String>()
                } else {
                    id.label().to_owned()
                };
                Line::from(Span::styled(format!(" {} {label} ", id.number()), style))
            })
            .collect();

        let selected = ScreenId::ALL
            .iter()
            .position(|&s| s == self.active_screen)
            .unwrap_or(0);
        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(selected);
        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let line = if self.search_active {
            Line::from(vec![
                Span::styled(" / ", Style::default().fg(theme::HIBISCUS)),
                Span::styled(self.search_query.as_str(), Style::default().fg(theme::LAGOON)),
                Span::styled("█", Style::default().fg(theme::LAGOON)),
                Span::styled("  Esc clear  Enter apply", theme::key_hint()),
            ])
        } else {
            Line::from(vec![
                Span::styled(" ● ", Style::default().fg(theme::PALM)),
                Span::styled(self.api_url.as_str(), Style::default().fg(theme::FOAM)),
                Span::styled(" │ ? help  / search  q quit", theme::key_hint()),
            ])
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}

/// A centered rect of at most `width` x `height`, cleared for drawing.
fn overlay_area(frame: &mut Frame, area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(4));
    let x = area.width.saturating_sub(width) / 2;
    let y = area.height.saturating_sub(height) / 2;
    let rect = Rect::new(area.x + x, area.y + y, width, height);
    frame.render_widget(Clear, rect);
    frame.render_widget(Block::default().style(theme::overlay()), rect);
    rect
}

/// Draw a rounded frame and return its inner area.
fn framed(frame: &mut Frame, area: Rect, title: &str, border: Style) -> Rect {
    let block = Block::default()
        .title(title.to_owned())
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let help_area = overlay_area(frame, area, 56, 20);
    let inner = framed(frame, help_area, " Keyboard Shortcuts ", theme::border_focused());

    let section = |name: &'static str| {
        Line::from(Span::styled(format!("  {name}"), Style::default().fg(theme::LAGOON)))
    };
    let key = |k: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {k:<10}"), theme::key_hint_key()),
            Span::styled(what, theme::key_hint()),
        ])
    };

    let lines = vec![
        Line::from(""),
        section("Navigation"),
        key("1-9", "Jump to screen"),
        key("Tab", "Next screen"),
        key("j/k ↑/↓", "Move up/down"),
        key("n/p ←/→", "Next / previous page"),
        key("Enter", "Show / hide details"),
        key("Esc", "Back / close"),
        Line::from(""),
        section("Records"),
        key("/", "Search"),
        key("r", "Refresh"),
        key("d", "Delete"),
        key("s", "Next order status"),
        Line::from(""),
        key("?", "This help"),
        key("q", "Quit"),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_confirm_dialog(frame: &mut Frame, area: Rect, confirm: &ConfirmAction) {
    let dialog_area = overlay_area(frame, area, 56, 5);
    let inner = framed(frame, dialog_area, " Confirm ", Style::default().fg(theme::SAND));

    let text = vec![
        Line::from(Span::styled(
            format!("  {confirm}"),
            Style::default().fg(theme::FOAM),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  y ", theme::key_hint_key()),
            Span::styled("delete    ", theme::key_hint()),
            Span::styled("n ", theme::key_hint_key()),
            Span::styled("keep", theme::key_hint()),
        ]),
    ];
    frame.render_widget(Paragraph::new(text), inner);
}

/// Toast in the bottom-right corner, above the status bar.
fn render_notification(frame: &mut Frame, area: Rect, notification: &Notification) {
    let msg_len = u16::try_from(notification.message.chars().count()).unwrap_or(u16::MAX);
    let width = msg_len.saturating_add(6).clamp(20, 60).min(area.width);
    let height = 3u16;
    let x = area.width.saturating_sub(width + 1);
    let y = area.height.saturating_sub(height + 2);
    let toast_area = Rect::new(area.x + x, area.y + y, width, height.min(area.height));

    let (color, icon) = match notification.level {
        NotificationLevel::Success => (theme::PALM, "✓"),
        NotificationLevel::Error => (theme::CORAL_RED, "✗"),
        NotificationLevel::Warning => (theme::SAND, "!"),
        NotificationLevel::Info => (theme::LAGOON, "·"),
    };

    frame.render_widget(Clear, toast_area);
    frame.render_widget(Block::default().style(theme::overlay()), toast_area);
    let inner = framed(frame, toast_area, "", Style::default().fg(color));

    let line = Line::from(vec![
        Span::styled(format!(" {icon} "), Style::default().fg(color)),
        Span::styled(notification.message.as_str(), Style::default().fg(theme::FOAM)),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}
