use std::mem;

use anyhow::{anyhow, Result};
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap,
};
use ratatui::Frame;
use tracing::{debug, warn};

use crate::models::{Admin, Publication, PublicationKind};
use crate::service::LendingService;

use super::forms::{ConfirmRemove, Form, FormKind};
use super::helpers::{centered_rect, publication_lines, surface_error};
use super::screens::{AdminDashboard, AdminTab, ReaderDashboard, ReaderPane};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Rows skipped by PageUp / PageDown.
const PAGE_STEP: isize = 5;

/// High-level navigation states; each logged-in role gets its own dashboard.
enum Screen {
    Welcome,
    Reader(ReaderDashboard),
    Admin(AdminDashboard),
}

/// Fine-grained modes layered over the current screen.
enum Mode {
    Normal,
    Form(Form),
    ConfirmRemove(ConfirmRemove),
}

/// Work decided while the screen is borrowed, carried out afterwards.
enum Action {
    Nothing,
    Exit,
    Logout,
    OpenForm(FormKind),
    Borrow { title: String },
    Return { title: String },
    ConfirmRemove(ConfirmRemove),
    SetLatest { title: String, latest: bool },
    Status(String, StatusKind),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    service: LendingService,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(service: LendingService) -> Self {
        Self {
            service,
            screen: Screen::Welcome,
            mode: Mode::Normal,
            status: None,
        }
    }

    /// Process one key press. Returns `true` when the app should exit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => {
                let action = self.normal_key_action(code);
                self.apply(action, &mut exit)?
            }
            Mode::Form(form) => self.handle_form(code, form)?,
            Mode::ConfirmRemove(confirm) => self.handle_confirm_remove(code, confirm)?,
        };

        Ok(exit)
    }

    fn normal_key_action(&mut self, code: KeyCode) -> Action {
        match &mut self.screen {
            Screen::Welcome => match code {
                KeyCode::Char('q') | KeyCode::Esc => Action::Exit,
                KeyCode::Char('r') | KeyCode::Char('R') => Action::OpenForm(FormKind::ReaderLogin),
                KeyCode::Char('a') | KeyCode::Char('A') => Action::OpenForm(FormKind::AdminLogin),
                KeyCode::Char('n') | KeyCode::Char('N') => Action::OpenForm(FormKind::Register),
                _ => Action::Nothing,
            },
            Screen::Reader(dashboard) => match code {
                KeyCode::Char('q') => Action::Exit,
                KeyCode::Esc | KeyCode::Char('o') | KeyCode::Char('O') => Action::Logout,
                KeyCode::Tab | KeyCode::BackTab => {
                    dashboard.toggle_pane();
                    Action::Nothing
                }
                KeyCode::Up => {
                    dashboard.move_selection(-1);
                    Action::Nothing
                }
                KeyCode::Down => {
                    dashboard.move_selection(1);
                    Action::Nothing
                }
                KeyCode::PageUp => {
                    dashboard.move_selection(-PAGE_STEP);
                    Action::Nothing
                }
                KeyCode::PageDown => {
                    dashboard.move_selection(PAGE_STEP);
                    Action::Nothing
                }
                KeyCode::Home => {
                    dashboard.select_first();
                    Action::Nothing
                }
                KeyCode::End => {
                    dashboard.select_last();
                    Action::Nothing
                }
                KeyCode::Enter => match dashboard.pane {
                    ReaderPane::Available => match dashboard.current_available() {
                        Some(publication) => Action::Borrow {
                            title: publication.title().to_string(),
                        },
                        None => Action::Status(
                            "Nothing available to borrow.".to_string(),
                            StatusKind::Error,
                        ),
                    },
                    ReaderPane::Loans => return_action(dashboard),
                },
                KeyCode::Char('d') | KeyCode::Char('D') => match dashboard.current_available() {
                    Some(publication) if dashboard.pane == ReaderPane::Available => {
                        Action::OpenForm(FormKind::Borrow {
                            title: publication.title().to_string(),
                        })
                    }
                    _ => Action::Status(
                        "Select an available publication first.".to_string(),
                        StatusKind::Error,
                    ),
                },
                KeyCode::Char('r') | KeyCode::Char('R') => return_action(dashboard),
                _ => Action::Nothing,
            },
            Screen::Admin(dashboard) => match code {
                KeyCode::Char('q') => Action::Exit,
                KeyCode::Esc | KeyCode::Char('o') | KeyCode::Char('O') => Action::Logout,
                KeyCode::Tab => {
                    dashboard.switch_tab(true);
                    Action::Nothing
                }
                KeyCode::BackTab => {
                    dashboard.switch_tab(false);
                    Action::Nothing
                }
                KeyCode::Up => {
                    dashboard.move_selection(-1);
                    Action::Nothing
                }
                KeyCode::Down => {
                    dashboard.move_selection(1);
                    Action::Nothing
                }
                KeyCode::PageUp => {
                    dashboard.move_selection(-PAGE_STEP);
                    Action::Nothing
                }
                KeyCode::PageDown => {
                    dashboard.move_selection(PAGE_STEP);
                    Action::Nothing
                }
                KeyCode::Home => {
                    dashboard.selection.select_first();
                    Action::Nothing
                }
                KeyCode::End => {
                    dashboard.select_last();
                    Action::Nothing
                }
                KeyCode::Char('b') | KeyCode::Char('B') => Action::OpenForm(FormKind::AddBook),
                KeyCode::Char('m') | KeyCode::Char('M') => {
                    Action::OpenForm(FormKind::AddMagazine)
                }
                KeyCode::Char('n') | KeyCode::Char('N') => Action::OpenForm(FormKind::AddReader),
                KeyCode::Char('a') | KeyCode::Char('A') => Action::OpenForm(FormKind::AddAdmin),
                KeyCode::Char('-') | KeyCode::Delete => match dashboard.current_publication() {
                    Some(publication) => Action::ConfirmRemove(ConfirmRemove::from(publication)),
                    None => Action::Status(
                        "Select a publication to remove.".to_string(),
                        StatusKind::Error,
                    ),
                },
                KeyCode::Char('l') | KeyCode::Char('L') => match dashboard.current_publication() {
                    Some(publication) => match publication.kind() {
                        PublicationKind::Magazine { is_latest, .. } => Action::SetLatest {
                            title: publication.title().to_string(),
                            latest: !is_latest,
                        },
                        PublicationKind::Book { .. } => Action::Status(
                            "Only magazines have a latest issue.".to_string(),
                            StatusKind::Error,
                        ),
                    },
                    None => Action::Status(
                        "Select a magazine first.".to_string(),
                        StatusKind::Error,
                    ),
                },
                _ => Action::Nothing,
            },
        }
    }

    fn apply(&mut self, action: Action, exit: &mut bool) -> Result<Mode> {
        match action {
            Action::Nothing => {}
            Action::Exit => *exit = true,
            Action::Logout => {
                self.screen = Screen::Welcome;
                self.set_status("Logged out.", StatusKind::Info);
            }
            Action::OpenForm(kind) => {
                self.clear_status();
                return Ok(Mode::Form(Form::new(kind)));
            }
            Action::ConfirmRemove(confirm) => {
                self.clear_status();
                return Ok(Mode::ConfirmRemove(confirm));
            }
            Action::Borrow { title } => {
                if let Some(reader_id) = self.current_reader_id() {
                    let result = self.service.borrow(&reader_id, &title, None);
                    self.report(result);
                }
            }
            Action::Return { title } => {
                if let Some(reader_id) = self.current_reader_id() {
                    let result = self.service.return_item(&reader_id, &title);
                    self.report(result);
                }
            }
            Action::SetLatest { title, latest } => {
                if let Screen::Admin(dashboard) = &self.screen {
                    let admin = dashboard.admin.clone();
                    let result = self.service.set_magazine_latest(&admin, &title, latest);
                    self.report(result);
                }
            }
            Action::Status(text, kind) => self.set_status(text, kind),
        }
        Ok(Mode::Normal)
    }

    fn handle_form(&mut self, code: KeyCode, mut form: Form) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status(format!("{} cancelled.", form.kind.title()), StatusKind::Info);
                return Ok(Mode::Normal);
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.submit_form(&form) {
                Ok(next) => return Ok(next),
                Err(err) => {
                    debug!(form = %form.kind.title(), error = %err, "form rejected");
                    form.error = Some(surface_error(&err));
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Ok(Mode::Form(form))
    }

    /// Validate and run a form. Errors keep the form open with the message.
    fn submit_form(&mut self, form: &Form) -> Result<Mode> {
        match &form.kind {
            FormKind::AdminLogin => {
                let (admin_id, password) = form.parse_credentials()?;
                let admin = self.service.login_admin(&admin_id, &password)?;
                self.set_status(format!("Welcome, {}.", admin.name()), StatusKind::Info);
                self.screen = Screen::Admin(AdminDashboard::new(admin, self.service.directory()));
            }
            FormKind::ReaderLogin => {
                let (reader_id, password) = form.parse_credentials()?;
                let reader = self.service.login_reader(&reader_id, &password)?;
                self.set_status(format!("Welcome, {}.", reader.name()), StatusKind::Info);
                self.screen =
                    Screen::Reader(ReaderDashboard::new(reader, self.service.directory()));
            }
            FormKind::Register => {
                let reader = form.parse_registration()?;
                let message = self.service.register(reader)?;
                self.set_status(message, StatusKind::Info);
                return Ok(Mode::Form(Form::new(FormKind::ReaderLogin)));
            }
            FormKind::Borrow { title } => {
                let days = form.parse_days()?;
                let reader_id = self
                    .current_reader_id()
                    .ok_or_else(|| anyhow!("Log in as a reader first."))?;
                let message = self.service.borrow(&reader_id, title, days)?;
                self.set_status(message, StatusKind::Info);
            }
            FormKind::AddBook => {
                let book = form.parse_book()?;
                let admin = self.current_admin()?;
                let message = self.service.add_publication(&admin, book)?;
                self.set_status(message, StatusKind::Info);
            }
            FormKind::AddMagazine => {
                let magazine = form.parse_magazine()?;
                let admin = self.current_admin()?;
                let message = self.service.add_publication(&admin, magazine)?;
                self.set_status(message, StatusKind::Info);
            }
            FormKind::AddReader => {
                let reader = form.parse_reader()?;
                let admin = self.current_admin()?;
                let message = self.service.add_reader(&admin, reader)?;
                self.set_status(message, StatusKind::Info);
            }
            FormKind::AddAdmin => {
                let new_admin = form.parse_admin()?;
                let admin = self.current_admin()?;
                let message = self.service.add_admin(&admin, new_admin)?;
                self.set_status(message, StatusKind::Info);
            }
        }
        self.refresh_screen();
        Ok(Mode::Normal)
    }

    fn handle_confirm_remove(&mut self, code: KeyCode, confirm: ConfirmRemove) -> Result<Mode> {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                let result = self
                    .current_admin()
                    .and_then(|admin| self.service.remove_publication(&admin, &confirm.title));
                self.report(result);
                Ok(Mode::Normal)
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.set_status("Removal cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            _ => Ok(Mode::ConfirmRemove(confirm)),
        }
    }

    /// Show the outcome of a service call and refresh the dashboard.
    fn report(&mut self, result: Result<String>) {
        match result {
            Ok(message) => self.set_status(message, StatusKind::Info),
            Err(err) => {
                warn!(error = %err, "action failed");
                self.set_status(surface_error(&err), StatusKind::Error);
            }
        }
        self.refresh_screen();
    }

    fn refresh_screen(&mut self) {
        match &mut self.screen {
            Screen::Welcome => {}
            Screen::Reader(dashboard) => dashboard.refresh(self.service.directory()),
            Screen::Admin(dashboard) => dashboard.refresh(self.service.directory()),
        }
    }

    fn current_reader_id(&self) -> Option<String> {
        match &self.screen {
            Screen::Reader(dashboard) => Some(dashboard.reader.reader_id().to_string()),
            _ => None,
        }
    }

    fn current_admin(&self) -> Result<Admin> {
        match &self.screen {
            Screen::Admin(dashboard) => Ok(dashboard.admin.clone()),
            _ => Err(anyhow!("Log in as an admin first.")),
        }
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match &self.screen {
            Screen::Welcome => self.draw_welcome(frame, content_area),
            Screen::Reader(dashboard) => self.draw_reader(frame, content_area, dashboard),
            Screen::Admin(dashboard) => self.draw_admin(frame, content_area, dashboard),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::Form(form) => self.draw_form(frame, area, form),
            Mode::ConfirmRemove(confirm) => self.draw_confirm_remove(frame, area, confirm),
            Mode::Normal => {}
        }
    }

    fn draw_welcome(&self, frame: &mut Frame, area: Rect) {
        let directory = self.service.directory();
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let lines = vec![
            Line::from(Span::styled(
                directory.name().to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(format!(
                "{} publications, {} available, {} readers",
                directory.publications().len(),
                directory.list_available().len(),
                directory.readers().len()
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("[R]", key_style),
                Span::raw(" Reader login   "),
                Span::styled("[A]", key_style),
                Span::raw(" Admin login   "),
                Span::styled("[N]", key_style),
                Span::raw(" Register"),
            ]),
        ];
        let block = Block::default().borders(Borders::ALL).title("Welcome");
        let popup = centered_rect(60, 40, area);
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup);
    }

    fn draw_reader(&self, frame: &mut Frame, area: Rect, dashboard: &ReaderDashboard) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(area);

        let reader = &dashboard.reader;
        let header = Line::from(vec![
            Span::styled(
                format!("{} ({})", reader.name(), reader.reader_id()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                "   borrowed {}/{}, {} more allowed",
                dashboard.loans.len(),
                reader.max_borrow_limit(),
                reader.remaining_quota()
            )),
        ]);
        frame.render_widget(Paragraph::new(header), chunks[0]);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(chunks[1]);

        self.render_publication_list(
            frame,
            columns[0],
            "Available",
            &dashboard.available,
            dashboard.available_selection.selected,
            dashboard.pane == ReaderPane::Available,
        );
        self.render_publication_list(
            frame,
            columns[1],
            "My Loans",
            &dashboard.loans,
            dashboard.loans_selection.selected,
            dashboard.pane == ReaderPane::Loans,
        );
    }

    fn draw_admin(&self, frame: &mut Frame, area: Rect, dashboard: &AdminDashboard) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let role = if dashboard.is_super_admin {
            "super admin"
        } else {
            "admin"
        };
        let titles = [AdminTab::Publications, AdminTab::Readers, AdminTab::Overdue]
            .iter()
            .map(|tab| Line::from(tab.label()))
            .collect::<Vec<_>>();
        let selected_tab = match dashboard.tab {
            AdminTab::Publications => 0,
            AdminTab::Readers => 1,
            AdminTab::Overdue => 2,
        };
        let tabs = Tabs::new(titles)
            .select(selected_tab)
            .block(Block::default().borders(Borders::ALL).title(format!(
                "{} - {} ({role})",
                self.service.directory().name(),
                dashboard.admin.name()
            )))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, chunks[0]);

        match dashboard.tab {
            AdminTab::Publications => self.render_publication_list(
                frame,
                chunks[1],
                "Publications",
                &dashboard.publications,
                dashboard.selection.selected,
                true,
            ),
            AdminTab::Readers => {
                let items = dashboard
                    .readers
                    .iter()
                    .map(|reader| {
                        ListItem::new(Line::from(vec![
                            Span::styled(
                                format!("{} ({})", reader.name(), reader.reader_id()),
                                Style::default().add_modifier(Modifier::BOLD),
                            ),
                            Span::raw(format!(
                                "  {}/{} borrowed",
                                reader.borrowed_items().len(),
                                reader.max_borrow_limit()
                            )),
                        ]))
                    })
                    .collect::<Vec<_>>();
                let selected = dashboard.selection.selected;
                self.render_list(frame, chunks[1], "Readers", items, selected, true);
            }
            AdminTab::Overdue => {
                let items = dashboard
                    .overdue
                    .iter()
                    .map(|loan| {
                        ListItem::new(Line::from(vec![
                            Span::styled(
                                loan.title.clone(),
                                Style::default().add_modifier(Modifier::BOLD),
                            ),
                            Span::raw(format!(
                                "  {} ({}), due {}",
                                loan.borrower_name,
                                loan.borrower_id,
                                loan.due.format("%Y-%m-%d")
                            )),
                            Span::styled(
                                format!("  {} days overdue", loan.days_overdue),
                                Style::default().fg(Color::Red),
                            ),
                        ]))
                    })
                    .collect::<Vec<_>>();
                let selected = dashboard.selection.selected;
                self.render_list(frame, chunks[1], "Overdue", items, selected, true);
            }
        }
    }

    fn render_publication_list(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        publications: &[Publication],
        selected: usize,
        focused: bool,
    ) {
        let items = publications
            .iter()
            .enumerate()
            .map(|(index, publication)| {
                ListItem::new(publication_lines(publication, focused && index == selected))
            })
            .collect::<Vec<_>>();
        self.render_list(frame, area, title, items, selected, focused);
    }

    fn render_list(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        items: Vec<ListItem<'static>>,
        selected: usize,
        focused: bool,
    ) {
        let mut block = Block::default()
            .borders(Borders::ALL)
            .title(format!("{title} ({})", items.len()));
        if focused {
            block = block.border_style(Style::default().fg(Color::Yellow));
        }

        if items.is_empty() {
            let empty = Paragraph::new("Nothing here yet.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let list = List::new(items)
            .block(block)
            .highlight_symbol(if focused { "> " } else { "  " });
        let mut state = ListState::default().with_selected(Some(selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let keys: &[(&str, &str)] = match (&self.screen, &self.mode) {
            (_, Mode::Form(_)) => &[
                ("[Tab]", " Next field   "),
                ("[Space]", " Toggle   "),
                ("[Enter]", " Submit   "),
                ("[Esc]", " Cancel"),
            ],
            (_, Mode::ConfirmRemove(_)) => &[("[Y]", " Remove   "), ("[N]", " Keep")],
            (Screen::Welcome, _) => &[
                ("[R]", " Reader login   "),
                ("[A]", " Admin login   "),
                ("[N]", " Register   "),
                ("[Q]", " Quit"),
            ],
            (Screen::Reader(_), _) => &[
                ("[Tab]", " Switch pane   "),
                ("[Enter]", " Borrow/Return   "),
                ("[D]", " Borrow for days   "),
                ("[R]", " Return   "),
                ("[O]", " Log out   "),
                ("[Q]", " Quit"),
            ],
            (Screen::Admin(_), _) => &[
                ("[Tab]", " Tab   "),
                ("[B]", " Add book   "),
                ("[M]", " Add magazine   "),
                ("[-]", " Remove   "),
                ("[L]", " Latest/Archive   "),
                ("[N]", " Reader   "),
                ("[A]", " Admin   "),
                ("[O]", " Log out"),
            ],
        };
        let spans = keys
            .iter()
            .flat_map(|(key, label)| {
                [
                    Span::styled(key.to_string(), key_style),
                    Span::raw(label.to_string()),
                ]
            })
            .collect::<Vec<_>>();
        Line::from(spans)
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect, form: &Form) {
        let popup_area = centered_rect(60, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(form.kind.title())
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = form.build_lines();
        lines.push(Line::from(""));
        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to submit - Tab to switch field - Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let (offset_x, offset_y) = form.cursor_offset();
        frame.set_cursor_position((inner.x + offset_x, inner.y + offset_y));
    }

    fn draw_confirm_remove(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmRemove) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Removal")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![Line::from(format!("Remove \"{}\"?", confirm.title))];
        if let Some(borrower) = &confirm.on_loan_to {
            lines.push(Line::from(Span::styled(
                format!("It is currently on loan to {borrower}."),
                Style::default().fg(Color::Red),
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press Y to confirm or N / Esc to cancel.",
            Style::default().fg(Color::Gray),
        )));

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}

fn return_action(dashboard: &ReaderDashboard) -> Action {
    match dashboard.current_loan() {
        Some(publication) => Action::Return {
            title: publication.title().to_string(),
        },
        None => Action::Status("You have nothing to return.".to_string(), StatusKind::Error),
    }
}
