//! Politicos TUI Application
//!
//! State machine for the dashboard. Key presses and completed requests go
//! in; [`Effect`]s come out for the runner to perform. Nothing here touches
//! the network or the clock, so every transition is testable directly.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState, Tabs, Wrap},
    Frame,
};
use std::path::PathBuf;
use tracing::{debug, warn};

use super::{overlay_area, standard_layout, TuiPalette};
use crate::api::types::{Gender, PageResult, PoliticianUpdate, Statistics};
use crate::api::ApiResult;
use crate::search::descriptor::next_page_size;
use crate::search::{Commit, FetchTicket, SearchSync};
use crate::service::MutationOutcome;
use crate::view::dialog::{
    DeleteDialog, EditDialog, ImportDialog, MutationState, Submit, DELETE_DESCRIPTION, DELETE_TITLE,
};
use crate::view::grid::{row_cells, Align, PaginationFooter, COLUMNS, GENDER_PICKER_LABEL, SEARCH_PLACEHOLDER};
use crate::view::nav::Route;
use crate::view::{
    ListView, StatisticsView, EMPTY_MESSAGE, ERROR_HEADING, MEAN_LABEL, MEDIAN_LABEL, TOP_HEADING,
};

/// Application state
#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    /// Moving around the grid
    Browsing,
    /// Typing in the search box
    Searching,
    /// Gender picker is open
    PickingGender,
    /// A row or import dialog is open
    InDialog,
    /// Typing a URL to open
    OpeningUrl,
    /// Viewing help
    Help,
    /// Confirming an action
    Confirming(String),
}

#[derive(Debug, Clone)]
pub enum Dialog {
    Edit(EditDialog),
    Delete(DeleteDialog),
    Import(ImportDialog),
}

impl Dialog {
    fn state_mut(&mut self) -> &mut MutationState {
        match self {
            Dialog::Edit(d) => &mut d.state,
            Dialog::Delete(d) => &mut d.state,
            Dialog::Import(d) => &mut d.state,
        }
    }
}

/// Work the runner performs on behalf of the app.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchList(FetchTicket),
    FetchStatistics,
    /// Like `FetchList`, skipping any cached page.
    RefreshList(FetchTicket),
    RefreshStatistics,
    /// Restart the search debounce window with this text.
    ScheduleSearch(String),
    /// Fire the pending search now.
    FlushSearch,
    Update {
        dialog: u64,
        id: String,
        update: PoliticianUpdate,
    },
    Delete {
        dialog: u64,
        id: String,
    },
    Import {
        dialog: u64,
        path: PathBuf,
    },
    Quit,
}

/// Completions reported back to the app.
#[derive(Debug, Clone)]
pub enum AppEvent {
    ListLoaded(FetchTicket, ApiResult<PageResult>),
    StatisticsLoaded(ApiResult<Statistics>),
    /// The search debounce fired.
    SearchFired(String),
    MutationDone { dialog: u64, outcome: MutationOutcome },
}

/// The main TUI application
pub struct App {
    pub state: AppState,
    pub route: Route,
    pub sync: SearchSync,
    pub list: ListView,
    pub statistics: StatisticsView,
    /// A list request is in flight.
    pub loading: bool,
    /// Selected row in the grid
    pub selected: usize,
    /// Highlighted option in the gender picker
    pub gender_cursor: usize,
    pub dialog: Option<Dialog>,
    /// Identity of the open dialog; responses for other ids are stale.
    dialog_id: u64,
    pub url_input: String,
    /// Status bar message
    pub status: String,
    pub endpoint: String,
    pub last_refresh: Option<String>,
}

impl App {
    pub fn new(initial_url: &str, default_per_page: u32, endpoint: &str) -> Self {
        Self {
            state: AppState::Browsing,
            route: Route::from_url(initial_url),
            sync: SearchSync::new(initial_url, default_per_page),
            list: ListView::Loading,
            statistics: StatisticsView::Loading,
            loading: false,
            selected: 0,
            gender_cursor: 0,
            dialog: None,
            dialog_id: 0,
            url_input: String::new(),
            status: "Ready".into(),
            endpoint: endpoint.into(),
            last_refresh: None,
        }
    }

    /// Effects for the first frame: load whatever the route shows.
    pub fn start(&mut self) -> Vec<Effect> {
        match self.route {
            Route::Politicians => vec![self.fetch_list()],
            Route::Statistics => vec![Effect::FetchStatistics],
        }
    }

    pub fn footer(&self) -> PaginationFooter {
        PaginationFooter::new(self.sync.pagination(), self.list.total_pages())
    }

    fn fetch_list(&mut self) -> Effect {
        self.loading = true;
        Effect::FetchList(self.sync.ticket())
    }

    fn fetch_for(&mut self, commit: Option<Commit>) -> Vec<Effect> {
        match commit {
            Some(_) => {
                self.selected = 0;
                vec![self.fetch_list()]
            }
            None => vec![],
        }
    }

    // ─── Key handling ────────────────────────────────────────────────

    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        if key.kind != KeyEventKind::Press {
            return vec![];
        }
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('d'))
        {
            if matches!(self.state, AppState::Confirming(_)) {
                return vec![Effect::Quit];
            }
            self.request_quit();
            return vec![];
        }

        match self.state.clone() {
            AppState::Browsing => self.on_browse_key(key),
            AppState::Searching => self.on_search_key(key),
            AppState::PickingGender => self.on_gender_key(key),
            AppState::InDialog => self.on_dialog_key(key),
            AppState::OpeningUrl => self.on_url_key(key),
            AppState::Help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                    self.toggle_help();
                }
                vec![]
            }
            AppState::Confirming(_) => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => vec![Effect::Quit],
                KeyCode::Char('n') | KeyCode::Esc => {
                    self.confirm_quit(false);
                    vec![]
                }
                _ => vec![],
            },
        }
    }

    fn on_browse_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Char('q') => {
                self.request_quit();
                return vec![];
            }
            KeyCode::Char('?') | KeyCode::F(1) => {
                self.toggle_help();
                return vec![];
            }
            KeyCode::Tab => return self.switch_route(self.route.toggle()),
            KeyCode::Char('o') => {
                self.url_input = self.current_url();
                self.state = AppState::OpeningUrl;
                return vec![];
            }
            KeyCode::Char('i') => {
                self.open_dialog(Dialog::Import(ImportDialog::new()));
                return vec![];
            }
            _ => {}
        }

        if self.route == Route::Statistics {
            return match key.code {
                KeyCode::Char('r') => vec![Effect::RefreshStatistics],
                _ => vec![],
            };
        }

        match key.code {
            KeyCode::Char('/') => {
                self.state = AppState::Searching;
                vec![]
            }
            KeyCode::Char('g') => {
                self.gender_cursor = self
                    .sync
                    .current()
                    .gender
                    .and_then(|g| Gender::ALL.iter().position(|o| *o == g))
                    .unwrap_or(0);
                self.state = AppState::PickingGender;
                vec![]
            }
            KeyCode::Right | KeyCode::Char('n') => self.next_page(),
            KeyCode::Left | KeyCode::Char('p') => self.previous_page(),
            KeyCode::Char('s') => {
                let state = self.sync.pagination();
                let resized = state.resized(next_page_size(state.page_size));
                let commit = self.sync.on_pagination_change(resized);
                self.fetch_for(commit)
            }
            KeyCode::Char('b') => {
                let commit = self.sync.back();
                self.fetch_for(commit)
            }
            KeyCode::Char('f') => {
                let commit = self.sync.forward();
                self.fetch_for(commit)
            }
            KeyCode::Char('r') => {
                self.loading = true;
                vec![Effect::RefreshList(self.sync.ticket())]
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                vec![]
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let rows = self.list.rows().len();
                if self.selected + 1 < rows {
                    self.selected += 1;
                }
                vec![]
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(p) = self.list.rows().get(self.selected).cloned() {
                    self.open_dialog(Dialog::Edit(EditDialog::new(p)));
                }
                vec![]
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(p) = self.list.rows().get(self.selected) {
                    let dialog = DeleteDialog::new(p);
                    self.open_dialog(Dialog::Delete(dialog));
                }
                vec![]
            }
            _ => vec![],
        }
    }

    pub fn next_page(&mut self) -> Vec<Effect> {
        if !self.footer().can_next {
            return vec![];
        }
        let next = self.sync.pagination().next();
        let commit = self.sync.on_pagination_change(next);
        self.fetch_for(commit)
    }

    pub fn previous_page(&mut self) -> Vec<Effect> {
        if !self.footer().can_previous {
            return vec![];
        }
        let previous = self.sync.pagination().previous();
        let commit = self.sync.on_pagination_change(previous);
        self.fetch_for(commit)
    }

    fn switch_route(&mut self, route: Route) -> Vec<Effect> {
        self.route = route;
        match route {
            Route::Politicians => vec![self.fetch_list()],
            Route::Statistics => vec![Effect::FetchStatistics],
        }
    }

    fn on_search_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        let mut text = self.sync.search_text().to_string();
        match key.code {
            KeyCode::Char(c) => text.push(c),
            KeyCode::Backspace => {
                if text.pop().is_none() {
                    return vec![];
                }
            }
            KeyCode::Enter => {
                self.state = AppState::Browsing;
                return vec![Effect::FlushSearch];
            }
            KeyCode::Esc | KeyCode::Down | KeyCode::Tab => {
                self.state = AppState::Browsing;
                return vec![];
            }
            _ => return vec![],
        }
        self.sync.on_search_input(&text);
        vec![Effect::ScheduleSearch(text)]
    }

    fn on_gender_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        let options = Gender::ALL.len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.gender_cursor = (self.gender_cursor + options - 1) % options;
                vec![]
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.gender_cursor = (self.gender_cursor + 1) % options;
                vec![]
            }
            KeyCode::Enter => {
                self.state = AppState::Browsing;
                let value = Gender::ALL[self.gender_cursor].as_str();
                self.select_gender(value)
            }
            KeyCode::Esc => {
                self.state = AppState::Browsing;
                vec![]
            }
            _ => vec![],
        }
    }

    /// Apply a picker value. Empty or unknown values change nothing.
    pub fn select_gender(&mut self, value: &str) -> Vec<Effect> {
        let commit = self.sync.select_gender(value);
        self.fetch_for(commit)
    }

    fn on_url_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Char(c) => {
                self.url_input.push(c);
                vec![]
            }
            KeyCode::Backspace => {
                self.url_input.pop();
                vec![]
            }
            KeyCode::Esc => {
                self.state = AppState::Browsing;
                vec![]
            }
            KeyCode::Enter => {
                self.state = AppState::Browsing;
                let url = std::mem::take(&mut self.url_input);
                self.open_url(&url)
            }
            _ => vec![],
        }
    }

    /// Navigate to a deep link.
    pub fn open_url(&mut self, url: &str) -> Vec<Effect> {
        match Route::from_url(url) {
            Route::Statistics => self.switch_route(Route::Statistics),
            Route::Politicians => {
                let was_elsewhere = self.route != Route::Politicians;
                self.route = Route::Politicians;
                let commit = self.sync.navigate(url);
                let mut effects = self.fetch_for(commit);
                if effects.is_empty() && was_elsewhere {
                    effects.push(self.fetch_list());
                }
                effects
            }
        }
    }

    pub fn current_url(&self) -> String {
        match self.route {
            Route::Politicians => self.sync.current_url().to_string(),
            Route::Statistics => Route::Statistics.path().to_string(),
        }
    }

    // ─── Dialogs ─────────────────────────────────────────────────────

    fn open_dialog(&mut self, dialog: Dialog) {
        self.dialog_id += 1;
        self.dialog = Some(dialog);
        self.state = AppState::InDialog;
    }

    pub fn close_dialog(&mut self) {
        self.dialog = None;
        self.state = AppState::Browsing;
    }

    pub fn dialog_id(&self) -> u64 {
        self.dialog_id
    }

    fn on_dialog_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        if key.code == KeyCode::Esc {
            self.close_dialog();
            return vec![];
        }

        let dialog_id = self.dialog_id;
        let Some(dialog) = self.dialog.as_mut() else {
            self.state = AppState::Browsing;
            return vec![];
        };

        match dialog {
            Dialog::Edit(edit) => match key.code {
                KeyCode::Tab | KeyCode::Down => edit.focus_next(),
                KeyCode::BackTab | KeyCode::Up => edit.focus_previous(),
                KeyCode::Backspace => edit.pop_char(),
                KeyCode::Char(c) => edit.push_char(c),
                KeyCode::Enter => {
                    return match edit.submit() {
                        Submit::Send((id, update)) => vec![Effect::Update {
                            dialog: dialog_id,
                            id,
                            update,
                        }],
                        Submit::Unchanged => {
                            self.close_dialog();
                            vec![]
                        }
                        Submit::Refused | Submit::Invalid(_) => vec![],
                    };
                }
                _ => {}
            },
            Dialog::Delete(delete) => match key.code {
                KeyCode::Enter | KeyCode::Char('y') => {
                    if let Submit::Send(id) = delete.submit() {
                        return vec![Effect::Delete {
                            dialog: dialog_id,
                            id,
                        }];
                    }
                }
                KeyCode::Char('n') => self.close_dialog(),
                _ => {}
            },
            Dialog::Import(import) => match key.code {
                KeyCode::Char(c) => import.push_char(c),
                KeyCode::Backspace => import.pop_char(),
                KeyCode::Enter => {
                    if let Submit::Send(path) = import.submit() {
                        return vec![Effect::Import {
                            dialog: dialog_id,
                            path,
                        }];
                    }
                }
                _ => {}
            },
        }
        vec![]
    }

    // ─── Completions ─────────────────────────────────────────────────

    pub fn handle_event(&mut self, event: AppEvent) -> Vec<Effect> {
        match event {
            AppEvent::ListLoaded(ticket, result) => {
                if !self.sync.accepts(&ticket) {
                    warn!(
                        "discarding stale response r{} for {}",
                        ticket.revision, ticket.descriptor
                    );
                    return vec![];
                }
                self.loading = false;
                if let Err(e) = &result {
                    self.status = e.user_message();
                }
                self.list = ListView::from_result(result);
                let rows = self.list.rows().len();
                self.selected = self.selected.min(rows.saturating_sub(1));
                self.last_refresh = Some(chrono::Local::now().format("%H:%M:%S").to_string());
                vec![]
            }
            AppEvent::StatisticsLoaded(result) => {
                self.statistics = StatisticsView::from_result(result);
                vec![]
            }
            AppEvent::SearchFired(term) => {
                let commit = self.sync.commit_search(&term);
                self.fetch_for(commit)
            }
            AppEvent::MutationDone { dialog, outcome } => self.on_mutation_done(dialog, outcome),
        }
    }

    fn on_mutation_done(&mut self, dialog: u64, outcome: MutationOutcome) -> Vec<Effect> {
        let succeeded = matches!(outcome, MutationOutcome::Done(_));
        self.status = match &outcome {
            MutationOutcome::Done(message) | MutationOutcome::Failed(message) => message.clone(),
        };

        if dialog == self.dialog_id {
            if let Some(open) = self.dialog.as_mut() {
                if open.state_mut().settle(&outcome) {
                    self.close_dialog();
                }
            }
        } else {
            debug!("dialog {} already closed, dropping its result", dialog);
        }

        if !succeeded {
            return vec![];
        }
        // Lists requested before the change would show deleted or
        // outdated rows.
        self.sync.mark_data_changed();
        let mut effects = vec![self.fetch_list()];
        if self.route == Route::Statistics {
            effects.push(Effect::FetchStatistics);
        }
        effects
    }

    // ─── Quit & help ─────────────────────────────────────────────────

    /// Request quit. Always asks first.
    pub fn request_quit(&mut self) {
        let pending = self
            .dialog
            .as_mut()
            .map(|d| d.state_mut().is_pending())
            .unwrap_or(false);
        let message = if pending {
            "A change is still being saved. Quit anyway? (y/n)"
        } else {
            "Quit politicos? (y/n)"
        };
        self.state = AppState::Confirming(message.into());
    }

    /// Handle a confirmation response. Returns true if the user confirmed.
    pub fn confirm_quit(&mut self, confirmed: bool) -> bool {
        if confirmed {
            return true;
        }
        self.state = if self.dialog.is_some() {
            AppState::InDialog
        } else {
            AppState::Browsing
        };
        false
    }

    pub fn toggle_help(&mut self) {
        self.state = if self.state == AppState::Help {
            AppState::Browsing
        } else {
            AppState::Help
        };
    }

    // ─── Rendering ───────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = standard_layout(area);

        self.render_header(frame, chunks[0]);
        match self.route {
            Route::Politicians => self.render_politicians(frame, chunks[1]),
            Route::Statistics => self.render_statistics(frame, chunks[1]),
        }
        self.render_status_bar(frame, chunks[2]);

        match &self.state {
            AppState::PickingGender => self.render_gender_picker(frame, area),
            AppState::InDialog => self.render_dialog(frame, area),
            AppState::OpeningUrl => self.render_url_prompt(frame, area),
            AppState::Help => self.render_help(frame, area),
            AppState::Confirming(msg) => self.render_confirm(frame, area, msg),
            _ => {}
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = Route::ALL
            .iter()
            .map(|r| Line::from(format!(" {} ", r.title())))
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.route.index())
            .style(TuiPalette::muted_style())
            .highlight_style(TuiPalette::title_style())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(TuiPalette::border_style())
                    .title(Span::styled(" politicos ", TuiPalette::title_style())),
            );
        frame.render_widget(tabs, area);
    }

    fn render_politicians(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search & filter
                Constraint::Min(3),    // Grid
                Constraint::Length(1), // Pagination
            ])
            .split(area);

        self.render_toolbar(frame, chunks[0]);
        match &self.list {
            ListView::Loading => {
                let p = Paragraph::new("Loading...").style(TuiPalette::muted_style());
                frame.render_widget(p, chunks[1]);
            }
            ListView::Rows(page) => self.render_grid(frame, chunks[1], page),
            ListView::Empty { .. } => self.render_empty(frame, chunks[1]),
            ListView::Error(message) => render_error_box(frame, chunks[1], message),
        }
        self.render_pagination(frame, chunks[2]);
    }

    fn render_toolbar(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(area);

        let searching = self.state == AppState::Searching;
        let search_block = Block::default()
            .borders(Borders::ALL)
            .border_style(if searching {
                TuiPalette::focused_border_style()
            } else {
                TuiPalette::border_style()
            })
            .title(" / Search ");
        let text = self.sync.search_text();
        let search = if text.is_empty() {
            Paragraph::new(SEARCH_PLACEHOLDER).style(TuiPalette::muted_style())
        } else {
            Paragraph::new(text.to_string())
        };
        let inner = search_block.inner(chunks[0]);
        frame.render_widget(search.block(search_block), chunks[0]);
        if searching {
            let x = chunks[0].x + 1 + text.chars().count() as u16;
            frame.set_cursor_position((x.min(chunks[0].right().saturating_sub(2)), inner.y));
        }

        let gender = self
            .sync
            .current()
            .gender
            .map(|g| g.as_str().to_string())
            .unwrap_or_else(|| "-".to_string());
        let picker = Paragraph::new(gender).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(TuiPalette::border_style())
                .title(format!(" g {} ", GENDER_PICKER_LABEL)),
        );
        frame.render_widget(picker, chunks[1]);
    }

    fn render_grid(&self, frame: &mut Frame, area: Rect, page: &PageResult) {
        let header = Row::new(COLUMNS.iter().map(|c| {
            let line = Line::from(c.header);
            Cell::from(match c.align {
                Align::Right => line.alignment(Alignment::Right),
                Align::Left => line,
            })
        }))
        .style(TuiPalette::header_style());

        let rows = page.records.iter().map(|p| {
            Row::new(
                row_cells(p)
                    .into_iter()
                    .zip(COLUMNS.iter())
                    .map(|(text, column)| {
                        let line = Line::from(text);
                        Cell::from(match column.align {
                            Align::Right => line.alignment(Alignment::Right),
                            Align::Left => line,
                        })
                    }),
            )
        });

        let widths = COLUMNS.iter().map(|c| Constraint::Fill(c.weight));
        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(TuiPalette::selected_style())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(TuiPalette::border_style()),
            );

        let mut state = TableState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_empty(&self, frame: &mut Frame, area: Rect) {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(EMPTY_MESSAGE, TuiPalette::title_style())),
            Line::from(""),
            Line::from(vec![
                Span::styled("i ", TuiPalette::key_style()),
                Span::styled(ImportDialog::new().button_label(), TuiPalette::muted_style()),
            ]),
        ];
        let p = Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(TuiPalette::border_style()),
        );
        frame.render_widget(p, area);
    }

    fn render_pagination(&self, frame: &mut Frame, area: Rect) {
        let footer = self.footer();
        let nav_style = |enabled: bool| {
            if enabled {
                TuiPalette::key_style()
            } else {
                TuiPalette::muted_style()
            }
        };
        let mut spans = vec![
            Span::styled(" ‹ p ", nav_style(footer.can_previous)),
            Span::raw(footer.label()),
            Span::styled(" n › ", nav_style(footer.can_next)),
            Span::styled(format!("│ {} per page (s) ", footer.page_size), TuiPalette::muted_style()),
        ];
        if self.loading {
            spans.push(Span::styled("│ loading…", TuiPalette::muted_style()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_statistics(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(TuiPalette::border_style())
            .title(" Statistics ");

        let lines = match &self.statistics {
            StatisticsView::Loading => vec![Line::from(Span::styled(
                "Loading...",
                TuiPalette::muted_style(),
            ))],
            StatisticsView::Empty => vec![
                Line::from(""),
                Line::from(Span::styled(EMPTY_MESSAGE, TuiPalette::title_style())),
            ],
            StatisticsView::Summary { mean, median, top } => {
                let mut lines = vec![
                    Line::from(Span::styled(mean.clone(), TuiPalette::title_style())),
                    Line::from(Span::styled(MEAN_LABEL, TuiPalette::muted_style())),
                    Line::from(""),
                    Line::from(Span::styled(median.clone(), TuiPalette::title_style())),
                    Line::from(Span::styled(MEDIAN_LABEL, TuiPalette::muted_style())),
                    Line::from(""),
                    Line::from(Span::styled(
                        TOP_HEADING,
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                ];
                for entry in top {
                    lines.push(Line::from(vec![
                        Span::styled(format!("#{:<3}", entry.rank), TuiPalette::success_style()),
                        Span::styled(format!("{:<40}", entry.name), Style::default()),
                        Span::styled(format!("{:<30}", entry.role), TuiPalette::muted_style()),
                        Span::styled(entry.annual_pay.clone(), TuiPalette::title_style()),
                    ]));
                }
                lines
            }
        };
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let refreshed = self
            .last_refresh
            .as_deref()
            .map(|t| format!(" │ {}", t))
            .unwrap_or_default();
        let text = format!(
            " {} │ {}{} │ {} │ ? Help │ q Quit ",
            self.current_url(),
            self.status,
            refreshed,
            self.endpoint
        );
        frame.render_widget(Paragraph::new(text).style(TuiPalette::muted_style()), area);
    }

    fn render_gender_picker(&self, frame: &mut Frame, area: Rect) {
        let picker_area = overlay_area(area, 30, (Gender::ALL.len() + 2) as u16);
        frame.render_widget(Clear, picker_area);

        let items: Vec<ListItem> = Gender::ALL
            .iter()
            .map(|g| ListItem::new(g.as_str()))
            .collect();
        let list = List::new(items)
            .highlight_style(TuiPalette::selected_style())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(TuiPalette::focused_border_style())
                    .title(format!(" {} ", GENDER_PICKER_LABEL)),
            );
        let mut state = ListState::default().with_selected(Some(self.gender_cursor));
        frame.render_stateful_widget(list, picker_area, &mut state);
    }

    fn render_dialog(&self, frame: &mut Frame, area: Rect) {
        let Some(dialog) = &self.dialog else {
            return;
        };
        let (title, mut lines, state) = match dialog {
            Dialog::Edit(edit) => {
                let mut lines = Vec::new();
                for (field, value) in edit.fields() {
                    let focused = field == edit.focused();
                    let label_style = if focused {
                        TuiPalette::key_style()
                    } else {
                        TuiPalette::muted_style()
                    };
                    let shown = if value.is_empty() {
                        Span::styled(field.placeholder(), TuiPalette::muted_style())
                    } else {
                        Span::raw(value.to_string())
                    };
                    lines.push(Line::from(vec![
                        Span::styled(format!("{:<22}", field.label()), label_style),
                        shown,
                    ]));
                }
                lines.push(Line::from(""));
                lines.push(Line::from(vec![
                    Span::styled("Enter ", TuiPalette::key_style()),
                    Span::styled(edit.confirm_label(), TuiPalette::muted_style()),
                    Span::styled("  Esc ", TuiPalette::key_style()),
                    Span::styled("Cancel", TuiPalette::muted_style()),
                ]));
                (edit.title(), lines, &edit.state)
            }
            Dialog::Delete(delete) => {
                let lines = vec![
                    Line::from(Span::raw(delete.name.clone())),
                    Line::from(""),
                    Line::from(Span::styled(DELETE_DESCRIPTION, TuiPalette::muted_style())),
                    Line::from(""),
                    Line::from(vec![
                        Span::styled("y ", TuiPalette::key_style()),
                        Span::styled(delete.confirm_label(), TuiPalette::muted_style()),
                        Span::styled("  n/Esc ", TuiPalette::key_style()),
                        Span::styled("Cancel", TuiPalette::muted_style()),
                    ]),
                ];
                (DELETE_TITLE.to_string(), lines, &delete.state)
            }
            Dialog::Import(import) => {
                let shown = if import.path.is_empty() {
                    Span::styled("path/to/politicians.csv", TuiPalette::muted_style())
                } else {
                    Span::raw(import.path.clone())
                };
                let lines = vec![
                    Line::from(vec![Span::styled("File: ", TuiPalette::key_style()), shown]),
                    Line::from(""),
                    Line::from(vec![
                        Span::styled("Enter ", TuiPalette::key_style()),
                        Span::styled(import.button_label(), TuiPalette::muted_style()),
                        Span::styled("  Esc ", TuiPalette::key_style()),
                        Span::styled("Cancel", TuiPalette::muted_style()),
                    ]),
                ];
                ("Import CSV".to_string(), lines, &import.state)
            }
        };

        if let Some(error) = state.error() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("{} {}", ERROR_HEADING, error),
                TuiPalette::error_style(),
            )));
        }

        let height = lines.len() as u16 + 3;
        let dialog_area = overlay_area(area, 90, height);
        frame.render_widget(Clear, dialog_area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(TuiPalette::focused_border_style())
            .title(Span::styled(format!(" {} ", title), TuiPalette::title_style()));
        frame.render_widget(
            Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
            dialog_area,
        );
    }

    fn render_url_prompt(&self, frame: &mut Frame, area: Rect) {
        let prompt_area = overlay_area(area, 80, 3);
        frame.render_widget(Clear, prompt_area);
        let p = Paragraph::new(self.url_input.clone()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(TuiPalette::focused_border_style())
                .title(" Open URL "),
        );
        frame.render_widget(p, prompt_area);
    }

    fn render_help(&self, frame: &mut Frame, area: Rect) {
        let shortcuts = [
            ("Tab", "Politicians / Statistics"),
            ("/", "Search by name"),
            ("g", "Filter by gender"),
            ("← → p n", "Previous / next page"),
            ("s", "Change page size"),
            ("↑ ↓ j k", "Select row"),
            ("e Enter", "Edit selected row"),
            ("d", "Delete selected row"),
            ("i", "Import CSV"),
            ("b f", "History back / forward"),
            ("o", "Open URL"),
            ("r", "Refresh"),
            ("q", "Quit"),
        ];

        let mut lines = vec![Line::from("")];
        for (key, action) in shortcuts {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<11}", key), TuiPalette::key_style()),
                Span::styled(action, TuiPalette::muted_style()),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  Press Esc or ? to close",
            Style::default()
                .fg(TuiPalette::STONE)
                .add_modifier(Modifier::ITALIC),
        )));

        let help_area = overlay_area(area, 50, lines.len() as u16 + 2);
        frame.render_widget(Clear, help_area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(TuiPalette::title_style())
            .title(" Keyboard Shortcuts ");
        frame.render_widget(Paragraph::new(lines).block(block), help_area);
    }

    fn render_confirm(&self, frame: &mut Frame, area: Rect, message: &str) {
        let confirm_area = overlay_area(area, 56, 6);
        frame.render_widget(Clear, confirm_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(TuiPalette::focused_border_style())
            .title(Span::styled(" Confirm ", TuiPalette::title_style()));

        let lines = vec![
            Line::from(""),
            Line::from(format!("  {}", message)),
            Line::from(""),
            Line::from(vec![
                Span::styled("  y", TuiPalette::key_style()),
                Span::styled(" Yes  ", TuiPalette::muted_style()),
                Span::styled("n/Esc", TuiPalette::key_style()),
                Span::styled(" Cancel", TuiPalette::muted_style()),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines).block(block), confirm_area);
    }
}

fn render_error_box(frame: &mut Frame, area: Rect, message: &str) {
    let lines = vec![
        Line::from(Span::styled(ERROR_HEADING, TuiPalette::error_style().add_modifier(Modifier::BOLD))),
        Line::from(message.to_string()),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(TuiPalette::error_style());
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
