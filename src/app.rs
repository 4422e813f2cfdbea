//! Main application state and event handling.
//!
//! This module implements The Elm Architecture (TEA) pattern for predictable
//! state management in the TUI application. Repository calls are never made
//! from here: the app records pending operations which the main loop takes
//! and hands to a [`TaskSpawner`](crate::tasks::TaskSpawner), and results come
//! back through [`App::handle_api_message`].

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracing::{debug, error, info, trace, warn};

use crate::api::{Bug, ReferenceOptions};
use crate::config::{Config, ThemePreference};
use crate::error::AppError;
use crate::events::Event;
use crate::form::{FormMode, FormState, Generation, Submission};
use crate::tasks::ApiMessage;
use crate::ui::{
    init_theme, render_hints, theme, BugFormAction, BugFormView, ListAction, ListView,
    LoadingIndicator, NotificationManager, FORM_HINTS, LIST_HINTS,
};

/// Generation used for the list's own lookup load. Form loads start at 1.
const LOOKUP_GENERATION: Generation = 0;

const LOADING_BUGS: &str = "Loading bugs...";
const SAVING_BUG: &str = "Saving bug...";

/// The main application struct that holds all state.
pub struct App {
    should_quit: bool,
    config: Config,
    /// Where theme changes are persisted; `None` keeps them in memory.
    config_path: Option<PathBuf>,
    bugs: Vec<Bug>,
    /// Reference lists used to show names in the list.
    lookups: ReferenceOptions,
    list_view: ListView,
    form_view: BugFormView,
    notifications: NotificationManager,
    loading: LoadingIndicator,
    pending_fetch: bool,
    pending_options: Vec<Generation>,
    pending_submission: Option<Submission>,
    /// Bug to select once the next list fetch lands.
    select_after_fetch: Option<String>,
}

impl App {
    /// Create the app. The initial list fetch and lookup load are queued.
    pub fn new(config: Config, config_path: Option<PathBuf>) -> Self {
        let form_view =
            BugFormView::new(FormState::new(config.settings.current_user.clone()));
        let mut app = Self {
            should_quit: false,
            config,
            config_path,
            bugs: Vec::new(),
            lookups: ReferenceOptions::default(),
            list_view: ListView::new(),
            form_view,
            notifications: NotificationManager::new(),
            loading: LoadingIndicator::new(),
            pending_fetch: false,
            pending_options: vec![LOOKUP_GENERATION],
            pending_submission: None,
            select_after_fetch: None,
        };
        app.request_refresh();
        app
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn bugs(&self) -> &[Bug] {
        &self.bugs
    }

    pub fn form_view(&self) -> &BugFormView {
        &self.form_view
    }

    pub fn list_view(&self) -> &ListView {
        &self.list_view
    }

    pub fn notifications(&self) -> &NotificationManager {
        &self.notifications
    }

    pub fn loading(&self) -> &LoadingIndicator {
        &self.loading
    }

    /// Take the pending list fetch, if any.
    pub fn take_pending_fetch(&mut self) -> bool {
        std::mem::take(&mut self.pending_fetch)
    }

    /// Take the pending option loads.
    pub fn take_pending_options(&mut self) -> Vec<Generation> {
        std::mem::take(&mut self.pending_options)
    }

    /// Take the pending save.
    pub fn take_pending_submission(&mut self) -> Option<Submission> {
        self.pending_submission.take()
    }

    /// Show a toast for an error.
    pub fn handle_error(&mut self, error: &AppError) {
        if error.is_critical() {
            error!(error = %error, "Critical error");
            self.notifications.error(error.user_message());
        } else if error.is_recoverable() {
            warn!(error = %error, "Recoverable error");
            self.notifications.warning(error.user_message());
        } else {
            warn!(error = %error, "Error");
            self.notifications.error(error.user_message());
        }
    }

    fn request_refresh(&mut self) {
        if self.pending_fetch {
            return;
        }
        self.pending_fetch = true;
        self.loading.start(LOADING_BUGS);
    }

    /// Update the application state based on an event.
    pub fn update(&mut self, event: Event) {
        match event {
            Event::Key(key) => {
                trace!(key = ?key.code, modifiers = ?key.modifiers, "Key event");
                self.handle_key_event(key);
            }
            Event::Paste(text) => {
                if self.form_view.is_open() {
                    self.form_view.handle_paste(&text);
                }
            }
            Event::Resize(width, height) => {
                trace!(width, height, "Terminal resize event");
            }
            Event::Tick => {
                self.loading.tick();
                self.notifications.tick();
            }
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            info!("Quit requested with Ctrl-C");
            self.should_quit = true;
            return;
        }

        if self.form_view.is_open() {
            match self.form_view.handle_input(key) {
                Some(BugFormAction::Cancel) => self.form_view.close(),
                Some(BugFormAction::Submit(submission)) => self.begin_save(submission),
                Some(BugFormAction::Rejected(e)) => self.handle_error(&AppError::from(e)),
                None => {}
            }
            return;
        }

        match self.list_view.handle_input(key, &self.bugs) {
            Some(ListAction::EditBug(bug)) => {
                info!(id = %bug.id, "Opening bug for edit");
                let generation = self.form_view.open_edit(bug);
                self.pending_options.push(generation);
            }
            Some(ListAction::NewBug) => {
                info!("Opening new bug form");
                let generation = self.form_view.open_create();
                self.pending_options.push(generation);
            }
            Some(ListAction::Refresh) => self.request_refresh(),
            Some(ListAction::CycleTheme) => self.cycle_theme(),
            Some(ListAction::Quit) => {
                info!("Quit requested");
                self.should_quit = true;
            }
            None => {}
        }
    }

    fn begin_save(&mut self, submission: Submission) {
        debug!(title = submission.title(), "Queueing save");
        self.form_view.set_loading(true);
        self.loading.start(SAVING_BUG);
        self.pending_submission = Some(submission);
    }

    fn cycle_theme(&mut self) {
        let preference = self.config.settings.theme.next();
        self.set_theme(preference);
        self.notifications
            .info(format!("Theme: {}", preference.display_name()));
    }

    /// Apply and persist a theme preference.
    pub fn set_theme(&mut self, preference: ThemePreference) {
        info!(theme = preference.display_name(), "Theme changed");
        self.config.settings.theme = preference;
        init_theme(preference);

        if let Some(path) = &self.config_path {
            if let Err(e) = self.config.save_to(path) {
                self.handle_error(&AppError::from(e));
            }
        }
    }

    /// Apply the result of a background task.
    pub fn handle_api_message(&mut self, message: ApiMessage) {
        match message {
            ApiMessage::BugsFetched(result) => {
                self.loading.finish(LOADING_BUGS);
                match result {
                    Ok(bugs) => {
                        debug!(count = bugs.len(), "Bugs loaded");
                        self.bugs = bugs;
                        self.list_view.clamp_selection(self.bugs.len());
                        if let Some(id) = self.select_after_fetch.take() {
                            self.list_view.select_id(&self.bugs, &id);
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to load bugs");
                        self.notifications.error(format!("Failed to load bugs: {}", e));
                    }
                }
            }
            ApiMessage::OptionsLoaded { generation, result } => {
                self.handle_options(generation, result);
            }
            ApiMessage::BugCreated(result) => self.handle_saved(FormMode::Create, result),
            ApiMessage::BugUpdated(result) => self.handle_saved(FormMode::Edit, result),
        }
    }

    fn handle_options(&mut self, generation: Generation, result: Result<ReferenceOptions, String>) {
        if generation == LOOKUP_GENERATION {
            match result {
                Ok(options) => self.lookups = options,
                Err(e) => warn!(error = %e, "Failed to load list lookups"),
            }
            return;
        }

        let current =
            self.form_view.is_open() && generation == self.form_view.state().option_generation();
        let loaded = result.as_ref().ok().cloned();
        let failed = result.is_err();

        if self.form_view.apply_options(generation, result) {
            if let Some(options) = loaded {
                self.lookups = options;
            }
        } else if current && failed {
            self.notifications
                .warning("Could not load form options. The form can still be saved.");
        }
    }

    fn handle_saved(&mut self, mode: FormMode, result: Result<Bug, String>) {
        self.loading.finish(SAVING_BUG);
        match result {
            Ok(bug) => {
                let verb = match mode {
                    FormMode::Create => "created",
                    FormMode::Edit => "updated",
                };
                info!(id = %bug.id, verb, "Bug saved");
                self.notifications.success(format!("Bug {} {}", bug.id, verb));
                self.form_view.close();
                self.select_after_fetch = Some(bug.id);
                self.request_refresh();
            }
            Err(e) => {
                warn!(error = %e, "Failed to save bug");
                self.form_view.set_loading(false);
                self.notifications.error(format!("Failed to save bug: {}", e));
            }
        }
    }

    /// Render the application UI.
    pub fn view(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::vertical([
            Constraint::Length(1), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Footer
        ])
        .split(area);

        self.render_header(frame, chunks[0]);
        self.list_view.render(
            frame,
            chunks[1],
            &self.bugs,
            &self.lookups,
            !self.form_view.is_open(),
        );
        self.form_view.render(frame, chunks[1]);

        let hints = if self.form_view.is_open() { FORM_HINTS } else { LIST_HINTS };
        render_hints(frame, chunks[2], hints);

        self.notifications.render(frame, area);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let t = theme();
        let title = Line::from(vec![
            Span::styled(" bugdesk ", Style::default().fg(t.accent).add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("· {} ", self.config.settings.current_user),
                Style::default().fg(t.muted),
            ),
        ]);
        frame.render_widget(
            Paragraph::new(title).block(Block::default().borders(Borders::NONE)),
            area,
        );
        self.loading.render(frame, area);
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(Config::default(), None)
    }
}
