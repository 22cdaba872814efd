use crossterm::event::KeyCode;
use registry_core::logging::ActivityLogger;
use registry_core::{
    AppEvent, Coordinator, DashboardTab, Intent, NavigationState, Notice, PhotoSource, Role,
    SharedConnectivity, Species, SubmissionStatus,
};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};

pub const TOAST_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginFocus {
    #[default]
    Roles,
    Phone,
}

#[derive(Debug, Clone, Default)]
pub struct LoginUi {
    pub focus: LoginFocus,
    pub cursor: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureField {
    #[default]
    Photo,
    Contributor,
    Species,
    Count,
    Location,
    Coordinates,
    Notes,
    Submit,
}

impl CaptureField {
    pub const ALL: [CaptureField; 8] = [
        CaptureField::Photo,
        CaptureField::Contributor,
        CaptureField::Species,
        CaptureField::Count,
        CaptureField::Location,
        CaptureField::Coordinates,
        CaptureField::Notes,
        CaptureField::Submit,
    ];

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub notice: Notice,
    pub shown_at: Instant,
}

pub struct App {
    pub coordinator: Coordinator,
    events: UnboundedReceiver<AppEvent>,
    network: SharedConnectivity,
    photos: Arc<dyn PhotoSource>,
    activity: Option<ActivityLogger>,
    last_state: NavigationState,

    // UI State
    pub login_ui: LoginUi,
    pub capture_focus: CaptureField,
    pub photo_prompt: Option<String>,
    pub toast: Option<Toast>,
    pub last_error: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        coordinator: Coordinator,
        events: UnboundedReceiver<AppEvent>,
        network: SharedConnectivity,
        photos: Arc<dyn PhotoSource>,
    ) -> Self {
        let last_state = coordinator.state();
        Self {
            coordinator,
            events,
            network,
            photos,
            activity: None,
            last_state,
            login_ui: LoginUi::default(),
            capture_focus: CaptureField::default(),
            photo_prompt: None,
            toast: None,
            last_error: None,
            should_quit: false,
        }
    }

    pub fn with_activity_logger(mut self, logger: ActivityLogger) -> Self {
        self.activity = Some(logger);
        self
    }

    pub fn is_online(&self) -> bool {
        self.coordinator.is_online()
    }

    pub async fn handle_input(&mut self, key: KeyCode) {
        if key == KeyCode::F(2) {
            let online = self.network.toggle();
            info!("Network switched {}", if online { "online" } else { "offline" });
        } else if self.photo_prompt.is_some() {
            self.handle_photo_prompt(key).await;
        } else {
            match self.coordinator.state() {
                NavigationState::LoggedOut => self.handle_login(key),
                NavigationState::Dashboard => self.handle_dashboard(key),
                NavigationState::Capturing => self.handle_capture(key),
            }
        }
        self.after_update().await;
    }

    /// Applies timer events and expires the toast.
    pub async fn on_tick(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            if let Some(resolution) = self.coordinator.handle_event(event) {
                if let Some(log) = &self.activity {
                    report(
                        log.log_submission_resolved(
                            resolution.status.as_str(),
                            &resolution.completed.plant_name,
                            &resolution.completed.location,
                        )
                        .await,
                    );
                }
            }
        }
        if self
            .toast
            .as_ref()
            .is_some_and(|t| t.shown_at.elapsed() >= TOAST_TTL)
        {
            self.toast = None;
        }
        self.after_update().await;
    }

    fn handle_login(&mut self, key: KeyCode) {
        let Some(login) = self.coordinator.login_screen_mut() else {
            return;
        };

        if login.otp_sent() {
            match key {
                KeyCode::Char(c) => login.push_otp_char(c),
                KeyCode::Backspace => login.pop_otp_char(),
                KeyCode::Esc => login.back_to_phone_entry(),
                KeyCode::Enter => {
                    self.coordinator.verify_otp();
                }
                _ => {}
            }
            return;
        }

        match (self.login_ui.focus, key) {
            (_, KeyCode::Esc) => self.should_quit = true,
            (LoginFocus::Roles, KeyCode::Up) => {
                let len = Role::ALL.len();
                self.login_ui.cursor = (self.login_ui.cursor + len - 1) % len;
            }
            (LoginFocus::Roles, KeyCode::Down) => {
                self.login_ui.cursor = (self.login_ui.cursor + 1) % Role::ALL.len();
            }
            (LoginFocus::Roles, KeyCode::Enter | KeyCode::Char(' ')) => {
                login.select_role(Role::ALL[self.login_ui.cursor]);
                self.login_ui.focus = LoginFocus::Phone;
            }
            (LoginFocus::Roles, KeyCode::Tab) => self.login_ui.focus = LoginFocus::Phone,
            (LoginFocus::Phone, KeyCode::Tab | KeyCode::BackTab | KeyCode::Up) => {
                self.login_ui.focus = LoginFocus::Roles
            }
            (LoginFocus::Phone, KeyCode::Char(c)) => login.push_phone_char(c),
            (LoginFocus::Phone, KeyCode::Backspace) => login.pop_phone_char(),
            (LoginFocus::Phone, KeyCode::Enter) => {
                login.send_otp();
            }
            _ => {}
        }
    }

    fn handle_dashboard(&mut self, key: KeyCode) {
        let intent = match key {
            KeyCode::Enter | KeyCode::Char('c') => Some(Intent::StartCapture),
            KeyCode::Char('l') => Some(Intent::Logout),
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                None
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
                if let Some(dash) = self.coordinator.dashboard_mut() {
                    dash.select_tab(dash.tab.toggle());
                }
                None
            }
            KeyCode::Char('1') => {
                if let Some(dash) = self.coordinator.dashboard_mut() {
                    dash.select_tab(DashboardTab::Overview);
                }
                None
            }
            KeyCode::Char('2') => {
                if let Some(dash) = self.coordinator.dashboard_mut() {
                    dash.select_tab(DashboardTab::History);
                }
                None
            }
            _ => None,
        };
        if let Some(intent) = intent {
            if let Err(e) = self.coordinator.dispatch(intent) {
                warn!("Navigation failed: {}", e);
                self.last_error = Some(e.to_string());
            }
        }
    }

    fn handle_capture(&mut self, key: KeyCode) {
        let Some(status) = self.coordinator.capture_screen().map(|c| c.status()) else {
            return;
        };

        match status {
            SubmissionStatus::Submitted | SubmissionStatus::Queued => match key {
                KeyCode::Enter | KeyCode::Char('n') => {
                    self.coordinator.reset_capture();
                    self.capture_focus = CaptureField::Photo;
                }
                KeyCode::Esc | KeyCode::Char('b') => self.coordinator.back_to_dashboard(),
                _ => {}
            },
            SubmissionStatus::Uploading => {
                if key == KeyCode::Esc {
                    self.coordinator.back_to_dashboard();
                }
            }
            SubmissionStatus::Idle => self.handle_capture_form(key),
        }
    }

    fn handle_capture_form(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.coordinator.back_to_dashboard();
                return;
            }
            KeyCode::Tab | KeyCode::Down => {
                self.capture_focus = self.capture_focus.next();
                return;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.capture_focus = self.capture_focus.prev();
                return;
            }
            _ => {}
        }

        match self.capture_focus {
            CaptureField::Photo => match key {
                KeyCode::Enter => self.photo_prompt = Some(String::new()),
                KeyCode::Backspace | KeyCode::Delete => {
                    if let Some(capture) = self.coordinator.capture_screen_mut() {
                        capture.discard_photo();
                    }
                }
                _ => {}
            },
            CaptureField::Species => {
                let Some(capture) = self.coordinator.capture_screen_mut() else {
                    return;
                };
                let current = capture.draft().species;
                match key {
                    KeyCode::Right | KeyCode::Enter | KeyCode::Char(' ') => {
                        capture.set_species(Some(Species::cycle_next(current)))
                    }
                    KeyCode::Left => capture.set_species(Some(Species::cycle_prev(current))),
                    KeyCode::Backspace | KeyCode::Delete => capture.set_species(None),
                    _ => {}
                }
            }
            CaptureField::Coordinates => {
                if key == KeyCode::Enter {
                    self.coordinator.recapture_location();
                }
            }
            CaptureField::Submit => {
                if key == KeyCode::Enter {
                    self.coordinator.submit();
                }
            }
            field => self.edit_text(field, key),
        }
    }

    fn edit_text(&mut self, field: CaptureField, key: KeyCode) {
        let Some(capture) = self.coordinator.capture_screen_mut() else {
            return;
        };
        let draft = capture.draft();
        let mut value = match field {
            CaptureField::Contributor => draft.contributor_name.clone(),
            CaptureField::Count => draft.plant_count.clone(),
            CaptureField::Location => draft.location_name.clone(),
            CaptureField::Notes => draft.notes.clone(),
            _ => return,
        };
        match key {
            KeyCode::Char(c) => value.push(c),
            KeyCode::Backspace => {
                value.pop();
            }
            KeyCode::Enter => {
                self.capture_focus = self.capture_focus.next();
                return;
            }
            _ => return,
        }
        match field {
            CaptureField::Contributor => capture.set_contributor_name(value),
            CaptureField::Count => capture.set_plant_count(&value),
            CaptureField::Location => capture.set_location_name(value),
            CaptureField::Notes => capture.set_notes(value),
            _ => {}
        }
    }

    async fn handle_photo_prompt(&mut self, key: KeyCode) {
        let Some(input) = self.photo_prompt.as_mut() else {
            return;
        };
        match key {
            KeyCode::Char(c) => input.push(c),
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Esc => self.photo_prompt = None,
            KeyCode::Enter => {
                let path = input.trim().to_string();
                self.photo_prompt = None;
                match self.photos.acquire(Path::new(&path)).await {
                    Ok(Some(photo)) => {
                        self.last_error = None;
                        self.coordinator.attach_photo(photo);
                    }
                    Ok(None) => {}
                    Err(e) => {
                        warn!("Photo not loaded: {}", e);
                        if let Some(log) = &self.activity {
                            report(log.log_error(&e.to_string()).await);
                        }
                        self.last_error = Some(e.to_string());
                    }
                }
            }
            _ => {}
        }
    }

    async fn after_update(&mut self) {
        let state = self.coordinator.state();
        if state != self.last_state {
            self.on_navigation(self.last_state, state).await;
            self.last_state = state;
        }

        for notice in self.coordinator.drain_notices() {
            if let Some(log) = &self.activity {
                report(log.log_notice(&notice).await);
            }
            self.toast = Some(Toast {
                notice,
                shown_at: Instant::now(),
            });
        }
    }

    async fn on_navigation(&mut self, from: NavigationState, to: NavigationState) {
        info!("View changed: {} -> {}", from.as_str(), to.as_str());
        match to {
            NavigationState::LoggedOut => self.login_ui = LoginUi::default(),
            NavigationState::Capturing => self.capture_focus = CaptureField::Photo,
            NavigationState::Dashboard => {}
        }
        self.photo_prompt = None;
        self.last_error = None;

        let Some(log) = &self.activity else {
            return;
        };
        if from == NavigationState::LoggedOut {
            if let Some(session) = self.coordinator.session() {
                report(
                    log.log_session_started(session.role.id(), &session.phone)
                        .await,
                );
            }
        }
        if to == NavigationState::LoggedOut {
            report(log.log_session_ended().await);
        }
        report(log.log_navigation(from.as_str(), to.as_str()).await);
    }
}

fn report(result: registry_core::Result<()>) {
    if let Err(e) = result {
        warn!("Failed to write activity log: {}", e);
    }
}
