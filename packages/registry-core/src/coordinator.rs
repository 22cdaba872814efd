//! Root state container: which screen is showing and who is signed in.
//!
//! The signed-in views carry the session inside them, so a dashboard or
//! capture screen without a session cannot be represented. Logging out
//! drops the whole signed-in state, including any pending upload timer.

use crate::capture::{CaptureScreen, Resolution};
use crate::config::RegistryConfig;
use crate::dashboard::DashboardScreen;
use crate::domain::{Photo, Role, Session};
use crate::error::{RegistryError, Result};
use crate::login::LoginScreen;
use crate::notice::Notice;
use crate::platform::{Clock, Connectivity, LocationProvider};
use crate::upload::{AppEvent, UploadTicket, UploadTimer};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationState {
    LoggedOut,
    Dashboard,
    Capturing,
}

impl NavigationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            NavigationState::LoggedOut => "login",
            NavigationState::Dashboard => "dashboard",
            NavigationState::Capturing => "capture",
        }
    }
}

/// Navigation requests raised by the screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Login(Session),
    StartCapture,
    BackToDashboard,
    Logout,
}

#[derive(Debug)]
pub struct SignedIn {
    pub session: Session,
    pub dashboard: DashboardScreen,
}

#[derive(Debug)]
pub enum View {
    LoggedOut(LoginScreen),
    Dashboard(SignedIn),
    Capturing(SignedIn, CaptureScreen),
}

impl View {
    pub fn state(&self) -> NavigationState {
        match self {
            View::LoggedOut(_) => NavigationState::LoggedOut,
            View::Dashboard(_) => NavigationState::Dashboard,
            View::Capturing(..) => NavigationState::Capturing,
        }
    }
}

/// Device services the screens need.
pub struct Platform {
    pub clock: Arc<dyn Clock>,
    pub connectivity: Arc<dyn Connectivity>,
    pub gps: Box<dyn LocationProvider>,
}

pub struct Coordinator {
    view: View,
    config: RegistryConfig,
    platform: Platform,
    uploads: UploadTimer,
    notices: Vec<Notice>,
}

impl Coordinator {
    pub fn new(
        config: RegistryConfig,
        platform: Platform,
        events: UnboundedSender<AppEvent>,
    ) -> Self {
        let uploads = UploadTimer::new(config.upload_delay(), events);
        Self {
            view: View::LoggedOut(LoginScreen::new()),
            config,
            platform,
            uploads,
            notices: Vec::new(),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn state(&self) -> NavigationState {
        self.view.state()
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.view {
            View::LoggedOut(_) => None,
            View::Dashboard(s) | View::Capturing(s, _) => Some(&s.session),
        }
    }

    pub fn is_online(&self) -> bool {
        self.platform.connectivity.is_online()
    }

    pub fn login_screen(&self) -> Option<&LoginScreen> {
        match &self.view {
            View::LoggedOut(login) => Some(login),
            _ => None,
        }
    }

    pub fn login_screen_mut(&mut self) -> Option<&mut LoginScreen> {
        match &mut self.view {
            View::LoggedOut(login) => Some(login),
            _ => None,
        }
    }

    /// The signed-in dashboard, also available while capturing.
    pub fn dashboard(&self) -> Option<&DashboardScreen> {
        match &self.view {
            View::LoggedOut(_) => None,
            View::Dashboard(s) | View::Capturing(s, _) => Some(&s.dashboard),
        }
    }

    pub fn dashboard_mut(&mut self) -> Option<&mut DashboardScreen> {
        match &mut self.view {
            View::LoggedOut(_) => None,
            View::Dashboard(s) | View::Capturing(s, _) => Some(&mut s.dashboard),
        }
    }

    pub fn capture_screen(&self) -> Option<&CaptureScreen> {
        match &self.view {
            View::Capturing(_, capture) => Some(capture),
            _ => None,
        }
    }

    pub fn capture_screen_mut(&mut self) -> Option<&mut CaptureScreen> {
        match &mut self.view {
            View::Capturing(_, capture) => Some(capture),
            _ => None,
        }
    }

    fn take_view(&mut self) -> View {
        std::mem::replace(&mut self.view, View::LoggedOut(LoginScreen::new()))
    }

    pub fn login(&mut self, role: Role, phone: impl Into<String>) {
        let session = Session {
            role,
            phone: phone.into(),
        };
        info!("Session started: {} ({})", session.role, session.phone);
        self.view = View::Dashboard(SignedIn {
            session,
            dashboard: DashboardScreen::new(),
        });
    }

    /// Verifies the OTP on the login screen and signs in on success.
    pub fn verify_otp(&mut self) -> bool {
        let Some(session) = self.login_screen().and_then(|l| l.verify_otp()) else {
            return false;
        };
        self.login(session.role, session.phone);
        true
    }

    pub fn logout(&mut self) {
        if let Some(session) = self.session() {
            info!("Session ended: {}", session.phone);
        }
        self.view = View::LoggedOut(LoginScreen::new());
    }

    pub fn start_capture(&mut self) -> Result<()> {
        match self.take_view() {
            View::Dashboard(signed) => {
                debug!("Opening capture screen");
                self.view = View::Capturing(signed, CaptureScreen::new());
                Ok(())
            }
            view @ View::Capturing(..) => {
                self.view = view;
                Ok(())
            }
            view @ View::LoggedOut(_) => {
                self.view = view;
                Err(RegistryError::NotSignedIn)
            }
        }
    }

    /// Leaves the capture screen. Any upload still in flight is cancelled.
    pub fn back_to_dashboard(&mut self) {
        match self.take_view() {
            View::Capturing(signed, _capture) => {
                debug!("Returning to dashboard");
                self.view = View::Dashboard(signed);
            }
            view => self.view = view,
        }
    }

    pub fn dispatch(&mut self, intent: Intent) -> Result<()> {
        match intent {
            Intent::Login(session) => self.login(session.role, session.phone),
            Intent::StartCapture => self.start_capture()?,
            Intent::BackToDashboard => self.back_to_dashboard(),
            Intent::Logout => self.logout(),
        }
        Ok(())
    }

    /// Stores a picked photo and takes a GPS fix along with it.
    pub fn attach_photo(&mut self, photo: Photo) {
        if let View::Capturing(_, capture) = &mut self.view {
            let fix = self.platform.gps.locate();
            if let Some(notice) = capture.attach_photo(photo, fix) {
                self.notices.push(notice);
            }
        }
    }

    pub fn recapture_location(&mut self) {
        if let View::Capturing(_, capture) = &mut self.view {
            let fix = self.platform.gps.locate();
            if let Some(notice) = capture.set_location(fix) {
                self.notices.push(notice);
            }
        }
    }

    /// Validates the draft and arms the upload timer. Must run inside a
    /// tokio runtime.
    pub fn submit(&mut self) -> Option<UploadTicket> {
        let View::Capturing(_, capture) = &mut self.view else {
            return None;
        };
        match capture.submit() {
            Ok(Some(ticket)) => {
                capture.track(self.uploads.schedule(ticket));
                Some(ticket)
            }
            Ok(None) => None,
            Err(notice) => {
                self.notices.push(notice);
                None
            }
        }
    }

    /// Starts a fresh entry after a submitted or queued outcome.
    pub fn reset_capture(&mut self) {
        if let Some(capture) = self.capture_screen_mut() {
            capture.reset();
        }
    }

    /// Applies a timer event. Returns the resolution when it settled the
    /// current upload; stale events are dropped.
    pub fn handle_event(&mut self, event: AppEvent) -> Option<Resolution> {
        match event {
            AppEvent::UploadElapsed(ticket) => {
                let View::Capturing(signed, capture) = &mut self.view else {
                    debug!("Upload {:?} elapsed with no capture screen open", ticket);
                    return None;
                };
                let online = self.platform.connectivity.is_online();
                let resolution = capture.resolve(ticket, online, &self.config.location_fallback)?;
                signed
                    .dashboard
                    .record_submission(resolution.completed.clone(), self.platform.clock.now());
                self.notices.push(resolution.notice.clone());
                Some(resolution)
            }
        }
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GpsBounds;
    use crate::platform::{SharedConnectivity, SimulatedGps, SystemClock};
    use tokio::sync::mpsc::unbounded_channel;

    fn coordinator() -> Coordinator {
        let (tx, _rx) = unbounded_channel();
        let platform = Platform {
            clock: Arc::new(SystemClock),
            connectivity: Arc::new(SharedConnectivity::new(true)),
            gps: Box::new(SimulatedGps::seeded(GpsBounds::default(), 1).unwrap()),
        };
        Coordinator::new(RegistryConfig::default(), platform, tx)
    }

    #[test]
    fn test_starts_logged_out() {
        let c = coordinator();
        assert_eq!(c.state(), NavigationState::LoggedOut);
        assert!(c.session().is_none());
        assert!(c.dashboard().is_none());
    }

    #[test]
    fn test_start_capture_requires_session() {
        let mut c = coordinator();
        assert!(matches!(c.start_capture(), Err(RegistryError::NotSignedIn)));
        assert_eq!(c.state(), NavigationState::LoggedOut);
    }

    #[test]
    fn test_back_to_dashboard_without_session_stays_logged_out() {
        let mut c = coordinator();
        c.login_screen_mut().unwrap().set_phone("42");
        c.back_to_dashboard();
        assert_eq!(c.state(), NavigationState::LoggedOut);
        assert_eq!(c.login_screen().unwrap().phone(), "42");
    }

    #[test]
    fn test_round_trip_navigation() {
        let mut c = coordinator();
        c.login(Role::Farmer, "555");
        assert_eq!(c.state(), NavigationState::Dashboard);

        c.dispatch(Intent::StartCapture).unwrap();
        assert_eq!(c.state(), NavigationState::Capturing);
        assert_eq!(c.session().unwrap().phone, "555");

        c.dispatch(Intent::BackToDashboard).unwrap();
        assert_eq!(c.state(), NavigationState::Dashboard);

        c.dispatch(Intent::Logout).unwrap();
        assert_eq!(c.state(), NavigationState::LoggedOut);
        assert!(c.session().is_none());
        assert_eq!(c.login_screen().unwrap().phone(), "");
    }

    #[test]
    fn test_verify_otp_signs_in() {
        let mut c = coordinator();
        assert!(!c.verify_otp());

        let login = c.login_screen_mut().unwrap();
        login.select_role(Role::Ngo);
        login.set_phone("+91 1");
        login.send_otp();
        login.set_otp("12345");
        assert!(!c.verify_otp());

        c.login_screen_mut().unwrap().set_otp("123456");
        assert!(c.verify_otp());
        assert_eq!(c.session().unwrap().role, Role::Ngo);
    }

    #[test]
    fn test_missing_fields_emit_notice() {
        let mut c = coordinator();
        c.login(Role::Farmer, "1");
        c.start_capture().unwrap();
        assert!(c.submit().is_none());
        let notices = c.drain_notices();
        assert_eq!(notices, vec![Notice::missing_information()]);
        assert!(c.drain_notices().is_empty());
    }

    #[test]
    fn test_attach_photo_fixes_location_in_bounds() {
        let mut c = coordinator();
        c.login(Role::Farmer, "1");
        c.start_capture().unwrap();
        c.attach_photo(Photo {
            file_name: "a.jpg".to_string(),
            bytes: vec![0],
        });

        let coords = c.capture_screen().unwrap().draft().coordinates.unwrap();
        assert!(GpsBounds::default().contains(coords.lat, coords.lng));
        assert_eq!(c.drain_notices(), vec![Notice::location_captured()]);
    }
}
