use crossterm::event::KeyCode;
use registry_core::logging::ActivityLogger;
use registry_core::{
    Coordinator, FilePhotoSource, GpsBounds, NavigationState, NoticeKind, Platform,
    RegistryConfig, SharedConnectivity, SimulatedGps, Species, SubmissionStatus, SystemClock,
};
use ratatui::{Terminal, backend::TestBackend};
use registry_tui::app::{App, CaptureField};
use registry_tui::ui;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc::unbounded_channel;

fn app() -> App {
    let (tx, rx) = unbounded_channel();
    let network = SharedConnectivity::new(true);
    let platform = Platform {
        clock: Arc::new(SystemClock),
        connectivity: Arc::new(network.clone()),
        gps: Box::new(SimulatedGps::seeded(GpsBounds::default(), 11).unwrap()),
    };
    let coordinator = Coordinator::new(RegistryConfig::default(), platform, tx);
    App::new(coordinator, rx, network, Arc::new(FilePhotoSource))
}

async fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        app.handle_input(KeyCode::Char(c)).await;
    }
}

async fn sign_in(app: &mut App) {
    // First role is pre-highlighted; Enter selects it and moves to the phone field.
    app.handle_input(KeyCode::Enter).await;
    type_text(app, "+91 98765 43210").await;
    app.handle_input(KeyCode::Enter).await;
    assert!(app.coordinator.login_screen().unwrap().otp_sent());

    type_text(app, "123456").await;
    app.handle_input(KeyCode::Enter).await;
}

async fn fill_form(app: &mut App, photo: &Path) {
    assert_eq!(app.capture_focus, CaptureField::Photo);
    app.handle_input(KeyCode::Enter).await;
    assert!(app.photo_prompt.is_some());
    type_text(app, &photo.display().to_string()).await;
    app.handle_input(KeyCode::Enter).await;
    assert!(app.photo_prompt.is_none());

    app.handle_input(KeyCode::Tab).await;
    type_text(app, "Jane Doe").await;
    app.handle_input(KeyCode::Tab).await;
    app.handle_input(KeyCode::Right).await;
    app.handle_input(KeyCode::Tab).await;
    type_text(app, "2x5").await;
    for _ in 0..4 {
        app.handle_input(KeyCode::Tab).await;
    }
    assert_eq!(app.capture_focus, CaptureField::Submit);
}

fn footer(app: &App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(110, 40)).unwrap();
    terminal.draw(|f| ui::draw(f, app)).unwrap();
    let buffer = terminal.backend().buffer();
    let y = buffer.area.height - 2;
    (0..buffer.area.width)
        .map(|x| buffer[(x, y)].symbol())
        .collect()
}

async fn write_photo(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("seedling.png");
    tokio::fs::write(&path, b"\x89PNG\r\n").await.unwrap();
    path
}

#[tokio::test(start_paused = true)]
async fn test_login_capture_submit_flow() {
    let dir = tempfile::tempdir().unwrap();
    let photo = write_photo(&dir).await;
    let mut app = app();

    sign_in(&mut app).await;
    assert_eq!(app.coordinator.state(), NavigationState::Dashboard);
    assert_eq!(app.coordinator.session().unwrap().phone, "+91 98765 43210");

    app.handle_input(KeyCode::Char('c')).await;
    assert_eq!(app.coordinator.state(), NavigationState::Capturing);

    fill_form(&mut app, &photo).await;
    let draft = app.coordinator.capture_screen().unwrap().draft();
    assert_eq!(draft.photo.as_ref().unwrap().file_name, "seedling.png");
    assert!(draft.coordinates.is_some());
    assert_eq!(draft.contributor_name, "Jane Doe");
    assert_eq!(draft.species, Some(Species::ALL[0]));
    assert_eq!(draft.plant_count, "25");
    assert_eq!(
        app.toast.as_ref().unwrap().notice.kind,
        NoticeKind::LocationCaptured
    );

    app.handle_input(KeyCode::Enter).await;
    assert_eq!(
        app.coordinator.capture_screen().unwrap().status(),
        SubmissionStatus::Uploading
    );

    // Typing while uploading changes nothing.
    app.handle_input(KeyCode::Char('x')).await;
    assert_eq!(app.coordinator.state(), NavigationState::Capturing);

    tokio::time::sleep(Duration::from_millis(2001)).await;
    app.on_tick().await;

    assert_eq!(
        app.coordinator.capture_screen().unwrap().status(),
        SubmissionStatus::Submitted
    );
    assert_eq!(
        app.toast.as_ref().unwrap().notice.kind,
        NoticeKind::SubmissionComplete
    );
    let history = app.coordinator.dashboard().unwrap().history();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].plant_name, Species::ALL[0].label());
    assert_eq!(history[0].location, "Location not specified");

    app.handle_input(KeyCode::Char('b')).await;
    assert_eq!(app.coordinator.state(), NavigationState::Dashboard);
    assert_eq!(app.coordinator.dashboard().unwrap().history().len(), 3);

    app.handle_input(KeyCode::Char('l')).await;
    assert_eq!(app.coordinator.state(), NavigationState::LoggedOut);
    assert!(app.coordinator.session().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_offline_submission_is_queued() {
    let dir = tempfile::tempdir().unwrap();
    let photo = write_photo(&dir).await;
    let mut app = app();

    sign_in(&mut app).await;
    app.handle_input(KeyCode::Char('c')).await;
    fill_form(&mut app, &photo).await;

    app.handle_input(KeyCode::F(2)).await;
    assert!(!app.is_online());
    app.handle_input(KeyCode::Enter).await;

    tokio::time::sleep(Duration::from_millis(2001)).await;
    app.on_tick().await;

    assert_eq!(
        app.coordinator.capture_screen().unwrap().status(),
        SubmissionStatus::Queued
    );
    assert_eq!(
        app.toast.as_ref().unwrap().notice.kind,
        NoticeKind::QueuedForUpload
    );
    assert_eq!(app.coordinator.dashboard().unwrap().history().len(), 3);

    // Submit another entry starts from a blank form.
    app.handle_input(KeyCode::Char('n')).await;
    let capture = app.coordinator.capture_screen().unwrap();
    assert_eq!(capture.status(), SubmissionStatus::Idle);
    assert!(capture.draft().photo.is_none());
    assert_eq!(app.capture_focus, CaptureField::Photo);
}

#[tokio::test]
async fn test_incomplete_form_shows_missing_information() {
    let mut app = app();
    sign_in(&mut app).await;
    app.handle_input(KeyCode::Char('c')).await;

    for _ in 0..7 {
        app.handle_input(KeyCode::Tab).await;
    }
    app.handle_input(KeyCode::Enter).await;

    let toast = app.toast.as_ref().unwrap();
    assert_eq!(toast.notice.kind, NoticeKind::MissingInformation);
    assert_eq!(
        app.coordinator.capture_screen().unwrap().status(),
        SubmissionStatus::Idle
    );
}

#[tokio::test]
async fn test_bad_photo_path_reports_error() {
    let dir = tempfile::tempdir().unwrap();
    let notes = dir.path().join("notes.txt");
    tokio::fs::write(&notes, b"not a photo").await.unwrap();

    let mut app = app();
    sign_in(&mut app).await;
    app.handle_input(KeyCode::Char('c')).await;
    app.handle_input(KeyCode::Enter).await;
    type_text(&mut app, &notes.display().to_string()).await;
    app.handle_input(KeyCode::Enter).await;

    assert!(app.last_error.is_some());
    assert!(app.coordinator.capture_screen().unwrap().draft().photo.is_none());
}

#[tokio::test]
async fn test_activity_log_records_session() {
    let dir = tempfile::tempdir().unwrap();
    let logger = ActivityLogger::new(dir.path()).await.unwrap();
    let log_path = logger.path().to_path_buf();
    let mut app = app().with_activity_logger(logger);

    sign_in(&mut app).await;
    app.handle_input(KeyCode::Char('c')).await;
    app.handle_input(KeyCode::Esc).await;
    app.handle_input(KeyCode::Char('l')).await;

    let content = tokio::fs::read_to_string(&log_path).await.unwrap();
    let types: Vec<String> = content
        .lines()
        .map(|line| {
            let v: serde_json::Value = serde_json::from_str(line).unwrap();
            v["event_type"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(
        types,
        vec![
            "session_started",
            "navigation",
            "navigation",
            "navigation",
            "session_ended",
            "navigation",
        ]
    );
}

#[tokio::test]
async fn test_photo_error_clears_on_navigation() {
    let dir = tempfile::tempdir().unwrap();
    let notes = dir.path().join("notes.txt");
    tokio::fs::write(&notes, b"not a photo").await.unwrap();

    let mut app = app();
    sign_in(&mut app).await;
    app.handle_input(KeyCode::Char('c')).await;
    app.handle_input(KeyCode::Enter).await;
    type_text(&mut app, &notes.display().to_string()).await;
    app.handle_input(KeyCode::Enter).await;
    assert!(footer(&app).contains("notes.txt"));

    app.handle_input(KeyCode::Esc).await;
    assert_eq!(app.coordinator.state(), NavigationState::Dashboard);
    assert!(app.last_error.is_none());
    assert!(footer(&app).contains("[L] Logout"));

    app.handle_input(KeyCode::Char('l')).await;
    assert!(app.last_error.is_none());
    let footer = footer(&app);
    assert!(footer.contains("Send OTP"), "footer was: {}", footer);
    assert!(!footer.contains("notes.txt"));
}

#[tokio::test(start_paused = true)]
async fn test_activity_log_records_queued_status() {
    let dir = tempfile::tempdir().unwrap();
    let photo = write_photo(&dir).await;
    let logger = ActivityLogger::new(&dir.path().join("logs")).await.unwrap();
    let log_path = logger.path().to_path_buf();
    let mut app = app().with_activity_logger(logger);

    sign_in(&mut app).await;
    app.handle_input(KeyCode::Char('c')).await;
    fill_form(&mut app, &photo).await;
    app.handle_input(KeyCode::F(2)).await;
    app.handle_input(KeyCode::Enter).await;
    tokio::time::sleep(Duration::from_millis(2001)).await;
    app.on_tick().await;

    let content = tokio::fs::read_to_string(&log_path).await.unwrap();
    let resolved: serde_json::Value = content
        .lines()
        .map(|line| serde_json::from_str::<serde_json::Value>(line).unwrap())
        .find(|v| v["event_type"] == "submission_resolved")
        .unwrap();
    assert_eq!(resolved["details"]["status"], "queued");
}
