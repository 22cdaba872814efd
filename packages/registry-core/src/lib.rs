pub mod capture;
pub mod config;
pub mod coordinator;
pub mod dashboard;
pub mod domain;
pub mod error;
pub mod logging;
pub mod login;
pub mod notice;
pub mod platform;
pub mod upload;

pub use capture::{CaptureScreen, Resolution, SubmissionDraft, SubmissionStatus};
pub use config::{GpsBounds, RegistryConfig, load_config};
pub use coordinator::{Coordinator, Intent, NavigationState, Platform, SignedIn, View};
pub use dashboard::{DashboardScreen, DashboardTab};
pub use domain::{
    CompletedSubmission, Coordinates, HistoryEntry, HistoryStatus, Photo, Role, Session, Species,
};
pub use error::{RegistryError, Result};
pub use login::{LoginScreen, LoginStep};
pub use notice::{Notice, NoticeKind, Severity};
pub use platform::{
    Clock, Connectivity, FilePhotoSource, FixedClock, LocationProvider, PhotoSource,
    SharedConnectivity, SimulatedGps, SystemClock,
};
pub use upload::{AppEvent, PendingUpload, UploadTicket, UploadTimer};
