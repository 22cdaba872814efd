use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    LocationCaptured,
    MissingInformation,
    SubmissionComplete,
    QueuedForUpload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Destructive,
}

/// A short user-facing message. How it is shown is up to the front-end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notice {
    pub fn new(kind: NoticeKind) -> Self {
        let (title, description, severity) = match kind {
            NoticeKind::LocationCaptured => (
                "Location captured",
                "GPS coordinates have been recorded",
                Severity::Info,
            ),
            NoticeKind::MissingInformation => (
                "Missing Information",
                "Please complete all required fields",
                Severity::Destructive,
            ),
            NoticeKind::SubmissionComplete => (
                "Submission Complete",
                "Your restoration data has been submitted for review",
                Severity::Info,
            ),
            NoticeKind::QueuedForUpload => (
                "Queued for Upload",
                "Will sync when internet connection is restored",
                Severity::Info,
            ),
        };
        Self {
            kind,
            title: title.to_string(),
            description: description.to_string(),
            severity,
        }
    }

    pub fn location_captured() -> Self {
        Self::new(NoticeKind::LocationCaptured)
    }

    pub fn missing_information() -> Self {
        Self::new(NoticeKind::MissingInformation)
    }

    pub fn submission_complete() -> Self {
        Self::new(NoticeKind::SubmissionComplete)
    }

    pub fn queued_for_upload() -> Self {
        Self::new(NoticeKind::QueuedForUpload)
    }
}
