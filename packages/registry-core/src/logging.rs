use crate::error::Result;
use crate::notice::{Notice, Severity};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Structured activity types written to the session log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum LogEventType {
    SessionStarted,
    SessionEnded,
    Navigation,
    Notice,
    SubmissionResolved,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// A single structured log entry, serialized as one JSON line in the JSONL file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    pub timestamp: String,
    pub event_type: LogEventType,
    pub level: LogLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl LogEvent {
    pub fn new(
        event_type: LogEventType,
        level: LogLevel,
        message: impl Into<String>,
        details: Option<serde_json::Value>,
    ) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            event_type,
            level,
            message: message.into(),
            details,
        }
    }

    pub fn info(event_type: LogEventType, message: impl Into<String>) -> Self {
        Self::new(event_type, LogLevel::Info, message, None)
    }

    pub fn info_with_details(
        event_type: LogEventType,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self::new(event_type, LogLevel::Info, message, Some(details))
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(LogEventType::Error, LogLevel::Error, message, None)
    }

    pub fn notice(notice: &Notice) -> Self {
        let level = match notice.severity {
            Severity::Info => LogLevel::Info,
            Severity::Destructive => LogLevel::Warn,
        };
        Self::new(
            LogEventType::Notice,
            level,
            notice.title.clone(),
            Some(serde_json::json!({
                "kind": notice.kind,
                "description": notice.description,
            })),
        )
    }
}

/// Appends activity events to `<dir>/activity.jsonl`, one JSON object per line.
pub struct ActivityLogger {
    log_file_path: PathBuf,
}

impl ActivityLogger {
    /// Creates the directory if needed.
    pub async fn new(dir: &Path) -> Result<Self> {
        tokio::fs::create_dir_all(dir).await?;
        Ok(Self {
            log_file_path: dir.join("activity.jsonl"),
        })
    }

    pub fn path(&self) -> &Path {
        &self.log_file_path
    }

    /// Each call opens, appends and flushes.
    pub async fn log(&self, event: LogEvent) -> Result<()> {
        let mut line = serde_json::to_string(&event)?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file_path)
            .await?;

        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    pub async fn log_session_started(&self, role: &str, phone: &str) -> Result<()> {
        self.log(LogEvent::info_with_details(
            LogEventType::SessionStarted,
            format!("Signed in as {}", role),
            serde_json::json!({ "role": role, "phone": phone }),
        ))
        .await
    }

    pub async fn log_session_ended(&self) -> Result<()> {
        self.log(LogEvent::info(LogEventType::SessionEnded, "Signed out"))
            .await
    }

    pub async fn log_navigation(&self, from: &str, to: &str) -> Result<()> {
        self.log(LogEvent::info_with_details(
            LogEventType::Navigation,
            format!("{} -> {}", from, to),
            serde_json::json!({ "from": from, "to": to }),
        ))
        .await
    }

    pub async fn log_notice(&self, notice: &Notice) -> Result<()> {
        self.log(LogEvent::notice(notice)).await
    }

    pub async fn log_submission_resolved(
        &self,
        status: &str,
        plant_name: &str,
        location: &str,
    ) -> Result<()> {
        self.log(LogEvent::info_with_details(
            LogEventType::SubmissionResolved,
            format!("Submission {}: {} at {}", status, plant_name, location),
            serde_json::json!({
                "status": status,
                "plant_name": plant_name,
                "location": location,
            }),
        ))
        .await
    }

    pub async fn log_error(&self, message: &str) -> Result<()> {
        self.log(LogEvent::error(message)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_writes_one_line_per_event() {
        let tmp = tempdir().unwrap();
        let logger = ActivityLogger::new(&tmp.path().join("logs")).await.unwrap();

        logger.log_session_started("farmer", "555").await.unwrap();
        logger.log_notice(&Notice::missing_information()).await.unwrap();
        logger.log_session_ended().await.unwrap();

        let content = tokio::fs::read_to_string(logger.path()).await.unwrap();
        let events: Vec<LogEvent> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].event_type, LogEventType::SessionStarted);
        assert_eq!(events[1].level, LogLevel::Warn);
        assert_eq!(events[1].details.as_ref().unwrap()["kind"], "missing_information");
        assert_eq!(events[2].event_type, LogEventType::SessionEnded);
    }

    #[tokio::test]
    async fn test_append_mode() {
        let tmp = tempdir().unwrap();
        let logger = ActivityLogger::new(tmp.path()).await.unwrap();
        logger
            .log_submission_resolved("queued", "Sonneratia alba (Mangrove Apple)", "Creek")
            .await
            .unwrap();

        // A second logger on the same directory keeps appending.
        let logger2 = ActivityLogger::new(tmp.path()).await.unwrap();
        logger2.log_error("Photo unreadable").await.unwrap();

        let content = tokio::fs::read_to_string(logger.path()).await.unwrap();
        let lines: Vec<&str> = content.trim().split('\n').collect();
        assert_eq!(lines.len(), 2, "Should append, not overwrite");
        let last: LogEvent = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(last.event_type, LogEventType::Error);
        assert_eq!(last.message, "Photo unreadable");
    }
}
