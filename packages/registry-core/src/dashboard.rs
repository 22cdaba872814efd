use crate::domain::{
    CompletedSubmission, DashboardStats, HistoryEntry, HistoryStatus, MonthlyProgress,
    RecentSubmission, Session,
};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

pub const HISTORY_TIMESTAMP_FORMAT: &str = "%a, %b %-d, %-I:%M %p";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DashboardTab {
    #[default]
    Overview,
    History,
}

impl DashboardTab {
    pub fn toggle(self) -> Self {
        match self {
            DashboardTab::Overview => DashboardTab::History,
            DashboardTab::History => DashboardTab::Overview,
        }
    }
}

/// Per-session dashboard. The overview numbers and recent submissions are
/// fixed sample data and are not derived from the capture history.
#[derive(Debug, Clone)]
pub struct DashboardScreen {
    pub tab: DashboardTab,
    stats: DashboardStats,
    progress: MonthlyProgress,
    recent: Vec<RecentSubmission>,
    history: Vec<HistoryEntry>,
}

impl Default for DashboardScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardScreen {
    pub fn new() -> Self {
        Self {
            tab: DashboardTab::Overview,
            stats: DashboardStats {
                total_planted: 2847,
                approved: 2156,
                pending: 432,
                carbon_offset_tons: 15.8,
            },
            progress: MonthlyProgress {
                target_plants: 500,
                percent: 68,
            },
            recent: seed_recent_submissions(),
            history: seed_history(),
        }
    }

    pub fn stats(&self) -> &DashboardStats {
        &self.stats
    }

    pub fn progress(&self) -> &MonthlyProgress {
        &self.progress
    }

    pub fn recent_submissions(&self) -> &[RecentSubmission] {
        &self.recent
    }

    /// Newest first.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn select_tab(&mut self, tab: DashboardTab) {
        self.tab = tab;
    }

    /// Prepends one pending entry for a finished capture.
    pub fn record_submission(
        &mut self,
        submission: CompletedSubmission,
        now: DateTime<Local>,
    ) -> &HistoryEntry {
        let entry = HistoryEntry {
            id: Uuid::new_v4(),
            plant_name: submission.plant_name,
            location: submission.location,
            timestamp: now.format(HISTORY_TIMESTAMP_FORMAT).to_string(),
            status: HistoryStatus::Pending,
        };
        info!(
            "History entry added: {} at {}",
            entry.plant_name, entry.location
        );
        self.history.insert(0, entry);
        &self.history[0]
    }
}

/// Header line, e.g. "NGO Dashboard".
pub fn heading(session: &Session) -> String {
    format!("{} Dashboard", session.role.title())
}

fn seed_history() -> Vec<HistoryEntry> {
    vec![
        HistoryEntry {
            id: Uuid::new_v4(),
            plant_name: "Rhizophora mucronata".to_string(),
            location: "Mangrove Area A1".to_string(),
            timestamp: "Today, 2:30 PM".to_string(),
            status: HistoryStatus::Pending,
        },
        HistoryEntry {
            id: Uuid::new_v4(),
            plant_name: "Avicennia marina".to_string(),
            location: "Coastal Strip B2".to_string(),
            timestamp: "Yesterday, 4:15 PM".to_string(),
            status: HistoryStatus::Pending,
        },
    ]
}

fn seed_recent_submissions() -> Vec<RecentSubmission> {
    let coords = "12.9716° N, 77.5946° E";
    vec![
        RecentSubmission {
            id: 1,
            location: "Mangrove Area A1".to_string(),
            species: "Rhizophora mucronata".to_string(),
            count: 25,
            date: "Today, 2:30 PM".to_string(),
            status: HistoryStatus::Approved,
            coordinates: coords.to_string(),
        },
        RecentSubmission {
            id: 2,
            location: "Coastal Strip B2".to_string(),
            species: "Avicennia marina".to_string(),
            count: 18,
            date: "Yesterday, 4:15 PM".to_string(),
            status: HistoryStatus::Review,
            coordinates: coords.to_string(),
        },
        RecentSubmission {
            id: 3,
            location: "Restoration Zone C1".to_string(),
            species: "Bruguiera gymnorrhiza".to_string(),
            count: 32,
            date: "2 days ago, 11:00 AM".to_string(),
            status: HistoryStatus::Pending,
            coordinates: coords.to_string(),
        },
    ]
}
