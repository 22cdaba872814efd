use crate::domain::{CompletedSubmission, Coordinates, Photo, Species};
use crate::notice::Notice;
use crate::upload::{PendingUpload, UploadTicket};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Uploading,
    Submitted,
    Queued,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Idle => "idle",
            SubmissionStatus::Uploading => "uploading",
            SubmissionStatus::Submitted => "submitted",
            SubmissionStatus::Queued => "queued",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SubmissionStatus::Submitted | SubmissionStatus::Queued)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionDraft {
    pub contributor_name: String,
    pub species: Option<Species>,
    pub plant_count: String,
    pub location_name: String,
    pub coordinates: Option<Coordinates>,
    pub notes: String,
    pub photo: Option<Photo>,
}

impl SubmissionDraft {
    pub fn is_complete(&self) -> bool {
        self.photo.is_some()
            && !self.contributor_name.is_empty()
            && self.species.is_some()
            && !self.plant_count.is_empty()
    }

    pub fn plant_count(&self) -> Option<u32> {
        self.plant_count.parse().ok()
    }
}

/// What the capture screen produces when its upload settles.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub status: SubmissionStatus,
    pub notice: Notice,
    pub completed: CompletedSubmission,
}

/// The capture form and its `Idle -> Uploading -> Submitted | Queued` status.
#[derive(Debug, Default)]
pub struct CaptureScreen {
    draft: SubmissionDraft,
    status: SubmissionStatus,
    pending: Option<PendingUpload>,
    current_ticket: Option<UploadTicket>,
}

impl CaptureScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &SubmissionDraft {
        &self.draft
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    pub fn current_ticket(&self) -> Option<UploadTicket> {
        self.current_ticket
    }

    fn editable(&self) -> bool {
        self.status == SubmissionStatus::Idle
    }

    /// Stores the photo and stamps a fresh GPS fix, as a camera would.
    pub fn attach_photo(&mut self, photo: Photo, fix: Coordinates) -> Option<Notice> {
        if !self.editable() {
            return None;
        }
        info!("Photo attached: {}", photo.file_name);
        self.draft.photo = Some(photo);
        self.set_location(fix)
    }

    /// Overwrites any earlier fix.
    pub fn set_location(&mut self, fix: Coordinates) -> Option<Notice> {
        if !self.editable() {
            return None;
        }
        debug!("Location captured: {}", fix);
        self.draft.coordinates = Some(fix);
        Some(Notice::location_captured())
    }

    /// Retake: drops the photo but keeps everything else.
    pub fn discard_photo(&mut self) {
        if self.editable() {
            self.draft.photo = None;
        }
    }

    pub fn set_contributor_name(&mut self, name: impl Into<String>) {
        if self.editable() {
            self.draft.contributor_name = name.into();
        }
    }

    pub fn set_species(&mut self, species: Option<Species>) {
        if self.editable() {
            self.draft.species = species;
        }
    }

    /// Keeps digits only, like a numeric input.
    pub fn set_plant_count(&mut self, raw: &str) {
        if self.editable() {
            self.draft.plant_count = raw.chars().filter(|c| c.is_ascii_digit()).collect();
        }
    }

    pub fn set_location_name(&mut self, name: impl Into<String>) {
        if self.editable() {
            self.draft.location_name = name.into();
        }
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        if self.editable() {
            self.draft.notes = notes.into();
        }
    }

    /// Runs the required-field gate. On success the screen is `Uploading`
    /// and the returned ticket identifies the in-flight upload; the caller
    /// arms a timer for it with [`CaptureScreen::track`]. Outside `Idle` the
    /// call is ignored and yields `Ok(None)`.
    pub fn submit(&mut self) -> Result<Option<UploadTicket>, Notice> {
        if !self.editable() {
            debug!("Submit ignored while {:?}", self.status);
            return Ok(None);
        }
        if !self.draft.is_complete() {
            warn!("Submission rejected: missing required fields");
            return Err(Notice::missing_information());
        }
        let ticket = UploadTicket::new();
        self.status = SubmissionStatus::Uploading;
        self.current_ticket = Some(ticket);
        info!("Uploading submission {:?}", ticket);
        Ok(Some(ticket))
    }

    pub fn track(&mut self, pending: PendingUpload) {
        self.pending = Some(pending);
    }

    /// Settles the upload for `ticket`. Stale or unknown tickets are ignored.
    pub fn resolve(
        &mut self,
        ticket: UploadTicket,
        online: bool,
        location_fallback: &str,
    ) -> Option<Resolution> {
        if self.status != SubmissionStatus::Uploading || self.current_ticket != Some(ticket) {
            debug!("Ignoring stale upload resolution {:?}", ticket);
            return None;
        }
        self.pending = None;

        let (status, notice) = if online {
            (SubmissionStatus::Submitted, Notice::submission_complete())
        } else {
            (SubmissionStatus::Queued, Notice::queued_for_upload())
        };
        self.status = status;
        info!("Submission {:?} resolved as {:?}", ticket, status);

        let plant_name = self
            .draft
            .species
            .map(|s| s.label().to_string())
            .unwrap_or_default();
        let location = if self.draft.location_name.is_empty() {
            location_fallback.to_string()
        } else {
            self.draft.location_name.clone()
        };
        Some(Resolution {
            status,
            notice,
            completed: CompletedSubmission {
                plant_name,
                location,
            },
        })
    }

    /// Clears the draft and returns to `Idle`, cancelling any pending upload.
    pub fn reset(&mut self) {
        self.pending = None;
        self.current_ticket = None;
        self.draft = SubmissionDraft::default();
        self.status = SubmissionStatus::Idle;
    }
}
