use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Farmer,
    Ngo,
    Panchayat,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Farmer, Role::Ngo, Role::Panchayat];

    pub fn id(&self) -> &'static str {
        match self {
            Role::Farmer => "farmer",
            Role::Ngo => "ngo",
            Role::Panchayat => "panchayat",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Role::Farmer => "Farmer",
            Role::Ngo => "NGO",
            Role::Panchayat => "Coastal Panchayat",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Role::Farmer => "Plant and monitor restoration areas",
            Role::Ngo => "Coordinate restoration projects",
            Role::Panchayat => "Manage community initiatives",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// The signed-in identity. Exists only between a verified OTP and logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub role: Role,
    pub phone: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    RhizophoraMucronata,
    AvicenniaMarina,
    BruguieraGymnorrhiza,
    SonneratiaAlba,
    XylocarpusGranatum,
    HeritieraLittoralis,
    Other,
}

impl Species {
    pub const ALL: [Species; 7] = [
        Species::RhizophoraMucronata,
        Species::AvicenniaMarina,
        Species::BruguieraGymnorrhiza,
        Species::SonneratiaAlba,
        Species::XylocarpusGranatum,
        Species::HeritieraLittoralis,
        Species::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Species::RhizophoraMucronata => "Rhizophora mucronata (Red Mangrove)",
            Species::AvicenniaMarina => "Avicennia marina (White Mangrove)",
            Species::BruguieraGymnorrhiza => "Bruguiera gymnorrhiza (Black Mangrove)",
            Species::SonneratiaAlba => "Sonneratia alba (Mangrove Apple)",
            Species::XylocarpusGranatum => "Xylocarpus granatum (Cannonball Mangrove)",
            Species::HeritieraLittoralis => "Heritiera littoralis (Looking Glass Tree)",
            Species::Other => "Other (specify in notes)",
        }
    }

    pub fn from_label(label: &str) -> Option<Species> {
        Species::ALL.into_iter().find(|s| s.label() == label)
    }

    /// Next entry in the picker, wrapping around. `None` starts at the top.
    pub fn cycle_next(current: Option<Species>) -> Species {
        match current {
            None => Species::ALL[0],
            Some(s) => {
                let idx = Species::ALL.iter().position(|x| *x == s).unwrap_or(0);
                Species::ALL[(idx + 1) % Species::ALL.len()]
            }
        }
    }

    pub fn cycle_prev(current: Option<Species>) -> Species {
        let len = Species::ALL.len();
        match current {
            None => Species::ALL[len - 1],
            Some(s) => {
                let idx = Species::ALL.iter().position(|x| *x == s).unwrap_or(0);
                Species::ALL[(idx + len - 1) % len]
            }
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}° N, {:.6}° E", self.lat, self.lng)
    }
}

/// An in-memory image picked by the user. Only its presence gates submission.
#[derive(Clone, PartialEq, Eq)]
pub struct Photo {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for Photo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Photo")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryStatus {
    Pending,
    Approved,
    Review,
}

impl HistoryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryStatus::Pending => "pending",
            HistoryStatus::Approved => "approved",
            HistoryStatus::Review => "review",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub plant_name: String,
    pub location: String,
    pub timestamp: String,
    pub status: HistoryStatus,
}

/// Emitted exactly once by the capture flow when an upload resolves,
/// whether it was submitted or queued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedSubmission {
    pub plant_name: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentSubmission {
    pub id: u32,
    pub location: String,
    pub species: String,
    pub count: u32,
    pub date: String,
    pub status: HistoryStatus,
    pub coordinates: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_planted: u32,
    pub approved: u32,
    pub pending: u32,
    /// Tons of CO2.
    pub carbon_offset_tons: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyProgress {
    pub target_plants: u32,
    pub percent: u8,
}
