//! Error types for the survey scheduler.

/// Result type for scheduler operations
pub type Result<T> = std::result::Result<T, SchedulerError>;

/// Errors raised while building the tile catalog or scheduling a night.
///
/// Variants fall into three groups:
///
/// - **Precondition violations** (see [`SchedulerError::is_precondition`]):
///   the caller passed inconsistent input. These are bugs on the calling side
///   and must not be retried.
/// - **Persistence inconsistencies**: the tile store and the in-memory catalog
///   disagree, or a file could not be read or parsed.
/// - **Invariant violations**: the selector reached a state that should be
///   impossible. Treat as a defect.
///
/// "No observable tile" and "target fully overlapped" are *not* errors; the
/// former is a `None` selection, the latter a logged warning.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("tileid_start value invalid, must be 0 or greater integer (got {0})")]
    NegativeTileIdStart(i64),

    #[error("Length mismatch for {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    #[error("Night not started yet: JD {jd} is before evening twilight {evening}")]
    NightNotStarted { jd: f64, evening: f64 },

    #[error("Twilight reached: JD {jd} is not before morning twilight {morning}")]
    TwilightReached { jd: f64, morning: f64 },

    #[error("Night JD {0} is not part of the observing plan")]
    NightNotInPlan(i64),

    #[error("Tile set references target index {index}, but the target list has {count} targets")]
    UnknownTargetIndex { index: usize, count: usize },

    #[error("Observing plan is for {plan}, scheduler is configured for {scheduler}")]
    ObservatoryMismatch { plan: String, scheduler: String },

    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    #[error("Invalid observing plan: {0}")]
    InvalidPlan(String),

    #[error("Invalid numeric operation in {0}")]
    NumericDomain(String),

    #[error("Ephemeris error: {0}")]
    Ephemeris(String),

    #[error("Tile id {0} not found")]
    TileNotFound(i64),

    #[error("Database error, tile id {tile_id} update affected {affected} rows (expected 1)")]
    StatusUpdateMismatch { tile_id: i64, affected: usize },

    #[error("Tile store error: {0}")]
    Store(String),

    #[error("Target list checksum {actual} does not match catalog checksum {expected}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("Internal invariant violated: {0}")]
    InvariantViolation(String),
}

impl SchedulerError {
    /// Returns `true` for errors caused by inconsistent caller input.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            SchedulerError::NegativeTileIdStart(_)
                | SchedulerError::LengthMismatch { .. }
                | SchedulerError::NightNotStarted { .. }
                | SchedulerError::TwilightReached { .. }
                | SchedulerError::NightNotInPlan(_)
                | SchedulerError::UnknownTargetIndex { .. }
                | SchedulerError::ObservatoryMismatch { .. }
                | SchedulerError::InvalidRegion(_)
                | SchedulerError::InvalidPlan(_)
        )
    }

    pub(crate) fn length_mismatch(what: &str, expected: usize, actual: usize) -> Self {
        SchedulerError::LengthMismatch {
            what: what.to_string(),
            expected,
            actual,
        }
    }
}

impl From<serde_json::Error> for SchedulerError {
    fn from(e: serde_json::Error) -> Self {
        SchedulerError::Json(e.to_string())
    }
}

impl From<serde_path_to_error::Error<serde_json::Error>> for SchedulerError {
    fn from(e: serde_path_to_error::Error<serde_json::Error>) -> Self {
        SchedulerError::Json(format!("{} (at {})", e.inner(), e.path()))
    }
}

impl From<toml::de::Error> for SchedulerError {
    fn from(e: toml::de::Error) -> Self {
        SchedulerError::Configuration(format!("Failed to parse config file: {}", e))
    }
}
