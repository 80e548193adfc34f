pub mod counts;
pub mod math;
pub mod session;
pub mod types;

pub use self::session::{Feedback, Session};
pub use self::types::{
    CharCounts, EventKind, FinishReason, KeypressCounts, LiveStats, Mode, Phase, ReplayEvent,
    SessionResult, Severity, Timestamp, WordResult,
};
