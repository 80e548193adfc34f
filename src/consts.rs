/// Minimum gap between two consistency samples, in milliseconds.
pub const SAMPLE_INTERVAL_MS: u64 = 1000;

/// Elapsed time never counts as less than this when dividing by minutes.
/// Keeps a one-keystroke session from reporting infinite speed.
pub const MIN_ELAPSED_MS: u64 = 100;

/// Upper bound applied to reported WPM (live and final).
pub const WPM_CAP: f64 = 350.0;

/// Upper bound applied to raw WPM. Looser than `WPM_CAP`.
pub const RAW_WPM_CAP: f64 = 500.0;

/// Default time limit for `Mode::Time`, in seconds.
pub const DEFAULT_TIME_LIMIT_SECS: u64 = 30;

/// Severity thresholds: (max mistake ratio, max mistakes) for levels 1 and 2.
pub const SEVERITY_MINOR: (f64, usize) = (0.2, 1);
pub const SEVERITY_MAJOR: (f64, usize) = (0.45, 3);
