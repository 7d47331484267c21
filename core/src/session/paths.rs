//! On-disk session file locations

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

/// Extension of the nondeterminism log
pub const LOG_EXTENSION: &str = "dem";
/// Extension of the session index
pub const INDEX_EXTENSION: &str = "inf";

/// Log and index file of one recorded session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPaths {
    pub log: PathBuf,
    pub index: PathBuf,
}

impl SessionPaths {
    /// `<dir>/<name>.dem` and `<dir>/<name>.inf`
    pub fn named(dir: &Path, name: &str) -> Self {
        Self {
            log: dir.join(format!("{name}.{LOG_EXTENSION}")),
            index: dir.join(format!("{name}.{INDEX_EXTENSION}")),
        }
    }

    /// Paths for a new recording named after its start time
    pub fn timestamped(dir: &Path, time: DateTime<Local>) -> Self {
        Self::named(dir, &time.format("%Y_%m_%d_%H_%M_%S").to_string())
    }

    /// Paths for a recording starting now
    pub fn now(dir: &Path) -> Self {
        Self::timestamped(dir, Local::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_named_paths() {
        let paths = SessionPaths::named(Path::new("replay"), "best_run");
        assert_eq!(paths.log, Path::new("replay/best_run.dem"));
        assert_eq!(paths.index, Path::new("replay/best_run.inf"));
    }

    #[test]
    fn test_dotted_name_keeps_full_name() {
        let paths = SessionPaths::named(Path::new("demos"), "run.v2");
        assert_eq!(paths.log, Path::new("demos/run.v2.dem"));
        assert_eq!(paths.index, Path::new("demos/run.v2.inf"));
    }

    #[test]
    fn test_timestamped_paths() {
        let time = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        let paths = SessionPaths::timestamped(Path::new("replay"), time);
        assert_eq!(paths.log, Path::new("replay/2024_03_09_07_05_01.dem"));
    }
}
