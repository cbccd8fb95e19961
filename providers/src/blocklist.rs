use shared_types::{MonitorError, SystemBlockList};
use std::io::Write;
use std::path::PathBuf;

/// System block list kept as one number per line
///
/// Without a path the block list is unavailable, the way it is for an app that does not hold
/// the default-dialer role.
pub struct FileSystemBlockList {
    path: Option<PathBuf>,
}

impl FileSystemBlockList {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn unavailable() -> Self {
        Self { path: None }
    }
}

impl SystemBlockList for FileSystemBlockList {
    fn is_available(&self) -> bool {
        self.path.is_some()
    }

    fn block(&self, phone_number: &str) -> Result<(), MonitorError> {
        let path = self.path.as_ref().ok_or_else(|| {
            MonitorError::PermissionDenied("system block list requires the default dialer role".to_string())
        })?;

        let existing = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(crate::io::read_error(path, e)),
        };
        if existing.lines().any(|line| line.trim() == phone_number) {
            return Ok(());
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| MonitorError::Provider(e.to_string()))?;
        }

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| crate::io::read_error(path, e))?;

        writeln!(file, "{}", phone_number).map_err(|e| MonitorError::Provider(e.to_string()))
    }
}
