use shared_types::MonitorError;
use std::path::Path;

/// Map a read failure on a provider file onto the monitor's error taxonomy
pub(crate) fn read_error(path: &Path, err: std::io::Error) -> MonitorError {
    match err.kind() {
        std::io::ErrorKind::PermissionDenied => {
            MonitorError::PermissionDenied(format!("cannot read {}", path.display()))
        }
        _ => MonitorError::Provider(format!("failed to read {}: {}", path.display(), err)),
    }
}

/// Probe that a provider file can be opened for reading
pub(crate) fn check_readable(path: &Path) -> Result<(), MonitorError> {
    std::fs::File::open(path)
        .map(|_| ())
        .map_err(|e| read_error(path, e))
}

pub(crate) fn read_file(path: &Path) -> Result<Vec<u8>, MonitorError> {
    std::fs::read(path).map_err(|e| read_error(path, e))
}
