use shared_types::{MonitorError, SpamListSource};
use std::path::PathBuf;

use crate::io::read_file;

/// Static spam list stored as a JSON array of number strings
pub struct JsonSpamList {
    path: PathBuf,
}

impl JsonSpamList {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SpamListSource for JsonSpamList {
    fn load(&self) -> Result<Vec<String>, MonitorError> {
        let content = read_file(&self.path)?;
        serde_json::from_slice(&content).map_err(|e| {
            MonitorError::Parse(format!("invalid spam list {}: {}", self.path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spam_numbers.json");
        std::fs::write(&path, r#"["+18005550100", "900123"]"#).unwrap();

        let list = JsonSpamList::new(&path).load().unwrap();
        assert_eq!(list, vec!["+18005550100".to_string(), "900123".to_string()]);
    }

    #[test]
    fn test_malformed_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spam_numbers.json");
        std::fs::write(&path, r#"{"numbers": []}"#).unwrap();

        assert!(matches!(
            JsonSpamList::new(&path).load(),
            Err(MonitorError::Parse(_))
        ));
    }
}
