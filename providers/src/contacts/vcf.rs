use shared_types::{normalize_number, ContactsProvider, MonitorError};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::SystemTime;

use crate::io::{check_readable, read_error, read_file};

/// Contacts read from a vCard file
///
/// Every `TEL` property of every card becomes a stored number, normalized on load. The file is
/// re-read when its modification time changes.
pub struct VcfContactsProvider {
    path: PathBuf,
    cache: Mutex<Option<(SystemTime, HashSet<String>)>>,
}

impl VcfContactsProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Mutex::new(None),
        }
    }

    /// Run `f` against the cached numbers, reloading the file first if it changed
    fn with_numbers<T>(&self, f: impl FnOnce(&HashSet<String>) -> T) -> Result<T, MonitorError> {
        let modified = std::fs::metadata(&self.path)
            .and_then(|m| m.modified())
            .map_err(|e| read_error(&self.path, e))?;

        let mut cache = self
            .cache
            .lock()
            .map_err(|e| MonitorError::Provider(format!("contacts cache poisoned: {}", e)))?;

        let stale = !matches!(cache.as_ref(), Some((cached_at, _)) if *cached_at == modified);
        if stale {
            let content = read_file(&self.path)?;
            let numbers = parse_phone_numbers(&String::from_utf8_lossy(&content));
            tracing::debug!(
                "Loaded {} contact numbers from {}",
                numbers.len(),
                self.path.display()
            );
            *cache = Some((modified, numbers));
        }

        match cache.as_ref() {
            Some((_, numbers)) => Ok(f(numbers)),
            None => Err(MonitorError::Provider("contacts cache empty".to_string())),
        }
    }
}

impl ContactsProvider for VcfContactsProvider {
    fn check_access(&self) -> Result<(), MonitorError> {
        check_readable(&self.path)
    }

    fn contains_number(&self, phone_number: &str) -> Result<bool, MonitorError> {
        self.with_numbers(|numbers| numbers.contains(phone_number))
    }
}

/// Join folded lines: a line starting with a space or tab continues the previous one
fn unfold_lines(content: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();

    for line in content.lines() {
        match (line.strip_prefix(|c: char| c == ' ' || c == '\t'), lines.last_mut()) {
            (Some(continuation), Some(previous)) => previous.push_str(continuation),
            _ => lines.push(line.to_string()),
        }
    }

    lines
}

/// Property name without parameters or an `item1.` style group prefix
fn property_name(line: &str) -> &str {
    let name = line.split(|c: char| c == ';' || c == ':').next().unwrap_or(line);
    name.rsplit_once('.').map_or(name, |(_, name)| name)
}

/// Collect the normalized `TEL` values of every card in a vCard document
pub fn parse_phone_numbers(content: &str) -> HashSet<String> {
    let mut numbers = HashSet::new();

    for vcard in content.split("BEGIN:VCARD").skip(1) {
        for line in unfold_lines(vcard) {
            let line = line.trim();

            // Handle TEL;TYPE=cell:+1 555 123 4567, item1.TEL:... and TEL;VALUE=uri:tel:+1-555
            if property_name(line).eq_ignore_ascii_case("TEL") {
                if let Some((_, value)) = line.split_once(':') {
                    let value = value.strip_prefix("tel:").unwrap_or(value);
                    let normalized = normalize_number(value);
                    if !normalized.is_empty() {
                        numbers.insert(normalized);
                    }
                }
            }
        }
    }

    numbers
}
