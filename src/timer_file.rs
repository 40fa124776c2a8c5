//! On-disk timer list format.
//!
//! ```json
//! { "Header": { "Version": 48 },
//!   "Timers": [ { "Name": "", "Offsets": "", "Interval": "", "NumBeeps": "" } ] }
//! ```
//!
//! The header is written for compatibility with existing files and ignored when
//! reading.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{Error, Result};

pub const FORMAT_VERSION: u32 = 48;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    #[serde(rename = "Version")]
    pub version: u32,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimerEntry {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Offsets")]
    pub offsets: String,
    #[serde(rename = "Interval")]
    pub interval: String,
    #[serde(rename = "NumBeeps")]
    pub beeps: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimerDocument {
    #[serde(rename = "Header", skip_deserializing)]
    pub header: Header,
    #[serde(rename = "Timers")]
    pub timers: Vec<TimerEntry>,
}

impl TimerDocument {
    pub fn new(timers: Vec<TimerEntry>) -> Self {
        Self {
            header: Header::default(),
            timers,
        }
    }

    /// Encode as pretty JSON. `path` is only used to label errors.
    pub fn to_vec(&self, path: &Path) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|source| Error::Encode {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Decode a document. `path` is only used to label errors.
    pub fn from_slice(bytes: &[u8], path: &Path) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|source| Error::MalformedDocument {
            path: path.to_path_buf(),
            source,
        })
    }
}

pub fn read_document(path: &Path) -> Result<TimerDocument> {
    let bytes = fs::read(path).map_err(|e| Error::from_read(path, e))?;
    let doc = TimerDocument::from_slice(&bytes, path)?;
    debug!(path = %path.display(), timers = doc.timers.len(), "read timer file");
    Ok(doc)
}

pub fn write_document(path: &Path, doc: &TimerDocument) -> Result<()> {
    let data = doc.to_vec(path)?;
    fs::write(path, data).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), timers = doc.timers.len(), "wrote timer file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    fn entry(name: &str, offsets: &str) -> TimerEntry {
        TimerEntry {
            name: name.into(),
            offsets: offsets.into(),
            interval: "500".into(),
            beeps: "5".into(),
        }
    }

    #[test]
    fn writes_header_and_renamed_fields() {
        let doc = TimerDocument::new(vec![entry("pid", "100/2500")]);
        let value = serde_json::to_value(&doc).unwrap();

        assert_eq!(value["Header"]["Version"], 48);
        assert_eq!(value["Timers"][0]["Name"], "pid");
        assert_eq!(value["Timers"][0]["Offsets"], "100/2500");
        assert_eq!(value["Timers"][0]["Interval"], "500");
        assert_eq!(value["Timers"][0]["NumBeeps"], "5");
    }

    #[test]
    fn header_is_ignored_on_read() {
        let path = Path::new("t.json");
        let missing = br#"{"Timers": []}"#;
        let odd = br#"{"Header": {"Version": "nine"}, "Timers": []}"#;

        assert!(TimerDocument::from_slice(missing, path).unwrap().timers.is_empty());
        let doc = TimerDocument::from_slice(odd, path).unwrap();
        assert_eq!(doc.header.version, FORMAT_VERSION);
    }

    #[test]
    fn missing_timers_key_is_malformed() {
        let err = TimerDocument::from_slice(br#"{"Header": {"Version": 48}}"#, Path::new("t.json"))
            .unwrap_err();
        assert_matches!(err, Error::MalformedDocument { .. });
    }

    #[test]
    fn wrong_field_type_is_malformed() {
        let bytes = br#"{"Timers": [{"Name": "a", "Offsets": 5, "Interval": "", "NumBeeps": ""}]}"#;
        let err = TimerDocument::from_slice(bytes, Path::new("t.json")).unwrap_err();
        assert_matches!(err, Error::MalformedDocument { .. });
    }

    #[test]
    fn file_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("timers.json");
        let doc = TimerDocument::new(vec![entry("a", "1"), entry("b", "2/3")]);

        write_document(&path, &doc).unwrap();
        assert_eq!(read_document(&path).unwrap(), doc);
    }

    #[test]
    fn reading_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let err = read_document(&dir.path().join("nope.json")).unwrap_err();
        assert_matches!(err, Error::FileNotFound { .. });
    }

    #[test]
    fn to_vec_is_pretty_printed() {
        let doc = TimerDocument::new(vec![entry("a", "1")]);
        let bytes = doc.to_vec(Path::new("t.json")).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("\n  \"Timers\""));
        assert_eq!(TimerDocument::from_slice(text.as_bytes(), Path::new("t.json")).unwrap(), doc);
    }

    #[test]
    fn write_failure_is_io_not_malformed() {
        let dir = tempdir().unwrap();
        let err = write_document(dir.path(), &TimerDocument::new(vec![])).unwrap_err();
        assert_matches!(err, Error::Io { .. });
    }
}
