use std::path::PathBuf;

use thiserror::Error;

/// Why an offsets field could not arm the countdown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("offset {segment:?} is not a non-negative integer")]
    NotAnInteger { segment: String },

    #[error("offset {value}ms does not fit within one hour")]
    OutOfRange { value: u64 },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed timer file {}: {source}", path.display())]
    MalformedDocument {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not encode timer file {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    #[error("could not write session config {}: {source}", path.display())]
    SessionWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Map a failed read of `path` to `FileNotFound` or `Io`.
    pub fn from_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound { path }
        } else {
            Error::Io { path, source }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io;

    #[test]
    fn not_found_maps_to_file_not_found() {
        let err = Error::from_read("a.json", io::Error::from(io::ErrorKind::NotFound));
        assert_matches!(err, Error::FileNotFound { ref path } if path.ends_with("a.json"));
    }

    #[test]
    fn other_read_errors_stay_io() {
        let err = Error::from_read("a.json", io::Error::from(io::ErrorKind::PermissionDenied));
        assert_matches!(err, Error::Io { .. });
    }

    #[test]
    fn parse_error_message_names_segment() {
        let err = Error::from(ParseError::NotAnInteger {
            segment: "abc".into(),
        });
        assert_eq!(err.to_string(), "offset \"abc\" is not a non-negative integer");
    }

    #[test]
    fn encode_failure_is_not_a_malformed_file() {
        let source = serde_json::from_str::<u8>("x").unwrap_err();
        let err = Error::Encode {
            path: "out.json".into(),
            source,
        };
        assert!(err.to_string().starts_with("could not encode timer file out.json"));
        assert!(!matches!(err, Error::MalformedDocument { .. }));
    }
}
