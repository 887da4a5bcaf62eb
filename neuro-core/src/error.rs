use std::path::PathBuf;

/// Failures while obtaining a patient record.
///
/// Absent or empty sections are not errors; they surface as
/// [`Analysis::NoData`](crate::Analysis::NoData) further down.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("record is not valid JSON: {0}")]
    Parse(String),
    #[error("section `{section}` must be {expected}")]
    Malformed {
        section: &'static str,
        expected: &'static str,
    },
    #[error("cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
