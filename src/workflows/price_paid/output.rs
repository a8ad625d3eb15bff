use super::aggregate::PriceAggregate;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug)]
pub enum OutputError {
    InvalidPath(PathBuf),
    Io { path: PathBuf, source: std::io::Error },
    Serialize(serde_json::Error),
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputError::InvalidPath(path) => {
                write!(f, "output path '{}' does not name a file", path.display())
            }
            OutputError::Io { path, source } => {
                write!(f, "failed to write '{}': {}", path.display(), source)
            }
            OutputError::Serialize(err) => write!(f, "failed to encode aggregate: {}", err),
        }
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OutputError::InvalidPath(_) => None,
            OutputError::Io { source, .. } => Some(source),
            OutputError::Serialize(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for OutputError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialize(err)
    }
}

/// Encodes the aggregate as JSON, tab-indented when `pretty` is set.
pub fn encode<W: Write>(
    writer: W,
    aggregate: &PriceAggregate,
    pretty: bool,
) -> Result<(), OutputError> {
    if pretty {
        let formatter = PrettyFormatter::with_indent(b"\t");
        let mut serializer = Serializer::with_formatter(writer, formatter);
        aggregate.serialize(&mut serializer)?;
    } else {
        serde_json::to_writer(writer, aggregate)?;
    }
    Ok(())
}

/// Writes to a sibling `.tmp` file and renames it over `path` once the whole
/// document is on disk. On failure the destination is left untouched.
pub fn write_aggregate(
    path: &Path,
    aggregate: &PriceAggregate,
    pretty: bool,
) -> Result<(), OutputError> {
    let staging = staging_path(path)?;

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| OutputError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    info!(path = %path.display(), groups = aggregate.len(), "saving aggregate");
    let result = write_staged(&staging, aggregate, pretty).and_then(|()| {
        fs::rename(&staging, path).map_err(|source| OutputError::Io {
            path: path.to_path_buf(),
            source,
        })
    });

    if result.is_err() {
        debug!(path = %staging.display(), "removing staging file");
        let _ = fs::remove_file(&staging);
    }

    result
}

fn write_staged(
    staging: &Path,
    aggregate: &PriceAggregate,
    pretty: bool,
) -> Result<(), OutputError> {
    let io_error = |source| OutputError::Io {
        path: staging.to_path_buf(),
        source,
    };

    let file = File::create(staging).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    encode(&mut writer, aggregate, pretty)?;
    writer.write_all(b"\n").map_err(io_error)?;
    let file = writer
        .into_inner()
        .map_err(|err| io_error(err.into_error()))?;
    file.sync_all().map_err(io_error)
}

fn staging_path(path: &Path) -> Result<PathBuf, OutputError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| OutputError::InvalidPath(path.to_path_buf()))?;
    let mut staged = file_name.to_os_string();
    staged.push(".tmp");
    Ok(path.with_file_name(staged))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staging_path_is_a_sibling() {
        let staged = staging_path(Path::new("out/stats.json")).expect("has file name");
        assert_eq!(staged, PathBuf::from("out/stats.json.tmp"));
    }

    #[test]
    fn staging_path_rejects_directory_like_paths() {
        assert!(matches!(
            staging_path(Path::new("..")),
            Err(OutputError::InvalidPath(_))
        ));
    }

    #[test]
    fn pretty_output_uses_tabs() {
        let mut buffer = Vec::new();
        encode(&mut buffer, &PriceAggregate::new(), true).expect("encodes");
        assert_eq!(buffer, b"{}");

        let aggregate: PriceAggregate =
            serde_json::from_str(r#"{"E1":{"2016":{"Flat":{"Old":[1,2]}}}}"#).expect("parses");
        let mut buffer = Vec::new();
        encode(&mut buffer, &aggregate, true).expect("encodes");
        let text = String::from_utf8(buffer).expect("utf8");
        assert!(text.contains("\n\t\"E1\": {"));
        assert!(text.contains("\n\t\t\"2016\": {"));
    }

    #[test]
    fn compact_output_has_no_whitespace() {
        let aggregate: PriceAggregate =
            serde_json::from_str(r#"{"E1":{"2016":{"Flat":{"Old":[1,2]}}}}"#).expect("parses");
        let mut buffer = Vec::new();
        encode(&mut buffer, &aggregate, false).expect("encodes");
        assert_eq!(
            String::from_utf8(buffer).expect("utf8"),
            r#"{"E1":{"2016":{"Flat":{"Old":[1,2]}}}}"#
        );
    }
}
