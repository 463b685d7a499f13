use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use time::OffsetDateTime;
use time::macros::format_description;
use tracing::info;

use crate::report::SimStatus;

#[derive(Debug, Error)]
pub enum ResultsError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize result record: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to format timestamp: {0}")]
    Time(#[from] time::error::Format),
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> ResultsError + '_ {
    move |source| ResultsError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// `YYYYmmdd_HHMMSS` in local time, UTC when the local offset is unknown.
pub fn timestamp(now: OffsetDateTime) -> Result<String, ResultsError> {
    let fmt = format_description!("[year][month][day]_[hour][minute][second]");
    Ok(now.format(fmt)?)
}

fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// Keeps names filesystem-safe without changing ordinary test names.
pub fn file_stem(test_name: &str) -> String {
    let stem: String = test_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' { c } else { '_' })
        .collect();
    if stem.is_empty() { "simulation".to_string() } else { stem }
}

/// Writes `status` to `<dir>/<test_name>_<timestamp>.json` and returns the
/// path. Runs that land in the same second get a numeric suffix.
pub fn save_status(dir: impl AsRef<Path>, status: &SimStatus, pretty: bool) -> Result<PathBuf, ResultsError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(io_err(dir))?;

    let base = format!("{}_{}", file_stem(&status.test_name), timestamp(now())?);
    let (path, file) = create_unique(dir, &base)?;
    let mut writer = BufWriter::new(file);
    if pretty {
        serde_json::to_writer_pretty(&mut writer, status)?;
    } else {
        serde_json::to_writer(&mut writer, status)?;
    }
    writer.flush().map_err(io_err(&path))?;

    info!(path = %path.display(), test_name = %status.test_name, "Simulation results saved");
    Ok(path)
}

/// Claims `<base>.json`, or the first free `<base>_<n>.json`. The file is
/// created atomically so concurrent savers never share a name.
fn create_unique(dir: &Path, base: &str) -> Result<(PathBuf, File), ResultsError> {
    let mut path = dir.join(format!("{}.json", base));
    let mut n = 1;
    loop {
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                path = dir.join(format!("{}_{}.json", base, n));
                n += 1;
            }
            Err(e) => return Err(io_err(&path)(e)),
        }
    }
}

pub fn load_status(path: impl AsRef<Path>) -> Result<SimStatus, ResultsError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(io_err(path))?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
