use crate::error::{Error, Result};
use chrono::{DateTime, FixedOffset, SecondsFormat, TimeZone};
use std::fmt::Display;
use std::fs::File;
use std::path::Path;

/// Backup name used when no file is given: `<app>_<label>_<RFC 3339 timestamp>.bak`.
pub fn default_file_name<Tz: TimeZone>(app: &str, label: &str, at: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    format!(
        "{}_{}_{}.bak",
        app,
        label,
        at.to_rfc3339_opts(SecondsFormat::Secs, true)
    )
}

/// Splits a generated backup name back into application, label and timestamp.
pub fn parse_default_file_name(name: &str) -> Option<(String, String, DateTime<FixedOffset>)> {
    let stem = name.strip_suffix(".bak")?;
    let mut parts = stem.rsplitn(3, '_');

    let timestamp = DateTime::parse_from_rfc3339(parts.next()?).ok()?;
    let label = parts.next()?;
    let app = parts.next()?;

    if app.is_empty() || label.is_empty() {
        return None;
    }

    Some((app.to_string(), label.to_string(), timestamp))
}

pub fn create_backup_file(path: &Path) -> Result<File> {
    File::create(path).map_err(|source| Error::FileCreation {
        path: path.to_path_buf(),
        source,
    })
}
