// Output file writing
use std::borrow::Cow;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

use crate::types::{Result, TranslatorError};

/// Write one line per translation, each newline-terminated.
///
/// Line breaks inside a translation become spaces, so the file always has
/// exactly `lines.len()` lines.
///
/// Content goes to a temp file next to `path` and is renamed into place, so a
/// failure leaves no partial output behind.
pub fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(file.as_file());
        for line in lines {
            writer.write_all(single_line(line).as_bytes())?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
    }
    file.persist(path).map_err(|e| TranslatorError::Io(e.error))?;
    Ok(())
}

fn single_line(text: &str) -> Cow<'_, str> {
    if text.contains(['\n', '\r']) {
        Cow::Owned(text.replace("\r\n", " ").replace(['\n', '\r'], " "))
    } else {
        Cow::Borrowed(text)
    }
}
