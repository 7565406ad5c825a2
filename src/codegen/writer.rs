//! Atomic document writer.
//!
//! The document is written to a temporary file next to the target and renamed
//! over it, so a failed write never leaves a partial file behind.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::DaxError;

pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<(), DaxError> {
    write_with(path, |out| {
        serde_json::to_writer_pretty(&mut *out, value)?;
        out.write_all(b"\n")?;
        Ok(())
    })
}

/// Write `text` followed by a newline.
pub fn write_text(text: &str, path: &Path) -> Result<(), DaxError> {
    write_with(path, |out| {
        out.write_all(text.as_bytes())?;
        out.write_all(b"\n")?;
        Ok(())
    })
}

fn write_with<F>(path: &Path, write: F) -> Result<(), DaxError>
where
    F: FnOnce(&mut BufWriter<&File>) -> Result<(), DaxError>,
{
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let tmp = temp_file(dir, path)?;
    {
        let mut out = BufWriter::new(tmp.as_file());
        write(&mut out)?;
        out.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| DaxError::Io(e.error))?;

    tracing::info!(path = %path.display(), "wrote document");
    Ok(())
}

/// Temporary file in `dir` with the mode `target` has, or would get if it
/// were created with `File::create`.
fn temp_file(dir: &Path, target: &Path) -> std::io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".daxgen");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        // The umask still applies to the requested mode.
        let permissions = match std::fs::metadata(target) {
            Ok(meta) => meta.permissions(),
            Err(_) => std::fs::Permissions::from_mode(0o666),
        };
        builder.permissions(permissions);
    }
    #[cfg(not(unix))]
    let _ = target;

    builder.tempfile_in(dir)
}
