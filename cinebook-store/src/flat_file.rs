use cinebook_core::{CoreError, CoreResult};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::warn;

/// Replace `path` with `contents` so readers never observe a half-written file
pub async fn write_atomic(path: &Path, contents: &[u8]) -> CoreResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| io_error("create directory", parent, e))?;
    }

    let tmp = tmp_path(path);
    let mut file = tokio::fs::File::create(&tmp)
        .await
        .map_err(|e| io_error("create", &tmp, e))?;
    file.write_all(contents)
        .await
        .map_err(|e| io_error("write", &tmp, e))?;
    file.sync_all()
        .await
        .map_err(|e| io_error("sync", &tmp, e))?;
    drop(file);

    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| io_error("rename", path, e))
}

/// Append one line, creating the file if needed.
///
/// On a failed write or sync the file is cut back to its previous length.
pub async fn append_line(path: &Path, line: &str) -> CoreResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| io_error("create directory", parent, e))?;
    }

    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|e| io_error("open", path, e))?;
    let len = file
        .metadata()
        .await
        .map_err(|e| io_error("inspect", path, e))?
        .len();

    let mut buf = String::with_capacity(line.len() + 1);
    buf.push_str(line);
    buf.push('\n');

    let written = async {
        file.write_all(buf.as_bytes()).await?;
        file.sync_data().await
    }
    .await;

    if let Err(e) = written {
        if let Err(undo) = file.set_len(len).await {
            warn!(path = %path.display(), "Failed to roll back partial append: {}", undo);
        }
        return Err(io_error("append to", path, e));
    }
    Ok(())
}

/// Read a file, returning `None` when it does not exist yet
pub async fn read_optional(path: &Path) -> CoreResult<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(io_error("read", path, e)),
    }
}

pub(crate) fn io_error(action: &str, path: &Path, err: std::io::Error) -> CoreError {
    CoreError::StorageError(format!("Failed to {} {}: {}", action, path.display(), err))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
