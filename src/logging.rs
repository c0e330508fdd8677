use directories::ProjectDirs;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// `~/.local/state/transit-pass/transit-pass.log` on Linux, the local data
/// dir elsewhere.
pub fn default_log_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "transit-pass").map(|pd| {
        pd.state_dir()
            .unwrap_or_else(|| pd.data_local_dir())
            .join("transit-pass.log")
    })
}

/// Install the global subscriber, appending to `path`.
///
/// The terminal belongs to the UI, so logs never go to stdout/stderr.
/// Level comes from `RUST_LOG` (default `info`).
pub fn init(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(io::Error::other)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn init_creates_log_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs").join("transit-pass.log");
        // another test may already own the global subscriber
        let _ = init(&path);
        assert!(path.exists());
    }
}
