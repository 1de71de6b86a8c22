//! Per-session state threaded through every command

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Mutable context of one interactive flow.
///
/// Holds the working-directory cursor that relative commands run against.
/// Only one instruction is handled at a time, so no locking is involved.
#[derive(Debug, Clone)]
pub struct Session {
    cwd: PathBuf,
    previous: Option<PathBuf>,
    sync_process_cwd: bool,
}

impl Session {
    /// A session rooted at `cwd` that leaves the process directory alone
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            previous: None,
            sync_process_cwd: false,
        }
    }

    /// A session that starts in, and keeps moving, the process directory
    pub fn for_process() -> std::io::Result<Self> {
        Ok(Self {
            cwd: std::env::current_dir()?,
            previous: None,
            sync_process_cwd: true,
        })
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn previous_dir(&self) -> Option<&Path> {
        self.previous.as_deref()
    }

    /// Move the cursor. The caller has already verified `dir` is a directory.
    pub fn change_dir(&mut self, dir: PathBuf) {
        if self.sync_process_cwd {
            if let Err(e) = std::env::set_current_dir(&dir) {
                warn!("Could not change process directory to {}: {}", dir.display(), e);
            }
        }

        debug!("Working directory {} -> {}", self.cwd.display(), dir.display());
        let old = std::mem::replace(&mut self.cwd, dir);
        self.previous = Some(old);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_dir_tracks_previous() {
        let mut session = Session::new("/home/user");
        assert!(session.previous_dir().is_none());

        session.change_dir(PathBuf::from("/home"));
        assert_eq!(session.cwd(), Path::new("/home"));
        assert_eq!(session.previous_dir(), Some(Path::new("/home/user")));
    }
}
