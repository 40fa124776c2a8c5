use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Log file location. `FLOWTIMER_LOG` overrides the per-user state dir.
    pub fn log_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os("FLOWTIMER_LOG") {
            return Some(PathBuf::from(path));
        }
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("flowtimer");
            Some(state_dir.join("flowtimer.log"))
        } else {
            ProjectDirs::from("", "", "flowtimer")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("flowtimer.log"))
        }
    }
}
