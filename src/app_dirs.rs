use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "learneng";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    fn project() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", APP_NAME)
    }

    pub fn config_path() -> PathBuf {
        Self::project()
            .map(|pd| pd.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("learneng_config.json"))
    }

    /// State lives under `$HOME/.local/state/learneng` when `HOME` is set.
    pub fn state_dir() -> PathBuf {
        if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".local")
                .join("state")
                .join(APP_NAME)
        } else {
            Self::project()
                .map(|pd| pd.data_local_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."))
        }
    }

    pub fn results_log_path() -> PathBuf {
        Self::state_dir().join("results.csv")
    }

    pub fn log_path() -> PathBuf {
        Self::state_dir().join("learneng.log")
    }
}
