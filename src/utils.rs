use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

/// Profile mode for the application (dev or prod)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Dev,
    Prod,
}

/// Get the configuration directory path.
/// If profile is Dev, uses "goaltrack-dev" instead of "goaltrack"
pub fn get_config_dir(profile: Profile) -> Option<PathBuf> {
    let app_name = match profile {
        Profile::Dev => "goaltrack-dev",
        Profile::Prod => "goaltrack",
    };
    ProjectDirs::from("com", "goaltrack", app_name).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the data directory path.
/// If profile is Dev, uses "goaltrack-dev" instead of "goaltrack"
pub fn get_data_dir(profile: Profile) -> Option<PathBuf> {
    let app_name = match profile {
        Profile::Dev => "goaltrack-dev",
        Profile::Prod => "goaltrack",
    };
    ProjectDirs::from("com", "goaltrack", app_name).map(|dirs| dirs.data_dir().to_path_buf())
}

/// Expand `~` in a path string to the user's home directory
pub fn expand_path(path: &str) -> PathBuf {
    if path.starts_with("~/") {
        if let Some(home) = BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            return home.join(&path[2..]);
        }
    }
    PathBuf::from(path)
}
