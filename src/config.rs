use std::path::PathBuf;

/// Expand a user-supplied path, resolving a leading `~`.
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// Per-user data directory (~/.sortd).
pub fn data_dir() -> PathBuf {
    expand_path("~/.sortd")
}

/// Default config file path (~/.sortd/config.yaml).
pub fn default_config_path() -> PathBuf {
    data_dir().join("config.yaml")
}

/// Directory holding JSON run logs (~/.sortd/logs).
pub fn log_dir() -> PathBuf {
    data_dir().join("logs")
}

/// Default destination when none is given (~/Documents/Organized).
pub fn default_destination() -> PathBuf {
    expand_path("~/Documents/Organized")
}
