use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Carebook";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when RUST_LOG is not set
pub fn default_log_filter() -> String {
    "carebook=info".to_string()
}

/// Get the application data directory
/// ~/Carebook/ on all platforms (user-visible)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join(APP_NAME)
}

/// Get the path of the records database
pub fn db_path() -> PathBuf {
    app_data_dir().join("records.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_under_home() {
        let dir = app_data_dir();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with("Carebook"));
    }

    #[test]
    fn db_path_under_app_data() {
        let path = db_path();
        assert!(path.starts_with(app_data_dir()));
        assert!(path.ends_with("records.db"));
    }

    #[test]
    fn app_name_is_carebook() {
        assert_eq!(APP_NAME, "Carebook");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.3.0");
    }
}
