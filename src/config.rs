use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Kakomon";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get the application data directory
/// ~/Kakomon/ on all platforms, falling back to the working directory
/// when no home directory can be resolved.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Where the catalog build process drops its output by default.
pub fn default_terms_catalog_path() -> PathBuf {
    app_data_dir().join("terms_catalog").join("terms.json")
}

/// Filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "kakomon=info,kakomon_lib=info"
}
