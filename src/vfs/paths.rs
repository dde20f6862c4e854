/*!
 * Standard Filesystem Paths
 * Centralized path constants for the default directory layout
 */

/// Top-level directories
pub mod system {
    pub const HOME: &str = "/home";
    pub const TMP: &str = "/tmp";
    pub const ETC: &str = "/etc";
    pub const VAR: &str = "/var";
    pub const VAR_LOG: &str = "/var/log";
}

/// Default user directories
pub mod user {
    pub const HOME: &str = "/home/user";
    pub const DOCUMENTS: &str = "/home/user/documents";
    pub const DOWNLOADS: &str = "/home/user/downloads";
    pub const PROJECTS: &str = "/home/user/projects";
}

/// All standard directories that should be created at init
///
/// Parents come before their children.
pub fn standard_directories() -> Vec<&'static str> {
    vec![
        system::HOME,
        user::HOME,
        user::DOCUMENTS,
        user::DOWNLOADS,
        user::PROJECTS,
        system::TMP,
        system::ETC,
        system::VAR,
        system::VAR_LOG,
    ]
}

/// Directory a fresh session starts in when the layout is seeded
pub fn default_working_directory() -> &'static str {
    user::HOME
}
