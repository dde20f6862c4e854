/*!
 * VFS Initialization
 * Builds a session and creates the standard directory structure
 */

use tracing::{info, warn};

use super::paths::{default_working_directory, standard_directories};
use super::session::Session;
use super::tree::Tree;
use super::types::VfsResult;
use crate::core::config::FsConfig;

/// Build a session from configuration
///
/// When `seed_standard_dirs` is set, the standard layout is created and the
/// cursor starts in the default working directory; otherwise the session
/// starts at the root of an empty tree.
pub fn init_session(config: &FsConfig) -> VfsResult<Session> {
    info!(
        capacity = ?config.capacity,
        max_name_len = config.max_name_len,
        "Initializing filesystem"
    );

    let mut tree = Tree::with_config(config);
    if config.seed_standard_dirs {
        create_standard_directories(&mut tree);
    }

    let mut session = Session::from_tree(tree);
    if config.seed_standard_dirs {
        session.change_directory(default_working_directory())?;
    }

    info!(session = %session.id(), "Filesystem initialization complete");
    Ok(session)
}

/// Create all standard directories in the tree
///
/// Returns the number of directories created. Failures are logged and skipped.
pub fn create_standard_directories(tree: &mut Tree) -> usize {
    info!("Creating standard directory structure");

    let dirs = standard_directories();
    let total = dirs.len();
    let root = tree.root();
    let mut created = 0;
    let mut existed = 0;

    for dir in dirs {
        if tree.resolve(root, dir).is_ok() {
            existed += 1;
            continue;
        }

        match tree.create_dir_all(root, dir) {
            Ok(_) => {
                created += 1;
            }
            Err(e) => {
                warn!(path = %dir, error = %e, "Failed to create directory");
            }
        }
    }

    info!(
        created = created,
        existed = existed,
        total = total,
        "Standard directory structure ready"
    );

    created
}
