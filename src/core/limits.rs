/*!
 * Filesystem Limits and Constants
 *
 * Centralized location for naming limits, timing thresholds, and tree layout.
 * Linux-compatible values are marked with [LINUX-COMPAT].
 */

use std::time::Duration;

// =============================================================================
// NAMING LIMITS
// =============================================================================

/// Path separator used by the resolver and by full-path reconstruction
pub const PATH_SEPARATOR: char = '/';

/// Maximum length of a single entity name in bytes (255)
/// [LINUX-COMPAT] Matches NAME_MAX
pub const MAX_NAME_LEN: usize = 255;

/// Maximum length of a path string accepted by the resolver (4096)
/// [LINUX-COMPAT] Matches PATH_MAX
pub const MAX_PATH_LEN: usize = 4096;

/// Deepest subtree a snapshot will describe (63)
/// Each level nests a JSON object and an array; serde_json reads back at most
/// 128 levels of nesting.
pub const MAX_SNAPSHOT_DEPTH: usize = 63;

// =============================================================================
// TRACING
// =============================================================================

/// Session operations slower than this are logged at warn level
pub const SLOW_OPERATION_THRESHOLD: Duration = Duration::from_millis(10);

// =============================================================================
// RENDERING
// =============================================================================

/// Connector for a child that has later siblings
pub const TREE_BRANCH: &str = "├── ";

/// Connector for the last child of a directory
pub const TREE_LAST_BRANCH: &str = "└── ";

/// Indentation under a child that has later siblings
pub const TREE_PIPE: &str = "│   ";

/// Indentation under the last child of a directory
pub const TREE_SPACE: &str = "    ";
