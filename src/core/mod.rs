/*!
 * Core Module
 * Configuration, limits, and serialization helpers shared by the filesystem
 */

pub mod config;
pub mod limits;
pub mod serde;

pub use config::FsConfig;
