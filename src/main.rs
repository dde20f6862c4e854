/*!
 * simfs - Demo Entry Point
 *
 * Builds a filesystem from environment configuration, runs a short
 * session against it, and prints the resulting tree.
 */

use miette::Result;
use tracing::info;

use simfs::{init_session, init_tracing, FsConfig};

fn main() -> Result<()> {
    // Initialize structured tracing
    init_tracing();

    info!("simfs starting...");

    let config = FsConfig::from_env();
    let mut session = init_session(&config)?;

    session.make_directories("documents")?;
    session.change_directory("documents")?;
    session.create_file("readme.txt", "Welcome to simfs.\n")?;
    session.append_to_file("readme.txt", "Files live only in memory.\n")?;
    session.make_directories("notes/2024")?;
    session.touch("todo.txt")?;
    session.create_symlink("latest", "notes/2024")?;

    info!(cwd = %session.print_working_directory()?, "Session ready");
    println!("{}\n", session.file_system_info()?);
    session.go_home();

    println!("{}", session.display_tree(Some("/"))?);

    let usage = session.disk_usage(Some("/"))?;
    let counts = session.tree().count(session.tree().root())?;
    println!(
        "{} files, {} directories, {} symlinks, {} bytes",
        counts.files, counts.directories, counts.symlinks, usage
    );

    info!("simfs shutting down");
    Ok(())
}
