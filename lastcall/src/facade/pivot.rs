use std::env;
use std::io;
use std::path::PathBuf;

/// Owns the logic for [resolving](Pivot::resolve) the runtime pivot directory.
///
/// ## Pivot directory
///
/// Pivot directory is the current working directory of the runtime process,
/// **unless** running using Cargo (e.g.: `cargo run`, `cargo test`, via IDE,
/// etc.): then it’s the directory containing `Cargo.toml`.
///
/// The dot-env files and the configuration directory are looked up relative to
/// the pivot directory.
pub struct Pivot;

impl Pivot {
    /// Resolves the **pivot directory** at runtime.
    ///
    /// Reads the `CARGO_MANIFEST_DIR` environment variable, which is normally
    /// set only when running through Cargo, and falls back to the process’s
    /// [current](env::current_dir) working directory. Fails only if the
    /// fallback is needed and the current directory is inaccessible.
    pub fn resolve() -> io::Result<PathBuf> {
        match env::var_os("CARGO_MANIFEST_DIR") {
            Some(manifest_dir) => Ok(PathBuf::from(manifest_dir)),
            None => env::current_dir(),
        }
    }
}
