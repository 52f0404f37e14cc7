//! File logging for applications that own the terminal.
//!
//! A raw-mode UI cannot share stderr with a logger, so log records go to a
//! file named by an environment variable.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

/// Environment variable naming the log file.
pub const LOG_ENV: &str = "TRELLIS_LOG";

/// Open `path` for appending, creating it if needed.
pub fn log_to_file(path: impl AsRef<Path>) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install an `env_logger` writing to the file named by [`LOG_ENV`].
///
/// The level filter comes from `RUST_LOG` and defaults to `debug`. Returns
/// `Ok(false)` without installing anything when the variable is unset or
/// empty, or when another logger is already installed.
pub fn init_from_env() -> io::Result<bool> {
    let Some(path) = std::env::var_os(LOG_ENV).filter(|p| !p.is_empty()) else {
        return Ok(false);
    };
    let file = log_to_file(&path)?;
    let installed = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("debug"),
    )
    .target(env_logger::Target::Pipe(Box::new(file)))
    .try_init()
    .is_ok();
    if installed {
        log::info!("logging to {}", Path::new(&path).display());
    }
    Ok(installed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn log_to_file_appends() {
        let path = std::env::temp_dir().join(format!("trellis-log-{}.log", std::process::id()));
        let _ = std::fs::remove_file(&path);
        writeln!(log_to_file(&path).unwrap(), "one").unwrap();
        writeln!(log_to_file(&path).unwrap(), "two").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one\ntwo\n");
        std::fs::remove_file(&path).unwrap();
    }
}
