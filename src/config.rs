use std::env;
use std::io;
use std::path::PathBuf;

pub const DIR_ENV: &str = "NOTEBOARD_DIR";

/// Settings gathered from the environment once per invocation.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub use_color: bool,
    /// Terminal width used to fit list previews; `None` when not a tty.
    pub columns: Option<usize>,
}

impl Config {
    pub fn from_env() -> io::Result<Self> {
        Ok(Self {
            data_dir: data_dir()?,
            use_color: env::var("NO_COLOR").is_err(),
            columns: terminal_columns(),
        })
    }
}

pub fn data_dir() -> io::Result<PathBuf> {
    if let Ok(dir) = env::var(DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    let home = env::var("HOME").map_err(|_| {
        io::Error::other(format!("HOME not set; set {DIR_ENV} explicitly"))
    })?;
    Ok(PathBuf::from(home).join(".noteboard"))
}

pub fn terminal_columns() -> Option<usize> {
    terminal_size::terminal_size().map(|(terminal_size::Width(w), _)| w as usize)
}
