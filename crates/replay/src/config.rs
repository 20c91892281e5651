//! Replay settings from the command line and `HAUNT_*` variables.

use std::path::PathBuf;

use anyhow::{Result, bail};

#[derive(Clone, Debug)]
pub struct ReplayConfig {
    pub script: PathBuf,
    /// Directory with `config.toml` and RON catalogs; builtin content if unset.
    pub data_dir: Option<PathBuf>,
    /// Where to write the final snapshot as JSON.
    pub snapshot_out: Option<PathBuf>,
    pub session_id: Option<String>,
}

impl ReplayConfig {
    /// `session-replay <script>`; the script may also come from `HAUNT_SCRIPT`.
    pub fn from_env() -> Result<Self> {
        let var = |key: &str| std::env::var_os(key).map(PathBuf::from);
        let script = match std::env::args_os().nth(1) {
            Some(arg) => PathBuf::from(arg),
            None => match var("HAUNT_SCRIPT") {
                Some(path) => path,
                None => bail!("usage: session-replay <script.ron|script.json>"),
            },
        };
        Ok(Self {
            script,
            data_dir: var("HAUNT_DATA_DIR"),
            snapshot_out: var("HAUNT_SNAPSHOT_OUT"),
            session_id: std::env::var("HAUNT_SESSION_ID").ok(),
        })
    }
}
