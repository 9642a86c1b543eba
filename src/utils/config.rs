use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    /// Directory holding the pre-rendered narration mp3 files.
    pub resources_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        let addr = env::var("AVALON_ADDR")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 8080)));
        let resources_dir = env::var("AVALON_RESOURCES_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("resources"));
        Self {
            addr,
            resources_dir,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
