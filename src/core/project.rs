use anyhow::Context;
use std::path::{Path, PathBuf};

use crate::core::config::Config;

#[derive(Debug, Clone)]
pub struct Project {
    pub path: PathBuf,
    pub config: Config,
}

impl Project {
    pub fn new(path: &Path) -> anyhow::Result<Self> {
        let canonical = path
            .canonicalize()
            .with_context(|| format!("cannot open project at {}", path.display()))?;
        let config = Config::load(&canonical);
        Ok(Self {
            path: canonical,
            config,
        })
    }
}
