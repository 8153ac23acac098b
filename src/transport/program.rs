use std::{
    env,
    path::{Path, PathBuf},
};

/// Environment variable naming the engine executable.
pub const ENGINE_ENV: &str = "DMXCTL_ENGINE";

const ENGINE_NAME: &str = "dmxctl-engine";

/// Location of the `dmxctl-engine` executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineProgram(PathBuf);

impl EngineProgram {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self(path.into())
    }

    /// Find the engine: `$DMXCTL_ENGINE` if set, else next to the current
    /// executable, else by name on `PATH`.
    pub fn resolve() -> Self {
        if let Some(path) = env::var_os(ENGINE_ENV).filter(|p| !p.is_empty()) {
            return Self::new(path);
        }
        env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(ENGINE_NAME)))
            .filter(|candidate| candidate.is_file())
            .map_or_else(|| Self::new(ENGINE_NAME), Self::new)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl Default for EngineProgram {
    fn default() -> Self {
        Self::resolve()
    }
}
