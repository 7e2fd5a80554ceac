//! 標準環境変数解決実装（std::env を委譲）

use crate::domain::Dirs;
use crate::error::Error;
use crate::ports::outbound::EnvResolver;
use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "agent";

/// 標準環境変数解決実装
#[derive(Debug, Clone, Default)]
pub struct StdEnvResolver;

impl EnvResolver for StdEnvResolver {
    fn resolve_dirs(&self) -> Result<Dirs, Error> {
        resolve_dirs_with(|name| env::var(name).ok())
    }

    fn memory_file_from_env(&self) -> Option<PathBuf> {
        non_empty_var("AGENT_MEMORY_FILE").map(PathBuf::from)
    }

    fn search_endpoint_from_env(&self) -> Option<String> {
        non_empty_var("AGENT_SEARCH_ENDPOINT")
    }

    fn search_timeout_from_env(&self) -> Option<u64> {
        non_empty_var("AGENT_SEARCH_TIMEOUT_SECS").and_then(|s| s.trim().parse().ok())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.is_empty())
}

/// 環境変数の参照関数からディレクトリを解決する（テストでは HashMap を渡す）
pub fn resolve_dirs_with<F>(lookup: F) -> Result<Dirs, Error>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|s| !s.is_empty()).map(PathBuf::from);

    if let Some(home) = get("AGENT_HOME") {
        return Ok(Dirs {
            config_dir: home.join("config"),
            data_dir: home.join("data"),
            state_dir: home.join("state"),
        });
    }

    let home = get("HOME");
    let xdg = |var: &str, fallback: &[&str]| -> Result<PathBuf, Error> {
        let base = get(var)
            .or_else(|| {
                home.as_ref()
                    .map(|h| fallback.iter().fold(h.clone(), |p, seg| p.join(seg)))
            })
            .ok_or_else(|| Error::env(format!("neither {} nor HOME is set", var)))?;
        Ok(base.join(APP_DIR))
    };

    Ok(Dirs {
        config_dir: xdg("XDG_CONFIG_HOME", &[".config"])?,
        data_dir: xdg("XDG_DATA_HOME", &[".local", "share"])?,
        state_dir: xdg("XDG_STATE_HOME", &[".local", "state"])?,
    })
}
