//! メモリを 1 つの JSON ファイルに保存する MemoryStore 実装
//!
//! 保存は一時ファイルへ書いてから rename で差し替える。

use crate::domain::Memory;
use crate::ports::outbound::MemoryStore;
use common::error::Error;
use common::ports::outbound::FileSystem;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct JsonFileMemoryStore {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl JsonFileMemoryStore {
    pub fn new(fs: Arc<dyn FileSystem>, path: impl AsRef<Path>) -> Self {
        Self {
            fs,
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 読み込み。ファイルが無ければ Ok(None)、読めない・壊れていれば Err。
    pub fn try_load(&self) -> Result<Option<Memory>, Error> {
        if !self.fs.exists(&self.path) {
            return Ok(None);
        }
        let content = self.fs.read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }
        let memory: Memory = serde_json::from_str(&content)?;
        Ok(Some(memory))
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl MemoryStore for JsonFileMemoryStore {
    fn load(&self) -> Memory {
        self.try_load().ok().flatten().unwrap_or_default()
    }

    fn save(&self, memory: &Memory) -> Result<(), Error> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.fs.create_dir_all(parent)?;
        }
        let mut json = serde_json::to_string_pretty(memory)?;
        json.push('\n');
        let tmp = self.tmp_path();
        self.fs.write(&tmp, &json)?;
        if let Err(e) = self.fs.rename(&tmp, &self.path) {
            let _ = self.fs.remove_file(&tmp);
            return Err(e);
        }
        Ok(())
    }
}
