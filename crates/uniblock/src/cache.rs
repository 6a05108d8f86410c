//! File-backed accessory cache.
//!
//! Stands in for the home automation host: it remembers every accessory
//! record between runs and replays them through `configure_accessory`
//! before discovery.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use uniblock_core::{AccessoryHost, AccessoryRecord, CoreError, PLATFORM_NAME, PLUGIN_NAME};

use crate::error::CliError;

/// On-disk shape of the cache file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheFile {
    plugin: String,
    platform: String,
    #[serde(default)]
    accessories: Vec<AccessoryRecord>,
}

pub struct FileAccessoryCache {
    path: PathBuf,
    records: IndexMap<Uuid, AccessoryRecord>,
}

impl FileAccessoryCache {
    /// Load the cache, treating a missing file as empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CliError> {
        let path = path.into();
        let records = match fs::read_to_string(&path) {
            Ok(raw) => {
                let file: CacheFile = serde_json::from_str(&raw).map_err(|e| CliError::Cache {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?;
                file.accessories
                    .into_iter()
                    .map(|record| (record.uuid, record))
                    .collect()
            }
            Err(e) if e.kind() == ErrorKind::NotFound => IndexMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), count = records.len(), "loaded accessory cache");
        Ok(Self { path, records })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> impl Iterator<Item = &AccessoryRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Write through a sibling temp file so a crash never leaves half a cache.
    fn save(&self) -> Result<(), CoreError> {
        let file = CacheFile {
            plugin: PLUGIN_NAME.into(),
            platform: PLATFORM_NAME.into(),
            accessories: self.records.values().cloned().collect(),
        };
        let json = serde_json::to_string_pretty(&file).map_err(host_error)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(host_error)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(host_error)?;
        fs::rename(&tmp, &self.path).map_err(host_error)?;

        debug!(path = %self.path.display(), count = self.records.len(), "saved accessory cache");
        Ok(())
    }

    fn upsert(&mut self, accessories: &[AccessoryRecord]) {
        for record in accessories {
            self.records.insert(record.uuid, record.clone());
        }
    }
}

fn host_error(err: impl std::fmt::Display) -> CoreError {
    CoreError::Host {
        message: err.to_string(),
    }
}

impl AccessoryHost for FileAccessoryCache {
    fn register_platform_accessories(
        &mut self,
        plugin: &str,
        platform: &str,
        accessories: &[AccessoryRecord],
    ) -> Result<(), CoreError> {
        if plugin != PLUGIN_NAME || platform != PLATFORM_NAME {
            return Err(CoreError::Host {
                message: format!("unknown platform {plugin}/{platform}"),
            });
        }
        self.upsert(accessories);
        self.save()
    }

    fn update_platform_accessories(
        &mut self,
        accessories: &[AccessoryRecord],
    ) -> Result<(), CoreError> {
        self.upsert(accessories);
        self.save()
    }
}
