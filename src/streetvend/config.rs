use crate::error::{Result, VendorError};
use crate::store;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path};

const CONFIG_FILENAME: &str = "config.json";

pub const CONFIG_KEYS: [&str; 5] = [
    "inventory-file",
    "sales-file",
    "feedback-file",
    "report-file",
    "backup-dir",
];

/// File layout of a data directory, stored in `<data_dir>/config.json`.
///
/// All names are relative to the data directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VendorConfig {
    #[serde(default = "default_inventory_file")]
    pub inventory_file: String,

    #[serde(default = "default_sales_file")]
    pub sales_file: String,

    #[serde(default = "default_feedback_file")]
    pub feedback_file: String,

    #[serde(default = "default_report_file")]
    pub report_file: String,

    #[serde(default = "default_backup_dir")]
    pub backup_dir: String,
}

fn default_inventory_file() -> String {
    "inventory.txt".to_string()
}

fn default_sales_file() -> String {
    "sales.csv".to_string()
}

fn default_feedback_file() -> String {
    "feedback.txt".to_string()
}

fn default_report_file() -> String {
    "daily_report.txt".to_string()
}

fn default_backup_dir() -> String {
    "backups".to_string()
}

impl Default for VendorConfig {
    fn default() -> Self {
        Self {
            inventory_file: default_inventory_file(),
            sales_file: default_sales_file(),
            feedback_file: default_feedback_file(),
            report_file: default_report_file(),
            backup_dir: default_backup_dir(),
        }
    }
}

impl VendorConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let config_path = data_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(VendorError::Io)?;
        let config: VendorConfig =
            serde_json::from_str(&content).map_err(VendorError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, data_dir: P) -> Result<()> {
        let data_dir = data_dir.as_ref();
        store::ensure_dir(data_dir)?;

        let content = serde_json::to_string_pretty(self).map_err(VendorError::Serialization)?;
        store::write_atomic(&data_dir.join(CONFIG_FILENAME), &content)
    }

    pub fn get(&self, key: &str) -> Result<&str> {
        let value = match key {
            "inventory-file" => &self.inventory_file,
            "sales-file" => &self.sales_file,
            "feedback-file" => &self.feedback_file,
            "report-file" => &self.report_file,
            "backup-dir" => &self.backup_dir,
            other => return Err(unknown_key(other)),
        };
        Ok(value.as_str())
    }

    /// Set a file name. Names must stay inside the data directory and must
    /// not name the data directory itself.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        if !is_contained_name(value) {
            return Err(VendorError::Config(format!(
                "'{}' is not a valid name for {}",
                value, key
            )));
        }
        let slot = match key {
            "inventory-file" => &mut self.inventory_file,
            "sales-file" => &mut self.sales_file,
            "feedback-file" => &mut self.feedback_file,
            "report-file" => &mut self.report_file,
            "backup-dir" => &mut self.backup_dir,
            other => return Err(unknown_key(other)),
        };
        *slot = value.to_string();
        Ok(())
    }

    /// `(key, value)` pairs in display order.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        CONFIG_KEYS
            .iter()
            .filter_map(|key| self.get(key).ok().map(|value| (*key, value)))
            .collect()
    }
}

/// A relative path with at least one normal component and no `..`.
fn is_contained_name(value: &str) -> bool {
    let mut has_name = false;
    for component in Path::new(value).components() {
        match component {
            Component::Normal(_) => has_name = true,
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    has_name
}

fn unknown_key(key: &str) -> VendorError {
    VendorError::Config(format!(
        "Unknown config key '{}' (expected one of: {})",
        key,
        CONFIG_KEYS.join(", ")
    ))
}
