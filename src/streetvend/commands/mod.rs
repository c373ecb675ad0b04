use crate::commands::backup::BackupReport;
use crate::commands::report::DailyReport;
use crate::config::VendorConfig;
use crate::error::{CorruptRecord, Result, VendorError};
use crate::model::{FeedbackEntry, Inventory, InventoryItem, SaleRecord, SalesSummary};
use std::path::{Path, PathBuf};

pub mod backup;
pub mod config;
pub mod feedback;
pub mod init;
pub mod inventory;
pub mod report;
pub mod sales;

/// Resolved locations of every data file for one data directory.
#[derive(Debug, Clone)]
pub struct VendorPaths {
    pub data_dir: PathBuf,
    pub config: VendorConfig,
}

impl VendorPaths {
    pub fn new(data_dir: PathBuf, config: VendorConfig) -> Self {
        Self { data_dir, config }
    }

    /// Reads `config.json` from `data_dir`, falling back to the default layout.
    pub fn load(data_dir: PathBuf) -> Result<Self> {
        let config = VendorConfig::load(&data_dir)?;
        Ok(Self::new(data_dir, config))
    }

    pub fn inventory(&self) -> PathBuf {
        self.data_dir.join(&self.config.inventory_file)
    }

    pub fn sales(&self) -> PathBuf {
        self.data_dir.join(&self.config.sales_file)
    }

    pub fn feedback(&self) -> PathBuf {
        self.data_dir.join(&self.config.feedback_file)
    }

    pub fn report(&self) -> PathBuf {
        self.data_dir.join(&self.config.report_file)
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.data_dir.join(&self.config.backup_dir)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }

    /// One warning per record skipped while reading `path`.
    pub fn skipped(path: &Path, records: &[CorruptRecord]) -> Vec<Self> {
        let file = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        records
            .iter()
            .map(|record| {
                CmdMessage::warning(format!(
                    "{}: {} (skipped)",
                    file,
                    VendorError::CorruptData(record.clone())
                ))
            })
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub inventory: Option<Inventory>,
    pub affected_items: Vec<InventoryItem>,
    pub sale: Option<SaleRecord>,
    pub summary: Option<SalesSummary>,
    pub report: Option<DailyReport>,
    pub feedback: Vec<FeedbackEntry>,
    pub backup: Option<BackupReport>,
    pub config: Option<VendorConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn add_messages(&mut self, messages: impl IntoIterator<Item = CmdMessage>) {
        self.messages.extend(messages);
    }

    pub fn with_inventory(mut self, inventory: Inventory) -> Self {
        self.inventory = Some(inventory);
        self
    }

    pub fn with_affected_items(mut self, items: Vec<InventoryItem>) -> Self {
        self.affected_items = items;
        self
    }

    pub fn with_sale(mut self, sale: SaleRecord) -> Self {
        self.sale = Some(sale);
        self
    }

    pub fn with_summary(mut self, summary: SalesSummary) -> Self {
        self.summary = Some(summary);
        self
    }

    pub fn with_report(mut self, report: DailyReport) -> Self {
        self.report = Some(report);
        self
    }

    pub fn with_feedback(mut self, entries: Vec<FeedbackEntry>) -> Self {
        self.feedback = entries;
        self
    }

    pub fn with_backup(mut self, backup: BackupReport) -> Self {
        self.backup = Some(backup);
        self
    }

    pub fn with_config(mut self, config: VendorConfig) -> Self {
        self.config = Some(config);
        self
    }
}
