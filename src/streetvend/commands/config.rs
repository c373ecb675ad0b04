use crate::commands::{CmdMessage, CmdResult, VendorPaths};
use crate::config::VendorConfig;
use crate::error::Result;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

/// Reads or changes `config.json`. Unknown keys and unusable names are
/// `VendorError::Config` and leave the file untouched.
pub fn run(paths: &VendorPaths, action: ConfigAction) -> Result<CmdResult> {
    let dir = &paths.data_dir;
    let mut config = VendorConfig::load(dir)?;
    let mut result = CmdResult::default();

    match action {
        ConfigAction::ShowAll => {}
        ConfigAction::ShowKey(key) => {
            result.add_message(CmdMessage::info(config.get(&key)?));
        }
        ConfigAction::Set(key, value) => {
            config.set(&key, &value)?;
            config.save(dir)?;

            let stored = config.get(&key)?;
            tracing::info!(key = %key, value = %stored, "config updated");
            result.add_message(CmdMessage::success(format!("{} set to {}", key, stored)));
        }
    }
    Ok(result.with_config(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::error::VendorError;
    use tempfile::TempDir;

    fn paths(dir: &TempDir) -> VendorPaths {
        VendorPaths::new(dir.path().to_path_buf(), VendorConfig::default())
    }

    #[test]
    fn set_persists_and_show_key_reads_back() {
        let dir = TempDir::new().unwrap();
        let paths = paths(&dir);

        let res = run(
            &paths,
            ConfigAction::Set("report-file".into(), " eod.txt ".into()),
        )
        .unwrap();
        assert_eq!(res.messages[0].level, MessageLevel::Success);
        assert_eq!(res.messages[0].content, "report-file set to eod.txt");

        let res = run(&paths, ConfigAction::ShowKey("report-file".into())).unwrap();
        assert_eq!(res.messages[0].content, "eod.txt");
    }

    #[test]
    fn unknown_key_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let err = run(&paths(&dir), ConfigAction::ShowKey("nope".into())).unwrap_err();
        assert!(matches!(err, VendorError::Config(_)));

        let err = run(&paths(&dir), ConfigAction::Set("nope".into(), "x".into())).unwrap_err();
        assert!(matches!(err, VendorError::Config(_)));
        assert!(!dir.path().join("config.json").exists());
    }

    #[test]
    fn backup_dir_cannot_be_the_data_dir() {
        let dir = TempDir::new().unwrap();
        let err = run(&paths(&dir), ConfigAction::Set("backup-dir".into(), ".".into())).unwrap_err();
        assert!(matches!(err, VendorError::Config(_)));
        assert!(!dir.path().join("config.json").exists());
    }

    #[test]
    fn show_all_returns_config() {
        let dir = TempDir::new().unwrap();
        let res = run(&paths(&dir), ConfigAction::ShowAll).unwrap();
        assert_eq!(res.config, Some(VendorConfig::default()));
        assert!(res.messages.is_empty());
    }
}
