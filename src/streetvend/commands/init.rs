use crate::commands::{CmdMessage, CmdResult, VendorPaths};
use crate::error::Result;
use crate::store;

/// Creates the data directory and writes its config if none exists yet.
pub fn run(paths: &VendorPaths) -> Result<CmdResult> {
    let dir = &paths.data_dir;
    store::ensure_dir(dir)?;

    let mut result = CmdResult::default();
    if dir.join("config.json").exists() {
        result.add_message(CmdMessage::info(format!(
            "Data directory already initialized at {}",
            dir.display()
        )));
    } else {
        paths.config.save(dir)?;
        result.add_message(CmdMessage::success(format!(
            "Initialized data directory at {}",
            dir.display()
        )));
    }
    Ok(result.with_config(paths.config.clone()))
}
