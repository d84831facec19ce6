use crate::commands::{CmdMessage, CmdResult};
use crate::config::RmdifyConfig;
use crate::error::Result;
use std::path::Path;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

pub fn run(data_dir: &Path, action: ConfigAction) -> Result<CmdResult> {
    let mut config = RmdifyConfig::load(data_dir)?;
    let mut result = CmdResult::default();

    match action {
        ConfigAction::ShowAll => {}
        ConfigAction::ShowKey(key) => match config.get(&key) {
            Ok(value) => result.add_message(CmdMessage::info(value)),
            Err(e) => result.add_message(CmdMessage::error(e.to_string())),
        },
        ConfigAction::Set(key, value) => {
            if let Err(e) = config.set(&key, &value) {
                result.add_message(CmdMessage::error(e.to_string()));
                return Ok(result);
            }
            config.save(data_dir)?;
            let shown = config.get(&key).unwrap_or(value);
            result.add_message(CmdMessage::success(format!("{} set to {}", key, shown)));
        }
    }

    Ok(result.with_config(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::export::ExportFormat;
    use tempfile::tempdir;

    #[test]
    fn set_persists_value() {
        let dir = tempdir().unwrap();
        run(
            dir.path(),
            ConfigAction::Set("default-export-format".into(), "html".into()),
        )
        .unwrap();

        let loaded = RmdifyConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.default_export_format, ExportFormat::Html);
    }

    #[test]
    fn show_key_and_unknown_key() {
        let dir = tempdir().unwrap();
        let shown = run(dir.path(), ConfigAction::ShowKey("autosave-delay-ms".into())).unwrap();
        assert_eq!(shown.messages[0].content, "3000");

        let unknown = run(dir.path(), ConfigAction::ShowKey("theme".into())).unwrap();
        assert_eq!(unknown.messages[0].level, MessageLevel::Error);
    }

    #[test]
    fn invalid_value_is_not_saved() {
        let dir = tempdir().unwrap();
        let result = run(
            dir.path(),
            ConfigAction::Set("autosave-delay-ms".into(), "later".into()),
        )
        .unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Error);
        assert!(!dir.path().join("config.json").exists());
    }
}
