use crate::common::SizeTierKey;
use crate::error::{PhotoDupError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// ライブラリ側ファイルのコピー先
    pub cache_dir: PathBuf,
    /// 出力するHTMLレポート
    pub report_path: PathBuf,
    /// レポートのヘッダテンプレート
    pub template_path: PathBuf,
    pub size_tier_key: SizeTierKey,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("./img_cache"),
            report_path: PathBuf::from("./exact_matches.html"),
            template_path: PathBuf::from("./templates/matches.html"),
            size_tier_key: SizeTierKey::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// 指定パスから読み込む。ファイルが無ければ既定値
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| PhotoDupError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("photo-dup").join("config.json"))
    }
}
