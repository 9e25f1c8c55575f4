use crate::common::SizeTierKey;
use crate::config::Config;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "photo-dup")]
#[command(about = "写真ライブラリと照合してフォルダ内の重複写真を洗い出す", long_about = None)]
pub struct Cli {
    /// 写真ライブラリのルート（database/Photos.sqlite を含む）
    #[arg(required = true)]
    pub catalog_root: PathBuf,

    /// 重複を調べるフォルダ（直下のみ）
    #[arg(required = true)]
    pub target_dir: PathBuf,

    /// 出力HTMLレポート（既存フォルダならその中に exact_matches.html）
    #[arg(short, long)]
    pub report: Option<PathBuf>,

    /// ライブラリ側ファイルのコピー先
    #[arg(short, long)]
    pub cache_dir: Option<PathBuf>,

    /// レポートのヘッダテンプレート
    #[arg(short, long)]
    pub template: Option<PathBuf>,

    /// サイズ索引を引くキー (file-name/file-size)
    #[arg(long)]
    pub size_tier_key: Option<SizeTierKey>,

    /// 有効な設定を表示
    #[arg(long)]
    pub show_config: bool,

    /// 指定したオプションを設定ファイルに保存
    #[arg(long)]
    pub save_config: bool,

    /// 詳細ログを出力
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// 設定ファイルの値にコマンドライン指定を上書きする
    pub fn apply_to(&self, mut config: Config) -> Config {
        if let Some(report) = &self.report {
            config.report_path = report.clone();
        }
        if let Some(cache_dir) = &self.cache_dir {
            config.cache_dir = cache_dir.clone();
        }
        if let Some(template) = &self.template {
            config.template_path = template.clone();
        }
        if let Some(key) = self.size_tier_key {
            config.size_tier_key = key;
        }
        config
    }
}
