pub mod html;

pub use html::{cache_asset, render_report, RenderSummary, ReportOptions};

use std::path::{Path, PathBuf};

/// 出力先が既存のフォルダならその中に既定名で、それ以外はファイル名としてそのまま
pub fn report_path_for(output: &Path, default_name: &str) -> PathBuf {
    if output.is_dir() {
        output.join(default_name)
    } else {
        output.to_path_buf()
    }
}
