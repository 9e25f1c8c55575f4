//! 重複候補の比較レポート（HTML）
//!
//! 左にスキャンしたファイル、右にライブラリ側のファイルを並べる。
//! ライブラリ側はキャッシュフォルダへコピーしてから参照する。

use crate::common::{CatalogRecord, MatchGroups};
use crate::error::{PhotoDupError, Result};
use log::{debug, warn};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Component, Path, PathBuf};

/// テンプレートが無いときのヘッダ
const DEFAULT_TEMPLATE: &str = include_str!("../../templates/matches.html");

const FOOTER: &str = "</body>\n</html>\n";

#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// ライブラリの `resources/derivatives/masters`
    pub masters_root: PathBuf,
    /// コピー先（相対パスの構造を保つ）
    pub cache_dir: PathBuf,
    /// ヘッダ用テンプレート。無ければ組み込みのものを使う
    pub template: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct RenderSummary {
    pub rows: usize,
    /// ライブラリ側ファイルをコピーできなかった行（スキャン側のパス）
    pub missing: Vec<PathBuf>,
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '\'' => out.push_str("&#39;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

fn load_header(template: Option<&Path>) -> Result<String> {
    match template {
        Some(path) if path.exists() => Ok(std::fs::read_to_string(path)?),
        Some(path) => {
            debug!("テンプレートが無いため組み込みヘッダを使用: {}", path.display());
            Ok(DEFAULT_TEMPLATE.to_string())
        }
        None => Ok(DEFAULT_TEMPLATE.to_string()),
    }
}

/// ライブラリ側の相対パス。先頭の `/` や `.` は外し、`..` を含むものは拒否する
fn relative_asset_path(record: &CatalogRecord) -> Result<PathBuf> {
    let mut relative = PathBuf::new();
    for component in Path::new(&record.relative_file_path).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::RootDir | Component::CurDir => {}
            Component::ParentDir | Component::Prefix(_) => {
                return Err(PhotoDupError::MatchedAssetMissing(format!(
                    "ライブラリ外を指すパス: {}",
                    record.relative_file_path
                )));
            }
        }
    }
    Ok(relative)
}

/// キャッシュ側のパス。常にキャッシュ配下に収まる
pub fn cache_path_for(cache_dir: &Path, record: &CatalogRecord) -> Result<PathBuf> {
    Ok(cache_dir.join(relative_asset_path(record)?))
}

/// ライブラリのファイルをキャッシュへコピーし、コピー先を返す
pub fn cache_asset(record: &CatalogRecord, options: &ReportOptions) -> Result<PathBuf> {
    let relative = relative_asset_path(record)?;
    let source = options.masters_root.join(&relative);
    let target = options.cache_dir.join(&relative);

    let missing = |e: std::io::Error| {
        PhotoDupError::MatchedAssetMissing(format!("{}: {}", source.display(), e))
    };

    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).map_err(missing)?;
    }
    std::fs::copy(&source, &target).map_err(missing)?;

    Ok(target)
}

fn write_row<W: Write>(out: &mut W, candidate: &Path, cached: &Path) -> std::io::Result<()> {
    writeln!(out, "<div class=\"row\">")?;
    writeln!(out, "  <div class=\"column\">")?;
    writeln!(out, "    <img src=\"{}\" style=\"width:100%\">", escape_html(&candidate.to_string_lossy()))?;
    writeln!(out, "  </div>")?;
    writeln!(out, "  <div class=\"column\">")?;
    writeln!(out, "    <img src=\"{}\" style=\"width:100%\">", escape_html(&cached.to_string_lossy()))?;
    writeln!(out, "  </div>")?;
    writeln!(out, "</div>")
}

fn write_missing_row<W: Write>(out: &mut W, candidate: &Path, record: &CatalogRecord) -> std::io::Result<()> {
    writeln!(out, "<div class=\"row missing\">")?;
    writeln!(out, "  <div class=\"column\">")?;
    writeln!(out, "    <img src=\"{}\" style=\"width:100%\">", escape_html(&candidate.to_string_lossy()))?;
    writeln!(out, "  </div>")?;
    writeln!(out, "  <div class=\"column\">")?;
    writeln!(
        out,
        "    <p class=\"missing-note\">ライブラリ側のファイルが見つかりません: {}</p>",
        escape_html(&record.relative_file_path)
    )?;
    writeln!(out, "  </div>")?;
    writeln!(out, "</div>")
}

/// レポートを書き出す。見つからないライブラリ側ファイルはその行だけ警告表示にする
pub fn render_report(groups: &MatchGroups, report_path: &Path, options: &ReportOptions) -> Result<RenderSummary> {
    let header = load_header(options.template.as_deref())?;

    if let Some(parent) = report_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut out = BufWriter::new(File::create(report_path)?);
    out.write_all(header.as_bytes())?;
    if !header.ends_with('\n') {
        writeln!(out)?;
    }

    let mut summary = RenderSummary::default();
    for (kind, rows) in groups.iter() {
        writeln!(out, "<h2>{} Duplicates</h2>", kind.label())?;
        for row in rows {
            match cache_asset(&row.record, options) {
                Ok(cached) => write_row(&mut out, &row.path, &cached)?,
                Err(e) => {
                    warn!("{}", e);
                    write_missing_row(&mut out, &row.path, &row.record)?;
                    summary.missing.push(row.path.clone());
                }
            }
            summary.rows += 1;
        }
        writeln!(out, "<br/><br/>")?;
    }

    out.write_all(FOOTER.as_bytes())?;
    out.flush()?;

    Ok(summary)
}
