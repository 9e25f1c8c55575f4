mod exif;

pub use self::exif::{normalize_date_time, ExifExtractor, MetadataExtractor};

use crate::common::{CandidateFile, CatalogIndex, MatchGroups, MatchResult, MatchSignal, Matcher};
use crate::error::{PhotoDupError, Result};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 1回のスキャンで処理する画像の上限。超える分は次の呼び出しで扱う
pub const MAX_SCAN_FILES: usize = 1000;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

/// スキャン結果
#[derive(Debug, Default)]
pub struct ScanReport {
    /// 分類ごとの一致（NONE は含まない）
    pub groups: MatchGroups,
    /// 処理した画像数（上限の対象）
    pub processed: usize,
    /// DateTimeOriginal が無かった画像
    pub no_date: Vec<PathBuf>,
    /// サイズ索引で候補が複数あり判断できなかった画像
    pub ambiguous: Vec<PathBuf>,
    /// メタデータやサイズを読めなかった画像
    pub unreadable: Vec<PathBuf>,
    /// 上限に達して打ち切った
    pub limit_reached: bool,
}

/// 拡張子が対象画像か（大文字小文字は区別しない）
pub fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext))
}

fn is_image_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| is_image_extension(&ext.to_string_lossy()))
        .unwrap_or(false)
}

pub fn scan_folder<E: MetadataExtractor>(
    folder: &Path,
    index: &CatalogIndex,
    extractor: &E,
    matcher: &Matcher,
) -> Result<ScanReport> {
    scan_folder_with(folder, index, extractor, matcher, |_, _| {})
}

/// フォルダ直下の画像を照合する。`on_file` は画像1枚ごとに呼ばれる
///
/// 並び順はファイルシステムが返す順のまま（ソートしない）。
pub fn scan_folder_with<E, F>(
    folder: &Path,
    index: &CatalogIndex,
    extractor: &E,
    matcher: &Matcher,
    mut on_file: F,
) -> Result<ScanReport>
where
    E: MetadataExtractor,
    F: FnMut(&Path, &MatchResult),
{
    if !folder.is_dir() {
        return Err(PhotoDupError::FolderNotFound(folder.display().to_string()));
    }

    let mut report = ScanReport::default();

    for entry in WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1) // 直下のみ（再帰しない）
        .into_iter()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("エントリを読めません: {}", e);
                continue;
            }
        };

        let path = entry.path();
        if !entry.file_type().is_file() || !is_image_path(path) {
            continue;
        }

        let result = match read_candidate(path, entry.metadata().map(|m| m.len()), extractor) {
            Ok(candidate) => {
                let outcome = matcher.match_candidate(index, &candidate);
                match outcome.signal {
                    MatchSignal::NoDate => report.no_date.push(path.to_path_buf()),
                    MatchSignal::AmbiguousSize { .. } => report.ambiguous.push(path.to_path_buf()),
                    MatchSignal::Decided => {}
                }
                outcome.result
            }
            Err(e) => {
                warn!("{}", e);
                report.unreadable.push(path.to_path_buf());
                MatchResult::none()
            }
        };

        on_file(path, &result);
        if result.is_match() {
            debug!("{}: {}", path.display(), result.kind);
        }
        report.groups.push(path.to_path_buf(), result);
        report.processed += 1;

        if report.processed >= MAX_SCAN_FILES {
            info!("{} 枚に達したため打ち切り", MAX_SCAN_FILES);
            report.limit_reached = true;
            break;
        }
    }

    debug!(
        "スキャン完了: {} 枚処理、一致 {} 件",
        report.processed,
        report.groups.len()
    );
    Ok(report)
}

fn read_candidate<E: MetadataExtractor>(
    path: &Path,
    file_size: std::result::Result<u64, walkdir::Error>,
    extractor: &E,
) -> Result<CandidateFile> {
    let file_size = file_size
        .map_err(|e| PhotoDupError::MetadataUnavailable(format!("{}: {}", path.display(), e)))?;
    let metadata = extractor.extract(path)?;
    Ok(CandidateFile::new(path.to_path_buf(), file_size, metadata))
}
