//! 照合ロジック
//!
//! 上から順に評価し、最初に決まった段階で確定する:
//! 1. 撮影日時が無ければ NONE
//! 2. ファイル名索引: サイズ一致かつ日時一致で EXACT、日時違いのみなら DIFF_DATE
//! 3. サイズ索引: 日時一致で DIFF_NAME、候補1件なら SIZE_MATCH_ONLY、複数件は NONE

use crate::index::{size_key, CatalogIndex};
use crate::types::{CandidateFile, CatalogRecord, MatchKind, MatchResult};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// サイズ索引を引くときに候補ファイルのどの値をキーにするか
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SizeTierKey {
    /// 候補のファイル名をそのままキーにする（従来の動作）
    #[default]
    FileName,
    /// 実測したファイルサイズをキーにする
    FileSize,
}

impl std::str::FromStr for SizeTierKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "file-name" | "filename" | "name" => Ok(SizeTierKey::FileName),
            "file-size" | "filesize" | "size" => Ok(SizeTierKey::FileSize),
            _ => Err(format!("Unknown size tier key: {}. Use file-name or file-size", s)),
        }
    }
}

impl std::fmt::Display for SizeTierKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SizeTierKey::FileName => write!(f, "file-name"),
            SizeTierKey::FileSize => write!(f, "file-size"),
        }
    }
}

/// 照合で判断に至った経緯（ログ・集計用）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchSignal {
    /// 分類が確定した、または該当なし
    Decided,
    /// DateTimeOriginal が無い
    NoDate,
    /// サイズ索引に日時の合わない候補が複数あり判断できない
    AmbiguousSize { candidates: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    pub result: MatchResult,
    pub signal: MatchSignal,
}

impl MatchOutcome {
    fn decided(result: MatchResult) -> Self {
        Self {
            result,
            signal: MatchSignal::Decided,
        }
    }
}

/// カタログ索引と照合する
#[derive(Debug, Clone, Copy, Default)]
pub struct Matcher {
    size_tier_key: SizeTierKey,
}

impl Matcher {
    pub fn new(size_tier_key: SizeTierKey) -> Self {
        Self { size_tier_key }
    }

    pub fn size_tier_key(&self) -> SizeTierKey {
        self.size_tier_key
    }

    pub fn match_candidate(&self, index: &CatalogIndex, candidate: &CandidateFile) -> MatchOutcome {
        let date = match candidate.date_time_original() {
            Some(date) => date,
            None => {
                debug!("{}: No exif date!", candidate.file_name);
                return MatchOutcome {
                    result: MatchResult::none(),
                    signal: MatchSignal::NoDate,
                };
            }
        };
        debug!("{}: exif date = {}", candidate.file_name, date);

        if let Some(result) = match_by_file_name(index, candidate, date) {
            return MatchOutcome::decided(result);
        }

        let key = match self.size_tier_key {
            SizeTierKey::FileName => candidate.file_name.clone(),
            SizeTierKey::FileSize => size_key(candidate.file_size),
        };
        match_by_file_size(index.by_file_size_key(&key), candidate, date)
    }
}

/// 既定設定（ファイル名キー）で照合する
pub fn match_candidate(index: &CatalogIndex, candidate: &CandidateFile) -> MatchOutcome {
    Matcher::default().match_candidate(index, candidate)
}

fn match_by_file_name(index: &CatalogIndex, candidate: &CandidateFile, date: &str) -> Option<MatchResult> {
    let mut diff_date: Option<&CatalogRecord> = None;

    for record in index.by_file_name(&candidate.file_name) {
        if record.original_file_size != candidate.file_size {
            continue;
        }
        if record.date_time_created == date {
            debug!("{}: exact match {}", candidate.file_name, record.relative_file_path);
            return Some(MatchResult::matched(MatchKind::Exact, record));
        }
        // 後ろにEXACTがあるかもしれないので走査は続ける
        diff_date = Some(record);
    }

    diff_date.map(|record| {
        debug!(
            "{}: different date ({} vs {})",
            candidate.file_name, record.date_time_created, date
        );
        MatchResult::matched(MatchKind::DiffDate, record)
    })
}

fn match_by_file_size(bucket: &[CatalogRecord], candidate: &CandidateFile, date: &str) -> MatchOutcome {
    if let Some(record) = bucket.iter().find(|r| r.date_time_created == date) {
        debug!("{}: same size and date as {}", candidate.file_name, record.original_file_name);
        return MatchOutcome::decided(MatchResult::matched(MatchKind::DiffName, record));
    }

    match bucket {
        [] => MatchOutcome::decided(MatchResult::none()),
        [only] => {
            debug!("{}: size match only ({})", candidate.file_name, only.original_file_name);
            MatchOutcome::decided(MatchResult::matched(MatchKind::SizeMatchOnly, only))
        }
        many => {
            info!(
                "{}: size match only, {} candidates, skipped",
                candidate.file_name,
                many.len()
            );
            MatchOutcome {
                result: MatchResult::none(),
                signal: MatchSignal::AmbiguousSize {
                    candidates: many.len(),
                },
            }
        }
    }
}
