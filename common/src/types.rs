//! 照合に使う型定義
//!
//! - CatalogRecord: 写真ライブラリ（カタログDB）の1アセット
//! - CandidateFile: スキャン対象フォルダで見つかった1ファイル
//! - MatchKind / MatchResult: 照合の分類と一致したレコード
//! - MatchGroups: 分類ごとの照合結果（出現順を保持）

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// 撮影日時のEXIFタグ名
pub const DATE_TIME_ORIGINAL: &str = "DateTimeOriginal";

/// カタログDBから読み込んだ既知アセット（読み込み後は不変）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRecord {
    pub original_file_name: String,
    pub original_file_size: u64,
    pub original_height: i64,
    pub original_width: i64,

    /// 作成日時（`YYYY-MM-DD HH:MM:SS`、ローカルタイム）
    #[serde(default)]
    pub date_time_created: String,

    #[serde(default)]
    pub modification_date: String,

    /// `resources/derivatives/masters/` からの相対パス
    pub relative_file_path: String,
}

/// スキャン中の1ファイル。照合が終われば捨てられる
#[derive(Debug, Clone, Default)]
pub struct CandidateFile {
    pub path: PathBuf,
    pub file_name: String,
    pub file_size: u64,
    /// タグ名 → 値
    pub metadata: HashMap<String, String>,
}

impl CandidateFile {
    pub fn new(path: PathBuf, file_size: u64, metadata: HashMap<String, String>) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Self {
            path,
            file_name,
            file_size,
            metadata,
        }
    }

    /// 正規化済みの撮影日時（タグが無ければNone）
    pub fn date_time_original(&self) -> Option<&str> {
        self.metadata.get(DATE_TIME_ORIGINAL).map(String::as_str)
    }
}

/// 照合の分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchKind {
    /// ファイル名・サイズ・撮影日時がすべて一致
    Exact,
    /// ファイル名・サイズは一致、撮影日時が異なる
    DiffDate,
    /// サイズ側の索引で撮影日時が一致
    DiffName,
    /// サイズ側の索引に候補が1件だけ（日時は不一致）
    SizeMatchOnly,
    None,
}

impl MatchKind {
    /// レポート見出しに使う表示名
    pub fn label(&self) -> &'static str {
        match self {
            MatchKind::Exact => "EXACT",
            MatchKind::DiffDate => "DIFF DATE",
            MatchKind::DiffName => "DIFF NAME",
            MatchKind::SizeMatchOnly => "SIZE MATCH",
            MatchKind::None => "NONE",
        }
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 1ファイルの照合結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub kind: MatchKind,
    pub record: Option<CatalogRecord>,
}

impl MatchResult {
    pub fn none() -> Self {
        Self {
            kind: MatchKind::None,
            record: None,
        }
    }

    pub fn matched(kind: MatchKind, record: &CatalogRecord) -> Self {
        Self {
            kind,
            record: Some(record.clone()),
        }
    }

    pub fn is_match(&self) -> bool {
        self.kind != MatchKind::None
    }
}

/// レポートの1行分：スキャン時のパスと一致したカタログレコード
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedFile {
    pub path: PathBuf,
    pub record: CatalogRecord,
}

/// 分類ごとの照合結果
///
/// 分類は最初に出現した順、各分類内の行は追加順に並ぶ。
#[derive(Debug, Clone, Default)]
pub struct MatchGroups {
    groups: Vec<(MatchKind, Vec<MatchedFile>)>,
}

impl MatchGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// 一致した結果を追加する。`NONE` やレコード無しは無視してfalseを返す
    pub fn push(&mut self, path: PathBuf, result: MatchResult) -> bool {
        let record = match (result.kind, result.record) {
            (MatchKind::None, _) | (_, None) => return false,
            (_, Some(record)) => record,
        };

        let entry = MatchedFile { path, record };
        match self.groups.iter_mut().find(|(kind, _)| *kind == result.kind) {
            Some((_, rows)) => rows.push(entry),
            None => self.groups.push((result.kind, vec![entry])),
        }
        true
    }

    pub fn get(&self, kind: MatchKind) -> &[MatchedFile] {
        self.groups
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, rows)| rows.as_slice())
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (MatchKind, &[MatchedFile])> {
        self.groups.iter().map(|(kind, rows)| (*kind, rows.as_slice()))
    }

    /// 分類の並び（出現順）
    pub fn kinds(&self) -> Vec<MatchKind> {
        self.groups.iter().map(|(kind, _)| *kind).collect()
    }

    /// 全分類の行数合計
    pub fn len(&self) -> usize {
        self.groups.iter().map(|(_, rows)| rows.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
