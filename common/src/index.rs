//! カタログ索引
//!
//! ライブラリ内にも重複があり得るので、キーごとにレコードのリストを持つ。
//! 構築後は読み取り専用。

use crate::types::CatalogRecord;
use std::collections::HashMap;

/// ファイル名・ファイルサイズの2つの索引
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    by_file_name: HashMap<String, Vec<CatalogRecord>>,
    /// キーはバイト数の10進表記
    by_file_size: HashMap<String, Vec<CatalogRecord>>,
    len: usize,
}

impl CatalogIndex {
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = CatalogRecord>,
    {
        let mut index = Self::default();
        for record in records {
            index.insert(record);
        }
        index
    }

    fn insert(&mut self, record: CatalogRecord) {
        self.by_file_size
            .entry(size_key(record.original_file_size))
            .or_default()
            .push(record.clone());
        self.by_file_name
            .entry(record.original_file_name.clone())
            .or_default()
            .push(record);
        self.len += 1;
    }

    /// ファイル名で引く（登録順）
    pub fn by_file_name(&self, file_name: &str) -> &[CatalogRecord] {
        self.by_file_name
            .get(file_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// サイズ索引をキー文字列で引く（登録順）
    pub fn by_file_size_key(&self, key: &str) -> &[CatalogRecord] {
        self.by_file_size
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn by_file_size(&self, size: u64) -> &[CatalogRecord] {
        self.by_file_size_key(&size_key(size))
    }

    /// 登録レコード数
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// サイズ索引のキー
pub fn size_key(size: u64) -> String {
    size.to_string()
}
