//! 結合テスト用のフィクスチャ
//!
//! - カタログDB（必要なテーブルだけを持つSQLite）
//! - EXIF付きの最小JPEG
//! - ファイル名から日時を返すメタデータ抽出器

#![allow(dead_code)]

use photo_dup_rust::common::DATE_TIME_ORIGINAL;
use photo_dup_rust::error::Result;
use photo_dup_rust::scanner::MetadataExtractor;
use rusqlite::{params, Connection};
use std::cell::Cell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// 2001-01-01 から 2020-01-01 10:00:00 (UTC) までの秒数
pub const CATALOG_2020_01_01_10H: f64 = 6940.0 * 86400.0 + 10.0 * 3600.0;

const SCHEMA: &str = "
    CREATE TABLE ZGENERICASSET (
        Z_PK INTEGER PRIMARY KEY,
        ZDATECREATED TIMESTAMP,
        ZMODIFICATIONDATE TIMESTAMP,
        ZDIRECTORY VARCHAR,
        ZFILENAME VARCHAR
    );
    CREATE TABLE ZADDITIONALASSETATTRIBUTES (
        Z_PK INTEGER PRIMARY KEY,
        ZASSET INTEGER,
        ZORIGINALFILENAME VARCHAR,
        ZORIGINALFILESIZE INTEGER,
        ZORIGINALHEIGHT INTEGER,
        ZORIGINALWIDTH INTEGER
    );";

#[derive(Debug, Clone)]
pub struct FixtureAsset {
    pub original_name: &'static str,
    pub size: i64,
    pub created: f64,
    pub directory: &'static str,
    pub file_name: &'static str,
}

impl FixtureAsset {
    pub fn new(original_name: &'static str, size: i64, created: f64) -> Self {
        Self {
            original_name,
            size,
            created,
            directory: "2020/01/01",
            file_name: "IMG_0001.jpeg",
        }
    }

    pub fn stored_as(mut self, directory: &'static str, file_name: &'static str) -> Self {
        self.directory = directory;
        self.file_name = file_name;
        self
    }
}

/// `<root>/database/Photos.sqlite` を作ってパスを返す
pub fn create_catalog(root: &Path, assets: &[FixtureAsset]) -> PathBuf {
    let db_dir = root.join("database");
    std::fs::create_dir_all(&db_dir).expect("DBフォルダ作成失敗");
    let db_path = db_dir.join("Photos.sqlite");

    let conn = Connection::open(&db_path).expect("DB作成失敗");
    conn.execute_batch(SCHEMA).expect("スキーマ作成失敗");

    for (i, asset) in assets.iter().enumerate() {
        let pk = i as i64 + 1;
        conn.execute(
            "INSERT INTO ZGENERICASSET (Z_PK, ZDATECREATED, ZMODIFICATIONDATE, ZDIRECTORY, ZFILENAME)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![pk, asset.created, asset.created + 60.0, asset.directory, asset.file_name],
        )
        .expect("アセット追加失敗");
        conn.execute(
            "INSERT INTO ZADDITIONALASSETATTRIBUTES
                (Z_PK, ZASSET, ZORIGINALFILENAME, ZORIGINALFILESIZE, ZORIGINALHEIGHT, ZORIGINALWIDTH)
             VALUES (?1, ?2, ?3, ?4, 3024, 4032)",
            params![pk + 100, pk, asset.original_name, asset.size],
        )
        .expect("属性追加失敗");
    }

    db_path
}

/// 指定サイズのダミーファイルを作る
pub fn write_file(dir: &Path, name: &str, size: usize) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, vec![0u8; size]).expect("ファイル作成失敗");
    path
}

/// ファイル名ごとに決まった DateTimeOriginal を返す。呼び出し回数も数える
pub struct StubExtractor {
    dates: HashMap<String, String>,
    pub calls: Cell<usize>,
}

impl StubExtractor {
    pub fn new(pairs: &[(&str, &str)]) -> Self {
        Self {
            dates: pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            calls: Cell::new(0),
        }
    }
}

impl MetadataExtractor for StubExtractor {
    fn extract(&self, path: &Path) -> Result<HashMap<String, String>> {
        self.calls.set(self.calls.get() + 1);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let mut tags = HashMap::new();
        tags.insert("Make".to_string(), "\"Apple\"".to_string());
        if let Some(date) = self.dates.get(&name) {
            tags.insert(DATE_TIME_ORIGINAL.to_string(), date.clone());
        }
        Ok(tags)
    }
}

/// APP1(Exif) だけを持つ最小のJPEG
///
/// `date` があれば Exif IFD に DateTimeOriginal を、無ければ IFD0 に Orientation だけを入れる。
pub fn jpeg_with_exif(date: Option<&str>) -> Vec<u8> {
    let mut tiff: Vec<u8> = Vec::new();
    tiff.extend_from_slice(b"II");
    tiff.extend_from_slice(&42u16.to_le_bytes());
    tiff.extend_from_slice(&8u32.to_le_bytes());

    match date {
        Some(date) => {
            let mut value = date.as_bytes().to_vec();
            value.push(0);

            // IFD0: ExifIFDPointer -> 26
            tiff.extend_from_slice(&1u16.to_le_bytes());
            push_entry(&mut tiff, 0x8769, 4, 1, 26);
            tiff.extend_from_slice(&0u32.to_le_bytes());

            // Exif IFD: DateTimeOriginal -> 44
            tiff.extend_from_slice(&1u16.to_le_bytes());
            push_entry(&mut tiff, 0x9003, 2, value.len() as u32, 44);
            tiff.extend_from_slice(&0u32.to_le_bytes());

            tiff.extend_from_slice(&value);
        }
        None => {
            // IFD0: Orientation = 1（SHORTは値フィールドに直接入る）
            tiff.extend_from_slice(&1u16.to_le_bytes());
            push_entry(&mut tiff, 0x0112, 3, 1, 1);
            tiff.extend_from_slice(&0u32.to_le_bytes());
        }
    }

    let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE1];
    let segment_len = (2 + 6 + tiff.len()) as u16;
    jpeg.extend_from_slice(&segment_len.to_be_bytes());
    jpeg.extend_from_slice(b"Exif\0\0");
    jpeg.extend_from_slice(&tiff);
    jpeg.extend_from_slice(&[0xFF, 0xD9]);
    jpeg
}

fn push_entry(buf: &mut Vec<u8>, tag: u16, typ: u16, count: u32, value: u32) {
    buf.extend_from_slice(&tag.to_le_bytes());
    buf.extend_from_slice(&typ.to_le_bytes());
    buf.extend_from_slice(&count.to_le_bytes());
    buf.extend_from_slice(&value.to_le_bytes());
}
