//! エラーケーステスト
//!
//! 致命的なのはカタログ読み込みの失敗だけで、他はスキャンを止めないことを検証

mod support;

use photo_dup_rust::catalog;
use photo_dup_rust::common::{CatalogIndex, Matcher};
use photo_dup_rust::error::PhotoDupError;
use photo_dup_rust::scanner::{self, ExifExtractor};
use rusqlite::Connection;
use std::path::Path;
use support::write_file;
use tempfile::tempdir;

/// DBファイルが無い
#[test]
fn test_catalog_missing_database() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = catalog::load_catalog(&catalog::database_path(dir.path()));

    assert!(matches!(result, Err(PhotoDupError::CatalogUnavailable(_))));
}

/// テーブルが無い
#[test]
fn test_catalog_schema_mismatch() {
    let dir = tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("Photos.sqlite");
    Connection::open(&db_path)
        .unwrap()
        .execute_batch("CREATE TABLE ZSOMETHINGELSE (Z_PK INTEGER PRIMARY KEY);")
        .unwrap();

    let err = catalog::load_catalog(&db_path).unwrap_err();
    assert!(matches!(err, PhotoDupError::CatalogUnavailable(_)));
    assert!(format!("{}", err).contains("Photos.sqlite"));
}

/// SQLiteではないファイル
#[test]
fn test_catalog_not_a_database() {
    let dir = tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("Photos.sqlite");
    std::fs::write(&db_path, "this is not sqlite").unwrap();

    let result = catalog::load_catalog(&db_path);
    assert!(matches!(result, Err(PhotoDupError::CatalogUnavailable(_))));
}

/// 存在しないフォルダをスキャンした場合
#[test]
fn test_scan_nonexistent_folder() {
    let result = scanner::scan_folder(
        Path::new("/nonexistent/path/12345"),
        &CatalogIndex::default(),
        &ExifExtractor,
        &Matcher::default(),
    );

    assert!(matches!(result, Err(PhotoDupError::FolderNotFound(_))));
}

/// EXIFを読めない画像は NONE 扱いでスキャンは続く
#[test]
fn test_unreadable_metadata_is_not_fatal() {
    let dir = tempdir().expect("Failed to create temp dir");
    write_file(dir.path(), "broken1.jpg", 10);
    write_file(dir.path(), "broken2.JPEG", 20);

    let report = scanner::scan_folder(dir.path(), &CatalogIndex::default(), &ExifExtractor, &Matcher::default())
        .expect("スキャン自体は成功する");

    assert_eq!(report.processed, 2);
    assert_eq!(report.unreadable.len(), 2);
    assert!(report.groups.is_empty());
}

/// PhotoDupErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        PhotoDupError::CatalogUnavailable("no such table".to_string()),
        PhotoDupError::MetadataUnavailable("IMG_1.jpg".to_string()),
        PhotoDupError::MatchedAssetMissing("A/IMG_1_4_5005_c.jpeg".to_string()),
        PhotoDupError::Config("テスト設定エラー".to_string()),
        PhotoDupError::FolderNotFound("/path/to/folder".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: PhotoDupError = io_err.into();

    assert!(matches!(err, PhotoDupError::Io(_)));
    let display = format!("{}", err);
    assert!(display.contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: PhotoDupError = json_err.into();

    assert!(matches!(err, PhotoDupError::JsonParse(_)));
}
