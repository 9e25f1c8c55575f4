//! 写真ライブラリのカタログDB読み込み
//!
//! DBは読み取り専用で開き、索引を作ったらすぐ閉じる。

use crate::common::{CatalogIndex, CatalogRecord};
use crate::error::{PhotoDupError, Result};
use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use log::{debug, info};
use rusqlite::{Connection, OpenFlags, Row};
use std::fmt::Display;
use std::path::{Path, PathBuf};

/// ライブラリ直下からのDBの位置
pub const DATABASE_PATH: &str = "database/Photos.sqlite";

/// ライブラリ直下からの派生画像ツリーの位置
pub const MASTERS_PATH: &str = "resources/derivatives/masters";

/// カタログの日時は 2001-01-01 起点の秒数。Unix起点より31年後
pub const CATALOG_EPOCH_OFFSET_YEARS: i32 = 31;

/// 派生画像のファイル名規則: `IMG_1.jpeg` → `IMG_1_4_5005_c.jpeg`
const DERIVATIVE_SOURCE_MARKER: &str = ".jpeg";
const DERIVATIVE_SUFFIX: &str = "_4_5005_c.jpeg";

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const CATALOG_QUERY: &str = "
    SELECT
        aa.ZORIGINALFILENAME,
        aa.ZORIGINALFILESIZE,
        aa.ZORIGINALHEIGHT,
        aa.ZORIGINALWIDTH,
        ga.ZDATECREATED,
        ga.ZMODIFICATIONDATE,
        ga.ZDIRECTORY,
        ga.ZFILENAME
    FROM
        ZADDITIONALASSETATTRIBUTES aa
        JOIN ZGENERICASSET ga ON aa.ZASSET = ga.Z_PK";

/// DBの1行（NULLを含み得る生の値）
#[derive(Debug)]
struct CatalogRow {
    original_file_name: Option<String>,
    original_file_size: Option<i64>,
    original_height: Option<i64>,
    original_width: Option<i64>,
    date_created: Option<f64>,
    modification_date: Option<f64>,
    directory: Option<String>,
    file_name: Option<String>,
}

impl CatalogRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            original_file_name: row.get(0)?,
            original_file_size: row.get(1)?,
            original_height: row.get(2)?,
            original_width: row.get(3)?,
            date_created: row.get(4)?,
            modification_date: row.get(5)?,
            directory: row.get(6)?,
            file_name: row.get(7)?,
        })
    }

    /// 元ファイル名かサイズが無い行はどの索引からも引けないのでNone
    fn into_record<Tz>(self, tz: &Tz) -> Option<CatalogRecord>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let original_file_name = self.original_file_name?;
        let original_file_size = u64::try_from(self.original_file_size?).ok()?;

        Some(CatalogRecord {
            original_file_name,
            original_file_size,
            original_height: self.original_height.unwrap_or_default(),
            original_width: self.original_width.unwrap_or_default(),
            date_time_created: self
                .date_created
                .and_then(|s| catalog_timestamp(s, tz))
                .unwrap_or_default(),
            modification_date: self
                .modification_date
                .and_then(|s| catalog_timestamp(s, tz))
                .unwrap_or_default(),
            relative_file_path: derivative_path(
                self.directory.as_deref().unwrap_or_default(),
                self.file_name.as_deref().unwrap_or_default(),
            ),
        })
    }
}

pub fn database_path(catalog_root: &Path) -> PathBuf {
    catalog_root.join(DATABASE_PATH)
}

pub fn masters_path(catalog_root: &Path) -> PathBuf {
    catalog_root.join(MASTERS_PATH)
}

/// カタログの秒数を `YYYY-MM-DD HH:MM:SS` に変換する
pub fn catalog_timestamp<Tz>(seconds: f64, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if !seconds.is_finite() {
        return None;
    }
    let unix = DateTime::<Utc>::from_timestamp(seconds.floor() as i64, 0)?;
    let shifted = add_years(unix.naive_utc(), CATALOG_EPOCH_OFFSET_YEARS)?;
    Some(Utc.from_utc_datetime(&shifted).with_timezone(tz).format(DATE_FORMAT).to_string())
}

/// 年だけを進める。平年に無い 2/29 は 3/1 に繰り越す（SQLite の `'+N years'` と同じ）
fn add_years(at: NaiveDateTime, years: i32) -> Option<NaiveDateTime> {
    let year = at.year().checked_add(years)?;
    let date = match NaiveDate::from_ymd_opt(year, at.month(), at.day()) {
        Some(date) => date,
        None => NaiveDate::from_ymd_opt(year, at.month(), at.day() - 1)?.succ_opt()?,
    };
    Some(date.and_time(at.time()))
}

/// 派生画像の相対パス（`ディレクトリ/ファイル名`）
pub fn derivative_path(directory: &str, file_name: &str) -> String {
    format!(
        "{}/{}",
        directory,
        file_name.replace(DERIVATIVE_SOURCE_MARKER, DERIVATIVE_SUFFIX)
    )
}

/// カタログDBを開いて索引を作る
pub fn load_catalog(db_path: &Path) -> Result<CatalogIndex> {
    if !db_path.is_file() {
        return Err(PhotoDupError::CatalogUnavailable(format!(
            "{} がありません",
            db_path.display()
        )));
    }

    let conn = Connection::open_with_flags(
        db_path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(|e| unavailable(db_path, e))?;

    let records = read_records(&conn, &Local).map_err(|e| unavailable(db_path, e))?;
    conn.close().map_err(|(_, e)| unavailable(db_path, e))?;

    info!("カタログ読み込み: {} 件 ({})", records.len(), db_path.display());
    Ok(CatalogIndex::from_records(records))
}

/// 全アセットを読み出す（結合順のまま）
pub fn read_records<Tz>(conn: &Connection, tz: &Tz) -> rusqlite::Result<Vec<CatalogRecord>>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut stmt = conn.prepare(CATALOG_QUERY)?;
    let rows = stmt.query_map([], CatalogRow::from_row)?;

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for row in rows {
        match row?.into_record(tz) {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!("元ファイル名・サイズの無い行をスキップ: {} 件", skipped);
    }
    Ok(records)
}

fn unavailable(db_path: &Path, err: rusqlite::Error) -> PhotoDupError {
    PhotoDupError::CatalogUnavailable(format!("{}: {}", db_path.display(), err))
}
