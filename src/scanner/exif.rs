use crate::common::DATE_TIME_ORIGINAL;
use crate::error::{PhotoDupError, Result};
use exif::{Field, In, Tag, Value};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// ファイルからメタデータ（タグ名 → 値）を取り出す
///
/// 照合側は `DateTimeOriginal` の有無と値しか見ない。
pub trait MetadataExtractor {
    fn extract(&self, path: &Path) -> Result<HashMap<String, String>>;
}

/// kamadak-exif によるEXIF読み取り
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifExtractor;

impl MetadataExtractor for ExifExtractor {
    fn extract(&self, path: &Path) -> Result<HashMap<String, String>> {
        let file = File::open(path)
            .map_err(|e| PhotoDupError::MetadataUnavailable(format!("{}: {}", path.display(), e)))?;
        let mut bufreader = BufReader::new(file);
        let exif = match exif::Reader::new().read_from_container(&mut bufreader) {
            Ok(exif) => exif,
            // EXIFブロックが無いだけなら日時なしとして扱う
            Err(exif::Error::NotFound(_)) => return Ok(HashMap::new()),
            Err(e) => return Err(e.into()),
        };

        let mut tags = HashMap::new();
        for field in exif.fields().filter(|f| f.ifd_num == In::PRIMARY) {
            if field.tag == Tag::DateTimeOriginal {
                // 空の日時はタグ無しと同じ扱い
                if let Some(date) = ascii_value(field).map(|s| normalize_date_time(&s)) {
                    if !date.is_empty() {
                        tags.insert(DATE_TIME_ORIGINAL.to_string(), date);
                    }
                }
                continue;
            }
            tags.insert(field.tag.to_string(), field.display_value().to_string());
        }

        Ok(tags)
    }
}

fn ascii_value(field: &Field) -> Option<String> {
    match &field.value {
        Value::Ascii(values) => values
            .first()
            .map(|v| String::from_utf8_lossy(v).trim_end_matches('\0').to_string()),
        _ => None,
    }
}

/// `2020:01:01 10:00:00` → `2020-01-01 10:00:00`（先頭2つの `:` だけ置換）
pub fn normalize_date_time(raw: &str) -> String {
    raw.trim().replacen(':', "-", 2)
}
