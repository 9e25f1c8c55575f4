use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhotoDupError {
    /// カタログDBが開けない、またはテーブルが無い。処理を続行できない
    #[error("カタログDBを読み込めません: {0}")]
    CatalogUnavailable(String),

    #[error("メタデータを読み込めません: {0}")]
    MetadataUnavailable(String),

    #[error("ライブラリ内のファイルが見つかりません: {0}")]
    MatchedAssetMissing(String),

    #[error("設定エラー: {0}")]
    Config(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

impl From<exif::Error> for PhotoDupError {
    fn from(err: exif::Error) -> Self {
        PhotoDupError::MetadataUnavailable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PhotoDupError>;
