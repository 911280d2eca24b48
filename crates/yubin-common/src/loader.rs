use std::fs;
use std::path::Path;

use encoding_rs::SHIFT_JIS;
use thiserror::Error;
use tracing::{info, warn};

use crate::table::PostalTable;

#[derive(Debug, Error)]
pub enum TableLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}

/// 郵便局配布のデータファイルは Shift_JIS・ヘッダ行なし。
/// デコードしてから行を素の文字列ベクタに展開する。
fn read_rows(path: &Path) -> Result<Vec<Vec<String>>, TableLoadError> {
    let bytes = fs::read(path).map_err(|source| TableLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let (decoded, _, had_errors) = SHIFT_JIS.decode(&bytes);
    if had_errors {
        warn!(path = %path.display(), "undecodable bytes replaced during Shift_JIS decode");
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(decoded.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| TableLoadError::Csv {
            path: path.display().to_string(),
            source,
        })?;
        rows.push(record.iter().map(|field| field.to_string()).collect());
    }

    Ok(rows)
}

/// KEN_ALL / JIGYOSYO の2ファイルからスナップショットを構築する。
/// 列数の足りない行は読み飛ばし、件数だけ警告に残す。
pub fn load_postal_table(ken_all: &Path, jigyosyo: &Path) -> Result<PostalTable, TableLoadError> {
    let general_rows = read_rows(ken_all)?;
    let large_account_rows = read_rows(jigyosyo)?;
    let parsed = (general_rows.len(), large_account_rows.len());

    let table = PostalTable::from_rows(general_rows, large_account_rows);

    let skipped_general = parsed.0 - table.general.len();
    let skipped_large_account = parsed.1 - table.large_account.len();
    if skipped_general > 0 || skipped_large_account > 0 {
        warn!(
            skipped_general,
            skipped_large_account, "rows skipped during table load"
        );
    }

    info!(
        general = table.general.len(),
        large_account = table.large_account.len(),
        "postal tables loaded"
    );

    Ok(table)
}
