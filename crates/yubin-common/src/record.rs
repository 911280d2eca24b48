use serde::{Deserialize, Serialize};

use crate::normalize::{normalize_office_name, to_half_width};
use crate::{GeneralRecord, LargeAccountRecord};

// 使用する列範囲。後続の未使用フラグ列は行長の検証に含めない。
const GENERAL_USED_COLUMNS: usize = 9;
const LARGE_ACCOUNT_USED_COLUMNS: usize = 9;

impl GeneralRecord {
    /// KEN_ALL の固定列順
    /// [全国地方公共団体コード, 旧5桁, 7桁, カナ3列, 漢字3列, …]
    /// から組み立てる。列が足りない行は候補にならない（None）。
    pub fn from_row(row: &[String]) -> Option<Self> {
        if row.len() < GENERAL_USED_COLUMNS {
            return None;
        }

        Some(Self {
            lpb_code: row[0].clone(),
            code5: row[1].trim().to_string(),
            code7: row[2].clone(),
            pref_kana: row[3].clone(),
            city_kana: row[4].clone(),
            town_kana: row[5].clone(),
            pref_kanji: row[6].clone(),
            city_kanji: row[7].clone(),
            town_kanji: row[8].clone(),
        })
    }
}

impl LargeAccountRecord {
    /// JIGYOSYO の固定列順
    /// [所在地JISコード, 事業所名カナ, 事業所名漢字, 都道府県, 市区町村,
    ///  町域, 小字・丁目・番地等, 個別番号7桁, 旧5桁, …]
    /// から組み立てる。
    pub fn from_row(row: &[String]) -> Option<Self> {
        if row.len() < LARGE_ACCOUNT_USED_COLUMNS {
            return None;
        }

        Some(Self {
            lpb_code: row[0].clone(),
            office_name_kana: row[1].clone(),
            office_name_kanji: row[2].clone(),
            pref_kanji: row[3].clone(),
            city_kanji: row[4].clone(),
            town_kanji: row[5].clone(),
            street_address: row[6].clone(),
            code7: row[7].clone(),
            code5: row[8].trim().to_string(),
        })
    }
}

/// 照合結果の統一レコード。
///
/// どちらのテーブル由来でも共通6項目を持ち、大口事業所由来の場合のみ
/// `street_address`（半角化済み）と `office_name`（正規化済み）が付く。
/// 全国版由来の結果にこの2項目が現れることはなく、シリアライズ時も
/// キーごと省略される。クエリごとに新規に構築され、変更されない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub lpb_code: String,
    pub code5: String,
    pub code7: String,
    pub pref: String,
    pub city: String,
    pub town: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub office_name: Option<String>,
}

impl From<&GeneralRecord> for ResultRecord {
    fn from(record: &GeneralRecord) -> Self {
        Self {
            lpb_code: record.lpb_code.clone(),
            code5: record.code5.clone(),
            code7: record.code7.clone(),
            pref: record.pref_kanji.clone(),
            city: record.city_kanji.clone(),
            town: record.town_kanji.clone(),
            street_address: None,
            office_name: None,
        }
    }
}

impl From<&LargeAccountRecord> for ResultRecord {
    fn from(record: &LargeAccountRecord) -> Self {
        Self {
            lpb_code: record.lpb_code.clone(),
            code5: record.code5.clone(),
            code7: record.code7.clone(),
            pref: record.pref_kanji.clone(),
            city: record.city_kanji.clone(),
            town: record.town_kanji.clone(),
            street_address: Some(to_half_width(&record.street_address)),
            office_name: Some(normalize_office_name(&record.office_name_kanji)),
        }
    }
}
