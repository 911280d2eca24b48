use serde::Serialize;

use crate::normalize::{normalize_address, normalize_postal_code};
use crate::record::ResultRecord;
use crate::table::PostalTable;

/// 照合結果。ヒット件数で形が変わる:
/// 0件は `Absent`（ワイヤ上は null）、1件確定は `Single`（オブジェクト）、
/// 候補列挙は `Many`（テーブル順の配列）。
///
/// 入力が不正な形式だった場合もどのレコードにも一致しないだけで、
/// `Absent` と「該当なし」は呼び出し側から区別できない。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Resolution {
    Absent,
    Single(ResultRecord),
    Many(Vec<ResultRecord>),
}

impl Resolution {
    /// 1件だけなら Single に畳む。code5 照合の返し方。
    fn unwrapped(mut matches: Vec<ResultRecord>) -> Self {
        match matches.len() {
            0 => Resolution::Absent,
            1 => Resolution::Single(matches.remove(0)),
            _ => Resolution::Many(matches),
        }
    }

    /// 候補列挙は1件でもリストのまま返す。前方一致照合の返し方。
    fn collected(matches: Vec<ResultRecord>) -> Self {
        if matches.is_empty() {
            Resolution::Absent
        } else {
            Resolution::Many(matches)
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Resolution::Absent)
    }
}

/// 旧5桁番号での照合。
///
/// 5桁は町域より粗い粒度なので、同じコードを共有する全レコードを
/// テーブル順のまま返す。1件だけならリストに包まず単体で返す。
pub fn by_code5(table: &PostalTable, code5: &str) -> Resolution {
    let code5 = normalize_postal_code(code5);

    let matches = table
        .general
        .iter()
        .filter(|record| record.code5 == code5)
        .map(ResultRecord::from)
        .collect();

    Resolution::unwrapped(matches)
}

/// 7桁番号での照合。
///
/// 大口事業所テーブルを先に引き、完全一致は走査順の先勝ちで即確定。
/// 全国版では完全一致が常に前方一致に優先し、完全一致がないときだけ
/// 前方一致の候補（町域分割で粗いコードを引いた場合）をテーブル順で
/// すべて返す。曖昧さは解決せず呼び出し側に列挙で渡す。
pub fn by_code7(table: &PostalTable, code7: &str) -> Resolution {
    let code7 = normalize_postal_code(code7);

    if let Some(record) = table
        .large_account
        .iter()
        .find(|record| record.code7 == code7)
    {
        return Resolution::Single(record.into());
    }

    let mut matches = Vec::new();
    for record in &table.general {
        if record.code7 == code7 {
            return Resolution::Single(record.into());
        }
        if record.code7.starts_with(code7.as_str()) {
            matches.push(ResultRecord::from(record));
        }
    }

    Resolution::collected(matches)
}

/// 住所文字列での照合。
///
/// 大口事業所側は 都道府県+市区町村+町域+小字等 を正規化して完全一致のみ。
/// 全国版側は 都道府県+市区町村+町域 に対して前方一致を両方向試す:
/// 問い合わせの方が詳細（番地まで含む）ならテーブル住所を前方に含むので
/// その町域レコードで即確定、問い合わせの方が粗ければ該当しうる
/// 細粒度の町域レコードを列挙する。どちらが詳細かは事前に分からない。
pub fn by_address(table: &PostalTable, addr: &str) -> Resolution {
    let addr = normalize_address(addr);

    for record in &table.large_account {
        let candidate = format!(
            "{}{}{}{}",
            record.pref_kanji, record.city_kanji, record.town_kanji, record.street_address
        );
        if normalize_address(&candidate) == addr {
            return Resolution::Single(record.into());
        }
    }

    let mut matches = Vec::new();
    for record in &table.general {
        let candidate = format!(
            "{}{}{}",
            record.pref_kanji, record.city_kanji, record.town_kanji
        );
        if addr.starts_with(candidate.as_str()) {
            return Resolution::Single(record.into());
        }
        if candidate.starts_with(addr.as_str()) {
            matches.push(ResultRecord::from(record));
        }
    }

    Resolution::collected(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GeneralRecord, LargeAccountRecord};

    fn general(code5: &str, code7: &str, city: &str, town: &str) -> GeneralRecord {
        GeneralRecord {
            lpb_code: "13111".into(),
            code5: code5.into(),
            code7: code7.into(),
            pref_kanji: "東京都".into(),
            city_kanji: city.into(),
            town_kanji: town.into(),
            ..GeneralRecord::default()
        }
    }

    fn nsw_office() -> LargeAccountRecord {
        LargeAccountRecord {
            lpb_code: "13113".into(),
            office_name_kana: "ﾆﾎﾝｼｽﾃﾑｳｴｱ ｶﾌﾞｼｷｶﾞｲｼﾔ".into(),
            office_name_kanji: "日本システムウエア　株式会社".into(),
            pref_kanji: "東京都".into(),
            city_kanji: "渋谷区".into(),
            town_kanji: "桜丘町".into(),
            street_address: "３１－１１ＮＳＷビル".into(),
            code7: "1508577".into(),
            code5: "150".into(),
        }
    }

    fn ota_table() -> PostalTable {
        PostalTable {
            general: vec![
                general("144", "1440041", "大田区", "羽田空港"),
                general("144", "1440042", "大田区", "羽田旭町"),
                general("144", "1440043", "大田区", "羽田"),
                general("150", "1500031", "渋谷区", "桜丘町"),
            ],
            large_account: vec![nsw_office()],
        }
    }

    #[test]
    fn code5_returns_all_matching_towns_in_table_order() {
        let resolution = by_code5(&ota_table(), "144");

        let Resolution::Many(records) = resolution else {
            panic!("expected list");
        };
        let towns: Vec<_> = records.iter().map(|r| r.town.as_str()).collect();
        assert_eq!(towns, vec!["羽田空港", "羽田旭町", "羽田"]);
    }

    #[test]
    fn code5_unwraps_single_match() {
        let resolution = by_code5(&ota_table(), "150");

        let Resolution::Single(record) = resolution else {
            panic!("expected single record");
        };
        assert_eq!(record.town, "桜丘町");
        assert_eq!(record.office_name, None);
    }

    #[test]
    fn code5_absent_for_unknown_code() {
        assert_eq!(by_code5(&ota_table(), "999"), Resolution::Absent);
    }

    #[test]
    fn code7_exact_match_returns_single() {
        let resolution = by_code7(&ota_table(), "1440041");

        let Resolution::Single(record) = resolution else {
            panic!("expected single record");
        };
        assert_eq!(record.town, "羽田空港");
        assert_eq!(record.street_address, None);
    }

    #[test]
    fn code7_accepts_hyphenated_input() {
        let resolution = by_code7(&ota_table(), "144-0041");
        let Resolution::Single(record) = resolution else {
            panic!("expected single record");
        };
        assert_eq!(record.code7, "1440041");
    }

    #[test]
    fn code7_prefers_large_account_table() {
        let mut table = ota_table();
        // 全国版にも同じ番号の行がある状態を作る
        table.general.push(general("150", "1508577", "渋谷区", "桜丘町"));

        let resolution = by_code7(&table, "1508577");

        let Resolution::Single(record) = resolution else {
            panic!("expected single record");
        };
        assert_eq!(
            record.office_name.as_deref(),
            Some("日本システムウエア株式会社")
        );
        assert_eq!(record.street_address.as_deref(), Some("31-11NSWビル"));
    }

    #[test]
    fn code7_prefix_matches_stay_listed() {
        let resolution = by_code7(&ota_table(), "14400");

        let Resolution::Many(records) = resolution else {
            panic!("expected list");
        };
        let codes: Vec<_> = records.iter().map(|r| r.code7.as_str()).collect();
        assert_eq!(codes, vec!["1440041", "1440042", "1440043"]);
    }

    #[test]
    fn code7_single_prefix_candidate_is_still_a_list() {
        let resolution = by_code7(&ota_table(), "150003");

        let Resolution::Many(records) = resolution else {
            panic!("expected list even for one candidate");
        };
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].town, "桜丘町");
    }

    #[test]
    fn code7_absent_for_unknown_code() {
        assert_eq!(by_code7(&ota_table(), "9990000"), Resolution::Absent);
    }

    #[test]
    fn address_exact_large_account_match_wins() {
        let resolution = by_address(&ota_table(), "東京都渋谷区桜丘町３１－１１ＮＳＷビル");

        let Resolution::Single(record) = resolution else {
            panic!("expected single record");
        };
        assert_eq!(record.code7, "1508577");
        assert_eq!(
            record.office_name.as_deref(),
            Some("日本システムウエア株式会社")
        );
    }

    #[test]
    fn address_with_block_detail_resolves_to_town() {
        let resolution = by_address(&ota_table(), "東京都大田区羽田空港1丁目1番1号");

        let Resolution::Single(record) = resolution else {
            panic!("expected single record");
        };
        assert_eq!(record.code7, "1440041");
    }

    #[test]
    fn coarser_address_lists_finer_towns() {
        let resolution = by_address(&ota_table(), "東京都大田区羽");

        let Resolution::Many(records) = resolution else {
            panic!("expected list");
        };
        let towns: Vec<_> = records.iter().map(|r| r.town.as_str()).collect();
        assert_eq!(towns, vec!["羽田空港", "羽田旭町", "羽田"]);
    }

    #[test]
    fn address_equal_to_a_town_entry_returns_that_record() {
        // 「羽田」は「羽田空港」「羽田旭町」の前方にも現れるが、
        // 問い合わせと等しい町域に達した時点で列挙を打ち切って確定する
        let resolution = by_address(&ota_table(), "東京都大田区羽田");

        let Resolution::Single(record) = resolution else {
            panic!("expected single record");
        };
        assert_eq!(record.code7, "1440043");
    }

    #[test]
    fn address_absent_when_nothing_matches() {
        assert_eq!(
            by_address(&ota_table(), "大阪府大阪市北区梅田"),
            Resolution::Absent
        );
    }

    #[test]
    fn resolution_wire_shapes() {
        assert_eq!(
            serde_json::to_value(Resolution::Absent).unwrap(),
            serde_json::Value::Null
        );

        let single = by_code7(&ota_table(), "1440041");
        assert!(serde_json::to_value(&single).unwrap().is_object());

        let many = by_code5(&ota_table(), "144");
        assert!(serde_json::to_value(&many).unwrap().is_array());
    }
}
