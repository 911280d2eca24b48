pub mod dispatch;
pub mod loader;
pub mod logging;
pub mod lookup;
pub mod normalize;
pub mod record;
pub mod table;

// Commonly used row shapes for the lookup paths.

/// 全国版郵便番号データ（KEN_ALL）の1レコード。
/// code7 は常に半角数字7桁、code5 は同一郵便区の先頭5桁（空白除去済み）。
/// 同じ code5 を複数レコードが共有するほか、町域名が長すぎて分割された場合や
/// 小字単位で起番される場合は同じ code7 も複数レコードにまたがる。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneralRecord {
    pub lpb_code: String,
    pub code5: String,
    pub code7: String,
    pub pref_kana: String,
    pub city_kana: String,
    pub town_kana: String,
    pub pref_kanji: String,
    pub city_kanji: String,
    pub town_kanji: String,
}

/// 大口事業所個別番号データ（JIGYOSYO）の1レコード。
/// code7 は事業所専用の個別番号。複数番号を持つ事業所では同じ構造が
/// 連番種別つきで繰り返されるため、一意性は保証されない。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LargeAccountRecord {
    pub lpb_code: String,
    pub office_name_kana: String,
    pub office_name_kanji: String,
    pub pref_kanji: String,
    pub city_kanji: String,
    pub town_kanji: String,
    pub street_address: String,
    pub code7: String,
    pub code5: String,
}
