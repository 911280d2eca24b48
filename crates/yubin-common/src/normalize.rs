use unicode_normalization::UnicodeNormalization;

/// 住所表記の置換ルール。上から順に適用する。
///
/// 半角化の後、空白をすべて除去し、番地・号は削除、丁目・番は
/// ハイフンに置換することで、住所を
/// 「<町域名><ハイフン区切りの数字列>」の形に畳み込む。
/// 「番地」を「番」より先に消さないと「○番地」が「○-地」に化ける。
const ADDRESS_RULES: &[(&str, &str)] = &[
    (" ", ""),
    ("番地", ""),
    ("丁目", "-"),
    ("番", "-"),
    ("号", ""),
];

/// 郵便番号の正規化（前後空白とハイフンの除去のみ）。
///
/// 桁数の検証はしない。5桁か7桁かは呼び出し側がどの照合パスを
/// 選ぶかで暗黙に決まり、不正な桁数はどのレコードにも一致しない。
pub fn normalize_postal_code(code: &str) -> String {
    code.trim()
        .chars()
        .filter(|c| !matches!(c, '-' | '－'))
        .collect()
}

/// NFKC互換分解で全角英数・記号・全角スペースを半角に畳む。
pub fn to_half_width(text: &str) -> String {
    text.nfkc().collect()
}

/// 住所文字列の正規化。冪等。
pub fn normalize_address(addr: &str) -> String {
    let mut addr = to_half_width(addr);
    for (pattern, replacement) in ADDRESS_RULES {
        addr = addr.replace(pattern, replacement);
    }
    match addr.strip_suffix('-') {
        Some(stripped) => stripped.to_string(),
        None => addr,
    }
}

/// 事業所名の正規化。
/// 大口事業所データでは「○○○　株式会社」のように法人格の前に
/// 空白が入ることがあるため、半角化の後に詰める。
pub fn normalize_office_name(name: &str) -> String {
    to_half_width(name).replace(" 株式会社", "株式会社")
}
