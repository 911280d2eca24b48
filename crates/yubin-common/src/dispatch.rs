use serde::Deserialize;

use crate::lookup::{self, Resolution};
use crate::table::PostalTable;

/// 照合リクエスト。3つの引数はすべて省略可能。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResolveRequest {
    #[serde(default)]
    pub code5: String,
    #[serde(default)]
    pub code7: String,
    #[serde(default)]
    pub addr: String,
}

/// 空でない最初のパラメータに対応する照合パスを1つだけ実行する。
/// 優先順位は code7 → addr → code5。すべて空ならエラーにせず Absent。
pub fn resolve(table: &PostalTable, request: &ResolveRequest) -> Resolution {
    if !request.code7.is_empty() {
        lookup::by_code7(table, &request.code7)
    } else if !request.addr.is_empty() {
        lookup::by_address(table, &request.addr)
    } else if !request.code5.is_empty() {
        lookup::by_code5(table, &request.code5)
    } else {
        Resolution::Absent
    }
}
