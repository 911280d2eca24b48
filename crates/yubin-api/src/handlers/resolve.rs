use axum::{
    extract::{Query, State},
    Json,
};

use yubin_common::dispatch::{self, ResolveRequest};
use yubin_common::lookup::Resolution;

use crate::SharedState;

/// 郵便番号・住所の照合エンドポイント。
///
/// `?code5=` / `?code7=` / `?addr=` のうち空でない最初のもの
/// （優先順位 code7 → addr → code5）だけが使われる。
/// ヒットなしはエラーではなく null ボディの 200。
pub async fn resolve_postalcode(
    State(state): State<SharedState>,
    Query(request): Query<ResolveRequest>,
) -> Json<Resolution> {
    let resolution = dispatch::resolve(&state.table, &request);

    tracing::debug!(
        code5 = %request.code5,
        code7 = %request.code7,
        addr = %request.addr,
        absent = resolution.is_absent(),
        "postalcode lookup"
    );

    Json(resolution)
}
