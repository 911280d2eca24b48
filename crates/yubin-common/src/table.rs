use crate::{GeneralRecord, LargeAccountRecord};

/// 参照データのスナップショット。
///
/// プロセス起動時に一度だけ構築し、以後は読み取り専用で共有する。
/// 照合はこのスナップショットへの参照を取る純粋関数なので、
/// ロックも無効化ロジックも要らない。
#[derive(Debug, Clone, Default)]
pub struct PostalTable {
    pub general: Vec<GeneralRecord>,
    pub large_account: Vec<LargeAccountRecord>,
}

impl PostalTable {
    /// パース済みの行からスナップショットを組み立てる。
    /// 列が足りない行は黙って読み飛ばされる（候補に一切寄与しない）。
    pub fn from_rows<G, L>(general_rows: G, large_account_rows: L) -> Self
    where
        G: IntoIterator<Item = Vec<String>>,
        L: IntoIterator<Item = Vec<String>>,
    {
        Self {
            general: general_rows
                .into_iter()
                .filter_map(|row| GeneralRecord::from_row(&row))
                .collect(),
            large_account: large_account_rows
                .into_iter()
                .filter_map(|row| LargeAccountRecord::from_row(&row))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.general.is_empty() && self.large_account.is_empty()
    }
}
