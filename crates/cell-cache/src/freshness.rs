//! 單側新鮮度
//!
//! 不保存任何「過期」標記，狀態完全由兩側版本號比較得出。

/// 單側狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// 版本號不小於另一側，值可直接使用
    Authoritative,
    /// 版本號落後，讀取時需要轉換
    Stale,
}

impl Freshness {
    /// 由本側與另一側的版本號判定（同版本視為可信）
    pub fn compare(own_version: u64, other_version: u64) -> Self {
        if own_version >= other_version {
            Self::Authoritative
        } else {
            Self::Stale
        }
    }

    /// 是否需要轉換
    pub fn is_stale(self) -> bool {
        self == Self::Stale
    }
}
