//! # Cell Cache
//!
//! 雙表示快取：同一個邏輯值的兩種表示，以版本號決定哪一側可信，
//! 讀取過期的一側時才透過轉換函數同步。

pub mod converter;
pub mod dual;
pub mod freshness;

// Re-export 主要類型
pub use converter::{fn_converter, try_fn_converter, Converter, FnConverter, TryFnConverter};
pub use dual::DualCache;
pub use freshness::Freshness;
