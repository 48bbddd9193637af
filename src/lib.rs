//! # cellkit
//!
//! 延遲執行的記憶化單元與雙表示版本快取
//!
//! - [`MemoCell`] / [`TryMemoCell`]：產生器只執行一次，多執行緒安全
//! - [`DualCache`]：兩種表示以版本號決定可信側，過期側在讀取時才轉換
//! - [`Vary`]：以預設值代表「不存在」的包裝類型

pub use cell_cache::{
    fn_converter, try_fn_converter, Converter, DualCache, FnConverter, Freshness, TryFnConverter,
};
pub use cell_core::{CellError, FailurePolicy, MemoConfig, Result, Vary};
pub use cell_lazy::{MemoCell, TryMemoCell};
