//! # Cell Lazy
//!
//! 延遲執行、僅執行一次的記憶化單元
//!
//! - [`MemoCell`]：`FnOnce` 產生器，失敗（panic）即中毒
//! - [`TryMemoCell`]：回傳 `Result` 的產生器，失敗策略可配置
//!
//! 兩者都可由多個執行緒同時讀取：產生器只會執行一次，
//! 晚到的呼叫者會阻塞直到該次執行完成，並看到同一個值。

pub mod memo;
pub mod try_memo;

// Re-export 主要類型
pub use memo::MemoCell;
pub use try_memo::TryMemoCell;
