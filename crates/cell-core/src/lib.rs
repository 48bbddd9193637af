//! # Cell Core
//!
//! 共用錯誤類型、配置與值包裝類型

pub mod config;
pub mod vary;

use std::any::Any;
use std::sync::Arc;

// Re-export 主要類型
pub use config::{FailurePolicy, MemoConfig};
pub use vary::Vary;

/// 單元錯誤類型
///
/// 可複製：中毒的單元會把同一個失敗交給之後的每一個呼叫者。
#[derive(Debug, Clone, thiserror::Error)]
pub enum CellError {
    #[error("產生器執行時 panic: {0}")]
    ProducerPanicked(Arc<str>),

    #[error("產生器執行失敗: {0}")]
    ProducerFailed(#[source] Arc<dyn std::error::Error + Send + Sync>),

    #[error("產生器已被取走，無法執行")]
    ProducerConsumed,
}

impl CellError {
    /// 由產生器回傳的錯誤建立
    pub fn failed<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ProducerFailed(Arc::new(error))
    }

    /// 由 `catch_unwind` 取得的 panic 內容建立
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "無法辨識的 panic 內容".to_string()
        };
        Self::ProducerPanicked(message.into())
    }

    /// 是否源自 panic
    pub fn is_panic(&self) -> bool {
        matches!(self, Self::ProducerPanicked(_))
    }

    /// 取回原始錯誤（僅 `ProducerFailed`）
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        match self {
            Self::ProducerFailed(source) => source.downcast_ref::<E>(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CellError>;
