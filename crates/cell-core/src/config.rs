//! 記憶化單元配置

use serde::{Deserialize, Serialize};

/// 產生器失敗時的處理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FailurePolicy {
    /// 中毒：第一次失敗即耗盡唯一的執行機會，之後每次讀取都回傳同一個錯誤
    #[default]
    Poison,

    /// 重試：失敗不視為完成，下一個呼叫者會再次執行產生器
    Retry,
}

/// 記憶化單元配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoConfig {
    /// 日誌標籤（用於辨識是哪一個單元）
    pub label: Option<String>,

    /// 失敗策略
    pub failure_policy: FailurePolicy,
}

impl MemoConfig {
    /// 創建預設配置（無標籤、中毒策略）
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：設置日誌標籤
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// 建構器模式：設置失敗策略
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// 日誌中顯示的名稱
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or("<unnamed>")
    }
}
