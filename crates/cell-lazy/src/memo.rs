//! 記憶化單元
//!
//! 產生器由 `OnceLock::get_or_init` 保護：同一時間只有一個執行緒會進入初始化，
//! 其餘呼叫者阻塞等待，初始化完成後所有讀取都只剩一次原子檢查。
//!
//! 產生器的 panic 會被捕捉並存成錯誤，所以初始化永遠會「完成」，
//! 不會出現屏障已關閉但值未初始化的狀態。

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Mutex, OnceLock, PoisonError};

use cell_core::{CellError, Result};

/// 記憶化單元
///
/// 失敗即中毒：`FnOnce` 產生器在第一次執行時就被消耗，無法重試，
/// 因此 panic 會被保存下來，之後每一次 `get` 都回傳同一個錯誤。
///
/// 產生器內不可再讀取同一個單元，否則會死結。
///
/// ```
/// use cell_lazy::MemoCell;
///
/// static GREETING: MemoCell<String> = MemoCell::new(|| "你好".repeat(2));
///
/// assert_eq!(GREETING.get().unwrap(), "你好你好");
/// ```
pub struct MemoCell<T, F = fn() -> T> {
    outcome: OnceLock<Result<T>>,
    producer: Mutex<Option<F>>,
    label: Option<String>,
}

impl<T, F: FnOnce() -> T> MemoCell<T, F> {
    /// 以產生器創建尚未初始化的單元
    pub const fn new(producer: F) -> Self {
        Self {
            outcome: OnceLock::new(),
            producer: Mutex::new(Some(producer)),
            label: None,
        }
    }

    /// 建構器模式：設置日誌標籤
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// 取得記憶化的值，必要時執行產生器
    pub fn get(&self) -> Result<&T> {
        self.outcome
            .get_or_init(|| self.run())
            .as_ref()
            .map_err(Clone::clone)
    }

    /// 取得記憶化值的複本
    pub fn get_cloned(&self) -> Result<T>
    where
        T: Clone,
    {
        self.get().cloned()
    }

    fn run(&self) -> Result<T> {
        let producer = self
            .producer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(producer) = producer else {
            return Err(CellError::ProducerConsumed);
        };

        tracing::debug!("執行產生器: {}", self.label());

        // 呼叫即消耗產生器，其捕獲的資源在此釋放
        match panic::catch_unwind(AssertUnwindSafe(producer)) {
            Ok(value) => {
                tracing::debug!("產生器完成: {}", self.label());
                Ok(value)
            }
            Err(payload) => {
                let error = CellError::from_panic(payload);
                tracing::warn!("產生器 {} 失敗，單元已中毒: {}", self.label(), error);
                Err(error)
            }
        }
    }
}

impl<T, F> MemoCell<T, F> {
    /// 創建已初始化的單元（不含產生器）
    pub fn ready(value: T) -> Self {
        Self {
            outcome: OnceLock::from(Ok(value)),
            producer: Mutex::new(None),
            label: None,
        }
    }

    /// 不阻塞、不執行產生器地讀取
    pub fn try_get(&self) -> Option<&T> {
        self.outcome.get().and_then(|outcome| outcome.as_ref().ok())
    }

    /// 值是否已可讀取
    pub fn is_initialized(&self) -> bool {
        self.outcome.get().is_some_and(|outcome| outcome.is_ok())
    }

    /// 產生器是否已失敗
    pub fn is_poisoned(&self) -> bool {
        self.outcome.get().is_some_and(|outcome| outcome.is_err())
    }

    /// 取出結果；產生器尚未執行時回傳 `None`
    pub fn into_inner(self) -> Option<Result<T>> {
        self.outcome.into_inner()
    }

    /// 日誌標籤，未設置時為 `<unnamed>`
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or("<unnamed>")
    }
}

impl<T: Default> Default for MemoCell<T> {
    fn default() -> Self {
        Self::new(T::default)
    }
}

impl<T: fmt::Debug, F> fmt::Debug for MemoCell<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("MemoCell");
        debug.field("label", &self.label());
        match self.outcome.get() {
            Some(Ok(value)) => debug.field("value", value),
            Some(Err(error)) => debug.field("error", error),
            None => debug.field("value", &format_args!("<uninit>")),
        };
        debug.finish()
    }
}
