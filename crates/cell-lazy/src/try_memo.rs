//! 可失敗的記憶化單元

use std::fmt;
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Mutex, OnceLock, PoisonError};

use cell_core::{CellError, FailurePolicy, MemoConfig, Result};

/// 可失敗的記憶化單元
///
/// 產生器回傳 `Result<T, E>`。成功後產生器被釋放、值被快取；
/// 失敗時依 [`FailurePolicy`] 處理：
///
/// - `Poison`（預設）：保存錯誤，之後每次讀取都回傳同一個錯誤
/// - `Retry`：錯誤只回傳給這次執行的呼叫者，下一個呼叫者重新執行產生器
///
/// 單元本身不會自動重試。產生器 panic 與回傳 `Err` 一視同仁。
pub struct TryMemoCell<T, E, F = fn() -> std::result::Result<T, E>> {
    outcome: OnceLock<Result<T>>,
    // 互斥鎖同時作為執行閘門：持有者才能執行產生器
    producer: Mutex<Option<F>>,
    config: MemoConfig,
    _error: PhantomData<fn() -> E>,
}

impl<T, E, F> TryMemoCell<T, E, F>
where
    F: FnMut() -> std::result::Result<T, E>,
    E: std::error::Error + Send + Sync + 'static,
{
    /// 以產生器創建尚未初始化的單元（中毒策略）
    pub const fn new(producer: F) -> Self {
        Self {
            outcome: OnceLock::new(),
            producer: Mutex::new(Some(producer)),
            config: MemoConfig {
                label: None,
                failure_policy: FailurePolicy::Poison,
            },
            _error: PhantomData,
        }
    }

    /// 建構器模式：套用配置
    pub fn with_config(mut self, config: MemoConfig) -> Self {
        self.config = config;
        self
    }

    /// 建構器模式：設置失敗策略
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.config.failure_policy = policy;
        self
    }

    /// 取得記憶化的值，必要時執行產生器
    pub fn get(&self) -> Result<&T> {
        if let Some(outcome) = self.outcome.get() {
            return settle(outcome);
        }

        let mut producer = self
            .producer
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // 等待期間可能已有其他呼叫者完成
        if let Some(outcome) = self.outcome.get() {
            return settle(outcome);
        }

        let Some(run) = producer.as_mut() else {
            return Err(CellError::ProducerConsumed);
        };

        tracing::debug!("執行產生器: {}", self.config.display_label());

        let error = match panic::catch_unwind(AssertUnwindSafe(|| run())) {
            Ok(Ok(value)) => {
                *producer = None;
                tracing::debug!("產生器完成: {}", self.config.display_label());
                return settle(self.outcome.get_or_init(|| Ok(value)));
            }
            Ok(Err(error)) => CellError::failed(error),
            Err(payload) => CellError::from_panic(payload),
        };

        match self.config.failure_policy {
            FailurePolicy::Poison => {
                *producer = None;
                tracing::warn!(
                    "產生器 {} 失敗，單元已中毒: {}",
                    self.config.display_label(),
                    error
                );
                settle(self.outcome.get_or_init(|| Err(error)))
            }
            FailurePolicy::Retry => {
                tracing::warn!(
                    "產生器 {} 失敗，下次讀取將重新執行: {}",
                    self.config.display_label(),
                    error
                );
                Err(error)
            }
        }
    }

    /// 取得記憶化值的複本
    pub fn get_cloned(&self) -> Result<T>
    where
        T: Clone,
    {
        self.get().cloned()
    }
}

impl<T, E, F> TryMemoCell<T, E, F> {
    /// 不阻塞、不執行產生器地讀取
    pub fn try_get(&self) -> Option<&T> {
        self.outcome.get().and_then(|outcome| outcome.as_ref().ok())
    }

    /// 值是否已可讀取
    pub fn is_initialized(&self) -> bool {
        self.outcome.get().is_some_and(|outcome| outcome.is_ok())
    }

    /// 是否已中毒（僅 `Poison` 策略會發生）
    pub fn is_poisoned(&self) -> bool {
        self.outcome.get().is_some_and(|outcome| outcome.is_err())
    }

    /// 取出結果；尚未成功或中毒時回傳 `None`
    pub fn into_inner(self) -> Option<Result<T>> {
        self.outcome.into_inner()
    }

    /// 目前的配置
    pub fn config(&self) -> &MemoConfig {
        &self.config
    }
}

fn settle<T>(outcome: &Result<T>) -> Result<&T> {
    outcome.as_ref().map_err(Clone::clone)
}

impl<T: fmt::Debug, E, F> fmt::Debug for TryMemoCell<T, E, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("TryMemoCell");
        debug.field("config", &self.config);
        match self.outcome.get() {
            Some(Ok(value)) => debug.field("value", value),
            Some(Err(error)) => debug.field("error", error),
            None => debug.field("value", &format_args!("<uninit>")),
        };
        debug.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Barrier};
    use std::thread;

    #[derive(Debug, thiserror::Error, PartialEq)]
    #[error("第 {0} 次嘗試失敗")]
    struct AttemptFailed(usize);

    #[test]
    fn test_success_is_cached() {
        let calls = AtomicUsize::new(0);
        let cell = TryMemoCell::new(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, AttemptFailed>(String::from("schema-v3"))
        });

        assert_eq!(cell.get().unwrap(), "schema-v3");
        assert_eq!(cell.get_cloned().unwrap(), "schema-v3");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cell.is_initialized());
    }

    #[test]
    fn test_poison_keeps_original_error() {
        let calls = AtomicUsize::new(0);
        let cell = TryMemoCell::new(|| {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            Err::<u32, _>(AttemptFailed(n))
        });

        for _ in 0..4 {
            let err = cell.get().unwrap_err();
            assert_eq!(err.downcast_ref::<AttemptFailed>(), Some(&AttemptFailed(1)));
            assert_eq!(err.to_string(), "產生器執行失敗: 第 1 次嘗試失敗");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cell.is_poisoned());
        assert!(matches!(
            cell.into_inner(),
            Some(Err(CellError::ProducerFailed(_)))
        ));
    }

    #[test]
    fn test_retry_until_success() {
        let calls = AtomicUsize::new(0);
        let cell = TryMemoCell::new(|| {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n < 3 {
                Err(AttemptFailed(n))
            } else {
                Ok(n * 100)
            }
        })
        .with_failure_policy(FailurePolicy::Retry);

        let first = cell.get().unwrap_err();
        assert_eq!(first.downcast_ref::<AttemptFailed>(), Some(&AttemptFailed(1)));
        assert!(!cell.is_poisoned());
        assert_eq!(cell.try_get(), None);

        let second = cell.get().unwrap_err();
        assert_eq!(second.downcast_ref::<AttemptFailed>(), Some(&AttemptFailed(2)));

        assert_eq!(*cell.get().unwrap(), 300);
        assert_eq!(*cell.get().unwrap(), 300);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[rstest]
    #[case(FailurePolicy::Poison, 1)]
    #[case(FailurePolicy::Retry, 3)]
    fn test_panic_follows_policy(#[case] policy: FailurePolicy, #[case] expected_calls: usize) {
        let calls = AtomicUsize::new(0);
        let cell = TryMemoCell::new(|| -> std::result::Result<u8, AttemptFailed> {
            calls.fetch_add(1, Ordering::SeqCst);
            panic!("索引檔損毀");
        })
        .with_config(MemoConfig::new().with_label("index").with_failure_policy(policy));

        for _ in 0..3 {
            let err = cell.get().unwrap_err();
            assert!(err.is_panic());
            assert!(err.to_string().contains("索引檔損毀"));
        }

        assert_eq!(calls.load(Ordering::SeqCst), expected_calls);
        assert_eq!(cell.config().display_label(), "index");
    }

    #[test]
    fn test_producer_released_after_success() {
        let captured = Arc::new(String::from("payload"));
        let held = Arc::clone(&captured);
        let cell = TryMemoCell::new(move || Ok::<_, AttemptFailed>(held.len()));

        assert_eq!(Arc::strong_count(&captured), 2);
        assert_eq!(*cell.get().unwrap(), 7);
        assert_eq!(Arc::strong_count(&captured), 1);
    }

    #[test]
    fn test_producer_kept_for_retry() {
        let captured = Arc::new(());
        let held = Arc::clone(&captured);
        let cell = TryMemoCell::new(move || {
            let _keep = &held;
            Err::<(), _>(AttemptFailed(0))
        })
        .with_failure_policy(FailurePolicy::Retry);

        assert!(cell.get().is_err());
        assert_eq!(Arc::strong_count(&captured), 2);
    }

    #[test]
    fn test_concurrent_get_runs_producer_once() {
        const THREADS: usize = 12;

        let calls = AtomicUsize::new(0);
        let barrier = Barrier::new(THREADS);
        let cell = TryMemoCell::new(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            thread::sleep(std::time::Duration::from_millis(20));
            Ok::<_, AttemptFailed>(99_u64)
        })
        .with_failure_policy(FailurePolicy::Retry);

        thread::scope(|s| {
            for _ in 0..THREADS {
                s.spawn(|| {
                    barrier.wait();
                    assert_eq!(*cell.get().unwrap(), 99);
                });
            }
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_debug_output() {
        let cell = TryMemoCell::new(|| Ok::<_, AttemptFailed>(1_i8));
        cell.get().unwrap();

        let text = format!("{cell:?}");
        assert!(text.starts_with("TryMemoCell { config: MemoConfig"));
        assert!(text.ends_with("value: 1 }"));
    }
}
