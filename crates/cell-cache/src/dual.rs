//! 雙表示快取
//!
//! 兩側各自帶一個單調遞增的版本號，版本號較大（或相等）的一側為可信側。
//! 讀取過期側時才呼叫轉換，並把該側版本號同步到目前最大值；
//! 同一組版本號下轉換最多執行一次。
//!
//! 寫入只把寫入側的版本號加一。若寫入前該側已落後，寫入後可能與另一側
//! 同版本（各自讀回存放的值），甚至仍然落後（下次讀取會被另一側覆蓋）。
//!
//! 讀寫都需要 `&mut self`，快取內部不加鎖。多執行緒共用時，
//! 呼叫者需自行以 `Mutex` 等包住整個快取。

use std::convert::Infallible;
use std::fmt;

use crate::converter::Converter;
use crate::freshness::Freshness;

/// 雙表示快取
///
/// ```
/// use cell_cache::{fn_converter, DualCache};
///
/// let mut cache = DualCache::from_left(5_i64, fn_converter(|l: &i64| l * 2, |r: &i64| r / 2));
///
/// assert_eq!(*cache.read_right(), 10);
/// cache.write_right(100);
/// assert_eq!(*cache.read_left(), 50);
/// ```
#[derive(Clone)]
pub struct DualCache<L, R, C> {
    left: Option<L>,
    right: Option<R>,
    left_version: u64,
    right_version: u64,
    converter: C,
}

impl<L, R, C> DualCache<L, R, C>
where
    C: Converter<L, R>,
{
    /// 以兩側的值與版本號創建
    ///
    /// 呼叫者需保證兩側在給定版本下互相一致。
    pub fn new(left: L, right: R, left_version: u64, right_version: u64, converter: C) -> Self {
        Self {
            left: Some(left),
            right: Some(right),
            left_version,
            right_version,
            converter,
        }
    }

    /// 由左側創建，右側在第一次讀取時才轉換
    pub fn from_left(left: L, converter: C) -> Self {
        Self {
            left: Some(left),
            right: None,
            left_version: 1,
            right_version: 0,
            converter,
        }
    }

    /// 由右側創建，左側在第一次讀取時才轉換
    pub fn from_right(right: R, converter: C) -> Self {
        Self {
            left: None,
            right: Some(right),
            left_version: 0,
            right_version: 1,
            converter,
        }
    }

    /// 讀取左側，過期時由右側轉換
    ///
    /// 轉換失敗時快取維持原狀，之後可再次嘗試。
    pub fn try_read_left(&mut self) -> Result<&L, C::Error> {
        if self.left_version < self.right_version {
            if let Some(source) = &self.right {
                let value = self.converter.to_left(source)?;
                tracing::trace!(
                    "左側過期，由右側轉換（版本 {} -> {}）",
                    self.left_version,
                    self.right_version
                );
                self.left = Some(value);
                self.left_version = self.right_version;
            }
        }

        match self.left.as_ref() {
            Some(value) => Ok(value),
            // 版本號較大的一側必定有值，右側為空時左側不會過期
            None => unreachable!("雙表示快取兩側皆無值"),
        }
    }

    /// 讀取右側，過期時由左側轉換
    ///
    /// 轉換失敗時快取維持原狀，之後可再次嘗試。
    pub fn try_read_right(&mut self) -> Result<&R, C::Error> {
        if self.right_version < self.left_version {
            if let Some(source) = &self.left {
                let value = self.converter.to_right(source)?;
                tracing::trace!(
                    "右側過期，由左側轉換（版本 {} -> {}）",
                    self.right_version,
                    self.left_version
                );
                self.right = Some(value);
                self.right_version = self.left_version;
            }
        }

        match self.right.as_ref() {
            Some(value) => Ok(value),
            None => unreachable!("雙表示快取兩側皆無值"),
        }
    }

    /// 讀取左側（轉換不會失敗時）
    pub fn read_left(&mut self) -> &L
    where
        C: Converter<L, R, Error = Infallible>,
    {
        match self.try_read_left() {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// 讀取右側（轉換不會失敗時）
    pub fn read_right(&mut self) -> &R
    where
        C: Converter<L, R, Error = Infallible>,
    {
        match self.try_read_right() {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// 寫入左側，只遞增左側版本號；右側保持不動直到下次讀取
    pub fn write_left(&mut self, value: L) {
        self.left = Some(value);
        self.left_version += 1;
    }

    /// 寫入右側，只遞增右側版本號；左側保持不動直到下次讀取
    pub fn write_right(&mut self, value: R) {
        self.right = Some(value);
        self.right_version += 1;
    }
}

impl<L, R, C> DualCache<L, R, C> {
    /// 左側為可信側時回傳其值，不觸發轉換
    pub fn peek_left(&self) -> Option<&L> {
        match self.left_freshness() {
            Freshness::Authoritative => self.left.as_ref(),
            Freshness::Stale => None,
        }
    }

    /// 右側為可信側時回傳其值，不觸發轉換
    pub fn peek_right(&self) -> Option<&R> {
        match self.right_freshness() {
            Freshness::Authoritative => self.right.as_ref(),
            Freshness::Stale => None,
        }
    }

    /// 左側版本號
    pub fn left_version(&self) -> u64 {
        self.left_version
    }

    /// 右側版本號
    pub fn right_version(&self) -> u64 {
        self.right_version
    }

    /// 目前最大版本號
    pub fn version(&self) -> u64 {
        self.left_version.max(self.right_version)
    }

    /// 左側狀態
    pub fn left_freshness(&self) -> Freshness {
        Freshness::compare(self.left_version, self.right_version)
    }

    /// 右側狀態
    pub fn right_freshness(&self) -> Freshness {
        Freshness::compare(self.right_version, self.left_version)
    }

    /// 使用中的轉換
    pub fn converter(&self) -> &C {
        &self.converter
    }
}

impl<L: fmt::Debug, R: fmt::Debug, C> fmt::Debug for DualCache<L, R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DualCache")
            .field("left", &self.left)
            .field("right", &self.right)
            .field("left_version", &self.left_version)
            .field("right_version", &self.right_version)
            .finish_non_exhaustive()
    }
}
