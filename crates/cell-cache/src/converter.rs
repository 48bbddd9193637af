//! 轉換函數
//!
//! 轉換必須是純函數：結果只取決於輸入，且不可持有快取內部狀態的可變存取。

use std::convert::Infallible;
use std::marker::PhantomData;
use std::sync::Arc;

/// 兩種表示之間的轉換
pub trait Converter<L, R> {
    /// 轉換錯誤；不會失敗的轉換使用 `Infallible`
    type Error;

    fn to_right(&self, left: &L) -> Result<R, Self::Error>;

    fn to_left(&self, right: &R) -> Result<L, Self::Error>;
}

impl<L, R, C> Converter<L, R> for &C
where
    C: Converter<L, R> + ?Sized,
{
    type Error = C::Error;

    fn to_right(&self, left: &L) -> Result<R, Self::Error> {
        (**self).to_right(left)
    }

    fn to_left(&self, right: &R) -> Result<L, Self::Error> {
        (**self).to_left(right)
    }
}

impl<L, R, C> Converter<L, R> for Arc<C>
where
    C: Converter<L, R> + ?Sized,
{
    type Error = C::Error;

    fn to_right(&self, left: &L) -> Result<R, Self::Error> {
        (**self).to_right(left)
    }

    fn to_left(&self, right: &R) -> Result<L, Self::Error> {
        (**self).to_left(right)
    }
}

/// 由兩個不會失敗的閉包組成的轉換
#[derive(Clone, Copy)]
pub struct FnConverter<F, G> {
    to_right: F,
    to_left: G,
}

/// 創建不會失敗的轉換
pub fn fn_converter<L, R, F, G>(to_right: F, to_left: G) -> FnConverter<F, G>
where
    F: Fn(&L) -> R,
    G: Fn(&R) -> L,
{
    FnConverter { to_right, to_left }
}

impl<L, R, F, G> Converter<L, R> for FnConverter<F, G>
where
    F: Fn(&L) -> R,
    G: Fn(&R) -> L,
{
    type Error = Infallible;

    fn to_right(&self, left: &L) -> Result<R, Infallible> {
        Ok((self.to_right)(left))
    }

    fn to_left(&self, right: &R) -> Result<L, Infallible> {
        Ok((self.to_left)(right))
    }
}

/// 由兩個可能失敗的閉包組成的轉換，兩者共用錯誤類型 `E`
pub struct TryFnConverter<F, G, E> {
    to_right: F,
    to_left: G,
    _error: PhantomData<fn() -> E>,
}

/// 創建可能失敗的轉換
pub fn try_fn_converter<L, R, E, F, G>(to_right: F, to_left: G) -> TryFnConverter<F, G, E>
where
    F: Fn(&L) -> Result<R, E>,
    G: Fn(&R) -> Result<L, E>,
{
    TryFnConverter {
        to_right,
        to_left,
        _error: PhantomData,
    }
}

impl<L, R, E, F, G> Converter<L, R> for TryFnConverter<F, G, E>
where
    F: Fn(&L) -> Result<R, E>,
    G: Fn(&R) -> Result<L, E>,
{
    type Error = E;

    fn to_right(&self, left: &L) -> Result<R, E> {
        (self.to_right)(left)
    }

    fn to_left(&self, right: &R) -> Result<L, E> {
        (self.to_left)(right)
    }
}

impl<F: Clone, G: Clone, E> Clone for TryFnConverter<F, G, E> {
    fn clone(&self) -> Self {
        Self {
            to_right: self.to_right.clone(),
            to_left: self.to_left.clone(),
            _error: PhantomData,
        }
    }
}
