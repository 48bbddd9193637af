//! 非預設值標記
//!
//! `Vary<T>` 只存一個 `T`，並把 `T::default()` 視為「不存在」。
//! 與 `Option<T>` 不同，它無法區分「不存在」與「剛好存了預設值」；
//! 需要三態語意的呼叫者應改用 `Option<T>`。

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// 非預設值標記
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Vary<T> {
    value: T,
}

impl<T: Default + PartialEq> Vary<T> {
    /// 以給定值創建
    pub fn new(value: T) -> Self {
        Self { value }
    }

    /// 創建不存在的值（即 `T::default()`）
    pub fn none() -> Self {
        Self::default()
    }

    /// 內部值是否為預設值
    pub fn is_none(&self) -> bool {
        self.value == T::default()
    }

    /// 內部值是否不為預設值
    pub fn is_some(&self) -> bool {
        !self.is_none()
    }

    /// 設置內部值
    pub fn set(&mut self, value: T) {
        self.value = value;
    }

    pub fn get(&self) -> Option<&T> {
        if self.is_none() {
            None
        } else {
            Some(&self.value)
        }
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        if self.is_none() {
            None
        } else {
            Some(&mut self.value)
        }
    }

    /// 存在時回傳內部值，否則回傳 `default`
    pub fn unwrap_or(self, default: T) -> T {
        if self.is_none() {
            default
        } else {
            self.value
        }
    }

    /// 取出內部值，原位置留下預設值
    pub fn take(&mut self) -> Option<T> {
        if self.is_none() {
            return None;
        }
        Some(std::mem::take(&mut self.value))
    }

    pub fn into_option(self) -> Option<T> {
        if self.is_none() {
            None
        } else {
            Some(self.value)
        }
    }
}

impl<T: Default + PartialEq> From<Option<T>> for Vary<T> {
    fn from(value: Option<T>) -> Self {
        Self::new(value.unwrap_or_default())
    }
}

impl<T: Default + PartialEq> From<Vary<T>> for Option<T> {
    fn from(value: Vary<T>) -> Self {
        value.into_option()
    }
}

impl<T: Default + PartialEq + fmt::Debug> fmt::Debug for Vary<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(value) => write!(f, "Some({value:?})"),
            None => f.write_str("None"),
        }
    }
}

impl<T> Serialize for Vary<T>
where
    T: Default + PartialEq + Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.get() {
            Some(value) => serializer.serialize_some(value),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de, T> Deserialize<'de> for Vary<T>
where
    T: Default + PartialEq + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Self::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use uuid::Uuid;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Record {
        #[serde(default)]
        value: i32,
        #[serde(default)]
        owner: Vary<String>,
    }

    #[test]
    fn test_set_take_cycle() {
        let mut vary: Vary<String> = Vary::none();
        assert!(vary.is_none());
        assert_eq!(vary.get(), None);

        vary.set("BIKE-001".to_string());
        assert!(vary.is_some());
        assert_eq!(vary.get().map(String::as_str), Some("BIKE-001"));

        if let Some(value) = vary.get_mut() {
            value.push_str("-A");
        }

        let taken = vary.take();
        assert_eq!(taken.as_deref(), Some("BIKE-001-A"));
        assert!(vary.is_none());
        assert_eq!(vary.take(), None);

        vary.set("FRAME-002".to_string());
        assert_eq!(vary.into_option().as_deref(), Some("FRAME-002"));
        // 已取出的值不受影響
        assert_eq!(taken.as_deref(), Some("BIKE-001-A"));
    }

    #[test]
    fn test_default_value_is_absent() {
        // 存入預設值與不存在無法區分
        let vary = Vary::new(0_i32);
        assert!(vary.is_none());
        assert_eq!(vary, Vary::none());
        assert_eq!(vary.unwrap_or(7), 7);

        let nil = Vary::new(Uuid::nil());
        assert!(nil.is_none());

        let id = Uuid::new_v4();
        assert_eq!(Vary::new(id).get(), Some(&id));
    }

    #[rstest]
    #[case(Vary::new(5), "Some(5)")]
    #[case(Vary::new(0), "None")]
    #[case(Vary::none(), "None")]
    fn test_debug_format(#[case] vary: Vary<i32>, #[case] expected: &str) {
        assert_eq!(format!("{vary:?}"), expected);
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Vary::from(Some(3_u8)).get(), Some(&3));
        assert!(Vary::<u8>::from(None).is_none());
        assert!(Vary::from(Some(0_u8)).is_none());

        let opt: Option<u8> = Vary::new(9).into();
        assert_eq!(opt, Some(9));
    }

    #[test]
    fn test_serialize() {
        assert_eq!(serde_json::to_string(&Vary::new(5)).unwrap(), "5");
        assert_eq!(serde_json::to_string(&Vary::<i32>::none()).unwrap(), "null");
    }

    #[rstest]
    #[case(r#"{}"#, None)]
    #[case(r#"{"owner": null}"#, None)]
    #[case(r#"{"owner": ""}"#, None)]
    #[case(r#"{"owner": "planner"}"#, Some("planner"))]
    fn test_deserialize_field(#[case] json: &str, #[case] expected: Option<&str>) {
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.owner.get().map(String::as_str), expected);
    }

    #[test]
    fn test_deserialize_rejects_wrong_type() {
        let result: Result<Vary<i32>, _> = serde_json::from_str(r#""five""#);
        assert!(result.is_err());
    }
}
