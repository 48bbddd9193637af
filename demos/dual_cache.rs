//! 雙表示快取示例：交期在日期與字串之間同步，價格在 Decimal 與顯示字串之間同步

use anyhow::Context;
use cellkit::{try_fn_converter, DualCache};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    println!("=== 雙表示快取示例 ===\n");

    let mut due_date = DualCache::from_left(
        NaiveDate::from_ymd_opt(2025, 11, 20).context("無效的初始交期")?,
        try_fn_converter(
            |d: &NaiveDate| Ok(d.format("%Y-%m-%d").to_string()),
            |s: &String| NaiveDate::parse_from_str(s, "%Y-%m-%d"),
        ),
    );

    println!("交期（字串）: {}", due_date.try_read_right()?);

    // 使用者在畫面上修改字串
    due_date.write_right("2025-12-05".to_string());
    println!("交期（日期）: {}", due_date.try_read_left()?);
    println!(
        "版本: 左 {} / 右 {}",
        due_date.left_version(),
        due_date.right_version()
    );

    due_date.write_right("2025-02-30".to_string());
    let invalid = due_date.try_read_left().map(|d| *d);
    if let Err(err) = invalid {
        println!("無效日期，保留舊值: {err}（左側狀態 {:?}）", due_date.left_freshness());
    }

    let mut price = DualCache::from_right(
        "129.5".to_string(),
        try_fn_converter(
            |d: &Decimal| Ok(format!("{:.2}", d)),
            |s: &String| Decimal::from_str(s),
        ),
    );
    let unit = *price.try_read_left()?;
    price.write_left(unit * Decimal::from(12));
    println!("\n整箱價格: {}", price.try_read_right()?);

    Ok(())
}
