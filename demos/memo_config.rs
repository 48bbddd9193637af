//! 記憶化單元示例：延遲載入設定，並比較兩種失敗策略

use anyhow::Context;
use cellkit::{FailurePolicy, MemoCell, MemoConfig, TryMemoCell};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== 記憶化單元示例 ===\n");

    // 延遲建立的倉庫代碼表，多個執行緒同時讀取只會建立一次
    let warehouses = MemoCell::new(|| {
        tracing::info!("建立倉庫代碼表");
        HashMap::from([("TPE", "台北一倉"), ("TXG", "台中物流中心"), ("KHH", "高雄港倉")])
    })
    .with_label("warehouses");

    thread::scope(|s| {
        for code in ["TPE", "TXG", "KHH", "TPE"] {
            let warehouses = &warehouses;
            s.spawn(move || match warehouses.get() {
                Ok(table) => println!("  - {code}: {}", table.get(code).unwrap_or(&"未知")),
                Err(err) => println!("  - {code}: 讀取失敗 {err}"),
            });
        }
    });

    // 設定檔通常來自外部 JSON
    let config: MemoConfig =
        serde_json::from_str(r#"{"label":"exchange-rates","failure_policy":"Retry"}"#)
            .context("無法解析單元配置")?;

    println!("\n失敗策略: {:?}", config.failure_policy);
    let attempts = AtomicUsize::new(0);
    let rates = TryMemoCell::new(|| {
        let n = attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if n == 1 {
            "N/A".parse::<f64>()
        } else {
            "31.25".parse::<f64>()
        }
    })
    .with_config(config);

    for round in 1..=3 {
        match rates.get() {
            Ok(rate) => println!("  第 {round} 次讀取: USD/TWD = {rate}"),
            Err(err) => println!("  第 {round} 次讀取失敗: {err}"),
        }
    }

    let poisoned = TryMemoCell::new(|| "N/A".parse::<f64>()).with_config(
        MemoConfig::new()
            .with_label("poisoned")
            .with_failure_policy(FailurePolicy::Poison),
    );
    for round in 1..=2 {
        if let Err(err) = poisoned.get() {
            println!("  中毒單元第 {round} 次讀取: {err}");
        }
    }

    Ok(())
}
