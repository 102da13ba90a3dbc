//! `lms batches` – list batches with remaining validity.

use anyhow::Result;
use lms_core::analytics;
use lms_core::api::ApiClient;
use lms_core::config::LmsConfig;
use lms_core::validity::{compute_countdown, Clock, SystemClock};

use super::validity_label;

pub async fn run_batches(cfg: &LmsConfig) -> Result<()> {
    let client = ApiClient::from_config(cfg)?;
    let view = analytics::load_batches(&client, &cfg.retry_policy()).await;
    if let Some(banner) = &view.banner {
        println!("{banner}");
        return Ok(());
    }
    if view.items.is_empty() {
        println!("No batches.");
        return Ok(());
    }

    let now = SystemClock.now();
    println!("{:<10} {:<28} {:<6} {}", "ID", "NAME", "USERS", "VALIDITY");
    for b in &view.items {
        println!(
            "{:<10} {:<28} {:<6} {}",
            b.id,
            b.name,
            b.user_count,
            validity_label(compute_countdown(&b.grant, now))
        );
    }
    Ok(())
}
