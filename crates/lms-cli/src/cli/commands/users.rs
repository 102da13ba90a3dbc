//! `lms users <batch-id>` – users of a batch as an expandable tree.

use anyhow::Result;
use lms_core::analytics;
use lms_core::api::ApiClient;
use lms_core::config::LmsConfig;
use lms_core::tree::{ExpansionState, NodeKey};
use lms_core::validity::{compute_countdown, Clock, SystemClock};

use super::validity_label;

pub async fn run_users(
    cfg: &LmsConfig,
    batch_id: &str,
    expand: &[String],
    all: bool,
) -> Result<()> {
    let client = ApiClient::from_config(cfg)?;
    let view = analytics::load_batch_users(&client, &cfg.retry_policy(), batch_id).await;
    if let Some(banner) = &view.banner {
        println!("{banner}");
        return Ok(());
    }

    let mut expansion = ExpansionState::new();
    for user in &view.items {
        if all || expand.iter().any(|name| name == &user.username) {
            expansion.expand(NodeKey::user(batch_id, user.username.clone()));
        }
    }

    let now = SystemClock.now();
    println!("{}", NodeKey::batch(batch_id));
    if view.items.is_empty() {
        println!("  (no users)");
    }
    for user in &view.items {
        let key = NodeKey::user(batch_id, user.username.clone());
        let open = expansion.is_expanded(&key);
        println!(
            "  {} {} ({} courses)",
            if open { "-" } else { "+" },
            user.username,
            user.courses.len()
        );
        if !open {
            continue;
        }
        for course in &user.courses {
            println!(
                "      {:<12} {:<28} {:>5.1}%  {}",
                course.course_id,
                course.title,
                course.progress,
                validity_label(compute_countdown(&course.grant, now))
            );
        }
    }
    Ok(())
}
