//! `lms stream <path>` – decode a captured `data:` event stream.

use anyhow::{Context, Result};
use lms_core::stream::{self, StreamEvent};
use std::fs;
use std::path::Path;

pub fn run_stream(path: &Path) -> Result<()> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let events = stream::decode_all(&bytes);
    tracing::debug!(events = events.len(), "decoded stream");
    for event in events {
        match event {
            StreamEvent::Data(value) => println!("{value}"),
            StreamEvent::Text(text) => println!("{text}"),
            StreamEvent::Done => println!("[done]"),
        }
    }
    Ok(())
}
