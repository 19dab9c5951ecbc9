use anyhow::Result;
use chrono::Utc;
use eotis_core::{GridMetrics, ViewWindow, current_time_position};

use crate::render::render_indicator;

pub fn run(window: &ViewWindow, metrics: &GridMetrics, json: bool) -> Result<()> {
    let position = current_time_position(window, metrics, Utc::now());

    if json {
        println!("{}", serde_json::to_string_pretty(&position)?);
    } else {
        println!("{}", render_indicator(window, position));
    }

    Ok(())
}
