use std::path::Path;

use anyhow::{Context, Result};
use eotis_core::overlap::assign_columns;
use eotis_core::source::{EventSource, MemoryEventStore};
use eotis_core::{Granularity, GridMetrics, LayoutPass, ViewWindow};
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::render::{render_layout, render_month};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LayoutOutput<'a> {
    view: &'a str,
    days: Vec<String>,
    hour_height: f64,
    #[serde(flatten)]
    pass: &'a LayoutPass,
    #[serde(skip_serializing_if = "Option::is_none")]
    columns: Option<Vec<eotis_core::overlap::ColumnSlot>>,
}

pub fn run(
    events_path: &Path,
    window: &ViewWindow,
    metrics: &GridMetrics,
    student: Option<&str>,
    columns: bool,
    json: bool,
) -> Result<()> {
    let store = MemoryEventStore::from_json_file(events_path)
        .with_context(|| format!("Failed to load events from {}", events_path.display()))?;
    let events = store.events_for_window(window, student)?;
    let pass = LayoutPass::compute(&events, window, metrics);
    let slots = columns.then(|| assign_columns(&pass.timed));

    if json {
        let output = LayoutOutput {
            view: window.granularity().as_str(),
            days: window.days().iter().map(|d| d.to_string()).collect(),
            hour_height: metrics.hour_height,
            pass: &pass,
            columns: slots,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if pass.is_empty() {
        println!("{}", "No events in this view".dimmed());
        return Ok(());
    }

    match window.granularity() {
        Granularity::Month => println!("{}", render_month(&events, window)),
        _ => println!("{}", render_layout(&events, window, &pass, slots.as_deref())),
    }
    Ok(())
}
