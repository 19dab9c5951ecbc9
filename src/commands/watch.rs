use std::time::Duration;

use anyhow::Result;
use eotis_core::indicator::SystemClock;
use eotis_core::{GridMetrics, IndicatorTicker, ViewWindow};

use crate::render::render_indicator;

pub async fn run(window: ViewWindow, metrics: GridMetrics, refresh: Duration) -> Result<()> {
    let mut ticker = IndicatorTicker::spawn(window.clone(), metrics, refresh, SystemClock);
    let mut updates = ticker.subscribe();

    println!("{}", render_indicator(&window, ticker.current()));

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let position = *updates.borrow_and_update();
                println!("{}", render_indicator(&window, position));
            }
            _ = &mut ctrl_c => break,
        }
    }

    ticker.stop();
    Ok(())
}
