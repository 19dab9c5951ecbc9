use anyhow::Result;
use eotis_core::ViewWindow;

use crate::render::Render;

pub fn run(window: &ViewWindow) -> Result<()> {
    println!("{}", window.render());
    Ok(())
}
