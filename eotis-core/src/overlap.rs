//! Interval overlap math and side-by-side column assignment.
//!
//! `compute_layout` lets overlapping blocks sit on top of each other.
//! Renderers that would rather split a day column between concurrent events
//! can run `assign_columns` over the timed geometry afterwards.

use std::cmp::Ordering;

use serde::Serialize;

use crate::layout::Geometry;

/// Half-open interval overlap: `[a_start, a_end)` and `[b_start, b_end)`.
pub fn overlaps<T: PartialOrd>(a_start: T, a_end: T, b_start: T, b_end: T) -> bool {
    a_start < b_end && b_start < a_end
}

/// Sub-column placement of a timed block within its day column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSlot {
    pub id: String,
    pub day_index: usize,
    /// Zero-based sub-column
    pub column: usize,
    /// Sub-columns in this block's overlap cluster
    pub columns: usize,
}

impl ColumnSlot {
    /// Horizontal `(left, width)` as fractions of the day column.
    pub fn fraction(&self) -> (f64, f64) {
        let width = 1.0 / self.columns as f64;
        (self.column as f64 * width, width)
    }
}

struct Block<'a> {
    input_pos: usize,
    geometry: &'a Geometry,
    top: f64,
    bottom: f64,
}

/// Greedy column assignment over overlap clusters, one day at a time.
///
/// Blocks are visited by top edge (taller first on ties) and dropped into the
/// first sub-column whose last block has ended. A cluster is a maximal run of
/// transitively overlapping blocks; all of its members share one column count.
/// All-day geometry is ignored. Output follows input order.
pub fn assign_columns(geometry: &[Geometry]) -> Vec<ColumnSlot> {
    let mut blocks: Vec<Block> = geometry
        .iter()
        .enumerate()
        .filter_map(|(input_pos, g)| {
            g.vertical_range().map(|(top, bottom)| Block {
                input_pos,
                geometry: g,
                top,
                bottom,
            })
        })
        .collect();

    blocks.sort_by(|a, b| {
        a.geometry
            .day_index()
            .cmp(&b.geometry.day_index())
            .then(a.top.partial_cmp(&b.top).unwrap_or(Ordering::Equal))
            .then(b.bottom.partial_cmp(&a.bottom).unwrap_or(Ordering::Equal))
    });

    let mut slots: Vec<(usize, ColumnSlot)> = Vec::with_capacity(blocks.len());
    let mut cluster_start = 0;
    let mut cluster_span = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    let mut cluster_day = None;
    // (top, bottom) of the last block placed in each sub-column
    let mut column_last: Vec<(f64, f64)> = Vec::new();

    for block in &blocks {
        let day = block.geometry.day_index();
        let starts_new_cluster = cluster_day != Some(day)
            || !overlaps(cluster_span.0, cluster_span.1, block.top, block.bottom);

        if starts_new_cluster {
            close_cluster(&mut slots[cluster_start..], column_last.len());
            cluster_start = slots.len();
            cluster_span = (block.top, block.bottom);
            cluster_day = Some(day);
            column_last.clear();
        }

        let free = column_last
            .iter()
            .position(|(top, bottom)| !overlaps(*top, *bottom, block.top, block.bottom));
        let column = match free {
            Some(free) => {
                column_last[free] = (block.top, block.bottom);
                free
            }
            None => {
                column_last.push((block.top, block.bottom));
                column_last.len() - 1
            }
        };
        cluster_span.1 = cluster_span.1.max(block.bottom);

        slots.push((
            block.input_pos,
            ColumnSlot {
                id: block.geometry.id().to_string(),
                day_index: day,
                column,
                columns: 0,
            },
        ));
    }
    close_cluster(&mut slots[cluster_start..], column_last.len());

    slots.sort_by_key(|(input_pos, _)| *input_pos);
    slots.into_iter().map(|(_, slot)| slot).collect()
}

fn close_cluster(cluster: &mut [(usize, ColumnSlot)], columns: usize) {
    for (_, slot) in cluster {
        slot.columns = columns;
    }
}
