//! Automatic fill layout
//!
//! Packs copies of a base layer onto the sheet under geometric constraints:
//! grid/row/column counts, gaps, and maximum extents in pixels, percent of
//! the sheet, or centimeters resolved through the document DPI. Pure
//! geometry over value types; the caller owns selection and history.

use kurbo::Rect;
use shared::{DocumentSettings, FillDirection, FillDirective, Layer, LayerId};

use crate::error::{EngineError, EngineResult};

/// Tolerance for bounds tests against unit-converted extents
const EPS: f64 = 1e-6;

/// Result of an applied fill, reported to callers
#[derive(Debug, Clone, PartialEq)]
pub struct FillReport {
    /// Id of the first placement (the base layer's identity is preserved)
    pub base_id: LayerId,
    /// Number of copies placed, the identity-preserving one included
    pub generated: usize,
}

/// Full solver output: the replacement layer list plus the report fields
#[derive(Debug, Clone)]
pub struct FillOutcome {
    pub layers: Vec<Layer>,
    pub base_id: LayerId,
    pub generated: usize,
}

/// Compute a fill layout.
///
/// Returns the surviving non-generated layers plus the newly placed copies.
/// The input list is never modified; on error nothing is produced.
pub fn solve(
    layers: &[Layer],
    selection: &[LayerId],
    settings: &DocumentSettings,
    base: Option<&LayerId>,
    directive: &FillDirective,
) -> EngineResult<FillOutcome> {
    let base = resolve_base(layers, selection, base)?;

    let gap = if directive.gap.is_finite() {
        directive.gap.max(0.0)
    } else {
        10.0
    };
    let effective_width = directive
        .max_width
        .map(|m| m.resolve(settings.width, settings.dpi))
        .unwrap_or(settings.width);
    let effective_height = directive
        .max_height
        .map(|m| m.resolve(settings.height, settings.dpi))
        .unwrap_or(settings.height);

    let item_w = base.scaled_width();
    let item_h = base.scaled_height();
    let cell_w = item_w + gap;
    let cell_h = item_h + gap;

    // Grid shape by direction
    let (mut cols, mut rows) = match directive.direction {
        FillDirection::Horizontal => (
            directive
                .count
                .map(|c| c as usize)
                .unwrap_or_else(|| floor_cells(effective_width, cell_w)),
            1,
        ),
        FillDirection::Vertical => (
            1,
            directive
                .count
                .map(|c| c as usize)
                .unwrap_or_else(|| floor_cells(effective_height, cell_h)),
        ),
        FillDirection::Grid => match directive.count {
            Some(count) => {
                let count = count as usize;
                let max_cols_possible = floor_cells(settings.width, cell_w).max(1);
                let mut cols = ((count as f64).sqrt().ceil() as usize).min(max_cols_possible);
                let mut rows = ceil_div(count, cols.max(1));
                // Occupied width must fit; shrink columns, never rows
                while cols as f64 * cell_w - gap > settings.width + EPS && cols > 1 {
                    cols -= 1;
                    rows = ceil_div(count, cols);
                }
                (cols, rows)
            }
            None => (
                fit_cells(effective_width, cell_w, item_w),
                fit_cells(effective_height, cell_h, item_h),
            ),
        },
    };

    if let Some(max_rows) = directive.max_rows {
        rows = rows.min(max_rows as usize);
    }
    if let Some(max_cols) = directive.max_cols {
        cols = cols.min(max_cols as usize);
    }
    // The sheet width is a hard limit regardless of any requested count
    cols = cols.min(floor_cells(settings.width, cell_w).max(1));
    if let Some(count) = directive.count {
        rows = ceil_div(count as usize, cols.max(1));
    }

    let total = directive
        .count
        .map(|c| c as usize)
        .unwrap_or(rows * cols);
    if total <= 1 && directive.count != Some(1) {
        return Err(EngineError::InsufficientSpace);
    }

    // Purge: the base itself plus every copy previously generated from it,
    // so re-running a fill replaces the prior fill instead of stacking
    let mut result: Vec<Layer> = layers
        .iter()
        .filter(|l| l.id != base.id && l.generated_from.as_deref() != Some(base.id.as_str()))
        .cloned()
        .collect();

    let sheet = Rect::new(0.0, 0.0, settings.width, settings.height);
    let mut placed: Vec<Layer> = Vec::new();
    'grid: for r in 0..rows {
        for c in 0..cols {
            if placed.len() >= total {
                break 'grid;
            }
            let x = c as f64 * cell_w;
            let y = r as f64 * cell_h;
            let frame = Rect::new(x, y, x + item_w, y + item_h);
            if frame.x1 > sheet.x1 + EPS || frame.y1 > sheet.y1 + EPS {
                continue;
            }

            let mut copy = base.clone();
            copy.x = x;
            copy.y = y;
            // The first placement keeps the base layer's id and name so
            // callers can keep referring to it
            if !placed.is_empty() {
                copy.id = uuid::Uuid::new_v4().to_string();
                copy.name = format!("{}-copy-{}", base.name, placed.len());
                copy.generated_from = Some(base.id.clone());
            }
            placed.push(copy);
        }
    }

    if placed.is_empty() {
        return Err(EngineError::InsufficientSpace);
    }

    let base_id = placed[0].id.clone();
    let generated = placed.len();
    tracing::debug!(
        base = %base_id,
        cols,
        rows,
        generated,
        "fill layout solved"
    );
    result.extend(placed);

    Ok(FillOutcome {
        layers: result,
        base_id,
        generated,
    })
}

/// Resolve the base layer: explicit id, else a single selection, else the
/// first layer that is not itself a generated copy. A generated copy is
/// traced back to its originating layer.
fn resolve_base<'a>(
    layers: &'a [Layer],
    selection: &[LayerId],
    explicit: Option<&LayerId>,
) -> EngineResult<&'a Layer> {
    let candidate_id = explicit.or(if selection.len() == 1 {
        Some(&selection[0])
    } else {
        None
    });

    let mut layer = match candidate_id {
        Some(id) => layers.iter().find(|l| l.id == *id),
        None => layers.iter().find(|l| l.generated_from.is_none()),
    }
    .ok_or(EngineError::NoBaseLayer)?;

    let mut hops = 0;
    while let Some(parent_id) = &layer.generated_from {
        layer = layers
            .iter()
            .find(|l| l.id == *parent_id)
            .ok_or(EngineError::NoBaseLayer)?;
        hops += 1;
        if hops > layers.len() {
            // lineage loop in hand-edited input
            return Err(EngineError::NoBaseLayer);
        }
    }
    Ok(layer)
}

/// Whole cells fitting in an extent, where each cell carries a trailing gap
fn floor_cells(extent: f64, cell: f64) -> usize {
    if cell <= 0.0 || extent <= 0.0 {
        return 0;
    }
    ((extent + EPS) / cell).floor() as usize
}

/// Like `floor_cells`, but a lone item still counts when it fits without
/// its trailing gap
fn fit_cells(extent: f64, cell: f64, item: f64) -> usize {
    let cells = floor_cells(extent, cell);
    if cells == 0 && item <= extent + EPS {
        1
    } else {
        cells
    }
}

fn ceil_div(value: usize, divisor: usize) -> usize {
    value.div_ceil(divisor)
}
