//! Every level proposes the scale that would make it span the full axis once
//! its minimum padding is reserved; the diagram adopts the largest proposal
//! and the proposing level becomes the reference level.

use log::debug;

use super::types::NodeLayout;
use crate::config::SankeyConfig;
use crate::error::LayoutError;

#[derive(Debug, Clone, Copy)]
pub(super) struct SolvedScale {
    pub scale: f32,
    pub reference_level: usize,
}

pub(super) fn solve(
    nodes: &[NodeLayout],
    levels: &[Vec<usize>],
    config: &SankeyConfig,
) -> Result<SolvedScale, LayoutError> {
    let mut best: Option<(f32, usize)> = None;
    for (level_index, level) in levels.iter().enumerate() {
        if let Some(candidate) = level_scale(nodes, level, level_index, config)? {
            if best.is_none_or(|(value, _)| candidate > value) {
                best = Some((candidate, level_index));
            }
        }
    }
    // Levels that are empty or carry no positive value propose nothing; a
    // diagram made only of those still lays out (with zero-height nodes).
    let (scale, reference_level) = best.unwrap_or((1.0, 0));
    debug!("value scale {scale} set by reference level {reference_level}");
    Ok(SolvedScale {
        scale,
        reference_level,
    })
}

fn level_scale(
    nodes: &[NodeLayout],
    level: &[usize],
    level_index: usize,
    config: &SankeyConfig,
) -> Result<Option<f32>, LayoutError> {
    let count = level.len();
    if count == 0 {
        return Ok(None);
    }
    let pad_min = config.node_pad_min.get(level_index);
    let floor = config.min_node_height;

    let mut active: Vec<f32> = level.iter().map(|&ni| nodes[ni].value.max(0.0)).collect();
    let mut floor_debt = 0.0f32;
    loop {
        let denom = 1.0 - pad_min * (count - 1) as f32 - floor_debt;
        if denom <= 0.0 {
            return Err(LayoutError::LevelOverfull {
                level: level_index,
                count,
            });
        }
        let total: f32 = active.iter().sum();
        if total <= 0.0 {
            return Ok(None);
        }
        let scale = total / denom;
        if floor <= 0.0 {
            return Ok(Some(scale));
        }
        let survivors: Vec<f32> = active
            .iter()
            .copied()
            .filter(|&value| value / scale >= floor)
            .collect();
        if survivors.len() == active.len() {
            return Ok(Some(scale));
        }
        floor_debt += (active.len() - survivors.len()) as f32 * floor;
        active = survivors;
    }
}
