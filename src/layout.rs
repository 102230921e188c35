// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Force-directed layout for relationship graphs
//!
//! Every node pair repels with `1000 / d²`, every edge pulls its endpoints
//! together with `d * 0.01 * strength`, and positions are clamped to the
//! canvas minus a margin after each iteration. Initial positions come from a
//! [`RandomSource`] so layouts are reproducible under a fixed seed.

use crate::graph::RelationshipGraph;
use crate::types::Position;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};

const REPULSION: f64 = 1000.0;
const ATTRACTION: f64 = 0.01;
const MARGIN: f64 = 50.0;
const MIN_DISTANCE: f64 = 1.0;

/// Source of uniform random numbers in `[0, 1)`
pub trait RandomSource {
    /// Next value in `[0, 1)`
    fn next_f64(&mut self) -> f64;
}

/// Deterministic random source: SHA-256 over `(seed, counter)`
#[derive(Debug, Clone)]
pub struct SeededRandom {
    seed: u64,
    counter: u64,
}

impl SeededRandom {
    /// Source that always yields the same sequence for `seed`
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self { seed, counter: 0 }
    }

    /// Source seeded from the system clock
    #[must_use]
    pub fn from_entropy() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        #[allow(clippy::cast_possible_truncation)]
        Self::new(nanos as u64)
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        let mut hasher = Sha256::new();
        hasher.update(self.seed.to_le_bytes());
        hasher.update(self.counter.to_le_bytes());
        self.counter = self.counter.wrapping_add(1);

        let digest = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        // 53 significant bits map exactly onto [0, 1)
        (u64::from_le_bytes(bytes) >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Canvas and iteration settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Canvas width in logical units
    pub width: f64,
    /// Canvas height in logical units
    pub height: f64,
    /// Simulation steps
    pub iterations: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            iterations: 100,
        }
    }
}

/// Force-directed layout engine
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    /// Engine with the given settings
    #[must_use]
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Clamp bounds along one axis; degenerate canvases collapse to their center
    fn bounds(extent: f64) -> (f64, f64) {
        let lo = MARGIN.min(extent / 2.0);
        let hi = (extent - MARGIN).max(lo);
        (lo, hi)
    }

    /// Random initial positions over the whole canvas
    pub fn initial_positions(&self, count: usize, rng: &mut dyn RandomSource) -> Vec<Position> {
        (0..count)
            .map(|_| Position {
                x: rng.next_f64() * self.config.width,
                y: rng.next_f64() * self.config.height,
            })
            .collect()
    }

    /// Run the simulation from the given positions.
    ///
    /// `links` are `(source, target, strength)` triples of node indices.
    #[must_use]
    pub fn simulate(&self, mut positions: Vec<Position>, links: &[(usize, usize, f64)]) -> Vec<Position> {
        let n = positions.len();
        let (x_lo, x_hi) = Self::bounds(self.config.width);
        let (y_lo, y_hi) = Self::bounds(self.config.height);

        for _ in 0..self.config.iterations {
            let mut shift = vec![(0.0_f64, 0.0_f64); n];

            for i in 0..n {
                for j in (i + 1)..n {
                    let (dx, dy) = separation(positions[i], positions[j]);
                    let distance = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
                    let force = REPULSION / (distance * distance);
                    let (fx, fy) = (dx / distance * force, dy / distance * force);
                    shift[i].0 += fx;
                    shift[i].1 += fy;
                    shift[j].0 -= fx;
                    shift[j].1 -= fy;
                }
            }

            for &(source, target, strength) in links {
                if source == target || source >= n || target >= n {
                    continue;
                }
                let dx = positions[target].x - positions[source].x;
                let dy = positions[target].y - positions[source].y;
                let distance = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
                let force = distance * ATTRACTION * strength;
                let (fx, fy) = (dx / distance * force, dy / distance * force);
                shift[source].0 += fx;
                shift[source].1 += fy;
                shift[target].0 -= fx;
                shift[target].1 -= fy;
            }

            for (position, (sx, sy)) in positions.iter_mut().zip(shift) {
                position.x = (position.x + sx).clamp(x_lo, x_hi);
                position.y = (position.y + sy).clamp(y_lo, y_hi);
            }
        }

        for position in &mut positions {
            position.x = position.x.clamp(x_lo, x_hi);
            position.y = position.y.clamp(y_lo, y_hi);
        }
        positions
    }

    /// Assign a position to every node of the graph
    pub fn apply(&self, graph: &mut RelationshipGraph, rng: &mut dyn RandomSource) {
        let links: Vec<(usize, usize, f64)> = graph
            .edges
            .iter()
            .filter_map(|edge| {
                Some((graph.node_index(&edge.source)?, graph.node_index(&edge.target)?, edge.strength))
            })
            .collect();

        let initial = self.initial_positions(graph.nodes.len(), rng);
        let positions = self.simulate(initial, &links);
        for (node, position) in graph.nodes.iter_mut().zip(positions) {
            node.position = Some(position);
        }
    }
}

/// Vector from `b` to `a`; coincident points get a small fixed offset so they
/// can separate
fn separation(a: Position, b: Position) -> (f64, f64) {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    if dx == 0.0 && dy == 0.0 {
        (MIN_DISTANCE, 0.0)
    } else {
        (dx, dy)
    }
}
