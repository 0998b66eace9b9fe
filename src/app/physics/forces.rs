use std::collections::HashSet;

use eframe::egui::{Vec2, vec2};

use crate::util::stable_pair;

use super::super::graph::LayoutNode;
use super::{PhysicsScratch, SimParams, StepMask};

const COINCIDENT_DISTANCE: f32 = 0.1;
const HUB_REPULSION_PER_DEGREE: f32 = 0.15;
const MIN_SPRING_DISTANCE: f32 = 1.0;

fn pair_key(a: usize, b: usize) -> (usize, usize) {
    if a < b { (a, b) } else { (b, a) }
}

pub(super) fn build_connectivity(
    node_count: usize,
    edges: &[(usize, usize)],
    mask: &StepMask<'_>,
    adjacency: &mut HashSet<(usize, usize)>,
    degree: &mut Vec<usize>,
) {
    adjacency.clear();
    degree.clear();
    degree.resize(node_count, 0);

    for &(from, to) in edges {
        if from >= node_count || to >= node_count || from == to {
            continue;
        }
        if mask.is_filtered(from) || mask.is_filtered(to) {
            continue;
        }
        if adjacency.insert(pair_key(from, to)) {
            degree[from] += 1;
            degree[to] += 1;
        }
    }
}

pub(super) fn accumulate_repulsion(
    layout: &[LayoutNode],
    mask: &StepMask<'_>,
    params: &SimParams,
    scratch: &mut PhysicsScratch,
) {
    let node_count = layout.len();
    let forces = &mut scratch.forces;

    for i in 0..node_count {
        if mask.is_filtered(i) {
            continue;
        }
        for j in (i + 1)..node_count {
            if mask.is_filtered(j) {
                continue;
            }

            let mut delta = layout[i].pos - layout[j].pos;
            let mut distance = delta.length();
            if distance < COINCIDENT_DISTANCE {
                let (jx, jy) = stable_pair((i, j, scratch.step_counter));
                delta = vec2(jx, jy);
                distance = delta.length().max(COINCIDENT_DISTANCE);
            }

            let mut force = params.repulsion / (distance * distance);
            if distance < params.min_distance {
                force *= params.min_distance / distance;
            }
            if !scratch.adjacency.contains(&pair_key(i, j)) {
                force *= 1.0
                    + HUB_REPULSION_PER_DEGREE * (scratch.degree[i] + scratch.degree[j]) as f32;
            }

            let push = delta / distance * force;
            forces[i] += push;
            forces[j] -= push;
        }
    }
}

pub(super) fn accumulate_attraction(
    layout: &[LayoutNode],
    edges: &[(usize, usize)],
    mask: &StepMask<'_>,
    params: &SimParams,
    forces: &mut [Vec2],
) {
    let node_count = layout.len();
    for &(from, to) in edges {
        if from >= node_count || to >= node_count || from == to {
            continue;
        }
        if mask.is_filtered(from) || mask.is_filtered(to) {
            continue;
        }

        let delta = layout[to].pos - layout[from].pos;
        let distance = delta.length();
        if distance < MIN_SPRING_DISTANCE {
            continue;
        }

        let force = params.attraction * (2.0 + distance).ln() / params.link_length;
        let pull = delta / distance * force;
        forces[from] += pull;
        forces[to] -= pull;
    }
}

pub(super) fn accumulate_gravity(
    layout: &[LayoutNode],
    mask: &StepMask<'_>,
    params: &SimParams,
    forces: &mut [Vec2],
) {
    for (index, (node, force)) in layout.iter().zip(forces.iter_mut()).enumerate() {
        if mask.is_filtered(index) {
            continue;
        }
        *force -= node.pos * params.gravity;
    }
}
