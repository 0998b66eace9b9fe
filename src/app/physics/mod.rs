mod forces;
mod scheduler;

use std::collections::HashSet;

use eframe::egui::Vec2;

use super::graph::LayoutNode;
use forces::{accumulate_attraction, accumulate_gravity, accumulate_repulsion, build_connectivity};
pub use scheduler::{FrameScheduler, RepaintScheduler, SimulationLoop, TickHandle};

pub const MAX_SPEED: f32 = 15.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimParams {
    pub repulsion: f32,
    pub attraction: f32,
    pub gravity: f32,
    pub link_length: f32,
    pub min_distance: f32,
    pub steps_per_frame: usize,
    pub threshold: f32,
    pub damping: f32,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            repulsion: 20_000.0,
            attraction: 5.0,
            gravity: 0.01,
            link_length: 150.0,
            min_distance: 80.0,
            steps_per_frame: 5,
            threshold: 2.0,
            damping: 0.85,
        }
    }
}

/// Per-node participation in a step. Filtered nodes are invisible to every force;
/// pinned nodes push and pull others but never move.
#[derive(Clone, Copy, Debug)]
pub struct StepMask<'a> {
    pub filtered: &'a [bool],
    pub pinned: &'a [bool],
}

impl StepMask<'_> {
    pub fn is_filtered(&self, index: usize) -> bool {
        self.filtered.get(index).copied().unwrap_or(false)
    }

    pub fn is_pinned(&self, index: usize) -> bool {
        self.pinned.get(index).copied().unwrap_or(false)
    }
}

#[derive(Debug, Default)]
pub struct PhysicsScratch {
    forces: Vec<Vec2>,
    degree: Vec<usize>,
    adjacency: HashSet<(usize, usize)>,
    step_counter: u64,
}

impl PhysicsScratch {
    pub fn forces(&self) -> &[Vec2] {
        &self.forces
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StepOutcome {
    pub movement: f32,
    pub moved_nodes: usize,
}

pub fn accumulate_forces(
    layout: &[LayoutNode],
    edges: &[(usize, usize)],
    mask: &StepMask<'_>,
    params: &SimParams,
    scratch: &mut PhysicsScratch,
) {
    let node_count = layout.len();
    scratch.forces.clear();
    scratch.forces.resize(node_count, Vec2::ZERO);

    build_connectivity(
        node_count,
        edges,
        mask,
        &mut scratch.adjacency,
        &mut scratch.degree,
    );
    accumulate_repulsion(layout, mask, params, scratch);
    accumulate_attraction(layout, edges, mask, params, &mut scratch.forces);
    accumulate_gravity(layout, mask, params, &mut scratch.forces);
}

pub fn step_physics(
    layout: &mut [LayoutNode],
    edges: &[(usize, usize)],
    mask: &StepMask<'_>,
    params: &SimParams,
    scratch: &mut PhysicsScratch,
) -> StepOutcome {
    accumulate_forces(layout, edges, mask, params, scratch);
    scratch.step_counter = scratch.step_counter.wrapping_add(1);

    let mut outcome = StepOutcome::default();
    for (index, (node, force)) in layout.iter_mut().zip(&scratch.forces).enumerate() {
        if mask.is_filtered(index) {
            continue;
        }
        if mask.is_pinned(index) {
            node.vel = Vec2::ZERO;
            continue;
        }

        let mut velocity = (node.vel + *force) * params.damping;
        let speed = velocity.length();
        if speed > MAX_SPEED {
            velocity *= MAX_SPEED / speed;
        }

        node.vel = velocity;
        node.pos += velocity;
        outcome.movement += velocity.x.abs() + velocity.y.abs();
        outcome.moved_nodes += 1;
    }

    outcome
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;

    fn node(id: &str, x: f32, y: f32) -> LayoutNode {
        LayoutNode {
            id: id.to_owned(),
            pos: vec2(x, y),
            vel: Vec2::ZERO,
            width: 60.0,
        }
    }

    fn open_mask(count: usize) -> (Vec<bool>, Vec<bool>) {
        (vec![false; count], vec![false; count])
    }

    #[test]
    fn unconnected_hubs_repel_harder_than_connected_pairs() {
        let layout = vec![
            node("a", -100.0, 0.0),
            node("b", 100.0, 0.0),
            node("c", -100.0, 500.0),
            node("d", 100.0, 500.0),
        ];
        let (filtered, pinned) = open_mask(4);
        let mask = StepMask {
            filtered: &filtered,
            pinned: &pinned,
        };
        let params = SimParams {
            attraction: 0.0,
            gravity: 0.0,
            ..SimParams::default()
        };

        let mut connected = PhysicsScratch::default();
        accumulate_forces(&layout, &[(0, 1), (2, 3)], &mask, &params, &mut connected);
        let mut cross = PhysicsScratch::default();
        accumulate_forces(&layout, &[(0, 2), (1, 3)], &mask, &params, &mut cross);

        // a-b are linked in the first layout only; unlinked degree-1 pairs get a 1.3x boost.
        let linked_push = connected.forces()[0].x;
        let unlinked_push = cross.forces()[0].x;
        assert!(linked_push < 0.0 && unlinked_push < 0.0);
        assert!(unlinked_push.abs() > linked_push.abs());
    }

    #[test]
    fn coincident_nodes_are_pushed_apart_without_nan() {
        let mut layout = vec![node("a", 5.0, 5.0), node("b", 5.0, 5.0)];
        let (filtered, pinned) = open_mask(2);
        let mask = StepMask {
            filtered: &filtered,
            pinned: &pinned,
        };
        let mut scratch = PhysicsScratch::default();

        step_physics(&mut layout, &[], &mask, &SimParams::default(), &mut scratch);

        assert!(layout.iter().all(|node| node.pos.x.is_finite() && node.pos.y.is_finite()));
        assert!((layout[0].pos - layout[1].pos).length() > 0.1);
    }

    #[test]
    fn speed_is_clamped_and_damping_applied() {
        let mut layout = vec![node("a", 0.0, 0.0), node("b", 1.0, 0.0)];
        let (filtered, pinned) = open_mask(2);
        let mask = StepMask {
            filtered: &filtered,
            pinned: &pinned,
        };
        let mut scratch = PhysicsScratch::default();

        step_physics(&mut layout, &[], &mask, &SimParams::default(), &mut scratch);

        for node in &layout {
            assert!(node.vel.length() <= MAX_SPEED + 1e-3);
        }
    }

    #[test]
    fn pinned_nodes_hold_position_but_still_repel() {
        let mut layout = vec![node("root", 0.0, 0.0), node("leaf", 40.0, 0.0)];
        let filtered = vec![false, false];
        let pinned = vec![true, false];
        let mask = StepMask {
            filtered: &filtered,
            pinned: &pinned,
        };
        let mut scratch = PhysicsScratch::default();

        let outcome = step_physics(&mut layout, &[], &mask, &SimParams::default(), &mut scratch);

        assert_eq!(layout[0].pos, Vec2::ZERO);
        assert_eq!(layout[0].vel, Vec2::ZERO);
        assert!(layout[1].pos.x > 40.0);
        assert_eq!(outcome.moved_nodes, 1);
    }

    #[test]
    fn filtered_nodes_exert_and_receive_no_force() {
        let layout = vec![
            node("a", -80.0, 10.0),
            node("b", 90.0, -20.0),
            node("hidden", 5.0, 5.0),
        ];
        let edges = [(0, 1), (0, 2), (2, 1)];
        let filtered = vec![false, false, true];
        let pinned = vec![false; 3];
        let mask = StepMask {
            filtered: &filtered,
            pinned: &pinned,
        };
        let params = SimParams::default();
        let mut scratch = PhysicsScratch::default();
        accumulate_forces(&layout, &edges, &mask, &params, &mut scratch);

        let reduced = vec![layout[0].clone(), layout[1].clone()];
        let (reduced_filtered, reduced_pinned) = open_mask(2);
        let reduced_mask = StepMask {
            filtered: &reduced_filtered,
            pinned: &reduced_pinned,
        };
        let mut reduced_scratch = PhysicsScratch::default();
        accumulate_forces(&reduced, &[(0, 1)], &reduced_mask, &params, &mut reduced_scratch);

        assert_eq!(scratch.forces()[2], Vec2::ZERO);
        for index in 0..2 {
            let difference = scratch.forces()[index] - reduced_scratch.forces()[index];
            assert!(difference.length() < 1e-5, "node {index} felt the hidden node");
        }
    }

    #[test]
    fn gravity_pulls_toward_origin() {
        let layout = vec![node("a", 300.0, -200.0)];
        let (filtered, pinned) = open_mask(1);
        let mask = StepMask {
            filtered: &filtered,
            pinned: &pinned,
        };
        let mut scratch = PhysicsScratch::default();
        accumulate_forces(&layout, &[], &mask, &SimParams::default(), &mut scratch);

        let force = scratch.forces()[0];
        assert!((force - vec2(-3.0, 2.0)).length() < 1e-4);
    }
}
