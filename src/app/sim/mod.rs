//! Force-directed layout solver.
//!
//! The solver is deliberately free of UI types beyond vector math: it mutates
//! a slice of [`SimNode`] kinematic states one discrete tick at a time, so
//! tests (and any host scheduler) can drive it without a live display. Each
//! tick accumulates link springs, Barnes-Hut charge repulsion, centering and
//! axis pulls, integrates damped velocities, then relaxes collisions. All
//! force magnitudes scale with the current alpha, which cools toward
//! `alpha_target` every tick.

mod forces;
mod quadtree;

use eframe::egui::Vec2;

use forces::{
    CollisionParams, accumulate_collision_shifts, accumulate_repulsion, direction_and_distance,
    fallback_direction,
};
use quadtree::QuadNode;

/// Resting temperature requested while a node is being dragged.
pub const DRAG_ALPHA_TARGET: f32 = 0.3;

const BARNES_HUT_THETA: f32 = 0.72;

/// Per-node kinematic state. Shape data (identity, label) stays in the graph
/// model; the solver only sees what it integrates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimNode {
    pub world_pos: Vec2,
    pub velocity: Vec2,
    /// While set, the node is held at this position with zero velocity.
    pub pin: Option<Vec2>,
    pub size: f32,
}

impl SimNode {
    pub fn at(world_pos: Vec2, size: f32) -> Self {
        Self {
            world_pos,
            velocity: Vec2::ZERO,
            pin: None,
            size,
        }
    }
}

/// Cooling schedule state. Alpha starts hot so a fresh graph animates from
/// its initial scatter into equilibrium, then decays toward `alpha_target`.
#[derive(Clone, Copy, Debug)]
pub struct SimState {
    pub alpha: f32,
    pub alpha_target: f32,
    pub alpha_decay: f32,
    pub alpha_min: f32,
}

impl Default for SimState {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            alpha_target: 0.0,
            // Reaches alpha_min from 1.0 in ~300 ticks.
            alpha_decay: 1.0 - 0.001_f32.powf(1.0 / 300.0),
            alpha_min: 0.001,
        }
    }
}

impl SimState {
    pub fn is_settled(&self) -> bool {
        self.alpha < self.alpha_min
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SimParams {
    /// Spring rest length for linked nodes, world units.
    pub link_distance: f32,
    pub link_strength: f32,
    /// Many-body strength; negative repels.
    pub charge_strength: f32,
    /// Pull toward the world origin (the viewport's logical center).
    pub center_strength: f32,
    /// Independent x/y pulls toward the origin axes.
    pub axis_strength: f32,
    /// Clearance added around each node's circle for collision purposes.
    pub collision_margin: f32,
    pub collision_passes: usize,
    /// Velocity retained per tick after forces are applied.
    pub velocity_damping: f32,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            link_distance: 120.0,
            link_strength: 0.5,
            charge_strength: -600.0,
            center_strength: 0.1,
            axis_strength: 0.05,
            collision_margin: 5.0,
            collision_passes: 2,
            velocity_damping: 0.6,
        }
    }
}

pub struct Simulation {
    pub state: SimState,
    pub params: SimParams,
    forces: Vec<Vec2>,
    positions: Vec<Vec2>,
    sizes: Vec<f32>,
    shifts: Vec<Vec2>,
}

impl Simulation {
    pub fn new(params: SimParams) -> Self {
        Self {
            state: SimState::default(),
            params,
            forces: Vec::new(),
            positions: Vec::new(),
            sizes: Vec::new(),
            shifts: Vec::new(),
        }
    }

    /// Whether the scheduler should keep ticking: either the system has not
    /// cooled below `alpha_min`, or a raised target is holding it warm.
    pub fn is_active(&self) -> bool {
        !self.state.is_settled() || self.state.alpha_target > 0.0
    }

    /// Restores full temperature, replaying the settle animation.
    pub fn reheat(&mut self) {
        self.state.alpha = 1.0;
    }

    /// Advances the system by one discrete step. Identical inputs and
    /// identical alpha always produce identical next-state.
    pub fn tick(&mut self, nodes: &mut [SimNode], edges: &[(usize, usize)]) {
        let state = &mut self.state;
        state.alpha += (state.alpha_target - state.alpha) * state.alpha_decay;
        let alpha = state.alpha;

        if nodes.is_empty() {
            return;
        }

        let node_count = nodes.len();
        self.forces.clear();
        self.forces.resize(node_count, Vec2::ZERO);
        self.positions.clear();
        self.sizes.clear();
        for node in nodes.iter() {
            self.positions.push(node.world_pos);
            self.sizes.push(node.size);
        }

        let forces = &mut self.forces;
        let positions = &self.positions;

        // Link springs, force split between the two endpoints.
        for &(source, target) in edges {
            if source >= node_count || target >= node_count || source == target {
                continue;
            }

            let delta = positions[target] - positions[source];
            let (direction, distance) =
                direction_and_distance(delta, fallback_direction(source, target));
            let magnitude =
                (distance - self.params.link_distance) * self.params.link_strength * alpha;
            let correction = direction * (magnitude * 0.5);
            forces[source] += correction;
            forces[target] -= correction;
        }

        // Charge repulsion via Barnes-Hut approximation.
        let repulsion = -self.params.charge_strength * alpha;
        if repulsion != 0.0
            && let Some(tree) = QuadNode::build(positions)
        {
            for (index, force) in forces.iter_mut().enumerate() {
                accumulate_repulsion(&tree, index, positions, repulsion, BARNES_HUT_THETA, force);
            }
        }

        // Centering plus independent axis pulls, all toward the origin.
        let center_pull = self.params.center_strength * alpha;
        let axis_pull = self.params.axis_strength * alpha;
        for (force, position) in forces.iter_mut().zip(positions.iter()) {
            *force -= *position * center_pull;
            force.x -= position.x * axis_pull;
            force.y -= position.y * axis_pull;
        }

        // Integration. Forces are velocity deltas per tick; pinned nodes are
        // held exactly and carry no velocity.
        for (node, force) in nodes.iter_mut().zip(forces.iter()) {
            if let Some(pin) = node.pin {
                node.world_pos = pin;
                node.velocity = Vec2::ZERO;
                continue;
            }

            node.velocity = (node.velocity + *force) * self.params.velocity_damping;
            node.world_pos += node.velocity;
        }

        self.relax_collisions(nodes);
    }

    /// Iterative pairwise separation. Advisory: overlap may survive the pass
    /// budget, but every adjusted pair moves apart along its connecting axis.
    fn relax_collisions(&mut self, nodes: &mut [SimNode]) {
        if self.params.collision_passes == 0 || nodes.len() < 2 {
            return;
        }

        let max_size = self
            .sizes
            .iter()
            .copied()
            .fold(0.0_f32, f32::max);
        let max_distance = (max_size + self.params.collision_margin) * 2.0;
        let params = CollisionParams {
            margin: self.params.collision_margin,
            max_distance_sq: max_distance * max_distance,
        };

        for _ in 0..self.params.collision_passes {
            self.positions.clear();
            for node in nodes.iter() {
                self.positions.push(node.world_pos);
            }

            let Some(tree) = QuadNode::build(&self.positions) else {
                return;
            };

            self.shifts.clear();
            self.shifts.resize(nodes.len(), Vec2::ZERO);
            accumulate_collision_shifts(
                &tree,
                &tree,
                true,
                &self.positions,
                &self.sizes,
                params,
                &mut self.shifts,
            );

            let mut any_overlap = false;
            for (node, shift) in nodes.iter_mut().zip(self.shifts.iter()) {
                if shift.length_sq() > 0.0 {
                    any_overlap = true;
                    if node.pin.is_none() {
                        node.world_pos += *shift;
                    }
                }
            }

            if !any_overlap {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::vec2;

    fn linked_pair() -> (Vec<SimNode>, Vec<(usize, usize)>) {
        let nodes = vec![
            SimNode::at(vec2(-40.0, 0.0), 10.0),
            SimNode::at(vec2(40.0, 10.0), 10.0),
        ];
        (nodes, vec![(0, 1)])
    }

    #[test]
    fn alpha_is_monotone_and_settles_within_bound() {
        let (mut nodes, edges) = linked_pair();
        let mut sim = Simulation::new(SimParams::default());

        let mut previous = sim.state.alpha;
        let mut settled_at = None;
        for tick in 0..400 {
            sim.tick(&mut nodes, &edges);
            assert!(
                sim.state.alpha <= previous + f32::EPSILON,
                "alpha rose at tick {tick} with alpha_target = 0"
            );
            previous = sim.state.alpha;
            if sim.state.is_settled() {
                settled_at = Some(tick);
                break;
            }
        }

        let settled_at = settled_at.expect("simulation never settled");
        assert!(settled_at < 320, "settled too slowly: {settled_at} ticks");
    }

    #[test]
    fn pinned_node_is_invariant_under_forces() {
        let (mut nodes, edges) = linked_pair();
        let pin = vec2(55.0, -20.0);
        nodes[0].pin = Some(pin);

        let mut sim = Simulation::new(SimParams::default());
        for _ in 0..120 {
            sim.tick(&mut nodes, &edges);
            assert_eq!(nodes[0].world_pos, pin);
            assert_eq!(nodes[0].velocity, Vec2::ZERO);
        }
    }

    #[test]
    fn coincident_nodes_separate_without_nan() {
        let mut nodes = vec![
            SimNode::at(vec2(0.0, 0.0), 10.0),
            SimNode::at(vec2(0.0, 0.0), 10.0),
        ];
        let mut sim = Simulation::new(SimParams::default());
        sim.tick(&mut nodes, &[]);

        for node in &nodes {
            assert!(node.world_pos.x.is_finite() && node.world_pos.y.is_finite());
            assert!(node.velocity.x.is_finite() && node.velocity.y.is_finite());
        }
        let distance = (nodes[0].world_pos - nodes[1].world_pos).length();
        assert!(distance >= f32::EPSILON, "nodes still coincident");
    }

    #[test]
    fn ticks_are_deterministic() {
        let run = || {
            let (mut nodes, edges) = linked_pair();
            let mut sim = Simulation::new(SimParams::default());
            for _ in 0..50 {
                sim.tick(&mut nodes, &edges);
            }
            nodes
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn unlinked_nodes_repel() {
        let mut nodes = vec![
            SimNode::at(vec2(-5.0, 0.0), 1.0),
            SimNode::at(vec2(5.0, 0.0), 1.0),
        ];
        let initial = (nodes[0].world_pos - nodes[1].world_pos).length();

        let mut sim = Simulation::new(SimParams {
            collision_passes: 0,
            ..SimParams::default()
        });
        for _ in 0..30 {
            sim.tick(&mut nodes, &[]);
        }

        let settled = (nodes[0].world_pos - nodes[1].world_pos).length();
        assert!(settled > initial, "repulsion did not separate nodes");
    }

    #[test]
    fn raised_target_holds_temperature() {
        let (mut nodes, edges) = linked_pair();
        let mut sim = Simulation::new(SimParams::default());
        sim.state.alpha_target = DRAG_ALPHA_TARGET;

        for _ in 0..500 {
            sim.tick(&mut nodes, &edges);
        }
        assert!(sim.state.alpha > 0.29, "alpha decayed past its target");
        assert!(sim.is_active());
    }

    #[test]
    fn empty_graph_tick_is_a_no_op() {
        let mut sim = Simulation::new(SimParams::default());
        sim.tick(&mut [], &[]);
        assert!(sim.state.alpha < 1.0);
    }
}
