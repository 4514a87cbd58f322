use eframe::egui::{Vec2, vec2};

use super::quadtree::QuadNode;

/// Minimum squared distance substituted when two nodes coincide, so repulsion
/// math never divides by zero.
pub(super) const MIN_DISTANCE_SQ: f32 = 1.0;

/// Deterministic unit vector for separating coincident pairs; derived from
/// both indices so each side of a pair pushes the opposite way.
pub(super) fn fallback_direction(a: usize, b: usize) -> Vec2 {
    let angle = ((a as f32) * 0.618_034 + (b as f32) * 0.414_214) * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin())
}

pub(super) fn direction_and_distance(delta: Vec2, fallback: Vec2) -> (Vec2, f32) {
    let distance_sq = delta.length_sq();
    if distance_sq <= f32::EPSILON {
        return (fallback, MIN_DISTANCE_SQ.sqrt());
    }
    let distance = distance_sq.sqrt();
    (delta / distance, distance)
}

/// Accumulates many-body repulsion on one node by walking the quadtree,
/// approximating distant cells by their center of mass.
pub(super) fn accumulate_repulsion(
    node: &QuadNode,
    index: usize,
    positions: &[Vec2],
    strength: f32,
    theta: f32,
    force: &mut Vec2,
) {
    if node.mass <= 0.0 {
        return;
    }

    let point = positions[index];

    if node.is_leaf() {
        for &other in &node.indices {
            if other == index {
                continue;
            }
            let delta = point - positions[other];
            let (direction, distance) = direction_and_distance(delta, vec2(1.0, 0.0));
            let distance_sq = (distance * distance).max(MIN_DISTANCE_SQ);
            *force += direction * (strength / distance_sq);
        }
        return;
    }

    let delta = point - node.center_of_mass;
    let distance_sq = delta.length_sq().max(MIN_DISTANCE_SQ);
    let distance = distance_sq.sqrt();
    let can_approximate =
        !node.quad.contains(point) && (node.quad.side_length() / distance) < theta;

    if can_approximate {
        let direction = delta / distance;
        *force += direction * (strength * node.mass / distance_sq);
        return;
    }

    for child in node.children.iter().flatten() {
        accumulate_repulsion(child, index, positions, strength, theta, force);
    }
}

#[derive(Clone, Copy)]
pub(super) struct CollisionParams {
    pub(super) margin: f32,
    pub(super) max_distance_sq: f32,
}

fn resolve_pair(
    from: usize,
    to: usize,
    positions: &[Vec2],
    sizes: &[f32],
    params: CollisionParams,
    shifts: &mut [Vec2],
) {
    let delta = positions[from] - positions[to];
    let (direction, distance) = direction_and_distance(delta, fallback_direction(from, to));

    // Per-node collision radius is size + margin, matching the drawn circle
    // plus clearance.
    let min_distance = sizes[from] + sizes[to] + (params.margin * 2.0);
    if distance < min_distance {
        let push = (min_distance - distance) * 0.5;
        shifts[from] += direction * push;
        shifts[to] -= direction * push;
    }
}

/// Walks quadtree cell pairs and accumulates positional separation for every
/// overlapping node pair within reach. Pure accumulation; the caller applies
/// shifts afterwards so traversal never observes partially-moved state.
pub(super) fn accumulate_collision_shifts(
    node_a: &QuadNode,
    node_b: &QuadNode,
    same_node: bool,
    positions: &[Vec2],
    sizes: &[f32],
    params: CollisionParams,
    shifts: &mut [Vec2],
) {
    if node_a.quad.distance_sq_to(node_b.quad) > params.max_distance_sq {
        return;
    }

    if node_a.is_leaf() && node_b.is_leaf() {
        if same_node {
            for i in 0..node_a.indices.len() {
                for j in (i + 1)..node_a.indices.len() {
                    resolve_pair(
                        node_a.indices[i],
                        node_a.indices[j],
                        positions,
                        sizes,
                        params,
                        shifts,
                    );
                }
            }
        } else {
            for &from in &node_a.indices {
                for &to in &node_b.indices {
                    resolve_pair(from, to, positions, sizes, params, shifts);
                }
            }
        }
        return;
    }

    if same_node {
        for first in 0..4 {
            let Some(child_a) = node_a.children[first].as_ref() else {
                continue;
            };

            accumulate_collision_shifts(child_a, child_a, true, positions, sizes, params, shifts);

            for second in (first + 1)..4 {
                let Some(child_b) = node_a.children[second].as_ref() else {
                    continue;
                };
                accumulate_collision_shifts(
                    child_a, child_b, false, positions, sizes, params, shifts,
                );
            }
        }
        return;
    }

    let split_a = if node_a.is_leaf() {
        false
    } else if node_b.is_leaf() {
        true
    } else {
        node_a.quad.half_extent >= node_b.quad.half_extent
    };

    if split_a {
        for child in node_a.children.iter().flatten() {
            accumulate_collision_shifts(child, node_b, false, positions, sizes, params, shifts);
        }
    } else {
        for child in node_b.children.iter().flatten() {
            accumulate_collision_shifts(node_a, child, false, positions, sizes, params, shifts);
        }
    }
}
