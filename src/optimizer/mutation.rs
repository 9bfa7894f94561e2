use crate::constraints::PackingRules;
use crate::geometry::WindingLayout;
use serde::Serialize;
use strum_macros::{Display, EnumIter};

/// Candidate moves for one winding pair, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, Serialize)]
#[strum(serialize_all = "snake_case")]
pub enum MoveKind {
    /// Shift toward the coil end by one step, falling back to bundle contact.
    ShiftOutward,
    /// Sit exactly `d_min` beyond the outer neighbour.
    SeparateOutward,
    /// Shift toward the midplane by one step, falling back to bundle contact.
    ShiftInward,
    /// Sit exactly `d_min` before the inner neighbour.
    SeparateInward,
}

/// Indices explored by the search: the negative half minus the outer edge,
/// which pins the coil length.
pub fn movable_indices(windings: usize) -> Vec<usize> {
    (1..windings / 2).collect()
}

/// Builds the candidate for `kind` applied to winding `index` of `best`.
/// The mirror winding always receives the negated position.
pub fn propose(
    best: &WindingLayout,
    index: usize,
    kind: MoveKind,
    step: f64,
    rules: &PackingRules,
) -> WindingLayout {
    debug_assert!(index >= 1 && index < best.len() / 2);

    let mut candidate = best.clone();
    match kind {
        MoveKind::ShiftOutward => {
            candidate.set_pair(index, best[index] - step);
            if !rules.is_valid(&candidate) {
                candidate.set_pair(index, best[index - 1] + rules.bundle_pitch());
            }
        }
        MoveKind::SeparateOutward => {
            candidate.set_pair(index, best[index - 1] + rules.min_separation);
        }
        MoveKind::ShiftInward => {
            candidate.set_pair(index, best[index] + step);
            if !rules.is_valid(&candidate) {
                candidate.set_pair(index, inward_contact(best, index, rules.bundle_pitch()));
            }
        }
        MoveKind::SeparateInward => {
            candidate.set_pair(index, inward_contact(best, index, rules.min_separation));
        }
    }
    candidate
}

/// Position that leaves `gap` to the inner neighbour. For the innermost
/// winding that neighbour is its own mirror, which moves along with it.
fn inward_contact(layout: &WindingLayout, index: usize, gap: f64) -> f64 {
    let neighbour = index + 1;
    if neighbour == layout.mirror_of(index) {
        -gap / 2.0
    } else {
        layout[neighbour] - gap
    }
}
