//! Assembly-order vector derivation.
//!
//! Walks the nested sequence tree and, for every element of every group,
//! intersects the insertion spaces of the contacts that element has with
//! the plates already placed in the same group (its "prequel"). Elements
//! with nothing to constrain them fall back to gravity and count toward
//! the module's external-support tally.

use plate_model::PlateModel;
use plate_types::{InsertionSpace, Vec3};
use tracing::debug;

use crate::intersect::intersect_spaces;
use crate::sequence::SeqNode;
use serde::{Deserialize, Serialize};

use crate::types::SolverError;

/// Sentinel insertion vector for unconstrained elements.
pub const GRAVITY: Vec3 = Vec3 {
    x: 0.0,
    y: 0.0,
    z: -1.0,
};

/// Derived assembly data for one group of the sequence tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModulePlan {
    /// Position of the group in the tree: child indices from the root.
    /// The root group has an empty path.
    pub path: Vec<usize>,
    /// Plate ids of the whole subtree, in sequence order.
    pub plates: Vec<usize>,
    /// One insertion vector per element of the group.
    pub vectors: Vec<Vec3>,
    /// Elements that fell back to gravity and need external support.
    pub needed_support: usize,
}

/// Result of a full sequence walk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblyPlan {
    /// All modules, innermost groups first, the root group last.
    pub modules: Vec<ModulePlan>,
    /// Per-contact insertion vectors, parallel to `model.neighbors`.
    pub contact_vectors: Vec<Vec<Vec3>>,
}

/// Derive per-module and per-contact insertion vectors for `tree`.
///
/// Expects `attach_spaces` to have populated `model.contact_spaces`.
pub fn derive_vectors(model: &PlateModel, tree: &[SeqNode]) -> Result<AssemblyPlan, SolverError> {
    let mut modules = Vec::new();
    walk_group(model, tree, Vec::new(), &mut modules)?;

    let mut contact_vectors: Vec<Vec<Vec3>> = model
        .neighbors
        .iter()
        .map(|row| vec![GRAVITY; row.len()])
        .collect();
    for i in 0..model.plate_count() {
        for (k, &j) in model.neighbors[i].iter().enumerate() {
            contact_vectors[i][k] = pair_vector(tree, &modules, i, j);
        }
    }

    Ok(AssemblyPlan {
        modules,
        contact_vectors,
    })
}

/// Derive the module plan of one group, recursing into child groups
/// first so child plans precede their parent in `out`.
fn walk_group(
    model: &PlateModel,
    group: &[SeqNode],
    path: Vec<usize>,
    out: &mut Vec<ModulePlan>,
) -> Result<(), SolverError> {
    for (k, node) in group.iter().enumerate() {
        if let SeqNode::Group(children) = node {
            let mut child_path = path.clone();
            child_path.push(k);
            walk_group(model, children, child_path, out)?;
        }
    }

    let mut vectors = Vec::with_capacity(group.len());
    let mut needed_support = 0usize;
    let mut prequel: Vec<usize> = Vec::new();
    for node in group {
        let element_plates = node.leaves();
        let spaces = gather_spaces(model, &element_plates, &prequel)?;
        let vector = if spaces.is_empty() {
            needed_support += 1;
            GRAVITY
        } else {
            intersect_spaces(&spaces)?.representative_dir()
        };
        debug!(?path, element = ?element_plates, ?vector, "element vector");
        vectors.push(vector);
        prequel.extend(element_plates);
    }

    let plates: Vec<usize> = group.iter().flat_map(|n| n.leaves()).collect();
    out.push(ModulePlan {
        path,
        plates,
        vectors,
        needed_support,
    });
    Ok(())
}

/// Origin-centered insertion spaces of every contact between an element's
/// plates and the plates already placed before it in the same group.
fn gather_spaces(
    model: &PlateModel,
    element: &[usize],
    prequel: &[usize],
) -> Result<Vec<InsertionSpace>, SolverError> {
    let mut spaces = Vec::new();
    for &e in element {
        for (k, &nb) in model.neighbors[e].iter().enumerate() {
            if !prequel.contains(&nb) {
                continue;
            }
            let space = model.contact_spaces[e][k]
                .as_ref()
                .ok_or(SolverError::MissingSpace { i: e, j: nb })?;
            spaces.push(space.recentred());
        }
    }
    Ok(spaces)
}

/// Per-contact vector: the vector of the later-placed element in the
/// deepest group where the two plates first part ways, sign-flipped for
/// the numerically larger plate index so both entries of a pair agree on
/// one physical direction.
fn pair_vector(tree: &[SeqNode], modules: &[ModulePlan], i: usize, j: usize) -> Vec3 {
    let mut group = tree;
    let mut path: Vec<usize> = Vec::new();
    loop {
        let pos_i = group.iter().position(|n| n.contains_plate(i));
        let pos_j = group.iter().position(|n| n.contains_plate(j));
        let (pi, pj) = match (pos_i, pos_j) {
            (Some(a), Some(b)) => (a, b),
            // One of the plates is not in the sequence at all.
            _ => return GRAVITY,
        };
        if pi == pj {
            match &group[pi] {
                SeqNode::Group(children) => {
                    path.push(pi);
                    group = children;
                    continue;
                }
                // Same leaf for both plates cannot happen for i != j.
                SeqNode::Plate(_) => return GRAVITY,
            }
        }
        let later = pi.max(pj);
        let v = modules
            .iter()
            .find(|m| m.path == path)
            .map(|m| m.vectors[later])
            .unwrap_or(GRAVITY);
        return if i < j { v } else { -v };
    }
}
