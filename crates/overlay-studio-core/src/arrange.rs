//! One-shot batch operators over a selection: align, distribute, centre,
//! nudge, restack, duplicate and delete.
//!
//! Each operator that changes the scene is bracketed by a single
//! `begin_operation`/`end_operation` pair on the observer. Ids that are no
//! longer in the scene are skipped silently.

use crate::error::{EngineError, EngineResult};
use crate::hierarchy::HierarchyIndex;
use crate::observer::EngineObserver;
use crate::scene::{ComponentId, ComponentPatch, Scene};
use crate::selection::bounding_box;
use kurbo::{Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

const EPSILON: f64 = 1e-6;

/// Alignment targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alignment {
    Left,
    /// Horizontal centres on the selection's bounding-box centre.
    Center,
    Right,
    Top,
    /// Vertical centres on the selection's bounding-box centre.
    Middle,
    Bottom,
}

impl Alignment {
    fn label(self) -> &'static str {
        match self {
            Alignment::Left => "Align left",
            Alignment::Center => "Align center",
            Alignment::Right => "Align right",
            Alignment::Top => "Align top",
            Alignment::Middle => "Align middle",
            Alignment::Bottom => "Align bottom",
        }
    }
}

/// Distribution axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Distribution {
    Horizontal,
    Vertical,
}

/// Sibling-local stacking moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StackMove {
    BringForward,
    SendBackward,
    BringToFront,
    SendToBack,
}

impl StackMove {
    fn label(self) -> &'static str {
        match self {
            StackMove::BringForward => "Bring forward",
            StackMove::SendBackward => "Send backward",
            StackMove::BringToFront => "Bring to front",
            StackMove::SendToBack => "Send to back",
        }
    }
}

/// Selected ids still present in the scene, with their rectangles.
fn live_members(scene: &Scene, ids: &[ComponentId]) -> Vec<(ComponentId, Rect)> {
    let mut seen = HashSet::new();
    ids.iter()
        .filter(|id| seen.insert(**id))
        .filter_map(|&id| scene.get(id).map(|c| (id, c.rect())))
        .collect()
}

fn require(members: &[(ComponentId, Rect)], required: usize) -> EngineResult<()> {
    if members.len() < required {
        return Err(EngineError::InsufficientSelection {
            required,
            actual: members.len(),
        });
    }
    Ok(())
}

/// Translate each listed component by its delta, carrying along its
/// descendants that are not themselves listed. A descendant reached from
/// several moved ancestors follows the first one. Returns the number of
/// components whose position changed.
pub fn translate_with_descendants(scene: &mut Scene, moves: &[(ComponentId, Vec2)]) -> usize {
    let index = HierarchyIndex::build(scene);
    let listed: HashSet<ComponentId> = moves.iter().map(|(id, _)| *id).collect();
    let mut planned: HashMap<ComponentId, Vec2> = HashMap::new();
    let mut order = Vec::new();

    for &(id, delta) in moves {
        if planned.insert(id, delta).is_none() {
            order.push(id);
        }
        for descendant in index.descendants(id) {
            if listed.contains(&descendant) || planned.contains_key(&descendant) {
                continue;
            }
            planned.insert(descendant, delta);
            order.push(descendant);
        }
    }

    let mut moved = 0;
    for id in order {
        let Some(delta) = planned.get(&id).copied() else {
            continue;
        };
        if delta.hypot() < EPSILON {
            continue;
        }
        let Some(position) = scene.get(id).map(|c| c.position) else {
            continue;
        };
        if scene.update_component(id, &ComponentPatch::position(position + delta)) {
            moved += 1;
        }
    }
    moved
}

/// Align the selection's edges or centres. Needs at least two members.
pub fn align(
    scene: &mut Scene,
    ids: &[ComponentId],
    alignment: Alignment,
    observer: &mut dyn EngineObserver,
) -> EngineResult<usize> {
    let members = live_members(scene, ids);
    require(&members, 2)?;
    let bounds = members
        .iter()
        .map(|(_, r)| *r)
        .reduce(|acc, r| acc.union(r))
        .ok_or(EngineError::DegenerateBounds)?;
    let center = bounds.center();

    let moves: Vec<(ComponentId, Vec2)> = members
        .iter()
        .map(|&(id, r)| {
            let delta = match alignment {
                Alignment::Left => Vec2::new(bounds.x0 - r.x0, 0.0),
                Alignment::Center => Vec2::new(center.x - r.center().x, 0.0),
                Alignment::Right => Vec2::new(bounds.x1 - r.x1, 0.0),
                Alignment::Top => Vec2::new(0.0, bounds.y0 - r.y0),
                Alignment::Middle => Vec2::new(0.0, center.y - r.center().y),
                Alignment::Bottom => Vec2::new(0.0, bounds.y1 - r.y1),
            };
            (id, delta)
        })
        .collect();

    observer.begin_operation(alignment.label());
    let moved = translate_with_descendants(scene, &moves);
    observer.end_operation();
    log::debug!("{}: moved {moved} components", alignment.label());
    Ok(moved)
}

/// Spread members evenly between the outermost extents, keeping sizes.
/// Needs at least three members. Coincident members leave the scene
/// untouched and return `Ok(0)`.
pub fn distribute(
    scene: &mut Scene,
    ids: &[ComponentId],
    distribution: Distribution,
    observer: &mut dyn EngineObserver,
) -> EngineResult<usize> {
    let mut members = live_members(scene, ids);
    require(&members, 3)?;

    let extent = |r: &Rect| match distribution {
        Distribution::Horizontal => (r.x0, r.x1),
        Distribution::Vertical => (r.y0, r.y1),
    };

    let centers: Vec<f64> = members
        .iter()
        .map(|(_, r)| {
            let (near, far) = extent(r);
            (near + far) / 2.0
        })
        .collect();
    let spread = centers.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b))
        - centers.iter().fold(f64::INFINITY, |a, &b| a.min(b));
    if spread < EPSILON {
        log::debug!("distribute skipped: members coincide");
        return Ok(0);
    }

    members.sort_by(|a, b| extent(&a.1).0.total_cmp(&extent(&b.1).0));
    let start = members.iter().map(|(_, r)| extent(r).0).fold(f64::INFINITY, f64::min);
    let end = members.iter().map(|(_, r)| extent(r).1).fold(f64::NEG_INFINITY, f64::max);
    let total: f64 = members.iter().map(|(_, r)| extent(r).1 - extent(r).0).sum();
    let gap = (end - start - total) / (members.len() - 1) as f64;

    let mut cursor = start;
    let moves: Vec<(ComponentId, Vec2)> = members
        .iter()
        .map(|&(id, r)| {
            let (near, far) = extent(&r);
            let shift = cursor - near;
            cursor += (far - near) + gap;
            let delta = match distribution {
                Distribution::Horizontal => Vec2::new(shift, 0.0),
                Distribution::Vertical => Vec2::new(0.0, shift),
            };
            (id, delta)
        })
        .collect();

    let label = match distribution {
        Distribution::Horizontal => "Distribute horizontally",
        Distribution::Vertical => "Distribute vertically",
    };
    observer.begin_operation(label);
    let moved = translate_with_descendants(scene, &moves);
    observer.end_operation();
    Ok(moved)
}

/// Centre the selection's bounding box on the canvas midpoint.
pub fn center_on_canvas(
    scene: &mut Scene,
    ids: &[ComponentId],
    observer: &mut dyn EngineObserver,
) -> EngineResult<usize> {
    let members = live_members(scene, ids);
    require(&members, 1)?;
    let live: Vec<ComponentId> = members.iter().map(|(id, _)| *id).collect();
    let bounds = bounding_box(scene, &live).ok_or(EngineError::DegenerateBounds)?;
    let delta = scene.canvas_center() - bounds.center();
    let moves: Vec<(ComponentId, Vec2)> = live.iter().map(|&id| (id, delta)).collect();

    observer.begin_operation("Center on canvas");
    let moved = translate_with_descendants(scene, &moves);
    observer.end_operation();
    Ok(moved)
}

/// Move the selection (and descendants) by `delta` canvas pixels.
pub fn nudge(
    scene: &mut Scene,
    ids: &[ComponentId],
    delta: Vec2,
    observer: &mut dyn EngineObserver,
) -> usize {
    let members = live_members(scene, ids);
    if members.is_empty() || delta.hypot() < EPSILON {
        return 0;
    }
    let moves: Vec<(ComponentId, Vec2)> = members.iter().map(|(id, _)| (*id, delta)).collect();
    observer.begin_operation("Nudge");
    let moved = translate_with_descendants(scene, &moves);
    observer.end_operation();
    moved
}

/// Reorder selected components among their siblings. Each parent's sibling
/// list is renumbered `0..n` afterwards. Returns how many layers changed.
pub fn restack(
    scene: &mut Scene,
    ids: &[ComponentId],
    action: StackMove,
    observer: &mut dyn EngineObserver,
) -> EngineResult<usize> {
    let members = live_members(scene, ids);
    require(&members, 1)?;
    let selected: HashSet<ComponentId> = members.iter().map(|(id, _)| *id).collect();

    let mut parents: Vec<Option<ComponentId>> = Vec::new();
    for (id, _) in &members {
        let parent = scene.get(*id).and_then(|c| c.parent_id());
        if !parents.contains(&parent) {
            parents.push(parent);
        }
    }

    let mut updates: Vec<(ComponentId, i32)> = Vec::new();
    for parent in parents {
        // Siblings bottom to top; scene order breaks layer ties.
        let mut siblings: Vec<(i32, usize, ComponentId)> = scene
            .components()
            .iter()
            .enumerate()
            .filter(|(_, c)| c.parent_id() == parent)
            .map(|(i, c)| (c.layer, i, c.id()))
            .collect();
        siblings.sort();
        let mut order: Vec<ComponentId> = siblings.into_iter().map(|(_, _, id)| id).collect();
        reorder(&mut order, &selected, action);

        for (layer, id) in order.into_iter().enumerate() {
            let layer = layer as i32;
            if scene.get(id).is_some_and(|c| c.layer != layer) {
                updates.push((id, layer));
            }
        }
    }

    if updates.is_empty() {
        return Ok(0);
    }
    observer.begin_operation(action.label());
    for (id, layer) in &updates {
        scene.update_component(*id, &ComponentPatch::layer(*layer));
    }
    observer.end_operation();
    Ok(updates.len())
}

fn reorder(order: &mut Vec<ComponentId>, selected: &HashSet<ComponentId>, action: StackMove) {
    match action {
        StackMove::BringToFront => {
            let (picked, rest): (Vec<_>, Vec<_>) =
                order.iter().copied().partition(|id| selected.contains(id));
            *order = rest.into_iter().chain(picked).collect();
        }
        StackMove::SendToBack => {
            let (picked, rest): (Vec<_>, Vec<_>) =
                order.iter().copied().partition(|id| selected.contains(id));
            *order = picked.into_iter().chain(rest).collect();
        }
        StackMove::BringForward => {
            for i in (0..order.len().saturating_sub(1)).rev() {
                if selected.contains(&order[i]) && !selected.contains(&order[i + 1]) {
                    order.swap(i, i + 1);
                }
            }
        }
        StackMove::SendBackward => {
            for i in 1..order.len() {
                if selected.contains(&order[i]) && !selected.contains(&order[i - 1]) {
                    order.swap(i, i - 1);
                }
            }
        }
    }
}

/// Copy the selection with fresh ids, shifted by `offset`. Parent links
/// between copied members point at the copies; other links are kept.
/// Returns the new ids in selection order.
pub fn duplicate(
    scene: &mut Scene,
    ids: &[ComponentId],
    offset: f64,
    observer: &mut dyn EngineObserver,
) -> Vec<ComponentId> {
    let members = live_members(scene, ids);
    if members.is_empty() {
        return Vec::new();
    }

    let mut copies = Vec::with_capacity(members.len());
    let mut remap: HashMap<ComponentId, ComponentId> = HashMap::new();
    for (id, _) in &members {
        let Some(original) = scene.get(*id) else {
            continue;
        };
        let mut copy = original.clone();
        copy.regenerate_id();
        copy.position += Vec2::new(offset, offset);
        remap.insert(*id, copy.id());
        copies.push(copy);
    }

    observer.begin_operation("Duplicate");
    let mut new_ids = Vec::with_capacity(copies.len());
    for mut copy in copies {
        match copy.parent_id().and_then(|p| remap.get(&p).copied()) {
            Some(new_parent) => copy.parent_id = Some(new_parent),
            None => copy.layer = scene.next_layer(copy.parent_id()),
        }
        new_ids.push(scene.insert(copy));
    }
    observer.end_operation();
    log::debug!("duplicated {} components", new_ids.len());
    new_ids
}

/// Remove the selection. Children of removed components become top-level.
pub fn delete(scene: &mut Scene, ids: &[ComponentId], observer: &mut dyn EngineObserver) -> usize {
    let members = live_members(scene, ids);
    if members.is_empty() {
        return 0;
    }
    observer.begin_operation("Delete");
    let removed = members
        .iter()
        .filter(|(id, _)| scene.remove_component(*id).is_some())
        .count();
    observer.end_operation();
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::set_parent;
    use crate::observer::{NoopObserver, RecordingObserver};
    use crate::scene::ComponentKind;
    use kurbo::{Point, Size};

    fn add(scene: &mut Scene, x: f64, y: f64, w: f64, h: f64) -> ComponentId {
        scene.add_component(ComponentKind::Shape, Point::new(x, y), Size::new(w, h))
    }

    fn rect(scene: &Scene, id: ComponentId) -> Rect {
        scene.get(id).map(|c| c.rect()).unwrap_or(Rect::ZERO)
    }

    #[test]
    fn test_align_left_and_right() {
        let mut scene = Scene::default();
        let a = add(&mut scene, 100.0, 0.0, 50.0, 50.0);
        let b = add(&mut scene, 40.0, 100.0, 200.0, 50.0);
        let mut observer = RecordingObserver::new();

        align(&mut scene, &[a, b], Alignment::Left, &mut observer).unwrap();
        assert_eq!(rect(&scene, a).x0, 40.0);
        assert_eq!(rect(&scene, b).x0, 40.0);
        assert_eq!(observer.operations(), vec!["Align left"]);

        align(&mut scene, &[a, b], Alignment::Right, &mut NoopObserver).unwrap();
        assert_eq!(rect(&scene, a).x1, 240.0);
        assert_eq!(rect(&scene, b).x1, 240.0);
    }

    #[test]
    fn test_align_middle_uses_bounds_center() {
        let mut scene = Scene::default();
        let a = add(&mut scene, 0.0, 0.0, 50.0, 40.0);
        let b = add(&mut scene, 0.0, 200.0, 50.0, 100.0);
        align(&mut scene, &[a, b], Alignment::Middle, &mut NoopObserver).unwrap();
        assert_eq!(rect(&scene, a).center().y, 150.0);
        assert_eq!(rect(&scene, b).center().y, 150.0);
    }

    #[test]
    fn test_align_needs_two() {
        let mut scene = Scene::default();
        let a = add(&mut scene, 0.0, 0.0, 50.0, 50.0);
        let mut observer = RecordingObserver::new();
        let result = align(&mut scene, &[a], Alignment::Top, &mut observer);
        assert!(matches!(
            result,
            Err(EngineError::InsufficientSelection { required: 2, actual: 1 })
        ));
        assert!(observer.events.is_empty());
    }

    #[test]
    fn test_align_moves_descendants() {
        let mut scene = Scene::default();
        let parent = add(&mut scene, 100.0, 100.0, 200.0, 200.0);
        let child = add(&mut scene, 120.0, 130.0, 50.0, 50.0);
        let other = add(&mut scene, 20.0, 400.0, 50.0, 50.0);
        set_parent(&mut scene, child, Some(parent)).unwrap();

        align(&mut scene, &[parent, other], Alignment::Left, &mut NoopObserver).unwrap();
        assert_eq!(rect(&scene, parent).x0, 20.0);
        assert_eq!(rect(&scene, child).x0, 40.0);
        assert_eq!(rect(&scene, child).y0, 130.0);
    }

    #[test]
    fn test_distribute_horizontal_equal_gaps() {
        let mut scene = Scene::default();
        let a = add(&mut scene, 0.0, 0.0, 100.0, 50.0);
        let b = add(&mut scene, 120.0, 0.0, 50.0, 50.0);
        let c = add(&mut scene, 400.0, 0.0, 100.0, 50.0);

        distribute(&mut scene, &[c, a, b], Distribution::Horizontal, &mut NoopObserver).unwrap();
        // Span 0..500, sizes 250, gap 125.
        assert_eq!(rect(&scene, a).x0, 0.0);
        assert_eq!(rect(&scene, b).x0, 225.0);
        assert_eq!(rect(&scene, c).x0, 400.0);
        assert_eq!(rect(&scene, b).width(), 50.0);
    }

    #[test]
    fn test_distribute_needs_three() {
        let mut scene = Scene::default();
        let a = add(&mut scene, 0.0, 0.0, 50.0, 50.0);
        let b = add(&mut scene, 100.0, 0.0, 50.0, 50.0);
        let result = distribute(&mut scene, &[a, b], Distribution::Vertical, &mut NoopObserver);
        assert!(matches!(result, Err(EngineError::InsufficientSelection { required: 3, .. })));
    }

    #[test]
    fn test_distribute_coincident_is_noop() {
        let mut scene = Scene::default();
        let ids: Vec<_> = (0..3).map(|_| add(&mut scene, 10.0, 10.0, 50.0, 50.0)).collect();
        let mut observer = RecordingObserver::new();
        let moved = distribute(&mut scene, &ids, Distribution::Horizontal, &mut observer).unwrap();
        assert_eq!(moved, 0);
        assert!(observer.events.is_empty());
    }

    #[test]
    fn test_center_on_canvas_group() {
        let mut scene = Scene::default();
        let a = add(&mut scene, 0.0, 0.0, 100.0, 100.0);
        let b = add(&mut scene, 200.0, 100.0, 100.0, 100.0);
        center_on_canvas(&mut scene, &[a, b], &mut NoopObserver).unwrap();
        let bounds = bounding_box(&scene, &[a, b]).unwrap();
        assert_eq!(bounds.center(), Point::new(960.0, 540.0));
        // Relative layout kept.
        assert_eq!(rect(&scene, b).origin() - rect(&scene, a).origin(), Vec2::new(200.0, 100.0));
    }

    #[test]
    fn test_center_on_canvas_skips_stale_ids() {
        let mut scene = Scene::default();
        let result = center_on_canvas(&mut scene, &[uuid::Uuid::new_v4()], &mut NoopObserver);
        assert!(matches!(
            result,
            Err(EngineError::InsufficientSelection { required: 1, actual: 0 })
        ));
    }

    #[test]
    fn test_restack_siblings() {
        let mut scene = Scene::default();
        let a = add(&mut scene, 0.0, 0.0, 50.0, 50.0);
        let b = add(&mut scene, 0.0, 0.0, 50.0, 50.0);
        let c = add(&mut scene, 0.0, 0.0, 50.0, 50.0);
        let layer = |scene: &Scene, id| scene.get(id).map(|c| c.layer);

        restack(&mut scene, &[a], StackMove::BringToFront, &mut NoopObserver).unwrap();
        assert_eq!(
            (layer(&scene, b), layer(&scene, c), layer(&scene, a)),
            (Some(0), Some(1), Some(2))
        );

        restack(&mut scene, &[a], StackMove::SendBackward, &mut NoopObserver).unwrap();
        assert_eq!(layer(&scene, a), Some(1));
        assert_eq!(layer(&scene, c), Some(2));

        restack(&mut scene, &[c], StackMove::SendToBack, &mut NoopObserver).unwrap();
        assert_eq!(layer(&scene, c), Some(0));

        let changed = restack(&mut scene, &[c], StackMove::SendToBack, &mut NoopObserver).unwrap();
        assert_eq!(changed, 0);
    }

    #[test]
    fn test_nudge_moves_subtree() {
        let mut scene = Scene::default();
        let parent = add(&mut scene, 0.0, 0.0, 100.0, 100.0);
        let child = add(&mut scene, 10.0, 10.0, 20.0, 20.0);
        set_parent(&mut scene, child, Some(parent)).unwrap();
        let moved = nudge(&mut scene, &[parent], Vec2::new(10.0, 0.0), &mut NoopObserver);
        assert_eq!(moved, 2);
        assert_eq!(rect(&scene, child).x0, 20.0);
    }

    #[test]
    fn test_duplicate_remaps_parents() {
        let mut scene = Scene::default();
        let parent = add(&mut scene, 0.0, 0.0, 100.0, 100.0);
        let child = add(&mut scene, 10.0, 10.0, 20.0, 20.0);
        set_parent(&mut scene, child, Some(parent)).unwrap();

        let copies = duplicate(&mut scene, &[parent, child], 20.0, &mut NoopObserver);
        assert_eq!(copies.len(), 2);
        assert_eq!(scene.len(), 4);
        let new_parent = copies[0];
        let new_child = scene.get(copies[1]).unwrap();
        assert_eq!(new_child.parent_id(), Some(new_parent));
        assert_eq!(new_child.position, Point::new(30.0, 30.0));
        assert!(scene.get(new_parent).unwrap().layer > scene.get(parent).unwrap().layer);
    }

    #[test]
    fn test_delete_detaches_children() {
        let mut scene = Scene::default();
        let parent = add(&mut scene, 0.0, 0.0, 100.0, 100.0);
        let child = add(&mut scene, 10.0, 10.0, 20.0, 20.0);
        set_parent(&mut scene, child, Some(parent)).unwrap();
        let mut observer = RecordingObserver::new();

        assert_eq!(delete(&mut scene, &[parent], &mut observer), 1);
        assert_eq!(scene.get(child).unwrap().parent_id(), None);
        assert_eq!(observer.operations(), vec!["Delete"]);
    }
}
