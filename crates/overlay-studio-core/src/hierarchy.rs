//! Parent/child hierarchy: stacking order, inherited visibility, descendants.
//!
//! `parent_id` links form a forest. [`HierarchyIndex`] is a flat snapshot of
//! that forest (arena of ids plus a parent->children adjacency list) built
//! once per gesture or render pass, so ancestor and descendant lookups are
//! O(1) per step instead of scanning the scene.

use crate::error::{EngineError, EngineResult};
use crate::scene::{ComponentId, Scene};
use std::cmp::Ordering;
use std::collections::{HashMap, VecDeque};

/// Sort key giving the effective stacking order of a component.
///
/// It is the path of `(layer, insertion index)` pairs from the root down to
/// the component. Comparing paths lexicographically makes an ancestor's layer
/// move its whole subtree as a block, orders siblings by their own layer, and
/// puts children above their parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StackKey(Vec<(i32, usize)>);

impl Ord for StackKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl PartialOrd for StackKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Flat snapshot of the component forest.
#[derive(Debug, Clone, Default)]
pub struct HierarchyIndex {
    ids: Vec<ComponentId>,
    layers: Vec<i32>,
    visible: Vec<bool>,
    index_of: HashMap<ComponentId, usize>,
    parent: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    /// All indices sorted back to front by [`StackKey`].
    order: Vec<usize>,
    /// Position of each index in `order`.
    rank: Vec<usize>,
}

impl HierarchyIndex {
    /// Build the index from the current scene.
    ///
    /// Parent links pointing at missing components are treated as absent.
    pub fn build(scene: &Scene) -> Self {
        let components = scene.components();
        let index_of: HashMap<ComponentId, usize> =
            components.iter().enumerate().map(|(i, c)| (c.id(), i)).collect();

        let parent: Vec<Option<usize>> = components
            .iter()
            .map(|c| c.parent_id().and_then(|p| index_of.get(&p).copied()))
            .collect();

        let mut children = vec![Vec::new(); components.len()];
        for (child, p) in parent.iter().enumerate() {
            if let Some(p) = *p {
                children[p].push(child);
            }
        }

        let mut index = Self {
            ids: components.iter().map(|c| c.id()).collect(),
            layers: components.iter().map(|c| c.layer).collect(),
            visible: components.iter().map(|c| c.visible).collect(),
            index_of,
            parent,
            children,
            order: Vec::new(),
            rank: vec![0; components.len()],
        };

        let mut keyed: Vec<(StackKey, usize)> =
            (0..index.ids.len()).map(|i| (index.key_of(i), i)).collect();
        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        index.order = keyed.into_iter().map(|(_, i)| i).collect();
        for (rank, &i) in index.order.iter().enumerate() {
            index.rank[i] = rank;
        }
        index
    }

    /// Number of indexed components.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Check if the id is present in the snapshot.
    pub fn contains(&self, id: ComponentId) -> bool {
        self.index_of.contains_key(&id)
    }

    /// Walk from `index` up to the root, excluding `index` itself.
    /// Stops early if the data contains a cycle.
    fn ancestors_of(&self, index: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut current = self.parent[index];
        while let Some(p) = current {
            if p == index || out.len() >= self.ids.len() {
                break;
            }
            out.push(p);
            current = self.parent[p];
        }
        out
    }

    /// Ancestor ids, nearest first.
    pub fn ancestors(&self, id: ComponentId) -> Vec<ComponentId> {
        match self.index_of.get(&id) {
            Some(&i) => self.ancestors_of(i).into_iter().map(|a| self.ids[a]).collect(),
            None => Vec::new(),
        }
    }

    /// Check if `ancestor` is a (transitive) parent of `id`.
    pub fn is_ancestor(&self, ancestor: ComponentId, id: ComponentId) -> bool {
        self.ancestors(id).contains(&ancestor)
    }

    /// Depth in the forest (0 for top-level).
    pub fn depth(&self, id: ComponentId) -> usize {
        self.ancestors(id).len()
    }

    /// A component is hidden if it or any ancestor has `visible == false`.
    pub fn is_effectively_visible(&self, id: ComponentId) -> bool {
        let Some(&i) = self.index_of.get(&id) else {
            return false;
        };
        self.visible[i] && self.ancestors_of(i).into_iter().all(|a| self.visible[a])
    }

    fn key_of(&self, index: usize) -> StackKey {
        let mut path: Vec<(i32, usize)> = self
            .ancestors_of(index)
            .into_iter()
            .rev()
            .map(|a| (self.layers[a], a))
            .collect();
        path.push((self.layers[index], index));
        StackKey(path)
    }

    /// Stacking sort key for the component.
    pub fn stack_key(&self, id: ComponentId) -> Option<StackKey> {
        self.index_of.get(&id).map(|&i| self.key_of(i))
    }

    /// Effective layer: the component's rank when every component is sorted
    /// by [`StackKey`]. Ancestor layers are folded in, a child always ranks
    /// above its parent, and no two components share a value.
    pub fn effective_layer(&self, id: ComponentId) -> Option<i64> {
        self.index_of.get(&id).map(|&i| self.rank[i] as i64)
    }

    /// All descendants of `id`, breadth-first.
    pub fn descendants(&self, id: ComponentId) -> Vec<ComponentId> {
        let Some(&root) = self.index_of.get(&id) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        let mut seen = vec![false; self.ids.len()];
        seen[root] = true;
        let mut queue: VecDeque<usize> = self.children[root].iter().copied().collect();
        while let Some(i) = queue.pop_front() {
            if seen[i] {
                continue;
            }
            seen[i] = true;
            out.push(self.ids[i]);
            queue.extend(self.children[i].iter().copied());
        }
        out
    }

    /// Visible ids sorted back to front by effective stacking order.
    pub fn paint_order(&self) -> Vec<ComponentId> {
        self.order
            .iter()
            .map(|&i| self.ids[i])
            .filter(|&id| self.is_effectively_visible(id))
            .collect()
    }
}

/// Assign (or clear) the parent of `child`.
///
/// Self-parenting and any assignment that would make `child` its own
/// ancestor are rejected and the scene is left unchanged.
pub fn set_parent(
    scene: &mut Scene,
    child: ComponentId,
    parent: Option<ComponentId>,
) -> EngineResult<()> {
    if !scene.contains(child) {
        return Err(EngineError::UnknownComponent(child));
    }
    if let Some(parent) = parent {
        if parent == child {
            log::warn!("rejected self-parenting of {child}");
            return Err(EngineError::SelfParent(child));
        }
        if !scene.contains(parent) {
            return Err(EngineError::UnknownComponent(parent));
        }
        let index = HierarchyIndex::build(scene);
        if index.is_ancestor(child, parent) {
            log::warn!("rejected parent {parent} for {child}: cycle");
            return Err(EngineError::CycleDetected { child, parent });
        }
    }
    scene.set_parent_unchecked(child, parent);
    Ok(())
}

/// Clear parent links that dangle or take part in a cycle.
/// Returns the number of links cleared.
pub(crate) fn repair(scene: &mut Scene) -> usize {
    let mut cleared = 0;
    let ids: Vec<ComponentId> = scene.components().iter().map(|c| c.id()).collect();

    for id in &ids {
        let parent = scene.get(*id).and_then(|c| c.parent_id());
        if let Some(parent) = parent {
            if !scene.contains(parent) {
                scene.set_parent_unchecked(*id, None);
                cleared += 1;
            }
        }
    }

    for id in &ids {
        // Walk up from `id`; revisiting a node means `id` sits on or below a cycle.
        let mut visited = vec![*id];
        let mut current = scene.get(*id).and_then(|c| c.parent_id());
        while let Some(p) = current {
            if visited.contains(&p) {
                scene.set_parent_unchecked(*id, None);
                cleared += 1;
                break;
            }
            visited.push(p);
            current = scene.get(p).and_then(|c| c.parent_id());
        }
    }

    cleared
}

/// Check inherited visibility without building a full index.
pub fn is_effectively_visible(scene: &Scene, id: ComponentId) -> bool {
    let mut current = scene.get(id);
    let mut steps = 0;
    while let Some(component) = current {
        if !component.visible {
            return false;
        }
        steps += 1;
        if steps > scene.len() {
            break;
        }
        current = component.parent_id().and_then(|p| scene.get(p));
    }
    scene.contains(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::ComponentKind;
    use kurbo::{Point, Size};

    fn add(scene: &mut Scene, layer: i32) -> ComponentId {
        let id = scene.add_component(ComponentKind::Shape, Point::ZERO, Size::new(100.0, 100.0));
        scene.update_component(id, &crate::scene::ComponentPatch::layer(layer));
        id
    }

    #[test]
    fn test_child_of_higher_parent_outranks_unrelated() {
        let mut scene = Scene::default();
        let parent = add(&mut scene, 5);
        let unrelated = add(&mut scene, 4);
        let child = add(&mut scene, 0);
        set_parent(&mut scene, child, Some(parent)).expect("valid parent");

        let index = HierarchyIndex::build(&scene);
        assert!(index.effective_layer(child) > index.effective_layer(unrelated));
        assert!(index.stack_key(child) > index.stack_key(unrelated));
        assert!(index.stack_key(child) > index.stack_key(parent));
    }

    #[test]
    fn test_effective_layer_strictly_increases_in_paint_order() {
        let mut scene = Scene::default();
        let frame = add(&mut scene, 0);
        let child = add(&mut scene, 0);
        let twin = add(&mut scene, 0);
        let grandchild = add(&mut scene, 0);
        let loose = add(&mut scene, 0);
        set_parent(&mut scene, child, Some(frame)).expect("valid parent");
        set_parent(&mut scene, twin, Some(frame)).expect("valid parent");
        set_parent(&mut scene, grandchild, Some(child)).expect("valid parent");

        let index = HierarchyIndex::build(&scene);
        assert!(index.effective_layer(child) > index.effective_layer(frame));

        let order = index.paint_order();
        assert_eq!(order, vec![frame, child, grandchild, twin, loose]);
        let layers: Vec<i64> = order
            .iter()
            .filter_map(|&id| index.effective_layer(id))
            .collect();
        assert_eq!(layers.len(), order.len());
        assert!(layers.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_subtree_moves_as_block() {
        let mut scene = Scene::default();
        let low_parent = add(&mut scene, 3);
        let high_child = add(&mut scene, 900);
        let top = add(&mut scene, 4);
        set_parent(&mut scene, high_child, Some(low_parent)).expect("valid parent");

        let index = HierarchyIndex::build(&scene);
        assert!(index.effective_layer(top) > index.effective_layer(high_child));
        assert_eq!(index.paint_order(), vec![low_parent, high_child, top]);
    }

    #[test]
    fn test_siblings_order_by_own_layer() {
        let mut scene = Scene::default();
        let parent = add(&mut scene, 1);
        let a = add(&mut scene, 7);
        let b = add(&mut scene, 2);
        set_parent(&mut scene, a, Some(parent)).expect("valid parent");
        set_parent(&mut scene, b, Some(parent)).expect("valid parent");

        let index = HierarchyIndex::build(&scene);
        assert_eq!(index.paint_order(), vec![parent, b, a]);
    }

    #[test]
    fn test_self_parent_rejected() {
        let mut scene = Scene::default();
        let a = add(&mut scene, 0);
        let result = set_parent(&mut scene, a, Some(a));
        assert!(matches!(result, Err(EngineError::SelfParent(_))));
        assert_eq!(scene.get(a).and_then(|c| c.parent_id()), None);
    }

    #[test]
    fn test_cycle_rejected_leaves_tree_unchanged() {
        let mut scene = Scene::default();
        let a = add(&mut scene, 0);
        let b = add(&mut scene, 0);
        let c = add(&mut scene, 0);
        set_parent(&mut scene, b, Some(a)).expect("valid parent");
        set_parent(&mut scene, c, Some(b)).expect("valid parent");
        let before = scene.clone();

        let result = set_parent(&mut scene, a, Some(c));
        assert!(matches!(result, Err(EngineError::CycleDetected { .. })));
        assert_eq!(scene, before);
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let mut scene = Scene::default();
        let a = add(&mut scene, 0);
        let result = set_parent(&mut scene, a, Some(uuid::Uuid::new_v4()));
        assert!(matches!(result, Err(EngineError::UnknownComponent(_))));
    }

    #[test]
    fn test_inherited_visibility() {
        let mut scene = Scene::default();
        let root = add(&mut scene, 0);
        let mid = add(&mut scene, 0);
        let leaf = add(&mut scene, 0);
        set_parent(&mut scene, mid, Some(root)).expect("valid parent");
        set_parent(&mut scene, leaf, Some(mid)).expect("valid parent");
        scene.update_component(root, &crate::scene::ComponentPatch::visible(false));

        let index = HierarchyIndex::build(&scene);
        assert!(!index.is_effectively_visible(leaf));
        assert!(!is_effectively_visible(&scene, leaf));
        assert!(index.paint_order().is_empty());

        scene.update_component(root, &crate::scene::ComponentPatch::visible(true));
        assert!(is_effectively_visible(&scene, leaf));
    }

    #[test]
    fn test_descendants_breadth_first() {
        let mut scene = Scene::default();
        let root = add(&mut scene, 0);
        let a = add(&mut scene, 0);
        let b = add(&mut scene, 1);
        let a1 = add(&mut scene, 0);
        set_parent(&mut scene, a, Some(root)).expect("valid parent");
        set_parent(&mut scene, b, Some(root)).expect("valid parent");
        set_parent(&mut scene, a1, Some(a)).expect("valid parent");

        let index = HierarchyIndex::build(&scene);
        assert_eq!(index.descendants(root), vec![a, b, a1]);
        assert_eq!(index.depth(a1), 2);
        assert!(index.descendants(a1).is_empty());
    }

    #[test]
    fn test_repair_breaks_cycles() {
        let mut scene = Scene::default();
        let a = add(&mut scene, 0);
        let b = add(&mut scene, 0);
        scene.set_parent_unchecked(a, Some(b));
        scene.set_parent_unchecked(b, Some(a));

        assert!(repair(&mut scene) > 0);
        let index = HierarchyIndex::build(&scene);
        assert!(!index.is_ancestor(a, a));
        assert!(!(index.is_ancestor(a, b) && index.is_ancestor(b, a)));
    }
}
