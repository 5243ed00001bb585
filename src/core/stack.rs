//! # Scene Stack Model
//!
//! The coordinator's picture of what is on screen: one independent stack of
//! scene nodes per tab (a single stack without tabs) and the active tab.
//!
//! ```text
//! SceneStack
//! ├── stacks: Vec<Vec<SceneNode>>   // indexed by tab, O(1)
//! │     [0] Root → Next → Up        // last = current
//! │     [1] Root
//! ├── active: usize                 // 0 without tabs
//! └── tab_host: Option<ElementId>   // Some when tabs are in use
//! ```
//!
//! Invariants, enforced with assertions: every stack starts with its Root
//! and only with it, a Root can never be popped, and `active` is always a
//! valid tab index. Breaking them is a caller bug, not a runtime condition.

use log::debug;

use crate::core::scene::{SceneKind, SceneNode};
use crate::host::ElementId;

#[derive(Debug)]
pub struct SceneStack {
    stacks: Vec<Vec<SceneNode>>,
    active: usize,
    tab_host: Option<ElementId>,
}

impl SceneStack {
    /// A model without tabs.
    pub fn single(root: SceneNode) -> Self {
        assert_root(&root);
        Self {
            stacks: vec![vec![root]],
            active: 0,
            tab_host: None,
        }
    }

    /// One stack per tab root, shown inside `tab_host`.
    pub fn tabs(roots: Vec<SceneNode>, active: usize, tab_host: ElementId) -> Self {
        assert!(!roots.is_empty(), "a tabbed scene stack needs at least one tab");
        assert!(
            active < roots.len(),
            "initial tab {active} out of range for {} tabs",
            roots.len()
        );
        roots.iter().for_each(assert_root);
        Self {
            stacks: roots.into_iter().map(|root| vec![root]).collect(),
            active,
            tab_host: Some(tab_host),
        }
    }

    pub fn tab_count(&self) -> usize {
        self.stacks.len()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn tab_host(&self) -> Option<ElementId> {
        self.tab_host
    }

    pub fn set_active(&mut self, index: usize) {
        assert!(
            index < self.stacks.len(),
            "tab {index} out of range for {} tabs",
            self.stacks.len()
        );
        self.active = index;
    }

    pub fn active(&self) -> &[SceneNode] {
        &self.stacks[self.active]
    }

    pub fn stacks(&self) -> impl Iterator<Item = &[SceneNode]> {
        self.stacks.iter().map(Vec::as_slice)
    }

    /// The last node of the active stack.
    pub fn current(&self) -> &SceneNode {
        // Stacks are never empty: they are built with a root and roots never pop.
        &self.stacks[self.active][self.depth() - 1]
    }

    /// Current node of the given tab.
    pub fn current_in(&self, index: usize) -> Option<&SceneNode> {
        self.stacks.get(index).and_then(|stack| stack.last())
    }

    /// The node right beneath the current one.
    pub fn below_current(&self) -> Option<&SceneNode> {
        let depth = self.depth();
        depth
            .checked_sub(2)
            .map(|index| &self.stacks[self.active][index])
    }

    /// Node count of the active stack.
    pub fn depth(&self) -> usize {
        self.stacks[self.active].len()
    }

    pub fn push(&mut self, node: SceneNode) {
        assert!(
            node.kind() != SceneKind::Root,
            "only Next and Up nodes can be pushed onto a scene stack"
        );
        debug!(
            "stack[{}] push {:?} {} (depth {})",
            self.active,
            node.kind(),
            node.screen_type(),
            self.depth() + 1
        );
        self.stacks[self.active].push(node);
    }

    /// Removes the current node. Popping the Root is a contract violation.
    pub fn pop(&mut self) -> SceneNode {
        assert!(
            self.depth() > 1,
            "cannot pop the root scene of tab {}",
            self.active
        );
        let active = self.active;
        let node = self.stacks[active].pop().expect("depth checked above");
        debug!(
            "stack[{}] pop {:?} {} (depth {})",
            active,
            node.kind(),
            node.screen_type(),
            self.depth()
        );
        node
    }

    /// Keeps nodes `0..=index` of the active stack, returning the rest.
    pub fn truncate_to(&mut self, index: usize) -> Vec<SceneNode> {
        assert!(
            index < self.depth(),
            "truncate index {index} out of range for depth {}",
            self.depth()
        );
        let popped = self.stacks[self.active].split_off(index + 1);
        debug!(
            "stack[{}] popped {} node(s) down to depth {}",
            self.active,
            popped.len(),
            self.depth()
        );
        popped
    }

    /// Discards the stack of tab `index` wholesale and starts it over from
    /// `root`. The active tab is left as is.
    pub fn replace_in(&mut self, index: usize, root: SceneNode) -> Vec<SceneNode> {
        assert_root(&root);
        assert!(
            index < self.stacks.len(),
            "tab {index} out of range for {} tabs",
            self.stacks.len()
        );
        debug!(
            "stack[{}] replaced by {} ({} node(s) discarded)",
            index,
            root.screen_type(),
            self.stacks[index].len()
        );
        std::mem::replace(&mut self.stacks[index], vec![root])
    }
}

fn assert_root(node: &SceneNode) {
    assert!(
        node.kind() == SceneKind::Root,
        "stack bases must be Root nodes, got {:?}",
        node.kind()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::style::Style;
    use crate::host::{Screen, ScreenType};
    use crate::test_support::FixedScreen;
    use std::sync::Arc;

    fn node(kind: SceneKind, id: u64) -> SceneNode {
        let screen: Arc<dyn Screen> = Arc::new(FixedScreen::new(ElementId(id)));
        let screen_type = ScreenType::of::<FixedScreen>();
        match kind {
            SceneKind::Root => SceneNode::root(screen, screen_type, ElementId(id)),
            kind => SceneNode::forward(kind, screen, screen_type, ElementId(id), Style::System),
        }
    }

    #[test]
    fn test_single_stack_push_pop() {
        let mut stack = SceneStack::single(node(SceneKind::Root, 1));
        stack.push(node(SceneKind::Next, 2));
        stack.push(node(SceneKind::Up, 3));
        assert_eq!(stack.depth(), 3);
        assert_eq!(stack.current().host_element(), ElementId(3));
        assert_eq!(stack.below_current().unwrap().host_element(), ElementId(2));

        stack.pop();
        stack.pop();
        assert_eq!(stack.depth(), 1);
        assert!(stack.below_current().is_none());
        assert_eq!(stack.current().kind(), SceneKind::Root);
    }

    #[test]
    #[should_panic(expected = "cannot pop the root")]
    fn test_pop_root_is_fatal() {
        let mut stack = SceneStack::single(node(SceneKind::Root, 1));
        stack.pop();
    }

    #[test]
    #[should_panic(expected = "only Next and Up")]
    fn test_push_root_is_fatal() {
        let mut stack = SceneStack::single(node(SceneKind::Root, 1));
        stack.push(node(SceneKind::Root, 2));
    }

    #[test]
    fn test_tabs_are_independent() {
        let mut stack = SceneStack::tabs(
            vec![node(SceneKind::Root, 1), node(SceneKind::Root, 2)],
            0,
            ElementId(100),
        );
        stack.push(node(SceneKind::Next, 3));
        stack.set_active(1);
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.current().host_element(), ElementId(2));
        assert_eq!(stack.stacks().next().unwrap().len(), 2);
        assert_eq!(stack.current_in(0).unwrap().host_element(), ElementId(3));
        assert_eq!(stack.tab_host(), Some(ElementId(100)));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_set_active_out_of_range_is_fatal() {
        let mut stack = SceneStack::single(node(SceneKind::Root, 1));
        stack.set_active(1);
    }

    #[test]
    fn test_truncate_and_replace() {
        let mut stack = SceneStack::single(node(SceneKind::Root, 1));
        for id in 2..=4 {
            stack.push(node(SceneKind::Next, id));
        }
        let popped = stack.truncate_to(1);
        assert_eq!(popped.len(), 2);
        assert_eq!(stack.current().host_element(), ElementId(2));

        let discarded = stack.replace_in(0, node(SceneKind::Root, 9));
        assert_eq!(discarded.len(), 2);
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.current().host_element(), ElementId(9));
    }

    #[test]
    fn test_replace_in_leaves_other_tabs_alone() {
        let mut stack = SceneStack::tabs(
            vec![node(SceneKind::Root, 1), node(SceneKind::Root, 2)],
            0,
            ElementId(100),
        );
        stack.push(node(SceneKind::Next, 3));
        stack.set_active(1);
        stack.push(node(SceneKind::Next, 4));

        let discarded = stack.replace_in(0, node(SceneKind::Root, 9));

        assert_eq!(discarded.len(), 2);
        assert_eq!(stack.active_index(), 1);
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.current_in(0).unwrap().host_element(), ElementId(9));
        assert_eq!(stack.current().host_element(), ElementId(4));
    }
}
