//! # Back-To Traversal
//!
//! Decides how `back_to` collapses the active stack onto an earlier screen.
//!
//! ```text
//!   current is Next ──▶ walk the contiguous Next run downward
//!                        (the first non-Next node is the last one checked)
//!                        match  → PopTo(index)            one animated pop-to
//!                        no match ↓
//!   otherwise       ──▶ scan the whole stack for the topmost match
//!                        upper neighbour is Up
//!                               → DismissTo(index)        one animated dismiss
//!                        upper neighbour is Next
//!                               → DismissThenPopTo(index) drop the overlays above
//!                                                         the run, then one pop-to
//!                        no match → None (caller treats it as fatal)
//! ```
//!
//! There is no implicit fallback to the stack's root.

use crate::core::scene::{SceneKind, SceneNode};
use crate::host::{ElementId, ScreenType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackToPlan {
    /// The current screen already is the target.
    AlreadyThere,
    /// Pop every node above `index` within the push container.
    PopTo { index: usize },
    /// Dismiss everything `presenter` presented, landing on `index`.
    DismissTo { index: usize, presenter: ElementId },
    /// `index` was pushed over by a Next run that something was presented
    /// over. Dismiss everything `presenter` presented, then pop the run.
    DismissThenPopTo { index: usize, presenter: ElementId },
}

/// Plans a `back_to(target)` over `stack` (base first, current last).
///
/// `presenter_of` reports the presenting ancestor of a node's host element.
pub fn plan_back_to(
    stack: &[SceneNode],
    target: ScreenType,
    presenter_of: impl Fn(&SceneNode) -> Option<ElementId>,
) -> Option<BackToPlan> {
    let current = stack.last()?;
    if current.screen_type() == target {
        return Some(BackToPlan::AlreadyThere);
    }
    let below = stack.len() - 1;

    if current.kind() == SceneKind::Next {
        for index in (0..below).rev() {
            let node = &stack[index];
            if node.screen_type() == target {
                return Some(BackToPlan::PopTo { index });
            }
            if node.kind() != SceneKind::Next {
                break;
            }
        }
    }

    (0..below).rev().find_map(|index| {
        if stack[index].screen_type() != target {
            return None;
        }
        if stack[index + 1].kind() == SceneKind::Up {
            return presenter_of(&stack[index + 1])
                .map(|presenter| BackToPlan::DismissTo { index, presenter });
        }
        // The Next run above the match ends where an overlay starts.
        let overlay = stack[index + 1..]
            .iter()
            .find(|node| node.kind() == SceneKind::Up)?;
        presenter_of(overlay).map(|presenter| BackToPlan::DismissThenPopTo { index, presenter })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::style::Style;
    use crate::host::Screen;
    use crate::test_support::{Detail, FixedScreen, Home, Profile, Settings};
    use std::sync::Arc;

    fn node<S: 'static>(kind: SceneKind, id: u64) -> SceneNode {
        let screen: Arc<dyn Screen> = Arc::new(FixedScreen::new(ElementId(id)));
        let screen_type = ScreenType::of::<S>();
        match kind {
            SceneKind::Root => SceneNode::root(screen, screen_type, ElementId(id)),
            kind => SceneNode::forward(kind, screen, screen_type, ElementId(id), Style::System),
        }
    }

    /// Up nodes are presented by the element right beneath them.
    fn presenter_in(stack: &[SceneNode]) -> impl Fn(&SceneNode) -> Option<ElementId> + '_ {
        move |node| {
            let index = stack
                .iter()
                .position(|n| n.host_element() == node.host_element())?;
            (node.kind() == SceneKind::Up && index > 0).then(|| stack[index - 1].element())
        }
    }

    #[test]
    fn test_current_match_is_noop() {
        let stack = vec![node::<Home>(SceneKind::Root, 1), node::<Detail>(SceneKind::Next, 2)];
        let plan = plan_back_to(&stack, ScreenType::of::<Detail>(), presenter_in(&stack));
        assert_eq!(plan, Some(BackToPlan::AlreadyThere));
    }

    #[test]
    fn test_next_run_pops_to_match_in_one_step() {
        let stack = vec![
            node::<Home>(SceneKind::Root, 1),
            node::<Detail>(SceneKind::Next, 2),
            node::<Settings>(SceneKind::Next, 3),
            node::<Profile>(SceneKind::Next, 4),
        ];
        let plan = plan_back_to(&stack, ScreenType::of::<Detail>(), presenter_in(&stack));
        assert_eq!(plan, Some(BackToPlan::PopTo { index: 1 }));
    }

    #[test]
    fn test_next_run_boundary_is_checked() {
        let stack = vec![
            node::<Home>(SceneKind::Root, 1),
            node::<Detail>(SceneKind::Next, 2),
        ];
        let plan = plan_back_to(&stack, ScreenType::of::<Home>(), presenter_in(&stack));
        assert_eq!(plan, Some(BackToPlan::PopTo { index: 0 }));
    }

    #[test]
    fn test_up_chain_dismisses_to_presenter() {
        let stack = vec![
            node::<Home>(SceneKind::Root, 1),
            node::<Detail>(SceneKind::Up, 2),
            node::<Settings>(SceneKind::Up, 3),
        ];
        let plan = plan_back_to(&stack, ScreenType::of::<Home>(), presenter_in(&stack));
        assert_eq!(
            plan,
            Some(BackToPlan::DismissTo {
                index: 0,
                presenter: ElementId(1)
            })
        );
    }

    #[test]
    fn test_exhausted_next_run_falls_through_to_up_chain() {
        // Home ─up→ Detail ─next→ Settings ; target Home sits beyond the Up boundary
        let stack = vec![
            node::<Home>(SceneKind::Root, 1),
            node::<Detail>(SceneKind::Up, 2),
            node::<Settings>(SceneKind::Next, 3),
        ];
        let plan = plan_back_to(&stack, ScreenType::of::<Home>(), presenter_in(&stack));
        assert_eq!(
            plan,
            Some(BackToPlan::DismissTo {
                index: 0,
                presenter: ElementId(1)
            })
        );
    }

    #[test]
    fn test_match_below_pushed_neighbor_dismisses_then_pops() {
        // Detail's upper neighbour was pushed, and Profile presented over it.
        let stack = vec![
            node::<Home>(SceneKind::Root, 1),
            node::<Detail>(SceneKind::Up, 2),
            node::<Settings>(SceneKind::Next, 3),
            node::<Profile>(SceneKind::Up, 4),
        ];
        let plan = plan_back_to(&stack, ScreenType::of::<Detail>(), presenter_in(&stack));
        assert_eq!(
            plan,
            Some(BackToPlan::DismissThenPopTo {
                index: 1,
                presenter: ElementId(3)
            })
        );
    }

    #[test]
    fn test_missing_presenter_has_no_plan() {
        let stack = vec![
            node::<Home>(SceneKind::Root, 1),
            node::<Detail>(SceneKind::Up, 2),
        ];
        let plan = plan_back_to(&stack, ScreenType::of::<Home>(), |_| None);
        assert_eq!(plan, None);
    }

    #[test]
    fn test_missing_target_has_no_plan() {
        let stack = vec![
            node::<Home>(SceneKind::Root, 1),
            node::<Detail>(SceneKind::Next, 2),
        ];
        let plan = plan_back_to(&stack, ScreenType::of::<Profile>(), presenter_in(&stack));
        assert_eq!(plan, None);
    }
}
