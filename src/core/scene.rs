//! # Scene Nodes
//!
//! One stack entry: a screen, the element it is hosted in, and the
//! transition that brought it on screen. The transition is resolved once,
//! when the node is built, so the way back animates exactly like the way in.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::core::style::{self, Style, TransitionDescriptor};
use crate::host::{ElementId, Screen, ScreenType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SceneKind {
    /// Base of a stack, created by `initialize` or `set`.
    Root,
    /// Pushed into the enclosing push container.
    Next,
    /// Presented over the previous node.
    Up,
}

/// The style used to reach a node plus its memoized descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTransition {
    pub style: Style,
    pub descriptor: Option<Arc<TransitionDescriptor>>,
}

impl ResolvedTransition {
    pub fn resolve(style: Style) -> Self {
        Self {
            style,
            descriptor: style::resolve(style).map(Arc::new),
        }
    }
}

#[derive(Clone)]
pub struct SceneNode {
    kind: SceneKind,
    screen: Arc<dyn Screen>,
    screen_type: ScreenType,
    host_element: ElementId,
    transition: Option<ResolvedTransition>,
}

impl SceneNode {
    /// A stack base. Roots are never reached through a transition.
    pub fn root(screen: Arc<dyn Screen>, screen_type: ScreenType, host_element: ElementId) -> Self {
        Self {
            kind: SceneKind::Root,
            screen,
            screen_type,
            host_element,
            transition: None,
        }
    }

    /// A `Next` or `Up` entry reached with `style`.
    pub fn forward(
        kind: SceneKind,
        screen: Arc<dyn Screen>,
        screen_type: ScreenType,
        host_element: ElementId,
        style: Style,
    ) -> Self {
        assert!(
            kind != SceneKind::Root,
            "forward scene nodes must be Next or Up, got Root"
        );
        Self {
            kind,
            screen,
            screen_type,
            host_element,
            transition: Some(ResolvedTransition::resolve(style)),
        }
    }

    pub fn kind(&self) -> SceneKind {
        self.kind
    }

    pub fn screen(&self) -> &Arc<dyn Screen> {
        &self.screen
    }

    pub fn screen_type(&self) -> ScreenType {
        self.screen_type
    }

    /// The element this node occupies in the host hierarchy (maybe a wrapper).
    pub fn host_element(&self) -> ElementId {
        self.host_element
    }

    /// The screen's own element, inside any wrapper.
    pub fn element(&self) -> ElementId {
        self.screen.element()
    }

    pub fn style(&self) -> Option<Style> {
        self.transition.as_ref().map(|t| t.style)
    }

    /// Cached custom descriptor, if the style has one.
    pub fn descriptor(&self) -> Option<Arc<TransitionDescriptor>> {
        self.transition.as_ref().and_then(|t| t.descriptor.clone())
    }

    /// True when this node hosts the given element directly or one level down.
    pub fn hosts(&self, element: ElementId, children: &[ElementId]) -> bool {
        self.host_element == element
            || self.element() == element
            || children.contains(&self.host_element)
    }
}

impl fmt::Debug for SceneNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneNode")
            .field("kind", &self.kind)
            .field("screen_type", &self.screen_type)
            .field("host_element", &self.host_element)
            .field("style", &self.style())
            .finish()
    }
}
