//! # Host Boundary
//!
//! Everything the coordinator needs from the platform that actually draws
//! screens. The coordinator never touches pixels; it only issues commands
//! against element handles and waits for their completion callbacks.
//!
//! ```text
//!   Coordinator ──commands──▶ Host (root, push-context, presenter, tab-host)
//!        ▲                      │
//!        └────completion────────┘
//! ```
//!
//! ## Modules
//!
//! - [`screen`]: the `Screen` / `Scene` traits and `ScreenSpec` factories
//! - [`headless`]: an in-memory host used by the demo binary and the tests

pub mod headless;
pub mod screen;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::style::{PresentationMode, TransitionDescriptor};

pub use headless::{HeadlessHost, HostCommand, HostEvent, Phase};
pub use screen::{Scene, Screen, ScreenSpec, ScreenType, TabsSpec};

/// Opaque handle to an on-screen element owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity of the native navigation item attached to an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NavItemId(pub u64);

/// Container behaviour of an element, as far as wrapping is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementKind {
    Plain,
    PushContainer,
    /// Tab host or any other container that stacks overlays itself.
    OverlayStack,
    SplitLayout,
}

impl ElementKind {
    /// Containers that already give their descendants a navigation context.
    pub fn is_container(self) -> bool {
        !matches!(self, ElementKind::Plain)
    }
}

/// Fired by the host once a visual change has fully completed.
pub type Completion = Box<dyn FnOnce() + Send + 'static>;

/// Native capabilities of the platform hosting the screens.
///
/// Calls are only ever made from the coordinator task. Methods that animate
/// take an `animated` flag and a [`Completion`] that must be invoked exactly
/// once, after the visual change is finished (immediately is fine when
/// nothing animates).
pub trait Host: Send + Sync {
    // ── Elements ────────────────────────────────────────────────────────────

    fn create_element(&self, label: &str) -> ElementId;
    fn element_kind(&self, element: ElementId) -> ElementKind;
    /// Direct children of `element`.
    fn children(&self, element: ElementId) -> Vec<ElementId>;
    fn navigation_item(&self, element: ElementId) -> NavItemId;
    /// Wraps `element` in a fresh push container and returns the container.
    fn wrap_in_push_container(&self, element: ElementId) -> ElementId;
    /// Builds a tab host showing `tabs`, with `selected` visible.
    fn make_tab_host(&self, tabs: &[ElementId], selected: usize) -> ElementId;

    // ── Host container ──────────────────────────────────────────────────────

    fn set_root(
        &self,
        root: ElementId,
        transition: Option<&TransitionDescriptor>,
        animated: bool,
        done: Completion,
    );
    /// Element currently overlaid on top of the root, if any.
    fn presented_over_root(&self) -> Option<ElementId>;
    fn dismiss_presented(&self, animated: bool, done: Completion);

    // ── Push context ────────────────────────────────────────────────────────

    /// Nearest push container enclosing `element` (or `element` itself).
    fn push_context(&self, element: ElementId) -> Option<ElementId>;
    fn push(
        &self,
        container: ElementId,
        element: ElementId,
        transition: Option<&TransitionDescriptor>,
        animated: bool,
        done: Completion,
    );
    /// Pops everything above `element` inside `container` in one step.
    fn pop_to(
        &self,
        container: ElementId,
        element: ElementId,
        transition: Option<&TransitionDescriptor>,
        animated: bool,
        done: Completion,
    );

    // ── Presenting ancestor ─────────────────────────────────────────────────

    /// The element that presented `element` (or one of its ancestors).
    fn presenting_ancestor(&self, element: ElementId) -> Option<ElementId>;
    #[allow(clippy::too_many_arguments)]
    fn present(
        &self,
        presenter: ElementId,
        element: ElementId,
        mode: PresentationMode,
        transition: Option<&TransitionDescriptor>,
        animated: bool,
        done: Completion,
    );
    /// Dismisses everything `presenter` has presented.
    fn dismiss(
        &self,
        presenter: ElementId,
        transition: Option<&TransitionDescriptor>,
        animated: bool,
        done: Completion,
    );

    // ── Tab host ────────────────────────────────────────────────────────────

    fn select_tab(
        &self,
        tab_host: ElementId,
        index: usize,
        transition: Option<&TransitionDescriptor>,
    );
    #[allow(clippy::too_many_arguments)]
    fn replace_tab(
        &self,
        tab_host: ElementId,
        index: usize,
        element: ElementId,
        transition: Option<&TransitionDescriptor>,
        animated: bool,
        done: Completion,
    );
    fn set_tab_bar_visible(&self, tab_host: ElementId, visible: bool, animated: bool);
}
