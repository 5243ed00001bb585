//! # Headless Host
//!
//! An in-memory stand-in for a real windowing layer. It keeps a small
//! element tree (push containers, tab hosts, presentations), applies every
//! command to it right away, and fires completions after a simulated
//! animation delay.
//!
//! Every command is recorded twice in a timeline, once when it starts and
//! once when its completion fires, so callers can check ordering:
//!
//! ```text
//! seq  at_ms  phase     command
//!   0      0  started   set-root #2
//!   1      0  finished  set-root #2
//!   2      3  started   push #3 into #2
//!   3    253  finished  push #3 into #2
//! ```

use log::{debug, warn};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use super::{Completion, ElementId, ElementKind, Host, NavItemId};
use crate::core::style::{PresentationMode, Style, TransitionDescriptor};

/// A host command as recorded in the timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum HostCommand {
    SetRoot {
        root: ElementId,
        style: Option<Style>,
        animated: bool,
    },
    DismissPresented {
        element: ElementId,
        animated: bool,
    },
    Push {
        container: ElementId,
        element: ElementId,
        style: Option<Style>,
        animated: bool,
    },
    PopTo {
        container: ElementId,
        element: ElementId,
        popped: Vec<ElementId>,
        style: Option<Style>,
        animated: bool,
    },
    Present {
        presenter: ElementId,
        element: ElementId,
        mode: PresentationMode,
        style: Option<Style>,
        animated: bool,
    },
    Dismiss {
        presenter: ElementId,
        dismissed: Vec<ElementId>,
        style: Option<Style>,
        animated: bool,
    },
    SelectTab {
        tab_host: ElementId,
        index: usize,
        style: Option<Style>,
    },
    ReplaceTab {
        tab_host: ElementId,
        index: usize,
        element: ElementId,
        style: Option<Style>,
        animated: bool,
    },
    TabBarVisible {
        visible: bool,
        animated: bool,
    },
}

fn style_suffix(style: &Option<Style>) -> String {
    style.map(|s| format!(" ({s})")).unwrap_or_default()
}

impl fmt::Display for HostCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostCommand::SetRoot { root, style, .. } => {
                write!(f, "set-root {root}{}", style_suffix(style))
            }
            HostCommand::DismissPresented { element, .. } => {
                write!(f, "dismiss-presented {element}")
            }
            HostCommand::Push {
                container,
                element,
                style,
                ..
            } => write!(f, "push {element} into {container}{}", style_suffix(style)),
            HostCommand::PopTo {
                element, popped, style, ..
            } => write!(
                f,
                "pop-to {element} ({} popped){}",
                popped.len(),
                style_suffix(style)
            ),
            HostCommand::Present {
                presenter,
                element,
                mode,
                style,
                ..
            } => write!(
                f,
                "present {element} over {presenter} [{mode:?}]{}",
                style_suffix(style)
            ),
            HostCommand::Dismiss {
                presenter,
                dismissed,
                style,
                ..
            } => write!(
                f,
                "dismiss {} over {presenter}{}",
                dismissed.len(),
                style_suffix(style)
            ),
            HostCommand::SelectTab { index, style, .. } => {
                write!(f, "select-tab {index}{}", style_suffix(style))
            }
            HostCommand::ReplaceTab {
                index,
                element,
                style,
                ..
            } => write!(f, "replace-tab {index} with {element}{}", style_suffix(style)),
            HostCommand::TabBarVisible { visible, .. } => {
                write!(f, "tab-bar {}", if *visible { "shown" } else { "hidden" })
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Started,
    Finished,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Started => write!(f, "started"),
            Phase::Finished => write!(f, "finished"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HostEvent {
    pub seq: usize,
    /// Milliseconds since the host was created.
    pub at_ms: u64,
    pub phase: Phase,
    pub command: HostCommand,
}

#[derive(Debug)]
struct ElementState {
    label: String,
    kind: ElementKind,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    presented: Option<ElementId>,
    presenter: Option<ElementId>,
    selected: usize,
}

#[derive(Debug, Default)]
struct Tree {
    elements: HashMap<ElementId, ElementState>,
    root: Option<ElementId>,
    next_id: u64,
    tab_bar_visible: bool,
    timeline: Vec<HostEvent>,
}

impl Tree {
    fn alloc(&mut self, label: String, kind: ElementKind) -> ElementId {
        self.next_id += 1;
        let id = ElementId(self.next_id);
        self.elements.insert(
            id,
            ElementState {
                label,
                kind,
                parent: None,
                children: Vec::new(),
                presented: None,
                presenter: None,
                selected: 0,
            },
        );
        id
    }

    fn adopt(&mut self, parent: ElementId, child: ElementId) {
        if let Some(state) = self.elements.get_mut(&child) {
            state.parent = Some(parent);
        }
    }

    fn orphan(&mut self, child: ElementId) {
        if let Some(state) = self.elements.get_mut(&child) {
            state.parent = None;
        }
    }

    /// `element` and everything nested in it, through children only.
    fn subtree(&self, element: ElementId) -> Vec<ElementId> {
        let mut out = vec![element];
        let mut index = 0;
        while index < out.len() {
            if let Some(state) = self.elements.get(&out[index]) {
                out.extend(state.children.iter().copied());
            }
            index += 1;
        }
        out
    }

    /// Unlinks everything `presenter` has presented, directly or not.
    fn dismiss_from(&mut self, presenter: ElementId) -> Vec<ElementId> {
        let mut dismissed = Vec::new();
        let mut pending = vec![presenter];
        while let Some(current) = pending.pop() {
            let Some(presented) = self
                .elements
                .get_mut(&current)
                .and_then(|state| state.presented.take())
            else {
                continue;
            };
            if let Some(state) = self.elements.get_mut(&presented) {
                state.presenter = None;
            }
            dismissed.push(presented);
            pending.extend(self.subtree(presented));
        }
        dismissed
    }

    /// First element under the root (children only) that presents something.
    fn root_presenter(&self) -> Option<ElementId> {
        let root = self.root?;
        self.subtree(root).into_iter().find(|element| {
            self.elements
                .get(element)
                .is_some_and(|state| state.presented.is_some())
        })
    }

    fn record(&mut self, started: Instant, phase: Phase, command: HostCommand) {
        let seq = self.timeline.len();
        self.timeline.push(HostEvent {
            seq,
            at_ms: started.elapsed().as_millis() as u64,
            phase,
            command,
        });
    }
}

/// In-memory [`Host`] with simulated animation time.
#[derive(Clone)]
pub struct HeadlessHost {
    tree: Arc<Mutex<Tree>>,
    animation: Duration,
    created: Instant,
}

impl HeadlessHost {
    /// `animation` is how long animated commands take to complete.
    pub fn new(animation: Duration) -> Self {
        Self {
            tree: Arc::new(Mutex::new(Tree {
                tab_bar_visible: true,
                ..Default::default()
            })),
            animation,
            created: Instant::now(),
        }
    }

    /// A host whose commands all complete immediately.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    fn lock(&self) -> MutexGuard<'_, Tree> {
        // A poisoned tree only means a test panicked mid-command; keep going.
        self.tree.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Records the start of `command` and fires `done` after the animation.
    fn run(&self, command: HostCommand, animated: bool, done: Completion) {
        debug!("Host: {:?}", command);
        self.lock()
            .record(self.created, Phase::Started, command.clone());

        if !animated || self.animation.is_zero() {
            self.lock().record(self.created, Phase::Finished, command);
            done();
            return;
        }

        let tree = self.tree.clone();
        let created = self.created;
        let animation = self.animation;
        tokio::spawn(async move {
            tokio::time::sleep(animation).await;
            tree.lock()
                .unwrap_or_else(|e| e.into_inner())
                .record(created, Phase::Finished, command);
            done();
        });
    }

    // ── Inspection ──────────────────────────────────────────────────────────

    pub fn timeline(&self) -> Vec<HostEvent> {
        self.lock().timeline.clone()
    }

    /// Commands in the order they were started.
    pub fn commands(&self) -> Vec<HostCommand> {
        self.lock()
            .timeline
            .iter()
            .filter(|event| event.phase == Phase::Started)
            .map(|event| event.command.clone())
            .collect()
    }

    pub fn root(&self) -> Option<ElementId> {
        self.lock().root
    }

    pub fn label(&self, element: ElementId) -> Option<String> {
        self.lock().elements.get(&element).map(|s| s.label.clone())
    }

    pub fn presented_by(&self, element: ElementId) -> Option<ElementId> {
        self.lock().elements.get(&element).and_then(|s| s.presented)
    }

    pub fn selected_tab(&self, tab_host: ElementId) -> Option<usize> {
        self.lock().elements.get(&tab_host).map(|s| s.selected)
    }

    pub fn tab_bar_visible(&self) -> bool {
        self.lock().tab_bar_visible
    }

    /// Labels from the root to the topmost visible element.
    pub fn visible_path(&self) -> Vec<String> {
        let tree = self.lock();
        let mut path = Vec::new();
        let mut cursor = tree.root;
        while let Some(element) = cursor {
            let Some(state) = tree.elements.get(&element) else {
                break;
            };
            path.push(state.label.clone());
            cursor = match state.kind {
                _ if state.presented.is_some() => state.presented,
                ElementKind::OverlayStack => state.children.get(state.selected).copied(),
                ElementKind::PushContainer | ElementKind::SplitLayout => {
                    state.children.last().copied()
                }
                ElementKind::Plain => None,
            };
        }
        path
    }
}

fn style_of(transition: Option<&TransitionDescriptor>) -> Option<Style> {
    transition.map(|t| t.style)
}

impl Host for HeadlessHost {
    fn create_element(&self, label: &str) -> ElementId {
        self.lock().alloc(label.to_string(), ElementKind::Plain)
    }

    fn element_kind(&self, element: ElementId) -> ElementKind {
        self.lock()
            .elements
            .get(&element)
            .map(|s| s.kind)
            .unwrap_or(ElementKind::Plain)
    }

    fn children(&self, element: ElementId) -> Vec<ElementId> {
        self.lock()
            .elements
            .get(&element)
            .map(|s| s.children.clone())
            .unwrap_or_default()
    }

    fn navigation_item(&self, element: ElementId) -> NavItemId {
        NavItemId(element.0)
    }

    fn wrap_in_push_container(&self, element: ElementId) -> ElementId {
        let mut tree = self.lock();
        let label = match tree.elements.get(&element) {
            Some(state) => format!("push({})", state.label),
            None => "push".to_string(),
        };
        let container = tree.alloc(label, ElementKind::PushContainer);
        if let Some(state) = tree.elements.get_mut(&container) {
            state.children.push(element);
        }
        tree.adopt(container, element);
        container
    }

    fn make_tab_host(&self, tabs: &[ElementId], selected: usize) -> ElementId {
        let mut tree = self.lock();
        let tab_host = tree.alloc("tabs".to_string(), ElementKind::OverlayStack);
        if let Some(state) = tree.elements.get_mut(&tab_host) {
            state.children = tabs.to_vec();
            state.selected = selected;
        }
        for &tab in tabs {
            tree.adopt(tab_host, tab);
        }
        tab_host
    }

    fn set_root(
        &self,
        root: ElementId,
        transition: Option<&TransitionDescriptor>,
        animated: bool,
        done: Completion,
    ) {
        self.lock().root = Some(root);
        let command = HostCommand::SetRoot {
            root,
            style: style_of(transition),
            animated,
        };
        self.run(command, animated, done);
    }

    fn presented_over_root(&self) -> Option<ElementId> {
        let tree = self.lock();
        let presenter = tree.root_presenter()?;
        tree.elements.get(&presenter).and_then(|s| s.presented)
    }

    fn dismiss_presented(&self, animated: bool, done: Completion) {
        let dismissed = {
            let mut tree = self.lock();
            match tree.root_presenter() {
                Some(presenter) => tree.dismiss_from(presenter),
                None => Vec::new(),
            }
        };
        let Some(&element) = dismissed.first() else {
            done();
            return;
        };
        self.run(HostCommand::DismissPresented { element, animated }, animated, done);
    }

    fn push_context(&self, element: ElementId) -> Option<ElementId> {
        let tree = self.lock();
        let mut cursor = Some(element);
        while let Some(current) = cursor {
            let state = tree.elements.get(&current)?;
            if state.kind == ElementKind::PushContainer {
                return Some(current);
            }
            cursor = state.parent;
        }
        None
    }

    fn push(
        &self,
        container: ElementId,
        element: ElementId,
        transition: Option<&TransitionDescriptor>,
        animated: bool,
        done: Completion,
    ) {
        {
            let mut tree = self.lock();
            if let Some(state) = tree.elements.get_mut(&container) {
                state.children.push(element);
            }
            tree.adopt(container, element);
        }
        let command = HostCommand::Push {
            container,
            element,
            style: style_of(transition),
            animated,
        };
        self.run(command, animated, done);
    }

    fn pop_to(
        &self,
        container: ElementId,
        element: ElementId,
        transition: Option<&TransitionDescriptor>,
        animated: bool,
        done: Completion,
    ) {
        let popped = {
            let mut tree = self.lock();
            let keep = match tree.elements.get(&container) {
                Some(_) if element == container => Some(1),
                Some(state) => state
                    .children
                    .iter()
                    .position(|child| *child == element)
                    .map(|index| index + 1),
                None => None,
            };
            match keep {
                Some(keep) => {
                    let popped = tree
                        .elements
                        .get_mut(&container)
                        .map(|state| state.children.split_off(keep.min(state.children.len())))
                        .unwrap_or_default();
                    for &child in &popped {
                        tree.orphan(child);
                    }
                    popped
                }
                None => {
                    warn!("Host: pop_to target {} is not in container {}", element, container);
                    Vec::new()
                }
            }
        };
        let command = HostCommand::PopTo {
            container,
            element,
            popped,
            style: style_of(transition),
            animated,
        };
        self.run(command, animated, done);
    }

    fn presenting_ancestor(&self, element: ElementId) -> Option<ElementId> {
        let tree = self.lock();
        let mut cursor = Some(element);
        while let Some(current) = cursor {
            let state = tree.elements.get(&current)?;
            if let Some(presenter) = state.presenter {
                return Some(presenter);
            }
            cursor = state.parent;
        }
        None
    }

    fn present(
        &self,
        presenter: ElementId,
        element: ElementId,
        mode: PresentationMode,
        transition: Option<&TransitionDescriptor>,
        animated: bool,
        done: Completion,
    ) {
        {
            let mut tree = self.lock();
            if let Some(state) = tree.elements.get_mut(&presenter) {
                if let Some(previous) = state.presented.replace(element) {
                    warn!("Host: {} was already presenting {}", presenter, previous);
                }
            }
            if let Some(state) = tree.elements.get_mut(&element) {
                state.presenter = Some(presenter);
            }
        }
        let command = HostCommand::Present {
            presenter,
            element,
            mode,
            style: style_of(transition),
            animated,
        };
        self.run(command, animated, done);
    }

    fn dismiss(
        &self,
        presenter: ElementId,
        transition: Option<&TransitionDescriptor>,
        animated: bool,
        done: Completion,
    ) {
        let dismissed = self.lock().dismiss_from(presenter);
        let command = HostCommand::Dismiss {
            presenter,
            dismissed,
            style: style_of(transition),
            animated,
        };
        self.run(command, animated, done);
    }

    fn select_tab(
        &self,
        tab_host: ElementId,
        index: usize,
        transition: Option<&TransitionDescriptor>,
    ) {
        if let Some(state) = self.lock().elements.get_mut(&tab_host) {
            state.selected = index;
        }
        let command = HostCommand::SelectTab {
            tab_host,
            index,
            style: style_of(transition),
        };
        self.run(command, false, Box::new(|| {}));
    }

    fn replace_tab(
        &self,
        tab_host: ElementId,
        index: usize,
        element: ElementId,
        transition: Option<&TransitionDescriptor>,
        animated: bool,
        done: Completion,
    ) {
        {
            let mut tree = self.lock();
            let previous = tree.elements.get_mut(&tab_host).and_then(|state| {
                state
                    .children
                    .get_mut(index)
                    .map(|slot| std::mem::replace(slot, element))
            });
            if let Some(previous) = previous {
                tree.orphan(previous);
            }
            tree.adopt(tab_host, element);
        }
        let command = HostCommand::ReplaceTab {
            tab_host,
            index,
            element,
            style: style_of(transition),
            animated,
        };
        self.run(command, animated, done);
    }

    fn set_tab_bar_visible(&self, _tab_host: ElementId, visible: bool, animated: bool) {
        self.lock().tab_bar_visible = visible;
        self.run(HostCommand::TabBarVisible { visible, animated }, false, Box::new(|| {}));
    }
}
