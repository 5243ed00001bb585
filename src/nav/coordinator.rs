//! # Coordinator
//!
//! The single owner of the scene stack model. Runs as one tokio task (the
//! "UI task"): every model mutation and every host call happens here.
//!
//! ## Step chain
//!
//! A queued operation moves through explicit steps, each triggered by an
//! event the previous step arranged for:
//!
//! ```text
//!   take_next ─▶ begin ─(spawned readiness gate)─▶ Ready ─▶ commit
//!                                                             │
//!                      finish ◀── VisualDone(Finish) ◀── host completion
//!                        │
//!                   queue.resume()
//! ```
//!
//! A two-phase `set` replaces `Finish` with `SetFinal { target, tab }`: the
//! first visual completion starts phase two (fresh instance, stack of `tab`
//! replaced, immediate root swap) instead of finishing. The queue stays
//! suspended across both phases. `tab` is the tab phase one ran in, which a
//! tab switch in between does not change.
//!
//! Tab-bar visibility travels with the commit, so it never changes before
//! the readiness gate opens.
//!
//! `tab`, the reconcile hooks and `snapshot` bypass the queue.

use log::{debug, info, warn};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, oneshot};

use crate::core::config::CoordinatorConfig;
use crate::core::scene::{SceneKind, SceneNode};
use crate::core::stack::SceneStack;
use crate::core::style::{self, Style, TransitionDescriptor};
use crate::host::screen::TabsScreen;
use crate::host::{
    Completion, ElementId, Host, NavItemId, Screen, ScreenSpec, ScreenType, TabsSpec,
};
use crate::nav::queue::TransitionQueue;
use crate::nav::readiness;
use crate::nav::traversal::{BackToPlan, plan_back_to};

// ============================================================================
// Messages
// ============================================================================

/// Sent by `Navigator` handles.
pub(crate) enum Command {
    Transition(Transition),
    Tab {
        index: usize,
        done: oneshot::Sender<()>,
    },
    DidPopElement {
        element: ElementId,
        done: oneshot::Sender<bool>,
    },
    DidPopItem {
        item: NavItemId,
        done: oneshot::Sender<bool>,
    },
    Snapshot {
        done: oneshot::Sender<Snapshot>,
    },
}

/// A queued operation and the sender fired when it completes.
pub(crate) struct Transition {
    pub op: Op,
    pub done: oneshot::Sender<()>,
}

pub(crate) enum Op {
    Initialize(ScreenSpec),
    InitializeTabs(TabsSpec),
    Next { spec: ScreenSpec, style: Style },
    Up { spec: ScreenSpec, style: Style },
    Set { spec: ScreenSpec, style: Style },
    SetTabs { tabs: TabsSpec, style: Style },
    Back,
    BackTo(ScreenType),
}

impl Op {
    fn label(&self) -> String {
        match self {
            Op::Initialize(spec) => format!("initialize({})", spec.screen_type()),
            Op::InitializeTabs(tabs) => format!("initialize(tabs x{})", tabs.tabs.len()),
            Op::Next { spec, style } => format!("next({}, {style})", spec.screen_type()),
            Op::Up { spec, style } => format!("up({}, {style})", spec.screen_type()),
            Op::Set { spec, style } => format!("set({}, {style})", spec.screen_type()),
            Op::SetTabs { tabs, style } => format!("set(tabs x{}, {style})", tabs.tabs.len()),
            Op::Back => "back".to_string(),
            Op::BackTo(target) => format!("back_to({target})"),
        }
    }
}

/// Posted back to the coordinator by readiness gates and host completions.
enum Event {
    Ready { commit: Commit, then: Then },
    VisualDone { then: Then },
}

/// A visual command waiting to be issued.
struct Commit {
    visual: Visual,
    transition: Option<Arc<TransitionDescriptor>>,
    animated: bool,
    /// Tab host and the tab-bar visibility to apply with the visual.
    tab_bar: Option<(ElementId, bool)>,
}

#[derive(Debug)]
enum Visual {
    SetRoot { root: ElementId },
    ReplaceTab { tab_host: ElementId, index: usize, element: ElementId },
    Push { container: ElementId, element: ElementId },
    Present { presenter: ElementId, element: ElementId, mode: style::PresentationMode },
    PopTo { container: ElementId, element: ElementId },
    Dismiss { presenter: ElementId },
    DismissThenPopTo { presenter: ElementId, container: ElementId, element: ElementId },
}

/// What happens once a commit's visual change has completed.
enum Then {
    Finish,
    /// Phase two of a two-phase `set`, replacing the stack of `tab`.
    SetFinal { target: Target, tab: usize },
}

/// What a `set` installs as the new root.
enum Target {
    Screen(ScreenSpec),
    Tabs(TabsSpec),
}

// ============================================================================
// Snapshot
// ============================================================================

/// Read-only view of the model, for callers and tests.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    pub active_tab: usize,
    pub tabs: Vec<Vec<NodeSummary>>,
    /// Label of the transition currently holding the queue.
    pub in_flight: Option<String>,
    pub queued: usize,
    pub active_transition: Option<Style>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeSummary {
    pub kind: SceneKind,
    pub screen: &'static str,
    pub element: ElementId,
    pub host_element: ElementId,
    pub style: Option<Style>,
}

impl Snapshot {
    /// Nodes of the active tab, base first.
    pub fn active(&self) -> &[NodeSummary] {
        self.tabs
            .get(self.active_tab)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn depth(&self) -> usize {
        self.active().len()
    }

    pub fn current(&self) -> Option<&NodeSummary> {
        self.active().last()
    }

    /// Screen names of the active tab, base first.
    pub fn screens(&self) -> Vec<&'static str> {
        self.active().iter().map(|node| node.screen).collect()
    }
}

impl From<&SceneNode> for NodeSummary {
    fn from(node: &SceneNode) -> Self {
        Self {
            kind: node.kind(),
            screen: node.screen_type().name(),
            element: node.element(),
            host_element: node.host_element(),
            style: node.style(),
        }
    }
}

// ============================================================================
// Coordinator
// ============================================================================

struct InFlight {
    label: String,
    started: Instant,
    done: oneshot::Sender<()>,
}

pub struct Coordinator {
    host: Arc<dyn Host>,
    config: CoordinatorConfig,
    model: Option<SceneStack>,
    queue: TransitionQueue<Transition>,
    in_flight: Option<InFlight>,
    /// Descriptor driving the host's current animation, if custom.
    active_transition: Option<Arc<TransitionDescriptor>>,
    commands: mpsc::UnboundedReceiver<Command>,
    events_tx: mpsc::UnboundedSender<Event>,
    events: mpsc::UnboundedReceiver<Event>,
}

impl Coordinator {
    pub(crate) fn new(
        host: Arc<dyn Host>,
        config: CoordinatorConfig,
        commands: mpsc::UnboundedReceiver<Command>,
    ) -> Self {
        let (events_tx, events) = mpsc::unbounded_channel();
        Self {
            host,
            config,
            model: None,
            queue: TransitionQueue::new(),
            in_flight: None,
            active_transition: None,
            commands,
            events_tx,
            events,
        }
    }

    /// Runs until every `Navigator` is dropped and the queue has drained.
    pub async fn run(mut self) {
        info!("Coordinator started (animated={})", self.config.animated);
        let mut closed = false;

        loop {
            tokio::select! {
                biased;
                Some(event) = self.events.recv() => self.handle_event(event),
                command = self.commands.recv(), if !closed => match command {
                    Some(command) => self.handle_command(command),
                    None => {
                        debug!("All navigators dropped");
                        closed = true;
                    }
                },
            }
            self.pump();

            if closed && self.in_flight.is_none() && self.queue.is_empty() {
                break;
            }
        }
        info!("Coordinator stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Transition(transition) => {
                debug!(
                    "Enqueued {} ({} already waiting)",
                    transition.op.label(),
                    self.queue.len()
                );
                self.queue.enqueue(transition);
            }
            Command::Tab { index, done } => {
                self.tab(index);
                let _ = done.send(());
            }
            Command::DidPopElement { element, done } => {
                let popped = self.did_pop_element(element);
                let _ = done.send(popped);
            }
            Command::DidPopItem { item, done } => {
                let popped = self.did_pop_item(item);
                let _ = done.send(popped);
            }
            Command::Snapshot { done } => {
                let _ = done.send(self.snapshot());
            }
        }
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Ready { commit, then } => self.commit(commit, then),
            Event::VisualDone { then: Then::Finish } => self.finish(),
            Event::VisualDone {
                then: Then::SetFinal { target, tab },
            } => {
                self.active_transition = None;
                debug!("set: phase one done, installing final root in tab {}", tab);
                self.replace(target, Style::SetImmediate, tab);
            }
        }
    }

    /// Starts queued transitions while the queue is not suspended.
    fn pump(&mut self) {
        while let Some(Transition { op, done }) = self.queue.take_next() {
            self.queue.suspend();
            let label = op.label();
            info!("Transition {} started ({} queued)", label, self.queue.len());
            self.in_flight = Some(InFlight {
                label,
                started: Instant::now(),
                done,
            });
            self.begin(op);
        }
    }

    fn begin(&mut self, op: Op) {
        match op {
            Op::Initialize(spec) => self.initialize(spec),
            Op::InitializeTabs(tabs) => self.initialize_tabs(tabs),
            Op::Next { spec, style } => {
                let screen = spec.build(&*self.host);
                self.forward(SceneKind::Next, screen, spec.screen_type(), style, Then::Finish);
            }
            Op::Up { spec, style } => {
                let screen = spec.build(&*self.host);
                self.forward(SceneKind::Up, screen, spec.screen_type(), style, Then::Finish);
            }
            Op::Set { spec, style } => self.set(Target::Screen(spec), style),
            Op::SetTabs { tabs, style } => self.set(Target::Tabs(tabs), style),
            Op::Back => self.back(),
            Op::BackTo(target) => self.back_to(target),
        }
    }

    /// Completes the in-flight transition and reopens the queue.
    fn finish(&mut self) {
        self.active_transition = None;
        if let Some(in_flight) = self.in_flight.take() {
            info!(
                "Transition {} finished in {:?}",
                in_flight.label,
                in_flight.started.elapsed()
            );
            // The caller may have stopped waiting; that's fine.
            let _ = in_flight.done.send(());
        }
        self.queue.resume();
    }

    // ========================================================================
    // Initialization
    // ========================================================================

    fn initialize(&mut self, spec: ScreenSpec) {
        assert!(self.model.is_none(), "navigation coordinator initialized twice");

        let screen = spec.build(&*self.host);
        let host_element = self.wrap(screen.element());
        self.model = Some(SceneStack::single(SceneNode::root(
            screen,
            spec.screen_type(),
            host_element,
        )));

        let done = self.completion(Then::Finish);
        self.host.set_root(host_element, None, false, done);
    }

    fn initialize_tabs(&mut self, tabs: TabsSpec) {
        assert!(self.model.is_none(), "navigation coordinator initialized twice");

        let (roots, tab_host) = self.build_tabs(&tabs);
        self.model = Some(SceneStack::tabs(roots, tabs.initial, tab_host));

        let immediate = style::resolve(Style::SetImmediate);
        let done = self.completion(Then::Finish);
        self.host.set_root(tab_host, immediate.as_ref(), false, done);
    }

    // ========================================================================
    // Forward transitions
    // ========================================================================

    /// Appends a `Next` or `Up` node for `screen` and commits it once ready.
    fn forward(
        &mut self,
        kind: SceneKind,
        screen: Arc<dyn Screen>,
        screen_type: ScreenType,
        style: Style,
        then: Then,
    ) {
        let current = self.model().current().clone();

        let (host_element, visual) = match kind {
            SceneKind::Next => {
                let container = self.host.push_context(current.element()).unwrap_or_else(|| {
                    panic!(
                        "next: current screen {} has no push context to push into",
                        current.screen_type()
                    )
                });
                let element = screen.element();
                (element, Visual::Push { container, element })
            }
            SceneKind::Up => {
                let element = self.wrap(screen.element());
                let mode = style::presentation_mode(style::resolve(style).as_ref());
                let presenter = current.element();
                (element, Visual::Present { presenter, element, mode })
            }
            SceneKind::Root => unreachable!("forward transitions never create Root nodes"),
        };

        let tab_bar = self.tab_bar_change(&current, &*screen, style);

        let node = SceneNode::forward(kind, screen.clone(), screen_type, host_element, style);
        let transition = node.descriptor();
        self.model_mut().push(node);
        self.active_transition = transition.clone();

        let commit = Commit {
            visual,
            transition,
            animated: self.config.animated,
            tab_bar,
        };
        self.gate(vec![screen], commit, then);
    }

    // ========================================================================
    // Set (root replacement)
    // ========================================================================

    fn set(&mut self, target: Target, style: Style) {
        let tab = self.model().active_index();
        let kind = if style.is_next_flavor() {
            SceneKind::Next
        } else if style.is_up_flavor() {
            SceneKind::Up
        } else {
            self.dismiss_overlay();
            self.replace(target, style, tab);
            return;
        };

        // Phase one: a throwaway instance, shown with a forward transition.
        let (screen, screen_type): (Arc<dyn Screen>, ScreenType) = match &target {
            Target::Screen(spec) => (spec.build(&*self.host), spec.screen_type()),
            Target::Tabs(tabs) => {
                let (roots, tab_host) = self.build_tabs(tabs);
                let screen = TabsScreen {
                    element: tab_host,
                    tabs: roots.iter().map(|root| root.screen().clone()).collect(),
                };
                (Arc::new(screen), ScreenType::of::<TabsScreen>())
            }
        };
        debug!("set: phase one via {:?} transition", kind);
        self.forward(kind, screen, screen_type, style, Then::SetFinal { target, tab });
    }

    /// Discards the stack of `tab` (or every stack, for tabs) and installs a
    /// fresh root once it is ready.
    fn replace(&mut self, target: Target, style: Style, tab: usize) {
        let transition = style::resolve(style).map(Arc::new);
        let animated = self.config.animated && style != Style::SetImmediate;

        let (screens, visual) = match target {
            Target::Screen(spec) => {
                let screen = spec.build(&*self.host);
                let element = self.wrap(screen.element());
                let root = SceneNode::root(screen.clone(), spec.screen_type(), element);

                let model = self.model_mut();
                let visual = match model.tab_host() {
                    Some(tab_host) => Visual::ReplaceTab {
                        tab_host,
                        index: tab,
                        element,
                    },
                    None => Visual::SetRoot { root: element },
                };
                model.replace_in(tab, root);
                (vec![screen], visual)
            }
            Target::Tabs(tabs) => {
                let (roots, tab_host) = self.build_tabs(&tabs);
                let screens = roots.iter().map(|root| root.screen().clone()).collect();
                let previous = self
                    .model
                    .replace(SceneStack::tabs(roots, tabs.initial, tab_host));
                debug!(
                    "set: replaced {} tab stack(s) with {}",
                    previous.map_or(0, |model| model.tab_count()),
                    tabs.tabs.len()
                );
                (screens, Visual::SetRoot { root: tab_host })
            }
        };

        self.active_transition = transition.clone();
        let commit = Commit {
            visual,
            transition,
            animated,
            tab_bar: None,
        };
        self.gate(screens, commit, Then::Finish);
    }

    // ========================================================================
    // Backward transitions
    // ========================================================================

    fn back(&mut self) {
        let model = self.model();
        assert!(
            model.depth() > 1,
            "back: the active stack only holds its root {}",
            model.current().screen_type()
        );
        let current = model.current().clone();
        let below = model.below_current().cloned().expect("depth checked above");

        let tab_bar = self.tab_bar_change(&current, &**below.screen(), current.style().unwrap_or_default());

        let visual = match current.kind() {
            SceneKind::Next => {
                let container = self.host.push_context(current.element()).unwrap_or_else(|| {
                    panic!("back: {} has no push context", current.screen_type())
                });
                Visual::PopTo {
                    container,
                    element: below.element(),
                }
            }
            SceneKind::Up => {
                let presenter = self
                    .host
                    .presenting_ancestor(current.host_element())
                    .unwrap_or_else(|| {
                        panic!("back: {} has no presenting ancestor", current.screen_type())
                    });
                Visual::Dismiss { presenter }
            }
            SceneKind::Root => panic!("back: cannot go back from the Root scene"),
        };

        let transition = current.descriptor();
        if transition.is_some() {
            self.active_transition = transition.clone();
        }
        self.model_mut().pop();

        let commit = Commit {
            visual,
            transition,
            animated: self.config.animated,
            tab_bar,
        };
        self.commit(commit, Then::Finish);
    }

    fn back_to(&mut self, target: ScreenType) {
        let host = self.host.clone();
        let model = self.model();
        let plan = plan_back_to(model.active(), target, |node| {
            host.presenting_ancestor(node.host_element())
        });

        let (index, visual) = match plan {
            Some(BackToPlan::AlreadyThere) => {
                debug!("back_to: {} is already current", target);
                self.finish();
                return;
            }
            Some(BackToPlan::PopTo { index }) => {
                let current = model.current();
                let container = host.push_context(current.element()).unwrap_or_else(|| {
                    panic!("back_to: {} has no push context", current.screen_type())
                });
                let element = model.active()[index].element();
                (index, Visual::PopTo { container, element })
            }
            Some(BackToPlan::DismissTo { index, presenter }) => {
                (index, Visual::Dismiss { presenter })
            }
            Some(BackToPlan::DismissThenPopTo { index, presenter }) => {
                let element = model.active()[index].element();
                let container = host.push_context(element).unwrap_or_else(|| {
                    panic!("back_to: {} has no push context", target)
                });
                (
                    index,
                    Visual::DismissThenPopTo {
                        presenter,
                        container,
                        element,
                    },
                )
            }
            None if model.active().iter().any(|node| node.screen_type() == target) => panic!(
                "back_to: {} is in the active stack of tab {} but has no presenting ancestor to dismiss to",
                target,
                model.active_index()
            ),
            None => panic!(
                "back_to: no {} in the active stack of tab {}",
                target,
                model.active_index()
            ),
        };

        let current = model.current().clone();
        let destination = model.active()[index].clone();
        let tab_bar =
            self.tab_bar_change(&current, &**destination.screen(), current.style().unwrap_or_default());

        let transition = current.descriptor();
        if transition.is_some() {
            self.active_transition = transition.clone();
        }
        self.model_mut().truncate_to(index);

        let commit = Commit {
            visual,
            transition,
            animated: self.config.animated,
            tab_bar,
        };
        self.commit(commit, Then::Finish);
    }

    // ========================================================================
    // Tabs
    // ========================================================================

    fn tab(&mut self, index: usize) {
        let model = self.model();
        if index == model.active_index() {
            debug!("tab: {} already active", index);
            return;
        }
        let tab_host = model
            .tab_host()
            .unwrap_or_else(|| panic!("tab: switching to tab {index} without tabs in use"));
        let transition = model
            .current_in(index)
            .unwrap_or_else(|| panic!("tab: {index} out of range for {} tabs", model.tab_count()))
            .descriptor();

        if transition.is_some() {
            self.active_transition = transition.clone();
        }
        self.model_mut().set_active(index);
        info!("tab: switched to {}", index);
        self.host.select_tab(tab_host, index, transition.as_deref());
    }

    // ========================================================================
    // Reconciliation
    // ========================================================================

    /// The host already removed `element`; drop its node if it is current.
    fn did_pop_element(&mut self, element: ElementId) -> bool {
        let children = self.host.children(element);
        self.reconcile(|current| current.hosts(element, &children), "element")
    }

    /// The host's native back control popped `item`.
    fn did_pop_item(&mut self, item: NavItemId) -> bool {
        let host = self.host.clone();
        self.reconcile(|current| host.navigation_item(current.element()) == item, "item")
    }

    fn reconcile(&mut self, is_current: impl Fn(&SceneNode) -> bool, what: &str) -> bool {
        let Some(model) = self.model.as_mut() else {
            warn!("reconcile: popped {} reported before initialize", what);
            return false;
        };
        if model.depth() < 2 || !is_current(model.current()) {
            debug!("reconcile: popped {} is not the current scene, ignoring", what);
            return false;
        }
        let node = model.pop();
        info!("reconcile: {} was popped by the host", node.screen_type());
        true
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn snapshot(&self) -> Snapshot {
        let Some(model) = self.model.as_ref() else {
            return Snapshot {
                queued: self.queue.len(),
                in_flight: self.in_flight.as_ref().map(|f| f.label.clone()),
                ..Default::default()
            };
        };
        Snapshot {
            active_tab: model.active_index(),
            tabs: model
                .stacks()
                .map(|stack| stack.iter().map(NodeSummary::from).collect())
                .collect(),
            in_flight: self.in_flight.as_ref().map(|f| f.label.clone()),
            queued: self.queue.len(),
            active_transition: self.active_transition.as_ref().map(|t| t.style),
        }
    }

    fn model(&self) -> &SceneStack {
        self.model
            .as_ref()
            .expect("navigation used before initialize")
    }

    fn model_mut(&mut self) -> &mut SceneStack {
        self.model
            .as_mut()
            .expect("navigation used before initialize")
    }

    /// Gives Root and Up elements a push context of their own.
    fn wrap(&self, element: ElementId) -> ElementId {
        if self.host.element_kind(element).is_container() {
            return element;
        }
        let wrapper = self.host.wrap_in_push_container(element);
        debug!("Wrapped {} in push container {}", element, wrapper);
        wrapper
    }

    /// Builds one wrapped Root per tab plus the tab host showing them.
    fn build_tabs(&self, tabs: &TabsSpec) -> (Vec<SceneNode>, ElementId) {
        assert!(!tabs.tabs.is_empty(), "tabs need at least one screen");
        assert!(
            tabs.initial < tabs.tabs.len(),
            "initial tab {} out of range for {} tabs",
            tabs.initial,
            tabs.tabs.len()
        );

        let roots: Vec<SceneNode> = tabs
            .tabs
            .iter()
            .map(|spec| {
                let screen = spec.build(&*self.host);
                let element = self.wrap(screen.element());
                SceneNode::root(screen, spec.screen_type(), element)
            })
            .collect();
        let elements: Vec<ElementId> = roots.iter().map(SceneNode::host_element).collect();
        let tab_host = self.host.make_tab_host(&elements, tabs.initial);
        (roots, tab_host)
    }

    /// The tab-bar visibility to apply when `from` and `to` disagree about it.
    fn tab_bar_change(
        &self,
        from: &SceneNode,
        to: &dyn Screen,
        style: Style,
    ) -> Option<(ElementId, bool)> {
        if style.is_sheet_flavor() {
            return None;
        }
        let tab_host = self.model().tab_host()?;
        let visible = to.displays_tab_bar();
        (from.screen().displays_tab_bar() != visible).then_some((tab_host, visible))
    }

    /// Drops whatever is overlaid on the root, without animation.
    fn dismiss_overlay(&self) {
        if let Some(overlay) = self.host.presented_over_root() {
            debug!("Dismissing overlay {} before replacing the root", overlay);
            self.host.dismiss_presented(false, Box::new(|| {}));
        }
    }

    /// Waits for `screens` off-task, then posts the commit back.
    fn gate(&self, screens: Vec<Arc<dyn Screen>>, commit: Commit, then: Then) {
        let events = self.events_tx.clone();
        let label = self
            .in_flight
            .as_ref()
            .map(|f| f.label.clone())
            .unwrap_or_default();
        readiness::spawn_gate(screens, self.config.readiness_warn_after, label, move || {
            let _ = events.send(Event::Ready { commit, then });
        });
    }

    /// Issues the visual command; its completion posts `then` back.
    fn commit(&self, commit: Commit, then: Then) {
        let Commit {
            visual,
            transition,
            animated,
            tab_bar,
        } = commit;
        debug!("Commit {:?} (animated={})", visual, animated);
        if let Some((tab_host, visible)) = tab_bar {
            debug!("Tab bar visible: {}", visible);
            self.host.set_tab_bar_visible(tab_host, visible, animated);
        }
        let transition = transition.as_deref();
        let done = self.completion(then);

        match visual {
            Visual::SetRoot { root } => self.host.set_root(root, transition, animated, done),
            Visual::ReplaceTab {
                tab_host,
                index,
                element,
            } => {
                self.dismiss_overlay();
                self.host
                    .replace_tab(tab_host, index, element, transition, animated, done)
            }
            Visual::Push { container, element } => {
                self.host.push(container, element, transition, animated, done)
            }
            Visual::Present {
                presenter,
                element,
                mode,
            } => self
                .host
                .present(presenter, element, mode, transition, animated, done),
            Visual::PopTo { container, element } => {
                self.host.pop_to(container, element, transition, animated, done)
            }
            Visual::Dismiss { presenter } => {
                self.host.dismiss(presenter, transition, animated, done)
            }
            Visual::DismissThenPopTo {
                presenter,
                container,
                element,
            } => {
                self.host.dismiss(presenter, None, false, Box::new(|| {}));
                self.host.pop_to(container, element, transition, animated, done)
            }
        }
    }

    fn completion(&self, then: Then) -> Completion {
        let events = self.events_tx.clone();
        Box::new(move || {
            let _ = events.send(Event::VisualDone { then });
        })
    }
}
