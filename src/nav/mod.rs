//! # Navigation
//!
//! The public face of the coordinator. A [`Navigator`] is a cheap, cloneable
//! handle; every call is forwarded to the coordinator task in call order and
//! returns a [`Pending`] that resolves when the operation has completed
//! (for transitions: when the visual change is finished).
//!
//! ```text
//!   Navigator ──Command──▶ Coordinator task ──▶ Host
//!       ▲                        │
//!       └──── Pending resolves ◀─┘
//! ```
//!
//! Dropping a `Pending` does not cancel anything. Once enqueued, a
//! transition always runs to completion.
//!
//! ## Modules
//!
//! - [`coordinator`]: the task that owns the scene stack model
//! - [`queue`]: the suspendable FIFO serializing transitions
//! - [`readiness`]: waiting for screens to finish their setup
//! - [`traversal`]: planning `back_to`

pub mod coordinator;
pub mod queue;
pub mod readiness;
pub mod traversal;

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::core::config::CoordinatorConfig;
use crate::core::style::Style;
use crate::host::{ElementId, Host, NavItemId, Scene, ScreenSpec, ScreenType, TabsSpec};
use coordinator::{Command, Coordinator, Op, Transition};

pub use coordinator::{NodeSummary, Snapshot};
pub use readiness::ReadySignal;

/// Errors surfaced to navigation callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavError {
    /// The coordinator task is gone: it stopped on a broken navigation
    /// contract, or its runtime shut down. Not retryable.
    Closed,
}

impl fmt::Display for NavError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavError::Closed => write!(f, "navigation coordinator is no longer running"),
        }
    }
}

impl std::error::Error for NavError {}

/// Resolves once the coordinator has completed the request.
#[must_use = "a Pending does nothing unless awaited, but the request is already enqueued"]
pub struct Pending<T> {
    rx: oneshot::Receiver<T>,
}

impl<T> Future for Pending<T> {
    type Output = Result<T, NavError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map_err(|_| NavError::Closed)
    }
}

#[derive(Clone)]
pub struct Navigator {
    commands: mpsc::UnboundedSender<Command>,
}

impl Navigator {
    /// Creates a coordinator for `host` without starting it.
    pub fn new(host: Arc<dyn Host>, config: CoordinatorConfig) -> (Self, Coordinator) {
        let (commands, rx) = mpsc::unbounded_channel();
        (Self { commands }, Coordinator::new(host, config, rx))
    }

    /// Creates a coordinator and runs it on the current tokio runtime.
    pub fn spawn(host: Arc<dyn Host>, config: CoordinatorConfig) -> (Self, JoinHandle<()>) {
        let (navigator, coordinator) = Self::new(host, config);
        (navigator, tokio::spawn(coordinator.run()))
    }

    // ── Initialization ──────────────────────────────────────────────────────

    /// Installs `S` as the single root. Must be the first call, and only once.
    pub fn initialize<S: Scene>(&self, params: Option<S::Params>) -> Pending<()> {
        self.initialize_spec(ScreenSpec::of::<S>(params))
    }

    pub fn initialize_spec(&self, spec: ScreenSpec) -> Pending<()> {
        self.transition(Op::Initialize(spec))
    }

    /// Installs a tab host with one stack per tab.
    pub fn initialize_tabs(&self, tabs: TabsSpec) -> Pending<()> {
        self.transition(Op::InitializeTabs(tabs))
    }

    // ── Forward ─────────────────────────────────────────────────────────────

    /// Pushes `S` into the current screen's push context.
    pub fn next<S: Scene>(&self, params: Option<S::Params>, style: Style) -> Pending<()> {
        self.next_spec(ScreenSpec::of::<S>(params), style)
    }

    pub fn next_spec(&self, spec: ScreenSpec, style: Style) -> Pending<()> {
        self.transition(Op::Next { spec, style })
    }

    /// Presents `S` over the current screen.
    pub fn up<S: Scene>(&self, params: Option<S::Params>, style: Style) -> Pending<()> {
        self.up_spec(ScreenSpec::of::<S>(params), style)
    }

    pub fn up_spec(&self, spec: ScreenSpec, style: Style) -> Pending<()> {
        self.transition(Op::Up { spec, style })
    }

    /// Replaces the active stack with `S` as its new root.
    ///
    /// Next- and up-flavored styles first show a throwaway `S` with that
    /// transition, then swap in the final root without animation.
    pub fn set<S: Scene>(&self, params: Option<S::Params>, style: Style) -> Pending<()> {
        self.set_spec(ScreenSpec::of::<S>(params), style)
    }

    pub fn set_spec(&self, spec: ScreenSpec, style: Style) -> Pending<()> {
        self.transition(Op::Set { spec, style })
    }

    /// Replaces every stack with a fresh tab host.
    pub fn set_tabs(&self, tabs: TabsSpec, style: Style) -> Pending<()> {
        self.transition(Op::SetTabs { tabs, style })
    }

    // ── Backward ────────────────────────────────────────────────────────────

    /// Leaves the current screen. Calling this on a root is a contract violation.
    pub fn back(&self) -> Pending<()> {
        self.transition(Op::Back)
    }

    /// Collapses the active stack onto the nearest `S` in one step.
    pub fn back_to<S: 'static>(&self) -> Pending<()> {
        self.back_to_type(ScreenType::of::<S>())
    }

    pub fn back_to_type(&self, target: ScreenType) -> Pending<()> {
        self.transition(Op::BackTo(target))
    }

    // ── Immediate (not queued) ──────────────────────────────────────────────

    pub fn tab(&self, index: usize) -> Pending<()> {
        self.request(|done| Command::Tab { index, done })
    }

    /// Tells the coordinator the host already removed `element`.
    /// Resolves to whether a scene was dropped from the model.
    pub fn did_pop_element(&self, element: ElementId) -> Pending<bool> {
        self.request(|done| Command::DidPopElement { element, done })
    }

    /// Tells the coordinator the host's back control popped `item`.
    pub fn did_pop_item(&self, item: NavItemId) -> Pending<bool> {
        self.request(|done| Command::DidPopItem { item, done })
    }

    pub fn snapshot(&self) -> Pending<Snapshot> {
        self.request(|done| Command::Snapshot { done })
    }

    fn transition(&self, op: Op) -> Pending<()> {
        self.request(|done| Command::Transition(Transition { op, done }))
    }

    fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Pending<T> {
        let (tx, rx) = oneshot::channel();
        // A closed channel drops the sender, which resolves `rx` to Closed.
        let _ = self.commands.send(command(tx));
        Pending { rx }
    }
}
