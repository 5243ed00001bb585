//! # Screens
//!
//! A screen is a unit of UI content the coordinator stacks and transitions
//! between. The coordinator only needs three things from it: its host
//! element, whether it wants the tab bar, and when it is ready to be shown.
//!
//! Screens are built lazily, inside the coordinator task, from a
//! [`ScreenSpec`]. A spec can be built more than once (the two-phase `set`
//! does exactly that), so parameters must be `Clone`.

use async_trait::async_trait;
use futures::future::join_all;
use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use super::{ElementId, Host};

#[async_trait]
pub trait Screen: Send + Sync + 'static {
    /// The element that shows this screen's content.
    fn element(&self) -> ElementId;

    /// Whether the tab bar should be visible while this screen is current.
    fn displays_tab_bar(&self) -> bool {
        true
    }

    /// Resolves once the screen has finished its asynchronous setup.
    ///
    /// Screens without setup keep the default, which is ready immediately.
    /// A screen that never resolves blocks the transition queue for good.
    async fn initialized(&self) {}
}

/// A screen the coordinator can construct from optional typed parameters.
pub trait Scene: Screen + Sized {
    type Params: Clone + Send + Sync + 'static;

    fn build(host: &dyn Host, params: Option<Self::Params>) -> Self;
}

/// Runtime identity of a screen type, used by `back_to`.
#[derive(Clone, Copy)]
pub struct ScreenType {
    id: TypeId,
    name: &'static str,
}

impl ScreenType {
    pub fn of<S: 'static>() -> Self {
        let full = std::any::type_name::<S>();
        let name = full.rsplit("::").next().unwrap_or(full);
        Self {
            id: TypeId::of::<S>(),
            name,
        }
    }

    /// Short type name, without the module path.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for ScreenType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ScreenType {}

impl fmt::Debug for ScreenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for ScreenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

type BuildFn = dyn Fn(&dyn Host) -> Arc<dyn Screen> + Send + Sync;

/// A deferred screen constructor: a type plus its parameters.
#[derive(Clone)]
pub struct ScreenSpec {
    screen_type: ScreenType,
    build: Arc<BuildFn>,
}

impl ScreenSpec {
    pub fn of<S: Scene>(params: Option<S::Params>) -> Self {
        Self {
            screen_type: ScreenType::of::<S>(),
            build: Arc::new(move |host| Arc::new(S::build(host, params.clone())) as Arc<dyn Screen>),
        }
    }

    /// Shorthand for a screen built without parameters.
    pub fn plain<S: Scene>() -> Self {
        Self::of::<S>(None)
    }

    pub fn screen_type(&self) -> ScreenType {
        self.screen_type
    }

    pub fn build(&self, host: &dyn Host) -> Arc<dyn Screen> {
        (self.build)(host)
    }
}

impl fmt::Debug for ScreenSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreenSpec")
            .field("screen_type", &self.screen_type)
            .finish()
    }
}

/// One screen per tab plus the tab selected at start.
#[derive(Debug, Clone, Default)]
pub struct TabsSpec {
    pub tabs: Vec<ScreenSpec>,
    pub initial: usize,
}

impl TabsSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tab<S: Scene>(mut self, params: Option<S::Params>) -> Self {
        self.tabs.push(ScreenSpec::of::<S>(params));
        self
    }

    pub fn initial(mut self, index: usize) -> Self {
        self.initial = index;
        self
    }
}

/// A tab host shown as a single screen. Only used as the throwaway target
/// of a two-phase tabs `set`; ready when every tab is ready.
pub(crate) struct TabsScreen {
    pub element: ElementId,
    pub tabs: Vec<Arc<dyn Screen>>,
}

#[async_trait]
impl Screen for TabsScreen {
    fn element(&self) -> ElementId {
        self.element
    }

    async fn initialized(&self) {
        join_all(self.tabs.iter().map(|tab| tab.initialized())).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Detail, Home};

    #[test]
    fn test_screen_type_identity_and_short_name() {
        assert_eq!(ScreenType::of::<Home>(), ScreenType::of::<Home>());
        assert_ne!(ScreenType::of::<Home>(), ScreenType::of::<Detail>());
        assert_eq!(ScreenType::of::<Home>().name(), "Home");
    }

    #[test]
    fn test_tabs_spec_builder() {
        let tabs = TabsSpec::new()
            .tab::<Home>(None)
            .tab::<Detail>(Some("x".into()))
            .initial(1);
        assert_eq!(tabs.tabs.len(), 2);
        assert_eq!(tabs.initial, 1);
        assert_eq!(tabs.tabs[1].screen_type(), ScreenType::of::<Detail>());
    }
}
