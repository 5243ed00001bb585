//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::core::config::CoordinatorConfig;
use crate::host::{ElementId, HeadlessHost, Host, Scene, Screen};
use crate::nav::{Navigator, ReadySignal};

macro_rules! plain_screen {
    ($name:ident, $label:literal) => {
        pub struct $name {
            element: ElementId,
        }

        impl Screen for $name {
            fn element(&self) -> ElementId {
                self.element
            }
        }

        impl Scene for $name {
            type Params = ();

            fn build(host: &dyn Host, _params: Option<()>) -> Self {
                Self {
                    element: host.create_element($label),
                }
            }
        }
    };
}

plain_screen!(Home, "home");
plain_screen!(Settings, "settings");
plain_screen!(Profile, "profile");

/// A screen with a title parameter.
pub struct Detail {
    element: ElementId,
}

impl Screen for Detail {
    fn element(&self) -> ElementId {
        self.element
    }
}

impl Scene for Detail {
    type Params = String;

    fn build(host: &dyn Host, params: Option<String>) -> Self {
        let title = params.unwrap_or_else(|| "untitled".to_string());
        Self {
            element: host.create_element(&format!("detail:{title}")),
        }
    }
}

/// Hides the tab bar while current.
pub struct Fullscreen {
    element: ElementId,
}

impl Screen for Fullscreen {
    fn element(&self) -> ElementId {
        self.element
    }

    fn displays_tab_bar(&self) -> bool {
        false
    }
}

impl Scene for Fullscreen {
    type Params = ();

    fn build(host: &dyn Host, _params: Option<()>) -> Self {
        Self {
            element: host.create_element("fullscreen"),
        }
    }
}

/// Ready once the signal passed as its parameter fires.
pub struct Gated {
    element: ElementId,
    signal: ReadySignal,
}

#[async_trait]
impl Screen for Gated {
    fn element(&self) -> ElementId {
        self.element
    }

    async fn initialized(&self) {
        self.signal.wait().await;
    }
}

impl Scene for Gated {
    type Params = ReadySignal;

    fn build(host: &dyn Host, params: Option<ReadySignal>) -> Self {
        Self {
            element: host.create_element("gated"),
            signal: params.unwrap_or_else(ReadySignal::ready),
        }
    }
}

/// Hides the tab bar, and is ready once its signal fires.
pub struct GatedFullscreen {
    element: ElementId,
    signal: ReadySignal,
}

#[async_trait]
impl Screen for GatedFullscreen {
    fn element(&self) -> ElementId {
        self.element
    }

    fn displays_tab_bar(&self) -> bool {
        false
    }

    async fn initialized(&self) {
        self.signal.wait().await;
    }
}

impl Scene for GatedFullscreen {
    type Params = ReadySignal;

    fn build(host: &dyn Host, params: Option<ReadySignal>) -> Self {
        Self {
            element: host.create_element("gated-fullscreen"),
            signal: params.unwrap_or_else(ReadySignal::ready),
        }
    }
}

/// A screen around an existing element, for model-only tests.
pub struct FixedScreen {
    element: ElementId,
}

impl FixedScreen {
    pub fn new(element: ElementId) -> Self {
        Self { element }
    }
}

impl Screen for FixedScreen {
    fn element(&self) -> ElementId {
        self.element
    }
}

/// Like `FixedScreen`, but not ready until `signal` fires.
pub struct SlowScreen {
    element: ElementId,
    pub signal: ReadySignal,
}

impl SlowScreen {
    pub fn new(element: ElementId) -> Self {
        Self {
            element,
            signal: ReadySignal::new(),
        }
    }
}

#[async_trait]
impl Screen for SlowScreen {
    fn element(&self) -> ElementId {
        self.element
    }

    async fn initialized(&self) {
        self.signal.wait().await;
    }
}

/// Spawns a coordinator over a fresh headless host.
pub fn spawn_navigator(animation: Duration) -> (Navigator, HeadlessHost, JoinHandle<()>) {
    let host = HeadlessHost::new(animation);
    let (navigator, handle) =
        Navigator::spawn(Arc::new(host.clone()), CoordinatorConfig::default());
    (navigator, host, handle)
}
