//! # Demo
//!
//! A small storefront app and a runner for TOML navigation scripts, used by
//! the `waypoint run` command.
//!
//! ```toml
//! tabs = ["home", "catalog", "cart"]
//!
//! [[steps]]
//! op = "next"
//! screen = "product"
//! param = "Desk Lamp"
//! style = "next-default"
//!
//! [[steps]]
//! op = "back-to"
//! screen = "catalog"
//! ```
//!
//! A script either starts from a single `root` screen (default `home`) or
//! from a set of `tabs`. Every screen name is checked before the first step
//! runs, so a typo never leaves the app half-way through a script.

use async_trait::async_trait;
use log::info;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::core::style::Style;
use crate::host::{ElementId, Host, Scene, Screen, ScreenSpec, ScreenType, TabsSpec};
use crate::nav::{NavError, Navigator, ReadySignal};

/// How long the login screen takes to load its form.
const LOGIN_SETUP: Duration = Duration::from_millis(50);

pub const DEFAULT_SCRIPT: &str = r#"
tabs = ["home", "catalog", "cart"]

[[steps]]
op = "tab"
index = 1

[[steps]]
op = "next"
screen = "product"
param = "Desk Lamp"
style = "next-default"

[[steps]]
op = "next"
screen = "product"
param = "Light Bulb"
style = "next-default"

[[steps]]
op = "back-to"
screen = "catalog"

[[steps]]
op = "tab"
index = 2

[[steps]]
op = "next"
screen = "checkout"
style = "next-default"

[[steps]]
op = "up"
screen = "login"
style = "sheet"

[[steps]]
op = "back"

[[steps]]
op = "back"

[[steps]]
op = "set"
screen = "home"
style = "up-default"
"#;

// ============================================================================
// Screens
// ============================================================================

macro_rules! demo_screen {
    ($(#[$doc:meta])* $name:ident, $label:literal) => {
        $(#[$doc])*
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

demo_screen!(Home, "home");
demo_screen!(Catalog, "catalog");
demo_screen!(Cart, "cart");
demo_screen!(
    /// App preferences.
    Settings,
    "settings"
);

pub struct Product {
    element: ElementId,
}

impl Screen for Product {
    fn element(&self) -> ElementId {
        self.element
    }
}

impl Scene for Product {
    /// Product name.
    type Params = String;

    fn build(host: &dyn Host, params: Option<String>) -> Self {
        let name = params.unwrap_or_else(|| "unknown".to_string());
        Self {
            element: host.create_element(&format!("product:{name}")),
        }
    }
}

/// Full-screen flow, hides the tab bar.
pub struct Checkout {
    element: ElementId,
}

impl Screen for Checkout {
    fn element(&self) -> ElementId {
        self.element
    }

    fn displays_tab_bar(&self) -> bool {
        false
    }
}

impl Scene for Checkout {
    type Params = ();

    fn build(host: &dyn Host, _params: Option<()>) -> Self {
        Self {
            element: host.create_element("checkout"),
        }
    }
}

/// Loads its form in the background before it can be shown.
pub struct Login {
    element: ElementId,
    loaded: ReadySignal,
}

#[async_trait]
impl Screen for Login {
    fn element(&self) -> ElementId {
        self.element
    }

    async fn initialized(&self) {
        self.loaded.wait().await;
    }
}

impl Scene for Login {
    type Params = ();

    fn build(host: &dyn Host, _params: Option<()>) -> Self {
        let loaded = ReadySignal::new();
        let signal = loaded.clone();
        tokio::spawn(async move {
            tokio::time::sleep(LOGIN_SETUP).await;
            signal.mark_ready();
        });
        Self {
            element: host.create_element("login"),
            loaded,
        }
    }
}

/// Builds the spec for a demo screen by name.
pub fn screen_spec(name: &str, param: Option<String>) -> Result<ScreenSpec, ScriptError> {
    let spec = match name {
        "home" => ScreenSpec::plain::<Home>(),
        "catalog" => ScreenSpec::plain::<Catalog>(),
        "product" => ScreenSpec::of::<Product>(param),
        "cart" => ScreenSpec::plain::<Cart>(),
        "checkout" => ScreenSpec::plain::<Checkout>(),
        "login" => ScreenSpec::plain::<Login>(),
        "settings" => ScreenSpec::plain::<Settings>(),
        _ => return Err(ScriptError::UnknownScreen(name.to_string())),
    };
    Ok(spec)
}

fn screen_type(name: &str) -> Result<ScreenType, ScriptError> {
    screen_spec(name, None).map(|spec| spec.screen_type())
}

// ============================================================================
// Scripts
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    pub root: Option<String>,
    #[serde(default)]
    pub tabs: Vec<String>,
    #[serde(default)]
    pub initial_tab: usize,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Step {
    Next {
        screen: String,
        param: Option<String>,
        #[serde(default)]
        style: Style,
    },
    Up {
        screen: String,
        param: Option<String>,
        #[serde(default)]
        style: Style,
    },
    Set {
        screen: String,
        param: Option<String>,
        #[serde(default)]
        style: Style,
    },
    Back,
    BackTo {
        screen: String,
    },
    Tab {
        index: usize,
    },
}

#[derive(Debug)]
pub enum ScriptError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    UnknownScreen(String),
    Navigation(NavError),
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::Io(e) => write!(f, "script I/O error: {e}"),
            ScriptError::Parse(e) => write!(f, "script parse error: {e}"),
            ScriptError::UnknownScreen(name) => write!(f, "unknown screen '{name}'"),
            ScriptError::Navigation(e) => write!(f, "navigation failed: {e}"),
        }
    }
}

impl std::error::Error for ScriptError {}

impl From<NavError> for ScriptError {
    fn from(e: NavError) -> Self {
        ScriptError::Navigation(e)
    }
}

pub fn parse_script(source: &str) -> Result<Script, ScriptError> {
    toml::from_str(source).map_err(ScriptError::Parse)
}

pub fn load_script(path: &Path) -> Result<Script, ScriptError> {
    let source = fs::read_to_string(path).map_err(ScriptError::Io)?;
    let script = parse_script(&source)?;
    info!("Loaded script {} ({} steps)", path.display(), script.steps.len());
    Ok(script)
}

/// A step with its screen names resolved.
enum Action {
    Next(ScreenSpec, Style),
    Up(ScreenSpec, Style),
    Set(ScreenSpec, Style),
    Back,
    BackTo(ScreenType),
    Tab(usize),
}

impl Step {
    fn resolve(&self) -> Result<Action, ScriptError> {
        Ok(match self {
            Step::Next {
                screen,
                param,
                style,
            } => Action::Next(screen_spec(screen, param.clone())?, *style),
            Step::Up {
                screen,
                param,
                style,
            } => Action::Up(screen_spec(screen, param.clone())?, *style),
            Step::Set {
                screen,
                param,
                style,
            } => Action::Set(screen_spec(screen, param.clone())?, *style),
            Step::Back => Action::Back,
            Step::BackTo { screen } => Action::BackTo(screen_type(screen)?),
            Step::Tab { index } => Action::Tab(*index),
        })
    }
}

impl Script {
    fn start(&self) -> Result<Start, ScriptError> {
        if self.tabs.is_empty() {
            let root = self.root.as_deref().unwrap_or("home");
            return Ok(Start::Root(screen_spec(root, None)?));
        }
        let mut tabs = TabsSpec::new().initial(self.initial_tab);
        for name in &self.tabs {
            tabs.tabs.push(screen_spec(name, None)?);
        }
        Ok(Start::Tabs(tabs))
    }
}

enum Start {
    Root(ScreenSpec),
    Tabs(TabsSpec),
}

/// Initializes `navigator` from `script` and runs every step to completion.
pub async fn run_script(navigator: &Navigator, script: &Script) -> Result<(), ScriptError> {
    let start = script.start()?;
    let actions = script
        .steps
        .iter()
        .map(Step::resolve)
        .collect::<Result<Vec<_>, _>>()?;

    match start {
        Start::Root(spec) => navigator.initialize_spec(spec).await?,
        Start::Tabs(tabs) => navigator.initialize_tabs(tabs).await?,
    }

    for (index, (step, action)) in script.steps.iter().zip(actions).enumerate() {
        info!("Script step {}: {:?}", index + 1, step);
        match action {
            Action::Next(spec, style) => navigator.next_spec(spec, style).await?,
            Action::Up(spec, style) => navigator.up_spec(spec, style).await?,
            Action::Set(spec, style) => navigator.set_spec(spec, style).await?,
            Action::Back => navigator.back().await?,
            Action::BackTo(target) => navigator.back_to_type(target).await?,
            Action::Tab(index) => navigator.tab(index).await?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::CoordinatorConfig;
    use crate::host::{HeadlessHost, HostCommand};
    use std::sync::Arc;

    fn spawn() -> (Navigator, HeadlessHost) {
        let host = HeadlessHost::instant();
        let (navigator, _handle) =
            Navigator::spawn(Arc::new(host.clone()), CoordinatorConfig::default());
        (navigator, host)
    }

    #[test]
    fn test_parse_default_script() {
        let script = parse_script(DEFAULT_SCRIPT).unwrap();
        assert_eq!(script.tabs, vec!["home", "catalog", "cart"]);
        assert_eq!(script.steps.len(), 10);
        assert_eq!(script.steps[0], Step::Tab { index: 1 });
        assert_eq!(
            script.steps[1],
            Step::Next {
                screen: "product".into(),
                param: Some("Desk Lamp".into()),
                style: Style::NextDefault,
            }
        );
        assert_eq!(script.steps[7], Step::Back);
    }

    #[test]
    fn test_style_defaults_to_system() {
        let script = parse_script(
            r#"
[[steps]]
op = "up"
screen = "settings"
"#,
        )
        .unwrap();
        assert!(script.root.is_none());
        assert_eq!(
            script.steps[0],
            Step::Up {
                screen: "settings".into(),
                param: None,
                style: Style::System,
            }
        );
    }

    #[test]
    fn test_unknown_op_is_parse_error() {
        let err = parse_script("[[steps]]\nop = \"sideways\"\n").unwrap_err();
        assert!(matches!(err, ScriptError::Parse(_)));
    }

    #[test]
    fn test_screen_names() {
        let spec = screen_spec("product", Some("Lamp".into())).unwrap();
        assert_eq!(spec.screen_type(), ScreenType::of::<Product>());
        assert!(matches!(
            screen_spec("basket", None),
            Err(ScriptError::UnknownScreen(name)) if name == "basket"
        ));
    }

    #[tokio::test]
    async fn test_unknown_screen_fails_before_navigating() {
        let (navigator, host) = spawn();
        let script = parse_script(
            r#"
[[steps]]
op = "next"
screen = "product"

[[steps]]
op = "back-to"
screen = "nowhere"
"#,
        )
        .unwrap();

        let err = run_script(&navigator, &script).await.unwrap_err();
        assert!(matches!(err, ScriptError::UnknownScreen(_)));
        assert!(host.commands().is_empty());
    }

    #[tokio::test]
    async fn test_run_default_script() {
        let (navigator, host) = spawn();
        let script = parse_script(DEFAULT_SCRIPT).unwrap();

        run_script(&navigator, &script).await.unwrap();

        let snapshot = navigator.snapshot().await.unwrap();
        assert_eq!(snapshot.active_tab, 2);
        assert_eq!(snapshot.screens(), vec!["Home"]);
        assert_eq!(snapshot.tabs[1].len(), 1);
        assert_eq!(snapshot.tabs[1][0].screen, "Catalog");
        assert!(host.tab_bar_visible());
        assert!(host.commands().iter().any(|command| matches!(
            command,
            HostCommand::ReplaceTab { index: 2, .. }
        )));
        assert_eq!(host.visible_path(), vec!["tabs", "push(home)", "home"]);
    }

    #[tokio::test]
    async fn test_run_from_single_root() {
        let (navigator, host) = spawn();
        let script = parse_script(
            r#"
root = "catalog"

[[steps]]
op = "up"
screen = "login"
style = "up-default"
"#,
        )
        .unwrap();

        run_script(&navigator, &script).await.unwrap();

        assert_eq!(
            navigator.snapshot().await.unwrap().screens(),
            vec!["Catalog", "Login"]
        );
        assert!(matches!(host.commands()[1], HostCommand::Present { .. }));
    }
}
