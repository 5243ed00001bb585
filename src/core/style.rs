//! # Transition Styles
//!
//! A closed set of named styles, each mapping to a [`TransitionDescriptor`]
//! or to `None` ("let the host do its default thing").
//!
//! ```text
//! Style           flavor   descriptor
//! ─────────────   ──────   ─────────────────────────────────────
//! system          -        None (host default)
//! next-default    next     slide in / slide out
//! up-default      up       cover vertical, full screen
//! set-default     -        cross-fade
//! set-immediate   -        None (no animation, second-stage commits)
//! sheet           up       cover vertical + sheet presentation
//! ```
//!
//! Resolution is a pure function. No state, no failure modes.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Style {
    #[default]
    System,
    NextDefault,
    UpDefault,
    SetDefault,
    SetImmediate,
    Sheet,
}

impl Style {
    pub const ALL: [Style; 6] = [
        Style::System,
        Style::NextDefault,
        Style::UpDefault,
        Style::SetDefault,
        Style::SetImmediate,
        Style::Sheet,
    ];

    /// Push-like styles. A `set` with one of these runs as a two-phase commit.
    pub fn is_next_flavor(self) -> bool {
        matches!(self, Style::NextDefault)
    }

    /// Overlay-like styles. A `set` with one of these runs as a two-phase commit.
    pub fn is_up_flavor(self) -> bool {
        matches!(self, Style::UpDefault | Style::Sheet)
    }

    /// Sheets keep the tab bar as-is; no visibility toggling.
    pub fn is_sheet_flavor(self) -> bool {
        matches!(self, Style::Sheet)
    }

    pub fn label(self) -> &'static str {
        match self {
            Style::System => "system",
            Style::NextDefault => "next-default",
            Style::UpDefault => "up-default",
            Style::SetDefault => "set-default",
            Style::SetImmediate => "set-immediate",
            Style::Sheet => "sheet",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a single leg (presentation or dismissal) of a transition animates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Animation {
    SlideInFromTrailing,
    SlideOutToTrailing,
    CoverVertical,
    UncoverVertical,
    CrossFade,
}

/// Overlay behaviour carried by sheet-style transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationBehavior {
    /// The overlay can be dragged away by the user.
    pub interactive_dismiss: bool,
    pub dimmed_backdrop: bool,
}

/// How the host should lay out an overlaid element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PresentationMode {
    FullScreen,
    Custom,
}

/// Animation capability bundle for one style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionDescriptor {
    pub style: Style,
    pub present: Animation,
    pub dismiss: Animation,
    pub presentation: Option<PresentationBehavior>,
}

impl TransitionDescriptor {
    /// Full screen unless the descriptor brings its own presentation behaviour.
    pub fn presentation_mode(&self) -> PresentationMode {
        match self.presentation {
            Some(_) => PresentationMode::Custom,
            None => PresentationMode::FullScreen,
        }
    }
}

/// Maps a style to its descriptor. `None` means "use the host default".
pub fn resolve(style: Style) -> Option<TransitionDescriptor> {
    let (present, dismiss, presentation) = match style {
        Style::System | Style::SetImmediate => return None,
        Style::NextDefault => (Animation::SlideInFromTrailing, Animation::SlideOutToTrailing, None),
        Style::UpDefault => (Animation::CoverVertical, Animation::UncoverVertical, None),
        Style::SetDefault => (Animation::CrossFade, Animation::CrossFade, None),
        Style::Sheet => (
            Animation::CoverVertical,
            Animation::UncoverVertical,
            Some(PresentationBehavior {
                interactive_dismiss: true,
                dimmed_backdrop: true,
            }),
        ),
    };

    Some(TransitionDescriptor {
        style,
        present,
        dismiss,
        presentation,
    })
}

/// Overlay mode for an `up` transition resolved from `descriptor`.
pub fn presentation_mode(descriptor: Option<&TransitionDescriptor>) -> PresentationMode {
    descriptor
        .map(TransitionDescriptor::presentation_mode)
        .unwrap_or(PresentationMode::FullScreen)
}
