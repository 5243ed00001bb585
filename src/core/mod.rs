//! # Core Navigation State
//!
//! The coordinator's bookkeeping, kept free of I/O and of any concrete host.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │          CORE           │
//!                    │      (this module)      │
//!                    │                         │
//!                    │  • Style (registry)     │
//!                    │  • SceneNode (records)  │
//!                    │  • SceneStack (model)   │
//!                    │                         │
//!                    │  No I/O. No host. Pure. │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │ Coordinator│      │  Headless  │      │   Native   │
//!     │   (nav)    │      │    host    │      │    host    │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`style`]: named transition styles and their descriptors
//! - [`scene`]: `SceneNode`, one entry of a stack
//! - [`stack`]: `SceneStack`, one stack per tab plus the active tab
//! - [`config`]: layered settings

pub mod config;
pub mod scene;
pub mod stack;
pub mod style;
