// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
// GPU / graphics allowances — casts are intentional and safe
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]
// Float comparison: graphics math frequently compares against 0.0, 1.0, etc.
#![allow(clippy::float_cmp)]
// Module layout mirrors file layout
#![allow(clippy::module_name_repetitions)]

//! GPU-accelerated 3D scene-editing core built on wgpu.
//!
//! Stagehand provides the two stateful subsystems every scene editor needs
//! and nothing else: a linear undo/redo [`history::History`] with
//! time-windowed command coalescing and replay-based state restoration, and
//! a [`picking::GpuPicker`] that resolves both the object under the cursor
//! and its 3D world position from two offscreen render passes instead of
//! CPU ray casting.
//!
//! # Key entry points
//!
//! - [`history::History`] - the undo/redo command stack
//! - [`history::CommandRegistry`] - reconstructs persisted commands by type
//! - [`picking::GpuPicker`] - two-pass GPU object/world-point picking
//! - [`scene::Scene`] - the minimal scene graph both subsystems operate on
//! - [`options::Options`] - runtime configuration with TOML presets
//!
//! # Architecture
//!
//! Both subsystems are single-threaded and synchronous: history operations
//! mutate the scene graph in place, and a pick query encodes two render
//! passes, submits them, and blocks on a 1x1 pixel readback before
//! returning. The picker never touches scene materials - it owns its own id
//! and depth pipelines and draws the scene geometry through them.

pub mod camera;
pub mod error;
pub mod gpu;
pub mod history;
pub mod options;
pub mod picking;
pub mod scene;
