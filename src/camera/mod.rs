//! Camera types shared by the picking passes.
//!
//! The embedding editor owns camera motion; stagehand only needs the
//! matrices and far-plane distance to unproject cursor rays.

/// Core camera struct, projection variants, and GPU uniform type.
pub mod core;
