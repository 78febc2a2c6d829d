//! Tessera Core
//!
//! Ambient services shared by the renderer crates: logging setup, puffin
//! profiling scopes and the `glam` math types used for screen positions.

pub mod logging;
pub mod math;
pub mod profiling;
