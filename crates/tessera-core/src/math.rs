//! `glam` types used for pen positions and screen-space geometry.
//!
//! ```
//! use tessera_core::math::Vec2;
//!
//! let pen = Vec2::new(10.0, 20.0);
//! assert_eq!(pen + Vec2::X * 8.0, Vec2::new(18.0, 20.0));
//! ```

pub use glam::{Vec2, Vec4, vec2};
