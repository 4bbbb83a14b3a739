//! Geometry of the hyperbolic plane and the drawing surface used by hydra.
//!
//! Points are stored in the native polar representation: a radial
//! coordinate (hyperbolic distance to the origin) and an angular
//! coordinate. Drawings are sequences of sampled points, converted to
//! Euclidean coordinates only when rendered.

pub mod types;

pub mod bbox;
pub mod canvas;
pub mod error;
pub mod frame;
pub mod math;
pub mod polar;
pub mod shapes;
