//! Fundamental types shared across the navigation core.

mod cell;
mod image;
mod math;

pub use cell::{CellIndices, FractionalCell};
pub use image::{ImageView, ImageViewMut, NO_DEPTH};
pub use math::{Matrix3, Matrix4, Vector3};
