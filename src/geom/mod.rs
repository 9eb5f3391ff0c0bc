mod proj;
mod rect;
mod repair;

pub use proj::Projector;
pub(crate) use rect::{aspect_ratio, expand, split_long_axis, square};
pub(crate) use repair::make_valid;
