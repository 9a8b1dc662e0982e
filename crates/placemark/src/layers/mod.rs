//! Layer assignment and icon selection.

pub mod classifier;
pub mod icons;

pub use classifier::Layer;
pub use icons::Icon;
