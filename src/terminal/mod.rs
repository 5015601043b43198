//! Terminal output and capability detection.

pub mod escape;
pub mod negotiate;

pub use escape::{blank_icon, hyperlink, inline_image, Color, Style, ICON_CELL_WIDTH};
pub use negotiate::{confirms_graphics, detect_graphics_support, probe};
