pub mod color_map;
pub mod keysym;
pub mod pixel_format;
pub mod rect;
pub mod version;

pub use color_map::{Color, ColorMap};
pub use pixel_format::PixelFormat;
pub use rect::{ImageRegion, Rect, RectangleHeader};
pub use version::ProtocolVersion;
