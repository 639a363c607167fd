use crate::codec::WireRead;
use crate::error::RfbError;
use tokio::io::AsyncRead;

/// An axis-aligned region of the framebuffer, in framebuffer coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

/// The 12-byte header that precedes every rectangle payload in a
/// FramebufferUpdate message.
///
/// See RFC 6143 Section 7.6.1.
#[derive(Debug, Clone, Copy)]
pub struct RectangleHeader {
    pub rect: Rect,
    pub encoding: i32,
}

impl RectangleHeader {
    pub(crate) async fn read<S>(reader: &mut S) -> Result<Self, RfbError>
    where
        S: AsyncRead + Unpin + ?Sized,
    {
        Ok(Self {
            rect: Rect {
                x: reader.read_wire_u16().await?,
                y: reader.read_wire_u16().await?,
                width: reader.read_wire_u16().await?,
                height: reader.read_wire_u16().await?,
            },
            encoding: reader.read_wire_i32().await?,
        })
    }
}

/// A decoded rectangle: RGBA8888 pixels, row major, positioned at
/// `rect.x`/`rect.y` in the framebuffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRegion {
    pub rect: Rect,
    /// `4 * rect.width * rect.height` bytes, alpha always 255.
    pub data: Vec<u8>,
}
