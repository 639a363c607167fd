//! Rectangle pixel-data decoders.
//!
//! Every rectangle in a FramebufferUpdate names an encoding by its i32 type
//! code; the registry maps codes to decoders. Only Raw ships here. RFC 6143
//! makes it the one encoding a server may always fall back to, so it is
//! present in every registry whether configured or not.

use crate::codec::WireRead;
use crate::error::RfbError;
use crate::protocol::{ColorMap, ImageRegion, PixelFormat, Rect};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::io::AsyncRead;

/// A decoder for one rectangle encoding.
#[async_trait]
pub trait Encoding: Send + Sync {
    /// The encoding's wire type code.
    fn type_code(&self) -> i32;

    /// Consumes exactly this rectangle's payload from `reader` and returns
    /// the decoded RGBA region.
    ///
    /// `format` is the pixel format in effect for this update; `color_map`
    /// is only consulted for non-true-color formats.
    async fn decode(
        &self,
        format: &PixelFormat,
        color_map: &ColorMap,
        rect: Rect,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> Result<ImageRegion, RfbError>;
}

/// Type code → decoder map. Raw is always resolvable.
#[derive(Clone)]
pub(crate) struct EncodingRegistry {
    map: HashMap<i32, Arc<dyn Encoding>>,
}

impl EncodingRegistry {
    pub(crate) fn new(encodings: &[Arc<dyn Encoding>]) -> Self {
        let mut map: HashMap<i32, Arc<dyn Encoding>> = HashMap::new();
        for encoding in encodings {
            map.insert(encoding.type_code(), Arc::clone(encoding));
        }
        map.entry(RAW_TYPE_CODE)
            .or_insert_with(|| Arc::new(RawEncoding));
        Self { map }
    }

    pub(crate) fn get(&self, code: i32) -> Option<Arc<dyn Encoding>> {
        self.map.get(&code).cloned()
    }
}

const RAW_TYPE_CODE: i32 = 0;

/// The mandatory Raw encoding: width × height pixels, row major, each pixel
/// `bits-per-pixel / 8` bytes in the format's byte order.
///
/// See RFC 6143 Section 7.7.1.
#[derive(Debug, Default)]
pub struct RawEncoding;

#[async_trait]
impl Encoding for RawEncoding {
    fn type_code(&self) -> i32 {
        RAW_TYPE_CODE
    }

    async fn decode(
        &self,
        format: &PixelFormat,
        color_map: &ColorMap,
        rect: Rect,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> Result<ImageRegion, RfbError> {
        let bytes_per_pixel = format.bytes_per_pixel();
        let width = usize::from(rect.width);
        let height = usize::from(rect.height);

        let mut data = Vec::with_capacity(width * height * 4);
        let mut row = vec![0u8; width * bytes_per_pixel];

        for _ in 0..height {
            reader.read_exact_into(&mut row).await?;
            for pixel in row.chunks_exact(bytes_per_pixel) {
                let raw = assemble(pixel, format.big_endian);
                let (r, g, b) = if format.true_color {
                    (
                        scale(raw, format.red_shift, format.red_max),
                        scale(raw, format.green_shift, format.green_max),
                        scale(raw, format.blue_shift, format.blue_max),
                    )
                } else {
                    let color = color_map.lookup(raw)?;
                    (color.r, color.g, color.b)
                };
                data.extend_from_slice(&[r, g, b, 255]);
            }
        }

        Ok(ImageRegion { rect, data })
    }
}

/// Reassembles one pixel's bytes into its raw value. An 8-bit pixel is a
/// single byte either way; wider pixels honor the format's byte order, which
/// is independent of the protocol's own network byte order.
fn assemble(pixel: &[u8], big_endian: bool) -> u32 {
    match *pixel {
        [b0] => u32::from(b0),
        [b0, b1] => {
            if big_endian {
                u32::from(u16::from_be_bytes([b0, b1]))
            } else {
                u32::from(u16::from_le_bytes([b0, b1]))
            }
        }
        [b0, b1, b2, b3] => {
            if big_endian {
                u32::from_be_bytes([b0, b1, b2, b3])
            } else {
                u32::from_le_bytes([b0, b1, b2, b3])
            }
        }
        // PixelFormat validation admits no other width.
        _ => unreachable!("pixel width {} bytes", pixel.len()),
    }
}

/// Extracts one channel and scales it to 8 bits. Bits above `depth` are
/// masked away by `max`, so `depth < bits_per_pixel` needs no special case.
fn scale(raw: u32, shift: u8, max: u16) -> u8 {
    let channel = (raw >> shift) & u32::from(max);
    ((channel * 255) / u32::from(max)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Color;
    use std::io::Cursor;

    fn rect_1x1() -> Rect {
        Rect {
            x: 0,
            y: 0,
            width: 1,
            height: 1,
        }
    }

    async fn decode_raw(
        format: &PixelFormat,
        color_map: &ColorMap,
        rect: Rect,
        payload: &[u8],
    ) -> Result<ImageRegion, RfbError> {
        let mut reader = Cursor::new(payload.to_vec());
        RawEncoding
            .decode(format, color_map, rect, &mut reader)
            .await
    }

    #[tokio::test]
    async fn bgra_little_endian_pixel() {
        let format = PixelFormat::bgra();
        let region = decode_raw(&format, &ColorMap::new(), rect_1x1(), &[0x44, 0x33, 0x22, 0x00])
            .await
            .unwrap();
        // Raw value 0x00223344: red at shift 16, green at 8, blue at 0.
        assert_eq!(region.data, vec![0x22, 0x33, 0x44, 255]);
    }

    #[tokio::test]
    async fn sixteen_bit_big_endian_pixel() {
        let format = PixelFormat {
            bits_per_pixel: 16,
            depth: 15,
            big_endian: true,
            true_color: true,
            red_max: 31,
            green_max: 31,
            blue_max: 31,
            red_shift: 10,
            green_shift: 5,
            blue_shift: 0,
        };
        // 0x7fe0 = red 31, green 31, blue 0.
        let region = decode_raw(&format, &ColorMap::new(), rect_1x1(), &[0x7f, 0xe0])
            .await
            .unwrap();
        assert_eq!(region.data, vec![255, 255, 0, 255]);
    }

    #[tokio::test]
    async fn paletted_pixel_resolves_through_color_map() {
        let mut map = ColorMap::new();
        map.set(10, Color::from_wire(0xffff, 0, 0));
        let format = PixelFormat {
            bits_per_pixel: 8,
            depth: 8,
            big_endian: false,
            true_color: false,
            red_max: 0,
            green_max: 0,
            blue_max: 0,
            red_shift: 0,
            green_shift: 0,
            blue_shift: 0,
        };
        let region = decode_raw(&format, &map, rect_1x1(), &[10]).await.unwrap();
        assert_eq!(region.data, vec![0xff, 0, 0, 255]);
    }

    #[tokio::test]
    async fn unset_palette_entry_fails_decode() {
        let format = PixelFormat {
            bits_per_pixel: 8,
            depth: 8,
            true_color: false,
            ..PixelFormat::rgba()
        };
        let err = decode_raw(&format, &ColorMap::new(), rect_1x1(), &[7])
            .await
            .unwrap_err();
        assert!(matches!(err, RfbError::PaletteOutOfRange(7)));
    }

    #[tokio::test]
    async fn short_payload_is_truncated() {
        let rect = Rect {
            x: 0,
            y: 0,
            width: 2,
            height: 2,
        };
        let err = decode_raw(&PixelFormat::bgra(), &ColorMap::new(), rect, &[0u8; 6])
            .await
            .unwrap_err();
        assert!(matches!(err, RfbError::Truncated));
    }

    #[tokio::test]
    async fn multi_pixel_rows_decode_in_order() {
        let format = PixelFormat::rgba();
        let rect = Rect {
            x: 5,
            y: 9,
            width: 2,
            height: 1,
        };
        // rgba(): red shift 0, green 8, blue 16, little endian.
        let payload = [0xff, 0x00, 0x00, 0x00, 0x00, 0xff, 0x00, 0x00];
        let region = decode_raw(&format, &ColorMap::new(), rect, &payload)
            .await
            .unwrap();
        assert_eq!(region.rect, rect);
        assert_eq!(region.data, vec![255, 0, 0, 255, 0, 255, 0, 255]);
    }

    #[test]
    fn registry_always_resolves_raw() {
        let registry = EncodingRegistry::new(&[]);
        assert!(registry.get(0).is_some());
        assert!(registry.get(7).is_none());
    }
}
