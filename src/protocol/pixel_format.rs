use crate::codec::WireRead;
use crate::error::RfbError;
use bytes::{BufMut, BytesMut};
use tokio::io::AsyncRead;

/// How each pixel's bytes map to color on this connection.
///
/// See RFC 6143 Section 7.4. When `true_color` is set the max/shift fields
/// are authoritative; otherwise pixels are palette indexes into the
/// connection's color map. Note that `big_endian` governs pixel data only;
/// protocol control integers are always network byte order, independent of
/// this flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFormat {
    pub bits_per_pixel: u8,
    pub depth: u8,
    pub big_endian: bool,
    pub true_color: bool,
    pub red_max: u16,
    pub green_max: u16,
    pub blue_max: u16,
    pub red_shift: u8,
    pub green_shift: u8,
    pub blue_shift: u8,
}

impl PixelFormat {
    /// 32-bit true color with red in the low byte, as sent on the wire by
    /// most big-endian-flagged servers and wasm canvases.
    pub fn rgba() -> Self {
        Self {
            bits_per_pixel: 32,
            depth: 24,
            big_endian: false,
            true_color: true,
            red_max: 255,
            green_max: 255,
            blue_max: 255,
            red_shift: 0,
            green_shift: 8,
            blue_shift: 16,
        }
    }

    /// 32-bit true color in the layout little-endian PCs usually want.
    pub fn bgra() -> Self {
        Self {
            red_shift: 16,
            blue_shift: 0,
            ..Self::rgba()
        }
    }

    pub fn bytes_per_pixel(&self) -> usize {
        usize::from(self.bits_per_pixel) / 8
    }

    /// Checks the invariants every later decode step relies on. Applied to
    /// every format entering the session, whether read off the wire or
    /// handed in by the caller; the fields are all public, so a literal can
    /// hold values no decoder could cope with.
    pub fn validate(&self) -> Result<(), RfbError> {
        if !matches!(self.bits_per_pixel, 8 | 16 | 32) {
            return Err(RfbError::ProtocolViolation(format!(
                "bits-per-pixel {} is not 8, 16 or 32",
                self.bits_per_pixel
            )));
        }
        if self.depth > self.bits_per_pixel {
            return Err(RfbError::ProtocolViolation(format!(
                "depth {} exceeds bits-per-pixel {}",
                self.depth, self.bits_per_pixel
            )));
        }
        if self.true_color && (self.red_max == 0 || self.green_max == 0 || self.blue_max == 0) {
            return Err(RfbError::ProtocolViolation(
                "true-color format with a zero channel maximum".into(),
            ));
        }
        Ok(())
    }

    /// Parses and validates the 16-byte wire layout.
    pub fn from_bytes(bytes: &[u8; 16]) -> Result<Self, RfbError> {
        let format = Self {
            bits_per_pixel: bytes[0],
            depth: bytes[1],
            big_endian: bytes[2] != 0,
            true_color: bytes[3] != 0,
            red_max: u16::from_be_bytes([bytes[4], bytes[5]]),
            green_max: u16::from_be_bytes([bytes[6], bytes[7]]),
            blue_max: u16::from_be_bytes([bytes[8], bytes[9]]),
            red_shift: bytes[10],
            green_shift: bytes[11],
            blue_shift: bytes[12],
            // bytes[13..16] are padding
        };
        format.validate()?;
        Ok(format)
    }

    pub fn to_bytes(&self) -> [u8; 16] {
        let mut bytes = [0u8; 16];
        bytes[0] = self.bits_per_pixel;
        bytes[1] = self.depth;
        bytes[2] = u8::from(self.big_endian);
        bytes[3] = u8::from(self.true_color);
        bytes[4..6].copy_from_slice(&self.red_max.to_be_bytes());
        bytes[6..8].copy_from_slice(&self.green_max.to_be_bytes());
        bytes[8..10].copy_from_slice(&self.blue_max.to_be_bytes());
        bytes[10] = self.red_shift;
        bytes[11] = self.green_shift;
        bytes[12] = self.blue_shift;
        bytes
    }

    pub(crate) async fn read<S>(reader: &mut S) -> Result<Self, RfbError>
    where
        S: AsyncRead + Unpin + ?Sized,
    {
        let mut bytes = [0u8; 16];
        reader.read_exact_into(&mut bytes).await?;
        Self::from_bytes(&bytes)
    }

    pub(crate) fn put(&self, buf: &mut BytesMut) {
        buf.put_slice(&self.to_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_round_trip() {
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
        assert_eq!(PixelFormat::from_bytes(&format.to_bytes()).unwrap(), format);
    }

    #[test]
    fn bgra_layout() {
        let bytes = PixelFormat::bgra().to_bytes();
        assert_eq!(bytes[0], 32); // bpp
        assert_eq!(bytes[1], 24); // depth
        assert_eq!(bytes[3], 1); // true color
        assert_eq!([bytes[4], bytes[5]], [0, 255]); // red max, big endian
        assert_eq!(bytes[10], 16); // red shift
        assert_eq!(bytes[12], 0); // blue shift
        assert_eq!(&bytes[13..16], &[0, 0, 0]); // padding
    }

    #[test]
    fn rejects_odd_bpp() {
        let mut bytes = PixelFormat::rgba().to_bytes();
        bytes[0] = 24;
        assert!(matches!(
            PixelFormat::from_bytes(&bytes),
            Err(RfbError::ProtocolViolation(_))
        ));
    }

    #[test]
    fn rejects_depth_above_bpp() {
        let mut bytes = PixelFormat::rgba().to_bytes();
        bytes[0] = 8;
        bytes[1] = 24;
        assert!(matches!(
            PixelFormat::from_bytes(&bytes),
            Err(RfbError::ProtocolViolation(_))
        ));
    }

    #[test]
    fn rejects_zero_channel_max() {
        let mut bytes = PixelFormat::rgba().to_bytes();
        bytes[4] = 0;
        bytes[5] = 0;
        assert!(matches!(
            PixelFormat::from_bytes(&bytes),
            Err(RfbError::ProtocolViolation(_))
        ));
    }

    #[test]
    fn validate_rejects_handcrafted_bad_format() {
        // The wire never carries this, but a struct literal can.
        let format = PixelFormat {
            bits_per_pixel: 3,
            depth: 3,
            ..PixelFormat::rgba()
        };
        assert!(matches!(
            format.validate(),
            Err(RfbError::ProtocolViolation(_))
        ));
    }

    #[test]
    fn paletted_format_skips_channel_checks() {
        // Color-mapped formats leave the max/shift fields zeroed.
        let mut bytes = [0u8; 16];
        bytes[0] = 8;
        bytes[1] = 8;
        let format = PixelFormat::from_bytes(&bytes).unwrap();
        assert!(!format.true_color);
        assert_eq!(format.bytes_per_pixel(), 1);
    }
}
