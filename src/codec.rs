//! Big-endian wire primitives shared by the handshake and the dispatcher.
//!
//! All RFB control integers are network byte order. Pixel data inside
//! rectangle payloads follows the negotiated [`crate::PixelFormat`] instead;
//! these helpers are never used for that.

use crate::error::RfbError;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Read-side wire primitives.
///
/// Hitting end-of-stream mid-read yields [`RfbError::Truncated`]; any other
/// transport failure yields [`RfbError::Transport`].
pub(crate) trait WireRead: AsyncRead + Unpin {
    async fn read_wire_u8(&mut self) -> Result<u8, RfbError> {
        self.read_u8().await.map_err(RfbError::from_io)
    }

    async fn read_wire_u16(&mut self) -> Result<u16, RfbError> {
        self.read_u16().await.map_err(RfbError::from_io)
    }

    async fn read_wire_u32(&mut self) -> Result<u32, RfbError> {
        self.read_u32().await.map_err(RfbError::from_io)
    }

    async fn read_wire_i32(&mut self) -> Result<i32, RfbError> {
        self.read_i32().await.map_err(RfbError::from_io)
    }

    async fn read_exact_into(&mut self, buf: &mut [u8]) -> Result<(), RfbError> {
        self.read_exact(buf).await.map_err(RfbError::from_io)?;
        Ok(())
    }

    async fn read_wire_bytes(&mut self, len: usize) -> Result<Vec<u8>, RfbError> {
        let mut buf = vec![0u8; len];
        self.read_exact_into(&mut buf).await?;
        Ok(buf)
    }

    /// A u32 length prefix followed by that many raw bytes, decoded as UTF-8
    /// with replacement. Used for reason strings and the desktop name.
    async fn read_wire_string(&mut self) -> Result<String, RfbError> {
        let len = self.read_wire_u32().await?;
        let buf = self.read_wire_bytes(len as usize).await?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl<R: AsyncRead + Unpin + ?Sized> WireRead for R {}

/// Write-side wire primitives.
pub(crate) trait WireWrite: AsyncWrite + Unpin {
    async fn write_wire_u8(&mut self, val: u8) -> Result<(), RfbError> {
        self.write_all(&[val]).await.map_err(RfbError::from_io)
    }

    async fn write_wire_u32(&mut self, val: u32) -> Result<(), RfbError> {
        self.write_all(&val.to_be_bytes())
            .await
            .map_err(RfbError::from_io)
    }

    async fn write_wire_bytes(&mut self, buf: &[u8]) -> Result<(), RfbError> {
        self.write_all(buf).await.map_err(RfbError::from_io)
    }
}

impl<W: AsyncWrite + Unpin + ?Sized> WireWrite for W {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn integers_are_big_endian() {
        let mut r = Cursor::new(vec![0x12, 0x01, 0x02, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x00]);
        assert_eq!(r.read_wire_u8().await.unwrap(), 0x12);
        assert_eq!(r.read_wire_u16().await.unwrap(), 0x0102);
        assert_eq!(r.read_wire_u32().await.unwrap(), 0xffff_ffff);
        assert_eq!(r.read_wire_i32().await.unwrap(), -256);
    }

    #[tokio::test]
    async fn length_prefixed_string() {
        let mut data = 5u32.to_be_bytes().to_vec();
        data.extend_from_slice(b"hello");
        let mut r = Cursor::new(data);
        assert_eq!(r.read_wire_string().await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn eof_mid_frame_is_truncated() {
        let mut r = Cursor::new(vec![0x00, 0x01]);
        assert!(matches!(
            r.read_wire_u32().await,
            Err(RfbError::Truncated)
        ));
    }

    #[tokio::test]
    async fn string_cut_short_is_truncated() {
        let mut data = 10u32.to_be_bytes().to_vec();
        data.extend_from_slice(b"abc");
        let mut r = Cursor::new(data);
        assert!(matches!(
            r.read_wire_string().await,
            Err(RfbError::Truncated)
        ));
    }
}
