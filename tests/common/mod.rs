//! A scripted RFB 3.8 server speaking over an in-memory duplex stream.
//!
//! Each helper plays one server-side phase and asserts the exact bytes the
//! client is required to send, so every test doubles as a framing check.

#![allow(dead_code)]

use rfb_client::PixelFormat;
use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};

pub const DESKTOP_NAME: &str = "scripted";
pub const WIDTH: u16 = 1024;
pub const HEIGHT: u16 = 768;

pub fn paletted_format() -> PixelFormat {
    PixelFormat {
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
    }
}

/// Version exchange: advertise `banner`, expect the 3.8 reply.
pub async fn exchange_version(stream: &mut DuplexStream, banner: &str) {
    stream.write_all(banner.as_bytes()).await.unwrap();
    let mut reply = [0u8; 12];
    stream.read_exact(&mut reply).await.unwrap();
    assert_eq!(&reply, b"RFB 003.008\n");
}

/// Security phase offering `types`; returns the type the client picked.
pub async fn offer_security(stream: &mut DuplexStream, types: &[u8]) -> u8 {
    stream.write_all(&[types.len() as u8]).await.unwrap();
    stream.write_all(types).await.unwrap();
    let mut chosen = [0u8; 1];
    stream.read_exact(&mut chosen).await.unwrap();
    assert!(types.contains(&chosen[0]), "client picked an unoffered type");
    chosen[0]
}

pub async fn send_security_result(stream: &mut DuplexStream, result: u32) {
    stream.write_all(&result.to_be_bytes()).await.unwrap();
}

pub async fn send_reason(stream: &mut DuplexStream, reason: &str) {
    stream
        .write_all(&(reason.len() as u32).to_be_bytes())
        .await
        .unwrap();
    stream.write_all(reason.as_bytes()).await.unwrap();
}

/// ClientInit + ServerInit; returns the shared flag the client sent.
pub async fn finish_init(stream: &mut DuplexStream, format: PixelFormat) -> u8 {
    let mut shared = [0u8; 1];
    stream.read_exact(&mut shared).await.unwrap();

    stream.write_all(&WIDTH.to_be_bytes()).await.unwrap();
    stream.write_all(&HEIGHT.to_be_bytes()).await.unwrap();
    stream.write_all(&format.to_bytes()).await.unwrap();
    stream
        .write_all(&(DESKTOP_NAME.len() as u32).to_be_bytes())
        .await
        .unwrap();
    stream.write_all(DESKTOP_NAME.as_bytes()).await.unwrap();

    shared[0]
}

/// The whole handshake with no authentication and the given pixel format.
pub async fn serve_handshake(stream: &mut DuplexStream, format: PixelFormat) -> u8 {
    exchange_version(stream, "RFB 003.008\n").await;
    let chosen = offer_security(stream, &[1]).await;
    assert_eq!(chosen, 1);
    send_security_result(stream, 0).await;
    finish_init(stream, format).await
}

/// One FramebufferUpdate carrying a single Raw rectangle.
pub async fn send_raw_update(
    stream: &mut DuplexStream,
    x: u16,
    y: u16,
    width: u16,
    height: u16,
    payload: &[u8],
) {
    stream.write_all(&[0, 0]).await.unwrap(); // type + padding
    stream.write_all(&1u16.to_be_bytes()).await.unwrap();
    stream.write_all(&x.to_be_bytes()).await.unwrap();
    stream.write_all(&y.to_be_bytes()).await.unwrap();
    stream.write_all(&width.to_be_bytes()).await.unwrap();
    stream.write_all(&height.to_be_bytes()).await.unwrap();
    stream.write_all(&0i32.to_be_bytes()).await.unwrap();
    stream.write_all(payload).await.unwrap();
}

pub async fn send_bell(stream: &mut DuplexStream) {
    stream.write_all(&[2]).await.unwrap();
}

pub async fn send_cut_text(stream: &mut DuplexStream, text: &str) {
    stream.write_all(&[3, 0, 0, 0]).await.unwrap();
    stream
        .write_all(&(text.len() as u32).to_be_bytes())
        .await
        .unwrap();
    stream.write_all(text.as_bytes()).await.unwrap();
}

pub async fn send_color_map_entry(stream: &mut DuplexStream, first: u16, r: u16, g: u16, b: u16) {
    stream.write_all(&[1, 0]).await.unwrap(); // type + padding
    stream.write_all(&first.to_be_bytes()).await.unwrap();
    stream.write_all(&1u16.to_be_bytes()).await.unwrap();
    stream.write_all(&r.to_be_bytes()).await.unwrap();
    stream.write_all(&g.to_be_bytes()).await.unwrap();
    stream.write_all(&b.to_be_bytes()).await.unwrap();
}
