//! # rfb-client
//!
//! An async client-side implementation of the Remote Framebuffer protocol
//! (VNC), RFC 6143, protocol version 3.8.
//!
//! The crate is the wire engine only: handshake, authentication, the
//! full-duplex message loop, and per-rectangle pixel decoding down to RGBA.
//! Rendering, input capture and connection management stay with the caller,
//! which receives decoded [`ServerMessage`]s through a channel it owns.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tokio::net::TcpStream;
//! use tokio::sync::mpsc;
//! use rfb_client::{keysym, ClientConfig, ClientConn, ServerMessage, VncAuth};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let tcp = TcpStream::connect("127.0.0.1:5900").await?;
//!
//!     let (sink, mut messages) = mpsc::channel(16);
//!     let config = ClientConfig::new(sink).add_auth(Arc::new(VncAuth::new("password")));
//!
//!     let conn = ClientConn::new(tcp, config).await?;
//!     println!(
//!         "connected to {:?}, {}x{}",
//!         conn.desktop_name(),
//!         conn.framebuffer_width(),
//!         conn.framebuffer_height()
//!     );
//!
//!     conn.framebuffer_update_request(
//!         false,
//!         0,
//!         0,
//!         conn.framebuffer_width(),
//!         conn.framebuffer_height(),
//!     )
//!     .await?;
//!     conn.key_event(keysym::XK_Return, true).await?;
//!     conn.key_event(keysym::XK_Return, false).await?;
//!
//!     // The channel closes when the session ends.
//!     while let Some(msg) = messages.recv().await {
//!         match msg {
//!             ServerMessage::FramebufferUpdate(update) => {
//!                 println!("{} rectangles", update.rects.len());
//!             }
//!             ServerMessage::Bell => println!("bell"),
//!             other => println!("{other:?}"),
//!         }
//!     }
//!
//!     conn.close().await?;
//!     Ok(())
//! }
//! ```

use tokio::io::{AsyncRead, AsyncWrite};

pub mod client;
mod codec;
pub mod error;
pub mod protocol;

pub use client::{
    AuthNone, ClientAuth, ClientConfig, ClientConn, ColorMapUpdate, Encoding, FramebufferUpdate,
    RawEncoding, ServerMessage, ServerMessageParser, SessionState, VncAuth,
};
pub use error::{HandshakePhase, RfbError};
pub use protocol::keysym::{self, button};
pub use protocol::{Color, ColorMap, ImageRegion, PixelFormat, ProtocolVersion, Rect};

/// A bidirectional byte stream a session can run over.
///
/// Blanket-implemented: `TcpStream`, TLS wrappers, and the in-memory duplex
/// pairs used in tests all qualify. The crate never imposes read deadlines;
/// callers wanting them configure or wrap the stream before connecting.
pub trait Transport: AsyncRead + AsyncWrite + Send + Unpin {}

impl<T: AsyncRead + AsyncWrite + Send + Unpin> Transport for T {}
