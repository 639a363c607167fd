//! Server-to-client message parsing and client-to-server message framing.
//!
//! Message layouts follow RFC 6143 Sections 7.5 and 7.6. Inbound parsing is
//! open for extension through [`ServerMessageParser`]; outbound messages are
//! the fixed six the protocol defines, framed whole into a buffer so the
//! transport never sees a partial frame.

use crate::client::encoding::{Encoding, EncodingRegistry};
use crate::codec::WireRead;
use crate::error::RfbError;
use crate::protocol::{Color, ColorMap, ImageRegion, PixelFormat, RectangleHeader};
use async_trait::async_trait;
use bytes::{BufMut, BytesMut};
use std::sync::Arc;
use tokio::io::AsyncRead;

// Server-to-client message types.
pub(crate) const SERVER_MSG_FRAMEBUFFER_UPDATE: u8 = 0;
pub(crate) const SERVER_MSG_SET_COLOR_MAP_ENTRIES: u8 = 1;
pub(crate) const SERVER_MSG_BELL: u8 = 2;
pub(crate) const SERVER_MSG_SERVER_CUT_TEXT: u8 = 3;

// Client-to-server message types.
const CLIENT_MSG_SET_PIXEL_FORMAT: u8 = 0;
const CLIENT_MSG_SET_ENCODINGS: u8 = 2;
const CLIENT_MSG_FRAMEBUFFER_UPDATE_REQUEST: u8 = 3;
const CLIENT_MSG_KEY_EVENT: u8 = 4;
const CLIENT_MSG_POINTER_EVENT: u8 = 5;
const CLIENT_MSG_CLIENT_CUT_TEXT: u8 = 6;

/// A decoded message from the server, delivered to the consumer sink in
/// wire order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    FramebufferUpdate(FramebufferUpdate),
    SetColorMapEntries(ColorMapUpdate),
    Bell,
    ServerCutText(String),
    /// Produced by registry extensions for message types this crate does not
    /// define. The payload layout is the extension's own business.
    Extension { msg_type: u8, payload: Vec<u8> },
}

/// The rectangles of one framebuffer update, already decoded to RGBA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramebufferUpdate {
    pub rects: Vec<ImageRegion>,
}

/// The palette entries one SetColorMapEntries message installed.
///
/// The same entries have already been applied to the connection's color map
/// by the time this reaches the sink; the copy is for consumers that mirror
/// the palette themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorMapUpdate {
    pub first_color: u16,
    pub colors: Vec<Color>,
}

/// Per-session decode state owned by the dispatcher.
///
/// The pixel format and encoding registry are refreshed from the shared
/// outbound state before each message is parsed, so a `set_pixel_format`
/// that was sent before this message was read is already visible here. The
/// color map lives here exclusively: it is written and read only on the
/// dispatcher task.
pub struct SessionState {
    pub pixel_format: PixelFormat,
    pub color_map: ColorMap,
    pub(crate) encodings: EncodingRegistry,
}

impl SessionState {
    pub(crate) fn new(pixel_format: PixelFormat, encodings: EncodingRegistry) -> Self {
        Self {
            pixel_format,
            color_map: ColorMap::new(),
            encodings,
        }
    }

    /// Resolves a rectangle encoding from the registry in effect.
    pub fn encoding(&self, code: i32) -> Option<Arc<dyn Encoding>> {
        self.encodings.get(code)
    }
}

/// A parser for one server message type.
///
/// The dispatcher has already consumed the type byte when `read` is called;
/// the parser consumes exactly the rest of the message.
#[async_trait]
pub trait ServerMessageParser: Send + Sync {
    /// The message-type byte this parser handles.
    fn msg_type(&self) -> u8;

    async fn read(
        &self,
        session: &mut SessionState,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> Result<ServerMessage, RfbError>;
}

/// Message type 0: one padding byte, a rectangle count, then that many
/// header + payload pairs.
pub(crate) struct FramebufferUpdateParser;

#[async_trait]
impl ServerMessageParser for FramebufferUpdateParser {
    fn msg_type(&self) -> u8 {
        SERVER_MSG_FRAMEBUFFER_UPDATE
    }

    async fn read(
        &self,
        session: &mut SessionState,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> Result<ServerMessage, RfbError> {
        reader.read_wire_u8().await?; // padding
        let num_rects = reader.read_wire_u16().await?;

        let mut rects = Vec::with_capacity(usize::from(num_rects));
        for _ in 0..num_rects {
            let header = RectangleHeader::read(reader).await?;
            let encoding = session
                .encoding(header.encoding)
                .ok_or(RfbError::UnknownEncoding(header.encoding))?;
            let region = encoding
                .decode(&session.pixel_format, &session.color_map, header.rect, reader)
                .await?;
            rects.push(region);
        }

        Ok(ServerMessage::FramebufferUpdate(FramebufferUpdate { rects }))
    }
}

/// Message type 1: installs palette entries and hands the consumer a copy.
pub(crate) struct SetColorMapEntriesParser;

#[async_trait]
impl ServerMessageParser for SetColorMapEntriesParser {
    fn msg_type(&self) -> u8 {
        SERVER_MSG_SET_COLOR_MAP_ENTRIES
    }

    async fn read(
        &self,
        session: &mut SessionState,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> Result<ServerMessage, RfbError> {
        reader.read_wire_u8().await?; // padding
        let first_color = reader.read_wire_u16().await?;
        let num_colors = reader.read_wire_u16().await?;

        let mut colors = Vec::with_capacity(usize::from(num_colors));
        for i in 0..num_colors {
            let r = reader.read_wire_u16().await?;
            let g = reader.read_wire_u16().await?;
            let b = reader.read_wire_u16().await?;
            let color = Color::from_wire(r, g, b);
            session.color_map.set(first_color.wrapping_add(i), color);
            colors.push(color);
        }

        Ok(ServerMessage::SetColorMapEntries(ColorMapUpdate {
            first_color,
            colors,
        }))
    }
}

/// Message type 2: no body at all.
pub(crate) struct BellParser;

#[async_trait]
impl ServerMessageParser for BellParser {
    fn msg_type(&self) -> u8 {
        SERVER_MSG_BELL
    }

    async fn read(
        &self,
        _session: &mut SessionState,
        _reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> Result<ServerMessage, RfbError> {
        Ok(ServerMessage::Bell)
    }
}

/// Message type 3: three padding bytes, a u32 length, then Latin-1 text.
pub(crate) struct ServerCutTextParser;

#[async_trait]
impl ServerMessageParser for ServerCutTextParser {
    fn msg_type(&self) -> u8 {
        SERVER_MSG_SERVER_CUT_TEXT
    }

    async fn read(
        &self,
        _session: &mut SessionState,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> Result<ServerMessage, RfbError> {
        let mut padding = [0u8; 3];
        reader.read_exact_into(&mut padding).await?;
        let len = reader.read_wire_u32().await?;
        let bytes = reader.read_wire_bytes(len as usize).await?;
        // The cut buffer is Latin-1 per RFC 6143 Section 7.6.4, and Latin-1
        // code points are exactly the first 256 Unicode scalars.
        let text = bytes.into_iter().map(char::from).collect();
        Ok(ServerMessage::ServerCutText(text))
    }
}

pub(crate) fn builtin_parsers() -> Vec<Arc<dyn ServerMessageParser>> {
    vec![
        Arc::new(FramebufferUpdateParser),
        Arc::new(SetColorMapEntriesParser),
        Arc::new(BellParser),
        Arc::new(ServerCutTextParser),
    ]
}

/// An outbound message, framed whole before it touches the transport.
#[derive(Debug, Clone)]
pub(crate) enum ClientMessage {
    SetPixelFormat(PixelFormat),
    SetEncodings(Vec<i32>),
    FramebufferUpdateRequest {
        incremental: bool,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
    },
    KeyEvent {
        down: bool,
        keysym: u32,
    },
    PointerEvent {
        button_mask: u8,
        x: u16,
        y: u16,
    },
    ClientCutText(String),
}

impl ClientMessage {
    pub(crate) fn write_to(&self, buf: &mut BytesMut) {
        match self {
            ClientMessage::SetPixelFormat(format) => {
                buf.put_u8(CLIENT_MSG_SET_PIXEL_FORMAT);
                buf.put_bytes(0, 3);
                format.put(buf);
            }
            ClientMessage::SetEncodings(codes) => {
                buf.put_u8(CLIENT_MSG_SET_ENCODINGS);
                buf.put_u8(0);
                buf.put_u16(codes.len() as u16);
                for &code in codes {
                    buf.put_i32(code);
                }
            }
            ClientMessage::FramebufferUpdateRequest {
                incremental,
                x,
                y,
                width,
                height,
            } => {
                buf.put_u8(CLIENT_MSG_FRAMEBUFFER_UPDATE_REQUEST);
                buf.put_u8(u8::from(*incremental));
                buf.put_u16(*x);
                buf.put_u16(*y);
                buf.put_u16(*width);
                buf.put_u16(*height);
            }
            ClientMessage::KeyEvent { down, keysym } => {
                buf.put_u8(CLIENT_MSG_KEY_EVENT);
                buf.put_u8(u8::from(*down));
                buf.put_bytes(0, 2);
                buf.put_u32(*keysym);
            }
            ClientMessage::PointerEvent { button_mask, x, y } => {
                buf.put_u8(CLIENT_MSG_POINTER_EVENT);
                buf.put_u8(*button_mask);
                buf.put_u16(*x);
                buf.put_u16(*y);
            }
            ClientMessage::ClientCutText(text) => {
                buf.put_u8(CLIENT_MSG_CLIENT_CUT_TEXT);
                buf.put_bytes(0, 3);
                buf.put_u32(text.len() as u32);
                buf.put_slice(text.as_bytes());
            }
        }
    }
}
