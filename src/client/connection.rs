//! The session facade and its dispatcher task.
//!
//! Ownership after setup: one spawned task holds the read half of the
//! transport and runs the inbound loop; the write half, the current pixel
//! format and the encoding registry live behind one mutex, so an outbound
//! state change is atomic with the wire message announcing it. Decoded
//! server messages leave through a bounded channel; when the consumer
//! stops draining it, the dispatcher stops reading and TCP backpressure
//! does the rest.

use crate::client::auth::ClientAuth;
use crate::client::encoding::{Encoding, EncodingRegistry};
use crate::client::handshake;
use crate::client::messages::{
    builtin_parsers, ClientMessage, ServerMessage, ServerMessageParser, SessionState,
};
use crate::error::RfbError;
use crate::protocol::PixelFormat;
use crate::Transport;
use bytes::BytesMut;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::io::{split, AsyncReadExt, AsyncWriteExt, ReadHalf, WriteHalf};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, trace};

type BoxedTransport = Box<dyn Transport>;

/// Immutable session configuration.
///
/// Built once, handed to [`ClientConn::new`], never modified after. The
/// `sink` is where decoded [`ServerMessage`]s are delivered; its capacity
/// bounds how far the dispatcher can run ahead of the consumer.
pub struct ClientConfig {
    pub(crate) auth: Vec<Arc<dyn ClientAuth>>,
    pub(crate) exclusive: bool,
    pub(crate) server_messages: Vec<Arc<dyn ServerMessageParser>>,
    pub(crate) encodings: Vec<Arc<dyn Encoding>>,
    pub(crate) sink: mpsc::Sender<ServerMessage>,
}

impl ClientConfig {
    pub fn new(sink: mpsc::Sender<ServerMessage>) -> Self {
        Self {
            auth: Vec::new(),
            exclusive: false,
            server_messages: Vec::new(),
            encodings: Vec::new(),
            sink,
        }
    }

    /// Adds an authentication method. Order is preference order: the first
    /// method the server also supports is used. At least one method must be
    /// added, [`crate::AuthNone`] included; with none configured the
    /// handshake always fails with [`RfbError::NoAcceptableAuth`].
    pub fn add_auth(mut self, auth: Arc<dyn ClientAuth>) -> Self {
        self.auth.push(auth);
        self
    }

    /// Requests exclusive desktop access: the server disconnects every other
    /// client. Defaults to shared.
    pub fn exclusive(mut self, exclusive: bool) -> Self {
        self.exclusive = exclusive;
        self
    }

    /// Registers a rectangle encoding the client can decode. Raw is always
    /// available whether or not it is added here.
    pub fn add_encoding(mut self, encoding: Arc<dyn Encoding>) -> Self {
        self.encodings.push(encoding);
        self
    }

    /// Registers a parser for a non-standard server message type. A parser
    /// claiming types 0–3 replaces the built-in one.
    pub fn add_server_message(mut self, parser: Arc<dyn ServerMessageParser>) -> Self {
        self.server_messages.push(parser);
        self
    }
}

/// Everything a caller-side operation touches, behind one lock.
struct Outbound {
    writer: WriteHalf<BoxedTransport>,
    pixel_format: PixelFormat,
    encodings: EncodingRegistry,
    closed: bool,
}

impl Outbound {
    /// Frames the message fully, then writes it in one piece so concurrent
    /// operations can never interleave at byte level. A failed write leaves
    /// the connection dead: the stream position is unknowable afterwards.
    async fn send(&mut self, msg: &ClientMessage) -> Result<(), RfbError> {
        if self.closed {
            return Err(RfbError::Closed);
        }

        let mut buf = BytesMut::new();
        msg.write_to(&mut buf);

        let result = async {
            self.writer.write_all(&buf).await?;
            self.writer.flush().await
        }
        .await;

        if let Err(err) = result {
            self.closed = true;
            return Err(RfbError::Transport(err));
        }
        Ok(())
    }
}

/// An established RFB session.
///
/// Created by [`ClientConn::new`], which performs the whole handshake before
/// returning; every method on the returned value is safe to call from any
/// task. Dropping the connection without [`ClientConn::close`] leaves the
/// dispatcher running until the server hangs up.
pub struct ClientConn {
    outbound: Arc<Mutex<Outbound>>,
    width: u16,
    height: u16,
    name: String,
    dispatcher: JoinHandle<()>,
}

impl std::fmt::Debug for ClientConn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConn")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl ClientConn {
    /// Connects over an already-open transport: runs the handshake, spawns
    /// the dispatcher, and returns the ready session.
    ///
    /// The transport is any bidirectional byte stream: a `TcpStream`
    /// canonically, an in-memory duplex in tests. No read deadline is ever
    /// imposed here; a caller that wants one wraps the stream before
    /// handing it in.
    pub async fn new<S>(stream: S, config: ClientConfig) -> Result<Self, RfbError>
    where
        S: Transport + 'static,
    {
        let mut stream: BoxedTransport = Box::new(stream);

        let params = match handshake::run(stream.as_mut(), &config).await {
            Ok(params) => params,
            Err(err) => {
                let _ = stream.shutdown().await;
                return Err(err);
            }
        };

        let (reader, writer) = split(stream);
        let encodings = EncodingRegistry::new(&config.encodings);
        let outbound = Arc::new(Mutex::new(Outbound {
            writer,
            pixel_format: params.pixel_format,
            encodings: encodings.clone(),
            closed: false,
        }));

        let mut parsers: HashMap<u8, Arc<dyn ServerMessageParser>> = HashMap::new();
        for parser in builtin_parsers() {
            parsers.insert(parser.msg_type(), parser);
        }
        for parser in &config.server_messages {
            parsers.insert(parser.msg_type(), Arc::clone(parser));
        }

        let session = SessionState::new(params.pixel_format, encodings);
        let dispatcher = tokio::spawn(dispatch_loop(
            reader,
            Arc::clone(&outbound),
            parsers,
            config.sink,
            session,
        ));

        Ok(Self {
            outbound,
            width: params.width,
            height: params.height,
            name: params.name,
            dispatcher,
        })
    }

    pub fn framebuffer_width(&self) -> u16 {
        self.width
    }

    pub fn framebuffer_height(&self) -> u16 {
        self.height
    }

    pub fn desktop_name(&self) -> &str {
        &self.name
    }

    /// The pixel format currently in effect for decoding.
    pub async fn pixel_format(&self) -> PixelFormat {
        self.outbound.lock().await.pixel_format
    }

    /// A key press or release. `keysym` is an X Window System value; the
    /// usual ones are in [`crate::keysym`]. A tap is a `true` event followed
    /// by a `false` one.
    ///
    /// See RFC 6143 Section 7.5.4.
    pub async fn key_event(&self, keysym: u32, down: bool) -> Result<(), RfbError> {
        self.outbound
            .lock()
            .await
            .send(&ClientMessage::KeyEvent { down, keysym })
            .await
    }

    /// Pointer position and the full button state, mask bits as in
    /// [`crate::button`].
    ///
    /// See RFC 6143 Section 7.5.5.
    pub async fn pointer_event(&self, button_mask: u8, x: u16, y: u16) -> Result<(), RfbError> {
        self.outbound
            .lock()
            .await
            .send(&ClientMessage::PointerEvent { button_mask, x, y })
            .await
    }

    /// Asks the server for the given region. Incremental requests only
    /// yield what changed since the last update; a full request repaints.
    ///
    /// See RFC 6143 Section 7.5.3.
    pub async fn framebuffer_update_request(
        &self,
        incremental: bool,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
    ) -> Result<(), RfbError> {
        self.outbound
            .lock()
            .await
            .send(&ClientMessage::FramebufferUpdateRequest {
                incremental,
                x,
                y,
                width,
                height,
            })
            .await
    }

    /// Switches the pixel format for all subsequent updates. The local
    /// decode state changes under the same lock as the wire send, so no
    /// frame is ever decoded with a format other than the one it was
    /// encoded in, apart from updates the server had already put in flight,
    /// which the protocol itself cannot prevent.
    ///
    /// The format is validated first; a format the decoders cannot handle
    /// is refused before anything reaches the wire, and the session keeps
    /// its current format.
    ///
    /// See RFC 6143 Section 7.5.1.
    pub async fn set_pixel_format(&self, format: PixelFormat) -> Result<(), RfbError> {
        format.validate()?;
        let mut outbound = self.outbound.lock().await;
        outbound
            .send(&ClientMessage::SetPixelFormat(format))
            .await?;
        outbound.pixel_format = format;
        Ok(())
    }

    /// Announces the encodings the client accepts, most preferred first,
    /// and swaps the decode registry to match. Raw stays decodable
    /// regardless, since servers may always fall back to it.
    ///
    /// See RFC 6143 Section 7.5.2.
    pub async fn set_encodings(&self, encodings: Vec<Arc<dyn Encoding>>) -> Result<(), RfbError> {
        let codes: Vec<i32> = encodings.iter().map(|e| e.type_code()).collect();
        let mut outbound = self.outbound.lock().await;
        outbound.send(&ClientMessage::SetEncodings(codes)).await?;
        outbound.encodings = EncodingRegistry::new(&encodings);
        Ok(())
    }

    /// Hands the server new clipboard text.
    ///
    /// See RFC 6143 Section 7.5.6.
    pub async fn client_cut_text(&self, text: impl Into<String>) -> Result<(), RfbError> {
        self.outbound
            .lock()
            .await
            .send(&ClientMessage::ClientCutText(text.into()))
            .await
    }

    /// Tears the session down: shuts the transport and stops the
    /// dispatcher, which closes the sink. Safe to call more than once; the
    /// second call is a no-op. Operations after this fail with
    /// [`RfbError::Closed`].
    pub async fn close(&self) -> Result<(), RfbError> {
        {
            let mut outbound = self.outbound.lock().await;
            if !outbound.closed {
                outbound.closed = true;
                let _ = outbound.writer.shutdown().await;
            }
        }
        self.dispatcher.abort();
        Ok(())
    }
}

/// The inbound loop. Sole owner of the read half and the color map; exits
/// on the first transport error, unparseable message, or sink closure, and
/// marks the connection dead on the way out. The sink sender drops with the
/// task, which is what closes the channel for the consumer.
async fn dispatch_loop(
    mut reader: ReadHalf<BoxedTransport>,
    outbound: Arc<Mutex<Outbound>>,
    parsers: HashMap<u8, Arc<dyn ServerMessageParser>>,
    sink: mpsc::Sender<ServerMessage>,
    mut session: SessionState,
) {
    if let Err(err) = dispatch(&mut reader, &outbound, &parsers, &sink, &mut session).await {
        error!(%err, "dispatcher terminated");
    }
    outbound.lock().await.closed = true;
}

async fn dispatch(
    reader: &mut ReadHalf<BoxedTransport>,
    outbound: &Mutex<Outbound>,
    parsers: &HashMap<u8, Arc<dyn ServerMessageParser>>,
    sink: &mpsc::Sender<ServerMessage>,
    session: &mut SessionState,
) -> Result<(), RfbError> {
    loop {
        let msg_type = match reader.read_u8().await {
            Ok(msg_type) => msg_type,
            Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => {
                debug!("server closed the stream");
                return Ok(());
            }
            Err(err) => return Err(RfbError::Transport(err)),
        };

        let parser = parsers
            .get(&msg_type)
            .ok_or(RfbError::UnknownMessageType(msg_type))?;

        // Snapshot what caller operations may have changed since the last
        // message. Taken before parsing so a SetPixelFormat acknowledged by
        // the server applies to everything decoded from here on.
        {
            let outbound = outbound.lock().await;
            session.pixel_format = outbound.pixel_format;
            session.encodings = outbound.encodings.clone();
        }

        let msg = parser.read(session, &mut *reader).await?;

        trace!(msg_type, "delivering server message");
        if sink.send(msg).await.is_err() {
            debug!("consumer dropped the sink");
            return Ok(());
        }
    }
}
