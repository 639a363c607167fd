use thiserror::Error;

/// Handshake phase in which an I/O failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakePhase {
    Version,
    Security,
    SecurityResult,
    ClientInit,
    ServerInit,
}

impl std::fmt::Display for HandshakePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            HandshakePhase::Version => "ProtocolVersion",
            HandshakePhase::Security => "Security",
            HandshakePhase::SecurityResult => "SecurityResult",
            HandshakePhase::ClientInit => "ClientInit",
            HandshakePhase::ServerInit => "ServerInit",
        };
        f.write_str(name)
    }
}

/// All errors surfaced by this crate.
#[derive(Debug, Error)]
pub enum RfbError {
    /// Underlying transport failed. Recoverable only by session teardown.
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// The transport reached end-of-stream before a full frame was read.
    #[error("unexpected end of stream")]
    Truncated,

    /// A transport failure during connection setup, tagged with the phase
    /// that was interrupted.
    #[error("{phase} handshake failed: {source}")]
    Handshake {
        phase: HandshakePhase,
        #[source]
        source: Box<RfbError>,
    },

    /// The peer broke protocol framing or used a reserved value.
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),

    /// The server advertised a protocol version outside the supported range.
    #[error("unsupported protocol version {major}.{minor}")]
    UnsupportedVersion { major: u32, minor: u32 },

    /// None of the configured authentication methods overlap with what the
    /// server offers.
    #[error("no acceptable authentication method, server offered {offered:?}")]
    NoAcceptableAuth { offered: Vec<u8> },

    /// The server rejected the authentication attempt.
    #[error("authentication failed: {reason}")]
    AuthFailed { reason: String },

    /// The server refused the connection before authentication.
    #[error("server refused connection: {reason}")]
    ServerRefused { reason: String },

    /// A rectangle referenced an encoding missing from the registry.
    #[error("unknown encoding type {0}")]
    UnknownEncoding(i32),

    /// The server sent a message type no parser is registered for.
    #[error("unknown server message type {0}")]
    UnknownMessageType(u8),

    /// A paletted pixel indexed a color-map entry that was never set.
    #[error("palette index {0} is not set in the color map")]
    PaletteOutOfRange(u32),

    /// The operation was attempted on a torn-down connection.
    #[error("connection closed")]
    Closed,
}

impl RfbError {
    /// Maps an I/O error onto the wire-level taxonomy: a clean EOF in the
    /// middle of a frame is [`RfbError::Truncated`], everything else is
    /// [`RfbError::Transport`].
    pub(crate) fn from_io(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            RfbError::Truncated
        } else {
            RfbError::Transport(err)
        }
    }
}
