pub mod auth;
pub mod connection;
pub mod encoding;
pub(crate) mod handshake;
pub mod messages;

pub use auth::{AuthNone, ClientAuth, VncAuth};
pub use connection::{ClientConfig, ClientConn};
pub use encoding::{Encoding, RawEncoding};
pub use messages::{
    ColorMapUpdate, FramebufferUpdate, ServerMessage, ServerMessageParser, SessionState,
};
