//! The connection-setup state machine.
//!
//! ProtocolVersion → Security → SecurityResult → ClientInit → ServerInit,
//! exactly as RFC 6143 Section 7.1–7.3 orders them for protocol 3.8. The
//! whole sequence runs synchronously on the caller before the dispatcher
//! exists, so nothing here needs a lock.

use crate::client::auth::ClientAuth;
use crate::client::connection::ClientConfig;
use crate::codec::{WireRead, WireWrite};
use crate::error::{HandshakePhase, RfbError};
use crate::protocol::{PixelFormat, ProtocolVersion};
use crate::Transport;
use std::sync::Arc;
use tracing::{debug, info, trace};

/// What ServerInit handed over; fixed for the life of the session apart
/// from the pixel format, which `set_pixel_format` may later replace.
pub(crate) struct SessionParams {
    pub(crate) width: u16,
    pub(crate) height: u16,
    pub(crate) pixel_format: PixelFormat,
    pub(crate) name: String,
}

/// Tags transport-level failures with the phase they interrupted. Semantic
/// failures (version gates, refused auth, ...) pass through untouched since
/// the phase is already implied by their kind.
fn in_phase(phase: HandshakePhase) -> impl Fn(RfbError) -> RfbError {
    move |err| match err {
        err @ (RfbError::Transport(_) | RfbError::Truncated) => RfbError::Handshake {
            phase,
            source: Box::new(err),
        },
        other => other,
    }
}

pub(crate) async fn run(
    stream: &mut dyn Transport,
    config: &ClientConfig,
) -> Result<SessionParams, RfbError> {
    use HandshakePhase::*;

    // 7.1.1 ProtocolVersion.
    let version = ProtocolVersion::read(stream).await.map_err(in_phase(Version))?;
    trace!(major = version.major, minor = version.minor, "server version");
    if !version.is_supported() {
        return Err(RfbError::UnsupportedVersion {
            major: version.major,
            minor: version.minor,
        });
    }
    ProtocolVersion::write_reply(stream)
        .await
        .map_err(in_phase(Version))?;

    // 7.1.2 Security. Zero offered types means the server is refusing the
    // connection and follows up with a reason string.
    let num_types = stream.read_wire_u8().await.map_err(in_phase(Security))?;
    if num_types == 0 {
        let reason = stream
            .read_wire_string()
            .await
            .map_err(in_phase(Security))?;
        return Err(RfbError::ServerRefused { reason });
    }
    let offered = stream
        .read_wire_bytes(usize::from(num_types))
        .await
        .map_err(in_phase(Security))?;
    trace!(?offered, "server security types");

    let auth = select_auth(&config.auth, &offered)?;
    debug!(security_type = auth.security_type(), "authenticating");
    stream
        .write_wire_u8(auth.security_type())
        .await
        .map_err(in_phase(Security))?;
    auth.handshake(stream).await.map_err(in_phase(Security))?;

    // 7.1.3 SecurityResult.
    match stream
        .read_wire_u32()
        .await
        .map_err(in_phase(SecurityResult))?
    {
        0 => {}
        1 => {
            let reason = stream
                .read_wire_string()
                .await
                .map_err(in_phase(SecurityResult))?;
            return Err(RfbError::AuthFailed { reason });
        }
        other => {
            return Err(RfbError::ProtocolViolation(format!(
                "security result {other} is neither OK nor failed"
            )));
        }
    }

    // 7.3.1 ClientInit. Shared unless the config wants everyone else
    // disconnected.
    stream
        .write_wire_u8(u8::from(!config.exclusive))
        .await
        .map_err(in_phase(ClientInit))?;

    // 7.3.2 ServerInit.
    let width = stream.read_wire_u16().await.map_err(in_phase(ServerInit))?;
    let height = stream.read_wire_u16().await.map_err(in_phase(ServerInit))?;
    let pixel_format = PixelFormat::read(stream).await.map_err(in_phase(ServerInit))?;
    let name = stream
        .read_wire_string()
        .await
        .map_err(in_phase(ServerInit))?;

    info!(width, height, name = %name, "session established");
    Ok(SessionParams {
        width,
        height,
        pixel_format,
        name,
    })
}

/// Picks the authentication method: first entry of the *client's* list that
/// the server also offers, so configuration order expresses preference. A
/// config with no methods can never match, so even an open server is
/// rejected until the caller opts in with [`crate::AuthNone`].
fn select_auth(
    configured: &[Arc<dyn ClientAuth>],
    offered: &[u8],
) -> Result<Arc<dyn ClientAuth>, RfbError> {
    configured
        .iter()
        .find(|auth| offered.contains(&auth.security_type()))
        .cloned()
        .ok_or_else(|| RfbError::NoAcceptableAuth {
            offered: offered.to_vec(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::auth::{AuthNone, VncAuth};

    #[test]
    fn client_order_wins_over_server_order() {
        let configured: Vec<Arc<dyn ClientAuth>> =
            vec![Arc::new(VncAuth::new("pw")), Arc::new(AuthNone)];
        // Server prefers None, client prefers VNC authentication.
        let chosen = select_auth(&configured, &[1, 2]).unwrap();
        assert_eq!(chosen.security_type(), 2);
    }

    #[test]
    fn no_overlap_reports_the_server_list() {
        let configured: Vec<Arc<dyn ClientAuth>> = vec![Arc::new(AuthNone)];
        let err = select_auth(&configured, &[2, 19]).unwrap_err();
        assert!(matches!(
            err,
            RfbError::NoAcceptableAuth { offered } if offered == vec![2, 19]
        ));
    }

    #[test]
    fn empty_config_matches_nothing() {
        // Even a server that would allow anonymous access is rejected when
        // the caller configured no methods at all.
        let err = select_auth(&[], &[1, 2]).unwrap_err();
        assert!(matches!(
            err,
            RfbError::NoAcceptableAuth { offered } if offered == vec![1, 2]
        ));
    }
}
