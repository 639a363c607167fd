use crate::codec::{WireRead, WireWrite};
use crate::error::RfbError;
use tokio::io::{AsyncRead, AsyncWrite};

/// The 12-byte version banner the client always answers with.
const CLIENT_VERSION: &[u8; 12] = b"RFB 003.008\n";

/// A parsed `"RFB xxx.yyy\n"` banner.
///
/// Servers report all kinds of values here (OS X screen sharing announces
/// 3.889); anything that is 3.8 or newer within major 3 speaks the 3.8
/// handshake and is accepted as such.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolVersion {
    pub major: u32,
    pub minor: u32,
}

impl ProtocolVersion {
    /// Parses the exact wire form: `RFB `, three digits, `.`, three digits,
    /// newline. Anything looser is a framing error.
    pub fn from_wire(banner: &[u8; 12]) -> Result<Self, RfbError> {
        let malformed = || {
            RfbError::ProtocolViolation(format!(
                "malformed version banner {:?}",
                String::from_utf8_lossy(banner)
            ))
        };

        if &banner[0..4] != b"RFB " || banner[7] != b'.' || banner[11] != b'\n' {
            return Err(malformed());
        }

        let field = |bytes: &[u8]| -> Result<u32, RfbError> {
            let mut val = 0u32;
            for &b in bytes {
                if !b.is_ascii_digit() {
                    return Err(malformed());
                }
                val = val * 10 + u32::from(b - b'0');
            }
            Ok(val)
        };

        Ok(Self {
            major: field(&banner[4..7])?,
            minor: field(&banner[8..11])?,
        })
    }

    /// Whether the server side of the 3.8 handshake can be spoken.
    pub fn is_supported(&self) -> bool {
        self.major == 3 && self.minor >= 8
    }

    pub(crate) async fn read<S>(reader: &mut S) -> Result<Self, RfbError>
    where
        S: AsyncRead + Unpin + ?Sized,
    {
        let mut banner = [0u8; 12];
        reader.read_exact_into(&mut banner).await?;
        Self::from_wire(&banner)
    }

    /// Answers the banner. The reply is always 3.8 regardless of what the
    /// server advertised above it.
    pub(crate) async fn write_reply<S>(writer: &mut S) -> Result<(), RfbError>
    where
        S: AsyncWrite + Unpin + ?Sized,
    {
        writer.write_wire_bytes(CLIENT_VERSION).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Result<ProtocolVersion, RfbError> {
        let banner: [u8; 12] = s.as_bytes().try_into().expect("12-byte fixture");
        ProtocolVersion::from_wire(&banner)
    }

    #[test]
    fn parses_standard_banner() {
        let v = parse("RFB 003.008\n").unwrap();
        assert_eq!((v.major, v.minor), (3, 8));
        assert!(v.is_supported());
    }

    #[test]
    fn accepts_os_x_banner() {
        let v = parse("RFB 003.889\n").unwrap();
        assert_eq!((v.major, v.minor), (3, 889));
        assert!(v.is_supported());
    }

    #[test]
    fn old_versions_are_unsupported() {
        assert!(!parse("RFB 003.007\n").unwrap().is_supported());
        assert!(!parse("RFB 003.003\n").unwrap().is_supported());
        assert!(!parse("RFB 002.009\n").unwrap().is_supported());
        assert!(!parse("RFB 000.000\n").unwrap().is_supported());
    }

    #[test]
    fn rejects_unpadded_banner() {
        // "RFB 3.8\n" style banners are not zero padded and never valid.
        assert!(matches!(
            parse("RFB 3.8\n    "),
            Err(RfbError::ProtocolViolation(_))
        ));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            parse("HTTP/1.1 200"),
            Err(RfbError::ProtocolViolation(_))
        ));
    }
}
