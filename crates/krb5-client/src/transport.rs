use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::time::Duration;

/// One blocking request/reply round trip to the KDC.
///
/// This is the client's only suspension point. Cancellation and timeouts
/// belong to the implementor; a failed call surfaces as an error and leaves
/// the client's session and cache untouched.
pub trait KdcTransport {
    fn send(&mut self, request: &[u8]) -> io::Result<Vec<u8>>;
}

/// KDC transport over TCP (RFC 4120 section 7.2.2): each message is
/// prefixed with its length as four big-endian octets.
#[derive(Debug, Clone)]
pub struct TcpKdcTransport {
    kdc: String,
    timeout: Duration,
}

impl TcpKdcTransport {
    pub fn new(kdc: impl Into<String>, timeout: Duration) -> Self {
        Self {
            kdc: kdc.into(),
            timeout,
        }
    }
}

impl KdcTransport for TcpKdcTransport {
    fn send(&mut self, request: &[u8]) -> io::Result<Vec<u8>> {
        let mut stream = TcpStream::connect(&self.kdc)?;
        stream.set_read_timeout(Some(self.timeout))?;
        stream.set_write_timeout(Some(self.timeout))?;

        let request_len = u32::try_from(request.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "request too large for the TCP framing"))?;

        stream.write_all(&request_len.to_be_bytes())?;
        stream.write_all(request)?;
        stream.flush()?;

        let mut reply_len = [0; 4];
        stream.read_exact(&mut reply_len)?;

        let mut reply = vec![0; u32::from_be_bytes(reply_len) as usize];
        stream.read_exact(&mut reply)?;

        Ok(reply)
    }
}
