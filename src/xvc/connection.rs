// SPDX-License-Identifier: MIT OR Apache-2.0
// SPDX-FileCopyrightText: 2025 1BitSquared <info@1bitsquared.com>

use std::io::{ErrorKind, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};

use log::debug;

use crate::bits;
use crate::error::XvcutilError;
use crate::xvc::server_info::ServerInfo;
use crate::xvc::{CMD_GETINFO, CMD_SETTCK, CMD_SHIFT, INFO_REPLY_MAX, INFO_REPLY_MIN};

/// Framing layer for one XVC connection.
///
/// The protocol is strictly one request in flight at a time, so the
/// connection is owned exclusively and every exchange blocks until the full
/// reply is in. Generic over the byte stream so tests can drive it against
/// in-memory stubs; [`XvcConnection::connect`] is the production path.
pub struct XvcConnection<T>
{
	stream: T,
	/// Advertised vector limit, known once `get_info` has run.
	max_vector_bits: Option<usize>,
}

impl XvcConnection<TcpStream>
{
	/// Connect to an XVC server over TCP.
	///
	/// Nagle's algorithm is disabled on the socket: the protocol is a
	/// synchronous request/response exchange of small messages, and delaying
	/// them only stalls the TAP.
	pub fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self, XvcutilError>
	{
		let stream = TcpStream::connect(addr)?;
		stream.set_nodelay(true)?;
		debug!("connected to XVC server at {}", stream.peer_addr()?);
		Ok(Self::from_stream(stream))
	}
}

impl<T: Read + Write> XvcConnection<T>
{
	/// Wrap an already-established byte stream.
	pub fn from_stream(stream: T) -> Self
	{
		Self {
			stream,
			max_vector_bits: None,
		}
	}

	/// Ask the server to describe itself.
	///
	/// The advertised vector limit is retained and enforced on every
	/// subsequent [`XvcConnection::shift_vectors`] call.
	pub fn get_info(&mut self) -> Result<ServerInfo, XvcutilError>
	{
		self.send(CMD_GETINFO)?;
		let reply = self.recv_at_least(INFO_REPLY_MIN, INFO_REPLY_MAX)?;
		let info = ServerInfo::parse(&reply)?;
		debug!("server identifies as {info}");
		self.max_vector_bits = Some(info.max_vector_bits);
		Ok(info)
	}

	/// The server's advertised vector limit, if `get_info` has run.
	pub fn max_vector_bits(&self) -> Option<usize>
	{
		self.max_vector_bits
	}

	/// Clock `nbits` TCK cycles with the given TMS and TDI levels, returning
	/// the TDO levels sampled on each.
	///
	/// `tms` and `tdi` must both be `ceil(nbits / 8)` bytes, LSB first; the
	/// reply vector has the same shape. The TAP state this drives through is
	/// entirely the caller's affair: at this layer the three signals are
	/// just same-length bit vectors clocked together.
	pub fn shift_vectors(&mut self, tms: &[u8], tdi: &[u8], nbits: usize) -> Result<Vec<u8>, XvcutilError>
	{
		let nbytes = bits::bytes_for_bits(nbits);
		debug_assert_eq!(tms.len(), nbytes);
		debug_assert_eq!(tdi.len(), nbytes);
		if let Some(max) = self.max_vector_bits {
			if nbits > max {
				return Err(XvcutilError::VectorTooLarge {
					requested: nbits,
					max,
				});
			}
		}

		debug!("shifting {nbits} bits");
		let mut request = Vec::with_capacity(CMD_SHIFT.len() + 4 + 2 * nbytes);
		request.extend_from_slice(CMD_SHIFT);
		request.extend_from_slice(&(nbits as u32).to_le_bytes());
		request.extend_from_slice(tms);
		request.extend_from_slice(tdi);
		self.send(&request)?;

		self.recv_exact(nbytes)
	}

	/// Request a TCK period in nanoseconds; returns the period the server
	/// actually selected.
	pub fn set_tck_period(&mut self, period_ns: u32) -> Result<u32, XvcutilError>
	{
		let mut request = Vec::with_capacity(CMD_SETTCK.len() + 4);
		request.extend_from_slice(CMD_SETTCK);
		request.extend_from_slice(&period_ns.to_le_bytes());
		self.send(&request)?;

		let mut reply = [0u8; 4];
		self.recv_into(&mut reply)?;
		let actual = u32::from_le_bytes(reply);
		debug!("requested {period_ns}ns TCK period, server selected {actual}ns");
		Ok(actual)
	}

	fn send(&mut self, buffer: &[u8]) -> Result<(), XvcutilError>
	{
		Ok(self.stream.write_all(buffer)?)
	}

	/// Read until the buffer is full, surfacing an orderly shutdown from the
	/// peer as [`XvcutilError::ConnectionClosed`].
	fn recv_into(&mut self, buffer: &mut [u8]) -> Result<(), XvcutilError>
	{
		let mut received = 0;
		while received < buffer.len() {
			match self.stream.read(&mut buffer[received..]) {
				Ok(0) => return Err(XvcutilError::ConnectionClosed),
				Ok(count) => received += count,
				Err(error) if error.kind() == ErrorKind::Interrupted => continue,
				Err(error) => return Err(error.into()),
			}
		}
		Ok(())
	}

	fn recv_exact(&mut self, count: usize) -> Result<Vec<u8>, XvcutilError>
	{
		let mut buffer = vec![0u8; count];
		self.recv_into(&mut buffer)?;
		Ok(buffer)
	}

	/// Read at least `min` bytes and at most `max`, returning however many
	/// arrived. Used for the one reply in the protocol with no length
	/// framing.
	fn recv_at_least(&mut self, min: usize, max: usize) -> Result<Vec<u8>, XvcutilError>
	{
		let mut buffer = vec![0u8; max];
		let mut received = 0;
		while received < min {
			match self.stream.read(&mut buffer[received..]) {
				Ok(0) => return Err(XvcutilError::ConnectionClosed),
				Ok(count) => received += count,
				Err(error) if error.kind() == ErrorKind::Interrupted => continue,
				Err(error) => return Err(error.into()),
			}
		}
		buffer.truncate(received);
		Ok(buffer)
	}
}

#[cfg(test)]
mod tests
{
	use std::collections::VecDeque;
	use std::io;

	use super::*;

	/// A peer with pre-scripted replies that records what the client sent.
	struct Scripted
	{
		sent: Vec<u8>,
		replies: VecDeque<u8>,
		/// Upper bound on bytes returned per read call, to exercise the
		/// partial-read retry loops.
		read_chunk: usize,
	}

	impl Scripted
	{
		fn replying(replies: &[u8]) -> Self
		{
			Self {
				sent: Vec::new(),
				replies: replies.iter().copied().collect(),
				read_chunk: usize::MAX,
			}
		}
	}

	impl Read for Scripted
	{
		fn read(&mut self, buffer: &mut [u8]) -> io::Result<usize>
		{
			let count = buffer.len().min(self.replies.len()).min(self.read_chunk);
			for slot in buffer[..count].iter_mut() {
				*slot = self.replies.pop_front().unwrap();
			}
			Ok(count)
		}
	}

	impl Write for Scripted
	{
		fn write(&mut self, buffer: &[u8]) -> io::Result<usize>
		{
			self.sent.extend_from_slice(buffer);
			Ok(buffer.len())
		}

		fn flush(&mut self) -> io::Result<()>
		{
			Ok(())
		}
	}

	#[test]
	fn info_exchange()
	{
		let mut connection = XvcConnection::from_stream(Scripted::replying(b"xvcServer_v1.0:2048\n"));
		let info = connection.get_info().unwrap();
		assert_eq!(info.name, "xvcServer_v1.0");
		assert_eq!(info.max_vector_bits, 2048);
		assert_eq!(connection.max_vector_bits(), Some(2048));
		assert_eq!(connection.stream.sent, b"getinfo:");
	}

	#[test]
	fn shift_frames_and_decodes()
	{
		// A loopback peer would echo TDI back as TDO
		let mut connection = XvcConnection::from_stream(Scripted::replying(&[0b110]));
		let tdo = connection.shift_vectors(&[0b101], &[0b110], 3).unwrap();
		assert_eq!(tdo, [0b110]);

		let mut expected = b"shift:".to_vec();
		expected.extend_from_slice(&3u32.to_le_bytes());
		expected.extend_from_slice(&[0b101, 0b110]);
		assert_eq!(connection.stream.sent, expected);
	}

	#[test]
	fn shift_reassembles_fragmented_replies()
	{
		let mut stub = Scripted::replying(&[0x93, 0xd0, 0x62, 0x03]);
		stub.read_chunk = 1;
		let mut connection = XvcConnection::from_stream(stub);
		let tdo = connection.shift_vectors(&[0; 4], &[0; 4], 32).unwrap();
		assert_eq!(tdo, [0x93, 0xd0, 0x62, 0x03]);
	}

	#[test]
	fn advertised_limit_is_enforced()
	{
		let mut connection = XvcConnection::from_stream(Scripted::replying(b"xvcServer_v1.0:16\n"));
		connection.get_info().unwrap();
		let sent_before = connection.stream.sent.len();

		let err = connection.shift_vectors(&[0; 4], &[0; 4], 32).unwrap_err();
		assert!(matches!(err, XvcutilError::VectorTooLarge {
			requested: 32,
			max: 16
		}));
		// The oversized request never reaches the wire
		assert_eq!(connection.stream.sent.len(), sent_before);
	}

	#[test]
	fn peer_shutdown_is_connection_closed()
	{
		let mut connection = XvcConnection::from_stream(Scripted::replying(&[0x55]));
		let err = connection.shift_vectors(&[0; 2], &[0; 2], 16).unwrap_err();
		assert!(matches!(err, XvcutilError::ConnectionClosed));
	}

	#[test]
	fn tck_period_negotiation()
	{
		let mut connection = XvcConnection::from_stream(Scripted::replying(&10000u32.to_le_bytes()));
		let actual = connection.set_tck_period(9990).unwrap();
		assert_eq!(actual, 10000);

		let mut expected = b"settck:".to_vec();
		expected.extend_from_slice(&9990u32.to_le_bytes());
		assert_eq!(connection.stream.sent, expected);
	}
}
