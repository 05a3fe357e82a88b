// SPDX-License-Identifier: MIT OR Apache-2.0
// SPDX-FileCopyrightText: 2025 1BitSquared <info@1bitsquared.com>

use std::fmt;

use bstr::ByteSlice;

use crate::error::XvcutilError;

/// The server's `getinfo:` self-description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerInfo
{
	/// Server name and protocol version, e.g. `xvcServer_v1.0`.
	pub name: String,

	/// Largest vector the server will shift in one request, in bits.
	pub max_vector_bits: usize,
}

impl ServerInfo
{
	/// Parse a `<name>:<maxVectorBits>` reply.
	///
	/// The reference server terminates the reply with a newline; any
	/// whitespace around the width field is tolerated.
	pub fn parse(reply: &[u8]) -> Result<Self, XvcutilError>
	{
		let malformed = || XvcutilError::MalformedServerInfo {
			reply: reply.as_bstr().to_string(),
		};

		let (name, width) = reply.split_once_str(":").ok_or_else(malformed)?;
		let name = name.to_str().map_err(|_| malformed())?.to_string();
		let max_vector_bits = width
			.trim()
			.to_str()
			.ok()
			.and_then(|width| width.parse().ok())
			.ok_or_else(malformed)?;

		Ok(Self {
			name,
			max_vector_bits,
		})
	}
}

impl fmt::Display for ServerInfo
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		write!(f, "{} (vectors up to {} bits)", self.name, self.max_vector_bits)
	}
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn reference_server_reply()
	{
		let info = ServerInfo::parse(b"xvcServer_v1.0:2048\n").unwrap();
		assert_eq!(info.name, "xvcServer_v1.0");
		assert_eq!(info.max_vector_bits, 2048);
	}

	#[test]
	fn reply_without_newline()
	{
		let info = ServerInfo::parse(b"xvcServer_v1.0:512").unwrap();
		assert_eq!(info.max_vector_bits, 512);
	}

	#[test]
	fn missing_separator()
	{
		let err = ServerInfo::parse(b"xvcServer_v1.0 2048\n").unwrap_err();
		assert!(matches!(err, XvcutilError::MalformedServerInfo { .. }));
	}

	#[test]
	fn non_numeric_width()
	{
		assert!(ServerInfo::parse(b"xvcServer_v1.0:lots\n").is_err());
		assert!(ServerInfo::parse(b"xvcServer_v1.0:\n").is_err());
	}

	#[test]
	fn display_names_the_server()
	{
		let info = ServerInfo::parse(b"xvcServer_v1.0:1024\n").unwrap();
		assert_eq!(info.to_string(), "xvcServer_v1.0 (vectors up to 1024 bits)");
	}
}
