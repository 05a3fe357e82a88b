// SPDX-License-Identifier: MIT OR Apache-2.0
// SPDX-FileCopyrightText: 2025 1BitSquared <info@1bitsquared.com>

//! Client side of the XVC (Xilinx Virtual Cable) wire protocol.
//!
//! The protocol is a strict request/response exchange of three commands
//! (`getinfo:`, `settck:`, `shift:`) over a byte stream, conventionally TCP.
//! [`connection::XvcConnection`] does the framing; [`driver::XvcTapDriver`]
//! layers the JTAG TAP sequencing idioms on top of it.

pub mod connection;
pub mod driver;
pub mod server_info;

pub use connection::XvcConnection;
pub use driver::XvcTapDriver;
pub use server_info::ServerInfo;

/// TCP port XVC servers conventionally listen on.
pub const XVC_DEFAULT_PORT: u16 = 2542;

pub(crate) const CMD_GETINFO: &[u8] = b"getinfo:";
pub(crate) const CMD_SETTCK: &[u8] = b"settck:";
pub(crate) const CMD_SHIFT: &[u8] = b"shift:";

/// The `getinfo:` reply has no length framing; servers send one short ASCII
/// line. Read until at least the minimum is in hand, never past the maximum.
pub(crate) const INFO_REPLY_MIN: usize = 10;
pub(crate) const INFO_REPLY_MAX: usize = 100;
