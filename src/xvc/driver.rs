// SPDX-License-Identifier: MIT OR Apache-2.0
// SPDX-FileCopyrightText: 2025 1BitSquared <info@1bitsquared.com>

use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};

use log::debug;

use crate::bits;
use crate::error::XvcutilError;
use crate::xvc::connection::XvcConnection;
use crate::xvc::server_info::ServerInfo;

/// TMS patterns for the standard TAP sequencing idioms, LSB first.
///
/// Reset holds TMS high for 5 clocks, which lands in TestLogicReset from any
/// state, then one low clock into RunTestIdle. The two entry patterns walk
/// from RunTestIdle through the matching Capture state so that the next
/// shifted bit is the first scan bit.
const TMS_RESET_TO_IDLE: (u8, usize) = (0b01_1111, 6);
const TMS_ENTER_SHIFT_IR: (u8, usize) = (0b0011, 4);
const TMS_ENTER_SHIFT_DR: (u8, usize) = (0b001, 3);

/// Bits flooded through the instruction path when probing its length. Any
/// real instruction register is far shorter than this.
const IR_PROBE_BITS: usize = 1024;

/// Drives a remote TAP through the standard JTAG bring-up and scan idioms.
///
/// The driver owns its connection: the wire protocol cannot interleave
/// requests, so sharing one connection between drivers is never sound.
pub struct XvcTapDriver<T>
{
	connection: XvcConnection<T>,
	info: ServerInfo,
	/// Probed instruction register width, filled in on first use.
	ir_length: Option<usize>,
}

impl XvcTapDriver<TcpStream>
{
	/// Connect to an XVC server over TCP and query its capabilities.
	pub fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self, XvcutilError>
	{
		Self::new(XvcConnection::connect(addr)?)
	}
}

impl<T: Read + Write> XvcTapDriver<T>
{
	/// Take ownership of a connection and perform the opening `getinfo:`
	/// exchange, so every later shift is checked against the server's limit.
	pub fn new(mut connection: XvcConnection<T>) -> Result<Self, XvcutilError>
	{
		let info = connection.get_info()?;
		Ok(Self {
			connection,
			info,
			ir_length: None,
		})
	}

	/// The server description captured at connection time.
	pub fn server_info(&self) -> &ServerInfo
	{
		&self.info
	}

	/// Request a TCK period in nanoseconds; returns the period the server
	/// actually selected.
	pub fn set_tck_period(&mut self, period_ns: u32) -> Result<u32, XvcutilError>
	{
		self.connection.set_tck_period(period_ns)
	}

	/// Put the TAP in RunTestIdle from any state.
	pub fn reset_to_idle(&mut self) -> Result<(), XvcutilError>
	{
		debug!("resetting TAP to Run-Test/Idle");
		self.clock_tms(TMS_RESET_TO_IDLE)
	}

	/// From RunTestIdle, enter ShiftIR; the instruction register has
	/// captured and the next shifted bit is scan bit 0.
	pub fn select_ir(&mut self) -> Result<(), XvcutilError>
	{
		debug!("selecting instruction register");
		self.clock_tms(TMS_ENTER_SHIFT_IR)
	}

	/// From RunTestIdle, enter ShiftDR; the selected data register has
	/// captured and the next shifted bit is scan bit 0.
	pub fn select_dr(&mut self) -> Result<(), XvcutilError>
	{
		debug!("selecting data register");
		self.clock_tms(TMS_ENTER_SHIFT_DR)
	}

	fn clock_tms(&mut self, (pattern, nbits): (u8, usize)) -> Result<(), XvcutilError>
	{
		self.connection.shift_vectors(&[pattern], &[0], nbits)?;
		Ok(())
	}

	/// Shift `nbits` bits of `data` through the register selected by the
	/// current Shift state, returning the bits shifted out.
	///
	/// With `with_update` false, TMS is held low throughout and the TAP
	/// stays in the Shift state for the caller to continue. With it true,
	/// two extra clocks are appended with TMS high on the last data bit and
	/// the Exit1 state, so the scan commits and the TAP returns to
	/// RunTestIdle; the reply is masked back down to `nbits` bits to drop
	/// the two synthetic trailing samples.
	pub fn shift(&mut self, data: &[u8], nbits: usize, with_update: bool) -> Result<Vec<u8>, XvcutilError>
	{
		if nbits == 0 {
			return Ok(Vec::new());
		}
		let total = if with_update { nbits + 2 } else { nbits };

		let mut tms = vec![0u8; bits::bytes_for_bits(total)];
		if with_update {
			bits::set_bit(&mut tms, nbits - 1, true);
			bits::set_bit(&mut tms, nbits, true);
		}
		let mut tdi = data.to_vec();
		tdi.resize(bits::bytes_for_bits(total), 0);

		let mut tdo = self.connection.shift_vectors(&tms, &tdi, total)?;
		if with_update {
			bits::mask_to(&mut tdo, nbits);
		}
		Ok(tdo)
	}

	/// Read the 32-bit device ID code.
	///
	/// TestLogicReset loads the IDCODE instruction, so the register captured
	/// on DR entry is the ID register. The captured value is immediately
	/// shifted back in with an update so the register ends holding what it
	/// started with.
	pub fn read_idcode(&mut self) -> Result<u32, XvcutilError>
	{
		self.reset_to_idle()?;
		self.select_dr()?;
		let idcode = self.shift(&[0; 4], 32, false)?;
		self.shift(&idcode, 32, true)?;
		let value = bits::vec_to_word(&idcode) as u32;
		debug!("read ID code {value:#010x}");
		Ok(value)
	}

	/// Discover the instruction register's width.
	///
	/// Capture latches the mandatory fixed 1 into IR bit 0, so flooding the
	/// path with ones and then shifting zeros through reads back a reply of
	/// exactly `2^length - 1`: the flushed ones terminate where the captured
	/// 1 re-enters. The width is recovered as `floor(log2(reply + 1))` and
	/// cached, so repeated calls make no wire traffic.
	pub fn probe_ir_length(&mut self) -> Result<usize, XvcutilError>
	{
		if let Some(length) = self.ir_length {
			return Ok(length);
		}

		self.reset_to_idle()?;
		self.select_ir()?;
		self.shift(&bits::ones(IR_PROBE_BITS), IR_PROBE_BITS, false)?;
		let mut flushed = self.shift(&[0; bits::bytes_for_bits(IR_PROBE_BITS)], IR_PROBE_BITS, true)?;

		bits::increment(&mut flushed);
		let length = bits::bit_length(&flushed).saturating_sub(1);
		debug!("instruction register is {length} bits");
		self.ir_length = Some(length);
		Ok(length)
	}
}
