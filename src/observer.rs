// SPDX-License-Identifier: MIT OR Apache-2.0
// SPDX-FileCopyrightText: 2025 1BitSquared <info@1bitsquared.com>

//! Passive reconstruction of boundary-scan traffic from a captured TMS/TDI
//! bit stream.
//!
//! [`JtagObserver`] replays the trace through a TAP state machine and a pair
//! of scan registers, committing what the traced device would have
//! committed. The data register is only tracked while the instruction
//! register holds the user instruction code, which is how a design-specific
//! user register hides behind the instruction decode on real silicon. Every
//! committed user DR value is surfaced as a [`DrUpdate`] event.

use std::fmt;

use log::{debug, trace};

use crate::bits;
use crate::error::XvcutilError;
use crate::shift_register::ShiftRegister;
use crate::tap::{TapAction, TapState};

/// One committed user data register value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrUpdate
{
	/// Number of bits the scan shifted.
	pub bits: usize,
	/// The committed value, LSB first.
	pub data: Vec<u8>,
}

impl fmt::Display for DrUpdate
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		write!(f, "DR[{}]: {}", self.bits, bits::hex_str(&self.data))
	}
}

/// Decoder for an observed TMS/TDI stream.
#[derive(Debug)]
pub struct JtagObserver
{
	state: TapState,
	ir: ShiftRegister,
	dr: ShiftRegister,
	user_code: Vec<u8>,
}

impl JtagObserver
{
	/// Instruction register width of the reference RTL design.
	pub const DEFAULT_IR_LENGTH: usize = 10;
	/// Instruction code that exposes the user data register there.
	pub const DEFAULT_USER_CODE: u64 = 0x3c2;

	/// An observer for a TAP with an `ir_length`-bit instruction register
	/// whose user data register sits behind instruction `user_code`.
	///
	/// Fails unless `ir_length` is between 1 and 64 bits and `user_code`
	/// fits in `ir_length` bits.
	pub fn new(ir_length: usize, user_code: u64) -> Result<Self, XvcutilError>
	{
		if ir_length == 0 || ir_length > u64::BITS as usize {
			return Err(XvcutilError::InvalidIrLength {
				requested: ir_length,
			});
		}
		if ir_length < u64::BITS as usize && user_code >> ir_length != 0 {
			return Err(XvcutilError::UserCodeTooWide {
				code: user_code,
				ir_length,
			});
		}
		Ok(Self::build(ir_length, user_code))
	}

	fn build(ir_length: usize, user_code: u64) -> Self
	{
		Self {
			state: TapState::TestLogicReset,
			ir: ShiftRegister::with_expected_length(ir_length),
			dr: ShiftRegister::new(),
			user_code: bits::word_to_vec(user_code, ir_length),
		}
	}

	/// The state the TAP was left in by the last processed edge.
	pub fn state(&self) -> TapState
	{
		self.state
	}

	/// True while the last committed instruction is the user code.
	pub fn is_user_selected(&self) -> bool
	{
		self.ir.value() == self.user_code
	}

	/// Return the TAP to TestLogicReset, as five TMS-high clocks would.
	///
	/// Committed register values survive, so one observer can be reused
	/// across traces that are themselves separated by a TAP reset.
	pub fn reset(&mut self)
	{
		self.state = TapState::TestLogicReset;
	}

	/// Process one TCK rising edge.
	///
	/// Returns the decoded event if this edge committed the user data
	/// register. Fails with [`XvcutilError::LengthMismatch`] if the traced
	/// stream commits an instruction scan of the wrong width, which means
	/// the trace and the configured IR length disagree.
	pub fn process_bit(&mut self, tms: bool, tdi: bool) -> Result<Option<DrUpdate>, XvcutilError>
	{
		let (next, action) = self.state.advance(tms);
		trace!("tms={} tdi={}: {:?} -> {next:?}", u8::from(tms), u8::from(tdi), self.state);
		self.state = next;

		match action {
			TapAction::CaptureIR => self.ir.capture(),
			TapAction::ShiftIR => self.ir.shift(tdi),
			TapAction::UpdateIR => {
				self.ir.update()?;
				debug!(
					"IR now {} (user register {})",
					bits::hex_str(self.ir.value()),
					if self.is_user_selected() { "selected" } else { "deselected" }
				);
			},
			TapAction::CaptureDR if self.is_user_selected() => self.dr.capture(),
			TapAction::ShiftDR if self.is_user_selected() => self.dr.shift(tdi),
			TapAction::UpdateDR if self.is_user_selected() => {
				self.dr.update()?;
				let event = DrUpdate {
					bits: self.dr.length(),
					data: self.dr.value().to_vec(),
				};
				debug!("new {event}");
				return Ok(Some(event));
			},
			_ => {},
		}
		Ok(None)
	}

	/// Process one recorded sample of `nbits` edges packed LSB first into a
	/// TMS word and a TDI word, in increasing bit order. Edges past bit 63
	/// have no packed bit and clock in with both lines low.
	pub fn process_word(&mut self, tms: u64, tdi: u64, nbits: u32) -> Result<Vec<DrUpdate>, XvcutilError>
	{
		let mut events = Vec::new();
		for index in 0..nbits {
			let tms_bit = index < u64::BITS && (tms >> index) & 1 != 0;
			let tdi_bit = index < u64::BITS && (tdi >> index) & 1 != 0;
			events.extend(self.process_bit(tms_bit, tdi_bit)?);
		}
		Ok(events)
	}
}

impl Default for JtagObserver
{
	fn default() -> Self
	{
		Self::build(Self::DEFAULT_IR_LENGTH, Self::DEFAULT_USER_CODE)
	}
}
