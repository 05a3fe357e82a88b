// SPDX-License-Identifier: MIT OR Apache-2.0
// SPDX-FileCopyrightText: 2025 1BitSquared <info@1bitsquared.com>

//! A scan-chain shift register as the TAP sees it: capture opens a scan,
//! shift accumulates bits serially, update commits the accumulated value.

use crate::bits;
use crate::error::XvcutilError;

/// One scan register (IR or DR) with capture/shift/update semantics.
///
/// The in-progress accumulator and the last committed value are held
/// separately, so a scan abandoned before update leaves the committed value
/// untouched. Registers constructed with a nonzero expected width refuse to
/// commit a scan of any other length.
#[derive(Debug, Clone, Default)]
pub struct ShiftRegister
{
	/// Last committed value, LSB first, `bits::bytes_for_bits(length)` bytes.
	value: Vec<u8>,
	/// Bit width of the last committed value.
	length: usize,
	/// Scan in progress since the last capture.
	accumulator: Vec<u8>,
	/// Bits shifted since the last capture.
	position: usize,
	/// Required scan width, or zero for unchecked.
	expected_length: usize,
}

impl ShiftRegister
{
	/// A register that commits scans of any length.
	pub fn new() -> Self
	{
		Self::default()
	}

	/// A register that only commits scans of exactly `expected_length` bits.
	pub fn with_expected_length(expected_length: usize) -> Self
	{
		Self {
			expected_length,
			..Self::default()
		}
	}

	/// Begin a scan, discarding any bits accumulated since the last capture.
	pub fn capture(&mut self)
	{
		self.accumulator.clear();
		self.position = 0;
	}

	/// Clock one bit into the accumulator at the current position (LSB
	/// first) and advance the position.
	pub fn shift(&mut self, bit: bool)
	{
		if self.accumulator.len() < bits::bytes_for_bits(self.position + 1) {
			self.accumulator.push(0);
		}
		bits::set_bit(&mut self.accumulator, self.position, bit);
		self.position += 1;
	}

	/// Commit the accumulated scan as the register's value.
	///
	/// Fails with [`XvcutilError::LengthMismatch`] if the register has a
	/// fixed expected width and the scan clocked a different number of bits.
	/// The committed value is untouched on failure.
	pub fn update(&mut self) -> Result<(), XvcutilError>
	{
		if self.expected_length != 0 && self.position != self.expected_length {
			return Err(XvcutilError::LengthMismatch {
				expected: self.expected_length,
				actual: self.position,
			});
		}
		self.value = self.accumulator.clone();
		self.length = self.position;
		Ok(())
	}

	/// The last committed value, LSB first. Empty before the first commit.
	pub fn value(&self) -> &[u8]
	{
		&self.value
	}

	/// Bit width of the last committed value. Zero before the first commit.
	pub fn length(&self) -> usize
	{
		self.length
	}
}
