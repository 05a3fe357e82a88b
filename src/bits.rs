// SPDX-License-Identifier: MIT OR Apache-2.0
// SPDX-FileCopyrightText: 2025 1BitSquared <info@1bitsquared.com>

//! Helpers for the bit vector representation shared by the scan registers,
//! the wire codec and the TAP driver.
//!
//! A vector of `n` bits occupies `ceil(n / 8)` bytes, least significant bit
//! and least significant byte first: bit `i` lives at bit `i % 8` of byte
//! `i / 8`. This is the layout XVC puts on the wire, so vectors built here
//! can be framed without any repacking. Unused bits in the final byte are
//! kept zero.

/// Number of bytes needed to carry `nbits` bits.
pub const fn bytes_for_bits(nbits: usize) -> usize
{
	nbits.div_ceil(8)
}

/// Read bit `index` of the vector. Out of range reads as zero.
pub fn get_bit(data: &[u8], index: usize) -> bool
{
	data.get(index / 8)
		.is_some_and(|&byte| byte & (1 << (index % 8)) != 0)
}

/// Write bit `index` of the vector. The byte holding it must exist.
pub fn set_bit(data: &mut [u8], index: usize, value: bool)
{
	let mask = 1 << (index % 8);
	if value {
		data[index / 8] |= mask;
	} else {
		data[index / 8] &= !mask;
	}
}

/// Pack the low `nbits` bits of `word` into a fresh vector.
pub fn word_to_vec(word: u64, nbits: usize) -> Vec<u8>
{
	assert!(nbits <= u64::BITS as usize);
	let mut data = vec![0u8; bytes_for_bits(nbits)];
	for (index, byte) in data.iter_mut().enumerate() {
		*byte = (word >> (index * 8)) as u8;
	}
	if nbits % 8 != 0 {
		if let Some(last) = data.last_mut() {
			*last &= (1u8 << (nbits % 8)) - 1;
		}
	}
	data
}

/// Unpack a vector of at most 64 bits back into a word.
pub fn vec_to_word(data: &[u8]) -> u64
{
	assert!(data.len() <= (u64::BITS / 8) as usize);
	data.iter()
		.rev()
		.fold(0u64, |word, &byte| (word << 8) | u64::from(byte))
}

/// An all-ones vector of `nbits` bits, with the pad bits of the final byte
/// left clear.
pub fn ones(nbits: usize) -> Vec<u8>
{
	let mut data = vec![0xffu8; bytes_for_bits(nbits)];
	if nbits % 8 != 0 {
		if let Some(last) = data.last_mut() {
			*last = (1u8 << (nbits % 8)) - 1;
		}
	}
	data
}

/// Truncate a vector down to `nbits` bits, clearing any pad bits in the new
/// final byte.
pub fn mask_to(data: &mut Vec<u8>, nbits: usize)
{
	data.truncate(bytes_for_bits(nbits));
	if nbits % 8 != 0 {
		if let Some(last) = data.last_mut() {
			*last &= (1u8 << (nbits % 8)) - 1;
		}
	}
}

/// Add one to the vector interpreted as a little-endian integer, growing it
/// by a byte if the carry ripples off the end.
pub fn increment(data: &mut Vec<u8>)
{
	for byte in data.iter_mut() {
		let (sum, carry) = byte.overflowing_add(1);
		*byte = sum;
		if !carry {
			return;
		}
	}
	data.push(1);
}

/// Position of the highest set bit plus one, or zero for an all-zero vector.
pub fn bit_length(data: &[u8]) -> usize
{
	for (index, &byte) in data.iter().enumerate().rev() {
		if byte != 0 {
			return index * 8 + (8 - byte.leading_zeros() as usize);
		}
	}
	0
}

/// Render a vector as minimal lowercase hex, the way `%x` would print the
/// equivalent integer.
pub fn hex_str(data: &[u8]) -> String
{
	let mut digits = String::with_capacity(data.len() * 2);
	let mut significant = false;
	for &byte in data.iter().rev() {
		if significant {
			digits.push_str(&format!("{byte:02x}"));
		} else if byte != 0 {
			digits.push_str(&format!("{byte:x}"));
			significant = true;
		}
	}
	if digits.is_empty() {
		digits.push('0');
	}
	digits
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn byte_counts()
	{
		assert_eq!(bytes_for_bits(0), 0);
		assert_eq!(bytes_for_bits(1), 1);
		assert_eq!(bytes_for_bits(8), 1);
		assert_eq!(bytes_for_bits(9), 2);
		assert_eq!(bytes_for_bits(1024), 128);
	}

	#[test]
	fn bit_accessors()
	{
		let mut data = vec![0u8; 2];
		set_bit(&mut data, 0, true);
		set_bit(&mut data, 9, true);
		assert_eq!(data, [0x01, 0x02]);
		assert!(get_bit(&data, 0));
		assert!(!get_bit(&data, 1));
		assert!(get_bit(&data, 9));
		// Reads past the end of the vector are zero, not a panic
		assert!(!get_bit(&data, 100));
		set_bit(&mut data, 9, false);
		assert_eq!(data, [0x01, 0x00]);
	}

	#[test]
	fn word_round_trip()
	{
		assert_eq!(word_to_vec(0x3c2, 10), [0xc2, 0x03]);
		assert_eq!(vec_to_word(&[0xc2, 0x03]), 0x3c2);
		assert_eq!(word_to_vec(0x0362_d093, 32), [0x93, 0xd0, 0x62, 0x03]);
		// Bits above the requested width are discarded
		assert_eq!(word_to_vec(0xffff, 10), [0xff, 0x03]);
	}

	#[test]
	fn all_ones_pads_clear()
	{
		assert_eq!(ones(10), [0xff, 0x03]);
		assert_eq!(ones(16), [0xff, 0xff]);
		assert_eq!(ones(0), []);
	}

	#[test]
	fn masking()
	{
		let mut data = vec![0xff, 0xff, 0xff];
		mask_to(&mut data, 10);
		assert_eq!(data, [0xff, 0x03]);
	}

	#[test]
	fn increment_carries()
	{
		let mut data = vec![0xff, 0x01];
		increment(&mut data);
		assert_eq!(data, [0x00, 0x02]);
		let mut data = vec![0xff, 0xff];
		increment(&mut data);
		assert_eq!(data, [0x00, 0x00, 0x01]);
	}

	#[test]
	fn bit_lengths()
	{
		assert_eq!(bit_length(&[]), 0);
		assert_eq!(bit_length(&[0x00, 0x00]), 0);
		assert_eq!(bit_length(&[0x01]), 1);
		assert_eq!(bit_length(&[0xff, 0x03]), 10);
		// The flood probe's identity: bit_length(x + 1) - 1 recovers the
		// width of an all-ones vector
		let mut flushed = ones(10);
		flushed.resize(128, 0);
		increment(&mut flushed);
		assert_eq!(bit_length(&flushed) - 1, 10);
	}

	#[test]
	fn hex_rendering()
	{
		assert_eq!(hex_str(&[0x55]), "55");
		assert_eq!(hex_str(&[0xc2, 0x03]), "3c2");
		assert_eq!(hex_str(&[0x00, 0x00]), "0");
		assert_eq!(hex_str(&[0x93, 0xd0, 0x62, 0x03]), "362d093");
	}
}
