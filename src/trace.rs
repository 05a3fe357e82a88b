// SPDX-License-Identifier: MIT OR Apache-2.0
// SPDX-FileCopyrightText: 2025 1BitSquared <info@1bitsquared.com>

//! Reader for captured signal traces.
//!
//! A trace is a text file of records, one recorded sample per line, in the
//! order the edges happened:
//!
//! ```text
//! # width  tms   tdi
//! 6        0x1f  0x00
//! 4        0b0011 0
//! ```
//!
//! Each record packs up to 64 TCK edges LSB first into one TMS word and one
//! TDI word, exactly the shape [`JtagObserver::process_word`] consumes.
//! Numbers may be written in decimal or with a `0x`/`0o`/`0b` radix prefix.
//! `#` starts a comment and blank lines are skipped.
//!
//! [`JtagObserver::process_word`]: crate::observer::JtagObserver::process_word

use std::io::{BufRead, Lines};

use crate::error::XvcutilError;

/// One recorded sample: `nbits` TCK edges with their TMS and TDI levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorRecord
{
	pub nbits: u32,
	pub tms: u64,
	pub tdi: u64,
}

/// Parse an unsigned integer with an optional radix prefix.
pub fn parse_number(text: &str) -> Option<u64>
{
	let text = text.trim();
	let (digits, radix) = if let Some(rest) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
		(rest, 16)
	} else if let Some(rest) = text.strip_prefix("0o").or_else(|| text.strip_prefix("0O")) {
		(rest, 8)
	} else if let Some(rest) = text.strip_prefix("0b").or_else(|| text.strip_prefix("0B")) {
		(rest, 2)
	} else {
		(text, 10)
	};
	u64::from_str_radix(digits, radix).ok()
}

/// Iterator over the records of a trace, with line numbers in its errors.
pub struct TraceReader<R>
{
	lines: Lines<R>,
	line: usize,
}

impl<R: BufRead> TraceReader<R>
{
	pub fn new(reader: R) -> Self
	{
		Self {
			lines: reader.lines(),
			line: 0,
		}
	}

	fn parse_record(&self, text: &str) -> Result<VectorRecord, XvcutilError>
	{
		let malformed = |reason: String| XvcutilError::MalformedTraceRecord {
			line: self.line,
			reason,
		};

		let fields: Vec<&str> = text.split_whitespace().collect();
		let &[nbits, tms, tdi] = fields.as_slice() else {
			return Err(malformed(format!(
				"expected 3 fields (nbits tms tdi), found {}",
				fields.len()
			)));
		};

		let nbits = parse_number(nbits).ok_or_else(|| malformed(format!("bad bit count {nbits:?}")))?;
		if nbits == 0 || nbits > u64::BITS as u64 {
			return Err(malformed(format!("record width {nbits} outside 1..=64")));
		}
		let tms = parse_number(tms).ok_or_else(|| malformed(format!("bad TMS word {tms:?}")))?;
		let tdi = parse_number(tdi).ok_or_else(|| malformed(format!("bad TDI word {tdi:?}")))?;

		Ok(VectorRecord {
			nbits: nbits as u32,
			tms,
			tdi,
		})
	}
}

impl<R: BufRead> Iterator for TraceReader<R>
{
	type Item = Result<VectorRecord, XvcutilError>;

	fn next(&mut self) -> Option<Self::Item>
	{
		loop {
			let line = match self.lines.next()? {
				Ok(line) => line,
				Err(error) => return Some(Err(error.into())),
			};
			self.line += 1;
			let text = line.split('#').next().unwrap_or("").trim();
			if text.is_empty() {
				continue;
			}
			return Some(self.parse_record(text));
		}
	}
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn numbers_in_every_radix()
	{
		assert_eq!(parse_number("42"), Some(42));
		assert_eq!(parse_number("0x1f"), Some(0x1f));
		assert_eq!(parse_number("0X1F"), Some(0x1f));
		assert_eq!(parse_number("0b0011"), Some(3));
		assert_eq!(parse_number("0o17"), Some(15));
		assert_eq!(parse_number(" 7 "), Some(7));
		assert_eq!(parse_number("then"), None);
		assert_eq!(parse_number("0xgg"), None);
		assert_eq!(parse_number(""), None);
	}

	#[test]
	fn records_with_comments_and_blanks()
	{
		let trace = "# captured reset\n\n6 0x1f 0\n4 0b0011 0  # enter shift-ir\n12 0x600 0x3c2\n";
		let records: Vec<VectorRecord> = TraceReader::new(trace.as_bytes())
			.collect::<Result<_, _>>()
			.unwrap();
		assert_eq!(records, [
			VectorRecord {
				nbits: 6,
				tms: 0x1f,
				tdi: 0
			},
			VectorRecord {
				nbits: 4,
				tms: 3,
				tdi: 0
			},
			VectorRecord {
				nbits: 12,
				tms: 0x600,
				tdi: 0x3c2
			},
		]);
	}

	#[test]
	fn errors_carry_the_line_number()
	{
		let trace = "6 0x1f 0\n\n6 0x1f\n";
		let mut reader = TraceReader::new(trace.as_bytes());
		assert!(reader.next().unwrap().is_ok());
		let err = reader.next().unwrap().unwrap_err();
		assert!(matches!(err, XvcutilError::MalformedTraceRecord {
			line: 3,
			..
		}));
	}

	#[test]
	fn rejects_overwide_and_empty_records()
	{
		let mut reader = TraceReader::new("65 0 0\n".as_bytes());
		assert!(reader.next().unwrap().is_err());
		let mut reader = TraceReader::new("0 0 0\n".as_bytes());
		assert!(reader.next().unwrap().is_err());
		let mut reader = TraceReader::new("12 nope 0\n".as_bytes());
		assert!(reader.next().unwrap().is_err());
	}
}
