// SPDX-License-Identifier: MIT OR Apache-2.0
// SPDX-FileCopyrightText: 2025 1BitSquared <info@1bitsquared.com>

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::Args;
use color_eyre::eyre::Context;
use log::info;
use xvcutil::observer::JtagObserver;
use xvcutil::trace::{TraceReader, parse_number};

#[derive(Args)]
pub struct DecodeArguments
{
	/// Trace file of `<nbits> <tms> <tdi>` records, one recorded sample per
	/// line
	trace: PathBuf,

	#[arg(long = "ir-length", default_value_t = JtagObserver::DEFAULT_IR_LENGTH)]
	/// Width of the traced TAP's instruction register in bits
	ir_length: usize,

	#[arg(long = "user-code", value_parser = parse_code, default_value = "0x3c2")]
	/// Instruction code that exposes the user data register
	user_code: u64,
}

fn parse_code(text: &str) -> Result<u64, String>
{
	parse_number(text).ok_or_else(|| format!("{text:?} is not an unsigned integer"))
}

pub fn decode_command(decode_args: &DecodeArguments) -> color_eyre::Result<()>
{
	let file = File::open(&decode_args.trace)
		.wrap_err_with(|| format!("opening trace {}", decode_args.trace.display()))?;
	let mut observer = JtagObserver::new(decode_args.ir_length, decode_args.user_code)?;

	let mut decoded = 0usize;
	for record in TraceReader::new(BufReader::new(file)) {
		let record = record?;
		for event in observer.process_word(record.tms, record.tdi, record.nbits)? {
			println!("{event}");
			decoded += 1;
		}
	}

	info!("decoded {decoded} user register update(s)");
	Ok(())
}
