// SPDX-License-Identifier: MIT OR Apache-2.0
// SPDX-FileCopyrightText: 2025 1BitSquared <info@1bitsquared.com>

use std::net::TcpStream;

use clap::{Args, Subcommand};
use color_eyre::eyre::Context;
use log::info;
use xvcutil::xvc::{XVC_DEFAULT_PORT, XvcTapDriver};

#[derive(Args)]
pub struct TapArguments
{
	#[arg(global = true, short = 's', long = "server", default_value = "localhost")]
	/// Host name or address of the XVC server to drive
	server: String,

	#[arg(global = true, short = 'p', long = "port", default_value_t = XVC_DEFAULT_PORT)]
	/// TCP port the XVC server listens on
	port: u16,

	#[command(subcommand)]
	subcommand: TapCommands,
}

impl TapArguments
{
	pub fn subcommand(&self) -> color_eyre::Result<()>
	{
		match &self.subcommand {
			TapCommands::Info => info_command(self),
			TapCommands::IdCode => id_code_command(self),
			TapCommands::IrLength => ir_length_command(self),
			TapCommands::Clock(clock_args) => clock_command(self, clock_args),
		}
	}

	fn connect(&self) -> color_eyre::Result<XvcTapDriver<TcpStream>>
	{
		info!("connecting to XVC server {}:{}", self.server, self.port);
		XvcTapDriver::connect((self.server.as_str(), self.port))
			.wrap_err_with(|| format!("connecting to XVC server {}:{}", self.server, self.port))
	}
}

#[derive(Subcommand)]
#[command(arg_required_else_help(true))]
enum TapCommands
{
	/// Print the XVC server's self-description
	Info,
	/// Read the 32-bit device ID code out of the TAP
	IdCode,
	/// Probe the width of the TAP's instruction register
	IrLength,
	/// Negotiate the TCK period with the server
	Clock(ClockArguments),
}

#[derive(Args)]
struct ClockArguments
{
	/// Requested TCK period in nanoseconds
	period_ns: u32,
}

fn info_command(tap_args: &TapArguments) -> color_eyre::Result<()>
{
	let driver = tap_args.connect()?;
	let info = driver.server_info();
	println!("Server:     {}", info.name);
	println!("Max vector: {} bits", info.max_vector_bits);
	Ok(())
}

fn id_code_command(tap_args: &TapArguments) -> color_eyre::Result<()>
{
	let mut driver = tap_args.connect()?;
	let idcode = driver.read_idcode().wrap_err("reading device ID code")?;
	println!("ID code: {idcode:#010x}");
	Ok(())
}

fn ir_length_command(tap_args: &TapArguments) -> color_eyre::Result<()>
{
	let mut driver = tap_args.connect()?;
	let length = driver.probe_ir_length().wrap_err("probing instruction register length")?;
	println!("IR length: {length} bits");
	Ok(())
}

fn clock_command(tap_args: &TapArguments, clock_args: &ClockArguments) -> color_eyre::Result<()>
{
	let mut driver = tap_args.connect()?;
	let actual = driver
		.set_tck_period(clock_args.period_ns)
		.wrap_err("negotiating TCK period")?;
	println!("TCK period: {actual}ns");
	Ok(())
}
