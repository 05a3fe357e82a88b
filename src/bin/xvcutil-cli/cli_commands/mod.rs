// SPDX-License-Identifier: MIT OR Apache-2.0
// SPDX-FileCopyrightText: 2025 1BitSquared <info@1bitsquared.com>

use clap::Subcommand;

use crate::CompletionArguments;
use crate::cli_commands::decode::DecodeArguments;
use crate::cli_commands::tap::TapArguments;

pub mod decode;
pub mod tap;

#[derive(Subcommand)]
pub enum ToplevelCommands
{
	/// Actions to be performed against the TAP behind an XVC server
	Tap(TapArguments),
	/// Decode a captured TMS/TDI trace into user register updates
	Decode(DecodeArguments),
	/// Generate completions data for the shell
	Complete(CompletionArguments),
}
