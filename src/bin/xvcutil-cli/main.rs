// SPDX-License-Identifier: MIT OR Apache-2.0
// SPDX-FileCopyrightText: 2025 1BitSquared <info@1bitsquared.com>

mod cli_commands;

use std::io::stdout;

use clap::builder::styling::Styles;
use clap::{Args, CommandFactory, Parser, crate_description, crate_version};
use clap_complete::{Shell, generate};
use color_eyre::eyre::Result;

use crate::cli_commands::ToplevelCommands;

#[derive(Parser)]
#[command(
	version,
	about = format!("{} v{}", crate_description!(), crate_version!()),
	styles(style()),
	disable_colored_help(false),
	arg_required_else_help(true)
)]
struct CliArguments
{
	#[command(subcommand)]
	pub subcommand: ToplevelCommands,
}

#[derive(Args)]
struct CompletionArguments
{
	shell: Shell,
}

/// Clap v3 style (approximate)
/// See https://stackoverflow.com/a/75343828
fn style() -> clap::builder::Styles
{
	Styles::styled()
		.usage(
			anstyle::Style::new()
				.fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow)))
				.bold(),
		)
		.header(
			anstyle::Style::new()
				.bold()
				.fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
		)
		.literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
}

fn main() -> Result<()>
{
	color_eyre::install()?;
	env_logger::Builder::new()
		.filter_level(log::LevelFilter::Info)
		.parse_default_env()
		.init();

	let cli_args = CliArguments::parse();

	match &cli_args.subcommand {
		ToplevelCommands::Tap(tap_args) => tap_args.subcommand(),
		ToplevelCommands::Decode(decode_args) => cli_commands::decode::decode_command(decode_args),
		ToplevelCommands::Complete(comp_args) => {
			let mut cmd = CliArguments::command();
			generate(comp_args.shell, &mut cmd, "xvcutil-cli", &mut stdout());
			Ok(())
		},
	}
}
