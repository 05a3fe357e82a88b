//! Module for error handling code.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum XvcutilError
{
	#[error("shift register committed {actual} bits where exactly {expected} were expected")]
	LengthMismatch
	{
		/// The fixed bit width the register was constructed with.
		expected: usize,

		/// The number of bits actually shifted between capture and update.
		actual: usize,
	},

	#[error("instruction register length {requested} is not between 1 and 64 bits")]
	InvalidIrLength
	{
		requested: usize,
	},

	#[error("user code {code:#x} does not fit in a {ir_length}-bit instruction register")]
	UserCodeTooWide
	{
		code: u64,
		ir_length: usize,
	},

	#[error("cannot shift {requested} bits, the server only accepts vectors up to {max} bits")]
	VectorTooLarge
	{
		requested: usize,
		max: usize,
	},

	#[error("the XVC server closed the connection mid-transfer")]
	ConnectionClosed,

	#[error("server info reply {reply:?} is not of the form <name>:<maxVectorBits>")]
	MalformedServerInfo
	{
		reply: String,
	},

	#[error("trace line {line}: {reason}")]
	MalformedTraceRecord
	{
		line: usize,
		reason: String,
	},

	#[error(transparent)]
	Io(#[from] std::io::Error),
}
