// SPDX-License-Identifier: MIT OR Apache-2.0
// SPDX-FileCopyrightText: 2025 1BitSquared <info@1bitsquared.com>

//! The IEEE 1149.1 TAP controller state machine.
//!
//! The controller is modelled as a plain value: [`TapState`] names which of
//! the 16 states the TAP is in, and [`TapState::advance`] is the total
//! transition function over one TCK rising edge. Scan side effects are not
//! performed here; `advance` reports them as a [`TapAction`] for the caller
//! to apply to whichever register is selected. The action is determined by
//! the state the TAP is in *as* the edge arrives, so a capture fires on the
//! clock that leaves the Capture state, matching real silicon.

/// The 16 states of the TAP controller.
///
/// `TestLogicReset` is the power-on state and is re-entered from anywhere by
/// five consecutive clocks with TMS high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TapState
{
	#[default]
	TestLogicReset,
	RunTestIdle,
	SelectDRScan,
	CaptureDR,
	ShiftDR,
	Exit1DR,
	PauseDR,
	Exit2DR,
	UpdateDR,
	SelectIRScan,
	CaptureIR,
	ShiftIR,
	Exit1IR,
	PauseIR,
	Exit2IR,
	UpdateIR,
}

/// Scan activity implied by clocking the TAP in a given state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapAction
{
	None,
	CaptureDR,
	ShiftDR,
	UpdateDR,
	CaptureIR,
	ShiftIR,
	UpdateIR,
}

impl TapState
{
	/// Clock the TAP one TCK edge with the given TMS level.
	///
	/// Returns the state entered by the edge and the scan action the edge
	/// performs. Every input is legal; this function cannot fail.
	pub fn advance(self, tms: bool) -> (TapState, TapAction)
	{
		use TapState::*;
		let next = match (self, tms) {
			(TestLogicReset, false) => RunTestIdle,
			(TestLogicReset, true) => TestLogicReset,
			(RunTestIdle, false) => RunTestIdle,
			(RunTestIdle, true) => SelectDRScan,
			(SelectDRScan, false) => CaptureDR,
			(SelectDRScan, true) => SelectIRScan,
			(CaptureDR, false) => ShiftDR,
			(CaptureDR, true) => Exit1DR,
			(ShiftDR, false) => ShiftDR,
			(ShiftDR, true) => Exit1DR,
			(Exit1DR, false) => PauseDR,
			(Exit1DR, true) => UpdateDR,
			(PauseDR, false) => PauseDR,
			(PauseDR, true) => Exit2DR,
			(Exit2DR, false) => ShiftDR,
			(Exit2DR, true) => UpdateDR,
			(UpdateDR, false) => RunTestIdle,
			(UpdateDR, true) => SelectDRScan,
			(SelectIRScan, false) => CaptureIR,
			(SelectIRScan, true) => TestLogicReset,
			(CaptureIR, false) => ShiftIR,
			(CaptureIR, true) => Exit1IR,
			(ShiftIR, false) => ShiftIR,
			(ShiftIR, true) => Exit1IR,
			(Exit1IR, false) => PauseIR,
			(Exit1IR, true) => UpdateIR,
			(PauseIR, false) => PauseIR,
			(PauseIR, true) => Exit2IR,
			(Exit2IR, false) => ShiftIR,
			(Exit2IR, true) => UpdateIR,
			(UpdateIR, false) => RunTestIdle,
			(UpdateIR, true) => SelectDRScan,
		};
		(next, self.action())
	}

	/// The scan action performed by clocking the TAP while in this state.
	fn action(self) -> TapAction
	{
		match self {
			TapState::CaptureDR => TapAction::CaptureDR,
			TapState::ShiftDR => TapAction::ShiftDR,
			TapState::UpdateDR => TapAction::UpdateDR,
			TapState::CaptureIR => TapAction::CaptureIR,
			TapState::ShiftIR => TapAction::ShiftIR,
			TapState::UpdateIR => TapAction::UpdateIR,
			_ => TapAction::None,
		}
	}

	/// All 16 states, for exhaustive property checks.
	pub const ALL: [TapState; 16] = [
		TapState::TestLogicReset,
		TapState::RunTestIdle,
		TapState::SelectDRScan,
		TapState::CaptureDR,
		TapState::ShiftDR,
		TapState::Exit1DR,
		TapState::PauseDR,
		TapState::Exit2DR,
		TapState::UpdateDR,
		TapState::SelectIRScan,
		TapState::CaptureIR,
		TapState::ShiftIR,
		TapState::Exit1IR,
		TapState::PauseIR,
		TapState::Exit2IR,
		TapState::UpdateIR,
	];
}
