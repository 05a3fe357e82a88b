// SPDX-License-Identifier: MIT OR Apache-2.0
// SPDX-FileCopyrightText: 2025 1BitSquared <info@1bitsquared.com>

//! JTAG TAP protocol engine with two faces: a passive observer that decodes
//! boundary-scan traffic out of a captured TMS/TDI trace, and an active
//! driver that sequences a remote TAP over the XVC wire protocol. Both are
//! built on the same TAP state machine and scan register semantics.

pub mod bits;
pub mod error;
pub mod observer;
pub mod shift_register;
pub mod tap;
pub mod trace;
pub mod xvc;
