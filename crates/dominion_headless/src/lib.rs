//! Headless session driving for Dominion.
//!
//! Builds scripted game sessions without any network or UI layer, for
//! CI verification and replay checking.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod session;
