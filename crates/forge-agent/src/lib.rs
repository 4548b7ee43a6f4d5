//! # forge-agent
//!
//! Entry point the host tool invokes for every hook. Parses the command,
//! resolves settings, and runs the hook inside the fail-silent boundary.
//! The process always exits successfully.

#![deny(unsafe_code)]

pub mod cli;
pub mod dispatch;
pub mod input;
