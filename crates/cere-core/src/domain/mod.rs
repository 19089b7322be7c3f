//! Domain types shared by the bridge and its host.
//!
//! Nothing in this module performs I/O.  The types are immutable values
//! (events) or small state descriptions (init status, init config) owned by
//! whoever embeds the bridge.

pub mod event;
pub mod init;
