//! Route handlers organized by resource
//!
//! Paths here are relative to the `/rest` prefix added by the server.

pub mod collect_requests;
pub mod heart_beat;
pub mod parameters;
pub mod wastes;
