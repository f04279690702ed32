//! API middleware for CORS, error envelopes and remote status passthrough

pub mod cors;
pub mod envelope;
pub mod remote_status;
