pub mod cleanup;
pub mod inflight;
