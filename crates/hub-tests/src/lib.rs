//! Integration tests for the vehicle hub
//!
//! End-to-end tests exercising the full pipeline:
//! - Frame decoding -> transformer -> snapshot assembly
//! - The HTTP/WebSocket surface via the router
//!
//! # Test Structure
//!
//! - `pipeline_e2e_test.rs` - Frame-sequence scenarios against the transformer
//! - `server_api_test.rs` - Router tests (`/state`) via tower `oneshot`

// This crate only contains tests, no library code
