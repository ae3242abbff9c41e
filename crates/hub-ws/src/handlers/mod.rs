//! Request handlers for the broadcast surface

pub mod state;
pub mod ws;
