//! Display model implementations for table output

mod client;

pub use client::ClientDisplay;
