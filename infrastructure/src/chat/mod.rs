//! Chat backends

mod demo;

pub use demo::DemoChatBackend;
