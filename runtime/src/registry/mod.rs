//! Registry-backed version discovery.
//!
//! Only [`RegistryVersionClient`] is public; reference parsing, token
//! exchange, tag listing and filtering are internal steps of one operation.

mod auth;
mod client;
mod reference;
mod tags;
#[cfg(test)]
mod test_server;
mod version;

pub use client::RegistryVersionClient;
