//! Integration test common infrastructure.
//!
//! Provides an in-process test server, test sessions, and builders for the
//! roster stanzas the tests send.

pub mod client;
pub mod server;
pub mod stanzas;

#[allow(unused_imports)]
pub use client::TestClient;
#[allow(unused_imports)]
pub use server::TestServer;
