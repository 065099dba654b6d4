//! Shared integration test helpers.

mod server;

pub use server::TestServer;
