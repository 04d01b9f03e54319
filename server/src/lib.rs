pub mod logging;
pub mod router;

#[cfg(test)]
mod router_tests;

pub use router::{DEFAULT_LISTEN, ServerConfig, router, run};
