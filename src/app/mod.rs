pub mod pipelines;
#[cfg(feature = "server")]
pub mod server;
