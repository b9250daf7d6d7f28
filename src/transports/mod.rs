//! Transport implementations

#[cfg(feature = "console")]
pub mod console;
pub mod generated;
#[cfg(feature = "file")]
pub mod json;

#[cfg(feature = "console")]
pub use console::ConsoleTransport;
pub use generated::{create_transport, TransportSpec, GENERATED_TRANSPORT_NAME};
#[cfg(feature = "file")]
pub use json::JsonFileTransport;

// Re-export the traits so transport authors need a single import
pub use crate::core::{AsyncTransport, Done, Transport, TransportContext};
#[cfg(feature = "async-transports")]
pub use crate::core::AsyncTransportAdapter;
