pub mod decoders;
#[cfg(feature = "native")]
mod envelope;

#[cfg(feature = "native")]
pub use envelope::{parse_message, parse_transaction};
