// soap/mod.rs - Client for the legacy XML subscription service
//
// The subscription service is the system of record for who may view a
// creator's pro content. It speaks a positional SOAP dialect: every call
// carries the shared secret as arg0, followed by the creator id and then the
// subscriber id where the action needs them.
//
// Layers, leaf first:
//   envelope  - request document construction
//   parser    - response document decoding into `ParsedFields`
//   transport - "send envelope, receive envelope" seam (reqwest in production)
//   client    - typed operations; legacy prose never escapes this module

pub mod client;
pub mod envelope;
pub mod error;
pub mod parser;
pub mod transport;
pub mod types;

pub use client::SubscriptionClient;
pub use error::SubscriptionError;
pub use parser::{ParsedFields, ReturnValue};
pub use transport::{HttpTransport, SoapTransport};
pub use types::{CommandOutcome, SoapAction, SubscriptionRecord, SubscriptionStatus};
