//! Message sources the consumer drains.
//!
//! A [`MessageSource`] delivers batches of opaque bodies, each with a
//! [`MessageHandle`] that must be used to delete that delivery. Anything not
//! deleted within its visibility timeout is delivered again (at-least-once).
//!
//! [`InMemoryQueue`] is the in-process implementation used by the bundled
//! server and by tests that need real redelivery behavior.

mod error;
mod memory;
mod traits;
mod types;

pub use error::SourceError;
pub use memory::{InMemoryQueue, QueueDepth};
pub use traits::MessageSource;
pub use types::{MessageHandle, ReceiveRequest, ReceivedMessage};
