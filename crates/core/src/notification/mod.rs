//! Event-driven order processing.
//!
//! Besides the queue consumer, orders published to the topic can be delivered
//! as a batch of notification records in a single invocation. The
//! [`NotificationHandler`] processes such a batch sequentially. Unlike the
//! queue path it does not swallow undecodable records: the whole batch fails
//! so the delivering system retries it and owns any dead-lettering.

mod handler;
mod types;

pub use handler::NotificationHandler;
pub use types::{NotificationError, NotificationEvent, NotificationRecord};
