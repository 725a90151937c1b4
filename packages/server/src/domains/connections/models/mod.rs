pub mod connection;
pub mod message;

pub use connection::{Connection, ConnectionSummary};
pub use message::Message;
