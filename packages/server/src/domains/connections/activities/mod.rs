//! Connection and messaging activities.

pub mod get_connection;
pub mod list_connections;
pub mod mark_read;
pub mod send_message;

pub use get_connection::{get_connection, ConnectionView};
pub use list_connections::list_connections;
pub use mark_read::mark_read;
pub use send_message::send_message;
