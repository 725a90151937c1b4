//! Permission checks for connection and messaging operations.

use crate::common::{Actor, CoreError};
use crate::domains::connections::models::Connection;

/// A connection is jointly owned by exactly the two parties named on it.
pub fn ensure_party(connection: &Connection, actor: &Actor) -> Result<(), CoreError> {
    if !connection.is_party(actor.id) {
        return Err(CoreError::permission(
            "you are not a party to this connection",
        ));
    }
    Ok(())
}
