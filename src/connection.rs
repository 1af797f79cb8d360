use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug, PartialEq)]
pub enum ConnectionError {
    #[error("no active connection")]
    NotConnected,
}

/// Shared database connection handle. Constructed once by the composition
/// root and handed to every consumer as a `SharedConnection`; there is no
/// global instance.
pub struct Connection {
    dsn: String,
    connected: bool,
    sessions_opened: u32,
}

pub type SharedConnection = Rc<RefCell<Connection>>;

impl Connection {
    pub fn new(dsn: &str) -> Connection {
        Connection {
            dsn: dsn.to_string(),
            connected: false,
            sessions_opened: 0,
        }
    }

    pub fn shared(dsn: &str) -> SharedConnection {
        Rc::new(RefCell::new(Connection::new(dsn)))
    }

    pub fn dsn(&self) -> &str {
        &self.dsn
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn sessions_opened(&self) -> u32 {
        self.sessions_opened
    }

    /// Idempotent; reconnecting while already connected is a no-op.
    pub fn connect(&mut self) {
        if self.connected {
            debug!(dsn = %self.dsn, "already connected");
            return;
        }
        self.connected = true;
        self.sessions_opened += 1;
        info!(dsn = %self.dsn, session = self.sessions_opened, "connection established");
    }

    pub fn disconnect(&mut self) {
        if !self.connected {
            debug!(dsn = %self.dsn, "no active connection to close");
            return;
        }
        self.connected = false;
        info!(dsn = %self.dsn, "connection closed");
    }

    pub fn execute_query(&self, query: &str) -> Result<(), ConnectionError> {
        if !self.connected {
            return Err(ConnectionError::NotConnected);
        }
        debug!(dsn = %self.dsn, query = query, "executing query");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_is_idempotent() {
        let mut conn = Connection::new("postgres://localhost/bankdb");
        conn.connect();
        conn.connect();
        assert!(conn.is_connected());
        assert_eq!(conn.sessions_opened(), 1);
    }

    #[test]
    fn test_reconnect_counts_a_new_session() {
        let mut conn = Connection::new("postgres://localhost/bankdb");
        conn.connect();
        conn.disconnect();
        assert!(!conn.is_connected());
        conn.connect();
        assert_eq!(conn.sessions_opened(), 2);
    }

    #[test]
    fn test_query_requires_a_connection() {
        let mut conn = Connection::new("postgres://localhost/bankdb");
        assert_eq!(
            conn.execute_query("select 1"),
            Err(ConnectionError::NotConnected)
        );

        conn.connect();
        assert_eq!(conn.execute_query("select 1"), Ok(()));
    }

    #[test]
    fn test_shared_handle_is_one_resource() {
        let conn = Connection::shared("postgres://localhost/bankdb");
        let other = conn.clone();

        other.borrow_mut().connect();
        assert!(conn.borrow().is_connected());
        assert_eq!(conn.borrow().sessions_opened(), 1);
    }
}
