//! Connection implementation.
//!
//! This module provides the `Connection` type, the handle from which
//! statements are prepared. A connection holds no session on the service side:
//! every execution is an independent HTTP exchange.

use std::sync::Arc;

use tracing::debug;

use crate::connection::auth::PinProvider;
use crate::connection::params::{ConnectionParams, ServiceEndpoints, TransportMode};
use crate::error::QueryError;
use crate::query::statement::StatementContext;
use crate::query::{Parameter, PreparedStatement, ResultCursor};
use crate::transport::HttpTransport;

/// Connection to the query service.
///
/// # Example
///
/// ```no_run
/// use yql_rs::Driver;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let driver = Driver::with_default_transport()?;
/// let mut connection = driver.open("store://datatables.org/alltableswithkeys");
///
/// let cursor = connection
///     .query("select * from yahoo.finance.quotes where symbol = ?", &["YHOO".into()])
///     .await?;
/// println!("{} rows", cursor.len());
///
/// connection.close();
/// # Ok(())
/// # }
/// ```
pub struct Connection {
    /// Transport handle, released on close
    transport: Option<Arc<dyn HttpTransport>>,
    /// Configuration shared with prepared statements
    context: Arc<StatementContext>,
}

impl Connection {
    pub(crate) fn new(
        transport: Arc<dyn HttpTransport>,
        params: ConnectionParams,
        endpoints: ServiceEndpoints,
        pin_provider: Arc<dyn PinProvider>,
    ) -> Self {
        Self {
            transport: Some(transport),
            context: Arc::new(StatementContext {
                params,
                endpoints,
                pin_provider,
            }),
        }
    }

    /// Prepare a statement. Never fails and performs no validation.
    ///
    /// Statements prepared after `close` fail when executed.
    pub fn prepare(&self, query: impl Into<String>) -> PreparedStatement {
        let query = query.into();
        debug!(%query, "preparing statement");
        PreparedStatement::new(self.transport.clone(), Arc::clone(&self.context), query)
    }

    /// Prepare and execute a read in one call.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`PreparedStatement::execute_read`].
    pub async fn query(
        &self,
        query: impl Into<String>,
        args: &[Parameter],
    ) -> Result<ResultCursor, QueryError> {
        let mut stmt = self.prepare(query);
        stmt.execute_read(args).await
    }

    /// Transactions are not supported by the service.
    ///
    /// # Errors
    ///
    /// Always returns `QueryError::TransactionsUnsupported`.
    pub fn begin_transaction(&mut self) -> Result<(), QueryError> {
        Err(QueryError::TransactionsUnsupported)
    }

    /// Get connection parameters.
    pub fn params(&self) -> &ConnectionParams {
        &self.context.params
    }

    /// Get the transport mode chosen from the descriptor.
    pub fn mode(&self) -> TransportMode {
        self.context.params.mode()
    }

    /// Check if the connection is closed.
    pub fn is_closed(&self) -> bool {
        self.transport.is_none()
    }

    /// Release the transport handle. Idempotent.
    ///
    /// Statements prepared before closing keep their own handle and remain
    /// usable.
    pub fn close(&mut self) {
        if self.transport.take().is_some() {
            debug!("connection closed");
        }
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("mode", &self.mode())
            .field("environment", &self.context.params.environment)
            .field("closed", &self.is_closed())
            .finish()
    }
}
