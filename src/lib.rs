//! # yql-rs
//!
//! Relational-client style driver for the YQL HTTP query service.
//!
//! The service answers YQL text over HTTP with a JSON document. This library
//! wraps it behind a driver / connection / prepared statement / cursor
//! interface: `?` placeholders are substituted client-side, the query is sent
//! in public mode (plain GET) or secure mode (OAuth 1.0a signed GET), and the
//! row set is located inside the `query.results` envelope. Results can be
//! read row by row or exported as an Arrow `RecordBatch`.
//!
//! ## Example
//!
//! ```no_run
//! # use yql_rs::*;
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create driver and open a public-mode connection
//! let driver = Driver::with_default_transport()?;
//! let mut connection = driver.open("store://datatables.org/alltableswithkeys");
//!
//! // Prepare, bind and execute
//! let mut stmt = connection.prepare("select * from yahoo.finance.quotes where symbol in (?, ?)");
//! let mut cursor = stmt.execute_read(&["YHOO".into(), "AAPL".into()]).await?;
//!
//! // Read rows through the single `results` column
//! let mut dest = vec![RowValue::Null];
//! loop {
//!     match cursor.advance(&mut dest) {
//!         Ok(()) => println!("{}", dest[0]),
//!         Err(e) if e.is_end_of_sequence() => break,
//!         Err(e) => return Err(e.into()),
//!     }
//! }
//!
//! connection.close();
//! # Ok(())
//! # }
//! ```

// Module declarations
pub mod arrow_conversion;
pub mod client;
pub mod connection;
pub mod error;
pub mod query;
pub mod transport;
pub mod types;

// Re-export public API
pub use arrow_conversion::ArrowConverter;
pub use client::{Connection, Driver};
pub use connection::{ConnectionParams, PinProvider, ServiceEndpoints, TransportMode};
pub use error::{
    ConnectionError, ConversionError, ErrorCode, QueryError, TransportError, YqlError,
};
pub use query::{Parameter, PreparedStatement, ResultCursor};
pub use transport::{HttpTransport, ReqwestTransport, TransportConfig};
pub use types::RowValue;
