//! Relational-client interface.
//!
//! The interface is organized into two components:
//! - `Driver` - driver metadata and factory for connections
//! - `Connection` - handle for preparing and running statements
//!
//! Statements and cursors live in [`crate::query`].
//!
//! # Example
//!
//! ```no_run
//! use yql_rs::client::Driver;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let driver = Driver::with_default_transport()?;
//! let mut connection = driver.open("");
//!
//! let mut stmt = connection.prepare("select * from weather.forecast where woeid = ?");
//! let mut cursor = stmt.execute_read(&[2502265.into()]).await?;
//! while let Some(row) = cursor.next_row() {
//!     println!("{}", row);
//! }
//!
//! connection.close();
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod driver;

pub use connection::Connection;
pub use driver::{Driver, DRIVER_NAME};
