//! Query execution and result handling.
//!
//! The query module is organized into:
//! - `statement` - placeholder binding and request dispatch
//! - `envelope` - locating the row set inside the response document
//! - `results` - forward-only cursor over decoded rows
//!
//! # Example
//!
//! ```no_run
//! use yql_rs::{Driver, Parameter};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let driver = Driver::with_default_transport()?;
//! let mut conn = driver.open("store://datatables.org/alltableswithkeys");
//!
//! let mut stmt = conn.prepare("select * from yahoo.finance.quotes where symbol = ?");
//! let cursor = stmt.execute_read(&[Parameter::from("YHOO")]).await?;
//!
//! for row in cursor {
//!     println!("{}", row);
//! }
//! # Ok(())
//! # }
//! ```

pub mod envelope;
pub mod results;
pub mod statement;

pub use results::{ResultCursor, RESULTS_COLUMN};
pub use statement::{Parameter, PreparedStatement};
