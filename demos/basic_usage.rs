//! Basic usage example for the yql-rs driver.
//!
//! Reads the connection descriptor from `YQL_DESCRIPTOR` (public mode against
//! the community tables when unset). A `key|secret[|env]` descriptor switches
//! to secure mode and prompts for the PIN on the console.
//!
//! ```bash
//! RUST_LOG=yql_rs=debug cargo run --example basic_usage
//! ```

use std::env;
use std::error::Error;

use tracing_subscriber::EnvFilter;
use yql_rs::{Connection, Driver, Parameter, RowValue};

const DEFAULT_DESCRIPTOR: &str = "store://datatables.org/alltableswithkeys";

/// Opens a connection from the environment descriptor.
fn example_connection(driver: &Driver) -> Connection {
    let descriptor = env::var("YQL_DESCRIPTOR").unwrap_or_else(|_| DEFAULT_DESCRIPTOR.to_string());
    let connection = driver.open(&descriptor);
    println!("Connected in {:?} mode", connection.mode());
    connection
}

/// Prepares a quote lookup and walks the cursor with `advance`.
async fn example_quotes(conn: &Connection) -> Result<usize, Box<dyn Error>> {
    let mut stmt = conn.prepare("select * from yahoo.finance.quotes where symbol in (?, ?)");
    let mut cursor = stmt
        .execute_read(&[Parameter::from("YHOO"), Parameter::from("AAPL")])
        .await?;

    let mut dest = vec![RowValue::Null];
    let mut count = 0;
    loop {
        match cursor.advance(&mut dest) {
            Ok(()) => {
                let symbol = dest[0].get("symbol").and_then(|v| v.as_str()).unwrap_or("?");
                let ask = dest[0].get("Ask").and_then(|v| v.as_str()).unwrap_or("-");
                println!("  {} ask {}", symbol, ask);
                count += 1;
            }
            Err(e) if e.is_end_of_sequence() => break,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(count)
}

/// Runs a one-shot query and exports the rows as an Arrow batch.
async fn example_arrow(conn: &Connection) -> Result<usize, Box<dyn Error>> {
    let cursor = conn
        .query(
            "select title from rss where url = ? limit 5",
            &["https://finance.yahoo.com/rss/topstories".into()],
        )
        .await?;
    let batch = cursor.into_record_batch()?;
    Ok(batch.num_rows())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let driver = Driver::with_default_transport()?;
    println!("{}", driver);

    let mut conn = example_connection(&driver);

    let rows = example_quotes(&conn).await?;
    println!("Quotes: {} row(s)", rows);

    let rows = example_arrow(&conn).await?;
    println!("Arrow batch: {} row(s)", rows);

    conn.close();
    println!("Done");

    Ok(())
}
