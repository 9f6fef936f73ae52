pub mod error;
pub mod filter;
pub mod loader;
pub mod output;
pub mod pager;
pub mod schema;
pub mod session;
pub mod stats;

#[cfg(test)]
mod test_helpers;

pub use error::{BikeshareError, Result};
pub use loader::{CityCatalog, Dataset, load_filtered};
pub use pager::{Cursor, next_page};
pub use stats::{StatsReport, compute_report};
