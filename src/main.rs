mod args;
mod config;
mod entry;
mod error;
mod generators;
mod harness;
mod logger;
mod metrics;
mod payload;
mod policy;
mod records;
mod remote;
mod sinks;
mod timing;

use error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
