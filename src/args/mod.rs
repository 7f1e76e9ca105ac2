//! CLI argument types and parsing helpers.
mod cli;
pub(crate) mod parsers;
mod types;

#[cfg(test)]
mod test_support;

pub use cli::{BarrageArgs, Command, EventsArgs, HealthArgs, WpcArgs};
pub use types::PositiveUsize;

pub(crate) use parsers::parse_duration_arg;
