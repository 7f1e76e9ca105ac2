use clap::Parser;

use crate::error::{AppError, AppResult};

use super::BarrageArgs;

pub(crate) fn parse_test_args<I, T>(args: I) -> AppResult<BarrageArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    BarrageArgs::try_parse_from(args).map_err(AppError::from)
}
