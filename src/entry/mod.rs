mod plan;

use clap::{CommandFactory, FromArgMatches};

use crate::args::BarrageArgs;
use crate::error::{AppError, AppResult, ValidationError};
use plan::{build_plan, execute_plan};

pub(crate) fn run() -> AppResult<()> {
    // Invalid arguments print usage and exit here, before any work starts.
    let matches = BarrageArgs::command().get_matches();
    let args = BarrageArgs::from_arg_matches(&matches)?;

    crate::logger::init_logging(args.verbose, args.no_color);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::validation(ValidationError::RuntimeBuildFailed { source: err }))?;

    runtime.block_on(run_async(args))
}

async fn run_async(args: BarrageArgs) -> AppResult<()> {
    let plan = build_plan(args)?;
    execute_plan(plan).await
}
