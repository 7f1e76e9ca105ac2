use super::*;

#[test]
fn global_options_follow_the_subcommand() -> AppResult<()> {
    let args = parse_test_args([
        "barrage",
        "health",
        "1",
        "1",
        "1",
        "0",
        "--endpoint",
        "http://collector:8080/api",
        "--output-dir",
        "results",
        "--timeout",
        "500ms",
        "--shutdown-timeout",
        "2m",
        "--prometheus-path",
        "counters.prom",
        "-v",
    ])?;

    if args.endpoint.as_deref() != Some("http://collector:8080/api") {
        return Err(AppError::validation("Unexpected endpoint"));
    }
    if args.output_dir != Some(PathBuf::from("results")) {
        return Err(AppError::validation("Unexpected output dir"));
    }
    if args.timeout != Some(Duration::from_millis(500)) {
        return Err(AppError::validation("Unexpected timeout"));
    }
    if args.shutdown_timeout != Some(Duration::from_secs(120)) {
        return Err(AppError::validation("Unexpected shutdown timeout"));
    }
    if args.prometheus_path != Some(PathBuf::from("counters.prom")) {
        return Err(AppError::validation("Unexpected prometheus path"));
    }
    if !args.verbose {
        return Err(AppError::validation("Expected verbose"));
    }
    Ok(())
}

#[test]
fn global_options_precede_the_subcommand() -> AppResult<()> {
    let args = parse_test_args([
        "barrage",
        "--config",
        "load.toml",
        "events",
        "index.txt",
        "1",
        "0",
        "--iterations",
        "3",
    ])?;
    if args.config.as_deref() != Some("load.toml") {
        return Err(AppError::validation("Unexpected config path"));
    }
    match args.command {
        Command::Events(events) if events.iterations.get() == 3 => Ok(()),
        Command::Events(_) | Command::Health(_) | Command::Wpc(_) => {
            Err(AppError::validation("Expected three event iterations"))
        }
    }
}

#[test]
fn options_default_to_unset() -> AppResult<()> {
    let args = parse_test_args(["barrage", "wpc", "1", "1", "1", "0"])?;
    if args.config.is_some()
        || args.output_dir.is_some()
        || args.timeout.is_some()
        || args.shutdown_timeout.is_some()
        || args.prometheus_path.is_some()
        || args.verbose
    {
        return Err(AppError::validation(format!("Unexpected defaults: {:?}", args)));
    }
    Ok(())
}

#[test]
fn invalid_timeout_is_rejected() {
    let result = parse_test_args(["barrage", "wpc", "1", "1", "1", "0", "--timeout", "5x"]);
    assert!(result.is_err(), "Expected an invalid duration unit to be rejected");
}
