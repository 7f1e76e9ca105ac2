use super::*;

#[test]
fn parse_events_subcommand() -> AppResult<()> {
    let args = parse_test_args(["barrage", "events", "index.txt", "5", "250"])?;
    match args.command {
        Command::Events(events) => {
            if events.index_file != PathBuf::from("index.txt") {
                return Err(AppError::validation("Unexpected index file"));
            }
            if events.events_in_send.get() != 5 {
                return Err(AppError::validation("Unexpected events in send"));
            }
            if events.delay_ms != 250 {
                return Err(AppError::validation("Unexpected delay"));
            }
            if events.iterations.get() != 1 {
                return Err(AppError::validation("Expected a single iteration by default"));
            }
            Ok(())
        }
        Command::Health(_) | Command::Wpc(_) => {
            Err(AppError::validation("Expected events subcommand"))
        }
    }
}

#[test]
fn parse_health_subcommand() -> AppResult<()> {
    let args = parse_test_args(["barrage", "health", "2", "10", "4", "0"])?;
    match args.command {
        Command::Health(health) => {
            if health.test_number != 2
                || health.iterations.get() != 10
                || health.threads.get() != 4
                || health.delay_ms != 0
            {
                return Err(AppError::validation(format!(
                    "Unexpected health args: {:?}",
                    health
                )));
            }
            Ok(())
        }
        Command::Events(_) | Command::Wpc(_) => {
            Err(AppError::validation("Expected health subcommand"))
        }
    }
}

#[test]
fn parse_wpc_subcommand_with_identity() -> AppResult<()> {
    let args = parse_test_args([
        "barrage",
        "wpc",
        "3",
        "1",
        "2",
        "100",
        "--client-ip",
        "10.1.1.1",
        "--user",
        "bob",
    ])?;
    match args.command {
        Command::Wpc(wpc) => {
            if wpc.test_number != 3 || wpc.client_ip != "10.1.1.1" || wpc.user != "bob" {
                return Err(AppError::validation(format!("Unexpected wpc args: {:?}", wpc)));
            }
            Ok(())
        }
        Command::Events(_) | Command::Health(_) => {
            Err(AppError::validation("Expected wpc subcommand"))
        }
    }
}

#[test]
fn wpc_identity_has_defaults() -> AppResult<()> {
    let args = parse_test_args(["barrage", "wpc", "1", "1", "1", "0"])?;
    match args.command {
        Command::Wpc(wpc) => {
            if wpc.client_ip != "192.168.2.116" || wpc.user != "user1" {
                return Err(AppError::validation("Unexpected wpc defaults"));
            }
            Ok(())
        }
        Command::Events(_) | Command::Health(_) => {
            Err(AppError::validation("Expected wpc subcommand"))
        }
    }
}

#[test]
fn zero_threads_are_rejected() {
    let result = parse_test_args(["barrage", "health", "1", "1", "0", "0"]);
    assert!(result.is_err(), "Expected zero threads to be rejected");
}

#[test]
fn missing_positionals_are_rejected() {
    let result = parse_test_args(["barrage", "events", "index.txt"]);
    assert!(result.is_err(), "Expected missing arguments to be rejected");
}

#[test]
fn subcommand_is_required() {
    let result = parse_test_args(["barrage", "--endpoint", "http://localhost"]);
    assert!(result.is_err(), "Expected a missing subcommand to be rejected");
}
