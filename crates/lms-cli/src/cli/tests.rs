use super::*;

fn parse(args: &[&str]) -> CliCommand {
    let cli = Cli::try_parse_from(args).unwrap();
    cli.command
}

#[test]
fn cli_parse_countdown_once() {
    match parse(&[
        "lms",
        "countdown",
        "--granted-at",
        "2025-01-01T00:00:00Z",
        "--validity-days",
        "7.5",
    ]) {
        CliCommand::Countdown {
            granted_at,
            validity_days,
            ticks,
        } => {
            assert_eq!(granted_at, "2025-01-01T00:00:00Z");
            assert_eq!(validity_days, 7.5);
            assert_eq!(ticks, 0);
        }
        _ => panic!("expected Countdown"),
    }
}

#[test]
fn cli_parse_countdown_negative_days_and_ticks() {
    match parse(&[
        "lms",
        "countdown",
        "--granted-at",
        "2025-01-01",
        "--validity-days",
        "-2",
        "--ticks",
        "5",
    ]) {
        CliCommand::Countdown {
            validity_days,
            ticks,
            ..
        } => {
            assert_eq!(validity_days, -2.0);
            assert_eq!(ticks, 5);
        }
        _ => panic!("expected Countdown"),
    }
}

#[test]
fn cli_parse_countdown_requires_inputs() {
    assert!(Cli::try_parse_from(["lms", "countdown", "--validity-days", "3"]).is_err());
}

#[test]
fn cli_parse_batches() {
    match parse(&["lms", "batches"]) {
        CliCommand::Batches => {}
        _ => panic!("expected Batches"),
    }
}

#[test]
fn cli_parse_users_with_expansion() {
    match parse(&["lms", "users", "b7", "--expand", "alice", "--expand", "bob"]) {
        CliCommand::Users {
            batch_id,
            expand,
            all,
        } => {
            assert_eq!(batch_id, "b7");
            assert_eq!(expand, vec!["alice".to_string(), "bob".to_string()]);
            assert!(!all);
        }
        _ => panic!("expected Users"),
    }
}

#[test]
fn cli_parse_users_all() {
    match parse(&["lms", "users", "3", "--all"]) {
        CliCommand::Users { all, expand, .. } => {
            assert!(all);
            assert!(expand.is_empty());
        }
        _ => panic!("expected Users"),
    }
}

#[test]
fn cli_parse_stream() {
    match parse(&["lms", "stream", "/tmp/capture.txt"]) {
        CliCommand::Stream { path } => assert_eq!(path, "/tmp/capture.txt"),
        _ => panic!("expected Stream"),
    }
}
