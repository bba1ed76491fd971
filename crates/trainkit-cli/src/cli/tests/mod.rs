//! CLI parse tests, one file per subcommand.

use super::{Cli, CliCommand};
use clap::Parser;

pub(super) fn parse(args: &[&str]) -> CliCommand {
    let cli = Cli::try_parse_from(args).unwrap();
    cli.command
}


#[test]
fn cli_parse_global_config_after_subcommand() {
    let cli = Cli::try_parse_from(["trainkit", "report", "data", "--config", "/tmp/t.toml"]).unwrap();
    assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("/tmp/t.toml")));
}

#[test]
fn cli_parse_no_config_by_default() {
    let cli = Cli::try_parse_from(["trainkit", "fetch", "http://example.com/"]).unwrap();
    assert!(cli.config.is_none());
}

#[test]
fn cli_requires_subcommand() {
    assert!(Cli::try_parse_from(["trainkit"]).is_err());
}
