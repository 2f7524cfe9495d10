use std::path::Path;

use clap::Parser;

use screener::cli::{Cli, Commands};

fn parse(args: &[&str]) -> Cli {
    let mut argv = vec!["screener"];
    argv.extend_from_slice(args);
    Cli::parse_from(argv)
}

#[test]
fn parse_index_default_dir() {
    match parse(&["index"]).command {
        Commands::Index(args) => assert!(args.dir.is_none()),
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn parse_index_with_dir() {
    match parse(&["index", "cvs"]).command {
        Commands::Index(args) => assert_eq!(args.dir.as_deref(), Some(Path::new("cvs"))),
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn parse_search_flags() {
    match parse(&["search", "data analyst", "--skills", "python, sql", "--years", "5", "-k", "3"])
        .command
    {
        Commands::Search(args) => {
            assert_eq!(args.text.as_deref(), Some("data analyst"));
            assert_eq!(args.skills, "python, sql");
            assert_eq!(args.years, 5);
            assert_eq!(args.k, Some(3));
            assert!(args.query_file.is_none());
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn parse_search_defaults() {
    match parse(&["search", "engineer"]).command {
        Commands::Search(args) => {
            assert_eq!(args.skills, "");
            assert_eq!(args.years, 0);
            assert!(args.k.is_none());
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn parse_search_from_query_file() {
    match parse(&["search", "--query-file", "job.txt"]).command {
        Commands::Search(args) => {
            assert!(args.text.is_none());
            assert_eq!(args.query_file.as_deref(), Some(Path::new("job.txt")));
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn search_requires_text_or_file() {
    assert!(Cli::try_parse_from(["screener", "search"]).is_err());
}

#[test]
fn parse_extract_full_text() {
    match parse(&["extract", "alice.pdf", "--full-text"]).command {
        Commands::Extract(args) => {
            assert_eq!(args.file, Path::new("alice.pdf"));
            assert!(args.full_text);
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn global_flags_after_subcommand() {
    let cli = parse(&["stats", "--robot", "-vv"]);
    assert!(cli.robot);
    assert_eq!(cli.verbose, 2);
    assert!(matches!(cli.command, Commands::Stats(_)));
}
