// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;
mod shell;

use anyhow::{Context, Result, anyhow};
use config::{CatalogLocation, Config};
use logging::LogConfig;
use runtime::{ClipboardSink, FileClipboard, Session, StdoutClipboard};
use std::env;
use std::fs::File;
use std::io::{self, BufReader, IsTerminal};
use std::path::{Path, PathBuf};
use takeoff_catalog::{CatalogSource, Client, StaticCatalog};

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `takeoff --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;

    let log_config = LogConfig::resolve(config.log_level()?, config.log_format(), options.verbosity)
        .with_ansi(io::stderr().is_terminal());
    logging::init_logging(&log_config)?;

    let source = catalog_source(&options, &config)?;
    if options.check_only {
        let builders = source
            .list_builders()
            .context("catalog check failed; no builders could be listed")?;
        tracing::info!(builders = builders.len(), "catalog check passed");
        return Ok(());
    }

    let clipboard: Box<dyn ClipboardSink> = match config.clipboard_path() {
        Some(path) => {
            let sink = FileClipboard::new(path);
            tracing::debug!(path = %sink.path().display(), "copied text goes to file");
            Box::new(sink)
        }
        None => Box::new(StdoutClipboard),
    };
    let mut session = Session::new(source, clipboard, config.history_limit());

    let mut stdout = io::stdout().lock();
    match &options.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("open script {}", path.display()))?;
            shell::run_shell(&mut session, BufReader::new(file), &mut stdout, false)
        }
        None => {
            let stdin = io::stdin();
            let prompt = stdin.is_terminal();
            shell::run_shell(&mut session, stdin.lock(), &mut stdout, prompt)
        }
    }
}

/// Picks the catalog: `--catalog-file`, then `--demo`, then `[catalog]` config.
fn catalog_source(options: &CliOptions, config: &Config) -> Result<Box<dyn CatalogSource>> {
    if let Some(path) = &options.catalog_file {
        return Ok(Box::new(load_catalog_file(path)?));
    }
    if options.demo {
        return Ok(Box::new(StaticCatalog::demo()?));
    }

    match config.catalog_location()? {
        CatalogLocation::File(path) => Ok(Box::new(load_catalog_file(&path)?)),
        CatalogLocation::Http { base_url, timeout } => {
            let client = Client::new(&base_url, timeout).with_context(|| {
                format!(
                    "invalid [catalog] config in {}; fix base_url/timeout values",
                    options.config_path.display()
                )
            })?;
            tracing::debug!(base_url = client.base_url(), "using catalog service");
            Ok(Box::new(client))
        }
    }
}

fn load_catalog_file(path: &Path) -> Result<StaticCatalog> {
    let catalog = StaticCatalog::load(path)?;
    tracing::debug!(path = %path.display(), "using catalog file");
    Ok(catalog)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    catalog_file: Option<PathBuf>,
    script: Option<PathBuf>,
    demo: bool,
    print_config_path: bool,
    print_example: bool,
    check_only: bool,
    verbosity: u8,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        catalog_file: None,
        script: None,
        demo: false,
        print_config_path: false,
        print_example: false,
        check_only: false,
        verbosity: 0,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--catalog-file" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--catalog-file requires a JSON file path"))?;
                options.catalog_file = Some(PathBuf::from(value.as_ref()));
            }
            "--script" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--script requires a file path"))?;
                options.script = Some(PathBuf::from(value.as_ref()));
            }
            "--demo" => {
                options.demo = true;
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "-v" => {
                options.verbosity = options.verbosity.saturating_add(1);
            }
            "-vv" => {
                options.verbosity = options.verbosity.saturating_add(2);
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("takeoff: plumbing and trim takeoff calculator");
    println!("  --config <path>          Use a specific config path");
    println!("  --catalog-file <path>    Read builders and plans from a JSON catalog file");
    println!("  --demo                   Use the built-in demo catalog");
    println!("  --script <path>          Run shell commands from a file instead of stdin");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --check                  Validate config and catalog, then exit");
    println!("  -v, -vv                  More log output on stderr (debug, trace)");
    println!("  --help                   Show this help");
    println!();
    println!("Type `help` in the shell for its commands.");
}

#[cfg(test)]
mod tests {
    use super::{CliOptions, catalog_source, parse_cli_args};
    use crate::config::Config;
    use anyhow::Result;
    use std::path::PathBuf;
    use takeoff_app::{BuilderId, CommunityId};
    use takeoff_testkit::{sample_catalog, temp_catalog_path};

    fn default_options_path() -> PathBuf {
        PathBuf::from("/tmp/takeoff-config.toml")
    }

    #[test]
    fn parse_cli_args_defaults_to_provided_config_path() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        assert_eq!(
            options,
            CliOptions {
                config_path: default_options_path(),
                catalog_file: None,
                script: None,
                demo: false,
                print_config_path: false,
                print_example: false,
                check_only: false,
                verbosity: 0,
                show_help: false,
            }
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_reads_path_values() -> Result<()> {
        let options = parse_cli_args(
            vec![
                "--config",
                "/custom/config.toml",
                "--catalog-file",
                "/data/catalog.json",
                "--script",
                "/data/session.txt",
            ],
            default_options_path(),
        )?;
        assert_eq!(options.config_path, PathBuf::from("/custom/config.toml"));
        assert_eq!(
            options.catalog_file,
            Some(PathBuf::from("/data/catalog.json"))
        );
        assert_eq!(options.script, Some(PathBuf::from("/data/session.txt")));
        Ok(())
    }

    #[test]
    fn parse_cli_args_errors_for_missing_values() {
        for flag in ["--config", "--catalog-file", "--script"] {
            let error = parse_cli_args(vec![flag], default_options_path())
                .expect_err("missing value should fail");
            assert!(error.to_string().contains(flag));
        }
    }

    #[test]
    fn parse_cli_args_errors_for_unknown_argument() {
        let error = parse_cli_args(vec!["--wat"], default_options_path())
            .expect_err("unknown arg should fail");
        let message = error.to_string();
        assert!(message.contains("unknown argument"));
        assert!(message.contains("--help"));
    }

    #[test]
    fn parse_cli_args_counts_verbosity() -> Result<()> {
        assert_eq!(
            parse_cli_args(vec!["-v"], default_options_path())?.verbosity,
            1
        );
        assert_eq!(
            parse_cli_args(vec!["-vv"], default_options_path())?.verbosity,
            2
        );
        assert_eq!(
            parse_cli_args(vec!["-v", "-vv"], default_options_path())?.verbosity,
            3
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_flags() -> Result<()> {
        let options = parse_cli_args(
            vec!["--demo", "--print-config-path", "--print-example-config", "--check", "-h"],
            default_options_path(),
        )?;
        assert!(options.demo);
        assert!(options.print_config_path);
        assert!(options.print_example);
        assert!(options.check_only);
        assert!(options.show_help);
        Ok(())
    }

    #[test]
    fn catalog_file_flag_wins_over_demo() -> Result<()> {
        let (_dir, path) = temp_catalog_path(&sample_catalog())?;
        let options = parse_cli_args(
            vec!["--demo", "--catalog-file", path.to_str().unwrap_or_default()],
            default_options_path(),
        )?;
        let source = catalog_source(&options, &Config::default())?;
        let bundle = source.load_plan_bundle(BuilderId::new(1), CommunityId::new(10))?;
        assert_eq!(bundle.floor_plans[0].name, "PlanA");
        Ok(())
    }

    #[test]
    fn demo_flag_uses_built_in_catalog() -> Result<()> {
        let options = parse_cli_args(vec!["--demo"], default_options_path())?;
        let source = catalog_source(&options, &Config::default())?;
        assert_eq!(source.list_builders()?.len(), 2);
        assert_eq!(
            source.list_communities(BuilderId::new(1))?[0].name,
            "Cedar Ridge"
        );
        Ok(())
    }

    #[test]
    fn missing_catalog_file_fails_startup() {
        let options = parse_cli_args(
            vec!["--catalog-file", "/nonexistent/catalog.json"],
            default_options_path(),
        )
        .expect("args should parse");
        let error = catalog_source(&options, &Config::default())
            .err()
            .expect("missing file should fail");
        assert!(error.to_string().contains("/nonexistent/catalog.json"));
    }
}
