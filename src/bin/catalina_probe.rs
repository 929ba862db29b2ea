//! Identifies a Tomcat installation from its files.
//!
//! Subcommands keep the names existing tooling already calls:
//! `getServerInfo`, `searchForClasses` and `getJavaHome`. Results go to
//! stdout, diagnostics and errors to stderr, and any failure exits 1.

use anyhow::{Context, Result, bail};
use catalina_probe::{
    Catalog, MatchMap, ServletNamespace, java_home, load_catalog_from_path, normalize_home,
    runtime::env_non_empty, search_for_classes, server_info,
};
use serde_json::json;
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() {
    init_logging();
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(env_non_empty("CATALINA_PROBE_LOG").unwrap_or_else(|| "warn".to_string()))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run() -> Result<()> {
    let default_home = env_non_empty("CATALINA_HOME").or_else(|| env_non_empty("CATALINA_BASE"));
    match parse_args(env::args_os().skip(1), default_home)? {
        Command::ServerInfo(opts) => {
            let info = server_info(&opts.home)?;
            if opts.json {
                println!("{}", json!({ "server_info": info }));
            } else {
                println!("{info}");
            }
        }
        Command::SearchForClasses(opts) => {
            let catalog = match &opts.catalog {
                Some(path) => load_catalog_from_path(path)?,
                None => Catalog::builtin().clone(),
            };
            let matches = search_for_classes(&opts.home, &catalog)
                .with_context(|| format!("searching {}", opts.home.display()))?;
            print!("{}", render_matches(&matches, opts.json)?);
        }
        Command::JavaHome => {
            println!("{}", java_home()?.display());
        }
        Command::Help => print!("{}", usage()),
    }
    Ok(())
}

#[derive(Debug, PartialEq)]
enum Command {
    ServerInfo(Options),
    SearchForClasses(Options),
    JavaHome,
    Help,
}

#[derive(Debug, PartialEq)]
struct Options {
    home: PathBuf,
    json: bool,
    catalog: Option<PathBuf>,
}

fn parse_args<I>(args: I, default_home: Option<String>) -> Result<Command>
where
    I: IntoIterator<Item = OsString>,
{
    let mut args = args.into_iter();
    let Some(subcommand) = args.next() else {
        bail!("No command provided\n\n{}", usage());
    };

    let subcommand = subcommand
        .into_string()
        .map_err(|_| anyhow::anyhow!("Subcommand must be valid Unicode"))?;
    match subcommand.as_str() {
        "getServerInfo" => Ok(Command::ServerInfo(parse_options(
            args,
            default_home,
            false,
        )?)),
        "searchForClasses" => Ok(Command::SearchForClasses(parse_options(
            args,
            default_home,
            true,
        )?)),
        "getJavaHome" => {
            if args.next().is_some() {
                bail!("getJavaHome takes no arguments");
            }
            Ok(Command::JavaHome)
        }
        "-h" | "--help" => Ok(Command::Help),
        other => bail!("Command is not supported: {other}"),
    }
}

fn parse_options(
    mut args: impl Iterator<Item = OsString>,
    default_home: Option<String>,
    allow_catalog: bool,
) -> Result<Options> {
    let mut home = None;
    let mut json = false;
    let mut catalog = None;

    while let Some(arg) = args.next() {
        match arg.to_str() {
            Some("--json") => json = true,
            Some("--catalog") if allow_catalog => {
                let Some(path) = args.next() else {
                    bail!("--catalog expects a file path");
                };
                catalog = Some(PathBuf::from(path));
            }
            Some(flag) if flag.starts_with("--") => bail!("Unknown option: {flag}"),
            _ => {
                if home.is_some() {
                    bail!("Only one Tomcat path may be provided");
                }
                home = Some(arg);
            }
        }
    }

    let home = match home {
        Some(raw) => normalize_home(&raw.to_string_lossy()),
        None => match default_home {
            Some(raw) => normalize_home(&raw),
            None => bail!("Tomcat path is not provided"),
        },
    };

    Ok(Options {
        home,
        json,
        catalog,
    })
}

fn render_matches(matches: &MatchMap, as_json: bool) -> Result<String> {
    if as_json {
        let classes: serde_json::Map<String, serde_json::Value> = matches
            .iter()
            .map(|(name, path)| (name.clone(), json!(path.display().to_string())))
            .collect();
        let value = json!({
            "classes": classes,
            "namespace": ServletNamespace::classify(matches),
        });
        return Ok(format!("{}\n", serde_json::to_string(&value)?));
    }

    Ok(matches
        .iter()
        .map(|(name, path)| format!("{name}:{}\n", path.display()))
        .collect())
}

fn usage() -> &'static str {
    "Usage: catalina-probe <command> [options] [TOMCAT_HOME]\n\nCommands:\n  getServerInfo [--json] <home>                      Print the server.info banner from catalina.jar.\n  searchForClasses [--json] [--catalog FILE] <home>  Print class:jar lines for the servlet and JSP APIs.\n  getJavaHome                                        Print JAVA_HOME or the JDK containing `java` on PATH.\n\nWhen <home> is omitted, CATALINA_HOME then CATALINA_BASE are used.\n"
}
