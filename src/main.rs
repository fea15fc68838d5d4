//! `bpol` binary: inspect and exercise a policy manifest from the shell.
use anyhow::{anyhow, Context, Result};
use buildpol::cli::{CheckArgs, Command, InfoArgs, ListArgs, RootArgs, VersionArgs};
use buildpol::{load_manifest, MemorySink, PolicyEngine, PolicyFields, Version};
use clap::Parser;
use serde::Serialize;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = RootArgs::parse();
    match args.command {
        Command::List(args) => cmd_list(args),
        Command::Info(args) => cmd_info(args),
        Command::Check(args) => cmd_check(args),
        Command::Version(args) => cmd_version(args),
    }
}

/// Report emitted by `check` and `version` in `--json` mode.
#[derive(Serialize)]
struct CheckReport {
    policies: Vec<PolicyFields>,
    notices: Vec<String>,
}

fn load_engine(path: &Path) -> Result<(PolicyEngine, MemorySink)> {
    let manifest = load_manifest(path)?;
    let sink = MemorySink::new();
    let mut engine = PolicyEngine::with_sink(Box::new(sink.clone()));
    manifest.register_into(&mut engine)?;
    Ok((engine, sink))
}

fn cmd_list(args: ListArgs) -> Result<()> {
    let (engine, _sink) = load_engine(&args.manifest)?;
    let fields: Vec<PolicyFields> = engine
        .policies()
        .map(|policy| engine.fields(&policy.name))
        .collect::<Result<_, _>>()?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&fields)?);
        return Ok(());
    }
    for entry in &fields {
        let origin = if entry.is_default {
            "default"
        } else {
            "explicit"
        };
        println!(
            "{}  current={} ({origin})  introduced={}{}",
            entry.name,
            entry.current_value,
            entry.introduced,
            lifecycle_suffix(entry)
        );
    }
    Ok(())
}

fn lifecycle_suffix(entry: &PolicyFields) -> String {
    if let Some(removed) = &entry.removed {
        format!("  removed={removed}")
    } else if let Some(deprecated) = &entry.deprecated {
        format!("  deprecated={deprecated}")
    } else {
        String::new()
    }
}

fn cmd_info(args: InfoArgs) -> Result<()> {
    let (engine, _sink) = load_engine(&args.manifest)?;
    if args.json {
        let fields = engine.fields(&args.name)?;
        println!("{}", serde_json::to_string_pretty(&fields)?);
    } else {
        print!("{}", engine.info(&args.name)?);
    }
    Ok(())
}

fn cmd_check(args: CheckArgs) -> Result<()> {
    let (mut engine, sink) = load_engine(&args.manifest)?;
    for pair in &args.set {
        let (name, value) = pair
            .split_once('=')
            .ok_or_else(|| anyhow!("--set expects NAME=VALUE, got '{pair}'"))?;
        engine
            .set_from_str(name, value)
            .with_context(|| format!("apply --set {pair}"))?;
    }
    let names: Vec<String> = engine
        .policies()
        .map(|policy| policy.name.clone())
        .collect();
    for name in &names {
        engine.get(name)?;
    }
    report(&engine, &sink, &names, args.json)
}

fn cmd_version(args: VersionArgs) -> Result<()> {
    let (mut engine, sink) = load_engine(&args.manifest)?;
    let minimum = Version::parse(&args.minimum)?;
    let maximum = args
        .maximum
        .as_deref()
        .map(Version::parse)
        .transpose()
        .context("parse --maximum")?;
    engine.version_range(&minimum, maximum.as_ref())?;
    let names: Vec<String> = engine
        .policies()
        .map(|policy| policy.name.clone())
        .collect();
    report(&engine, &sink, &names, args.json)
}

fn report(engine: &PolicyEngine, sink: &MemorySink, names: &[String], json: bool) -> Result<()> {
    let fields: Vec<PolicyFields> = names
        .iter()
        .map(|name| engine.fields(name))
        .collect::<Result<_, _>>()?;
    let notices = sink.messages();
    if json {
        let out = CheckReport {
            policies: fields,
            notices,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }
    for entry in &fields {
        let origin = if entry.is_default {
            "default"
        } else {
            "explicit"
        };
        println!("{}  current={} ({origin})", entry.name, entry.current_value);
    }
    for notice in &notices {
        eprintln!("notice: {notice}");
    }
    Ok(())
}
