//! backbay-rulecheck - ruleset requirement checker.
//!
//! - `backbay-rulecheck check` - sanity check rule lists and enablers
//! - `backbay-rulecheck repair` - add missing hard requirements to enablers

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use backbay_reqs::{
    ActionEnabler, EnablerFile, EngineConfig, HardRequirementFile, HardRequirementTable, ReqEngine, ReqSide,
    RuleFile, RuleStatus, SanityProblem,
};
use backbay_ruleset::{load_ruleset, Ruleset, RulesetSource};

#[derive(Parser)]
#[command(name = "backbay-rulecheck")]
#[command(about = "Check and repair ruleset requirement vectors", version)]
struct Cli {
    /// Ruleset directory (defaults to the embedded base ruleset)
    #[arg(short, long, global = true)]
    ruleset: Option<PathBuf>,

    /// Engine configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sanity check requirement vectors
    Check {
        /// Rule list files
        #[arg(long)]
        rules: Vec<PathBuf>,

        /// Action enabler file
        #[arg(long)]
        enablers: Option<PathBuf>,
    },

    /// Repair enablers that miss hard requirements
    Repair {
        /// Action enabler file
        enablers: PathBuf,

        /// Hard requirements file (defaults to the built-in table)
        #[arg(long)]
        hard: Option<PathBuf>,

        /// Write the repaired enablers here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct CheckedRule {
    owner: String,
    problems: Vec<SanityProblem>,
}

#[derive(Default, Serialize)]
struct CheckReport {
    checked: usize,
    disabled: Vec<CheckedRule>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let rs = load(cli.ruleset.as_deref())?;
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let engine = ReqEngine::new(&rs, config);

    match cli.command {
        Commands::Check { rules, enablers } => {
            let report = check(&engine, &rules, enablers.as_deref())?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "{} vectors checked, {} disabled",
                    report.checked,
                    report.disabled.len()
                );
                for rule in &report.disabled {
                    for problem in &rule.problems {
                        println!("  {}: {problem}", rule.owner);
                    }
                }
            }
            Ok(())
        }
        Commands::Repair {
            enablers,
            hard,
            output,
        } => repair(&engine, &enablers, hard.as_deref(), output.as_deref(), cli.json),
    }
}

fn load(dir: Option<&Path>) -> Result<Ruleset> {
    let source = match dir {
        Some(dir) => RulesetSource::Path(dir.display().to_string()),
        None => RulesetSource::Embedded,
    };
    load_ruleset(source).context("loading ruleset")
}

fn check(
    engine: &ReqEngine<'_>,
    rules: &[PathBuf],
    enablers: Option<&Path>,
) -> Result<CheckReport> {
    let rs = engine.ruleset();
    let mut report = CheckReport::default();
    let mut record = |owner: &str, status: RuleStatus| {
        report.checked += 1;
        if let RuleStatus::Disabled(problems) = status {
            report.disabled.push(CheckedRule {
                owner: owner.to_string(),
                problems,
            });
        }
    };

    for path in rules {
        let file = RuleFile::load(path).with_context(|| format!("reading {}", path.display()))?;
        for rule in &file.rules {
            let reqs = rule.compile(rs);
            record(&rule.name, engine.check_rule(&rule.name, &reqs, rule.conjunctive)?);
        }
    }

    if let Some(path) = enablers {
        let collection = EnablerFile::load(path)
            .and_then(|file| file.compile(rs))
            .with_context(|| format!("reading {}", path.display()))?;
        for enabler in collection.iter() {
            record(&enabler.name, enabler_status(engine, enabler)?);
        }
    }
    info!(checked = report.checked, disabled = report.disabled.len(), "check finished");
    Ok(report)
}

/// Both sides of an enabler checked as one rule.
fn enabler_status(engine: &ReqEngine<'_>, enabler: &ActionEnabler) -> Result<RuleStatus> {
    let mut problems = Vec::new();
    for side in [ReqSide::Actor, ReqSide::Target] {
        if let RuleStatus::Disabled(found) =
            engine.check_rule(&enabler.name, enabler.reqs(side), true)?
        {
            problems.extend(found);
        }
    }
    Ok(if problems.is_empty() {
        RuleStatus::Enabled
    } else {
        RuleStatus::Disabled(problems)
    })
}

fn repair(
    engine: &ReqEngine<'_>,
    enablers: &Path,
    hard: Option<&Path>,
    output: Option<&Path>,
    json: bool,
) -> Result<()> {
    let rs = engine.ruleset();
    let mut collection = EnablerFile::load(enablers)
        .and_then(|file| file.compile(rs))
        .with_context(|| format!("reading {}", enablers.display()))?;
    let table = match hard {
        Some(path) => HardRequirementFile::load(path)
            .and_then(|file| file.compile(rs))
            .with_context(|| format!("reading {}", path.display()))?,
        None => HardRequirementTable::standard(rs),
    };

    let report = engine.repair_enablers(&mut collection, &table);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{} repaired, {} cloned, {} disabled",
            report.repaired_count(),
            report.cloned_count(),
            report.disabled_count()
        );
        for action in &report.actions {
            for repaired in &action.repaired {
                println!(
                    "  {}: {} += {} ({})",
                    action.action, repaired.name, repaired.added.kind, repaired.reason
                );
            }
            for cloned in &action.cloned {
                println!("  {}: {} cloned from {}", action.action, cloned.name, cloned.from);
            }
            for disabled in &action.disabled {
                println!("  {}: {} disabled: {}", action.action, disabled.name, disabled.reason);
            }
        }
    }

    if let Some(path) = output {
        let yaml = EnablerFile::from_collection(rs, &collection).to_yaml_string()?;
        std::fs::write(path, yaml).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "wrote repaired enablers");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enabler_counts_once_with_both_sides_merged() {
        let rs = load(None).unwrap();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let collection = EnablerFile::from_yaml_str(
            r#"
enablers:
  - name: Bad Bombard
    action: Bombard
    actor_reqs:
      - { type: Tech, name: Time Travel, range: Player }
    target_reqs:
      - { type: Gov, name: Monarchy, range: Player }
      - { type: Gov, name: Republic, range: Player }
  - name: Fine Bombard
    action: Bombard
"#,
        )
        .unwrap()
        .compile(&rs)
        .unwrap();

        let enablers: Vec<_> = collection.iter().collect();
        let RuleStatus::Disabled(problems) = enabler_status(&engine, enablers[0]).unwrap() else {
            panic!("both sides are broken");
        };
        assert!(problems.contains(&SanityProblem::InvalidUniversal { index: 0 }));
        assert!(problems.iter().any(|p| matches!(p, SanityProblem::TooMany { .. })));
        assert_eq!(enabler_status(&engine, enablers[1]).unwrap(), RuleStatus::Enabled);
    }
}
