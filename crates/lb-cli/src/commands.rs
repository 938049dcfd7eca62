use std::fs;
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use lb_diff::{apply, diff, validate_diff, Diff, TurnPolicy};
use lb_merge::merge;
use lb_types::{parse_listing, render_listing, Line, Program};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Diff(args) => cmd_diff(args, cli.format),
        Command::Validate(args) => cmd_validate(args, cli.format),
        Command::Merge(args) => cmd_merge(args, cli.format),
        Command::Apply(args) => cmd_apply(args, cli.format),
    }
}

fn cmd_diff(args: DiffArgs, format: OutputFormat) -> anyhow::Result<()> {
    let original = load_program(&args.original)?;
    let modified = load_program(&args.modified)?;
    let result = diff(&original, &modified)
        .with_context(|| format!("{} is not an insertion-only edit", args.modified.display()))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Text => print_diff(&result),
    }
    Ok(())
}

fn cmd_validate(args: ValidateArgs, format: OutputFormat) -> anyhow::Result<()> {
    let policy = match &args.policy {
        Some(path) => load_policy(path)?,
        None => TurnPolicy::default(),
    };
    let original = load_program(&args.original)?;
    let modified = load_program(&args.modified)?;

    match (validate_diff(&original, &modified, &policy), format) {
        (Ok(result), OutputFormat::Json) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        (Ok(result), OutputFormat::Text) => {
            println!("{} Turn accepted", "✓".green().bold());
            print_diff(&result);
            Ok(())
        }
        (Err(err), OutputFormat::Json) => {
            println!("{}", serde_json::to_string_pretty(&err)?);
            anyhow::bail!("turn rejected")
        }
        (Err(err), OutputFormat::Text) => {
            println!("{} {}", "✗".red().bold(), err);
            anyhow::bail!("turn rejected")
        }
    }
}

fn cmd_merge(args: MergeArgs, format: OutputFormat) -> anyhow::Result<()> {
    let ancestor = load_program(&args.ancestor)?;
    let a = load_program(&args.a)?;
    let b = load_program(&args.b)?;

    let diff_a = diff(&ancestor, &a).with_context(|| format!("diffing {}", args.a.display()))?;
    let diff_b = diff(&ancestor, &b).with_context(|| format!("diffing {}", args.b.display()))?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let merged = merge(&diff_a, &diff_b, &mut rng)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&merged)?),
        OutputFormat::Text => {
            let program = merged.into_program(&ancestor, &mut rng);
            print!("{}", render_listing(&program.to_lines()));
        }
    }
    Ok(())
}

fn cmd_apply(args: DiffArgs, format: OutputFormat) -> anyhow::Result<()> {
    let original_lines = load_lines(&args.original)?;
    let original = Program::from_lines(&original_lines)?;
    let modified = load_program(&args.modified)?;

    let result = diff(&original, &modified)?;
    let lines = apply(&original_lines, &result)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&lines_as_json(&lines))?),
        OutputFormat::Text => print!("{}", render_listing(&lines)),
    }
    Ok(())
}

fn lines_as_json(lines: &[Line]) -> Vec<String> {
    lines.iter().map(ToString::to_string).collect()
}

fn print_diff(result: &Diff) {
    let inserted = result.inserted_pcs();
    for (pc, instruction) in result.instructions.iter().enumerate() {
        if inserted.contains(&pc) {
            println!("{} {:>3}  {}", "+".green(), pc, instruction.to_string().green());
        } else {
            println!("  {:>3}  {}", pc, instruction);
        }
    }
    for (label, pc) in &result.labels {
        println!("  {} {} → {}", "label".cyan(), label.bold(), pc);
    }
}

fn load_lines(path: &Path) -> anyhow::Result<Vec<Line>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_listing(&text).with_context(|| format!("parsing {}", path.display()))
}

fn load_program(path: &Path) -> anyhow::Result<Program> {
    let lines = load_lines(path)?;
    Program::from_lines(&lines).with_context(|| format!("loading {}", path.display()))
}

fn load_policy(path: &Path) -> anyhow::Result<TurnPolicy> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(TurnPolicy::from_toml(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_program_from_listing_file() {
        let file = write_temp("loop:\n    sub r0, 1\n    bne loop\n");
        let program = load_program(file.path()).unwrap();
        assert_eq!(program.len(), 2);
        assert_eq!(program.labels["loop"], 0);
    }

    #[test]
    fn parse_errors_name_the_file() {
        let file = write_temp("nop\nwibble\n");
        let err = load_program(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
    }

    #[test]
    fn loads_policy_file() {
        let file = write_temp("max_insertions = 2\nrequire_label_use = false\n");
        let policy = load_policy(file.path()).unwrap();
        assert_eq!(
            policy,
            TurnPolicy {
                max_insertions: 2,
                require_label_use: false,
            }
        );
    }

    #[test]
    fn apply_json_is_one_string_per_line() {
        let lines = parse_listing("loop:\n    nop\n; done").unwrap();
        assert_eq!(lines_as_json(&lines), vec!["loop:", "    nop", "; done"]);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_program(Path::new("/definitely/not/here.lb")).is_err());
    }
}
