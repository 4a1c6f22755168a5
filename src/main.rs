//! edmv binary: edit a batch of file names in `$EDITOR` and apply the
//! renames transactionally.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use edmv::{
    edit_paths, resolve_editor, run_batch, validate_sources, CancelFlag, ExecutionConfig,
    OverwritePolicy, PromptCallback, Task,
};

#[derive(Parser)]
#[command(
    name = "edmv",
    version,
    about = "Rename files with your favorite text editor"
)]
struct Cli {
    /// Files to rename
    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Leave completed renames in place when a later rename fails
    #[arg(long)]
    no_rollback: bool,

    /// What to do when a rename destination already exists
    #[arg(long, value_enum, default_value_t = OverwriteArg::Prompt)]
    overwrite: OverwriteArg,

    /// Editor command (defaults to $VISUAL, then $EDITOR, then vi)
    #[arg(long)]
    editor: Option<String>,

    /// Print the execution report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OverwriteArg {
    /// Stop the batch (and roll back unless --no-rollback)
    Fail,
    /// Replace existing destinations without asking
    Always,
    /// Ask before each overwrite
    Prompt,
}

impl From<OverwriteArg> for OverwritePolicy {
    fn from(arg: OverwriteArg) -> Self {
        match arg {
            OverwriteArg::Fail => OverwritePolicy::Fail,
            OverwriteArg::Always => OverwritePolicy::Overwrite,
            OverwriteArg::Prompt => OverwritePolicy::Prompt,
        }
    }
}

fn main() -> Result<()> {
    // Default: warnings everywhere, progress messages from edmv itself.
    // Use RUST_LOG=debug for verbose per-operation logs.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,edmv=info")),
        )
        .init();

    let cli = Cli::parse();

    // Reject bad input before the user spends time in the editor.
    validate_sources(&cli.files)?;

    let editor = cli.editor.clone().unwrap_or_else(resolve_editor);
    let desired = edit_paths(&cli.files, &editor).context("editor round trip failed")?;

    let cancel = CancelFlag::new();
    {
        let cancel = cancel.clone();
        ctrlc::set_handler(move || cancel.cancel())
            .context("failed to install interrupt handler")?;
    }

    let config = ExecutionConfig {
        rollback_on_error: !cli.no_rollback,
        on_destination_exists: cli.overwrite.into(),
    };
    let prompt: Option<PromptCallback> = match config.on_destination_exists {
        OverwritePolicy::Prompt => Some(Box::new(prompt_overwrite)),
        _ => None,
    };

    let result = run_batch(&cli.files, &desired, config, prompt, cancel)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        for line in &result.diagnostics {
            println!("{line}");
        }
        if result.applied_count == 0 {
            println!("nothing renamed");
        } else {
            println!("renamed {} files", result.applied_count);
        }
    }

    if !result.success {
        std::process::exit(1);
    }
    Ok(())
}

fn prompt_overwrite(task: &Task) -> bool {
    loop {
        print!("overwrite {}? [y/N]: ", task.destination.display());
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() {
            return false;
        }
        match input.trim().to_lowercase().as_str() {
            "y" | "yes" => return true,
            "n" | "no" | "" => return false,
            _ => println!("please answer y or n"),
        }
    }
}
