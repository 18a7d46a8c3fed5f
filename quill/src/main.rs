use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use quill_lib::{
    command::{execute, Command, CommandOutcome},
    editor_state::EditorContext,
};

#[derive(Parser)]
#[command(about = "Gap-buffer document storage for the Quill editor")]
struct Cli {
    /// File to open into the initial buffer
    path: Option<PathBuf>,

    /// Display name for the initial buffer when no file is given
    #[arg(long, default_value = "scratch")]
    name: String,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut ctx = EditorContext::new();
    let command = match cli.path {
        Some(path) => Command::OpenFile { path },
        None => Command::NewBuffer { name: cli.name },
    };

    let handle = match execute(&mut ctx, command) {
        Ok(CommandOutcome::Opened(handle)) => handle,
        Ok(_) => return ExitCode::SUCCESS,
        Err(e) => {
            error!("failed to open initial buffer: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(buffer) = ctx.registry.get(handle) {
        let scalars = buffer.iter().count();
        println!(
            "{}: {} bytes, {} scalars, capacity {}",
            buffer.name(),
            buffer.len(),
            scalars,
            buffer.capacity()
        );
    }

    ExitCode::SUCCESS
}
