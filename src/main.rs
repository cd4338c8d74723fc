//! Mathtext - A terminal editor for math-annotated quiz text.
//!
//! # Usage
//!
//! ```bash
//! mathtext question.txt
//! mathtext --display-math question.txt
//! mathtext --dump question.txt
//! mathtext --ids 3
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use mathtext::app::App;
use mathtext::config::{
    ConfigFlags, ThemeMode, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, save_config_flags,
};
use mathtext::document::Document;
use mathtext::id::IdGenerator;
use mathtext::perf;
use mathtext::quiz::{Question, QuestionKind};
use mathtext::ui::style::set_theme;

/// A terminal editor for text with inline `$…$` formulas
#[derive(Parser, Debug)]
#[command(name = "mathtext", version, about, long_about = None)]
struct Cli {
    /// Text file to edit (`-` reads stdin for --dump and --render)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Print tokens and lines as JSON and exit
    #[arg(long, conflicts_with = "render")]
    dump: bool,

    /// Print the plain-text preview and exit
    #[arg(long)]
    render: bool,

    /// Print N fresh identifiers and exit
    #[arg(long, value_name = "N")]
    ids: Option<usize>,

    /// Print a blank question of KIND as JSON and exit
    #[arg(long, value_enum, value_name = "KIND")]
    new_question: Option<QuestionKind>,

    /// Treat `$$…$$` as a single display-math expression
    #[arg(long)]
    display_math: bool,

    /// Skip `$…$` runs that look like prices rather than formulas
    #[arg(long)]
    currency_heuristic: bool,

    /// Force the color theme background (light or dark)
    #[arg(long, value_enum, default_value = "auto")]
    theme: ThemeMode,

    /// Enable performance logging
    #[arg(long)]
    perf: bool,

    /// Write detailed render/edit debug events to a file
    #[arg(long, value_name = "PATH")]
    render_debug_log: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn read_source(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .context("Failed to read stdin")?;
            Ok(source)
        }
    }
}

fn print_ids(count: usize) {
    let mut ids = IdGenerator::new();
    for _ in 0..count {
        println!("{}", ids.generate());
    }
}

fn print_question(kind: QuestionKind) -> Result<()> {
    let mut ids = IdGenerator::new();
    let question = Question::new(kind, &mut ids);
    println!("{}", serde_json::to_string_pretty(&question)?);
    Ok(())
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    perf::set_enabled(effective.perf);
    let render_debug_log_path = effective
        .render_debug_log
        .clone()
        .or_else(|| std::env::var_os("MATHTEXT_RENDER_DEBUG_LOG").map(PathBuf::from));
    if let Err(err) = perf::set_debug_log_path(render_debug_log_path.as_deref()) {
        eprintln!(
            "[warn] Failed to initialize render debug log {}: {}",
            render_debug_log_path
                .as_ref()
                .map_or_else(|| "<unset>".to_string(), |p| p.display().to_string()),
            err
        );
    }
    set_theme(effective.theme.unwrap_or(ThemeMode::Auto));

    if let Some(count) = cli.ids {
        print_ids(count);
        return Ok(());
    }
    if let Some(kind) = cli.new_question {
        return print_question(kind);
    }

    let options = effective.tokenizer_options();
    if cli.dump || cli.render {
        let source = read_source(cli.file.as_deref())?;
        let document = {
            let _scope = perf::scope("cli.parse");
            Document::parse_with_options(&source, &options)
        };
        if cli.dump {
            println!("{}", serde_json::to_string_pretty(&document)?);
        } else {
            println!("{}", document.preview());
        }
        return Ok(());
    }

    let Some(file) = cli.file else {
        anyhow::bail!("No file given. Usage: mathtext FILE");
    };
    if file.is_dir() {
        anyhow::bail!("Not a file: {}", file.display());
    }

    // Run the application
    let mut app = App::new(file).with_options(options);
    app.run().context("Application error")
}
