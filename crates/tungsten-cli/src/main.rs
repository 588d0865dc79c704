mod error;

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use error::CliError;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tungsten_driver::Compiler;
use tungsten_source::{
    ColorChoice, CompilerConfig, DiagnosticFormat, RenderStyle, DEFAULT_CONFIG_FILE,
};

#[derive(Parser, Debug)]
#[command(name = "tungsten")]
#[command(version, about = "Tungsten compiler front end: lexes and parses source files", long_about = None)]
struct Args {
    /// Source files to compile
    #[arg(value_name = "FILES")]
    files: Vec<PathBuf>,

    /// Configuration file (defaults to ./tungsten.toml when present)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// How diagnostics are printed
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// When to colour diagnostics
    #[arg(long, value_enum)]
    color: Option<ColorArg>,

    /// Columns a tab character advances
    #[arg(long, value_name = "N")]
    tab_width: Option<u32>,

    /// Maximum nesting depth accepted by the parser
    #[arg(long, value_name = "N")]
    max_depth: Option<u32>,

    /// Exit with status 1 when any error was reported
    #[arg(long)]
    deny_errors: bool,

    /// Print the syntax tree of every compiled file
    #[arg(long)]
    emit_ast: bool,

    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    /// One line per diagnostic
    Plain,
    /// Source snippets with labels
    Rich,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ColorArg {
    Auto,
    Always,
    Never,
}

impl From<FormatArg> for DiagnosticFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Plain => DiagnosticFormat::Plain,
            FormatArg::Rich => DiagnosticFormat::Rich,
        }
    }
}

impl From<ColorArg> for ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => ColorChoice::Auto,
            ColorArg::Always => ColorChoice::Always,
            ColorArg::Never => ColorChoice::Never,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    match run(&args) {
        Ok(code) => code,
        Err(report) => {
            eprintln!("{report:?}");
            ExitCode::from(2)
        }
    }
}

fn run(args: &Args) -> miette::Result<ExitCode> {
    let config = resolve_config(args)?;
    let style = RenderStyle {
        format: config.diagnostics.format,
        color: use_color(config.diagnostics.color),
    };

    let mut compiler = Compiler::new(config);
    compiler.compile_paths(&args.files);

    if args.emit_ast {
        for unit in compiler.units() {
            if let Some(tree) = unit.tree() {
                println!("// {}", unit.path().display());
                println!("{tree:#?}");
            }
        }
    }

    compiler
        .diagnostics()
        .print_all(compiler.sources(), style)
        .map_err(CliError::Output)?;

    log::info!(
        "{} file(s) compiled, {} diagnostic(s)",
        compiler.files_processed(),
        compiler.diagnostics().len()
    );
    Ok(ExitCode::from(compiler.exit_code() as u8))
}

/// Loads the configuration file, then applies command-line overrides.
fn resolve_config(args: &Args) -> Result<CompilerConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => CompilerConfig::load(path)?,
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if default.is_file() {
                CompilerConfig::load(default)?
            } else {
                CompilerConfig::default()
            }
        }
    };

    if let Some(format) = args.format {
        config.diagnostics.format = format.into();
    }
    if let Some(color) = args.color {
        config.diagnostics.color = color.into();
    }
    if let Some(tab_width) = args.tab_width {
        config.lexer.tab_width = tab_width;
    }
    if let Some(max_depth) = args.max_depth {
        config.parser.max_depth = max_depth;
    }
    if args.deny_errors {
        config.diagnostics.deny_errors = true;
    }

    config.validate()?;
    Ok(config)
}

fn use_color(choice: ColorChoice) -> bool {
    match choice {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => std::io::stderr().is_terminal(),
    }
}
