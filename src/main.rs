use std::io::{self, Read, Write};
use std::path::Path;

use clap::Parser;
use owo_colors::OwoColorize;

use keiyaku::cli::{generate_completions, AppConfig, Args, Commands};
use keiyaku::diagnostic::render_diagnostics;
use keiyaku::interpreter::{run_source, Limits, WriteEmit};

fn main() {
    let args = Args::parse();

    if let Some(Commands::Complete { shell }) = args.command {
        generate_completions(shell);
        return;
    }

    let config = AppConfig::from_args(&args);

    verbose_log(&config, "Starting keiyaku");

    let (source, source_name) = match read_source_input(&args, &config) {
        Ok(pair) => pair,
        Err(e) => {
            error_message(&config, &e);
            std::process::exit(1);
        }
    };

    verbose_log(
        &config,
        &format!("Read {} bytes of source", source.len()),
    );

    let mut limits = Limits::default();
    if let Some(depth) = config.max_call_depth {
        limits.max_call_depth = depth;
    }

    let stdout = io::stdout();
    let mut emitter = WriteEmit::new(stdout.lock());

    if let Err(diagnostics) = run_source(&source, &mut emitter, limits, None) {
        let rendered = render_diagnostics(&source, &source_name, &diagnostics, config.color_enabled);
        eprint!("{}", rendered);
        std::process::exit(1);
    }

    verbose_log(&config, "Program finished");
    let _ = io::stdout().flush();
}

fn read_source_input(args: &Args, config: &AppConfig) -> Result<(String, String), String> {
    if let Some(script) = &args.script {
        verbose_log(
            config,
            &format!("Reading script from file: {}", script.display()),
        );
        let text = read_file(script)?;
        Ok((strip_bom(text), script.display().to_string()))
    } else if let Some(source) = &args.eval {
        verbose_log(config, "Using source from command-line argument");
        Ok((source.clone(), "<eval>".to_string()))
    } else {
        verbose_log(config, "Reading script from stdin");
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| format!("Failed to read from stdin: {}", e))?;

        if buffer.trim().is_empty() {
            return Err(
                "No input provided. Must provide a script file, --eval, or source via stdin"
                    .to_string(),
            );
        }

        Ok((strip_bom(buffer), "<stdin>".to_string()))
    }
}

fn read_file(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))
}

fn strip_bom(text: String) -> String {
    match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    }
}

fn verbose_log(config: &AppConfig, message: &str) {
    if config.verbose {
        eprintln!("[keiyaku:debug] {}", message);
    }
}

fn error_message(config: &AppConfig, message: &str) {
    if config.color_enabled {
        eprintln!("{}", message.red().bold());
    } else {
        eprintln!("{}", message);
    }
}
