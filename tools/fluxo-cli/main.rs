use clap::{Parser, Subcommand};
use fluxo::prelude::*;
use std::fs;
use std::io::{self, Write};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Normalize, validate and edit chatbot flow definitions from the command line
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Optional interpreter configuration JSON file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the canonical form of a flow definition
    Normalize {
        /// Path to the flow definition JSON file
        flow_path: String,
    },
    /// List structural problems in a flow definition
    Validate {
        /// Path to the flow definition JSON file
        flow_path: String,
    },
    /// Apply a command script, all or nothing
    Apply {
        /// Path to the flow definition JSON file
        flow_path: String,
        /// Path to the command script
        script_path: String,
        /// Where to write the resulting definition (stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Describe what each line of a command script would do
    Preview {
        /// Path to the flow definition JSON file
        flow_path: String,
        /// Path to the command script
        script_path: String,
    },
    /// Type commands one line at a time against a flow definition
    Repl {
        /// Path to the flow definition JSON file (an empty flow when omitted)
        flow_path: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => InterpreterConfig::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load config: {}", e))),
        None => InterpreterConfig::default(),
    };
    let interpreter = Interpreter::new(config);

    match cli.command {
        Command::Normalize { flow_path } => {
            let def = load_flow(&flow_path);
            print_json(&def);
        }
        Command::Validate { flow_path } => run_validate(&flow_path),
        Command::Apply {
            flow_path,
            script_path,
            output,
        } => run_apply(&interpreter, &flow_path, &script_path, output),
        Command::Preview {
            flow_path,
            script_path,
        } => {
            let def = load_flow(&flow_path);
            let script = read_file(&script_path);
            for line in interpreter.preview(&def, &script) {
                match &line.error {
                    None => println!("  {:>3} ok    {}", line.line, line.description),
                    Some(e) => println!("  {:>3} error {}\n            {}", line.line, line.description, e),
                }
            }
        }
        Command::Repl { flow_path } => run_interactive(&interpreter, flow_path),
    }
}

fn run_validate(flow_path: &str) {
    let start = Instant::now();
    let def = load_flow(flow_path);
    let problems = validate(&def);
    let duration = start.elapsed();

    println!(
        "Flow '{}': {} node(s), {} transition(s), start = '{}'",
        flow_path,
        def.nodes.len(),
        def.transition_count(),
        def.start
    );
    if problems.is_empty() {
        println!("  -> Valid ({:?})", duration);
    } else {
        for problem in &problems {
            println!("  -> {}", problem);
        }
        std::process::exit(2);
    }
}

fn run_apply(interpreter: &Interpreter, flow_path: &str, script_path: &str, output: Option<String>) {
    let def = load_flow(flow_path);
    let script = read_file(script_path);

    let outcome = interpreter
        .interpret(&def, &script)
        .unwrap_or_else(|e| exit_with_error(&format!("Script rejected: {}", e)));

    for step in &outcome.applied {
        eprintln!("  -> {}", step);
    }
    for problem in validate(&outcome.definition) {
        eprintln!("  warning: {}", problem);
    }

    match output {
        Some(path) => {
            let json = outcome
                .definition
                .to_json_string_pretty()
                .unwrap_or_else(|e| exit_with_error(&e.to_string()));
            fs::write(&path, json).unwrap_or_else(|e| {
                exit_with_error(&format!("Could not write to file '{}': {}", path, e))
            });
            eprintln!("Saved to '{}'", path);
        }
        None => print_json(&outcome.definition),
    }
}

/// Reads commands one line at a time; `:show`, `:check` and `:quit` are meta commands.
fn run_interactive(interpreter: &Interpreter, flow_path: Option<String>) {
    println!("--- Fluxo Interactive Mode ---");
    let mut def = flow_path
        .as_deref()
        .map(load_flow)
        .unwrap_or_else(|| normalize(&serde_json::json!({})));

    loop {
        let line = prompt_for_input(&format!("[{}]", def.start), None);
        match line.as_str() {
            ":quit" | ":q" => break,
            ":show" => print_json(&def),
            ":check" => {
                let problems = validate(&def);
                if problems.is_empty() {
                    println!("  -> Valid");
                }
                for problem in problems {
                    println!("  -> {}", problem);
                }
            }
            "" => {}
            text => match interpreter.interpret(&def, text) {
                Ok(outcome) => {
                    for step in &outcome.applied {
                        println!("  -> {}", step);
                    }
                    def = outcome.definition;
                }
                Err(e) => println!("  Error: {}", e),
            },
        }
    }
}

fn load_flow(path: &str) -> Definition {
    Definition::from_json_str(&read_file(path))
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse flow '{}': {}", path, e)))
}

fn read_file(path: &str) -> String {
    fs::read_to_string(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read file '{}': {}", path, e)))
}

fn print_json(def: &Definition) {
    let json = def
        .to_json_string_pretty()
        .unwrap_or_else(|e| exit_with_error(&e.to_string()));
    println!("{}", json);
}

/// A helper function to prompt the user and read a line of input.
fn prompt_for_input(prompt_text: &str, default: Option<&str>) -> String {
    let mut line = String::new();
    let default_prompt = default.map_or("".to_string(), |d| format!(" [default: {}]", d));

    print!("> {}{}: ", prompt_text, default_prompt);
    if io::stdout().flush().is_err() {
        exit_with_error("Failed to flush stdout");
    }

    match io::stdin().read_line(&mut line) {
        Ok(0) => return ":quit".to_string(),
        Ok(_) => {}
        Err(e) => exit_with_error(&format!("Failed to read line: {}", e)),
    }
    let trimmed = line.trim().to_string();

    if trimmed.is_empty() {
        default.unwrap_or("").to_string()
    } else {
        trimmed
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
