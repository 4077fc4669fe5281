use clap::Parser;
use fluxo::prelude::*;
use rand::{Rng, rngs::ThreadRng};
use std::fs;

/// A CLI tool to generate random flow definitions and command scripts for stress-testing fluxo
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated flow JSON file to
    #[arg(short, long, default_value = "generated_flow.json")]
    output: String,

    /// Optional path to write a matching command script to
    #[arg(short, long)]
    script: Option<String>,

    /// Number of nodes to generate
    #[arg(long, default_value_t = 30)]
    nodes: usize,

    /// The maximum number of outgoing transitions per node
    #[arg(long, default_value_t = 3)]
    max_transitions: usize,

    /// Probability that a transition points to a node that does not exist
    #[arg(long, default_value_t = 0.0)]
    dangling: f64,
}

const NODE_TYPES: [&str; 4] = ["static_message", "question", "handler", "end"];
const KEYWORDS: [&str; 6] = ["preço", "horário", "endereço", "sim", "não", "agendar"];

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut rng = rand::rng();

    if !(0.0..=1.0).contains(&cli.dangling) {
        eprintln!("Error: --dangling ({}) must be between 0 and 1", cli.dangling);
        std::process::exit(1);
    }

    println!(
        "Generating a flow with {} node(s), up to {} transition(s) each...",
        cli.nodes, cli.max_transitions
    );

    let def = generate_flow(&mut rng, &cli);
    let problems = validate(&def);
    fs::write(&cli.output, def.to_json_string_pretty()?)?;
    println!(
        "Saved '{}' ({} transitions, {} validation problem(s))",
        cli.output,
        def.transition_count(),
        problems.len()
    );

    if let Some(path) = &cli.script {
        let script = generate_script(&mut rng, &def);
        // The script must apply cleanly to the flow it was generated for.
        let outcome = interpret(&def, &script)?;
        fs::write(path, &script)?;
        println!(
            "Saved '{}' ({} command(s) applied cleanly)",
            path,
            outcome.applied.len()
        );
    }

    Ok(())
}

fn generate_flow(rng: &mut ThreadRng, cli: &Cli) -> Definition {
    let ids: Vec<String> = (0..cli.nodes).map(|i| format!("n{}", i)).collect();
    let nodes: Vec<serde_json::Value> = ids
        .iter()
        .map(|id| {
            let node_type = NODE_TYPES[rng.random_range(0..NODE_TYPES.len())];
            let count = if node_type == "end" {
                0
            } else {
                rng.random_range(0..=cli.max_transitions)
            };
            let transitions: Vec<serde_json::Value> = (0..count)
                .map(|_| {
                    let to = if rng.random_bool(cli.dangling) {
                        format!("missing_{}", rng.random_range(0..1000))
                    } else {
                        ids[rng.random_range(0..ids.len())].clone()
                    };
                    if rng.random_bool(0.5) {
                        serde_json::json!({ "to": to })
                    } else {
                        let word = KEYWORDS[rng.random_range(0..KEYWORDS.len())];
                        serde_json::json!({ "to": to, "when": { "contains_any": [word] } })
                    }
                })
                .collect();
            serde_json::json!({
                "id": id,
                "type": node_type,
                "prompt": format!("Mensagem {}", id),
                "transitions": transitions,
            })
        })
        .collect();

    normalize(&serde_json::json!({ "version": 1, "nodes": nodes }))
}

/// A script that only references nodes it can rely on existing.
fn generate_script(rng: &mut ThreadRng, def: &Definition) -> String {
    let mut lines = vec!["inserir lgpd curto".to_string()];
    let mut known: Vec<String> = def.nodes.iter().map(|n| n.id.clone()).collect();
    for i in 0..rng.random_range(1..10) {
        let id = format!("extra_{}", i);
        lines.push(format!("criar nó {} prompt \"Passo extra {}\"", id, i));
        if let Some(from) = known.get(rng.random_range(0..known.len().max(1))) {
            lines.push(format!("nó {} -> {} se sim", from, id));
        }
        known.push(id);
    }
    lines.join("\n")
}
