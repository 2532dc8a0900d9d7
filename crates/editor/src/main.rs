use std::io::Read;

use sheetlab_editor_lib::command::execute_json_batch;
use sheetlab_editor_lib::harness::EditorHarness;
use sheetlab_editor_lib::state::EditorSettings;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sheetlab_editor=info".into()),
        )
        .init();

    let args = CliArgs::parse();
    let mut harness = EditorHarness::with_settings(EditorSettings::load());

    if let Some(path) = &args.document {
        match std::fs::read_to_string(path) {
            Ok(json) => match harness.load_document_json(&json) {
                Ok(id) => tracing::info!("Loaded document from {path} ({id})"),
                Err(e) => {
                    tracing::error!("Failed to parse document JSON from {path}: {e}");
                    std::process::exit(1);
                }
            },
            Err(e) => {
                tracing::error!("Failed to read {path}: {e}");
                std::process::exit(1);
            }
        }
    }

    let batch = match &args.commands {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to read {path}: {e}");
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            if let Err(e) = std::io::stdin().read_to_string(&mut buffer) {
                tracing::error!("Failed to read stdin: {e}");
                std::process::exit(1);
            }
            buffer
        }
    };

    match execute_json_batch(&mut harness, &batch) {
        Ok(responses) => {
            let mut failed = false;
            for response in responses {
                if !response.success {
                    failed = true;
                }
                match serde_json::to_string(&response) {
                    Ok(line) => println!("{line}"),
                    Err(e) => tracing::error!("Failed to serialize response: {e}"),
                }
            }
            if failed {
                std::process::exit(2);
            }
        }
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    }
}

struct CliArgs {
    document: Option<String>,
    commands: Option<String>,
}

impl CliArgs {
    fn parse() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let mut parsed = Self {
            document: None,
            commands: None,
        };
        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--document" if i + 1 < args.len() => {
                    parsed.document = Some(args[i + 1].clone());
                    i += 2;
                }
                "--commands" if i + 1 < args.len() => {
                    parsed.commands = Some(args[i + 1].clone());
                    i += 2;
                }
                other => {
                    tracing::warn!("Ignoring unknown argument: {other}");
                    i += 1;
                }
            }
        }
        parsed
    }
}
