use std::io::{self, Read, Write};

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use shiftplan_engine::model::{Roster, WorkerSpec};
use shiftplan_engine::rules::CapacityRules;
use shiftplan_engine::{solve, validator};

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
enum Request {
    Generate {
        workers: Vec<WorkerSpec>,
        #[serde(default)]
        rules: CapacityRules,
        /// Fixes the backfill shuffle; omitted means a fresh random run.
        seed: Option<u64>,
    },
    Validate {
        workers: Vec<WorkerSpec>,
        #[serde(default)]
        rules: CapacityRules,
    },
}

#[derive(Debug, Serialize)]
struct OkResponse<T: Serialize> {
    ok: bool,
    data: T,
}

#[derive(Debug, Serialize)]
struct ErrResponse {
    ok: bool,
    error: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn write_ok<T: Serialize>(data: T) {
    let resp = OkResponse { ok: true, data };
    let json = serde_json::to_string(&resp).unwrap_or_else(|e| {
        format!("{{\"ok\":false,\"error\":\"serialization error: {}\"}}", e)
    });
    println!("{}", json);
    let _ = io::stdout().flush();
}

fn write_err(msg: impl std::fmt::Display) -> ! {
    let resp = ErrResponse {
        ok: false,
        error: msg.to_string(),
    };
    let json = serde_json::to_string(&resp).unwrap_or_else(|_| {
        "{\"ok\":false,\"error\":\"double serialization error\"}".to_string()
    });
    println!("{}", json);
    let _ = io::stdout().flush();
    std::process::exit(1);
}

fn init_tracing() {
    // stdout carries the JSON protocol, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    init_tracing();

    let mut input = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut input) {
        write_err(format!("Failed to read stdin: {}", e));
    }

    let request: Request = match serde_json::from_str(&input) {
        Ok(r) => r,
        Err(e) => write_err(format!("Invalid JSON input: {}", e)),
    };

    match request {
        Request::Generate { workers, rules, seed } => {
            let roster = Roster { workers, rules };

            let check = validator::validate(&roster);
            if !check.is_ok() {
                write_err(check.errors.join("; "));
            }
            for warning in &check.warnings {
                tracing::warn!("{}", warning);
            }

            match solve(&roster, seed) {
                Ok(solved) => write_ok(solved),
                Err(e) => write_err(e),
            }
        }
        Request::Validate { workers, rules } => {
            let result = validator::validate(&Roster { workers, rules });
            write_ok(result);
        }
    }
}
