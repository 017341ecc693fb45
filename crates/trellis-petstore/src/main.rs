//! Pet store CLI.
//!
//! `validate` and `export` work on the API description only; `serve` runs
//! the HTTP server with the documentation endpoints enabled.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use trellis::Error;
use trellis_axum::{ApiRouterExt, ValidationIssue};
use trellis_openapi::{Format, SpecConfig};
use trellis_petstore::{build_api, default_config, AppState};
use trellis_telemetry::{
    init_logging, log_listening, log_shutdown, log_startup, LogFormat, TelemetryConfig,
};

#[derive(Parser, Debug)]
#[command(name = "petstore", about = "Pet store API built on trellis", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile the route tree and report every problem found.
    Validate {
        /// Document config file (YAML).
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Write the API description to a file.
    Export {
        /// Output path. `.json` writes JSON, anything else YAML.
        #[arg(short = 'o', long)]
        output: PathBuf,

        /// Override the format chosen from the file extension (json, yaml).
        #[arg(long)]
        format: Option<String>,

        /// Document config file (YAML).
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Run the HTTP server.
    Serve {
        /// Listen address.
        #[arg(long, default_value = "127.0.0.1:8080")]
        listen: SocketAddr,

        /// Document config file (YAML).
        #[arg(long)]
        config: Option<PathBuf>,

        /// Log level.
        #[arg(long, env = "TRELLIS_LOG_LEVEL", default_value = "info")]
        log_level: String,

        /// Log format (json, pretty).
        #[arg(long, env = "TRELLIS_LOG_FORMAT", default_value = "json")]
        log_format: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Command::Validate { config } => {
            let config = match load_config(config.as_deref()) {
                Ok(config) => config,
                Err(code) => return code,
            };

            match build_api(config).validate() {
                Ok(()) => {
                    println!("API description valid.");
                    ExitCode::SUCCESS
                }
                Err(e) => report(&e),
            }
        }

        Command::Export {
            output,
            format,
            config,
        } => {
            let config = match load_config(config.as_deref()) {
                Ok(config) => config,
                Err(code) => return code,
            };

            let api = build_api(config);
            let result = match format.as_deref() {
                None => api.write_schema_to(&output),
                Some(name) => {
                    let Some(format) = Format::parse(name) else {
                        eprintln!("error: unknown format '{}' (expected json or yaml)", name);
                        return ExitCode::from(2);
                    };
                    api.generate_schema(format).and_then(|bytes| {
                        std::fs::write(&output, bytes).map_err(|source| Error::Io {
                            path: output.clone(),
                            source,
                        })
                    })
                }
            };

            match result {
                Ok(()) => {
                    println!("API description written to: {}", output.display());
                    ExitCode::SUCCESS
                }
                Err(e) => report(&e),
            }
        }

        Command::Serve {
            listen,
            config,
            log_level,
            log_format,
        } => {
            let Some(log_format) = LogFormat::parse(&log_format) else {
                eprintln!("error: unknown log format '{}' (expected json or pretty)", log_format);
                return ExitCode::from(2);
            };
            let telemetry = TelemetryConfig::new()
                .with_service_name("petstore")
                .with_log_level(log_level)
                .with_log_format(log_format);
            if let Err(e) = init_logging(&telemetry) {
                eprintln!("error: {}", e);
                return ExitCode::from(2);
            }
            log_startup!(
                service = %telemetry.service_name,
                version = env!("CARGO_PKG_VERSION"),
                log_format = telemetry.log_format.as_str(),
                "petstore starting"
            );

            let config = match load_config(config.as_deref()) {
                Ok(config) => config,
                Err(code) => return code,
            };

            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    eprintln!("error: failed to create runtime: {}", e);
                    return ExitCode::from(1);
                }
            };
            rt.block_on(async {
                match run_server(listen, config).await {
                    Ok(()) => ExitCode::SUCCESS,
                    Err(e) => {
                        eprintln!("error: {:#}", e);
                        ExitCode::from(1)
                    }
                }
            })
        }
    }
}

/// Read the config file if one was given, otherwise use the built-in one.
fn load_config(path: Option<&Path>) -> Result<SpecConfig, ExitCode> {
    match path {
        None => Ok(default_config()),
        Some(path) => SpecConfig::from_yaml_file(path).map_err(|e| {
            eprintln!("error[{}]: {}", e.code(), e);
            ExitCode::from(2)
        }),
    }
}

/// Print an error and map it to an exit code: 1 for problems in the route
/// tree, 3 for I/O failures.
fn report(error: &Error) -> ExitCode {
    match error {
        Error::Build(errors) => {
            for issue in errors.iter().map(ValidationIssue::from) {
                eprintln!(
                    "error[{}]: {}{}",
                    issue.code,
                    issue.message,
                    issue
                        .location
                        .as_ref()
                        .map(|l| format!(" ({})", l))
                        .unwrap_or_default()
                );
            }
            eprintln!("{} error(s) in route tree", errors.len());
            ExitCode::from(1)
        }
        Error::Io { .. } => {
            eprintln!("error: {}", error);
            ExitCode::from(3)
        }
        _ => {
            eprintln!("error: {}", error);
            ExitCode::from(1)
        }
    }
}

async fn run_server(listen: SocketAddr, config: SpecConfig) -> anyhow::Result<()> {
    let docs_enabled = !config.disabled;
    let docs_path = config.docs_path.clone();
    let api = build_api(config);
    api.configure_host(|host| host.layer(TraceLayer::new_for_http()))?;

    // Description problems are served as problem details from the spec
    // endpoint; only host failures stop startup.
    if let Err(e) = api.validate() {
        for error in e.build_errors().into_iter().flatten() {
            tracing::warn!(error = %error, "route tree problem");
        }
    }

    let app = api.into_axum()?.with_state(AppState::new());

    let listener = TcpListener::bind(listen).await?;
    log_listening!(
        address = %listen,
        docs = docs_enabled.then_some(docs_path.as_str()),
        "petstore listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log_shutdown!("petstore stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
