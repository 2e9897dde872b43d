use anyhow::Context;
use clap::{Parser, Subcommand};
use conformance_client::{ApiClient, ClientConfig};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "conformancectl", version, about = "Conformance suite command-line client")]
struct Args {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Validate a discovery model file.
    Validate {
        /// Server base URL.
        #[arg(long, default_value = "https://127.0.0.1:8443")]
        server: String,
        #[arg(long)]
        file: String,
        /// Also print editor annotations for the reported problems.
        #[arg(long, default_value_t = false)]
        annotate: bool,
    },
    Run {
        #[command(subcommand)]
        run: RunCmd,
    },
}

#[derive(Subcommand, Debug)]
enum RunCmd {
    /// Start a validation run.
    Start {
        #[arg(long, default_value = "https://127.0.0.1:8443")]
        server: String,
        #[arg(long)]
        file: String,
    },
    /// Print the current status of a validation run.
    Track {
        #[arg(long, default_value = "https://127.0.0.1:8443")]
        server: String,
        #[arg(long)]
        id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    match args.cmd {
        Cmd::Validate {
            server,
            file,
            annotate,
        } => {
            let text = tokio::fs::read_to_string(&file)
                .await
                .context("read file")?;
            let model: Value = serde_json::from_str(&text).context("parse json")?;
            let client = ApiClient::new(ClientConfig::new(server));
            let result = client
                .validate_discovery_config(&model)
                .await
                .context("validate discovery model")?;
            info!(success = result.success, problems = result.problems.len(), "validated {file}");
            println!("{}", serde_json::to_string_pretty(&result)?);

            if annotate {
                let annotations =
                    conformance_core::annotations(Some(&result.problems[..]), &text)
                        .context("locate problems")?;
                println!("{}", serde_json::to_string_pretty(&annotations)?);
            }
        }
        Cmd::Run { run } => match run {
            RunCmd::Start { server, file } => {
                let bytes = tokio::fs::read(&file).await.context("read file")?;
                let req: Value = serde_json::from_slice(&bytes).context("parse json")?;
                let client = ApiClient::new(ClientConfig::new(server));
                let resp = client.start(&req).await.context("start validation run")?;
                print_response(resp).await?;
            }
            RunCmd::Track { server, id } => {
                let client = ApiClient::new(ClientConfig::new(server));
                let resp = client.track(&id).await.context("track validation run")?;
                print_response(resp).await?;
            }
        },
    }

    Ok(())
}

async fn print_response(resp: reqwest::Response) -> anyhow::Result<()> {
    let status = resp.status();
    let body: Value = resp.json().await.context("decode body")?;
    info!("status {status}");
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
