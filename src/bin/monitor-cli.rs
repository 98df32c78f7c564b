use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "monitor-cli")]
#[command(about = "Management CLI for the cluster monitor", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a cluster; it must pass one health check
    Register {
        #[arg(long)]
        name: String,
        /// Monitor address as ip:port, repeatable
        #[arg(long = "host", required = true)]
        hosts: Vec<String>,
        /// Admin keyring secret
        #[arg(long)]
        key: String,
    },
    /// List registered clusters and their health
    List,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let url = format!("{}/clusters", cli.url.trim_end_matches('/'));

    let res = match cli.command {
        Commands::Register { name, hosts, key } => {
            client
                .post(&url)
                .json(&json!({ "name": name, "hosts": hosts, "key": key }))
                .send()
                .await?
        }
        Commands::List => client.get(&url).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if status == reqwest::StatusCode::NO_CONTENT {
        println!("No clusters registered");
        return Ok(());
    }

    let text = res.text().await?;
    if !status.is_success() {
        eprintln!("Error: monitor API returned status {}", status);
        eprintln!("{}", text);
        std::process::exit(1);
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
