use std::fs::OpenOptions;
use std::io::Write;

use clap::{Parser, ValueEnum};
use reqwest::Client;
use rustyline::{error::ReadlineError, DefaultEditor};
use serde_json::Value;

const LOG_FILE: &str = "flights.log";

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
    Search,
    Get,
    Update,
    Delete,
}

/// Command-line client for the flightgraph document service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Action to run against the flight service
    #[arg(value_enum)]
    action: Action,

    /// Flight id, for get/update/delete
    #[arg(short, long)]
    id: Option<String>,

    /// Minimum rating (search only)
    #[arg(short, long, default_value_t = 0.0)]
    rating: f64,

    /// Minimum number of pages
    #[arg(short = 'p', long = "num_pages", default_value_t = 0)]
    num_pages: u32,

    /// Minimum ratings count
    #[arg(long = "ratings_count", visible_alias = "rc", default_value_t = 0)]
    ratings_count: u32,

    /// Language filter
    #[arg(short, long)]
    language: Option<String>,

    /// Base URL of the flight service
    #[arg(long, env = "FLIGHTS_API_URL", default_value = "http://localhost:8000")]
    url: String,
}

impl Args {
    fn validate(&self) -> Result<(), String> {
        if self.id.is_some() && self.action == Action::Search {
            return Err("Can't use arg id with action search".to_string());
        }
        if self.rating != 0.0 && self.action != Action::Search {
            return Err("Rating arg can only be used with search action".to_string());
        }
        Ok(())
    }
}

/// Sends log records to `flights.log`, or stderr when it cannot be opened.
fn init_logging() {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} [{}] {}: {}",
            buf.timestamp(),
            record.level(),
            record.target(),
            record.args()
        )
    });
    match OpenOptions::new().create(true).append(true).open(LOG_FILE) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(e) => eprintln!("Cannot open {}: {}; logging to stderr", LOG_FILE, e),
    }
    builder.init();
}

#[tokio::main]
async fn main() {
    init_logging();
    let args = Args::parse();

    log::info!("Welcome to the flight statistics client. App requests to: {}", args.url);

    if let Err(message) = args.validate() {
        log::error!("{}", message);
        std::process::exit(1);
    }

    match args.action {
        Action::Search => {
            if let Err(e) = search(&Client::new(), &args.url).await {
                eprintln!("Error: {}", e);
            }
        }
        Action::Get | Action::Update | Action::Delete => {
            log::info!("Action {:?} has nothing to do", args.action);
        }
    }
}

fn prompt(rl: &mut DefaultEditor, question: &str) -> Result<String, String> {
    match rl.readline(question) {
        Ok(line) => Ok(line.trim().to_string()),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
            Err("input cancelled".to_string())
        }
        Err(e) => Err(e.to_string()),
    }
}

async fn search(client: &Client, url: &str) -> Result<(), String> {
    let mut rl = DefaultEditor::new().map_err(|e| e.to_string())?;
    let option = prompt(&mut rl, "Statistics for airline or airport(airline/airport): ")?;
    let option_chosen = prompt(&mut rl, "Write the specific airline/airport: ")?;

    match monthly_travel(client, url, &option, &option_chosen).await {
        Ok(Value::Array(rows)) => {
            for row in &rows {
                print_flight(row);
            }
        }
        Ok(other) => print_flight(&other),
        Err(e) => println!("Error: {}", e),
    }
    Ok(())
}

async fn monthly_travel(
    client: &Client,
    url: &str,
    option: &str,
    option_chosen: &str,
) -> Result<Value, String> {
    let endpoint = format!("{}/flight", url.trim_end_matches('/'));
    log::info!("GET {} option={} option_chosen={}", endpoint, option, option_chosen);

    let response = client
        .get(&endpoint)
        .query(&[("option", option), ("option_chosen", option_chosen)])
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let status = response.status();
    if status.is_success() {
        response.json().await.map_err(|e| e.to_string())
    } else {
        let text = response.text().await.unwrap_or_default();
        log::error!("Request failed with {}: {}", status, text);
        Err(format!("{} {}", status, text))
    }
}

fn print_flight(flight: &Value) {
    for line in flight_lines(flight) {
        println!("{}", line);
    }
    println!("{}", "=".repeat(50));
}

fn flight_lines(flight: &Value) -> Vec<String> {
    match flight {
        Value::Object(fields) => fields
            .iter()
            .map(|(key, value)| match value {
                Value::String(s) => format!("{}: {}", key, s),
                other => format!("{}: {}", key, other),
            })
            .collect(),
        other => vec![other.to_string()],
    }
}
