use clap::Parser;
use serde_json::{Map, Value};

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Send one request through a running forwarding gateway", long_about = None)]
struct Cli {
    /// Gateway base URL
    #[arg(short, long, default_value = "http://localhost:8080")]
    gateway: String,

    /// HTTP method to use upstream
    #[arg(short = 'X', long, default_value = "GET")]
    method: String,

    /// Extra upstream header as `Name: value` (repeatable)
    #[arg(short = 'H', long = "header")]
    headers: Vec<String>,

    /// Request body forwarded for POST/PUT/PATCH/DELETE
    #[arg(short, long)]
    data: Option<String>,

    /// Print response headers
    #[arg(short, long)]
    include: bool,

    /// Target URL
    url: String,
}

fn headers_json(headers: &[String]) -> Result<Option<String>, Box<dyn std::error::Error>> {
    if headers.is_empty() {
        return Ok(None);
    }

    let mut object = Map::new();
    for header in headers {
        let (name, value) = header
            .split_once(':')
            .ok_or_else(|| format!("header '{}' is not in `Name: value` form", header))?;
        object.insert(name.trim().to_string(), Value::String(value.trim().to_string()));
    }
    Ok(Some(Value::Object(object).to_string()))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut query = vec![("url", cli.url.clone()), ("method", cli.method.clone())];
    if let Some(json) = headers_json(&cli.headers)? {
        query.push(("headers", json));
    }

    // The gateway reads its instructions from the query string; the inbound
    // verb only matters for carrying a body.
    let mut request = match &cli.data {
        Some(data) => client.post(&cli.gateway).body(data.clone()),
        None => client.get(&cli.gateway),
    };
    request = request.query(&query);

    let res = request.send().await?;
    print_response(res, cli.include).await
}

async fn print_response(
    res: reqwest::Response,
    include_headers: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if include_headers || !status.is_success() {
        eprintln!("Status: {}", status);
    }
    if include_headers {
        for (name, value) in res.headers() {
            eprintln!("{}: {}", name, value.to_str().unwrap_or("<binary>"));
        }
        eprintln!();
    }

    let is_json = res
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"));

    let text = res.text().await?;
    if is_json {
        match serde_json::from_str::<Value>(&text) {
            Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
            Err(_) => println!("{}", text),
        }
    } else {
        println!("{}", text);
    }
    Ok(())
}
