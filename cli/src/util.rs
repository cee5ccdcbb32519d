use std::io::Read;

use serde_json::json;

pub type CliResult<T = i32> = Result<T, Box<dyn std::error::Error>>;

pub fn client() -> reqwest::Client {
    reqwest::Client::new()
}

pub fn exit_error(message: &str, docs_hint: Option<&str>) -> ! {
    let mut err = json!({
        "error": "cli_error",
        "message": message
    });
    if let Some(hint) = docs_hint {
        err["docs_hint"] = json!(hint);
    }
    eprintln!("{}", serde_json::to_string_pretty(&err).unwrap_or_else(|_| err.to_string()));
    std::process::exit(1);
}

/// Read the whole input from a file path, or from stdin when the path is
/// absent or "-".
pub fn read_input(path: Option<&str>) -> Result<String, String> {
    match path {
        Some(p) if p != "-" => {
            std::fs::read_to_string(p).map_err(|e| format!("Failed to read '{p}': {e}"))
        }
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("Failed to read stdin: {e}"))?;
            Ok(buf)
        }
    }
}

/// POST a JSON body to the relay API and print the response.
///
/// Exit codes: 0 success, 1 client error (4xx), 2 server error, 3 connection error.
pub async fn post_json(api_url: &str, path: &str, body: serde_json::Value) -> i32 {
    let url = format!("{}{path}", api_url.trim_end_matches('/'));
    let resp = match client().post(&url).json(&body).send().await {
        Ok(r) => r,
        Err(e) => {
            let err = json!({
                "error": "connection_error",
                "message": format!("{e}"),
                "docs_hint": "Is the relay API running? Check RELAY_API_URL."
            });
            eprintln!("{err:#}");
            return 3;
        }
    };

    let status = resp.status().as_u16();
    let resp_body: serde_json::Value = match resp.json().await {
        Ok(v) => v,
        Err(e) => json!({"raw_error": format!("Failed to parse response as JSON: {e}")}),
    };

    match status {
        200..=299 => {
            println!("{resp_body:#}");
            0
        }
        400..=499 => {
            eprintln!("{resp_body:#}");
            1
        }
        _ => {
            eprintln!("{resp_body:#}");
            2
        }
    }
}

/// GET a path on the relay API and print the JSON response.
pub async fn get_json(api_url: &str, path: &str) -> CliResult {
    let url = format!("{}{path}", api_url.trim_end_matches('/'));
    let resp = client().get(&url).send().await?;
    let ok = resp.status().is_success();
    let body: serde_json::Value = resp.json().await?;
    if ok {
        println!("{body:#}");
        Ok(0)
    } else {
        eprintln!("{body:#}");
        Ok(1)
    }
}
