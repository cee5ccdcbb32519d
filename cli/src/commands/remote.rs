use clap::Args;
use serde_json::json;

use crate::util::{CliResult, get_json, post_json, read_input};

#[derive(Args)]
pub struct AskArgs {
    /// Question text (reads --input or stdin when omitted)
    question: Option<String>,
    /// Dispatch option: project_analysis, auto, cost_optimization, executive_report, default
    #[arg(long)]
    option: Option<String>,
    /// Conversation session id
    #[arg(long)]
    session: Option<String>,
    /// Send the text to the agent directly instead of through dispatch
    #[arg(long, conflicts_with = "option")]
    raw: bool,
}

pub async fn health(api_url: &str) -> CliResult {
    get_json(api_url, "/health").await
}

pub async fn ask(api_url: &str, input: Option<&str>, args: AskArgs) -> CliResult {
    let question = match args.question {
        Some(q) => q,
        None => read_input(input)?,
    };

    let code = if args.raw {
        post_json(
            api_url,
            "/api/agent",
            json!({"inputText": question, "sessionId": args.session}),
        )
        .await
    } else {
        post_json(
            api_url,
            "/api/agent/dispatch",
            json!({
                "userQuestion": question,
                "optionKey": args.option,
                "sessionId": args.session,
            }),
        )
        .await
    };
    Ok(code)
}
