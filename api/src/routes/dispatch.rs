use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use relay_core::transport::session_or_default;
use relay_core::{
    SectionPreset, clarification_reply, detect_refusal, is_analysis_intent, normalize_sections,
};
use serde::Deserialize;
use serde_json::Value;

use crate::error::AppError;
use crate::extract::AppJson;
use crate::routes::agent::{AgentResponse, require_text};
use crate::state::AppState;
use crate::transport::collect_reply;

const DEFAULT_OPTION_KEY: &str = "default";

pub fn router() -> Router<AppState> {
    Router::new().route("/api/agent/dispatch", post(dispatch_agent))
}

/// How much the agent may write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AnswerLevel {
    #[default]
    Brief,
    Detailed,
}

impl AnswerLevel {
    fn word_limit(self, preset: SectionPreset) -> usize {
        match (preset, self) {
            (SectionPreset::ProjectAnalysis, AnswerLevel::Brief) => 200,
            (SectionPreset::ProjectAnalysis, AnswerLevel::Detailed) => 800,
            (SectionPreset::CostOptimization, AnswerLevel::Brief) => 180,
            (SectionPreset::CostOptimization, AnswerLevel::Detailed) => 700,
            (SectionPreset::ExecutiveReport, AnswerLevel::Brief) => 160,
            (SectionPreset::ExecutiveReport, AnswerLevel::Detailed) => 500,
        }
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DispatchRequest {
    pub user_question: String,
    /// project_analysis | auto | cost_optimization | executive_report | default
    #[serde(default)]
    pub option_key: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub level: Option<AnswerLevel>,
    /// Client facts for report prompts: company {name, industry, country},
    /// projectData {techStack}, traffic, conversion, avgCheck, messages
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub client_context: Option<Value>,
    /// Ask for industry benchmark notes in project analysis (default true)
    #[serde(default)]
    pub include_benchmarks: Option<bool>,
}

/// Caller-supplied extras folded into a report prompt.
#[derive(Debug, Clone, Copy)]
pub struct PromptOptions<'a> {
    pub level: AnswerLevel,
    pub client_context: Option<&'a Value>,
    pub include_benchmarks: bool,
}

impl Default for PromptOptions<'_> {
    fn default() -> Self {
        Self {
            level: AnswerLevel::default(),
            client_context: None,
            include_benchmarks: true,
        }
    }
}

/// Map an option key to the report layout it asks for.
///
/// `project_analysis` and `auto` only produce a report when the question
/// reads like an analysis request; anything unknown falls through to chat.
pub fn resolve_preset(option_key: &str, question: &str) -> Option<SectionPreset> {
    match option_key.trim().to_lowercase().as_str() {
        "project_analysis" | "auto" => {
            is_analysis_intent(question).then_some(SectionPreset::ProjectAnalysis)
        }
        "cost_optimization" => Some(SectionPreset::CostOptimization),
        "executive_report" => Some(SectionPreset::ExecutiveReport),
        _ => None,
    }
}

/// Render a context value: strings bare, other scalars via JSON, null as absent.
fn scalar(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(text) if text.trim().is_empty() => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// Tech stack given either as a list or as one string.
fn tech_stack(ctx: &Value, accept_string: bool) -> String {
    match ctx.pointer("/projectData/techStack") {
        Some(Value::Array(items)) if !items.is_empty() => items
            .iter()
            .filter_map(|item| scalar(Some(item)))
            .collect::<Vec<_>>()
            .join(", "),
        Some(Value::String(text)) if accept_string && !text.trim().is_empty() => text.clone(),
        _ => "Unknown".to_string(),
    }
}

fn context_lines(preset: SectionPreset, ctx: &Value) -> Vec<String> {
    let or = |value: Option<String>, fallback: &str| value.unwrap_or_else(|| fallback.to_string());
    let client = or(scalar(ctx.pointer("/company/name")), "Not specified");

    match preset {
        SectionPreset::ProjectAnalysis => {
            let messages = ctx
                .get("messages")
                .and_then(Value::as_array)
                .map_or(0, Vec::len);
            vec![
                format!("Client: {client}"),
                format!(
                    "Industry: {}",
                    or(scalar(ctx.pointer("/company/industry")), "Not specified")
                ),
                format!(
                    "Region: {}",
                    or(scalar(ctx.pointer("/company/country")), "Not specified")
                ),
                format!("Known Tech Stack: {}", tech_stack(ctx, true)),
                format!("Traffic: {}", or(scalar(ctx.get("traffic")), "Unknown")),
                format!("Conversion: {}", or(scalar(ctx.get("conversion")), "Unknown")),
                format!("Avg Check: {}", or(scalar(ctx.get("avgCheck")), "Unknown")),
                format!("Past messages: {messages}"),
            ]
        }
        SectionPreset::CostOptimization => vec![
            format!("Client: {client}"),
            format!("Known Tech Stack: {}", tech_stack(ctx, false)),
        ],
        SectionPreset::ExecutiveReport => vec![format!("Client: {client}")],
    }
}

/// Agent instruction for a structured report: the exact headings, the
/// client context, then the question.
pub fn build_agent_input(preset: SectionPreset, question: &str, options: PromptOptions<'_>) -> String {
    let headings = preset.headings();
    let empty = Value::Null;
    let context = context_lines(preset, options.client_context.unwrap_or(&empty))
        .into_iter()
        .map(|line| format!("- {line}"))
        .collect::<Vec<_>>()
        .join("\n");
    let benchmarks = match (preset, options.include_benchmarks) {
        (SectionPreset::ProjectAnalysis, true) => "- Include industry benchmark notes.\n",
        (SectionPreset::ProjectAnalysis, false) => "- Skip benchmarks.\n",
        _ => "",
    };

    format!(
        "Return ONLY Markdown, no code fences.\n\
         Use EXACTLY these {count} section headings, each on its own line, in this order:\n\
         {list}\n\
         Every section must be present; write assumptions where data is missing.\n\
         Max words: {limit}. Start directly with \"{first}\".\n\
         {benchmarks}\n\
         CONTEXT:\n\
         {context}\n\n\
         User question:\n\"\"\"{question}\"\"\"",
        count = headings.len(),
        list = headings.join("\n"),
        limit = options.level.word_limit(preset),
        first = headings.first().copied().unwrap_or_default(),
    )
}

/// Route a question to chat or to one of the structured reports
#[utoipa::path(
    post,
    path = "/api/agent/dispatch",
    request_body = DispatchRequest,
    responses(
        (status = 200, description = "Agent answer, normalized when a report was requested", body = AgentResponse),
        (status = 400, description = "Invalid body or agent not configured", body = crate::error::ApiError),
        (status = 401, description = "Agent credentials missing", body = crate::error::ApiError),
        (status = 502, description = "Agent failed", body = crate::error::ApiError)
    ),
    tag = "agent"
)]
pub async fn dispatch_agent(
    State(state): State<AppState>,
    AppJson(req): AppJson<DispatchRequest>,
) -> Result<Json<AgentResponse>, AppError> {
    let question = require_text(&req.user_question, "userQuestion")?;
    let option_key = req.option_key.as_deref().unwrap_or(DEFAULT_OPTION_KEY);

    if state.mock {
        return Ok(Json(AgentResponse::ok(format!(
            "[MOCK_DISPATCH] key={option_key} q='{question}'"
        ))));
    }

    let session_id = session_or_default(req.session_id.as_deref());
    let transport = state.transport.as_ref();

    let Some(preset) = resolve_preset(option_key, question) else {
        let output = collect_reply(transport, question, session_id).await?;
        return Ok(Json(AgentResponse::ok(output)));
    };

    tracing::debug!(preset = preset.name(), session_id, "dispatching structured report");
    let options = PromptOptions {
        level: req.level.unwrap_or_default(),
        client_context: req.client_context.as_ref(),
        include_benchmarks: req.include_benchmarks.unwrap_or(true),
    };
    let input = build_agent_input(preset, question, options);
    let raw = collect_reply(transport, &input, session_id).await?;

    let output = match detect_refusal(&raw) {
        Some(refusal) => clarification_reply(&refusal),
        None => normalize_sections(&raw, preset.headings(), true),
    };
    Ok(Json(AgentResponse::ok(output)))
}
