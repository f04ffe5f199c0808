use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use pdf_text_prep::{AnalyzedDocument, RawDocument};
use regex::Regex;
use serde::Deserialize;
use serde_json::{Value, json};
use worker::wasm_bindgen::JsValue;
use worker::{Fetch, Headers, Method, Request, RequestInit};

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::models::{Classification, MAX_PROMPT_TEXT_CHARS};

pub const SYSTEM_PROMPT: &str = "You classify business and legal documents. \
Reply with a single JSON object with the keys docType, docCategory, documentTitle, \
summary and parties. parties is an array of the names of people or organisations \
the document is between or about. Use an empty string or empty array when unknown.";

const FALLBACK_FILE_NAME: &str = "document.pdf";

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// Cuts `text` to at most `max_chars` characters on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

pub fn pdf_data_url(bytes: &[u8]) -> String {
    format!("data:application/pdf;base64,{}", STANDARD.encode(bytes))
}

/// Chat-completions payload carrying the raw PDF, its metadata and the
/// cleaned text.
pub fn build_request_body(
    model: &str,
    file_name: &str,
    pdf_bytes: &[u8],
    analyzed: &AnalyzedDocument,
) -> Result<Value, ApiError> {
    let metadata = serde_json::to_string_pretty(&analyzed.metadata)
        .map_err(|error| ApiError::Internal(format!("failed to encode metadata: {error}")))?;
    let text = truncate_chars(&analyzed.text, MAX_PROMPT_TEXT_CHARS);

    Ok(json!({
        "model": model,
        "response_format": { "type": "json_object" },
        "messages": [
            { "role": "system", "content": SYSTEM_PROMPT },
            {
                "role": "user",
                "content": [
                    {
                        "type": "file",
                        "file": {
                            "filename": file_name,
                            "file_data": pdf_data_url(pdf_bytes),
                        },
                    },
                    {
                        "type": "text",
                        "text": format!("Document metadata:\n{metadata}\n\nExtracted text:\n{text}"),
                    },
                ],
            },
        ],
    }))
}

fn strip_code_fence(content: &str) -> &str {
    let fence_re = Regex::new(r"(?s)^\s*```[A-Za-z]*\s*(?P<body>.*?)\s*```\s*$")
        .expect("hardcoded code fence regex is valid");
    fence_re
        .captures(content)
        .and_then(|capture| capture.name("body"))
        .map_or(content, |body| body.as_str())
}

/// Extracts the classification from a chat-completions response body.
pub fn parse_classification(body: &str) -> Result<Classification, ApiError> {
    let completion = serde_json::from_str::<ChatCompletion>(body)?;
    let content = completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| ApiError::Classifier("classifier returned no content".to_string()))?;

    let classification = serde_json::from_str::<Classification>(strip_code_fence(&content))?;
    Ok(classification)
}

pub async fn classify(
    config: &AppConfig,
    document: &RawDocument,
    analyzed: &AnalyzedDocument,
) -> Result<Classification, ApiError> {
    let api_key = config
        .api_key
        .as_deref()
        .ok_or_else(|| ApiError::Internal("OPENAI_API_KEY is not configured".to_string()))?;

    let body = build_request_body(
        &config.classifier_model,
        document.file_name().unwrap_or(FALLBACK_FILE_NAME),
        document.bytes(),
        analyzed,
    )?;

    let headers = Headers::new();
    headers.set("Content-Type", "application/json")?;
    headers.set("Authorization", &format!("Bearer {api_key}"))?;

    let mut init = RequestInit::new();
    init.with_method(Method::Post)
        .with_headers(headers)
        .with_body(Some(JsValue::from_str(&body.to_string())));
    let request = Request::new_with_init(config.classifier_url.as_str(), &init)?;

    let mut response = Fetch::Request(request)
        .send()
        .await
        .map_err(|error| ApiError::Classifier(format!("classifier request failed: {error}")))?;
    let status = response.status_code();
    let payload = response.text().await?;
    if status >= 400 {
        return Err(ApiError::Classifier(format!(
            "classifier returned status {status}: {}",
            truncate_chars(&payload, 500)
        )));
    }

    parse_classification(&payload)
}
