use crate::client::HttpClient;
use crate::languages;
use anyhow::{Context, Result};
use serde_json::Value;
use snatch_model::{AcquireError, Translation};

/// Translate `text` into the language `target` (a code from [`languages::LANGUAGES`]).
///
/// The source language is auto-detected by the backend.
pub async fn translate(
    client: &HttpClient,
    text: &str,
    target: &str,
) -> Result<Translation, AcquireError> {
    let Some(code) = languages::canonical_code(target) else {
        return Err(AcquireError::MalformedInput(format!(
            "unsupported target language: {target}"
        )));
    };
    if text.trim().is_empty() {
        return Err(AcquireError::MalformedInput("nothing to translate".into()));
    }

    tracing::info!(target = code, chars = text.chars().count(), "Translating");
    let (translated, source_lang) = request_translation(client, text, code)
        .await
        .map_err(AcquireError::fetch)?;

    Ok(Translation {
        text: text.to_string(),
        translated,
        source_lang,
        target_lang: code.to_string(),
        target_name: languages::language_name(code).unwrap_or(code).to_string(),
    })
}

async fn request_translation(client: &HttpClient, text: &str, target: &str) -> Result<(String, String)> {
    let api = &client.config().translate_api_base;
    let request = client.get(api).query(&[
        ("client", "gtx"),
        ("sl", "auto"),
        ("tl", target),
        ("dt", "t"),
        ("q", text),
    ]);

    let body = client.send_for_text(request, api).await?;
    let value: Value = serde_json::from_str(&body).context("Malformed translation response")?;
    parse_translation(&value)
}

/// Read the nested-array response: sentence pairs at `[0]`, each with the
/// translated chunk first, and the detected source language at `[2]`.
fn parse_translation(value: &Value) -> Result<(String, String)> {
    let sentences = value
        .get(0)
        .and_then(Value::as_array)
        .context("Translation response has no sentence list")?;

    let translated: String = sentences
        .iter()
        .filter_map(|s| s.get(0).and_then(Value::as_str))
        .collect();
    anyhow::ensure!(!translated.is_empty(), "Translation response has no translated text");

    let source_lang = value
        .get(2)
        .and_then(Value::as_str)
        .unwrap_or("auto")
        .to_string();

    Ok((translated, source_lang))
}
