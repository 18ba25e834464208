use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use uuid::Uuid;

use super::provider::{EmbeddingProvider, LlmProvider};
use super::types::{ChatMessage, ChatRequest, ToolCall, ToolDefinition};
use crate::core::config::{EmbeddingConfig, LlmConfig};
use crate::core::errors::ApiError;

/// Client for any server exposing the OpenAI `/chat/completions` and
/// `/embeddings` endpoints (vLLM, TEI, LM Studio, ...).
#[derive(Clone)]
pub struct OpenAiCompatProvider {
    base_url: String,
    model: String,
    api_key: String,
    client: Client,
}

impl OpenAiCompatProvider {
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .build()
            .map_err(ApiError::internal)?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }

    pub fn from_llm_config(config: &LlmConfig) -> Result<Self, ApiError> {
        Self::new(
            &config.base_url,
            &config.model,
            &config.api_key,
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn from_embedding_config(config: &EmbeddingConfig) -> Result<Self, ApiError> {
        Self::new(
            &config.base_url,
            &config.model,
            &config.api_key,
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.client.post(&url).json(body);
        if !self.api_key.is_empty() {
            req = req.bearer_auth(&self.api_key);
        }

        let res = req.send().await.map_err(ApiError::upstream)?;
        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Upstream(format!(
                "{} returned {}: {}",
                url, status, text
            )));
        }

        res.json::<Value>().await.map_err(ApiError::upstream)
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        "openai_compat"
    }

    async fn health_check(&self) -> Result<bool, ApiError> {
        let url = format!("{}/models", self.base_url);
        match self.client.get(&url).send().await {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatMessage, ApiError> {
        let body = build_chat_body(&self.model, &request);
        let payload = self.post_json("/chat/completions", &body).await?;
        parse_assistant_message(&payload)
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiCompatProvider {
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, ApiError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let body = json!({
            "model": self.model,
            "input": inputs,
        });
        let payload = self.post_json("/embeddings", &body).await?;
        let embeddings = parse_embeddings(&payload)?;
        if embeddings.len() != inputs.len() {
            return Err(ApiError::Upstream(format!(
                "Embedding service returned {} vectors for {} inputs",
                embeddings.len(),
                inputs.len()
            )));
        }
        Ok(embeddings)
    }
}

fn build_chat_body(model: &str, request: &ChatRequest) -> Value {
    let mut body = json!({
        "model": model,
        "messages": to_wire_messages(&request.messages),
        "stream": false,
    });

    if let Some(obj) = body.as_object_mut() {
        if let Some(t) = request.temperature {
            obj.insert("temperature".to_string(), json!(t));
        }
        if let Some(t) = request.max_tokens {
            obj.insert("max_tokens".to_string(), json!(t));
        }
        if !request.tools.is_empty() {
            obj.insert("tools".to_string(), to_wire_tools(&request.tools));
            obj.insert("tool_choice".to_string(), json!("auto"));
        }
    }

    body
}

fn to_wire_messages(messages: &[ChatMessage]) -> Vec<Value> {
    messages
        .iter()
        .map(|msg| match msg {
            ChatMessage::System { content } => json!({"role": "system", "content": content}),
            ChatMessage::User { content } => json!({"role": "user", "content": content}),
            ChatMessage::Assistant {
                content,
                tool_calls,
            } => {
                if tool_calls.is_empty() {
                    return json!({"role": "assistant", "content": content});
                }
                let calls: Vec<Value> = tool_calls
                    .iter()
                    .map(|call| {
                        json!({
                            "id": call.id,
                            "type": "function",
                            "function": {
                                "name": call.name,
                                "arguments": call.arguments.to_string(),
                            }
                        })
                    })
                    .collect();
                let content = if content.is_empty() {
                    Value::Null
                } else {
                    Value::String(content.clone())
                };
                json!({"role": "assistant", "content": content, "tool_calls": calls})
            }
            ChatMessage::Tool {
                tool_call_id,
                content,
                ..
            } => json!({"role": "tool", "tool_call_id": tool_call_id, "content": content}),
        })
        .collect()
}

fn to_wire_tools(tools: &[ToolDefinition]) -> Value {
    Value::Array(
        tools
            .iter()
            .map(|tool| {
                json!({
                    "type": "function",
                    "function": {
                        "name": tool.name,
                        "description": tool.description,
                        "parameters": tool.parameters,
                    }
                })
            })
            .collect(),
    )
}

fn parse_assistant_message(payload: &Value) -> Result<ChatMessage, ApiError> {
    let message = payload
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .ok_or_else(|| ApiError::Upstream("Chat response has no choices".to_string()))?;

    let content = message
        .get("content")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    let mut tool_calls = Vec::new();
    if let Some(calls) = message.get("tool_calls").and_then(|v| v.as_array()) {
        for call in calls {
            tool_calls.push(parse_tool_call(call)?);
        }
    }

    Ok(ChatMessage::assistant_with_tools(content, tool_calls))
}

fn parse_tool_call(call: &Value) -> Result<ToolCall, ApiError> {
    let function = call
        .get("function")
        .ok_or_else(|| ApiError::Upstream("Tool call without function".to_string()))?;
    let name = function
        .get("name")
        .and_then(|v| v.as_str())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::Upstream("Tool call without name".to_string()))?;

    // Servers differ: arguments may be a JSON-encoded string or an object.
    let arguments = match function.get("arguments") {
        Some(Value::String(raw)) if raw.trim().is_empty() => json!({}),
        Some(Value::String(raw)) => serde_json::from_str::<Value>(raw).map_err(|e| {
            ApiError::Upstream(format!("Malformed arguments for tool `{}`: {}", name, e))
        })?,
        Some(Value::Null) | None => json!({}),
        Some(other) => other.clone(),
    };

    let id = call
        .get("id")
        .and_then(|v| v.as_str())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("call_{}", Uuid::new_v4().simple()));

    Ok(ToolCall {
        id,
        name: name.to_string(),
        arguments,
    })
}

fn parse_embeddings(payload: &Value) -> Result<Vec<Vec<f32>>, ApiError> {
    let data = payload
        .get("data")
        .and_then(|v| v.as_array())
        .ok_or_else(|| ApiError::Upstream("Embedding response has no data".to_string()))?;

    let mut indexed = Vec::with_capacity(data.len());
    for (position, item) in data.iter().enumerate() {
        let index = item
            .get("index")
            .and_then(|v| v.as_u64())
            .map(|v| v as usize)
            .unwrap_or(position);
        let values = item
            .get("embedding")
            .and_then(|v| v.as_array())
            .ok_or_else(|| ApiError::Upstream("Embedding item has no vector".to_string()))?;
        let vector = values
            .iter()
            .map(|v| {
                v.as_f64().map(|f| f as f32).ok_or_else(|| {
                    ApiError::Upstream(format!(
                        "Embedding {} has a non-numeric component: {}",
                        index, v
                    ))
                })
            })
            .collect::<Result<Vec<f32>, ApiError>>()?;
        indexed.push((index, vector));
    }

    indexed.sort_by_key(|(index, _)| *index);
    Ok(indexed.into_iter().map(|(_, vector)| vector).collect())
}
