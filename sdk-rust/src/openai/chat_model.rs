use super::chat_api::{
    ChatCompletionRequestMessage, ChatCompletionResponseMessage, CompletionUsage,
    CreateChatCompletionRequest, CreateChatCompletionResponse, JsonSchemaConfig, ResponseFormat,
};
use crate::{
    client_utils, LanguageModel, LanguageModelError, LanguageModelInput, LanguageModelResult,
    Message, ModelResponse, ModelUsage, Part, ResponseFormatJson, ResponseFormatOption,
};
use reqwest::{
    header::{self, HeaderMap, HeaderName, HeaderValue},
    Client,
};
use std::collections::HashMap;

const PROVIDER: &str = "openai";

pub struct OpenAIChatModel {
    model_id: String,
    api_key: String,
    base_url: String,
    client: Client,
    headers: HashMap<String, String>,
}

#[derive(Clone, Default)]
pub struct OpenAIChatModelOptions {
    pub base_url: Option<String>,
    pub api_key: String,
    pub headers: Option<HashMap<String, String>>,
    pub client: Option<Client>,
}

impl OpenAIChatModel {
    #[must_use]
    pub fn new(model_id: impl Into<String>, options: OpenAIChatModelOptions) -> Self {
        let OpenAIChatModelOptions {
            base_url,
            api_key,
            headers,
            client,
        } = options;

        let base_url = base_url
            .unwrap_or_else(|| "https://api.openai.com/v1".to_string())
            .trim_end_matches('/')
            .to_string();
        let client = client.unwrap_or_else(Client::new);
        let headers = headers.unwrap_or_default();

        Self {
            model_id: model_id.into(),
            api_key,
            base_url,
            client,
            headers,
        }
    }

    fn request_headers(&self) -> LanguageModelResult<HeaderMap> {
        let mut headers = HeaderMap::new();

        let auth_header =
            HeaderValue::from_str(&format!("Bearer {}", self.api_key)).map_err(|error| {
                LanguageModelError::InvalidInput(format!(
                    "Invalid OpenAI API key header value: {error}"
                ))
            })?;
        headers.insert(header::AUTHORIZATION, auth_header);

        for (key, value) in &self.headers {
            let header_name = HeaderName::from_bytes(key.as_bytes()).map_err(|error| {
                LanguageModelError::InvalidInput(format!(
                    "Invalid OpenAI header name '{key}': {error}"
                ))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|error| {
                LanguageModelError::InvalidInput(format!(
                    "Invalid OpenAI header value for '{key}': {error}"
                ))
            })?;
            headers.insert(header_name, header_value);
        }

        Ok(headers)
    }
}

#[async_trait::async_trait]
impl LanguageModel for OpenAIChatModel {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    fn model_id(&self) -> String {
        self.model_id.clone()
    }

    async fn generate(&self, input: LanguageModelInput) -> LanguageModelResult<ModelResponse> {
        crate::opentelemetry::trace_generate(
            self.provider(),
            &self.model_id(),
            input,
            |input| async move {
                let request = convert_to_openai_create_params(input, &self.model_id)?;
                let headers = self.request_headers()?;

                let response: CreateChatCompletionResponse = client_utils::send_json(
                    &self.client,
                    &format!("{}/chat/completions", self.base_url),
                    &request,
                    headers,
                )
                .await?;

                map_openai_response(response)
            },
        )
        .await
    }
}

fn convert_to_openai_create_params(
    input: LanguageModelInput,
    model_id: &str,
) -> LanguageModelResult<CreateChatCompletionRequest> {
    let messages = convert_to_openai_messages(input.messages, input.system_prompt)?;

    Ok(CreateChatCompletionRequest {
        model: model_id.to_string(),
        messages,
        response_format: input.response_format.map(convert_to_openai_response_format),
        max_completion_tokens: input.max_tokens,
        temperature: input.temperature,
        top_p: input.top_p,
        seed: input.seed,
        stream: false,
    })
}

fn convert_to_openai_messages(
    messages: Vec<Message>,
    system_prompt: Option<String>,
) -> LanguageModelResult<Vec<ChatCompletionRequestMessage>> {
    let mut openai_messages = Vec::new();

    if let Some(prompt) = system_prompt {
        openai_messages.push(ChatCompletionRequestMessage::System { content: prompt });
    }

    for message in messages {
        match message {
            Message::User(user_message) => {
                let content = join_text_parts(user_message.content);
                if content.is_empty() {
                    return Err(LanguageModelError::InvalidInput(
                        "User message content must not be empty".to_string(),
                    ));
                }
                openai_messages.push(ChatCompletionRequestMessage::User { content });
            }
            Message::Assistant(assistant_message) => {
                openai_messages.push(ChatCompletionRequestMessage::Assistant {
                    content: join_text_parts(assistant_message.content),
                });
            }
        }
    }

    Ok(openai_messages)
}

fn join_text_parts(parts: Vec<Part>) -> String {
    parts
        .into_iter()
        .map(|part| match part {
            Part::Text(text_part) => text_part.text,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn convert_to_openai_response_format(response_format: ResponseFormatOption) -> ResponseFormat {
    match response_format {
        ResponseFormatOption::Text => ResponseFormat::Text,
        ResponseFormatOption::Json(ResponseFormatJson {
            name,
            description,
            schema,
        }) => match schema {
            Some(schema) => ResponseFormat::JsonSchema {
                json_schema: JsonSchemaConfig {
                    name,
                    description,
                    schema,
                    strict: true,
                },
            },
            None => ResponseFormat::JsonObject,
        },
    }
}

fn map_openai_response(response: CreateChatCompletionResponse) -> LanguageModelResult<ModelResponse> {
    let choice = response.choices.into_iter().next().ok_or_else(|| {
        LanguageModelError::Invariant(PROVIDER, "No choices in response".to_string())
    })?;

    if let Some(reason) = choice.finish_reason.as_deref() {
        if reason == "length" {
            tracing::warn!(provider = PROVIDER, "completion truncated by token limit");
        }
    }

    let content = map_openai_message(choice.message)?;
    let usage = response.usage.map(map_openai_usage);

    Ok(ModelResponse { content, usage })
}

fn map_openai_message(message: ChatCompletionResponseMessage) -> LanguageModelResult<Vec<Part>> {
    if let Some(refusal) = message.refusal {
        if !refusal.is_empty() {
            return Err(LanguageModelError::Refusal(refusal));
        }
    }

    Ok(message
        .content
        .filter(|content| !content.is_empty())
        .map(|content| vec![Part::text(content)])
        .unwrap_or_default())
}

fn map_openai_usage(usage: CompletionUsage) -> ModelUsage {
    ModelUsage {
        input_tokens: usage.prompt_tokens,
        output_tokens: usage.completion_tokens,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn converts_system_prompt_and_messages() {
        let input = LanguageModelInput {
            system_prompt: Some("You are a social media expert.".to_string()),
            messages: vec![Message::user_text("Hashtags for a bake sale")],
            temperature: Some(0.7),
            ..Default::default()
        };

        let request = convert_to_openai_create_params(input, "gpt-4o-mini").unwrap();

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": "gpt-4o-mini",
                "messages": [
                    { "role": "system", "content": "You are a social media expert." },
                    { "role": "user", "content": "Hashtags for a bake sale" }
                ],
                "temperature": 0.7,
                "stream": false
            })
        );
    }

    #[test]
    fn json_format_with_schema_is_strict_json_schema() {
        let schema = json!({
            "type": "object",
            "properties": { "hashtags": { "type": "array", "items": { "type": "string" } } },
            "required": ["hashtags"],
            "additionalProperties": false
        });
        let format = convert_to_openai_response_format(ResponseFormatOption::Json(
            ResponseFormatJson {
                name: "relevant_hashtags".to_string(),
                description: None,
                schema: Some(schema.clone()),
            },
        ));

        assert_eq!(
            serde_json::to_value(format).unwrap(),
            json!({
                "type": "json_schema",
                "json_schema": {
                    "name": "relevant_hashtags",
                    "schema": schema,
                    "strict": true
                }
            })
        );
    }

    #[test]
    fn json_format_without_schema_is_json_object() {
        let format = convert_to_openai_response_format(ResponseFormatOption::Json(
            ResponseFormatJson {
                name: "caption_variants".to_string(),
                description: None,
                schema: None,
            },
        ));
        assert_eq!(
            serde_json::to_value(format).unwrap(),
            json!({ "type": "json_object" })
        );
    }

    #[test]
    fn rejects_empty_user_message() {
        let input = LanguageModelInput {
            messages: vec![Message::user(vec![])],
            ..Default::default()
        };
        let err = convert_to_openai_create_params(input, "gpt-4o-mini").unwrap_err();
        assert!(matches!(err, LanguageModelError::InvalidInput(_)));
    }

    #[test]
    fn maps_content_and_usage() {
        let response: CreateChatCompletionResponse = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": "{\"hashtags\":[\"#a\"]}", "refusal": null },
                "finish_reason": "stop"
            }],
            "usage": { "prompt_tokens": 12, "completion_tokens": 5, "total_tokens": 17 }
        }))
        .unwrap();

        let mapped = map_openai_response(response).unwrap();
        assert_eq!(
            mapped,
            ModelResponse {
                content: vec![Part::text("{\"hashtags\":[\"#a\"]}")],
                usage: Some(ModelUsage {
                    input_tokens: 12,
                    output_tokens: 5,
                }),
            }
        );
    }

    #[test]
    fn refusal_becomes_error() {
        let response: CreateChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{
                "message": { "content": null, "refusal": "I can't help with that." },
                "finish_reason": "stop"
            }]
        }))
        .unwrap();

        let err = map_openai_response(response).unwrap_err();
        assert!(matches!(err, LanguageModelError::Refusal(msg) if msg == "I can't help with that."));
    }

    #[test]
    fn missing_choices_is_invariant() {
        let response: CreateChatCompletionResponse =
            serde_json::from_value(json!({ "choices": [] })).unwrap();
        let err = map_openai_response(response).unwrap_err();
        assert!(matches!(err, LanguageModelError::Invariant("openai", _)));
    }
}
