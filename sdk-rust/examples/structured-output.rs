use dotenvy::dotenv;
use serde_json::Value;
use vynce_llm::{
    openai::{OpenAIChatModel, OpenAIChatModelOptions},
    LanguageModel, LanguageModelInput, Message, ResponseFormatJson, ResponseFormatOption,
};

#[tokio::main]
async fn main() {
    dotenv().ok();

    let model = OpenAIChatModel::new(
        std::env::var("VYNCE_MODEL_ID").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
        OpenAIChatModelOptions {
            api_key: std::env::var("OPENAI_API_KEY")
                .expect("OPENAI_API_KEY environment variable must be set"),
            base_url: std::env::var("OPENAI_BASE_URL").ok(),
            ..Default::default()
        },
    );

    let text = "Saturday 9am-2pm at the Maple Street community hall: homemade cookies, \
                brownies and lemon bars. Every dollar goes to the Riverside Animal Shelter.";

    let schema = serde_json::json!({
      "type": "object",
      "properties": {
        "hashtags": {
          "type": "array",
          "description": "Relevant hashtags, each starting with '#'.",
          "items": { "type": "string" }
        },
        "colorPalette": {
          "type": "array",
          "description": "Hex color codes matching the mood of the event.",
          "items": { "type": "string" }
        }
      },
      "required": ["hashtags", "colorPalette"],
      "additionalProperties": false
    });

    let response = model
        .generate(LanguageModelInput {
            system_prompt: Some(
                "You are a social media expert. Suggest hashtags and a color palette for the \
                 event the user describes."
                    .into(),
            ),
            messages: vec![Message::user_text(text)],
            response_format: Some(ResponseFormatOption::Json(ResponseFormatJson {
                name: "event_promotion".to_string(),
                description: Some("Hashtags and a color palette for an event.".to_string()),
                schema: Some(schema),
            })),
            ..Default::default()
        })
        .await
        .unwrap();

    let val: Value = serde_json::from_str(&response.text()).expect("Invalid JSON response");

    println!(
        "{}",
        serde_json::to_string_pretty(&val).expect("Failed to format JSON")
    );
}
