mod common;

use common::{marketing_json, mock_gateway, prompt_text, Reply, ScriptedClient, BAKE_SALE};
use serde_json::json;
use std::sync::Arc;
use vynce_llm::{
    llm_sdk_test::{MockGenerateResult, MockLanguageModel},
    LanguageModelError, ResponseFormatOption,
};
use vynce_studio::{
    artifacts::CaptionLength, ContentBrief, ContentGateway, CreativeBrief, GeneratedArtifact,
    StoryModificationRequest, StudioError, UseCase,
};

#[tokio::test]
async fn invoke_returns_the_validated_json_output() {
    let model = Arc::new(MockLanguageModel::new());
    model.enqueue_generate(MockGenerateResult::text(
        r##"{"colorPalette": ["#F4A261", "#2A9D8F", "#264653"]}"##,
    ));
    let gateway = mock_gateway(&model);

    let output = gateway
        .invoke("color-palette", &json!({ "contentDescription": "Autumn cafe opening" }))
        .await
        .unwrap();

    assert_eq!(
        output,
        json!({ "colorPalette": ["#F4A261", "#2A9D8F", "#264653"] })
    );
    let inputs = model.tracked_generate_inputs();
    assert!(prompt_text(&inputs[0].messages[0]).contains("Content Description: Autumn cafe opening"));
    let Some(ResponseFormatOption::Json(format)) = &inputs[0].response_format else {
        panic!("expected a json response format");
    };
    assert_eq!(
        format.schema.as_ref().unwrap()["additionalProperties"],
        json!(false)
    );
}

#[tokio::test]
async fn unknown_use_case_or_bad_input_never_reaches_the_client() {
    let client = ScriptedClient::new([]);
    let gateway = ContentGateway::standard(client.clone()).unwrap();

    for (use_case, input) in [
        ("summarize", json!({ "contentDescription": "x" })),
        ("relevant-hashtags", json!({ "description": "wrong field" })),
        ("relevant-hashtags", json!({ "contentDescription": "" })),
        ("relevant-hashtags", json!({ "contentDescription": 42 })),
        ("relevant-hashtags", json!({ "contentDescription": "   " })),
        ("modify-story", json!({ "originalStory": "Once.", "instruction": " \n\t" })),
        ("marketing-content", json!({ "description": " ".repeat(20) })),
        ("modify-story", json!({ "originalStory": "Once." })),
        ("marketing-content", json!({ "description": "too short" })),
    ] {
        let result = gateway.invoke(use_case, &input).await;
        assert!(
            matches!(result, Err(StudioError::InvalidInput(_))),
            "{use_case} {input}: {result:?}"
        );
    }
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn brief_at_the_bounds_is_sent_unchanged() {
    let client = ScriptedClient::new([
        Reply::Text(marketing_json("Ten", "Short.")),
        Reply::Text(marketing_json("Five Hundred", "Long.")),
    ]);
    let gateway = ContentGateway::standard(client.clone()).unwrap();

    for description in ["0123456789".to_string(), "y".repeat(500)] {
        gateway
            .generate_marketing_content(&CreativeBrief::new(description.clone()))
            .await
            .unwrap();
    }

    let requests = client.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].prompt.as_str().ends_with("User request: 0123456789\n"));
    assert!(requests[1].prompt.as_str().contains(&"y".repeat(500)));
}

#[tokio::test]
async fn same_input_renders_byte_identical_prompts() {
    let client = ScriptedClient::new([
        Reply::Text(r##"{"hashtags": ["#a"]}"##.to_string()),
        Reply::Text(r##"{"hashtags": ["#b"]}"##.to_string()),
    ]);
    let gateway = ContentGateway::standard(client.clone()).unwrap();
    let brief = ContentBrief::new("Handmade candles for the holidays");

    gateway.suggest_relevant_hashtags(&brief).await.unwrap();
    gateway
        .invoke(
            "relevant-hashtags",
            &json!({ "contentDescription": "Handmade candles for the holidays" }),
        )
        .await
        .unwrap();

    let requests = client.requests();
    assert_eq!(
        requests[0].prompt.as_str().as_bytes(),
        requests[1].prompt.as_str().as_bytes()
    );
    assert_eq!(requests[0].response_format, requests[1].response_format);
}

#[tokio::test]
async fn caption_variants_accept_a_fenced_array() {
    let client = ScriptedClient::new([Reply::Text(
        "```json\n[\n  {\"length\": \"short\", \"caption\": \"Ride on.\"},\n  {\"length\": \"long\", \"caption\": \"Dawn rides are the best rides.\"}\n]\n```".to_string(),
    )]);
    let gateway = ContentGateway::standard(client.clone()).unwrap();

    let captions = gateway
        .generate_caption_variants(&ContentBrief::new("Vintage bicycles at dawn"))
        .await
        .unwrap();

    assert_eq!(captions.len(), 2);
    assert_eq!(
        captions.with_length(CaptionLength::Long).collect::<Vec<_>>(),
        vec!["Dawn rides are the best rides."]
    );
    assert_eq!(client.requests()[0].response_format, ResponseFormatOption::Text);
}

#[tokio::test]
async fn headline_variants_decode_every_tone() {
    let client = ScriptedClient::new([Reply::Text(
        json!([
            { "tone": "funny", "catchy_line": "Wheelie good mornings" },
            { "tone": "emotional", "catchy_line": "Every ride remembers you" },
            { "tone": "aesthetic", "catchy_line": "Chrome and golden hour" }
        ])
        .to_string(),
    )]);
    let gateway = ContentGateway::standard(client).unwrap();

    let headlines = gateway
        .generate_headline_variants(&ContentBrief::new("Vintage bicycles at dawn"))
        .await
        .unwrap();

    assert!(headlines.is_canonical());
    assert_eq!(headlines.find_tone("aesthetic"), Some("Chrome and golden hour"));
}

#[tokio::test]
async fn image_prompt_bundle_is_returned_whole() {
    let raw = json!({
        "catchy_line": "Bake the world better",
        "image_prompt": "Overhead shot of a rustic table of pastries, soft morning light",
        "creative_description": "A cozy flat lay that invites neighbors in.",
        "variants": [
            { "tone": "funny", "catchy_line": "Knead a treat?" },
            { "tone": "emotional", "catchy_line": "Every crumb helps a paw" },
            { "tone": "aesthetic", "catchy_line": "Golden crusts, golden hearts" }
        ],
        "hashtags": ["#bakesale", "#adoptdontshop"],
        "color_palette": ["#F4E1C1", "#A0522D", "#FFFFFF"]
    });
    let client = ScriptedClient::new([Reply::Text(raw.to_string())]);
    let gateway = ContentGateway::standard(client).unwrap();

    let bundle = gateway
        .generate_image_prompts(&ContentBrief::new(BAKE_SALE))
        .await
        .unwrap();

    assert_eq!(bundle.catchy_line, "Bake the world better");
    assert_eq!(bundle.variants.iter().count(), 3);
    assert_eq!(bundle.color_palette.len(), 3);
}

#[tokio::test]
async fn invoke_artifact_tags_the_output() {
    let client = ScriptedClient::new([Reply::Text(
        r#"{"modifiedStory": "A shorter story."}"#.to_string(),
    )]);
    let gateway = ContentGateway::standard(client).unwrap();

    let artifact = gateway
        .invoke_artifact(
            "modify-story",
            &json!({ "originalStory": "A long story.", "instruction": "make it shorter" }),
        )
        .await
        .unwrap();

    assert_eq!(artifact.use_case(), UseCase::ModifyStory);
    let GeneratedArtifact::ModifiedStory(result) = artifact else {
        panic!("expected a modified story");
    };
    assert_eq!(result.modified_story, "A shorter story.");
}

#[tokio::test]
async fn output_failing_its_shape_is_malformed_and_not_retryable() {
    for raw in [
        "Sure! Here are some hashtags: #a #b",
        r##"{"hashtags": "#a #b"}"##,
        r##"{"tags": ["#a"]}"##,
    ] {
        let client = ScriptedClient::new([Reply::Text(raw.to_string())]);
        let gateway = ContentGateway::standard(client).unwrap();

        let err = gateway
            .suggest_relevant_hashtags(&ContentBrief::new("Candles"))
            .await
            .unwrap_err();

        assert!(
            matches!(&err, StudioError::MalformedGenerationOutput { use_case, .. } if use_case == "relevant-hashtags"),
            "{raw}: {err:?}"
        );
        assert!(!err.is_retryable());
    }
}

#[tokio::test]
async fn provider_refusal_is_malformed_output() {
    let model = Arc::new(MockLanguageModel::new());
    model.enqueue_generate(MockGenerateResult::error(LanguageModelError::Refusal(
        "I can't help with that.".to_string(),
    )));
    let gateway = mock_gateway(&model);

    let err = gateway
        .modify_story(&StoryModificationRequest::new("Once.", "make it darker"))
        .await
        .unwrap_err();

    assert!(matches!(
        &err,
        StudioError::MalformedGenerationOutput { use_case, .. } if use_case == "modify-story"
    ));
}

#[tokio::test]
async fn provider_failures_are_labelled_with_the_calling_flow() {
    let model = Arc::new(MockLanguageModel::new());
    model.enqueue_generate(MockGenerateResult::error(LanguageModelError::Refusal(
        "no".to_string(),
    )));
    let gateway = mock_gateway(&model);
    let brief = CreativeBrief::new(BAKE_SALE);

    let refused = gateway.generate_marketing_content(&brief).await.unwrap_err();
    let exhausted = gateway.generate_marketing_content(&brief).await.unwrap_err();

    for err in [refused, exhausted] {
        assert!(
            matches!(&err, StudioError::MalformedGenerationOutput { use_case, .. } if use_case == "marketing-content"),
            "{err:?}"
        );
    }
    assert_eq!(model.generate_calls(), 2);
}

#[tokio::test]
async fn transport_failure_is_unavailable_and_retryable() {
    let client = ScriptedClient::new([Reply::Unavailable("connection refused")]);
    let gateway = ContentGateway::standard(client).unwrap();

    let err = gateway
        .suggest_color_palette(&ContentBrief::new("Autumn cafe opening"))
        .await
        .unwrap_err();

    assert!(matches!(err, StudioError::GenerationUnavailable(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn registry_lists_every_use_case() {
    let gateway = ContentGateway::standard(ScriptedClient::new([])).unwrap();
    let ids: Vec<&str> = gateway.registry().use_cases().map(UseCase::id).collect();
    assert_eq!(
        ids,
        vec![
            "marketing-content",
            "caption-variants",
            "headline-variants",
            "image-prompts",
            "color-palette",
            "relevant-hashtags",
            "modify-story",
        ]
    );
}
