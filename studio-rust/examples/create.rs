use futures::StreamExt;
use std::io::Write;
use tracing_subscriber::EnvFilter;
use vynce_studio::{
    transcript::RenderedMessage, SessionContext, StudioConfig, TurnEvent, TurnOrchestrator,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vynce_studio=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let brief = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    let brief = if brief.trim().is_empty() {
        "A bake sale for the local animal shelter.".to_string()
    } else {
        brief
    };

    let config = StudioConfig::from_env().expect("failed to load configuration");
    let gateway = config.build_gateway().expect("failed to build gateway");
    let orchestrator = TurnOrchestrator::new(
        gateway,
        SessionContext::anonymous(),
        config.orchestrator_options(),
    );

    println!("{}\n", orchestrator.context().greeting());
    println!("> {brief}\n");

    {
        let events = orchestrator.submit_stream(&brief);
        futures::pin_mut!(events);

        let mut printed = 0;
        while let Some(event) = events.next().await {
            match event {
                TurnEvent::Pending => eprintln!("(thinking...)"),
                TurnEvent::Frame(frame) => {
                    print!("{}", &frame.text[printed..]);
                    printed = frame.text.len();
                    std::io::stdout().flush().ok();
                }
                TurnEvent::Answered(content) => {
                    println!("\n");
                    println!("{} | tone: {}", content.kind().title(), content.tone);
                    println!("{}", content.hashtags.join(" "));
                }
                TurnEvent::Failed(error) => eprintln!("turn failed: {error}"),
                TurnEvent::Ignored => eprintln!("nothing to submit"),
            }
        }
    }

    let transcript = orchestrator.finish();
    if let Some(RenderedMessage::Titled { title, .. }) = transcript.last().map(|turn| turn.rendered()) {
        eprintln!("transcript: {} turns, last titled \"{title}\"", transcript.len());
    }
}
