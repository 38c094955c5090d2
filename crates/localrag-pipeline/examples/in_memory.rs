use localrag_core::config::Config;
use localrag_core::types::{DocType, Document};
use localrag_embed::HashEmbedder;
use localrag_llm::OpenAiChat;
use localrag_pipeline::RagPipeline;

fn main() -> anyhow::Result<()> {
    let settings = Config::load()?.settings()?;
    let documents = vec![
        Document::new(
            "LangGraph is a library for building stateful, multi-actor applications with LLMs. \
             It models agent workflows as graphs of nodes and edges.",
            "langgraph.txt",
            DocType::Text,
        ),
        Document::new(
            "State is a shared data structure passed between nodes. Each node returns updates \
             that are merged into the state by reducers.",
            "state.txt",
            DocType::Text,
        ),
    ];

    let pipeline = RagPipeline::from_settings(
        &settings,
        Box::new(documents),
        Box::new(HashEmbedder::new(256)),
        Box::new(OpenAiChat::new(&settings.generation)?),
    );
    let report = pipeline.initialize()?;
    println!("indexed={} mode={:?}", report.indexed, report.mode);

    for question in ["What is LangGraph?", "How does state management work?"] {
        let resp = pipeline.query(question, settings.retrieval.top_k)?;
        println!("\nQ: {}\n[{:?}/{:?}] {}", question, resp.retrieval, resp.answer_kind, resp.answer);
        for r in &resp.sources {
            println!("  {:.3} {}", r.score, r.passage.source);
        }
    }
    Ok(())
}
