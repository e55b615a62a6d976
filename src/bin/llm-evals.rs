#[path = "llm-evals/app.rs"]
mod app;
#[path = "llm-evals/args.rs"]
mod args;
#[path = "llm-evals/config/mod.rs"]
mod config;
#[path = "llm-evals/logging.rs"]
mod logging;
#[path = "llm-evals/provider.rs"]
mod provider;
#[path = "llm-evals/report.rs"]
mod report;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    app::run().await
}
