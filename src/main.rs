use std::env;

use fin_eng::csv::{read_requests, write_history};
use fin_eng::{SystemContext, TransactionProcessor};
use tokio_stream::wrappers::ReceiverStream;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse().unwrap()))
        .with_writer(std::io::stderr)
        .init();

    let path = env::args()
        .nth(1)
        .expect("usage: fin-eng <transactions.csv>");

    if !path.ends_with(".csv") {
        warn!(path, "input file seems to not be a csv file");
    }

    let ctx = SystemContext::default();
    let mut processor = TransactionProcessor::new();
    let (req_sender, req_receiver) = tokio::sync::mpsc::channel(16);

    tokio::spawn(async move {
        for result in read_requests(&path) {
            match result {
                Ok(request) => {
                    req_sender.send(request).await.unwrap();
                }
                Err(e) => {
                    warn!("{e}");
                }
            }
        }
    });

    processor.run(&ctx, ReceiverStream::new(req_receiver)).await;

    write_history(processor.history());
}
