use std::io::Write;

use anyhow::Result;
use aws_config::BehaviorVersion;
use shared::adapters::DynamoDbPageRepository;
use shared::configuration::Config;
use shared::core::{PageRepository, Paginator};

const LIMITS: [Option<u32>; 5] = [None, Some(1), Some(2), Some(3), Some(4)];

#[tokio::main]
async fn main() -> Result<()> {
    shared::observability::init_tracing();

    let env = Config::load()?;
    let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let dynamodb_client = aws_sdk_dynamodb::Client::new(&config);

    let page_repo = DynamoDbPageRepository::new(dynamodb_client);
    let paginator = Paginator::new(page_repo, env.query_spec());

    run_all_limits(&paginator, &mut std::io::stdout()).await?;

    paginator.close();
    Ok(())
}

async fn run_all_limits<R: PageRepository, W: Write>(
    paginator: &Paginator<R>,
    out: &mut W,
) -> Result<()> {
    for limit in LIMITS {
        writeln!(out, "{}", label(limit))?;
        let report = paginator.run_sequence(limit, out).await?;
        tracing::info!(
            ?limit,
            pages = report.pages.len(),
            items = report.total_items(),
            "sequence finished"
        );
    }
    Ok(())
}

fn label(limit: Option<u32>) -> String {
    match limit {
        Some(limit) => format!("Limit: {}", limit),
        None => "no Limit".to_string(),
    }
}
