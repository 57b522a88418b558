use shared::adapters::DynamoDbPageRepository;
use shared::configuration::Config;
use shared::core::Paginator;

/// Paginator over the configured table, using the default AWS credential chain.
pub async fn paginator(env: &Config) -> Paginator<DynamoDbPageRepository> {
    let config = aws_config::load_from_env().await;
    let dynamodb_client = aws_sdk_dynamodb::Client::new(&config);

    Paginator::new(DynamoDbPageRepository::new(dynamodb_client), env.query_spec())
}
