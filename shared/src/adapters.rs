use crate::{
    core::{ContinuationToken, Page, PageRepository, QuerySpec, SortOrder},
    error::PaginationError,
};
use async_trait::async_trait;
use aws_sdk_dynamodb::{
    operation::query::{builders::QueryFluentBuilder, QueryOutput},
    types::AttributeValue,
    Client,
};

#[derive(Debug)]
pub struct DynamoDbPageRepository {
    dynamodb_client: Client,
}

impl DynamoDbPageRepository {
    pub fn new(dynamodb_client: Client) -> Self {
        Self { dynamodb_client }
    }
}

impl DynamoDbPageRepository {
    fn build_query(
        &self,
        query: &QuerySpec,
        limit: Option<i32>,
        exclusive_start_key: Option<ContinuationToken>,
    ) -> QueryFluentBuilder {
        let mut request = self
            .dynamodb_client
            .query()
            .table_name(&query.table_name)
            .index_name(&query.index_name)
            .key_condition_expression("#pk = :pk")
            .expression_attribute_names("#pk", &query.partition_key.attribute)
            .expression_attribute_values(
                ":pk",
                AttributeValue::S(query.partition_key.value.clone()),
            )
            .scan_index_forward(query.sort_order == SortOrder::Ascending)
            .set_limit(limit)
            .set_exclusive_start_key(exclusive_start_key.map(ContinuationToken::into_key));

        // applied after the index lookup, so filtered rows still count as scanned
        if let Some(filter) = &query.filter {
            request = request
                .filter_expression("#filter = :filter")
                .expression_attribute_names("#filter", &filter.attribute)
                .expression_attribute_values(":filter", AttributeValue::S(filter.value.clone()));
        }

        request
    }
}

#[async_trait]
impl PageRepository for DynamoDbPageRepository {
    async fn query_page(
        &self,
        query: &QuerySpec,
        limit: Option<i32>,
        exclusive_start_key: Option<ContinuationToken>,
    ) -> Result<Page, PaginationError> {
        let result = self
            .build_query(query, limit, exclusive_start_key)
            .send()
            .await
            .map_err(|e| PaginationError::Backend(format!("{:?}", e)))?;

        Ok(Page::from(result))
    }
}

impl From<QueryOutput> for Page {
    fn from(output: QueryOutput) -> Self {
        Page {
            items: output.items.unwrap_or_default(),
            count: output.count,
            scanned_count: output.scanned_count,
            continuation_token: output
                .last_evaluated_key
                .filter(|key| !key.is_empty())
                .map(ContinuationToken::from_key),
        }
    }
}
