use crate::error::PaginationError;
use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Debug;
use std::io::Write;

#[cfg(any(test, feature = "mocks"))]
use mockall::{automock, predicate::*};

pub type Item = HashMap<String, AttributeValue>;

/// Cursor returned by the backend when it stopped before the end of the
/// partition. Passed back untouched to resume right after the last record
/// examined.
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuationToken(Item);

impl ContinuationToken {
    pub(crate) fn from_key(key: Item) -> Self {
        Self(key)
    }

    pub(crate) fn into_key(self) -> Item {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub attribute: String,
    pub value: String,
}

impl Condition {
    pub fn equals(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

/// A range query over a secondary index: equality on the partition key, an
/// optional equality filter applied after the index lookup, and a sort
/// direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    pub table_name: String,
    pub index_name: String,
    pub partition_key: Condition,
    pub filter: Option<Condition>,
    pub sort_order: SortOrder,
}

impl QuerySpec {
    pub fn builder(
        table_name: impl Into<String>,
        index_name: impl Into<String>,
        partition_key: Condition,
    ) -> QuerySpecBuilder {
        QuerySpecBuilder {
            spec: QuerySpec {
                table_name: table_name.into(),
                index_name: index_name.into(),
                partition_key,
                filter: None,
                sort_order: SortOrder::default(),
            },
        }
    }
}

#[derive(Debug)]
pub struct QuerySpecBuilder {
    spec: QuerySpec,
}

impl QuerySpecBuilder {
    pub fn filter(mut self, filter: Condition) -> Self {
        self.spec.filter = Some(filter);
        self
    }

    pub fn sort_order(mut self, sort_order: SortOrder) -> Self {
        self.spec.sort_order = sort_order;
        self
    }

    pub fn build(self) -> QuerySpec {
        self.spec
    }
}

/// One query execution. `scanned_count` counts records read before the
/// filter ran, so it is never below `count`.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub items: Vec<Item>,
    pub count: i32,
    pub scanned_count: i32,
    pub continuation_token: Option<ContinuationToken>,
}

impl Page {
    pub fn has_more(&self) -> bool {
        self.continuation_token.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub items: usize,
    pub has_more: bool,
    pub count: i32,
    pub scanned_count: i32,
}

impl From<&Page> for PageSummary {
    fn from(page: &Page) -> Self {
        Self {
            items: page.items.len(),
            has_more: page.has_more(),
            count: page.count,
            scanned_count: page.scanned_count,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SequenceReport {
    pub pages: Vec<PageSummary>,
}

impl SequenceReport {
    pub fn total_items(&self) -> usize {
        self.pages.iter().map(|page| page.items).sum()
    }
}

#[cfg_attr(any(test, feature = "mocks"), automock)]
#[async_trait]
pub trait PageRepository: Debug {
    async fn query_page(
        &self,
        query: &QuerySpec,
        limit: Option<i32>,
        exclusive_start_key: Option<ContinuationToken>,
    ) -> Result<Page, PaginationError>;
}

#[derive(Debug)]
pub struct Paginator<R: PageRepository> {
    page_repo: R,
    query: QuerySpec,
}

impl<R: PageRepository> Paginator<R> {
    pub fn new(page_repo: R, query: QuerySpec) -> Self {
        Self { page_repo, query }
    }

    pub fn query(&self) -> &QuerySpec {
        &self.query
    }

    #[tracing::instrument(skip(self, cursor), fields(has_cursor = cursor.is_some()))]
    pub async fn fetch_page(
        &self,
        limit: Option<u32>,
        cursor: Option<ContinuationToken>,
    ) -> Result<Page, PaginationError> {
        let limit = limit.map(to_backend_limit).transpose()?;
        self.page_repo.query_page(&self.query, limit, cursor).await
    }

    /// Follows continuation tokens until the backend stops returning one,
    /// writing one JSON summary line per page to `out`.
    ///
    /// Each summary is flushed before the next page is requested. A failed
    /// fetch ends the sequence; lines already written are left in place.
    #[tracing::instrument(skip(self, out))]
    pub async fn run_sequence<W: Write>(
        &self,
        limit: Option<u32>,
        out: &mut W,
    ) -> Result<SequenceReport, PaginationError> {
        if let Some(limit) = limit {
            to_backend_limit(limit)?;
        }

        let mut report = SequenceReport::default();
        let mut cursor = None;
        loop {
            let page = self.fetch_page(limit, cursor.take()).await?;
            let summary = PageSummary::from(&page);

            writeln!(out, "{}", serde_json::to_string(&summary)?)?;
            out.flush()?;
            tracing::info!(
                items = summary.items,
                has_more = summary.has_more,
                count = summary.count,
                scanned_count = summary.scanned_count,
                "page fetched"
            );
            report.pages.push(summary);

            match page.continuation_token {
                Some(token) => cursor = Some(token),
                None => break,
            }
        }

        Ok(report)
    }

    /// Every item of the partition that passes the filter, in query order.
    pub async fn collect_all(&self, limit: Option<u32>) -> Result<Vec<Item>, PaginationError> {
        let mut items = vec![];
        let mut cursor = None;
        loop {
            let page = self.fetch_page(limit, cursor.take()).await?;
            items.extend(page.items);
            match page.continuation_token {
                Some(token) => cursor = Some(token),
                None => return Ok(items),
            }
        }
    }

    /// Releases the repository and the client it holds.
    pub fn close(self) {
        tracing::debug!(table = %self.query.table_name, "closing paginator");
        drop(self.page_repo);
    }
}

fn to_backend_limit(limit: u32) -> Result<i32, PaginationError> {
    match i32::try_from(limit) {
        Ok(limit) if limit > 0 => Ok(limit),
        _ => Err(PaginationError::InvalidLimit(limit)),
    }
}
