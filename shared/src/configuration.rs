use crate::core::{Condition, QuerySpec, SortOrder};
use figment::providers::Env;
use figment::Figment;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub table_name: String,
    #[serde(default = "default_index_name")]
    pub index_name: String,
    #[serde(default = "default_group_id")]
    pub group_id: String,
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_index_name() -> String {
    "groupId".to_string()
}

fn default_group_id() -> String {
    "group1".to_string()
}

fn default_status() -> String {
    "ACTIVE".to_string()
}

impl Config {
    /// `TABLE_NAME` is required, the rest fall back to the `groupId` index,
    /// partition `group1` and status `ACTIVE`.
    pub fn load() -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Env::raw().only(&["TABLE_NAME", "INDEX_NAME", "GROUP_ID", "STATUS"]))
            .extract()
    }

    pub fn query_spec(&self) -> QuerySpec {
        QuerySpec::builder(
            &self.table_name,
            &self.index_name,
            Condition::equals("group_id", &self.group_id),
        )
        .filter(Condition::equals("status", &self.status))
        .sort_order(SortOrder::Descending)
        .build()
    }
}
