pub mod client;
pub mod config;
pub mod connector;
pub mod error;
pub mod extract;
pub mod params;
pub mod query;
pub mod render;

pub use client::JiraClient;
pub use config::{ConnectorConfig, Credentials};
pub use error::{Error, Result};

// Query builder re-exports
pub use query::{FieldProjection, FilterCriteria, QueryRequest, SEARCH_PATH, SortSpec, build_jql};

// Result extractor re-exports
pub use extract::{IssueRecord, decode_response, extract_field, extract_issues, extract_str};

// Rendering re-exports
pub use render::{RESOLVED_STATUS, RenderOutput, render_issue_table, render_status};

// Host adapter re-exports
pub use connector::{FunctionHook, JiraConnector, ParserHost, TagHook};
pub use params::convert_function_parameters;
