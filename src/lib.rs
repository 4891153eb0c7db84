//! Natural-language analysis of small CSV datasets.
//!
//! A hosted model turns a question into a [`plan::QueryPlan`]; the local
//! [`engine`] executes it (filter, group, aggregate, sort) and produces a
//! labelled series ready for charting.
//!
//! ```
//! use ai_data_analyst::engine::{execute_query, parse_csv};
//! use ai_data_analyst::plan::{AggregateFn, QueryPlan};
//!
//! let table = parse_csv("cat,amt\nA,10\nB,5\nA,20\n");
//! let result = execute_query(&table, &QueryPlan::new("cat", "amt", AggregateFn::Sum));
//! assert_eq!(result.labels, ["A", "B"]);
//! assert_eq!(result.values(), [30.0, 5.0]);
//! ```

pub mod cache;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod plan;
pub mod planner;
pub mod printer;
