pub mod analyzers;
pub mod criteria;
pub mod dataset;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod output;
pub mod pager;
pub mod parser;
pub mod source;
pub mod stats;
