//! Pagination module
//!
//! Supports: Body token (Google), Next URL (OData), Link Header (Okta), None
//!
//! # Overview
//!
//! Each strategy turns a successful response into the descriptor of the next
//! page, or `Done`. Strategies never touch the network; the retrieval engine
//! drives them.

mod strategies;
mod types;

pub use strategies::{
    parse_link_header, BodyTokenPaginator, LinkHeaderPaginator, NextUrlPaginator, NoPaginator,
};
pub use types::{lookup, lookup_str, NextPage, PageRequest, Paginator};

#[cfg(test)]
mod tests;
