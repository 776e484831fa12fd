//! Output module
//!
//! Sends projected rows to a destination in fixed-size chunks.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Splitting rows into sequential chunks (`insert_in_chunks`)
//! - Stamping rows with a `record_load_time`
//! - Abstracting the destination behind `RowSink`

mod sink;

pub use sink::{
    add_record_load_time, insert_in_chunks, InsertOptions, InsertSummary, RowSink,
    RECORD_LOAD_TIME,
};
