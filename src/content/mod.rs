/*!
 * Content Core
 * Pure functions over page and quiz records: the block model, legacy
 * content migration, quiz scoring, static HTML export and analytics
 * aggregation. No I/O, no database, no global state - data in, data out.
 */

pub mod analytics;
pub mod blocks;
pub mod export;
pub mod migrate;
pub mod quiz;
pub mod scoring;
