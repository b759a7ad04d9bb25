//! SATD lifecycle mining between revisions.
//!
//! [`miner::DiffMiner`] compares two revisions: it aligns the SATD comments
//! of both sides ([`align`]), resolves every aligned pair ([`resolve`]), infers
//! the rest from the diff hunks, and aggregates the outcome into a
//! [`satd_core::SatdDifference`]. [`history::HistoryMiner`] repeats that for
//! every (parent, child) edge of a history, and [`report`] renders results.

pub mod align;
pub mod history;
pub mod miner;
pub mod report;
pub mod resolve;
