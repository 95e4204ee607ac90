//! Aggregators over a (possibly filtered) trip dataset.
//!
//! Each function here is pure: it reads a [`crate::dataset::Dataset`] and
//! returns one typed statistics fragment. Modes are taken from a
//! [`utility::FrequencyTable`], which breaks ties by first appearance in row
//! order.

pub mod duration;
pub mod station;
pub mod temporal;
pub mod types;
pub mod users;
pub mod utility;
