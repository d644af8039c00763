//! Navigation logic.
//!
//! Holds [`sort`], the natural ordering applied to directory listings
//! before they are returned to a client.

pub mod sort;
