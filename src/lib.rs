//! Ordered station topologies for subway lines.
//!
//! [`topology::LineTopology`] keeps each line a single branchless path of
//! stations joined by weighted sections. [`network::SubwayNetwork`] ties the
//! engine to the station and line repositories, and [`cli`] exposes the
//! whole thing as the `subway` command.

pub mod cli;
pub mod ids;
pub mod network;
pub mod repository;
pub mod topology;
