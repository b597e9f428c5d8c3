//! Command-line surface of the `subway` binary.
//!
//! Each invocation runs one command against the network loaded from the
//! snapshot file; the caller saves the snapshot when the command changed it.

use std::{io::Write, path::PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use itertools::Itertools;

use crate::{
    ids::{LineId, StationId},
    network::MemoryNetwork,
    topology::SectionChange,
};

/// Manage subway lines and the stations along them
#[derive(Parser, Debug)]
#[command(name = "subway", version)]
pub struct Cli {
    /// Network snapshot file
    #[arg(long, env = "SUBWAY_DATA", default_value = "subway.bin", global = true)]
    pub data: PathBuf,

    /// Log at debug level regardless of RUST_LOG
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage stations
    #[command(subcommand)]
    Station(StationCommand),

    /// Manage lines
    #[command(subcommand)]
    Line(LineCommand),

    /// Add or remove stations on a line
    #[command(subcommand)]
    Section(SectionCommand),
}

#[derive(Subcommand, Debug)]
pub enum StationCommand {
    /// Register a new station
    Add { name: String },

    /// List all stations
    List,

    /// Delete a station that no line serves
    Delete { id: u64 },
}

#[derive(Subcommand, Debug)]
pub enum LineCommand {
    /// Create a line between two stations
    Create {
        name: String,

        #[arg(long)]
        color: String,

        /// Station at the start of the line
        #[arg(long)]
        up: u64,

        /// Station at the end of the line
        #[arg(long)]
        down: u64,

        #[arg(long)]
        distance: u32,
    },

    /// List all lines with their stations
    List,

    /// Show one line
    Show {
        id: u64,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Rename or recolor a line
    Update {
        id: u64,

        #[arg(long)]
        name: String,

        #[arg(long)]
        color: String,
    },

    /// Delete a line and its sections
    Delete { id: u64 },
}

#[derive(Subcommand, Debug)]
pub enum SectionCommand {
    /// Insert a station next to one already on the line
    Add {
        line: u64,

        #[arg(long)]
        up: u64,

        #[arg(long)]
        down: u64,

        #[arg(long)]
        distance: u32,
    },

    /// Take a station off the line
    Remove {
        line: u64,

        #[arg(long)]
        station: u64,
    },
}

/// Runs one command, writing its report to `out`.
///
/// Returns whether the network changed and should be saved.
pub fn run<W: Write>(network: &mut MemoryNetwork, command: Command, out: &mut W) -> Result<bool> {
    match command {
        Command::Station(command) => run_station(network, command, out),
        Command::Line(command) => run_line(network, command, out),
        Command::Section(command) => run_section(network, command, out),
    }
}

fn run_station<W: Write>(
    network: &mut MemoryNetwork,
    command: StationCommand,
    out: &mut W,
) -> Result<bool> {
    match command {
        StationCommand::Add { name } => {
            let station = network.create_station(&name)?;
            writeln!(out, "Created station {} ({})", station.name, station.id)?;
            Ok(true)
        }
        StationCommand::List => {
            for station in network.stations() {
                writeln!(out, "{}\t{}", station.id, station.name)?;
            }
            Ok(false)
        }
        StationCommand::Delete { id } => {
            network.delete_station(StationId::new(id))?;
            writeln!(out, "Deleted station {id}")?;
            Ok(true)
        }
    }
}

fn run_line<W: Write>(
    network: &mut MemoryNetwork,
    command: LineCommand,
    out: &mut W,
) -> Result<bool> {
    match command {
        LineCommand::Create {
            name,
            color,
            up,
            down,
            distance,
        } => {
            let line = network.create_line(
                &name,
                &color,
                StationId::new(up),
                StationId::new(down),
                distance,
            )?;
            writeln!(out, "{line}")?;
            Ok(true)
        }
        LineCommand::List => {
            for line in network.lines()? {
                writeln!(out, "{line}")?;
            }
            Ok(false)
        }
        LineCommand::Show { id, json } => {
            let line = network.line(LineId::new(id))?;
            if json {
                serde_json::to_writer_pretty(&mut *out, &line)?;
                writeln!(out)?;
            } else {
                writeln!(out, "{line}")?;
            }
            Ok(false)
        }
        LineCommand::Update { id, name, color } => {
            let line = network.update_line(LineId::new(id), &name, &color)?;
            writeln!(out, "Updated line {} ({}, {})", line.id, line.name, line.color)?;
            Ok(true)
        }
        LineCommand::Delete { id } => {
            network.delete_line(LineId::new(id))?;
            writeln!(out, "Deleted line {id}")?;
            Ok(true)
        }
    }
}

fn run_section<W: Write>(
    network: &mut MemoryNetwork,
    command: SectionCommand,
    out: &mut W,
) -> Result<bool> {
    let (line, change) = match command {
        SectionCommand::Add {
            line,
            up,
            down,
            distance,
        } => {
            let line = LineId::new(line);
            let change =
                network.add_section(line, StationId::new(up), StationId::new(down), distance)?;
            (line, change)
        }
        SectionCommand::Remove { line, station } => {
            let line = LineId::new(line);
            let change = network.remove_section(line, StationId::new(station))?;
            (line, change)
        }
    };

    write_change(out, &change)?;
    writeln!(out, "{}", network.line(line)?)?;
    Ok(true)
}

fn write_change<W: Write>(out: &mut W, change: &SectionChange) -> Result<()> {
    if !change.removed.is_empty() {
        writeln!(out, "removed: {}", change.removed.iter().join(", "))?;
    }
    if !change.added.is_empty() {
        writeln!(out, "added: {}", change.added.iter().join(", "))?;
    }
    Ok(())
}
