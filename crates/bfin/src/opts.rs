use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about)]
pub(crate) struct Opts {
    /// Finalization config (json); defaults are used if not set
    #[arg(long, env = "BFIN_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Override the number of heights in each voting set
    #[arg(long, env = "BFIN_VOTING_SET_GROUPING", global = true)]
    pub voting_set_grouping: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Print the heights of the voting set of an epoch
    VotingSet {
        #[arg(long)]
        epoch: u32,
    },
    /// Print the finalization epoch of a height
    Epoch {
        #[arg(long)]
        height: u64,
    },
    /// Replay a ballot script through a single round and print the outcome
    Replay {
        #[arg(long)]
        ballots: PathBuf,
    },
}
