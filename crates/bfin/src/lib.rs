// SPDX-License-Identifier: MIT

mod logging;
mod opts;
pub mod replay;

use std::path::Path;

use bfin_finality_core::block::BlockHeight;
use bfin_finality_core::config::FinalizationConfig;
use bfin_finality_core::epoch::FinalizationEpoch;
use bfin_finality_core::grouping::calculate_grouped_height;
use bfin_finality_core::voting_set::VotingSetRange;
use bfin_util_error::WhateverResult;
use bfin_util_error::fmt::FmtCompact as _;
use clap::Parser as _;
use opts::{Commands, Opts};
use replay::{BallotScript, RoundSummary};
use serde::Serialize;
use snafu::ResultExt as _;
use tracing::{info, warn};

const LOG_TARGET: &str = "bfin";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EpochSummary {
    height: BlockHeight,
    epoch: FinalizationEpoch,
    grouped_height: BlockHeight,
    voting_set: VotingSetRange,
}

pub struct Bfin;

impl Bfin {
    pub fn run() -> WhateverResult<()> {
        logging::init_logging()?;

        let opts = Opts::parse();

        let mut config = match &opts.config {
            Some(path) => load_config(path)?,
            None => FinalizationConfig::default(),
        };
        if let Some(grouping) = opts.voting_set_grouping {
            config.voting_set_grouping = grouping;
        }
        config
            .validate()
            .whatever_context("Invalid finalization config")?;

        match opts.command {
            Commands::VotingSet { epoch } => {
                let range =
                    VotingSetRange::new(FinalizationEpoch::new(epoch), config.voting_set_grouping)
                        .whatever_context("Failed to calculate voting set")?;
                print_json(&range)?;
            }
            Commands::Epoch { height } => {
                let height = BlockHeight::new(height);
                let voting_set = VotingSetRange::for_height(height, config.voting_set_grouping)
                    .whatever_context("Failed to calculate epoch")?;
                let grouped_height = calculate_grouped_height(height, config.voting_set_grouping)
                    .whatever_context("Failed to calculate grouped height")?;
                print_json(&EpochSummary {
                    height,
                    epoch: voting_set.epoch,
                    grouped_height,
                    voting_set,
                })?;
            }
            Commands::Replay { ballots } => {
                let script: BallotScript = read_json(&ballots)?;
                let context = replay::replay(&script, &config)
                    .inspect_err(|err| {
                        warn!(
                            target: LOG_TARGET,
                            err = %err.fmt_compact(),
                            "Rejected ballot script"
                        );
                    })
                    .whatever_context("Invalid ballot script")?;

                let summary = RoundSummary::new(&context);
                info!(
                    target: LOG_TARGET,
                    size = summary.size,
                    completable = summary.completable,
                    "Replay finished"
                );
                print_json(&summary)?;
            }
        }

        Ok(())
    }
}

fn load_config(path: &Path) -> WhateverResult<FinalizationConfig> {
    let config = read_json(path)?;
    info!(target: LOG_TARGET, path = %path.display(), "Loaded config");
    Ok(config)
}

fn read_json<T>(path: &Path) -> WhateverResult<T>
where
    T: serde::de::DeserializeOwned,
{
    let content = std::fs::read_to_string(path)
        .with_whatever_context(|_| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_whatever_context(|_| format!("Failed to parse {}", path.display()))
}

fn print_json(value: &impl Serialize) -> WhateverResult<()> {
    let json = serde_json::to_string_pretty(value).whatever_context("Failed to encode output")?;
    println!("{json}");
    Ok(())
}
