// Copyright 2021-2026 Andrew Conway.
// This file is part of ConcreteSTV.
// ConcreteSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteSTV.  If not, see <https://www.gnu.org/licenses/>.


use clap::Parser;
use std::path::PathBuf;
use std::fs::File;
use tracing::info;
use main_app::rules::{CountSettings, CountingMethod};
use rcv::tie_resolution::{MajorityCondition, TieBreakerStrategy};

#[derive(Parser)]
#[clap(version = "0.2", author = "Andrew Conway", name="rcv_count")]
/// Count ranked ballots by instant runoff (IRV) or single transferable vote (STV).
struct Opts {
    /// The counting method to use, IRV or STV.
    method : CountingMethod,

    /// The file to get votes from. May be .json, .blt, .csv, .soi or .soc
    votes : PathBuf,

    /// The seed used for drawing lots. If used, overrides the value in the .json file.
    #[clap(long)]
    seed : Option<String>,

    /// The number of people to elect (STV only). If used, overrides the value in the file.
    #[clap(short, long)]
    seats : Option<usize>,

    /// How to resolve ties for lowest in IRV: lookback-then-lot, lot or seeded.
    #[clap(long)]
    tie_breaker : Option<TieBreakerStrategy>,

    /// What is needed to win an IRV round: > (more than half) or >= (at least half).
    #[clap(long)]
    majority : Option<MajorityCondition>,

    /// The id of a ballot whose path through an IRV count should be recorded.
    #[clap(long)]
    user_ballot : Option<String>,

    /// An optional .transcript file to store the output in.
    /// If not specified, defaults to votes_method.transcript where votes and method are from above.
    #[clap(short, long)]
    transcript : Option<PathBuf>,

    /// Whether the progress of the count should be logged in detail.
    #[clap(long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let opt : Opts = Opts::parse();
    main_app::init_logging(opt.verbose);

    let votes = ballot_formats::load(&opt.votes)?;
    votes.print_summary();

    let settings = CountSettings{
        seed: opt.seed.clone(),
        seats: opt.seats,
        tie_breaker: opt.tie_breaker,
        majority_condition: opt.majority,
        user_ballot: opt.user_ballot.clone(),
    };
    let result = opt.method.count(&votes,&settings)?;
    info!(winners=?result.winners(),rounds=result.num_rounds(),"Count finished");

    let transcript_file = match &opt.transcript {
        None => {
            let votename = opt.votes.file_stem().map(|o|o.to_string_lossy()).unwrap_or_default();
            let combined = votename.to_string()+"_"+&opt.method.to_string()+".transcript";
            opt.votes.with_file_name(combined)
        }
        Some(tf) => tf.clone(),
    };

    if let Some(parent) = transcript_file.parent() { std::fs::create_dir_all(parent)? }
    serde_json::to_writer(File::create(&transcript_file)?,&result)?;
    info!(path=%transcript_file.display(),"Wrote transcript");

    Ok(())
}
