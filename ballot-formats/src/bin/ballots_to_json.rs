// Copyright 2023-2026 Andrew Conway.
// This file is part of ConcreteSTV.
// ConcreteSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteSTV.  If not, see <https://www.gnu.org/licenses/>.

use clap::Parser;
use std::path::PathBuf;
use std::fs::File;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(version = "0.1", author = "Andrew Conway", name="ballots_to_json")]
/// Convert a .blt, .csv, .soi or .soc ballot file to the .json election format read by rcv_count.
struct Opts {
    /// The name of the ballot file to convert
    #[clap(value_parser)]
    file : PathBuf,

    /// An optional output file. If not specified, the input file with the extension changed to .json
    #[clap(short, long,value_parser)]
    out : Option<PathBuf>,

    /// A seed to store with the election, used for drawing lots.
    #[clap(long)]
    seed : Option<String>,

    /// The number of seats to store with the election, overriding any in the file.
    #[clap(long)]
    seats : Option<usize>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_|EnvFilter::new("info"))).init();
    let opt : Opts = Opts::parse();
    let mut data = ballot_formats::load(&opt.file)?;
    if opt.seed.is_some() { data.seed=opt.seed.clone(); }
    if opt.seats.is_some() { data.seats=opt.seats; }
    data.print_summary();
    let out_path = opt.out.clone().unwrap_or_else(||opt.file.with_extension("json"));
    if ballot_formats::is_same_file(&out_path,&opt.file) { return Err(anyhow::anyhow!("Refusing to overwrite the input file {}",out_path.display())); }
    let out = File::create(&out_path)?;
    serde_json::to_writer(out,&data)?;
    tracing::info!(path=%out_path.display(),"Wrote election");
    Ok(())
}
