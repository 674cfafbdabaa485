// Copyright 2023-2026 Andrew Conway.
// This file is part of ConcreteSTV.
// ConcreteSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteSTV.  If not, see <https://www.gnu.org/licenses/>.


//! Reading ballots from the various file formats they come in.


use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use anyhow::anyhow;
use rcv::ballot_paper::{Ballot, RankMark};
use rcv::election_data::ElectionData;

pub mod parse_blt;
pub mod parse_csv;
pub mod parse_preflib;

pub(crate) fn get_line(s:Option<std::io::Result<String>>) -> anyhow::Result<String> { Ok(s.ok_or_else(||anyhow!("Unexpected end of file"))??) }

/// Make every ballot have the same number of rank slots, filling with blanks.
pub(crate) fn pad_ranks(ballots:&mut [Ballot]) {
    let len = ballots.iter().map(|b|b.ranks.len()).max().unwrap_or(0);
    for ballot in ballots {
        ballot.ranks.resize(len,RankMark::Blank);
    }
}

/// Whether two paths name the same file. A path that cannot be resolved (such as an output file
/// that does not exist yet) is compared by its absolute form.
pub fn is_same_file(a:&Path,b:&Path) -> bool {
    let resolve = |p:&Path| std::fs::canonicalize(p).or_else(|_|std::path::absolute(p)).unwrap_or_else(|_|p.to_path_buf());
    resolve(a)==resolve(b)
}

/// Load an election from a file, the format chosen by the extension:
/// `.json` (the native format), `.blt`, `.csv`, or preflib `.soi`/`.soc`.
pub fn load<P:AsRef<Path>>(path:P) -> anyhow::Result<ElectionData> {
    let path = path.as_ref();
    let extension = path.extension().and_then(|e|e.to_str()).unwrap_or("").to_lowercase();
    let file = File::open(path).map_err(|e|anyhow!("Could not open {} : {}",path.display(),e))?;
    let reader = BufReader::new(file);
    match extension.as_str() {
        "json" => Ok(ElectionData::read_json(reader)?),
        "blt" => parse_blt::parse(reader),
        "csv" => parse_csv::parse(reader),
        "soi" | "soc" => parse_preflib::parse(reader),
        _ => Err(anyhow!("Do not know how to read a file with extension .{} ; use .json, .blt, .csv, .soi or .soc",extension)),
    }
}
