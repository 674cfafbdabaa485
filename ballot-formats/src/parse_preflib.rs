// Copyright 2023-2026 Andrew Conway.
// This file is part of ConcreteSTV.
// ConcreteSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteSTV.  If not, see <https://www.gnu.org/licenses/>.


//! Parsing preference data in the .soi and .soc formats from https://www.preflib.org/
//!
//! Candidates (alternatives) get ids "1", "2"... in the order given in the file.


use std::io::BufRead;
use anyhow::anyhow;
use tracing::info;
use rcv::ballot_metadata::{Candidate, CandidateId};
use rcv::ballot_paper::{Ballot, RankMark};
use rcv::election_data::ElectionData;
use crate::pad_ranks;

fn unspecified(index:usize) -> Candidate { Candidate::from_id(&(index+1).to_string()) }

pub fn parse<R:BufRead>(reader:R) -> anyhow::Result<ElectionData> {
    let mut candidates : Vec<Candidate> = vec![];
    let mut ballots : Vec<Ballot> = vec![];
    for line in reader.lines() {
        let line = line?;
        if let Some(metadata) = line.strip_prefix('#') {
            if let Some((metadata_name,metadata_value)) = metadata.split_once(':') {
                let metadata_value = metadata_value.trim();
                match metadata_name.trim() {
                    "TITLE" => { info!(title=metadata_value,"Read preflib file"); }
                    "DATA TYPE" => {
                        if metadata_value!="soc" && metadata_value!="soi" {
                            return Err(anyhow!("Can only handle formats soc or soi, got {}",metadata_value));
                        }
                    }
                    "NUMBER ALTERNATIVES" => {
                        let n : usize = metadata_value.parse()?;
                        while candidates.len()<n { candidates.push(unspecified(candidates.len())); }
                    }
                    s if s.starts_with("ALTERNATIVE NAME") => { // #ALTERNATIVE NAME n : name
                        let n : usize = s.trim_start_matches("ALTERNATIVE NAME").trim_start().parse()?;
                        if n==0 { return Err(anyhow!("ALTERNATIVE NAME 0 is not understood")); }
                        while candidates.len()<n { candidates.push(unspecified(candidates.len())); }
                        candidates[n-1].name=metadata_value.to_string();
                        candidates[n-1].short_label=metadata_value.to_string();
                    }
                    _ => {}
                }
            } else {
                return Err(anyhow!("Metadata line without colon : {}",line));
            }
        } else if line.trim().is_empty() {}
        else { // preferences line
            if let Some((n,prefs)) = line.split_once(':') {
                let num_candidates = candidates.len();
                let n : usize = n.trim().parse()?;
                let mut ranks : Vec<RankMark> = vec![];
                for candidate in prefs.trim().split(',') {
                    let candidate : usize = candidate.trim().parse()?;
                    if candidate<1 || candidate>num_candidates { return Err(anyhow!("Expecting candidate index between 1 and {}, got {}",num_candidates,candidate)) }
                    ranks.push(RankMark::Single(CandidateId(candidate.to_string())));
                }
                for _ in 0..n {
                    ballots.push(Ballot::new(&format!("p{}",ballots.len()+1),ranks.clone()));
                }
            } else {
                return Err(anyhow!("Expecting line of the form n : <preference list> got {}",line))
            }
        }
    }
    pad_ranks(&mut ballots);
    Ok(ElectionData{ candidates, ballots, seed: None, seats: None, rules: None })
}
