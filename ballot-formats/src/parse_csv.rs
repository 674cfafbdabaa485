// Copyright 2026 Andrew Conway.
// This file is part of ConcreteSTV.
// ConcreteSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteSTV.  If not, see <https://www.gnu.org/licenses/>.


//! Parse a .csv file with a header row, one ballot per subsequent row.
//! The first column is the ballot id, the rest are ranks in order.
//! Each rank is a candidate id, ids separated by `|` for an overvote, or empty.


use std::collections::BTreeSet;
use std::io::Read;
use anyhow::anyhow;
use rcv::ballot_metadata::{Candidate, CandidateId};
use rcv::ballot_paper::{parse_marking, Ballot, RankMark};
use rcv::election_data::ElectionData;

pub fn parse<R:Read>(reader:R) -> anyhow::Result<ElectionData> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut ballots : Vec<Ballot> = vec![];
    let mut mentioned : BTreeSet<CandidateId> = BTreeSet::new();
    for record in reader.records() {
        let record = record?;
        let id = record.get(0).ok_or_else(||anyhow!("Empty row in .csv file"))?;
        let ranks : Vec<RankMark> = record.iter().skip(1).map(parse_marking).collect();
        for mark in &ranks {
            match mark {
                RankMark::Blank => {}
                RankMark::Single(c) => { mentioned.insert(c.clone()); }
                RankMark::Overvote(cs) => { mentioned.extend(cs.iter().cloned()); }
            }
        }
        ballots.push(Ballot::new(id,ranks));
    }
    let candidates = mentioned.iter().map(|c|Candidate::from_id(c.as_str())).collect();
    Ok(ElectionData{ candidates, ballots, seed: None, seats: None, rules: None })
}
