// Copyright 2024-2026 Andrew Conway.
// This file is part of ConcreteSTV.
// ConcreteSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteSTV.  If not, see <https://www.gnu.org/licenses/>.


//! Parse the  .blt format.
//! This is a text file.
//! The first line contains two integers separated by whitespace; the first is the number of candidates, the second the number of seats.
//! An optional line of negative numbers lists withdrawn candidates.
//! The next many lines represent votes, as a list of preferences separated by whitespace and ending with 0 and starting with the number of people who voted that way.
//! A preference is a candidate index (starting at 1), several indices joined by `=` for an overvote, or `-` for a skipped rank.
//! The last of these lines just contains "0"
//! Subsequent lines list the "candidate name", one per line, optionally followed by a "title".


use std::collections::HashSet;
use std::io::BufRead;
use anyhow::anyhow;
use tracing::{debug, info};
use rcv::ballot_metadata::{Candidate, CandidateId};
use rcv::ballot_paper::{Ballot, RankMark};
use rcv::election_data::ElectionData;
use crate::{get_line, pad_ranks};

fn parse_as_ints(s:&str) -> anyhow::Result<Vec<i64>> {
    Ok(s.split_whitespace().map(|s|s.parse::<i64>()).collect::<Result<Vec<i64>,_>>()?)
}

/// The candidate id used for the candidate with 1 based index `index`.
pub fn blt_candidate_id(index:usize) -> CandidateId { CandidateId(index.to_string()) }

fn parse_candidate(token:&str,num_candidates:usize) -> anyhow::Result<CandidateId> {
    let index : usize = token.parse().map_err(|_|anyhow!("Expecting a candidate number, got {}",token))?;
    if index<1 || index>num_candidates { return Err(anyhow!("Expecting candidate index between 1 and {}, got {}",num_candidates,index)); }
    Ok(blt_candidate_id(index))
}

fn parse_preference(token:&str,num_candidates:usize) -> anyhow::Result<RankMark> {
    if token=="-" { return Ok(RankMark::Blank); }
    let candidates = token.split('=').map(|c|parse_candidate(c,num_candidates)).collect::<anyhow::Result<Vec<CandidateId>>>()?;
    Ok(RankMark::from_candidates(candidates))
}

pub fn parse<R:BufRead>(reader:R) -> anyhow::Result<ElectionData> {
    let mut lines = reader.lines();
    let firstline = parse_as_ints(&get_line(lines.next())?)?;
    if firstline.len()!=2 || firstline[0]<1 || firstline[1]<1 { return Err(anyhow!("Expecting the first line to have two positive fields")); }
    let num_candidates = firstline[0] as usize;
    let seats = firstline[1] as usize;
    let mut withdrawn : HashSet<CandidateId> = HashSet::new();
    let mut ballots : Vec<Ballot> = vec![];
    loop {
        let line = get_line(lines.next())?;
        let tokens : Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() { return Err(anyhow!("Found blank line")); }
        if tokens[0].starts_with('-') && tokens[0].len()>1 { // withdraw candidates
            for c in parse_as_ints(&line)? {
                if c>=0 { return Err(anyhow!("Expecting only negative numbers in withdrawn candidate line {}",line)); }
                withdrawn.insert(parse_candidate(&(-c).to_string(),num_candidates)?);
            }
            continue;
        }
        if tokens.last().copied()!=Some("0") { return Err(anyhow!("Found preference line not ending in 0")); }
        if tokens.len()==1 { break; }
        let n : usize = tokens[0].parse().map_err(|_|anyhow!("Expecting a number of ballots at the start of {}",line))?;
        let ranks = tokens[1..tokens.len()-1].iter().map(|t|parse_preference(t,num_candidates)).collect::<anyhow::Result<Vec<RankMark>>>()?;
        for _ in 0..n {
            ballots.push(Ballot::new(&format!("b{}",ballots.len()+1),ranks.clone()));
        }
    }
    let mut candidates : Vec<Candidate> = vec![];
    for index in 1..=num_candidates {
        let candidate_name_line = get_line(lines.next())?;
        let fields : Vec<&str> = candidate_name_line.split('"').collect();
        if fields.len()<3 { return Err(anyhow!("Expecting candidate name in quotes, got {}",candidate_name_line)); }
        let id = blt_candidate_id(index);
        if withdrawn.contains(&id) {
            debug!(%id,name=fields[1],"Candidate withdrawn");
            continue;
        }
        candidates.push(Candidate{ id, name: fields[1].to_string(), short_label: fields[1].to_string(), bio: String::new() });
    }
    if let Some(Ok(title)) = lines.next() {
        if let Some(title) = title.split('"').nth(1) { info!(title,"Read .blt file"); }
    }
    pad_ranks(&mut ballots);
    Ok(ElectionData{ candidates, ballots, seed: None, seats: Some(seats), rules: None })
}
