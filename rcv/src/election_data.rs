// Copyright 2021-2026 Andrew Conway.
// This file is part of ConcreteSTV.
// ConcreteSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteSTV.  If not, see <https://www.gnu.org/licenses/>.


use std::collections::{BTreeSet, HashSet};
use std::io::Read;
use serde::{Deserialize,Serialize};
use tracing::{info, warn};
use crate::ballot_metadata::{Candidate, CandidateId};
use crate::ballot_paper::{Ballot, BallotSource, RankMark};
use crate::distribution_of_preferences_transcript::{CountResult, StvResult};
use crate::errors::{InputValidationError, TabulationError};
use crate::instant_runoff::{count_irv, IrvRules};
use crate::preference_distribution::count_stv;

/// Everything needed to count an election. This is the format of a `.json` election file.
#[derive(Debug,Serialize,Deserialize,Clone,PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ElectionData {
    pub candidates : Vec<Candidate>,
    pub ballots : Vec<Ballot>,
    #[serde(skip_serializing_if = "Option::is_none",default)]
    pub seed : Option<String>,
    /// number of people to elect, for STV.
    #[serde(skip_serializing_if = "Option::is_none",default)]
    pub seats : Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none",default)]
    pub rules : Option<IrvRules>,
}

impl ElectionData {
    pub fn read_json<R:Read>(reader:R) -> serde_json::Result<Self> {
        serde_json::from_reader(reader)
    }

    pub fn candidate_ids(&self) -> Vec<CandidateId> {
        self.candidates.iter().map(|c|c.id.clone()).collect()
    }

    pub fn num_user_ballots(&self) -> usize {
        self.ballots.iter().filter(|b|b.source==BallotSource::User).count()
    }

    /// Ids marked on some ballot that are not candidates. Such marks are never counted.
    pub fn unknown_candidates(&self) -> BTreeSet<CandidateId> {
        let known : HashSet<&CandidateId> = self.candidates.iter().map(|c|&c.id).collect();
        let mut res = BTreeSet::new();
        for ballot in &self.ballots {
            for mark in &ballot.ranks {
                let marked : &[CandidateId] = match mark {
                    RankMark::Blank => &[],
                    RankMark::Single(c) => std::slice::from_ref(c),
                    RankMark::Overvote(cs) => cs,
                };
                for c in marked {
                    if !known.contains(c) { res.insert(c.clone()); }
                }
            }
        }
        res
    }

    fn seed_or(&self,seed_override:Option<&str>) -> Result<String,InputValidationError> {
        seed_override.map(|s|s.to_string()).or_else(||self.seed.clone()).ok_or(InputValidationError::MissingSeed)
    }

    /// Run an IRV count. Values given override those stored with the election.
    pub fn count_irv(&self,seed_override:Option<&str>,rules_override:Option<IrvRules>,user_ballot:Option<&str>) -> Result<CountResult,TabulationError> {
        let seed = self.seed_or(seed_override)?;
        let rules = rules_override.or(self.rules).unwrap_or_default();
        count_irv(&self.ballots,&self.candidate_ids(),&seed,&rules,user_ballot)
    }

    /// Run an STV count. Values given override those stored with the election.
    pub fn count_stv(&self,seats_override:Option<usize>,seed_override:Option<&str>) -> Result<StvResult,TabulationError> {
        let seed = self.seed_or(seed_override)?;
        let seats = seats_override.or(self.seats).ok_or(InputValidationError::MissingSeats)?;
        count_stv(&self.ballots,&self.candidate_ids(),seats,&seed)
    }

    pub fn print_summary(&self) {
        info!(candidates=self.candidates.len(),ballots=self.ballots.len(),user_ballots=self.num_user_ballots(),"Election loaded");
        let unknown = self.unknown_candidates();
        if !unknown.is_empty() { warn!(?unknown,"Ballots mention ids that are not candidates; those marks will be skipped"); }
    }
}
