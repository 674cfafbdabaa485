// Copyright 2021-2026 Andrew Conway.
// This file is part of ConcreteSTV.
// ConcreteSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteSTV.  If not, see <https://www.gnu.org/licenses/>.


//! Store the history of a count, round by round.
//! These records are produced once by a count and only ever read afterwards (rendering, export).


use std::collections::{BTreeMap, BTreeSet};
use crate::ballot_metadata::CandidateId;
use crate::preference::ExhaustionReason;
use crate::tie_resolution::{TieBreakKind, TieResolutionMethod};
use serde::{Serialize,Deserialize};

/// Why the ballots exhausted so far did so.
#[derive(Clone,Copy,Debug,Default,PartialEq,Eq,Serialize,Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExhaustionDetail {
    /// ballots that reached an overvoted rank.
    pub overvote_at_rank : usize,
    /// ballots with marks, but none for a continuing candidate.
    pub no_valid_next : usize,
    /// ballots with nothing but blanks left.
    pub blank_remaining : usize,
}

impl ExhaustionDetail {
    pub fn record(&mut self,reason:ExhaustionReason) {
        match reason {
            ExhaustionReason::Overvote => self.overvote_at_rank+=1,
            ExhaustionReason::NoValidNext => self.no_valid_next+=1,
            ExhaustionReason::Blank => self.blank_remaining+=1,
        }
    }
    pub fn total(&self) -> usize { self.overvote_at_rank+self.no_valid_next+self.blank_remaining }
}

/// Where some votes went. Serialized as the candidate id, or "exhausted".
#[derive(Clone,Debug,PartialEq,Eq,PartialOrd,Ord,Serialize,Deserialize)]
#[serde(into = "String", from = "String")]
pub enum TransferDestination {
    Candidate(CandidateId),
    Exhausted,
}

impl From<TransferDestination> for String {
    fn from(t: TransferDestination) -> Self {
        match t {
            TransferDestination::Candidate(c) => c.0,
            TransferDestination::Exhausted => "exhausted".to_string(),
        }
    }
}

impl From<String> for TransferDestination {
    fn from(s: String) -> Self {
        if s=="exhausted" { TransferDestination::Exhausted } else { TransferDestination::Candidate(CandidateId(s)) }
    }
}

/// Votes moving from one candidate to another (or to exhaustion) in a single round.
/// Tally is a number of ballots for IRV, and a weight for STV.
#[derive(Clone,Debug,PartialEq,Serialize,Deserialize)]
pub struct Transfer<Tally> {
    pub from : CandidateId,
    pub to : TransferDestination,
    pub count : Tally,
}

/// A tie that had to be broken, and what was decided.
#[derive(Clone,Debug,PartialEq,Eq,Serialize,Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TieBreak {
    pub round_index : usize,
    pub kind : TieBreakKind,
    /// the tied candidates, sorted by id.
    pub tied : Vec<CandidateId>,
    pub chosen : CandidateId,
    pub resolved_by : TieResolutionMethod,
}

/// One round of an IRV count.
#[derive(Clone,Debug,PartialEq,Serialize,Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundResult {
    pub round_index : usize,
    /// candidates continuing at the start of this round.
    pub continuing : BTreeSet<CandidateId>,
    /// ballots counting for each continuing candidate.
    pub tallies : BTreeMap<CandidateId,usize>,
    pub exhausted : usize,
    pub exhaustion_detail : ExhaustionDetail,
    /// the sum of the tallies.
    pub continuing_ballots : usize,
    /// half the continuing ballots.
    pub threshold : f64,
    #[serde(skip_serializing_if = "Option::is_none",default)]
    pub winner : Option<CandidateId>,
    #[serde(skip_serializing_if = "Option::is_none",default)]
    pub eliminated : Option<CandidateId>,
    #[serde(skip_serializing_if = "Option::is_none",default)]
    pub tie_break : Option<TieBreak>,
    #[serde(skip_serializing_if = "Vec::is_empty",default)]
    pub transfers : Vec<Transfer<usize>>,
}

/// A point on the path of a single ballot through the count.
#[derive(Clone,Debug,PartialEq,Eq,Serialize,Deserialize)]
#[serde(into = "String", from = "String")]
pub enum PathPoint {
    Start,
    Candidate(CandidateId),
    Exhausted,
}

impl From<PathPoint> for String {
    fn from(p: PathPoint) -> Self {
        match p {
            PathPoint::Start => "start".to_string(),
            PathPoint::Candidate(c) => c.0,
            PathPoint::Exhausted => "exhausted".to_string(),
        }
    }
}

impl From<String> for PathPoint {
    fn from(s: String) -> Self {
        match s.as_str() {
            "start" => PathPoint::Start,
            "exhausted" => PathPoint::Exhausted,
            _ => PathPoint::Candidate(CandidateId(s)),
        }
    }
}

#[derive(Clone,Debug,PartialEq,Eq,Serialize,Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPathStep {
    pub round_index : usize,
    pub from : PathPoint,
    pub to : PathPoint,
}

/// The whole of an IRV count.
#[derive(Clone,Debug,PartialEq,Serialize,Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountResult {
    pub rounds : Vec<RoundResult>,
    pub winner : CandidateId,
    #[serde(skip_serializing_if = "Option::is_none",default)]
    pub user_path : Option<Vec<UserPathStep>>,
}

impl CountResult {
    /// ballots counted in the first round. The same in every round, as ballots only move between piles.
    pub fn total_ballots(&self) -> usize {
        self.rounds.first().map(|r|r.continuing_ballots+r.exhausted).unwrap_or(0)
    }
}

#[derive(Clone,Copy,Debug,PartialEq,Eq,Serialize,Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StvAction {
    /// a candidate reached the quota.
    Elect,
    /// the lowest candidate was excluded.
    Eliminate,
    /// everyone left was elected as there are no more candidates than seats.
    Final,
}

#[derive(Clone,Debug,PartialEq,Serialize,Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurplusTransfer {
    pub from : CandidateId,
    pub surplus : f64,
    pub transfer_value : f64,
}

/// One round of an STV count.
#[derive(Clone,Debug,PartialEq,Serialize,Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StvRoundResult {
    pub round_index : usize,
    /// candidates still continuing at the end of this round.
    pub continuing : BTreeSet<CandidateId>,
    /// candidates elected so far, in order of election.
    pub elected : Vec<CandidateId>,
    /// weighted votes for each candidate continuing at the start of this round.
    pub tallies : BTreeMap<CandidateId,f64>,
    /// weight of the ballots that exhausted during this round.
    pub exhausted : f64,
    /// number of ballots that exhausted during this round, by reason.
    pub exhaustion_detail : ExhaustionDetail,
    pub continuing_ballots : f64,
    /// the Droop quota. Fixed for the whole count.
    pub threshold : usize,
    pub action : StvAction,
    #[serde(skip_serializing_if = "Option::is_none",default)]
    pub affected_candidate : Option<CandidateId>,
    #[serde(skip_serializing_if = "Option::is_none",default)]
    pub tie_break : Option<TieBreak>,
    #[serde(skip_serializing_if = "Vec::is_empty",default)]
    pub transfers : Vec<Transfer<f64>>,
    #[serde(skip_serializing_if = "Option::is_none",default)]
    pub surplus_transfer : Option<SurplusTransfer>,
}

/// The whole of an STV count.
#[derive(Clone,Debug,PartialEq,Serialize,Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StvResult {
    pub rounds : Vec<StvRoundResult>,
    /// in order of election.
    pub winners : Vec<CandidateId>,
    pub seats : usize,
}
