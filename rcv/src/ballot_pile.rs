// Copyright 2021-2026 Andrew Conway.
// This file is part of ConcreteSTV.
// ConcreteSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteSTV.  If not, see <https://www.gnu.org/licenses/>.


//! Things to do with ballots part way through an STV count.


use std::collections::BTreeSet;
use crate::ballot_metadata::CandidateId;
use crate::ballot_paper::Ballot;
use crate::preference::{resolve, ExhaustionReason, NextPreference};
use crate::transfer_value::TransferValue;

/// A ballot somewhere through being distributed.
/// Ignore preferences with index less than upto; they have already been used.
/// Owned by a single count and never shared.
#[derive(Clone,Debug)]
pub struct WeightedBallot<'a> {
    pub ballot : &'a Ballot,
    /// starts at 1, only ever decreases, 0 once exhausted.
    pub(crate) weight : f64,
    pub(crate) upto : usize,
    /// who this ballot counted for in the most recent tally.
    pub(crate) allocated : Option<&'a CandidateId>,
}

impl <'a> WeightedBallot<'a> {
    pub fn new(ballot:&'a Ballot) -> Self {
        WeightedBallot{ ballot, weight: 1.0, upto: 0, allocated: None }
    }
    pub fn weight(&self) -> f64 { self.weight }
    pub fn upto(&self) -> usize { self.upto }
    pub fn is_active(&self) -> bool { self.weight>0.0 }
    pub fn is_allocated_to(&self,candidate:&CandidateId) -> bool { self.allocated==Some(candidate) }

    /// the next preference, not looking at anything before upto.
    /// Once passed on, a ballot has had a non-blank mark, so running out is never a blank ballot.
    pub fn next(&self,continuing:&BTreeSet<CandidateId>) -> NextPreference<'a> {
        let ballot : &'a Ballot = self.ballot;
        match resolve(&ballot.ranks,continuing,self.upto) {
            NextPreference::Exhausted{reason:ExhaustionReason::Blank,rank} if self.upto>0 => NextPreference::Exhausted{reason:ExhaustionReason::NoValidNext,rank},
            next => next,
        }
    }

    /// Count for `candidate`, found at `rank`. Never moves backwards.
    pub fn allocate(&mut self,candidate:&'a CandidateId,rank:usize) {
        self.upto=self.upto.max(rank);
        self.allocated=Some(candidate);
    }
    /// Pass on from the current candidate, multiplying the weight by a transfer value in (0,1].
    pub fn pass_on(&mut self,transfer_value:TransferValue) {
        self.weight=transfer_value.apply(self.weight).min(self.weight);
        self.upto+=1;
        self.allocated=None;
    }
    /// Permanently stop counting. Returns the weight lost.
    pub fn exhaust(&mut self) -> f64 {
        let lost = self.weight;
        self.weight=0.0;
        self.allocated=None;
        lost
    }
}
