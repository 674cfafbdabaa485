// Copyright 2021-2026 Andrew Conway.
// This file is part of ConcreteSTV.
// ConcreteSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteSTV.  If not, see <https://www.gnu.org/licenses/>.


//! This is the multi-winner STV algorithm.
//!
//! A Droop quota, fractional transfer values applied to every ballot of an elected candidate with
//! a surplus, and one action (elect, elect all remaining, or exclude) per round. Ballots of a candidate
//! elected with no surplus stay where they are, and carry on at full weight from the next round.


use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, trace};
use crate::ballot_metadata::CandidateId;
use crate::ballot_paper::Ballot;
use crate::ballot_pile::WeightedBallot;
use crate::distribution_of_preferences_transcript::{ExhaustionDetail, StvAction, StvResult, StvRoundResult, SurplusTransfer, TieBreak, Transfer, TransferDestination};
use crate::errors::{check_common_input, AlgorithmInvariantViolation, InputValidationError, TabulationError};
use crate::preference::NextPreference;
use crate::random_util::SeededRng;
use crate::tie_resolution::{draw_lot, TieBreakKind, TieResolutionMethod};
use crate::transfer_value::TransferValue;
use crate::util::CollectTransfers;

/// The Droop quota, `floor(total_ballots/(seats+1))+1`.
///
/// ```
/// assert_eq!(4,rcv::preference_distribution::droop_quota(10,2));
/// assert_eq!(51,rcv::preference_distribution::droop_quota(100,1));
/// ```
pub fn droop_quota(total_ballots:usize,seats:usize) -> usize {
    total_ballots/(seats+1)+1
}

/// Count an STV election for `seats` seats.
///
/// Lots are drawn from a generator seeded with `seed` exactly as given.
pub fn count_stv(ballots:&[Ballot],candidates:&[CandidateId],seats:usize,seed:&str) -> Result<StvResult,TabulationError> {
    check_common_input(ballots,candidates,seed)?;
    if seats<1 || seats>=candidates.len() {
        return Err(InputValidationError::InvalidSeats{seats,candidates:candidates.len()}.into());
    }
    let work = PreferenceDistributor::new(ballots,candidates,seats,seed);
    work.go()
}

/// Ballots found to be exhausted when a round is tallied.
#[derive(Default)]
struct ExhaustedThisRound {
    weight : f64,
    detail : ExhaustionDetail,
}

/// The main workhorse class that does preference distribution.
struct PreferenceDistributor<'a> {
    votes : Vec<WeightedBallot<'a>>,
    seats : usize,
    quota : usize,
    rng : SeededRng,
    continuing : BTreeSet<CandidateId>,
    /// in order of election.
    elected : Vec<CandidateId>,
    rounds : Vec<StvRoundResult>,
    round_limit : usize,
}

impl <'a> PreferenceDistributor<'a> {
    fn new(ballots:&'a [Ballot],candidates:&[CandidateId],seats:usize,seed:&str) -> Self {
        PreferenceDistributor{
            votes: ballots.iter().map(WeightedBallot::new).collect(),
            seats,
            quota: droop_quota(ballots.len(),seats),
            rng: SeededRng::new(seed),
            continuing: candidates.iter().cloned().collect(),
            elected: vec![],
            rounds: vec![],
            round_limit: candidates.len()+1,
        }
    }

    fn remaining_to_elect(&self) -> usize { self.seats-self.elected.len() }

    fn go(mut self) -> Result<StvResult,TabulationError> {
        info!(quota=self.quota,seats=self.seats,ballots=self.votes.len(),"Starting STV count");
        while self.remaining_to_elect()>0 && !self.continuing.is_empty() {
            if self.rounds.len()>=self.round_limit {
                return Err(AlgorithmInvariantViolation::RoundLimitExceeded{limit:self.round_limit}.into());
            }
            self.do_round();
        }
        if self.elected.len()!=self.seats {
            return Err(AlgorithmInvariantViolation::WrongNumberOfWinners{elected:self.elected.len(),seats:self.seats}.into());
        }
        info!(winners=?self.elected,"Count complete");
        Ok(StvResult{ rounds: self.rounds, winners: self.elected, seats: self.seats })
    }

    /// Find who each active ballot currently counts for, starting from where it is up to.
    fn compute_tallies(&mut self,exhausted:&mut ExhaustedThisRound) -> BTreeMap<CandidateId,f64> {
        let mut tallies : BTreeMap<CandidateId,f64> = self.continuing.iter().map(|c|(c.clone(),0.0)).collect();
        for vote in self.votes.iter_mut().filter(|v|v.is_active()) {
            match vote.next(&self.continuing) {
                NextPreference::Vote{candidate,rank} => {
                    vote.allocate(candidate,rank);
                    if let Some(tally) = tallies.get_mut(candidate) { *tally+=vote.weight(); }
                }
                NextPreference::Exhausted{reason,..} => {
                    exhausted.weight+=vote.exhaust();
                    exhausted.detail.record(reason);
                }
            }
        }
        tallies
    }

    /// Pass every ballot counting for `from` (no longer continuing) on to its next continuing preference,
    /// after multiplying its weight by the transfer value. A ballot with nowhere to go is recorded
    /// as a transfer to exhausted, and counted as exhausted when the next round is tallied.
    fn parcel_out_votes(&mut self,from:&CandidateId,transfer_value:TransferValue) -> Vec<Transfer<f64>> {
        let mut transfers = CollectTransfers::<f64>::default();
        for vote in self.votes.iter_mut().filter(|v|v.is_allocated_to(from)) {
            vote.pass_on(transfer_value);
            match vote.next(&self.continuing) {
                NextPreference::Vote{candidate,rank} => {
                    vote.allocate(candidate,rank);
                    transfers.add(TransferDestination::Candidate(candidate.clone()),vote.weight());
                }
                NextPreference::Exhausted{..} => transfers.add(TransferDestination::Exhausted,vote.weight()),
            }
        }
        transfers.take(from)
    }

    /// Choose one of the tied candidates (sorted by id) by lot if there is more than one.
    fn choose_by_lot(&mut self,tied:Vec<CandidateId>,round_index:usize,kind:TieBreakKind) -> (CandidateId,Option<TieBreak>) {
        if tied.len()==1 { return (tied[0].clone(),None); }
        let chosen = draw_lot(&tied,&mut self.rng);
        debug!(round=round_index,?tied,%chosen,?kind,"Drew lots");
        (chosen.clone(),Some(TieBreak{ round_index, kind, tied, chosen, resolved_by: TieResolutionMethod::Lot }))
    }

    fn do_round(&mut self) {
        let round_index = self.rounds.len();
        let mut exhausted = ExhaustedThisRound::default();
        let tallies = self.compute_tallies(&mut exhausted);
        trace!(round=round_index,?tallies,"Tallies");
        let continuing_ballots : f64 = tallies.values().sum();
        let quota = self.quota as f64;
        let highest = tallies.values().copied().fold(f64::NEG_INFINITY,f64::max);
        let mut transfers = vec![];
        let mut surplus_transfer = None;
        let (action,affected_candidate,tie_break) = if highest>=quota {
            let top : Vec<CandidateId> = tallies.iter().filter(|&(_,&t)|t==highest).map(|(c,_)|c.clone()).collect();
            let (winner,tie_break) = self.choose_by_lot(top,round_index,TieBreakKind::Election);
            debug!(round=round_index,%winner,tally=highest,"Elected by quota");
            self.continuing.remove(&winner);
            self.elected.push(winner.clone());
            let surplus = highest-quota;
            if surplus>0.0 && self.remaining_to_elect()>0 {
                let transfer_value = TransferValue::from_surplus(surplus,highest);
                transfers=self.parcel_out_votes(&winner,transfer_value);
                debug!(round=round_index,%winner,surplus,%transfer_value,"Distributed surplus");
                surplus_transfer=Some(SurplusTransfer{ from: winner.clone(), surplus, transfer_value: transfer_value.value() });
            }
            (StvAction::Elect,Some(winner),tie_break)
        } else if self.continuing.len()+self.elected.len()<=self.seats {
            let mut remaining : Vec<(&CandidateId,f64)> = tallies.iter().map(|(c,&t)|(c,t)).collect();
            remaining.sort_by(|a,b|b.1.total_cmp(&a.1).then_with(||a.0.cmp(b.0)));
            for (candidate,_) in remaining {
                debug!(round=round_index,%candidate,"Elected as one of the remaining candidates");
                self.elected.push(candidate.clone());
            }
            self.continuing.clear();
            (StvAction::Final,None,None)
        } else {
            let lowest_tally = tallies.values().copied().fold(f64::INFINITY,f64::min);
            let lows : Vec<CandidateId> = tallies.iter().filter(|&(_,&t)|t==lowest_tally).map(|(c,_)|c.clone()).collect();
            let (lowest,tie_break) = self.choose_by_lot(lows,round_index,TieBreakKind::Elimination);
            debug!(round=round_index,%lowest,tally=lowest_tally,"Excluding");
            self.continuing.remove(&lowest);
            transfers=self.parcel_out_votes(&lowest,TransferValue::one());
            (StvAction::Eliminate,Some(lowest),tie_break)
        };
        self.rounds.push(StvRoundResult{
            round_index,
            continuing: self.continuing.clone(),
            elected: self.elected.clone(),
            tallies,
            exhausted: exhausted.weight,
            exhaustion_detail: exhausted.detail,
            continuing_ballots,
            threshold: self.quota,
            action,
            affected_candidate,
            tie_break,
            transfers,
            surplus_transfer,
        });
    }
}

#[cfg(test)]
mod tests {
    use crate::preference_distribution::droop_quota;

    #[test]
    fn test_droop_quota() {
        assert_eq!(4,droop_quota(10,2));
        assert_eq!(3,droop_quota(7,2));
        assert_eq!(3,droop_quota(6,2));
        assert_eq!(1,droop_quota(0,3));
    }
}
