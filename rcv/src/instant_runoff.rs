// Copyright 2021-2026 Andrew Conway.
// This file is part of ConcreteSTV.
// ConcreteSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteSTV.  If not, see <https://www.gnu.org/licenses/>.


//! Single winner instant runoff voting.
//!
//! Each round every ballot is resolved afresh against the continuing candidates, starting from
//! its first rank. If someone has a majority of the continuing ballots they win, otherwise the
//! lowest candidate is eliminated and their ballots are followed to see where they go.


use std::collections::{BTreeMap, BTreeSet};
use serde::{Serialize,Deserialize};
use tracing::{debug, info, trace, warn};
use crate::ballot_metadata::CandidateId;
use crate::ballot_paper::Ballot;
use crate::distribution_of_preferences_transcript::{CountResult, ExhaustionDetail, PathPoint, RoundResult, TieBreak, TransferDestination, UserPathStep};
use crate::errors::{check_common_input, AlgorithmInvariantViolation, TabulationError};
use crate::preference::{resolve, NextPreference};
use crate::random_util::SeededRng;
use crate::tie_resolution::{draw_lot, resolve_by_lookback, MajorityCondition, TieBreakKind, TieBreakerStrategy, TieResolutionMethod};
use crate::util::CollectTransfers;

/// The minimum number of rounds allowed before a count is considered broken.
/// A count cannot legitimately need more rounds than there are candidates.
pub const MIN_ROUND_LIMIT : usize = 50;

/// The choices that vary between jurisdictions.
#[derive(Debug,Clone,Copy,Default,PartialEq,Eq,Serialize,Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrvRules {
    #[serde(default)]
    pub tie_breaker : TieBreakerStrategy,
    #[serde(default)]
    pub majority_condition : MajorityCondition,
}

/// Count an IRV election.
///
/// Lots are drawn from a generator seeded with `seed` followed by `-rcv`, so the same
/// arguments always give the same result. If `user_ballot_id` names a ballot, its
/// allocation in each round is returned as the user path.
pub fn count_irv(ballots:&[Ballot],candidates:&[CandidateId],seed:&str,rules:&IrvRules,user_ballot_id:Option<&str>) -> Result<CountResult,TabulationError> {
    check_common_input(ballots,candidates,seed)?;
    let counter = InstantRunoffCounter::new(ballots,candidates,seed,*rules,user_ballot_id);
    counter.go()
}

/// What the ballot of interest did in each round.
struct UserPathTracker {
    ballot_index : usize,
    previous : PathPoint,
    path : Vec<UserPathStep>,
}

/// The main workhorse that does an IRV count.
struct InstantRunoffCounter<'a> {
    ballots : &'a [Ballot],
    rules : IrvRules,
    rng : SeededRng,
    continuing : BTreeSet<CandidateId>,
    rounds : Vec<RoundResult>,
    round_limit : usize,
    user : Option<UserPathTracker>,
}

impl <'a> InstantRunoffCounter<'a> {
    fn new(ballots:&'a [Ballot],candidates:&[CandidateId],seed:&str,rules:IrvRules,user_ballot_id:Option<&str>) -> Self {
        let user = user_ballot_id.and_then(|id|{
            let found = ballots.iter().position(|b|b.id==id);
            if found.is_none() { warn!(ballot=id,"User ballot not found; no path will be traced"); }
            found
        }).map(|ballot_index|UserPathTracker{ ballot_index, previous: PathPoint::Start, path: vec![] });
        InstantRunoffCounter{
            ballots,
            rules,
            rng: SeededRng::new(&format!("{}-rcv",seed)),
            continuing: candidates.iter().cloned().collect(),
            rounds: vec![],
            round_limit: MIN_ROUND_LIMIT.max(candidates.len()),
            user,
        }
    }

    fn go(mut self) -> Result<CountResult,TabulationError> {
        info!(ballots=self.ballots.len(),candidates=self.continuing.len(),"Starting IRV count");
        loop {
            if self.rounds.len()>=self.round_limit {
                return Err(AlgorithmInvariantViolation::RoundLimitExceeded{limit:self.round_limit}.into());
            }
            if self.continuing.is_empty() { return Err(AlgorithmInvariantViolation::NoWinner.into()); }
            if let Some(winner) = self.do_round() {
                info!(%winner,rounds=self.rounds.len(),"Elected");
                return Ok(CountResult{
                    rounds: self.rounds,
                    winner,
                    user_path: self.user.map(|u|u.path),
                });
            }
        }
    }

    /// Do one round. Return the winner if there is one.
    fn do_round(&mut self) -> Option<CandidateId> {
        let round_index = self.rounds.len();
        let ballots = self.ballots;
        let mut tallies : BTreeMap<CandidateId,usize> = self.continuing.iter().map(|c|(c.clone(),0)).collect();
        let mut exhausted = 0;
        let mut exhaustion_detail = ExhaustionDetail::default();
        let mut allocations : Vec<Option<&'a CandidateId>> = Vec::with_capacity(ballots.len());
        for ballot in ballots {
            match resolve(&ballot.ranks,&self.continuing,0) {
                NextPreference::Vote{candidate,..} => {
                    if let Some(tally) = tallies.get_mut(candidate) { *tally+=1; }
                    allocations.push(Some(candidate));
                }
                NextPreference::Exhausted{reason,..} => {
                    exhausted+=1;
                    exhaustion_detail.record(reason);
                    allocations.push(None);
                }
            }
        }
        let continuing_ballots : usize = tallies.values().sum();
        let threshold = continuing_ballots as f64/2.0;
        trace!(round=round_index,?tallies,exhausted,"Tallies");
        let mut round = RoundResult{
            round_index,
            continuing: self.continuing.clone(),
            tallies,
            exhausted,
            exhaustion_detail,
            continuing_ballots,
            threshold,
            winner: None,
            eliminated: None,
            tie_break: None,
            transfers: vec![],
        };
        self.trace_user_ballot(round_index,&allocations);
        if let Some(winner) = self.find_majority_winner(&round) {
            round.winner=Some(winner.clone());
            self.rounds.push(round);
            return Some(winner);
        }
        if self.continuing.len()==1 {
            let only = self.continuing.iter().next().cloned();
            round.winner=only.clone();
            self.rounds.push(round);
            return only;
        }
        let (eliminated,tie_break) = self.choose_lowest(&round);
        debug!(round=round_index,%eliminated,"Excluding");
        self.continuing.remove(&eliminated);
        let mut transfers = CollectTransfers::<usize>::default();
        for (ballot,allocation) in ballots.iter().zip(allocations.iter()) {
            if *allocation==Some(&eliminated) {
                let to = match resolve(&ballot.ranks,&self.continuing,0) {
                    NextPreference::Vote{candidate,..} => TransferDestination::Candidate(candidate.clone()),
                    NextPreference::Exhausted{..} => TransferDestination::Exhausted,
                };
                transfers.add(to,1);
            }
        }
        round.transfers=transfers.take(&eliminated);
        round.eliminated=Some(eliminated);
        round.tie_break=tie_break;
        self.rounds.push(round);
        None
    }

    /// See if anyone meets the majority condition. Only `>=` with an exact split can give more
    /// than one; then the highest tally wins, and of equal tallies the last by id.
    fn find_majority_winner(&self,round:&RoundResult) -> Option<CandidateId> {
        let condition = self.rules.majority_condition;
        round.tallies.iter().filter(|&(_,&t)|condition.is_met(t,round.threshold)).max_by_key(|&(_,&t)|t).map(|(c,_)|c.clone())
    }

    /// Find the candidate to eliminate, resolving ties for lowest according to the rules.
    fn choose_lowest(&mut self,round:&RoundResult) -> (CandidateId,Option<TieBreak>) {
        let lowest_tally = round.tallies.values().copied().min().unwrap_or(0);
        // tallies are keyed by id, so this is already sorted.
        let lows : Vec<CandidateId> = round.tallies.iter().filter(|&(_,&t)|t==lowest_tally).map(|(c,_)|c.clone()).collect();
        if lows.len()==1 { return (lows[0].clone(),None); }
        let by_lookback = if self.rules.tie_breaker.uses_lookback() {
            let history : Vec<&BTreeMap<CandidateId,usize>> = self.rounds.iter().map(|r|&r.tallies).collect();
            resolve_by_lookback(&lows,&history).map(|(c,round_index)|(c.clone(),TieResolutionMethod::Lookback{round_index}))
        } else { None };
        let (chosen,resolved_by) = by_lookback.unwrap_or_else(||(draw_lot(&lows,&mut self.rng),TieResolutionMethod::Lot));
        debug!(round=round.round_index,tied=?lows,%chosen,?resolved_by,"Resolved tie for lowest");
        let tie_break = TieBreak{ round_index: round.round_index, kind: TieBreakKind::Elimination, tied: lows, chosen: chosen.clone(), resolved_by };
        (chosen,Some(tie_break))
    }

    fn trace_user_ballot(&mut self,round_index:usize,allocations:&[Option<&CandidateId>]) {
        if let Some(user) = &mut self.user {
            let to = match allocations[user.ballot_index] {
                Some(candidate) => PathPoint::Candidate(candidate.clone()),
                None => PathPoint::Exhausted,
            };
            let from = std::mem::replace(&mut user.previous,to.clone());
            user.path.push(UserPathStep{ round_index, from, to });
        }
    }
}
