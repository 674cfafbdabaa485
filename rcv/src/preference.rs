// Copyright 2021-2026 Andrew Conway.
// This file is part of ConcreteSTV.
// ConcreteSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteSTV.  If not, see <https://www.gnu.org/licenses/>.


//! Work out what a ballot currently counts for, given the set of continuing candidates.
//! This is shared by the IRV and STV counts, and is the only place where overvotes,
//! duplicates and blanks are interpreted.

use std::collections::{BTreeSet, HashSet};
use serde::{Serialize,Deserialize};
use crate::ballot_metadata::CandidateId;
use crate::ballot_paper::RankMark;

/// Why a ballot can no longer count for anyone.
#[derive(Copy,Clone,Debug,Eq,PartialEq,Serialize,Deserialize)]
pub enum ExhaustionReason {
    /// An overvoted rank was reached before any vote.
    Overvote,
    /// Something was marked, but no marked candidate is continuing.
    NoValidNext,
    /// Nothing at all was marked in the ranks scanned.
    Blank,
}

/// The result of looking for the next preference on a ballot.
#[derive(Copy,Clone,Debug,Eq,PartialEq)]
pub enum NextPreference<'a> {
    /// Counts for `candidate`, found at index `rank` of the ballot.
    Vote{candidate:&'a CandidateId,rank:usize},
    /// Does not count. `rank` is the overvoted rank, or the number of ranks if the scan ran off the end.
    Exhausted{reason:ExhaustionReason,rank:usize},
}

impl <'a> NextPreference<'a> {
    pub fn candidate(&self) -> Option<&'a CandidateId> {
        match self {
            NextPreference::Vote{candidate,..} => Some(*candidate),
            NextPreference::Exhausted{..} => None,
        }
    }
}

/// Scan `ranks` from index `start` looking for the first continuing candidate.
/// * Blank ranks are skipped.
/// * An overvote exhausts the ballot as soon as it is reached.
/// * A candidate repeated later in the scan is inert the second time.
/// * A candidate no longer continuing is skipped.
pub fn resolve<'a>(ranks:&'a [RankMark],continuing:&BTreeSet<CandidateId>,start:usize) -> NextPreference<'a> {
    let mut seen : HashSet<&CandidateId> = HashSet::new();
    let mut any_marked = false;
    for (rank,mark) in ranks.iter().enumerate().skip(start) {
        match mark {
            RankMark::Blank => {}
            RankMark::Overvote(_) => return NextPreference::Exhausted{reason:ExhaustionReason::Overvote,rank},
            RankMark::Single(candidate) => {
                any_marked=true;
                if seen.insert(candidate) && continuing.contains(candidate) {
                    return NextPreference::Vote{candidate,rank};
                }
            }
        }
    }
    let reason = if any_marked { ExhaustionReason::NoValidNext } else { ExhaustionReason::Blank };
    NextPreference::Exhausted{reason,rank:ranks.len()}
}
