// Copyright 2021-2026 Andrew Conway.
// This file is part of ConcreteSTV.
// ConcreteSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteSTV.  If not, see <https://www.gnu.org/licenses/>.

//! Things that can stop a count from producing a result.
//! Any of these means there is no result; nothing partial is ever returned.


use std::collections::HashSet;
use thiserror::Error;
use crate::ballot_metadata::CandidateId;
use crate::ballot_paper::Ballot;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TabulationError {
    #[error("Invalid input : {0}")]
    InvalidInput(#[from] InputValidationError),
    #[error("Internal error in count : {0}")]
    InvariantViolation(#[from] AlgorithmInvariantViolation),
}

/// Problems with what was asked to be counted, detected before any round is run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputValidationError {
    #[error("No ballots provided")]
    NoBallots,
    #[error("No candidates provided")]
    NoCandidates,
    #[error("Seed must not be empty")]
    EmptySeed,
    #[error("No seed specified")]
    MissingSeed,
    #[error("No number of seats specified")]
    MissingSeats,
    #[error("Candidate {0} listed more than once")]
    DuplicateCandidate(CandidateId),
    #[error("Asked to fill {seats} seats with {candidates} candidates; need at least 1 seat and fewer seats than candidates")]
    InvalidSeats{seats:usize,candidates:usize},
}

/// Should not happen. If it does, it is a bug, and the count must not be presented as complete.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlgorithmInvariantViolation {
    #[error("Count did not finish within {limit} rounds")]
    RoundLimitExceeded{limit:usize},
    #[error("Count finished without a winner")]
    NoWinner,
    #[error("Count elected {elected} candidates for {seats} seats")]
    WrongNumberOfWinners{elected:usize,seats:usize},
}

/// Checks common to all counts.
pub(crate) fn check_common_input(ballots:&[Ballot],candidates:&[CandidateId],seed:&str) -> Result<(),InputValidationError> {
    if ballots.is_empty() { return Err(InputValidationError::NoBallots); }
    if candidates.is_empty() { return Err(InputValidationError::NoCandidates); }
    if seed.is_empty() { return Err(InputValidationError::EmptySeed); }
    let mut observed = HashSet::new();
    for candidate in candidates {
        if !observed.insert(candidate) { return Err(InputValidationError::DuplicateCandidate(candidate.clone())); }
    }
    Ok(())
}
