// Copyright 2021-2026 Andrew Conway.
// This file is part of ConcreteSTV.
// ConcreteSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteSTV.  If not, see <https://www.gnu.org/licenses/>.


//! Information about a ranked ballot. That is, something written on a ballot paper.
//! Every ballot in a contest has the same number of rank slots; each slot holds one marking.

use crate::ballot_metadata::CandidateId;
use serde::{Deserialize,Serialize};
use std::fmt::{Display, Formatter};

/// A marking in a particular rank slot of a ballot.
#[derive(Clone,Debug,Eq,PartialEq,Serialize,Deserialize)]
#[serde(from = "RankMarkWithLooseShape", into = "RankMarkWithLooseShape")]
pub enum RankMark {
    /// Nothing written in this rank.
    Blank,
    /// Exactly one candidate in this rank.
    Single(CandidateId),
    /// More than one candidate in this rank. Always has at least 2 entries.
    Overvote(Vec<CandidateId>),
}

impl RankMark {
    /// Interpret a list of candidates marked at the same rank.
    /// An empty list is a blank, a single entry is a normal marking, otherwise it is an overvote.
    pub fn from_candidates(mut candidates:Vec<CandidateId>) -> Self {
        match candidates.len() {
            0 => RankMark::Blank,
            1 => RankMark::Single(candidates.remove(0)),
            _ => RankMark::Overvote(candidates),
        }
    }
    pub fn single(id:&str) -> Self { RankMark::Single(CandidateId::from(id)) }
    pub fn is_blank(&self) -> bool { matches!(self,RankMark::Blank) }
}

/// The JSON shape used by ballot generators and renderers: `null`, `"A"` or `["A","B"]`.
/// This structure is solely used to convert to and from that shape; a one element
/// array is read as a normal marking rather than a degenerate overvote.
#[derive(Serialize,Deserialize)]
#[serde(untagged)]
enum RankMarkWithLooseShape {
    Single(CandidateId),
    Multiple(Vec<CandidateId>),
    Blank,
}

impl From<RankMarkWithLooseShape> for RankMark {
    fn from(value: RankMarkWithLooseShape) -> Self {
        match value {
            RankMarkWithLooseShape::Single(id) => RankMark::Single(id),
            RankMarkWithLooseShape::Multiple(ids) => RankMark::from_candidates(ids),
            RankMarkWithLooseShape::Blank => RankMark::Blank,
        }
    }
}

impl From<RankMark> for RankMarkWithLooseShape {
    fn from(value: RankMark) -> Self {
        match value {
            RankMark::Blank => RankMarkWithLooseShape::Blank,
            RankMark::Single(id) => RankMarkWithLooseShape::Single(id),
            RankMark::Overvote(ids) => RankMarkWithLooseShape::Multiple(ids),
        }
    }
}

impl Display for RankMark {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RankMark::Blank => Ok(()),
            RankMark::Single(id) => write!(f,"{}",id),
            RankMark::Overvote(ids) => write!(f,"{}",ids.iter().map(|c|c.to_string()).collect::<Vec<_>>().join("|")),
        }
    }
}

/// Interpret a textual marking, as found in a spreadsheet cell or similar.
/// * empty or `-` is a blank
/// * `A|B` or `A=B` is an overvote for A and B
/// * anything else is the id of a single candidate.
///
/// ```
/// use rcv::ballot_paper::{parse_marking, RankMark};
/// assert_eq!(parse_marking(""),RankMark::Blank);
/// assert_eq!(parse_marking(" A "),RankMark::single("A"));
/// assert_eq!(parse_marking("A|B"),RankMark::Overvote(vec!["A".into(),"B".into()]));
/// assert_eq!(parse_marking("C="),RankMark::single("C"));
/// ```
pub fn parse_marking(marking:&str) -> RankMark {
    let marking = marking.trim();
    if marking.is_empty() || marking=="-" { RankMark::Blank }
    else if marking.contains('|') || marking.contains('=') {
        let candidates = marking.split(['|','=']).map(|s|s.trim()).filter(|s|!s.is_empty()).map(CandidateId::from).collect();
        RankMark::from_candidates(candidates)
    } else { RankMark::single(marking) }
}

/// Where a ballot came from.
#[derive(Clone,Copy,Debug,Eq,PartialEq,Serialize,Deserialize,Default)]
#[serde(rename_all = "lowercase")]
pub enum BallotSource {
    /// Produced by an electorate generator or loaded from a file.
    #[default]
    Synthetic,
    /// Filled in by the person using the application.
    User,
}

/// A ranked ballot. Immutable once created.
#[derive(Clone,Debug,Serialize,Deserialize,PartialEq)]
pub struct Ballot {
    pub id : String,
    /// rank slots, index 0 being the most favoured.
    pub ranks : Vec<RankMark>,
    #[serde(default)]
    pub source : BallotSource,
}

impl Ballot {
    pub fn new(id:&str,ranks:Vec<RankMark>) -> Self {
        Ballot{ id: id.to_string(), ranks, source: BallotSource::Synthetic }
    }
    /// Make a ballot from textual markings, see [parse_marking].
    pub fn from_markings(id:&str,markings:&[&str]) -> Self {
        Ballot::new(id,markings.iter().map(|m|parse_marking(m)).collect())
    }
    pub fn with_source(mut self,source:BallotSource) -> Self {
        self.source=source;
        self
    }
}
