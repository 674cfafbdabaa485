// Copyright 2021-2026 Andrew Conway.
// This file is part of ConcreteSTV.
// ConcreteSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteSTV.  If not, see <https://www.gnu.org/licenses/>.


use crate::ballot_metadata::CandidateId;
use crate::random_util::SeededRng;
use std::collections::BTreeMap;
use serde::{Serialize,Deserialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// How a tie for lowest in an IRV count is resolved.
#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize,Default)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreakerStrategy {
    /// Look back through prior rounds, most recent first, for a round in which exactly one
    /// of the tied candidates had the lowest tally. If there is no such round, draw lots.
    #[default]
    LookbackThenLot,
    /// Draw lots straight away.
    Lot,
    /// Draw lots straight away. Kept as a separate name as some configurations use it;
    /// all lots are drawn from the seeded generator so this behaves as [TieBreakerStrategy::Lot].
    Seeded,
}

impl TieBreakerStrategy {
    pub fn uses_lookback(self) -> bool { self==TieBreakerStrategy::LookbackThenLot }
}

impl FromStr for TieBreakerStrategy {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lookback-then-lot" => Ok(TieBreakerStrategy::LookbackThenLot),
            "lot" => Ok(TieBreakerStrategy::Lot),
            "seeded" => Ok(TieBreakerStrategy::Seeded),
            _ => Err("No such tie breaker supported. Use lookback-then-lot, lot or seeded"),
        }
    }
}

impl Display for TieBreakerStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TieBreakerStrategy::LookbackThenLot => "lookback-then-lot",
            TieBreakerStrategy::Lot => "lot",
            TieBreakerStrategy::Seeded => "seeded",
        })
    }
}

/// What share of the continuing ballots is needed to win an IRV round outright.
#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize,Default)]
pub enum MajorityCondition {
    /// strictly more than half. Most jurisdictions.
    #[default]
    #[serde(rename = ">")]
    GreaterThan,
    /// at least half.
    #[serde(rename = ">=")]
    AtLeast,
}

impl MajorityCondition {
    pub fn is_met(self,votes:usize,threshold:f64) -> bool {
        let votes = votes as f64;
        match self {
            MajorityCondition::GreaterThan => votes>threshold,
            MajorityCondition::AtLeast => votes>=threshold,
        }
    }
}

impl FromStr for MajorityCondition {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ">" | "gt" => Ok(MajorityCondition::GreaterThan),
            ">=" | "ge" => Ok(MajorityCondition::AtLeast),
            _ => Err("No such majority condition. Use > (or gt) or >= (or ge)"),
        }
    }
}

impl Display for MajorityCondition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            MajorityCondition::GreaterThan => ">",
            MajorityCondition::AtLeast => ">=",
        })
    }
}

/// Why a tie had to be broken.
#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TieBreakKind {
    /// several candidates were equal lowest.
    Elimination,
    /// several candidates were equal highest when one had to be elected.
    Election,
}

/// How a tie was settled.
#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TieResolutionMethod {
    /// The tallies at the given earlier round singled out one candidate.
    Lookback{round_index:usize},
    /// Drawn from the seeded random number generator.
    Lot,
}

/// Look back through `history` (tallies of each earlier round, oldest first) for the most recent
/// round in which exactly one of `tied` had the lowest tally. Return that candidate and round.
pub fn resolve_by_lookback<'a,Tally:PartialOrd+Copy+Default>(tied:&'a [CandidateId],history:&[&BTreeMap<CandidateId,Tally>]) -> Option<(&'a CandidateId,usize)> {
    for (round_index,tallies) in history.iter().enumerate().rev() {
        let tally = |c:&CandidateId| tallies.get(c).copied().unwrap_or_default();
        let mut lowest : Vec<&CandidateId> = vec![];
        let mut lowest_tally : Option<Tally> = None;
        for candidate in tied {
            let t = tally(candidate);
            match lowest_tally {
                Some(l) if t>l => {}
                Some(l) if t==l => lowest.push(candidate),
                _ => { lowest_tally=Some(t); lowest=vec![candidate]; }
            }
        }
        if lowest.len()==1 { return Some((lowest[0],round_index)); }
    }
    None
}

/// Choose uniformly by lot. `tied` is sorted by id first so the choice does not depend on the order given.
pub fn draw_lot(tied:&[CandidateId],rng:&mut SeededRng) -> CandidateId {
    let mut sorted = tied.to_vec();
    sorted.sort();
    let index = rng.choose_index(sorted.len());
    sorted.swap_remove(index)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use crate::ballot_metadata::CandidateId;
    use crate::random_util::SeededRng;
    use crate::tie_resolution::{draw_lot, resolve_by_lookback, MajorityCondition, TieBreakerStrategy};

    fn tallies(v:&[(&str,usize)]) -> BTreeMap<CandidateId,usize> { v.iter().map(|&(c,t)|(CandidateId::from(c),t)).collect() }

    #[test]
    fn test_lookback_uses_most_recent_distinguishing_round() {
        let tied : Vec<CandidateId> = vec!["B".into(),"C".into()];
        let r0 = tallies(&[("A",5),("B",2),("C",3)]);
        let r1 = tallies(&[("A",5),("B",3),("C",3)]);
        let r2 = tallies(&[("A",5),("B",4),("C",3)]);
        assert_eq!(Some((&tied[1],2)),resolve_by_lookback(&tied,&[&r0,&r1,&r2]));
        assert_eq!(Some((&tied[0],0)),resolve_by_lookback(&tied,&[&r0,&r1]));
        assert_eq!(None,resolve_by_lookback(&tied,&[&r1]));
        assert_eq!(None,resolve_by_lookback::<usize>(&tied,&[]));
    }

    #[test]
    fn test_lookback_needs_a_unique_lowest() {
        let tied : Vec<CandidateId> = vec!["A".into(),"B".into(),"C".into()];
        let r0 = tallies(&[("A",1),("B",1),("C",4)]);
        assert_eq!(None,resolve_by_lookback(&tied,&[&r0]));
    }

    #[test]
    fn test_lot_ignores_given_order() {
        let forward : Vec<CandidateId> = vec!["A".into(),"B".into(),"C".into()];
        let backward : Vec<CandidateId> = vec!["C".into(),"B".into(),"A".into()];
        for seed in ["x","y","z","w"] {
            assert_eq!(draw_lot(&forward,&mut SeededRng::new(seed)),draw_lot(&backward,&mut SeededRng::new(seed)));
        }
    }

    #[test]
    fn test_parse_rules() {
        assert_eq!(Ok(TieBreakerStrategy::Lot),"lot".parse());
        assert_eq!("lookback-then-lot",TieBreakerStrategy::default().to_string());
        assert!("coin".parse::<TieBreakerStrategy>().is_err());
        assert_eq!(Ok(MajorityCondition::AtLeast),">=".parse());
        assert!(!MajorityCondition::GreaterThan.is_met(2,2.0));
        assert!(MajorityCondition::AtLeast.is_met(2,2.0));
    }
}
