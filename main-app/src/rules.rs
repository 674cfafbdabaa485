// Copyright 2021-2026 Andrew Conway.
// This file is part of ConcreteSTV.
// ConcreteSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteSTV.  If not, see <https://www.gnu.org/licenses/>.


use std::str::FromStr;
use std::fmt::{Display, Formatter};
use serde::{Serialize,Deserialize};
use rcv::ballot_metadata::CandidateId;
use rcv::distribution_of_preferences_transcript::{CountResult, StvResult};
use rcv::election_data::ElectionData;
use rcv::errors::TabulationError;
use rcv::instant_runoff::IrvRules;
use rcv::tie_resolution::{MajorityCondition, TieBreakerStrategy};

#[derive(Copy,Clone,Debug,PartialEq,Eq,Serialize,Deserialize)]
pub enum CountingMethod {
    /// single winner instant runoff.
    Irv,
    /// multi-winner single transferable vote.
    Stv,
}

impl FromStr for CountingMethod {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "IRV" => Ok(CountingMethod::Irv),
            "STV" => Ok(CountingMethod::Stv),
            _ => Err("No such counting method supported. Use IRV or STV")
        }
    }
}

impl Display for CountingMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CountingMethod::Irv => "IRV",
            CountingMethod::Stv => "STV",
        };
        f.write_str(s)
    }
}

/// Values that override those stored with an election.
#[derive(Clone,Debug,Default)]
pub struct CountSettings {
    pub seed : Option<String>,
    pub seats : Option<usize>,
    pub tie_breaker : Option<TieBreakerStrategy>,
    pub majority_condition : Option<MajorityCondition>,
    pub user_ballot : Option<String>,
}

impl CountSettings {
    /// The IRV rules to use, or None if nothing is overridden.
    pub fn irv_rules(&self,data:&ElectionData) -> Option<IrvRules> {
        if self.tie_breaker.is_none() && self.majority_condition.is_none() { return None; }
        let stored = data.rules.unwrap_or_default();
        Some(IrvRules{
            tie_breaker: self.tie_breaker.unwrap_or(stored.tie_breaker),
            majority_condition: self.majority_condition.unwrap_or(stored.majority_condition),
        })
    }
}

impl CountingMethod {
    pub fn count(&self,data:&ElectionData,settings:&CountSettings) -> Result<PossibleResults,TabulationError> {
        let seed = settings.seed.as_deref();
        Ok(match self {
            CountingMethod::Irv => PossibleResults::Irv(data.count_irv(seed,settings.irv_rules(data),settings.user_ballot.as_deref())?),
            CountingMethod::Stv => PossibleResults::Stv(data.count_stv(settings.seats,seed)?),
        })
    }
}

#[derive(Clone,Debug,PartialEq,Serialize,Deserialize)]
#[serde(untagged)]
pub enum PossibleResults {
    Irv(CountResult),
    Stv(StvResult),
}

impl PossibleResults {
    pub fn winners(&self) -> Vec<CandidateId> {
        match self {
            PossibleResults::Irv(result) => vec![result.winner.clone()],
            PossibleResults::Stv(result) => result.winners.clone(),
        }
    }
    pub fn num_rounds(&self) -> usize {
        match self {
            PossibleResults::Irv(result) => result.rounds.len(),
            PossibleResults::Stv(result) => result.rounds.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;
    use rcv::ballot_metadata::{Candidate, CandidateId};
    use rcv::ballot_paper::Ballot;
    use rcv::election_data::ElectionData;
    use rcv::tie_resolution::{MajorityCondition, TieBreakerStrategy};
    use crate::rules::{CountSettings, CountingMethod, PossibleResults};

    #[test]
    fn test_parse_method() {
        assert_eq!(Ok(CountingMethod::Irv),CountingMethod::from_str("irv"));
        assert_eq!(Ok(CountingMethod::Stv),CountingMethod::from_str("STV"));
        assert!(CountingMethod::from_str("AEC2019").is_err());
        assert_eq!("STV",CountingMethod::Stv.to_string());
    }

    #[test]
    fn test_count() {
        let data = ElectionData{
            candidates: vec![Candidate::from_id("A"),Candidate::from_id("B"),Candidate::from_id("C")],
            ballots: vec![
                Ballot::from_markings("v1",&["A","B"]),
                Ballot::from_markings("v2",&["A","C"]),
                Ballot::from_markings("v3",&["B","A"]),
                Ballot::from_markings("v4",&["C","B"]),
            ],
            seed: Some("stored".to_string()),
            seats: Some(2),
            rules: None,
        };
        let settings = CountSettings{ majority_condition: Some(MajorityCondition::AtLeast), ..CountSettings::default() };
        let rules = settings.irv_rules(&data).unwrap();
        assert_eq!(TieBreakerStrategy::LookbackThenLot,rules.tie_breaker);
        let irv = CountingMethod::Irv.count(&data,&settings).unwrap();
        assert_eq!(1,irv.num_rounds());
        assert_eq!(vec![CandidateId::from("A")],irv.winners());
        let stv = CountingMethod::Stv.count(&data,&CountSettings::default()).unwrap();
        assert!(matches!(stv,PossibleResults::Stv(_)));
        assert_eq!(2,stv.winners().len());
        let json = serde_json::to_string(&irv).unwrap();
        assert!(json.starts_with("{\"rounds\":"));
    }
}
