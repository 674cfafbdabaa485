// Copyright 2021-2026 Andrew Conway.
// This file is part of ConcreteSTV.
// ConcreteSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteSTV.  If not, see <https://www.gnu.org/licenses/>.


//! Small IRV elections where the answer can be worked out by hand.


#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use rcv::ballot_metadata::CandidateId;
    use rcv::ballot_paper::{Ballot, RankMark};
    use rcv::distribution_of_preferences_transcript::{PathPoint, TransferDestination};
    use rcv::errors::{InputValidationError, TabulationError};
    use rcv::instant_runoff::{count_irv, IrvRules};
    use rcv::tie_resolution::{MajorityCondition, TieBreakKind, TieBreakerStrategy, TieResolutionMethod};

    fn ids(names:&[&str]) -> Vec<CandidateId> { names.iter().map(|&n|CandidateId::from(n)).collect() }

    /// Make `n` ballots with the given markings, ids `prefix1`, `prefix2`...
    fn repeated(prefix:&str,n:usize,markings:&[&str]) -> Vec<Ballot> {
        (1..=n).map(|i|Ballot::from_markings(&format!("{}{}",prefix,i),markings)).collect()
    }

    fn default_rules() -> IrvRules { IrvRules::default() }

    #[test]
    fn test_first_round_majority() {
        let ballots = vec![
            Ballot::from_markings("v1",&["A","B","C","D"]),
            Ballot::from_markings("v2",&["A","C","B","D"]),
            Ballot::from_markings("v3",&["A","D","B","C"]),
        ];
        let res = count_irv(&ballots,&ids(&["A","B","C","D"]),"seed",&default_rules(),None).unwrap();
        assert_eq!("A",res.winner.as_str());
        assert_eq!(1,res.rounds.len());
        let round = &res.rounds[0];
        assert_eq!(Some(&3),round.tallies.get("A"));
        assert_eq!(Some(&0),round.tallies.get("D"));
        assert_eq!(1.5,round.threshold);
        assert_eq!(Some(CandidateId::from("A")),round.winner);
        assert!(round.eliminated.is_none());
        assert!(round.transfers.is_empty());
    }

    #[test]
    fn test_overvote_exhausts_immediately() {
        let ballots = vec![
            Ballot::new("v1",vec![RankMark::from_candidates(ids(&["A","B"])),RankMark::Blank,RankMark::Blank,RankMark::Blank]),
            Ballot::from_markings("v2",&["A","-","-","-"]),
            Ballot::from_markings("v3",&["B","-","-","-"]),
        ];
        let res = count_irv(&ballots,&ids(&["A","B"]),"seed",&default_rules(),None).unwrap();
        let round = &res.rounds[0];
        assert_eq!(1,round.exhausted);
        assert_eq!(1,round.exhaustion_detail.overvote_at_rank);
        assert_eq!(0,round.exhaustion_detail.no_valid_next);
        assert_eq!(2,round.continuing_ballots);
    }

    #[test]
    fn test_overvote_after_valid_choice() {
        let ballots = vec![
            Ballot::from_markings("v1",&["B","A|C"]),
            Ballot::from_markings("v2",&["A"]),
            Ballot::from_markings("v3",&["A"]),
            Ballot::from_markings("v4",&["C"]),
            Ballot::from_markings("v5",&["C"]),
        ];
        let res = count_irv(&ballots,&ids(&["A","B","C"]),"seed",&default_rules(),None).unwrap();
        let first = &res.rounds[0];
        assert_eq!(Some(CandidateId::from("B")),first.eliminated);
        assert_eq!(1,first.transfers.len());
        assert_eq!(TransferDestination::Exhausted,first.transfers[0].to);
        let second = &res.rounds[1];
        assert_eq!(1,second.exhausted);
        assert_eq!(1,second.exhaustion_detail.overvote_at_rank);
    }

    #[test]
    fn test_duplicates_are_inert() {
        let mut ballots = vec![Ballot::from_markings("v1",&["A","A","B","-"])];
        ballots.extend(repeated("b",2,&["B","-","-","-"]));
        ballots.extend(repeated("c",2,&["C","-","-","-"]));
        let res = count_irv(&ballots,&ids(&["A","B","C"]),"seed",&default_rules(),None).unwrap();
        assert_eq!(Some(&1),res.rounds[0].tallies.get("A"));
        assert_eq!(Some(CandidateId::from("A")),res.rounds[0].eliminated);
        assert_eq!(1,res.rounds[0].transfers.len());
        assert_eq!(TransferDestination::Candidate("B".into()),res.rounds[0].transfers[0].to);
        assert_eq!(0,res.rounds[1].exhausted);
        assert_eq!(Some(&3),res.rounds[1].tallies.get("B"));
        assert_eq!("B",res.winner.as_str());
    }

    #[test]
    fn test_exactly_half_is_not_a_majority() {
        let mut ballots = repeated("a",2,&["A"]);
        ballots.extend(repeated("b",2,&["B"]));
        let res = count_irv(&ballots,&ids(&["A","B"]),"seed",&default_rules(),None).unwrap();
        let first = &res.rounds[0];
        assert!(first.winner.is_none());
        let tie_break = first.tie_break.as_ref().unwrap();
        assert_eq!(TieBreakKind::Elimination,tie_break.kind);
        assert_eq!(ids(&["A","B"]),tie_break.tied);
        assert_eq!(TieResolutionMethod::Lot,tie_break.resolved_by);
        assert_eq!(first.eliminated.as_ref(),Some(&tie_break.chosen));
        assert_eq!(2,res.rounds.len());
        assert_ne!(tie_break.chosen,res.winner);
    }

    #[test]
    fn test_at_least_half_majority_condition() {
        let mut ballots = repeated("a",2,&["A"]);
        ballots.push(Ballot::from_markings("b",&["B"]));
        ballots.push(Ballot::from_markings("c",&["C"]));
        let candidates = ids(&["A","B","C"]);
        let strict = count_irv(&ballots,&candidates,"seed",&default_rules(),None).unwrap();
        assert_eq!(2,strict.rounds.len());
        assert_eq!("A",strict.winner.as_str());
        let rules = IrvRules{ majority_condition: MajorityCondition::AtLeast, ..IrvRules::default() };
        let relaxed = count_irv(&ballots,&candidates,"seed",&rules,None).unwrap();
        assert_eq!(1,relaxed.rounds.len());
        assert_eq!("A",relaxed.winner.as_str());
    }

    #[test]
    fn test_exact_split_under_at_least_half_needs_no_lot() {
        let mut ballots = repeated("a",2,&["A"]);
        ballots.extend(repeated("b",2,&["B"]));
        let rules = IrvRules{ majority_condition: MajorityCondition::AtLeast, ..IrvRules::default() };
        for seed in ["s1","s2","s3","s4"] {
            let res = count_irv(&ballots,&ids(&["A","B"]),seed,&rules,None).unwrap();
            assert_eq!(1,res.rounds.len());
            assert_eq!("B",res.winner.as_str());
            assert!(res.rounds[0].tie_break.is_none());
        }
        let mut with_blank = repeated("a",3,&["A"]);
        with_blank.extend(repeated("b",3,&["B"]));
        with_blank.extend(repeated("x",1,&["-"]));
        // 6 continuing ballots and C has none, so A and B both have exactly half.
        let res = count_irv(&with_blank,&ids(&["A","B","C"]),"seed",&rules,None).unwrap();
        assert_eq!(1,res.rounds.len());
        assert_eq!("B",res.winner.as_str());
    }

    #[test]
    fn test_all_exhausted_round_under_at_least_half() {
        let ballots = repeated("x",3,&["-","-"]);
        let rules = IrvRules{ majority_condition: MajorityCondition::AtLeast, ..IrvRules::default() };
        let res = count_irv(&ballots,&ids(&["A","B"]),"seed",&rules,None).unwrap();
        assert_eq!(1,res.rounds.len());
        assert_eq!(0,res.rounds[0].continuing_ballots);
        assert_eq!(3,res.rounds[0].exhausted);
        assert_eq!("B",res.winner.as_str());
        assert!(res.rounds[0].tie_break.is_none());
    }

    fn lookback_ballots() -> Vec<Ballot> {
        let mut ballots = repeated("a",4,&["A"]);
        ballots.extend(repeated("b",3,&["B"]));
        ballots.extend(repeated("c",2,&["C"]));
        ballots.push(Ballot::from_markings("d1",&["D","C"]));
        ballots
    }

    #[test]
    fn test_tie_resolved_by_lookback() {
        let res = count_irv(&lookback_ballots(),&ids(&["A","B","C","D"]),"seed",&default_rules(),None).unwrap();
        assert_eq!(3,res.rounds.len());
        assert_eq!(Some(CandidateId::from("D")),res.rounds[0].eliminated);
        assert!(res.rounds[0].tie_break.is_none());
        let second = &res.rounds[1];
        assert_eq!(Some(&3),second.tallies.get("B"));
        assert_eq!(Some(&3),second.tallies.get("C"));
        let tie_break = second.tie_break.as_ref().unwrap();
        assert_eq!(ids(&["B","C"]),tie_break.tied);
        assert_eq!("C",tie_break.chosen.as_str());
        assert_eq!(TieResolutionMethod::Lookback{round_index:0},tie_break.resolved_by);
        assert_eq!(1,second.transfers.len());
        assert_eq!(TransferDestination::Exhausted,second.transfers[0].to);
        assert_eq!(3,second.transfers[0].count);
        assert_eq!("A",res.winner.as_str());
        assert_eq!(Some(CandidateId::from("A")),res.rounds[2].winner);
    }

    #[test]
    fn test_lot_only_strategy_skips_lookback() {
        let rules = IrvRules{ tie_breaker: TieBreakerStrategy::Lot, ..IrvRules::default() };
        let res = count_irv(&lookback_ballots(),&ids(&["A","B","C","D"]),"seed",&rules,None).unwrap();
        let tie_break = res.rounds[1].tie_break.as_ref().unwrap();
        assert_eq!(TieResolutionMethod::Lot,tie_break.resolved_by);
        assert!(tie_break.tied.contains(&tie_break.chosen));
    }

    #[test]
    fn test_tie_unresolved_by_lookback_uses_lot() {
        let ballots = vec![
            Ballot::from_markings("v1",&["a","b","c","d"]),
            Ballot::from_markings("v2",&["a","c","b","d"]),
            Ballot::from_markings("v3",&["a","b","c","d"]),
            Ballot::from_markings("v4",&["b","a","c","d"]),
            Ballot::from_markings("v5",&["b","a","c","d"]),
            Ballot::from_markings("v6",&["c","a","b","d"]),
            Ballot::from_markings("v7",&["d","c","a","b"]),
            Ballot::from_markings("v8",&["d","b","a","c"]),
        ];
        let res = count_irv(&ballots,&ids(&["a","b","c","d"]),"test-seed",&default_rules(),None).unwrap();
        assert_eq!(Some(CandidateId::from("c")),res.rounds[0].eliminated);
        let tie_break = res.rounds[1].tie_break.as_ref().unwrap();
        assert_eq!(ids(&["b","d"]),tie_break.tied);
        assert_eq!(TieResolutionMethod::Lot,tie_break.resolved_by);
        assert_eq!("a",res.winner.as_str());
        assert_eq!(3,res.rounds.len());
    }

    #[test]
    fn test_blank_ballot() {
        let ballots = vec![
            Ballot::from_markings("v1",&["A","-"]),
            Ballot::from_markings("v2",&["-","-"]),
        ];
        let res = count_irv(&ballots,&ids(&["A","B"]),"seed",&default_rules(),None).unwrap();
        assert_eq!(1,res.rounds[0].exhaustion_detail.blank_remaining);
        assert_eq!(1,res.rounds[0].exhausted);
        assert_eq!("A",res.winner.as_str());
    }

    #[test]
    fn test_user_path() {
        let res = count_irv(&lookback_ballots(),&ids(&["A","B","C","D"]),"seed",&default_rules(),Some("d1")).unwrap();
        let path = res.user_path.unwrap();
        assert_eq!(res.rounds.len(),path.len());
        assert_eq!(PathPoint::Start,path[0].from);
        assert_eq!(PathPoint::Candidate("D".into()),path[0].to);
        assert_eq!(PathPoint::Candidate("D".into()),path[1].from);
        assert_eq!(PathPoint::Candidate("C".into()),path[1].to);
        assert_eq!(PathPoint::Exhausted,path[2].to);
        for (i,step) in path.iter().enumerate() { assert_eq!(i,step.round_index); }
        let missing = count_irv(&lookback_ballots(),&ids(&["A","B","C","D"]),"seed",&default_rules(),Some("nobody")).unwrap();
        assert!(missing.user_path.is_none());
    }

    #[test]
    fn test_invalid_input() {
        let ballots = repeated("a",1,&["A"]);
        let check = |ballots:&[Ballot],candidates:&[CandidateId],seed:&str,expected:InputValidationError| {
            assert_eq!(Err(TabulationError::InvalidInput(expected)),count_irv(ballots,candidates,seed,&IrvRules::default(),None));
        };
        check(&[],&ids(&["A"]),"seed",InputValidationError::NoBallots);
        check(&ballots,&[],"seed",InputValidationError::NoCandidates);
        check(&ballots,&ids(&["A"]),"",InputValidationError::EmptySeed);
        check(&ballots,&ids(&["A","B","A"]),"seed",InputValidationError::DuplicateCandidate("A".into()));
    }

    #[test]
    fn test_single_candidate_with_no_votes_still_wins() {
        let ballots = vec![Ballot::from_markings("v1",&["-"])];
        let res = count_irv(&ballots,&ids(&["A"]),"seed",&default_rules(),None).unwrap();
        assert_eq!("A",res.winner.as_str());
        assert_eq!(1,res.rounds.len());
    }

    /// A random mark in a rank slot: mostly single candidates, some blanks and overvotes.
    fn random_mark(rng:&mut ChaCha8Rng,candidates:&[CandidateId]) -> RankMark {
        match rng.random_range(0..10) {
            0 => RankMark::Blank,
            1 => RankMark::from_candidates(vec![candidates[0].clone(),candidates[rng.random_range(1..candidates.len())].clone()]),
            _ => RankMark::Single(candidates[rng.random_range(0..candidates.len())].clone()),
        }
    }

    fn random_election(seed:u64,num_ballots:usize,candidates:&[CandidateId]) -> Vec<Ballot> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        (0..num_ballots).map(|i|{
            let ranks = (0..4).map(|_|random_mark(&mut rng,candidates)).collect();
            Ballot::new(&format!("r{}",i),ranks)
        }).collect()
    }

    #[test]
    fn test_random_elections_keep_invariants() {
        let candidates = ids(&["A","B","C","D","E"]);
        for seed in 0..30 {
            let ballots = random_election(seed,25,&candidates);
            let res = count_irv(&ballots,&candidates,&format!("election{}",seed),&default_rules(),None).unwrap();
            assert_eq!(ballots.len(),res.total_ballots());
            let mut gone : BTreeSet<CandidateId> = BTreeSet::new();
            for round in &res.rounds {
                assert_eq!(ballots.len(),round.tallies.values().sum::<usize>()+round.exhausted);
                assert_eq!(round.exhausted,round.exhaustion_detail.total());
                assert!(round.continuing.iter().all(|c|!gone.contains(c)));
                assert!(round.tallies.keys().all(|c|round.continuing.contains(c)));
                if let Some(eliminated) = &round.eliminated {
                    let moved : usize = round.transfers.iter().map(|t|t.count).sum();
                    assert_eq!(round.tallies.get(eliminated).copied(),Some(moved));
                    gone.insert(eliminated.clone());
                }
            }
            assert!(!gone.contains(&res.winner));
            let again = count_irv(&ballots,&candidates,&format!("election{}",seed),&default_rules(),None).unwrap();
            assert_eq!(res,again);
        }
    }
}
