// Copyright 2021-2026 Andrew Conway.
// This file is part of ConcreteSTV.
// ConcreteSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteSTV.  If not, see <https://www.gnu.org/licenses/>.

use std::collections::BTreeMap;
use std::ops::AddAssign;
use crate::ballot_metadata::CandidateId;
use crate::distribution_of_preferences_transcript::{Transfer, TransferDestination};

/// A utility to add up the votes leaving one candidate, by where they go.
pub struct CollectTransfers<Tally> {
    by_destination : BTreeMap<TransferDestination,Tally>,
}

impl <Tally> Default for CollectTransfers<Tally> {
    fn default() -> Self { CollectTransfers{ by_destination: BTreeMap::new() } }
}

impl <Tally:AddAssign+Default> CollectTransfers<Tally> {
    /// observe some votes passing by
    pub fn add(&mut self,to:TransferDestination,amount:Tally) {
        *self.by_destination.entry(to).or_default()+=amount;
    }

    /// clear, and return the transfers from `from`: continuing candidates in id order, then exhausted.
    pub fn take(&mut self,from:&CandidateId) -> Vec<Transfer<Tally>> {
        std::mem::take(&mut self.by_destination).into_iter().map(|(to,count)|Transfer{from:from.clone(),to,count}).collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::ballot_metadata::CandidateId;
    use crate::distribution_of_preferences_transcript::TransferDestination;
    use crate::util::CollectTransfers;

    #[test]
    fn test_exhausted_goes_last() {
        let mut collect = CollectTransfers::<usize>::default();
        collect.add(TransferDestination::Exhausted,1);
        collect.add(TransferDestination::Candidate("C".into()),2);
        collect.add(TransferDestination::Candidate("B".into()),1);
        collect.add(TransferDestination::Candidate("C".into()),1);
        let transfers = collect.take(&CandidateId::from("A"));
        let summary : Vec<(String,usize)> = transfers.into_iter().map(|t|(String::from(t.to),t.count)).collect();
        assert_eq!(vec![("B".to_string(),1),("C".to_string(),3),("exhausted".to_string(),1)],summary);
        assert!(collect.take(&CandidateId::from("A")).is_empty());
    }
}
