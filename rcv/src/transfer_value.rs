// Copyright 2021-2026 Andrew Conway.
// This file is part of ConcreteSTV.
// ConcreteSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteSTV.  If not, see <https://www.gnu.org/licenses/>.

use serde::Serialize;
use serde::Deserialize;
use std::fmt::{Display, Formatter};

/// The fraction of its current weight that a ballot keeps when it passes on from an elected candidate.
/// Always in `[0,1]`.
#[derive(Clone,Copy,Debug,Serialize,Deserialize,PartialEq,PartialOrd)]
#[serde(transparent)]
pub struct TransferValue(pub(crate) f64);

impl TransferValue {
    pub fn one() -> Self { TransferValue(1.0) }
    /// surplus/votes. Zero if there were no votes.
    pub fn from_surplus(surplus:f64,votes:f64) -> Self {
        if votes>0.0 { TransferValue((surplus/votes).clamp(0.0,1.0)) } else { TransferValue(0.0) }
    }
    pub fn apply(&self,weight:f64) -> f64 { weight*self.0 }
    pub fn value(&self) -> f64 { self.0 }
}

impl Display for TransferValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f,"{}",self.0)
    }
}
