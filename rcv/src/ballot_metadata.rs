// Copyright 2021-2026 Andrew Conway.
// This file is part of ConcreteSTV.
// ConcreteSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteSTV.  If not, see <https://www.gnu.org/licenses/>.


//! Information about the contest, such as candidates.

use serde::{Serialize,Deserialize};
use std::borrow::Borrow;
use std::fmt;

/// A candidate, referred to by a unique stable string id.
/// Serialized as a plain string, so it can be used as a key in JSON maps.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub String);

// type alias really, don't want long display
impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { f.write_str(&self.0) }
}
// type alias really, don't want long display
impl fmt::Debug for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "#{}", self.0) }
}

impl Borrow<str> for CandidateId {
    fn borrow(&self) -> &str { &self.0 }
}

impl From<&str> for CandidateId {
    fn from(s: &str) -> Self { CandidateId(s.to_string()) }
}

impl From<String> for CandidateId {
    fn from(s: String) -> Self { CandidateId(s) }
}

impl CandidateId {
    pub fn as_str(&self) -> &str { &self.0 }
}

/// information about a candidate in the contest. Created once per election setup.
#[derive(Debug,Serialize,Deserialize,Clone,PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id : CandidateId,
    pub name : String,
    /// an abbreviation used where space is short, e.g. chart axes.
    pub short_label : String,
    #[serde(default)]
    pub bio : String,
}

impl Candidate {
    /// Make a candidate where nothing is known other than the id.
    pub fn from_id(id:&str) -> Self {
        Candidate{
            id: CandidateId::from(id),
            name: id.to_string(),
            short_label: id.to_string(),
            bio: String::new(),
        }
    }
}
