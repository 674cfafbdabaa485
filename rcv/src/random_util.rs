// Copyright 2021-2026 Andrew Conway.
// This file is part of ConcreteSTV.
// ConcreteSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteSTV.  If not, see <https://www.gnu.org/licenses/>.


//! Reproducible pseudo-random numbers for drawing lots.
//!
//! Each count owns exactly one [SeededRng]. It is deliberately not `Clone` and there is no
//! global instance, so the sequence of draws depends only on the seed and the order of calls.


use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sha2::{Digest, Sha256};

/// A deterministic stream of floats in `[0,1)` derived from a string seed.
/// ```
/// use rcv::random_util::SeededRng;
/// let mut a = SeededRng::new("election-2024");
/// let mut b = SeededRng::new("election-2024");
/// for _ in 0..10 {
///     let x = a.next_f64();
///     assert!(x>=0.0 && x<1.0);
///     assert_eq!(x,b.next_f64());
/// }
/// assert!(a.choose_index(3)<3);
/// ```
pub struct SeededRng {
    rng : ChaCha20Rng,
}

impl SeededRng {
    pub fn new(seed:&str) -> Self {
        let mut key = [0u8;32];
        key.copy_from_slice(&Sha256::digest(seed.as_bytes()));
        SeededRng{ rng: ChaCha20Rng::from_seed(key) }
    }

    /// The next value in the stream, uniform in `[0,1)`.
    pub fn next_f64(&mut self) -> f64 { self.rng.random::<f64>() }

    /// A uniform index in `0..len`. `len` must be positive.
    pub fn choose_index(&mut self,len:usize) -> usize {
        let index = (self.next_f64()*len as f64).floor() as usize;
        index.min(len.saturating_sub(1))
    }
}
