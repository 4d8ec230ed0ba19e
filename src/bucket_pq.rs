//! A priority queue over small non-negative integer keys, with randomized
//! tie-breaking among equal-key elements.
//!
//! Ported from `original_source`'s `Bucket_PQ.hpp`. Keys are bucketed by
//! value (counting-sort style) rather than kept in a heap, which makes
//! `pop`/`erase`/`decrease_key_by_one` all O(1) as long as keys stay within
//! a small range — exactly the min-degree construction the packing lower
//! bound needs. Elements within the same bucket are unordered; `pop` picks
//! uniformly among the current minimum bucket so repeated runs over the
//! same instance still explore different greedy orders when seeded
//! differently (and the same order when seeded the same, which is what
//! makes [`crate::lb`]'s reproducibility property possible).

use rand::Rng;
use rand_chacha::ChaCha8Rng;

const INVALID_POS: usize = usize::MAX;

pub struct BucketPQ {
    gen: ChaCha8Rng,
    pos: Vec<usize>,
    elements: Vec<(usize, usize)>,
    bucket_begin: Vec<usize>,
    bucket_end: Vec<usize>,
    max_val: usize,
    min_val: usize,
    buckets_built: bool,
}

impl BucketPQ {
    pub fn new(size: usize, seed: u64) -> Self {
        BucketPQ {
            gen: crate::rng::rng_from_seed(seed),
            pos: vec![INVALID_POS; size],
            elements: Vec::new(),
            bucket_begin: Vec::new(),
            bucket_end: Vec::new(),
            max_val: 0,
            min_val: 0,
            buckets_built: false,
        }
    }

    pub fn insert(&mut self, el: usize, val: usize) {
        assert!(!self.buckets_built, "elements cannot be inserted after building");
        assert_eq!(self.pos[el], INVALID_POS, "element already inserted");
        self.pos[el] = self.elements.len();
        self.elements.push((el, val));
        if val > self.max_val {
            self.max_val = val;
        }
    }

    pub fn build(&mut self) {
        assert!(!self.buckets_built, "buckets already built");
        assert!(!self.elements.is_empty(), "cannot build an empty queue");

        self.bucket_end = vec![0; self.max_val + 1];
        for &(_, val) in &self.elements {
            self.bucket_end[val] += 1;
        }
        for i in 1..self.bucket_end.len() {
            self.bucket_end[i] += self.bucket_end[i - 1];
        }
        self.bucket_begin = self.bucket_end.clone();

        let tmp = std::mem::take(&mut self.elements);
        self.elements = vec![(0, 0); tmp.len()];

        for el in tmp {
            self.bucket_begin[el.1] -= 1;
            let p = self.bucket_begin[el.1];
            self.elements[p] = el;
            self.pos[el.0] = p;
        }

        self.min_val = self.elements[0].1;
        self.buckets_built = true;
    }

    pub fn pop(&mut self) -> (usize, usize) {
        assert!(self.buckets_built, "buckets must be built first");
        debug_assert!(self.bucket_begin[self.min_val] < self.bucket_end[self.min_val]);

        let i = self
            .gen
            .gen_range(self.bucket_begin[self.min_val]..self.bucket_end[self.min_val]);
        let result = self.elements[i];
        debug_assert_eq!(result.1, self.min_val);
        self.elements[i] = self.elements[self.bucket_begin[self.min_val]];
        self.pos[self.elements[i].0] = i;
        self.pos[result.0] = INVALID_POS;

        self.bucket_begin[self.min_val] += 1;
        self.advance_min_val();

        result
    }

    pub fn erase(&mut self, el: usize) {
        assert!(self.buckets_built, "buckets must be built first");
        let i = self.pos[el];
        assert_ne!(i, INVALID_POS, "element does not exist");
        let val = self.elements[i].1;
        debug_assert!(self.bucket_begin[val] <= i && i < self.bucket_end[val]);

        self.elements[i] = self.elements[self.bucket_begin[val]];
        self.pos[self.elements[i].0] = i;
        self.pos[el] = INVALID_POS;
        self.bucket_begin[val] += 1;

        self.advance_min_val();
    }

    pub fn decrease_key_by_one(&mut self, el: usize) {
        assert!(self.buckets_built, "buckets must be built first");
        let i = self.pos[el];
        assert_ne!(i, INVALID_POS, "element does not exist");
        let val = self.elements[i].1;
        assert!(val > 0, "cannot decrease below zero");
        let new_val = val - 1;
        debug_assert!(self.bucket_begin[val] <= i && i < self.bucket_end[val]);

        let j = self.bucket_begin[val];
        self.elements[i] = self.elements[j];
        self.pos[self.elements[i].0] = i;
        self.bucket_begin[val] += 1;

        let k = self.bucket_end[new_val];
        self.elements[k] = (el, new_val);
        self.pos[el] = k;
        self.bucket_end[new_val] += 1;

        if val == self.min_val {
            self.min_val -= 1;
        }
    }

    pub fn contains(&self, el: usize) -> bool {
        self.pos[el] != INVALID_POS
    }

    pub fn empty(&self) -> bool {
        if !self.buckets_built {
            return self.elements.is_empty();
        }
        self.bucket_begin[self.min_val] == self.bucket_end[self.min_val]
    }

    pub fn clear(&mut self) {
        self.pos.iter_mut().for_each(|p| *p = INVALID_POS);
        self.elements.clear();
        self.bucket_begin.clear();
        self.bucket_end.clear();
        self.max_val = 0;
        self.min_val = 0;
        self.buckets_built = false;
    }

    fn advance_min_val(&mut self) {
        while self.bucket_begin[self.min_val] == self.bucket_end[self.min_val] && self.min_val < self.max_val {
            self.min_val += 1;
        }
    }
}
