// statsd-udp - A small fire-and-forget Statsd client for Rust
//
// Copyright 2015-2021 Nick Pillitteri
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::sample_rate::SampleRate;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Decides whether a batch of updates is written, given its sample rate.
///
/// The generator is seeded once when the sampler is created and every
/// decision takes exactly one draw from it, so two sends in quick
/// succession get independent outcomes.
pub(crate) struct Sampler {
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl Sampler {
    pub(crate) fn from_entropy() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    pub(crate) fn from_rng<R>(rng: R) -> Self
    where
        R: RngCore + Send + 'static,
    {
        Sampler {
            rng: Mutex::new(Box::new(rng)),
        }
    }

    /// Return `true` when a batch sent at `rate` should be written.
    ///
    /// Rates of one or more never touch the generator. A rate of zero is
    /// never written, even for a draw of exactly `0.0`.
    pub(crate) fn sample(&self, rate: &SampleRate) -> bool {
        if !rate.is_sampled() {
            return true;
        }
        if rate.is_never() {
            return false;
        }

        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let draw: f32 = rng.gen();
        draw <= rate.value()
    }
}

impl fmt::Debug for Sampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Sampler { rng: ... }")
    }
}
