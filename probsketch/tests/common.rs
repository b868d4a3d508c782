// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use rand::Rng;
use rand::SeedableRng;
use rand::distr::Alphanumeric;
use rand::rngs::StdRng;

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Generates `count` alphanumeric strings of `len` characters.
#[allow(dead_code)]
pub fn random_strings(rng: &mut StdRng, count: usize, len: usize) -> Vec<String> {
    (0..count)
        .map(|_| {
            (0..len)
                .map(|_| char::from(rng.sample(Alphanumeric)))
                .collect()
        })
        .collect()
}

/// Fraction of `probes` that `contains` reports as present.
#[allow(dead_code)] // not every test binary probes a filter
pub fn positive_rate<F: Fn(&str) -> bool>(probes: &[String], contains: F) -> f64 {
    let positives = probes.iter().filter(|p| contains(p)).count();
    positives as f64 / probes.len() as f64
}
