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

mod common;

use std::collections::HashMap;

use common::positive_rate;
use common::random_strings;
use common::seeded_rng;
use googletest::assert_that;
use googletest::prelude::ge;
use googletest::prelude::le;
use probsketch::bloom::CountingBloomFilter;
use rand::Rng;

#[test]
fn test_counts_never_underestimate() {
    let mut rng = seeded_rng(11);
    let keys = random_strings(&mut rng, 300, 8);
    let mut filter = CountingBloomFilter::new(1 << 14, 4).unwrap();
    let mut exact: HashMap<&str, u32> = HashMap::new();

    for _ in 0..5000 {
        let key = keys[rng.random_range(0..keys.len())].as_str();
        filter.add(key);
        *exact.entry(key).or_default() += 1;
    }

    for (key, &count) in &exact {
        assert_that!(filter.count(*key), ge(count));
        assert!(filter.contains_at_least(*key, count).unwrap());
    }
}

#[test]
fn test_remove_restores_membership() {
    let mut rng = seeded_rng(12);
    let keys = random_strings(&mut rng, 2000, 10);
    let mut filter = CountingBloomFilter::new(1 << 15, 3).unwrap();
    for key in &keys {
        filter.add(key.as_str());
    }

    let (removed, kept) = keys.split_at(1000);
    for key in removed {
        assert!(filter.remove(key.as_str()));
    }
    assert!(kept.iter().all(|k| filter.contains(k.as_str())));

    let still_present = positive_rate(removed, |k| filter.contains(k));
    assert_that!(still_present, le(0.02));
}

#[test]
fn test_false_positive_rate() {
    let mut rng = seeded_rng(13);
    let keys = random_strings(&mut rng, 1000, 10);
    let probes = random_strings(&mut rng, 20_000, 11);
    // 2^14 counters and 7 probes for 1000 keys: (1 - e^(-7000/16384))^7 is about 0.0006.
    let mut filter = CountingBloomFilter::new(1 << 14, 7).unwrap();
    for key in &keys {
        filter.add(key.as_str());
    }
    let fpr = positive_rate(&probes, |p| filter.contains(p));
    assert_that!(fpr, le(0.005));

    filter.clear();
    assert!(keys.iter().all(|k| filter.count(k.as_str()) == 0));
}
