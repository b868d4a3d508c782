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

use common::positive_rate;
use common::random_strings;
use common::seeded_rng;
use googletest::assert_that;
use googletest::prelude::ge;
use googletest::prelude::le;
use probsketch::cuckoo::CuckooFilter;
use probsketch::error::ErrorKind;

/// Adds every key and returns the ones that were actually inserted.
fn add_all<'a>(filter: &mut CuckooFilter, keys: &'a [String]) -> Vec<&'a str> {
    keys.iter()
        .map(String::as_str)
        .filter(|key| filter.add(*key).unwrap())
        .collect()
}

#[test]
fn test_capacity_16_lifecycle() {
    let mut filter = CuckooFilter::new(16).unwrap();
    assert!(filter.add("test").unwrap());
    assert_eq!(filter.size(), 1);
    assert!(!filter.add("test").unwrap());
    assert_eq!(filter.size(), 1);
    assert!(filter.remove("test"));
    assert!(!filter.contains("test"));
    assert_eq!(filter.size(), 0);
}

#[test]
fn test_no_false_negatives() {
    let keys = random_strings(&mut seeded_rng(21), 4096, 16);
    let mut filter = CuckooFilter::new(1024).unwrap();
    let inserted = add_all(&mut filter, &keys);

    assert_eq!(filter.size(), inserted.len() as u64);
    // Only fingerprint collisions are reported as duplicates.
    assert_that!(inserted.len(), ge(keys.len() * 97 / 100));
    assert!(keys.iter().all(|k| filter.contains(k.as_str())));
}

#[test]
fn test_false_positive_rate() {
    let mut rng = seeded_rng(22);
    let keys = random_strings(&mut rng, 2048, 16);
    let probes = random_strings(&mut rng, 20_000, 17);
    let mut filter = CuckooFilter::new(1024).unwrap();
    add_all(&mut filter, &keys);

    let fpr = positive_rate(&probes, |p| filter.contains(p));
    assert_that!(fpr, le(0.03));
}

#[test]
fn test_remove_keeps_other_keys() {
    let keys = random_strings(&mut seeded_rng(23), 2000, 12);
    let mut filter = CuckooFilter::new(512).unwrap();
    let inserted = add_all(&mut filter, &keys);

    let (removed, kept) = inserted.split_at(inserted.len() / 2);
    for key in removed {
        assert!(filter.remove(*key), "failed to remove {key}");
    }
    assert_eq!(filter.size(), kept.len() as u64);
    assert!(kept.iter().all(|k| filter.contains(*k)));

    let removed: Vec<String> = removed.iter().map(|k| k.to_string()).collect();
    let still_present = positive_rate(&removed, |k| filter.contains(k));
    assert_that!(still_present, le(0.05));
}

#[test]
fn test_exhaustion_leaves_filter_intact() {
    let keys = random_strings(&mut seeded_rng(24), 10_000, 12);
    let mut filter = CuckooFilter::new(16).unwrap();
    let mut inserted = Vec::new();
    let mut rejected = None;
    for key in &keys {
        match filter.add(key.as_str()) {
            Ok(true) => inserted.push(key.as_str()),
            Ok(false) => {}
            Err(err) => {
                assert_eq!(err.kind(), ErrorKind::CapacityExhausted);
                rejected = Some(key.as_str());
                break;
            }
        }
    }

    let rejected = rejected.expect("128 slots cannot hold 10000 keys");
    assert_that!(filter.load_factor(), ge(0.7));
    assert_eq!(filter.size(), inserted.len() as u64);
    assert!(inserted.iter().all(|k| filter.contains(*k)));
    assert!(!filter.contains(rejected));

    assert!(filter.remove(inserted[0]));
    assert!(filter.contains(inserted[1]));
}
