// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2026 Jonathan D.A. Jewell
#![no_main]

use libfuzzer_sys::fuzz_target;
use mapgraph::store::MapStore;
use mapgraph::types::{Connection, Point};

// Arbitrary bytes as a vertices/edges pair: loading must either fail cleanly
// or produce a store whose index agrees with its collections.
fuzz_target!(|data: (&[u8], &[u8])| {
    let (vertices, edges) = data;
    let Ok(points) = serde_json::from_slice::<Vec<Point>>(vertices) else {
        return;
    };
    let Ok(connections) = serde_json::from_slice::<Vec<Connection>>(edges) else {
        return;
    };

    let mut store = MapStore::new();
    for p in points {
        let _ = store.add_vertex(p);
    }
    for c in connections {
        let _ = store.add_edge(c);
    }
    assert!(store.check_invariants().is_ok());

    if let (Some(first), Some(last)) = (store.vertices().next(), store.vertices().last()) {
        let cost = store.shortest_path_by_distance(first.id, last.id);
        let hops = store.shortest_path_by_edge(first.id, last.id);
        if cost.is_err() {
            assert!(hops.is_empty());
        }
    }
});
