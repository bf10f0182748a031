
use std::sync::Arc;
use std::thread;

use querysift::{AppMeta, Record, RuleSet, Store, StoreError, Version};
use strategies::app;

#[test]
fn concurrent_adds_keep_identities_unique() {
    let store: Arc<Store<AppMeta>> = Arc::new(Store::new());

    // Eight threads race to add the same ten versions of one app.
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let mut conflicts = 0;
                for patch in 1..=10 {
                    let meta = app("App1", Version::new(0, 0, patch), "Random Inc.", "MIT");
                    match store.add(meta) {
                        Ok(()) => {}
                        Err(StoreError::DuplicateIdentity { .. }) => conflicts += 1,
                        Err(other) => panic!("unexpected error: {other}"),
                    }
                }
                conflicts
            })
        })
        .collect();

    let conflicts: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(store.len(), 10);
    assert_eq!(conflicts, 7 * 10);

    let mut keys: Vec<String> = store.records().iter().map(|a| a.key().to_string()).collect();
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), 10);
}

#[test]
fn list_while_adding() {
    let store: Arc<Store<AppMeta>> = Arc::new(Store::new());
    let rules = Arc::new(
        RuleSet::from_pairs([("title[like]", "Tool"), ("version[gt]", "0.0.5")], AppMeta::schema())
            .unwrap(),
    );

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for patch in 1..=50 {
                let title = if patch % 2 == 0 { "Tool" } else { "App" };
                store
                    .add(app(title, Version::new(0, 0, patch), "Acme", "MIT"))
                    .unwrap();
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            let rules = Arc::clone(&rules);
            thread::spawn(move || {
                for _ in 0..50 {
                    let listed = store.list(&rules).unwrap();
                    // Each snapshot is in insertion order and fully filtered.
                    assert!(listed
                        .windows(2)
                        .all(|pair| pair[0].version < pair[1].version));
                    assert!(listed
                        .iter()
                        .all(|a| a.title == "Tool" && a.version > Version::new(0, 0, 5)));
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    // Even patches above 5: 6, 8, ..., 50.
    assert_eq!(store.list(&rules).unwrap().len(), 23);
    assert_eq!(
        store.get_by_key_prefix("Tool").unwrap().version,
        Version::new(0, 0, 50)
    );
}
