use elastic_hash_table::ElasticHashTable;
use rand::Rng;

#[test]
fn scenario_create_64_layout() {
    let t = ElasticHashTable::create(64).unwrap();
    assert!(t.num_levels() >= 2);
    let stats = t.level_stats(t.num_levels());
    let sum: usize = stats.iter().map(|s| s.capacity).sum();
    assert_eq!(sum, 64);
}

#[test]
fn scenario_basic_inserts_and_iteration() {
    let mut t = ElasticHashTable::create(64).unwrap();
    t.insert(b"alpha", b"1").unwrap();
    t.insert(b"beta", b"22").unwrap();
    t.insert(b"gamma", b"333").unwrap();

    assert_eq!(t.len(), 3);
    assert_eq!(t.get(b"beta"), Some(&b"22"[..]));

    let mut seen: Vec<Vec<u8>> = t.iter().map(|(k, _)| k.to_vec()).collect();
    seen.sort();
    assert_eq!(seen, vec![b"alpha".to_vec(), b"beta".to_vec(), b"gamma".to_vec()]);
}

#[test]
fn scenario_delete_and_reinsert() {
    let mut t = ElasticHashTable::create(64).unwrap();
    t.insert(b"k", b"v").unwrap();
    assert!(t.delete(b"k"));
    assert!(!t.contains(b"k"));
    t.insert(b"k", b"w").unwrap();
    assert_eq!(t.get(b"k"), Some(&b"w"[..]));
}

#[test]
fn scenario_thousand_inserts_trigger_growth() {
    let mut t = ElasticHashTable::create(64).unwrap();
    for i in 0..1000u32 {
        t.insert(format!("key-{}", i).as_bytes(), b"v").unwrap();
    }
    assert!(t.capacity() >= 1024);
    assert_eq!(t.len(), 1000);
    for i in 0..1000u32 {
        assert!(t.contains(format!("key-{}", i).as_bytes()));
    }
}

#[test]
fn scenario_mass_delete_triggers_compaction() {
    let mut t = ElasticHashTable::create(256).unwrap();
    let keys: Vec<String> = (0..200).map(|i| format!("key-{}", i)).collect();
    for k in &keys {
        t.insert(k.as_bytes(), b"v").unwrap();
    }
    for k in keys.iter().take(199) {
        assert!(t.delete(k.as_bytes()));
    }
    for i in 0..200u32 {
        t.insert(format!("fresh-{}", i).as_bytes(), b"v").unwrap();
    }
    let total_tombstones: usize = t
        .level_stats(t.num_levels())
        .iter()
        .map(|s| s.tombstones)
        .sum();
    assert_eq!(total_tombstones, 0);
    assert_eq!(t.len(), 201);
}

#[test]
fn scenario_value_overwrite() {
    let mut t = ElasticHashTable::create(64).unwrap();
    t.insert(b"x", b"AAAA").unwrap();
    t.insert(b"x", b"BB").unwrap();
    assert_eq!(t.get(b"x"), Some(&b"BB"[..]));
}

#[test]
fn stress_random_insert_delete_keeps_invariants() {
    let mut rng = rand::thread_rng();
    let mut t = ElasticHashTable::create(128).unwrap();
    let mut model: std::collections::HashMap<u32, u32> = std::collections::HashMap::new();

    for _ in 0..5000 {
        let key: u32 = rng.gen_range(0, 500);
        let op: u8 = rng.gen_range(0, 3);
        let key_bytes = key.to_le_bytes();
        match op {
            0 => {
                let value: u32 = rng.gen();
                t.insert(&key_bytes, &value.to_le_bytes()).unwrap();
                model.insert(key, value);
            }
            1 => {
                let removed = t.delete(&key_bytes);
                assert_eq!(removed, model.remove(&key).is_some());
            }
            _ => {
                let found = t.get(&key_bytes);
                match model.get(&key) {
                    Some(v) => assert_eq!(found, Some(&v.to_le_bytes()[..])),
                    None => assert_eq!(found, None),
                }
            }
        }
    }

    assert_eq!(t.len(), model.len());
    for (key, value) in &model {
        assert_eq!(t.get(&key.to_le_bytes()), Some(&value.to_le_bytes()[..]));
    }

    let stats = t.level_stats(t.num_levels());
    let total_capacity: usize = stats.iter().map(|s| s.capacity).sum();
    assert_eq!(total_capacity, t.capacity());
    for s in &stats {
        assert!(s.count + s.tombstones <= s.capacity);
    }
}
