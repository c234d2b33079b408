use finger_list::{recommended_fingers, IndexedList, ListError, MIN_BATCH_SIZE};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn remove_middle_range_of_hundred() {
    init_logger();
    let mut list: IndexedList<_> = (1..=100).collect();
    // touch a few indices so that fingers sit inside the removed range
    for i in [35, 50, 65] {
        assert_eq!(list.get_mut(i).copied(), Some(i as i32 + 1));
    }
    list.remove_range(29..70).unwrap();

    let expected: Vec<_> = (1..=29).chain(71..=100).collect();
    assert_eq!(list.to_vec(), expected);
    assert_eq!(list.len(), 59);
    assert_eq!(list.finger_count(), recommended_fingers(59));
    list.check_invariants().unwrap();
}

#[test]
fn small_list_keeps_policy_count() {
    let mut list = IndexedList::new();
    list.insert(0, 0).unwrap();
    assert_eq!(list.finger_count(), 1);
    list.push_back(1);
    list.push_back(2);
    assert_eq!(list.to_vec(), vec![0, 1, 2]);
    assert_eq!(list.finger_count(), recommended_fingers(3));
    assert_eq!(list.finger_count(), 2);
    list.check_invariants().unwrap();
}

#[test]
fn clearing_a_view_removes_its_range() {
    let mut list: IndexedList<_> = (0..50).collect();
    {
        let mut view = list.sub_list(10..20).unwrap();
        assert_eq!(view.len(), 10);
        view.clear().unwrap();
        assert!(view.is_empty());
    }
    let expected: Vec<_> = (0..10).chain(20..50).collect();
    assert_eq!(list.to_vec(), expected);
    list.check_invariants().unwrap();
}

#[test]
fn random_removals_stay_healthy() {
    init_logger();
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut list: IndexedList<_> = (0..1000).collect();
    let mut model: Vec<_> = (0..1000).collect();
    let mut checks = 0;

    for step in 1..=500 {
        let index = rng.gen_range(0..model.len());
        assert_eq!(list.remove(index), Ok(model.remove(index)));
        if step % 10 == 0 {
            list.check_invariants().unwrap();
            let sample = rng.gen_range(0..model.len());
            assert_eq!(list.get(sample), Some(&model[sample]));
            checks += 1;
        }
    }

    assert_eq!(checks, 50);
    assert_eq!(list.len(), 500);
    assert_eq!(list.to_vec(), model);
}

#[test]
fn cursor_insert_then_walk_to_end() {
    let mut list: IndexedList<_> = (0..20).collect();
    let mut earlier = list.cursor_front();
    let mut cursor = list.cursor_front();

    let mut visited = 0;
    for _ in 0..10 {
        assert!(cursor.next(&list).unwrap().is_some());
        visited += 1;
    }
    cursor.insert(&mut list, -1).unwrap();
    while cursor.next(&list).unwrap().is_some() {
        visited += 1;
    }

    assert_eq!(visited + 1, list.len());
    assert_eq!(list.get(10), Some(&-1));
    assert_eq!(cursor.has_next(&list), Ok(false));

    assert!(matches!(
        earlier.next(&list),
        Err(ListError::Conflict { .. })
    ));
    list.check_invariants().unwrap();
}

#[test]
fn splitter_batches_sum_across_threads() {
    let list: IndexedList<u64> = (0..10_000).collect();
    let mut batches = vec![list.splitter()];
    while let Some(prefix) = batches.last_mut().and_then(|s| s.try_split()) {
        batches.insert(batches.len() - 1, prefix);
    }
    assert!(batches.len() > 1);
    assert!(batches.iter().all(|b| b.len() >= MIN_BATCH_SIZE));

    let total: u64 = std::thread::scope(|scope| {
        let handles: Vec<_> = batches
            .into_iter()
            .map(|batch| scope.spawn(move || batch.sum::<u64>()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).sum()
    });
    assert_eq!(total, (0..10_000).sum());
}

#[test]
fn long_mixed_workload() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut list = IndexedList::new();
    let mut model = Vec::new();

    for _ in 0..5_000 {
        let len = model.len();
        match rng.gen_range(0..6) {
            0 | 1 => {
                let at = rng.gen_range(0..=len);
                let v: u32 = rng.gen();
                list.insert(at, v).unwrap();
                model.insert(at, v);
            }
            2 if len > 0 => {
                let at = rng.gen_range(0..len);
                assert_eq!(list.remove(at), Ok(model.remove(at)));
            }
            3 if len > 0 => {
                let at = rng.gen_range(0..len);
                assert_eq!(list.get(at), Some(&model[at]));
            }
            4 => {
                let from = rng.gen_range(0..=len);
                let to = (from + rng.gen_range(0..20)).min(len);
                list.remove_range(from..to).unwrap();
                model.drain(from..to);
            }
            _ => {
                let at = rng.gen_range(0..=len);
                let run: Vec<u32> = (0..rng.gen_range(0..30)).map(|_| rng.gen()).collect();
                list.insert_all(at, run.iter().copied()).unwrap();
                model.splice(at..at, run);
            }
        }
    }

    assert_eq!(list.to_vec(), model);
    list.check_invariants().unwrap();
}
