use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;

use indexed_tree::{Comparator, Error, IndexedTreeMap, Pair};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

fn key_strategy() -> impl Strategy<Value = i64> {
    // Small enough to force re-binding of existing keys.
    -300i64..300i64
}

fn value_strategy() -> impl Strategy<Value = i64> {
    // Narrow so that many bindings tie under the comparator.
    0i64..64i64
}

fn ascending() -> IndexedTreeMap<&'static str, i32> {
    IndexedTreeMap::by_value()
}

// ─── Scenarios ───────────────────────────────────────────────────────────────

fn scenario_a() -> IndexedTreeMap<&'static str, i32> {
    let mut map = ascending();
    map.insert("a", 10);
    map.insert("b", 30);
    map.insert("c", 20);
    map
}

#[test]
fn ascending_by_value() {
    let map = scenario_a();
    assert_eq!(map.values().copied().collect::<Vec<_>>(), [10, 20, 30]);
    assert_eq!(map.first_key(), Some(&"a"));
    assert_eq!(map.last_key(), Some(&"b"));
}

#[test]
fn switching_to_descending() {
    let mut map = scenario_a();
    map.set_comparator(Comparator::by_value_desc());
    assert_eq!(map.values().copied().collect::<Vec<_>>(), [30, 20, 10]);
    assert_eq!(map.first_key(), Some(&"b"));
    assert_eq!(map.last_key(), Some(&"a"));
}

#[test]
fn neighbours_follow_the_comparator() {
    let mut map = scenario_a();
    assert_eq!(map.last_value_before("c"), Some(&10));
    assert_eq!(map.first_value_after("c"), Some(&30));

    map.set_ordering_fn(|a, b| b.value.cmp(a.value));
    assert_eq!(map.last_value_before("c"), Some(&30));
    assert_eq!(map.first_value_after("c"), Some(&10));
    assert_eq!(map.last_key_before("c"), Some(&"b"));
    assert_eq!(map.first_key_after("c"), Some(&"a"));
}

#[test]
fn delete_from_the_middle() {
    let mut map = IndexedTreeMap::by_value();
    map.insert(1, "apple");
    map.insert(2, "banana");
    map.insert(3, "cherry");
    map.insert(4, "date");

    assert_eq!(map.remove(&2), Some("banana"));
    assert_eq!(map.values().copied().collect::<Vec<_>>(), ["apple", "cherry", "date"]);
    assert_eq!(map.get(&2), None);
    assert_eq!(map.len(), 3);
}

// ─── Edge cases ──────────────────────────────────────────────────────────────

#[test]
fn empty_map_queries_are_absent() {
    let mut map = ascending();
    assert_eq!(map.first_key(), None);
    assert_eq!(map.last_value(), None);
    assert_eq!(map.successor_of("x"), None);
    assert_eq!(map.predecessor_of("x"), None);
    assert_eq!(map.pop_first(), None);
    assert_eq!(map.remove("x"), None);
    assert_eq!(map.iter().next(), None);
    assert_eq!(map.update("x", |v| v + 1), Err(Error::InvalidArgument));
}

#[test]
fn single_entry_has_no_neighbours() {
    let mut map = ascending();
    map.insert("only", 1);
    assert_eq!(map.first_key_value(), map.last_key_value());
    assert_eq!(map.successor_of("only"), None);
    assert_eq!(map.predecessor_of("only"), None);
}

#[test]
fn unknown_key_has_no_neighbours() {
    let map = scenario_a();
    assert_eq!(map.first_key_after("zz"), None);
    assert_eq!(map.last_value_before("zz"), None);
}

#[test]
fn ties_iterate_in_insertion_order() {
    let mut map = IndexedTreeMap::new(Comparator::new(|a: Pair<'_, char, (u8, u8)>, b: Pair<'_, char, (u8, u8)>| {
        a.value.0.cmp(&b.value.0)
    }));
    map.add_all([('a', (1, 0)), ('b', (0, 0)), ('c', (1, 1)), ('d', (0, 1)), ('e', (1, 2))]);
    assert_eq!(map.keys().collect::<String>(), "bdace");

    // A rebuild is stable: ties keep their order.
    map.rebalance_all();
    assert_eq!(map.keys().collect::<String>(), "bdace");
}

#[test]
fn rebinding_to_an_equal_value_keeps_position() {
    let mut map = IndexedTreeMap::new(Comparator::new(|a: Pair<'_, char, (u8, u8)>, b: Pair<'_, char, (u8, u8)>| {
        a.value.0.cmp(&b.value.0)
    }));
    map.add_all([('a', (1, 0)), ('b', (1, 1)), ('c', (1, 2))]);
    assert_eq!(map.insert('a', (1, 9)), Some((1, 0)));
    assert_eq!(map.keys().collect::<String>(), "abc");

    // An ordering change relocates the binding behind its new ties.
    map.insert('a', (2, 0));
    map.insert('a', (1, 0));
    assert_eq!(map.keys().collect::<String>(), "bca");
}

#[test]
fn monotonic_insertion_still_works() {
    let mut map = IndexedTreeMap::by_key();
    for i in 0..2_000u32 {
        map.insert(i, ());
    }
    assert_eq!(map.len(), 2_000);
    assert_eq!(map.first_key(), Some(&0));
    assert_eq!(map.last_key(), Some(&1_999));
    assert_eq!(map.successor_of(&1_000).map(|(k, _)| *k), Some(1_001));
    assert!(map.keys().copied().eq(0..2_000));
}

#[test]
fn same_comparator_is_a_no_op() {
    let mut map = scenario_a();
    let comparator = map.comparator().clone();
    assert!(Comparator::ptr_eq(&comparator, map.comparator()));
    map.set_comparator(comparator);
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), ["a", "c", "b"]);
}

#[test]
#[should_panic(expected = "no entry found for key")]
fn index_missing_key_panics() {
    let map = scenario_a();
    let _ = map["zz"];
}

#[test]
fn capacity_from_array_and_extend_refs() {
    let map: IndexedTreeMap<i32, i32> = IndexedTreeMap::with_capacity(8, Comparator::by_key());
    assert!(map.is_empty());
    assert!(map.capacity() >= 8);
    let _ = format!("{map:?}");

    let from_arr = IndexedTreeMap::from([(2, 10), (1, 20)]);
    let items: Vec<_> = from_arr.iter().map(|(&k, &v)| (k, v)).collect();
    assert_eq!(items, vec![(2, 10), (1, 20)]);

    let data = [(3, 30), (4, 40)];
    let mut extend_map: IndexedTreeMap<i32, i32> = IndexedTreeMap::by_value();
    extend_map.extend(data.iter().map(|(k, v)| (k, v)));
    assert_eq!(extend_map.get(&3), Some(&30));
    assert_eq!(extend_map.get(&4), Some(&40));
}

// ─── Values changing behind the map's back ───────────────────────────────────

type Shared = Rc<Cell<i32>>;

fn by_cell() -> IndexedTreeMap<u32, Shared> {
    IndexedTreeMap::new(Comparator::new(|a: Pair<'_, u32, Shared>, b: Pair<'_, u32, Shared>| {
        a.value.get().cmp(&b.value.get())
    }))
}

fn cell_values(map: &IndexedTreeMap<u32, Shared>) -> Vec<i32> {
    map.values().map(|cell| cell.get()).collect()
}

#[test]
fn rebalance_all_repairs_external_changes() {
    let mut map = by_cell();
    let cells: Vec<Shared> = (0..10).map(|i| Rc::new(Cell::new(i))).collect();
    for (key, cell) in (0..).zip(&cells) {
        map.insert(key, Rc::clone(cell));
    }

    cells[0].set(100);
    cells[5].set(-5);
    assert_eq!(cell_values(&map), [100, 1, 2, 3, 4, -5, 6, 7, 8, 9]);

    map.rebalance_all();
    assert_eq!(cell_values(&map), [-5, 1, 2, 3, 4, 6, 7, 8, 9, 100]);
    assert_eq!(map.first_key(), Some(&5));
    assert_eq!(map.last_key(), Some(&0));
}

#[test]
fn rebalance_where_repairs_only_selected_entries() {
    let mut map = by_cell();
    let cells: Vec<Shared> = (0..6).map(|i| Rc::new(Cell::new(i * 10))).collect();
    for (key, cell) in (0..).zip(&cells) {
        map.insert(key, Rc::clone(cell));
    }

    cells[1].set(55);
    assert_eq!(map.rebalance_where(|&k, _| k == 1), 1);
    assert_eq!(cell_values(&map), [0, 20, 30, 40, 50, 55]);
    assert_eq!(map.rebalance_where(|_, _| false), 0);
}

#[test]
fn update_moves_the_binding_immediately() {
    let mut map = scenario_a();
    assert_eq!(map.update("a", |v| v + 25), Ok(&35));
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), ["c", "b", "a"]);
    assert_eq!(*map.update_or_insert_with("d", |v| v * 2, || 0), 0);
    assert_eq!(map.first_key(), Some(&"d"));
}

// ─── Model comparison ────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum MapOp {
    Insert(i64, i64),
    Remove(i64),
    Get(i64),
    Update(i64, i64),
    Successor(i64),
    Predecessor(i64),
    PopFirst,
    PopLast,
}

fn map_op_strategy() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        6 => (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::Insert(k, v)),
        3 => key_strategy().prop_map(MapOp::Remove),
        2 => key_strategy().prop_map(MapOp::Get),
        2 => (key_strategy(), value_strategy()).prop_map(|(k, d)| MapOp::Update(k, d)),
        1 => key_strategy().prop_map(MapOp::Successor),
        1 => key_strategy().prop_map(MapOp::Predecessor),
        1 => Just(MapOp::PopFirst),
        1 => Just(MapOp::PopLast),
    ]
}

/// Sorted-vector stand-in for a value-ordered map with stable ties.
#[derive(Default)]
struct Model {
    entries: Vec<(i64, i64)>,
}

impl Model {
    fn position(&self, key: i64) -> Option<usize> {
        self.entries.iter().position(|&(k, _)| k == key)
    }

    fn insert(&mut self, key: i64, value: i64) -> Option<i64> {
        if let Some(i) = self.position(key) {
            let old = self.entries[i].1;
            if old == value {
                return Some(old);
            }
            self.entries.remove(i);
            self.place(key, value);
            return Some(old);
        }
        self.place(key, value);
        None
    }

    fn place(&mut self, key: i64, value: i64) {
        let at = self.entries.partition_point(|&(_, v)| v <= value);
        self.entries.insert(at, (key, value));
    }

    fn remove(&mut self, key: i64) -> Option<i64> {
        self.position(key).map(|i| self.entries.remove(i).1)
    }

    fn neighbour(&self, key: i64, forward: bool) -> Option<(i64, i64)> {
        let i = self.position(key)?;
        let j = if forward { i.checked_add(1)? } else { i.checked_sub(1)? };
        self.entries.get(j).copied()
    }
}

fn owned(entry: Option<(&i64, &i64)>) -> Option<(i64, i64)> {
    entry.map(|(&k, &v)| (k, v))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays random operations on the map and a sorted-vector model and
    /// asserts identical results and order at every step.
    #[test]
    fn map_ops_match_model(ops in proptest::collection::vec(map_op_strategy(), TEST_SIZE)) {
        let mut map: IndexedTreeMap<i64, i64> = IndexedTreeMap::by_value();
        let mut model = Model::default();

        for op in &ops {
            match *op {
                MapOp::Insert(k, v) => {
                    prop_assert_eq!(map.insert(k, v), model.insert(k, v), "insert({}, {})", k, v);
                }
                MapOp::Remove(k) => {
                    prop_assert_eq!(map.remove(&k), model.remove(k), "remove({})", k);
                }
                MapOp::Get(k) => {
                    let expected = model.position(k).map(|i| model.entries[i].1);
                    prop_assert_eq!(map.get(&k).copied(), expected, "get({})", k);
                }
                MapOp::Update(k, d) => {
                    let result = map.update(&k, |v| v + d).map(|v| *v);
                    match model.position(k) {
                        Some(i) => {
                            let new = model.entries[i].1 + d;
                            model.insert(k, new);
                            prop_assert_eq!(result, Ok(new), "update({}, +{})", k, d);
                        }
                        None => {
                            prop_assert_eq!(result, Err(Error::InvalidArgument), "update({})", k);
                        }
                    }
                }
                MapOp::Successor(k) => {
                    prop_assert_eq!(owned(map.successor_of(&k)), model.neighbour(k, true), "successor_of({})", k);
                }
                MapOp::Predecessor(k) => {
                    prop_assert_eq!(owned(map.predecessor_of(&k)), model.neighbour(k, false), "predecessor_of({})", k);
                }
                MapOp::PopFirst => {
                    let expected = (!model.entries.is_empty()).then(|| model.entries.remove(0));
                    prop_assert_eq!(map.pop_first(), expected, "pop_first");
                }
                MapOp::PopLast => {
                    prop_assert_eq!(map.pop_last(), model.entries.pop(), "pop_last");
                }
            }
            prop_assert_eq!(map.len(), model.entries.len(), "len mismatch after {:?}", op);
        }

        let items: Vec<_> = map.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&items, &model.entries);
        prop_assert_eq!(owned(map.first_key_value()), model.entries.first().copied());
        prop_assert_eq!(owned(map.last_key_value()), model.entries.last().copied());
    }

    /// Adjacent entries never compare greater, whatever the comparator.
    #[test]
    fn iteration_respects_comparator(
        entries in proptest::collection::vec((key_strategy(), value_strategy()), 0..500),
        descending in any::<bool>(),
    ) {
        let comparator = if descending { Comparator::by_value_desc() } else { Comparator::by_value() };
        let map = IndexedTreeMap::from_iter_with(entries, comparator.clone());
        let items: Vec<_> = map.iter().collect();
        for pair in items.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            prop_assert_ne!(
                comparator.compare(Pair::new(a.0, a.1), Pair::new(b.0, b.1)),
                std::cmp::Ordering::Greater
            );
        }
    }

    /// The keys reached by iteration are exactly the keys that look up.
    #[test]
    fn index_agrees_with_tree(
        inserts in proptest::collection::vec((key_strategy(), value_strategy()), 0..500),
        removals in proptest::collection::vec(key_strategy(), 0..300),
    ) {
        let mut map: IndexedTreeMap<i64, i64> = inserts.iter().copied().collect();
        let inserted: HashSet<i64> = inserts.iter().map(|&(k, _)| k).collect();
        let removed: HashSet<i64> = removals.iter().copied().collect();
        prop_assert_eq!(map.remove_all(&removals), inserted.intersection(&removed).count());

        let walked: HashSet<i64> = map.keys().copied().collect();
        prop_assert_eq!(walked.len(), map.len());
        for key in -300..300 {
            prop_assert_eq!(map.contains_key(&key), walked.contains(&key), "key {}", key);
        }
    }

    /// Re-binding never grows the map; distinct keys count once each.
    #[test]
    fn cardinality(keys in proptest::collection::hash_set(key_strategy(), 0..200), value in value_strategy()) {
        let mut map = IndexedTreeMap::by_value();
        for &k in &keys {
            map.insert(k, value);
        }
        prop_assert_eq!(map.len(), keys.len());
        for &k in &keys {
            map.insert(k, value + 1);
        }
        prop_assert_eq!(map.len(), keys.len());
    }

    /// Removing then re-inserting a key restores its value and the length.
    #[test]
    fn remove_insert_round_trip(
        entries in proptest::collection::vec((key_strategy(), value_strategy()), 1..300),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut map: IndexedTreeMap<i64, i64> = entries.iter().copied().collect();
        let len = map.len();
        let key = pick.get(&entries).0;
        let value = map.remove(&key);
        prop_assert!(value.is_some());
        prop_assert_eq!(map.len(), len - 1);
        map.insert(key, value.unwrap_or_default());
        prop_assert_eq!(map.get(&key), value.as_ref());
        prop_assert_eq!(map.len(), len);
    }

    /// There is nothing before the first key or after the last.
    #[test]
    fn boundary_navigation(entries in proptest::collection::vec((key_strategy(), value_strategy()), 1..300)) {
        let map: IndexedTreeMap<i64, i64> = entries.into_iter().collect();
        let first = *map.first_key().unwrap();
        let last = *map.last_key().unwrap();
        prop_assert_eq!(map.predecessor_of(&first), None);
        prop_assert_eq!(map.successor_of(&last), None);
    }

    /// Swapping in an equivalent comparator leaves the order unchanged.
    #[test]
    fn equivalent_comparator_keeps_order(entries in proptest::collection::vec((key_strategy(), value_strategy()), 0..300)) {
        let mut map: IndexedTreeMap<i64, i64> = entries.into_iter().collect();
        let before: Vec<_> = map.iter().map(|(&k, &v)| (k, v)).collect();
        map.set_ordering_fn(|a, b| a.value.cmp(b.value));
        let after: Vec<_> = map.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(before, after);
    }

    /// Cloned maps are independent and equal until one changes.
    #[test]
    fn clone_is_deep(entries in proptest::collection::vec((key_strategy(), value_strategy()), 1..200)) {
        let original: IndexedTreeMap<i64, i64> = entries.into_iter().collect();
        let mut copy = original.clone();
        prop_assert_eq!(&copy, &original);
        copy.pop_first();
        prop_assert_eq!(copy.len() + 1, original.len());
    }
}
