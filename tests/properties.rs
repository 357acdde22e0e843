use proptest::prelude::*;
use seqflow::testing::assert_collections_unordered_equal;
use seqflow::*;

fn run_list(source: Vec<Value>, stages: Vec<Stage>) -> Vec<Value> {
    match evaluate(source, stages, Terminal::to_list(), &EvalOptions::sequential()) {
        Ok(Outcome::List(items)) => items,
        other => panic!("expected a list, got {other:?}"),
    }
}

/// Integers near the wrap-around point, small integers and exact halves.
fn mixed_number() -> impl Strategy<Value = Value> {
    prop_oneof![
        (i64::MAX - 1_000..=i64::MAX).prop_map(Value::Int),
        (-1_000i64..1_000).prop_map(Value::Int),
        (-64i32..64).prop_map(|k| Value::float(f64::from(k) * 0.5)),
    ]
}

proptest! {
    #[test]
    fn count_matches_stagewise_definition(src in prop::collection::vec(-50i64..50, 0..200)) {
        let p = Pipeline::default();
        let counted = from_vec(&p, src.clone())
            .filter(|n: &i64| n % 3 != 0)
            .flat_map(|n: &i64| vec![*n; usize::try_from(n.rem_euclid(3)).unwrap_or(0)])
            .map(|n: &i64| n * 2)
            .count()
            .unwrap();

        let by_hand: usize = src
            .iter()
            .filter(|n| *n % 3 != 0)
            .map(|n| usize::try_from(n.rem_euclid(3)).unwrap_or(0))
            .sum();
        prop_assert_eq!(counted, by_hand as u64);
    }

    #[test]
    fn filter_true_is_identity_and_filter_false_is_empty(src in prop::collection::vec(any::<i32>(), 0..100)) {
        let p = Pipeline::default();
        let all = from_vec(&p, src.clone()).filter(|_: &i32| true).collect().unwrap();
        prop_assert_eq!(all, src.clone());

        let none = from_vec(&p, src).filter(|_: &i32| false);
        prop_assert_eq!(none.clone().count().unwrap(), 0);
        prop_assert!(none.collect().unwrap().is_empty());
    }

    #[test]
    fn sort_is_idempotent(src in prop::collection::vec(-1_000i64..1_000, 0..100)) {
        let once = run_list(values(src.clone()), vec![Stage::sort()]);
        let twice = run_list(values(src), vec![Stage::sort(), Stage::sort()]);
        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(run_list(once.clone(), vec![Stage::sort()]), once);
    }

    #[test]
    fn skip_then_limit_length(len in 0usize..60, a in 0i64..80, b in 0i64..80) {
        let n = i64::try_from(len).unwrap();
        let out = run_list(values(0..n), vec![Stage::skip(a), Stage::limit(b)]);
        let expected = b.min(n - a).max(0);
        prop_assert_eq!(out.len() as i64, expected);
        if let Some(first) = out.first() {
            prop_assert_eq!(first, &Value::Int(a));
        }
    }

    #[test]
    fn group_by_loses_and_duplicates_nothing(src in prop::collection::vec(0i64..20, 0..120), m in 1i64..7) {
        let out = evaluate(
            values(src.clone()),
            vec![],
            Terminal::group_by(move |v| Value::Int(v.as_int().unwrap_or_default() % m)),
            &EvalOptions::sequential(),
        )
        .unwrap();
        let flattened: Vec<Value> = out
            .as_groups()
            .unwrap()
            .values()
            .flat_map(|g| g.as_list().unwrap_or_default().to_vec())
            .collect();
        assert_collections_unordered_equal(&flattened, &values(src));
    }

    #[test]
    fn partition_always_has_both_sides(src in prop::collection::vec(any::<i32>(), 0..50), t in any::<i32>()) {
        let sides = from_vec(&Pipeline::default(), src.clone())
            .partition_by(move |n: &i32| *n > t)
            .unwrap();
        prop_assert_eq!(sides.accepted.len() + sides.rejected.len(), src.len());
        let json = serde_json::to_value(&sides).unwrap();
        prop_assert!(json.get("true").is_some() && json.get("false").is_some());
    }

    #[test]
    fn parallel_sum_and_count_equal_sequential(
        src in prop::collection::vec(any::<i64>(), 0..300),
        partitions in 1usize..32,
    ) {
        let stages = || vec![
            Stage::filter(|v| v.as_int().is_some_and(|n| n % 2 == 0)),
            Stage::transform(|v| Value::Int(v.as_int().unwrap_or_default().wrapping_mul(3))),
        ];
        let par = EvalOptions::parallel().with_partitions(partitions);
        for terminal in [Terminal::Sum, Terminal::Count] {
            let s = evaluate(values(src.clone()), stages(), terminal.clone(), &EvalOptions::sequential()).unwrap();
            let p = evaluate(values(src.clone()), stages(), terminal, &par).unwrap();
            prop_assert_eq!(s, p);
        }
    }

    #[test]
    fn parallel_mixed_sums_equal_sequential(
        src in prop::collection::vec(mixed_number(), 0..300),
        partitions in 1usize..32,
    ) {
        let par = EvalOptions::parallel().with_partitions(partitions);
        for terminal in [Terminal::Sum, Terminal::Statistics] {
            let s = evaluate(src.clone(), vec![], terminal.clone(), &EvalOptions::sequential()).unwrap();
            let p = evaluate(src.clone(), vec![], terminal, &par).unwrap();
            prop_assert_eq!(s, p);
        }
    }
}
