use seqflow::combiners::{Partitioned, SummaryStatistics};
use seqflow::*;

fn seq() -> EvalOptions {
    EvalOptions::sequential()
}

fn config_error(err: &anyhow::Error) -> Option<&ConfigError> {
    err.downcast_ref::<ConfigError>()
}

fn text_len(v: &Value) -> usize {
    v.as_text().map_or(0, |s| s.chars().count())
}

#[test]
fn filter_long_words_into_a_list() -> anyhow::Result<()> {
    let out = evaluate(
        values(["casa", "coche", "árbol", "libro", "sol"]),
        vec![Stage::filter(|w| text_len(w) > 3)],
        Terminal::to_list(),
        &seq(),
    )?;
    assert_eq!(out, Outcome::List(values(["casa", "coche", "árbol", "libro"])));
    Ok(())
}

#[test]
fn partition_evens_from_odds() -> anyhow::Result<()> {
    let out = evaluate(
        values(1..=10),
        vec![],
        Terminal::partition_by(|n| n.as_int().is_some_and(|n| n % 2 == 0)),
        &seq(),
    )?;
    let expected = Partitioned {
        accepted: Outcome::List(values([2, 4, 6, 8, 10])),
        rejected: Outcome::List(values([1, 3, 5, 7, 9])),
    };
    assert_eq!(out.as_partitioned(), Some(&expected));
    assert_eq!(
        serde_json::to_string(&out)?,
        r#"{"true":[2,4,6,8,10],"false":[1,3,5,7,9]}"#
    );
    Ok(())
}

#[test]
fn reduce_multiplies_to_ten_factorial() -> anyhow::Result<()> {
    let out = evaluate(
        values(1..=10),
        vec![],
        Terminal::reduce(1, |a, b| a.multiply(b)),
        &seq(),
    )?;
    assert_eq!(out, Outcome::Value(Value::Int(3_628_800)));
    Ok(())
}

#[test]
fn max_of_empty_source_is_absent() -> anyhow::Result<()> {
    let out = evaluate(vec![], vec![], Terminal::Max, &seq())?;
    assert!(out.is_absent());
    assert_eq!(serde_json::to_string(&out)?, "null");

    for terminal in [
        Terminal::Min,
        Terminal::Average,
        Terminal::reduce_optional(|a, b| a.add(b)),
    ] {
        assert!(evaluate(vec![], vec![], terminal, &seq())?.is_absent());
    }
    Ok(())
}

#[test]
fn distinct_keeps_first_seen_order() -> anyhow::Result<()> {
    let out = evaluate(
        values(["casa", "coche", "casa", "árbol"]),
        vec![Stage::distinct()],
        Terminal::to_list(),
        &seq(),
    )?;
    assert_eq!(out.as_list(), Some(&values(["casa", "coche", "árbol"])[..]));
    Ok(())
}

#[test]
fn numeric_terminals() -> anyhow::Result<()> {
    let nums = || values(1..=10);
    assert_eq!(evaluate(nums(), vec![], Terminal::Count, &seq())?.as_count(), Some(10));
    assert_eq!(
        evaluate(nums(), vec![], Terminal::Sum, &seq())?,
        Outcome::Value(Value::Int(55))
    );
    assert_eq!(
        evaluate(nums(), vec![], Terminal::Average, &seq())?,
        Outcome::Value(Value::float(5.5))
    );
    assert_eq!(
        evaluate(nums(), vec![], Terminal::Min, &seq())?.as_value(),
        Some(&Value::Int(1))
    );
    assert_eq!(
        evaluate(vec![], vec![], Terminal::Sum, &seq())?,
        Outcome::Value(Value::Int(0))
    );

    let mixed = vec![Value::Int(1), Value::float(0.5)];
    assert_eq!(
        evaluate(mixed, vec![], Terminal::Sum, &seq())?,
        Outcome::Value(Value::float(1.5))
    );
    Ok(())
}

#[test]
fn statistics_in_one_pass() -> anyhow::Result<()> {
    let out = evaluate(values([4, 1, 3, 2]), vec![], Terminal::Statistics, &seq())?;
    let expected = SummaryStatistics {
        count: 4,
        sum: Value::Int(10),
        min: Some(Value::Int(1)),
        max: Some(Value::Int(4)),
        average: Some(2.5),
    };
    assert_eq!(out.as_statistics(), Some(&expected));
    Ok(())
}

#[test]
fn stage_chain_transforms_sorts_and_pages() -> anyhow::Result<()> {
    let out = evaluate(
        vec![Value::from(vec![5, 3]), Value::from(vec![9]), Value::from(vec![1, 7])],
        vec![
            Stage::flatten_map(|v| v.as_list().map(<[Value]>::to_vec).unwrap_or_default()),
            Stage::transform(|v| Value::Int(v.as_int().unwrap_or_default() * 10)),
            Stage::sort(),
            Stage::skip(1),
            Stage::limit(3),
        ],
        Terminal::to_list(),
        &seq(),
    )?;
    assert_eq!(out, Outcome::List(values([30, 50, 70])));

    let desc = evaluate(
        values(["b", "c", "a"]),
        vec![Stage::sort_by(|a, b| b.natural_cmp(a).unwrap_or(std::cmp::Ordering::Equal))],
        Terminal::join_with(",", "<", ">"),
        &seq(),
    )?;
    assert_eq!(desc.as_text(), Some("<c,b,a>"));
    Ok(())
}

#[test]
fn group_by_with_and_without_downstream() -> anyhow::Result<()> {
    let words = || values(["sol", "casa", "mar", "coche", "luz"]);

    let lists = evaluate(
        words(),
        vec![],
        Terminal::group_by(|w| Value::Int(text_len(w) as i64)),
        &seq(),
    )?;
    let groups = lists
        .as_groups()
        .ok_or_else(|| anyhow::anyhow!("expected groups"))?;
    assert_eq!(
        groups.keys().cloned().collect::<Vec<_>>(),
        values([3, 4, 5])
    );
    assert_eq!(
        groups.get(&Value::Int(3)),
        Some(&Outcome::List(values(["sol", "mar", "luz"])))
    );

    let counts = evaluate(
        words(),
        vec![],
        Terminal::group_by_with(|w| Value::Int(text_len(w) as i64), Terminal::Count),
        &seq(),
    )?;
    assert_eq!(serde_json::to_string(&counts)?, r#"{"3":3,"4":1,"5":1}"#);
    Ok(())
}

#[test]
fn map_container_policies() -> anyhow::Result<()> {
    let pairs = || {
        vec![
            Value::pair("a", 1),
            Value::pair("b", 2),
            Value::pair("a", 3),
        ]
    };

    let last = evaluate(pairs(), vec![], Terminal::to_map(), &seq())?;
    let first = evaluate(pairs(), vec![], Terminal::to_map_with(MergePolicy::KeepFirst), &seq())?;
    let merged = evaluate(
        pairs(),
        vec![],
        Terminal::to_map_with(MergePolicy::Merge(std::sync::Arc::new(|a: &Value, b: &Value| a.add(b)))),
        &seq(),
    )?;

    let get = |o: &Outcome| o.as_map().and_then(|m| m.get(&Value::from("a")).cloned());
    assert_eq!(get(&last), Some(Value::Int(3)));
    assert_eq!(get(&first), Some(Value::Int(1)));
    assert_eq!(get(&merged), Some(Value::Int(4)));
    assert_eq!(
        last.as_map().map(|m| m.keys().cloned().collect::<Vec<_>>()),
        Some(values(["a", "b"]))
    );
    Ok(())
}

#[test]
fn set_container_drops_duplicates() -> anyhow::Result<()> {
    let out = evaluate(values([1, 2, 1, 3, 2]), vec![], Terminal::to_set(), &seq())?;
    let set = out.as_set().ok_or_else(|| anyhow::anyhow!("expected a set"))?;
    assert_eq!(set.len(), 3);
    assert!(set.contains(&Value::Int(3)));
    Ok(())
}

#[test]
fn matches() -> anyhow::Result<()> {
    let big = |v: &Value| v.as_int().is_some_and(|n| n > 8);
    let nums = || values(1..=10);
    assert_eq!(evaluate(nums(), vec![], Terminal::any_match(big), &seq())?.as_bool(), Some(true));
    assert_eq!(evaluate(nums(), vec![], Terminal::all_match(big), &seq())?.as_bool(), Some(false));
    assert_eq!(evaluate(nums(), vec![], Terminal::none_match(big), &seq())?.as_bool(), Some(false));
    assert_eq!(evaluate(vec![], vec![], Terminal::all_match(big), &seq())?.as_bool(), Some(true));
    Ok(())
}

#[test]
fn negative_counts_are_rejected_before_running() {
    let err = evaluate(values([1, 2]), vec![Stage::limit(-1)], Terminal::Count, &seq())
        .expect_err("negative limit");
    assert_eq!(
        config_error(&err),
        Some(&ConfigError::NegativeCount {
            stage: "limit",
            count: -1
        })
    );

    let err = evaluate(values([1, 2]), vec![Stage::skip(-3)], Terminal::Count, &seq())
        .expect_err("negative skip");
    assert!(matches!(
        config_error(&err),
        Some(ConfigError::NegativeCount { stage: "skip", .. })
    ));
}

#[test]
fn element_type_errors_abort_the_evaluation() {
    let sum_text = evaluate(values(["a", "b"]), vec![], Terminal::Sum, &seq()).expect_err("sum");
    assert_eq!(
        config_error(&sum_text),
        Some(&ConfigError::NotNumeric {
            op: "sum",
            found: ValueKind::Text
        })
    );
    assert_eq!(
        sum_text.to_string(),
        "sum requires numeric elements, found text"
    );

    let product = evaluate(
        values(["x"]),
        vec![],
        Terminal::reduce(1, |a, b| a.multiply(b)),
        &seq(),
    )
    .expect_err("multiply text");
    assert!(matches!(
        config_error(&product),
        Some(ConfigError::NotNumeric { op: "multiply", .. })
    ));

    let not_pairs = evaluate(values([1]), vec![], Terminal::to_map(), &seq()).expect_err("map");
    assert_eq!(
        config_error(&not_pairs),
        Some(&ConfigError::NotKeyValue {
            found: ValueKind::Int
        })
    );

    let nested = evaluate(
        vec![Value::from(vec![1, 2])],
        vec![],
        Terminal::join(","),
        &seq(),
    )
    .expect_err("join a list");
    assert!(matches!(config_error(&nested), Some(ConfigError::NotText { .. })));

    let mixed_sort = evaluate(
        vec![Value::Int(1), Value::from("a")],
        vec![Stage::sort()],
        Terminal::to_list(),
        &seq(),
    )
    .expect_err("mixed sort");
    assert!(matches!(
        config_error(&mixed_sort),
        Some(ConfigError::NotComparable { op: "sort", .. })
    ));

    let mixed_max =
        evaluate(vec![Value::Int(1), Value::from("a")], vec![], Terminal::Max, &seq())
            .expect_err("mixed max");
    assert!(matches!(
        config_error(&mixed_max),
        Some(ConfigError::NotComparable { op: "max", .. })
    ));
}

#[test]
fn rejected_duplicate_key_discards_the_map() {
    let err = evaluate(
        vec![Value::pair("a", 1), Value::pair("a", 2)],
        vec![],
        Terminal::to_map_with(MergePolicy::Reject),
        &seq(),
    )
    .expect_err("duplicate key");
    assert_eq!(
        config_error(&err),
        Some(&ConfigError::DuplicateKey { key: "a".into() })
    );
}

#[test]
fn order_dependent_terminals_refuse_parallel_mode() {
    let par = EvalOptions::parallel().with_partitions(4);
    for (terminal, name) in [
        (Terminal::join(","), "join"),
        (Terminal::to_list(), "to_list"),
        (Terminal::to_map(), "to_map"),
        (Terminal::group_by(Value::clone), "to_list"),
    ] {
        let err = evaluate(values([1, 2, 3]), vec![], terminal, &par).expect_err(name);
        assert_eq!(
            config_error(&err),
            Some(&ConfigError::NotParallelizable { terminal: name })
        );
    }
}

#[test]
fn parallel_mode_matches_sequential_for_associative_terminals() -> anyhow::Result<()> {
    let par = EvalOptions::parallel().with_partitions(5).with_threads(3);
    let stages = || {
        vec![
            Stage::filter(|v| v.as_int().is_some_and(|n| n % 3 != 0)),
            Stage::transform(|v| Value::Int(v.as_int().unwrap_or_default() * 2)),
        ]
    };
    for terminal in [
        Terminal::Count,
        Terminal::Sum,
        Terminal::Min,
        Terminal::Max,
        Terminal::Average,
        Terminal::Statistics,
        Terminal::reduce(0, |a, b| a.add(b)),
        Terminal::group_by_with(|v| Value::Int(v.as_int().unwrap_or_default() % 4), Terminal::Sum),
    ] {
        let name = terminal.name();
        let s = evaluate(values(1..=100), stages(), terminal.clone(), &seq())?;
        let p = evaluate(values(1..=100), stages(), terminal, &par)?;
        assert_eq!(s, p, "{name} diverged under parallel evaluation");
    }
    Ok(())
}

#[test]
fn mixed_sum_is_the_same_for_every_chunking() -> anyhow::Result<()> {
    let source = || vec![Value::float(0.5), Value::Int(0), Value::Int(i64::MAX), Value::Int(1)];
    let expected = Outcome::Value(Value::float(i64::MIN as f64 + 0.5));

    assert_eq!(evaluate(source(), vec![], Terminal::Sum, &seq())?, expected);
    for partitions in 1..=4 {
        let par = EvalOptions::parallel().with_partitions(partitions);
        assert_eq!(
            evaluate(source(), vec![], Terminal::Sum, &par)?,
            expected,
            "sum diverged with {partitions} partitions"
        );
        let stats = evaluate(source(), vec![], Terminal::Statistics, &par)?;
        assert_eq!(
            stats.as_statistics().map(|s| s.sum.clone()),
            expected.as_value().cloned()
        );
    }
    Ok(())
}

#[test]
fn sorted_grouping_uses_natural_key_order() -> anyhow::Result<()> {
    let words = || values(["coche", "sol", "casa", "mar", "luz"]);
    let len_key = |w: &Value| Value::Int(text_len(w) as i64);

    let lists = evaluate(words(), vec![], Terminal::group_by_sorted(len_key), &seq())?;
    assert_eq!(
        serde_json::to_string(&lists)?,
        r#"{"3":["sol","mar","luz"],"4":["casa"],"5":["coche"]}"#
    );

    let counts = evaluate(
        words(),
        vec![],
        Terminal::group_by_sorted_with(len_key, Terminal::Count),
        &EvalOptions::parallel().with_partitions(3),
    )?;
    assert_eq!(serde_json::to_string(&counts)?, r#"{"3":3,"4":1,"5":1}"#);

    let err = evaluate(
        values(["a", "bb"]),
        vec![],
        Terminal::group_by_sorted(|w| {
            if text_len(w) == 1 { Value::Int(1) } else { w.clone() }
        }),
        &seq(),
    )
    .expect_err("int and text keys cannot be sorted together");
    assert!(matches!(
        config_error(&err),
        Some(ConfigError::NotComparable { op: "group_by_sorted", .. })
    ));
    Ok(())
}

#[test]
fn match_terminals_work_as_grouping_downstreams() -> anyhow::Result<()> {
    let parity = |v: &Value| Value::Bool(v.as_int().is_some_and(|n| n % 2 == 0));
    let above_nine = |v: &Value| v.as_int().is_some_and(|n| n > 9);

    let out = evaluate(
        values(1..=10),
        vec![],
        Terminal::group_by_with(parity, Terminal::any_match(above_nine)),
        &seq(),
    )?;
    assert_eq!(serde_json::to_string(&out)?, r#"{"false":false,"true":true}"#);

    // Each group agrees with the short-circuiting top-level terminal.
    let groups = out.as_groups().ok_or_else(|| anyhow::anyhow!("expected groups"))?;
    for (key, nested) in groups.iter() {
        let key = key.clone();
        let direct = evaluate(
            values(1..=10),
            vec![Stage::filter(move |v| parity(v) == key)],
            Terminal::any_match(above_nine),
            &seq(),
        )?;
        assert_eq!(&direct, nested);
    }

    let sides = evaluate(
        values(1..=10),
        vec![],
        Terminal::partition_by_with(|v| v.as_int().is_some_and(|n| n > 5), Terminal::all_match(above_nine)),
        &EvalOptions::parallel().with_partitions(4),
    )?;
    assert_eq!(serde_json::to_string(&sides)?, r#"{"true":false,"false":false}"#);
    Ok(())
}
