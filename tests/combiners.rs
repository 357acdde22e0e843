use seqflow::combiners::{Joining, Sum, ToList};
use seqflow::*;

#[test]
fn count_sum_and_average() -> anyhow::Result<()> {
    let p = Pipeline::default();
    let nums = from_iter(&p, 1..=10);
    assert_eq!(nums.clone().count()?, 10);
    assert_eq!(nums.clone().sum()?, 55);
    assert_approx_eq!(nums.average()?.unwrap_or_default(), 5.5);
    Ok(())
}

#[test]
fn empty_inputs_give_absent_results_not_errors() -> anyhow::Result<()> {
    let p = Pipeline::default();
    let empty = from_vec(&p, Vec::<i32>::new());
    assert_eq!(empty.clone().count()?, 0);
    assert_eq!(empty.clone().sum()?, 0);
    assert_eq!(empty.clone().max()?, None);
    assert_eq!(empty.clone().min()?, None);
    assert_eq!(empty.clone().average()?, None);
    assert_eq!(empty.reduce_optional(|a, b| a + b)?, None);
    Ok(())
}

#[test]
fn min_and_max_by_comparator_keep_the_first_tie() -> anyhow::Result<()> {
    let p = Pipeline::default();
    let words = from_vec(&p, vec!["sol", "casa", "mar", "coche", "libro"]);
    let shortest = words
        .clone()
        .min_by(|a: &&str, b: &&str| a.len().cmp(&b.len()))?;
    let longest = words.max_by(|a: &&str, b: &&str| a.len().cmp(&b.len()))?;
    assert_eq!(shortest, Some("sol"));
    assert_eq!(longest, Some("coche"));
    Ok(())
}

#[test]
fn reduce_folds_from_the_identity() -> anyhow::Result<()> {
    let p = Pipeline::default();
    let product = from_iter(&p, 1..=10i64).reduce(1, |a, b| a * b)?;
    assert_eq!(product, 3_628_800);

    let concat = from_vec(&p, vec!["a".to_string(), "b".into(), "c".into()])
        .reduce_optional(|a, b| a + &b)?;
    assert_eq!(concat.as_deref(), Some("abc"));
    Ok(())
}

#[test]
fn summarize_reports_all_statistics() -> anyhow::Result<()> {
    let p = Pipeline::default();
    let stats = from_vec(&p, vec![4.0f64, 8.0, 15.0, 16.0, 23.0, 42.0]).summarize()?;
    assert_eq!(stats.count, 6);
    assert_approx_eq!(stats.sum, 108.0);
    assert_eq!(stats.min, Some(4.0));
    assert_eq!(stats.max, Some(42.0));
    assert_approx_eq!(stats.average.unwrap_or_default(), 18.0);
    Ok(())
}

#[test]
fn join_wraps_with_prefix_and_suffix() -> anyhow::Result<()> {
    let p = Pipeline::default();
    let names = from_vec(&p, vec!["ana", "luis", "eva"]);
    assert_eq!(names.clone().join(", ", "[", "]")?, "[ana, luis, eva]");
    assert_eq!(from_vec(&p, Vec::<i32>::new()).join("-", "<", ">")?, "<>");

    let numbers = from_iter(&p, 1..=3)
        .combine_globally(Joining::new("+"))
        .collect()?;
    assert_eq!(numbers, vec!["1+2+3".to_string()]);
    Ok(())
}

#[test]
fn set_and_map_containers() -> anyhow::Result<()> {
    let p = Pipeline::default();
    let set = from_vec(&p, vec![3, 1, 3, 2, 1]).to_set()?;
    assert_eq!(set.len(), 3);
    assert!(set.contains(&2));

    let pairs = from_vec(&p, vec![("a", 1), ("b", 2), ("a", 3)]);
    let last = pairs.clone().to_map()?;
    assert_eq!(last.keys().copied().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(last.get(&"a"), Some(&3));

    let summed = pairs.to_map_with(|old, new| old + new)?;
    assert_eq!(summed.get(&"a"), Some(&4));
    assert_eq!(summed.get(&"b"), Some(&2));
    Ok(())
}

#[test]
fn matches_short_circuit_over_generators() -> anyhow::Result<()> {
    let p = Pipeline::default();
    assert!(from_generator(&p, || 1u64..).any_match(|n: &u64| *n > 1_000)?);
    assert!(!from_generator(&p, || 1u64..).all_match(|n: &u64| *n < 10)?);

    let small = from_iter(&p, 1..=5);
    assert!(small.clone().all_match(|n: &i32| *n > 0)?);
    assert!(small.clone().none_match(|n: &i32| *n > 5)?);
    assert!(!small.any_match(|n: &i32| *n == 42)?);

    let empty = from_vec(&p, Vec::<i32>::new());
    assert!(empty.clone().all_match(|_: &i32| false)?);
    assert!(empty.none_match(|_: &i32| true)?);
    Ok(())
}

#[test]
fn custom_combiners_plug_into_combine_globally() -> anyhow::Result<()> {
    let p = Pipeline::default();
    let total = from_iter(&p, 1..=4u64)
        .combine_globally(Sum::<u64>::default())
        .collect()?;
    assert_eq!(total, vec![10]);

    let listed = from_iter(&p, 1..=3)
        .combine_globally(ToList)
        .collect()?;
    assert_eq!(listed, vec![vec![1, 2, 3]]);
    Ok(())
}
