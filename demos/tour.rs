//! A walk through the stream and collector operations.
//!
//! Run with `RUST_LOG=seqflow=debug cargo run --example tour` to see plans,
//! chunking and `inspect` output.

use anyhow::Result;
use seqflow::combiners::{CollectingAndThen, Count, GroupingBy, Joining, Mapping, ToList};
use seqflow::*;
use serde::Serialize;
use std::cmp::Reverse;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn show(label: &str, value: &impl Serialize) -> Result<()> {
    println!("  {label}: {}", serde_json::to_string(value)?);
    Ok(())
}

fn section(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(title.chars().count()));
}

fn text_len(v: &Value) -> i64 {
    v.as_text().map_or(0, |s| s.chars().count() as i64)
}

fn basics() -> Result<()> {
    section("1. Basic operations");
    let words = || values(["casa", "coche", "árbol", "libro", "sol"]);
    let seq = EvalOptions::sequential();

    show("count", &evaluate(words(), vec![], Terminal::Count, &seq)?)?;
    show(
        "distinct",
        &evaluate(
            values(["casa", "coche", "casa", "árbol", "coche"]),
            vec![Stage::distinct()],
            Terminal::to_list(),
            &seq,
        )?,
    )?;
    show(
        "any longer than 4",
        &evaluate(words(), vec![], Terminal::any_match(|w| text_len(w) > 4), &seq)?,
    )?;
    show(
        "all at most 4",
        &evaluate(words(), vec![], Terminal::all_match(|w| text_len(w) <= 4), &seq)?,
    )?;
    show(
        "none empty",
        &evaluate(words(), vec![], Terminal::none_match(|w| text_len(w) == 0), &seq)?,
    )
}

fn filtering() -> Result<()> {
    section("2. Filtering and transformation");
    let p = Pipeline::default();
    let nums = from_iter(&p, 1..=10);

    show("evens", &nums.clone().filter(|n: &i32| n % 2 == 0).collect()?)?;
    show("squares", &nums.clone().map(|n: &i32| n * n).collect()?)?;
    show(
        "evens as text",
        &nums
            .clone()
            .filter(|n: &i32| n % 2 == 0)
            .map(|n: &i32| format!("Par: {n}"))
            .collect()?,
    )?;
    let nested = from_vec(&p, vec![vec!["a", "b"], vec!["c", "d", "e"], vec!["f"]]);
    show("flattened", &nested.flat_map(|v: &Vec<&str>| v.clone()).collect()?)?;
    show("sum", &nums.clone().sum()?)?;
    show("average", &nums.average()?)
}

fn ordering() -> Result<()> {
    section("3. Sorting and slicing");
    let p = Pipeline::default();
    let names = from_vec(&p, vec!["Carlos", "Ana", "Beatriz", "David", "Elena"]);

    show("natural", &names.clone().sorted().collect()?)?;
    show(
        "by length",
        &names.clone().sorted_by_key(|s: &&str| s.len()).collect()?,
    )?;
    show(
        "descending",
        &names.clone().sorted_by_key(|s: &&str| Reverse(*s)).collect()?,
    )?;
    show("first 3", &names.clone().sorted().limit(3).collect()?)?;
    show("skip 2", &names.clone().sorted().skip(2).collect()?)?;
    show(
        "middle",
        &names.inspect("middle").sorted().skip(1).limit(2).collect()?,
    )?;
    show(
        "first evens of an endless source",
        &from_generator(&p, || 1u64..)
            .filter(|n: &u64| n % 2 == 0)
            .limit(5)
            .collect()?,
    )
}

fn arithmetic() -> Result<()> {
    section("4. Aggregation");
    let seq = EvalOptions::sequential();
    let nums = || values(1..=10);

    show("sum", &evaluate(nums(), vec![], Terminal::Sum, &seq)?)?;
    show("average", &evaluate(nums(), vec![], Terminal::Average, &seq)?)?;
    show("max", &evaluate(nums(), vec![], Terminal::Max, &seq)?)?;
    show("max of nothing", &evaluate(vec![], vec![], Terminal::Max, &seq)?)?;
    show("statistics", &evaluate(nums(), vec![], Terminal::Statistics, &seq)?)?;
    show(
        "product",
        &evaluate(nums(), vec![], Terminal::reduce(1, |a, b| a.multiply(b)), &seq)?,
    )?;
    show(
        "sum by reduce",
        &evaluate(nums(), vec![], Terminal::reduce_optional(|a, b| a.add(b)), &seq)?,
    )
}

fn parallel() -> Result<()> {
    section("5. Parallel evaluation");
    let big = || values(1..=2_000_000i64);

    let t = Instant::now();
    let s = evaluate(big(), vec![], Terminal::Sum, &EvalOptions::sequential())?;
    let seq_ms = t.elapsed().as_millis();

    let t = Instant::now();
    let p = evaluate(big(), vec![], Terminal::Sum, &EvalOptions::parallel())?;
    let par_ms = t.elapsed().as_millis();

    show("sequential sum", &s)?;
    show("parallel sum", &p)?;
    println!("  sequential {seq_ms} ms, parallel {par_ms} ms, equal: {}", s == p);

    match evaluate(
        values(["a", "b"]),
        vec![],
        Terminal::join(","),
        &EvalOptions::parallel(),
    ) {
        Ok(_) => println!("  join unexpectedly ran in parallel"),
        Err(e) => println!("  join in parallel: {e}"),
    }
    Ok(())
}

fn collectors() -> Result<()> {
    section("6. Collectors");
    let seq = EvalOptions::sequential();
    let words = || {
        values([
            "java", "stream", "lambda", "collector", "optional", "map", "filter", "reduce",
        ])
    };

    show("set", &evaluate(words(), vec![], Terminal::to_set(), &seq)?)?;
    show(
        "word -> length",
        &evaluate(
            words(),
            vec![Stage::transform(|w| Value::pair(w.clone(), text_len(w)))],
            Terminal::to_map(),
            &seq,
        )?,
    )?;
    show(
        "by length",
        &evaluate(words(), vec![], Terminal::group_by(|w| Value::Int(text_len(w))), &seq)?,
    )?;
    show(
        "by length, sorted",
        &evaluate(
            words(),
            vec![],
            Terminal::group_by_sorted(|w| Value::Int(text_len(w))),
            &seq,
        )?,
    )?;
    show(
        "count by first letter",
        &evaluate(
            words(),
            vec![],
            Terminal::group_by_with(
                |w| Value::from(w.as_text().and_then(|s| s.chars().next()).map(String::from).unwrap_or_default()),
                Terminal::Count,
            ),
            &seq,
        )?,
    )?;
    show(
        "even/odd",
        &evaluate(
            values(1..=10),
            vec![],
            Terminal::partition_by(|n| n.as_int().is_some_and(|n| n % 2 == 0)),
            &seq,
        )?,
    )?;
    show(
        "even/odd sums",
        &evaluate(
            values(1..=10),
            vec![],
            Terminal::partition_by_with(|n| n.as_int().is_some_and(|n| n % 2 == 0), Terminal::Sum),
            &seq,
        )?,
    )?;
    show(
        "joined",
        &evaluate(words(), vec![Stage::limit(3)], Terminal::join_with(", ", "[", "]"), &seq)?,
    )?;

    let p = Pipeline::default();
    let typed = from_vec(&p, vec!["java", "stream", "lambda", "collector", "map"]);
    show(
        "upper-cased by length",
        &typed.clone().group_by_with(
            |w: &&str| w.len(),
            Mapping::new(|w: &&str| w.to_uppercase(), ToList),
        )?,
    )?;
    show(
        "by length, then first letter",
        &typed.clone().group_by_with(
            |w: &&str| w.len(),
            GroupingBy::new(|w: &&str| w.chars().next().unwrap_or(' '), Count),
        )?,
    )?;
    show(
        "joined and shouted",
        &typed
            .combine_globally(CollectingAndThen::new(Joining::new(" | "), |s: String| {
                s.to_uppercase()
            }))
            .collect()?,
    )
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    basics()?;
    filtering()?;
    ordering()?;
    arithmetic()?;
    parallel()?;
    collectors()
}
