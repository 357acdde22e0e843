use anyhow::Result;
use seqflow::combiners::AverageF64;
use seqflow::testing::*;
use seqflow::*;

#[test]
fn default_pipeline_runs_sequentially() {
    let p = Pipeline::default();
    assert_eq!(p.runner().mode, ExecMode::Sequential);
    assert!(Pipeline::parallel().runner().is_parallel());
}

#[test]
fn default_runner_sizes_chunks_from_the_cpu_count() {
    let r = Runner::default();
    assert!(r.is_parallel());
    assert!(r.default_partitions >= 4);
}

#[test]
fn collect_par_concatenates_chunks_in_order() -> Result<()> {
    let p = Pipeline::default();
    let out = from_iter(&p, 0..1_000)
        .map(|n: &i32| n * 3)
        .filter(|n: &i32| n % 2 == 0)
        .collect_par(Some(4), Some(9))?;
    let expected: Vec<i32> = (0..1_000).map(|n| n * 3).filter(|n| n % 2 == 0).collect();
    assert_collections_equal(&out, &expected);
    Ok(())
}

#[test]
fn sum_and_count_match_for_any_chunking() -> Result<()> {
    let data: Vec<i64> = pseudo_random_data(5_000, -1_000, 1_000);
    let expected_sum: i64 = data.iter().filter(|n| **n > 0).sum();

    for partitions in [1, 2, 3, 7, 64, 5_000, 10_000] {
        let src = data.clone();
        let sum = assert_same_in_parallel(
            |p| from_vec(p, src.clone()).filter(|n: &i64| *n > 0).sum(),
            partitions,
        )?;
        assert_eq!(sum, expected_sum);

        let src = data.clone();
        assert_same_in_parallel(|p| from_vec(p, src.clone()).count(), partitions)?;
    }
    Ok(())
}

#[test]
fn extremes_and_statistics_survive_chunking() -> Result<()> {
    let data = pseudo_random_data(2_000, 0, 1_000_000);
    let min = assert_same_in_parallel(|p| from_vec(p, data.clone()).min(), 13)?;
    let max = assert_same_in_parallel(|p| from_vec(p, data.clone()).max(), 13)?;
    assert_eq!(min, data.iter().copied().min());
    assert_eq!(max, data.iter().copied().max());

    let floats: Vec<f64> = (1..=1_000).map(f64::from).collect();
    let seq = from_vec(&TestPipeline::new(), floats.clone())
        .combine_globally(AverageF64)
        .collect()?;
    let par = from_vec(&TestPipeline::parallel(8), floats)
        .combine_globally(AverageF64)
        .collect()?;
    assert_eq!(seq, vec![Some(500.5)]);
    assert_approx_eq!(par[0].unwrap_or_default(), 500.5);
    Ok(())
}

#[test]
fn dedicated_thread_pool_is_used_when_requested() -> Result<()> {
    let p = Pipeline::with_runner(Runner::parallel(Some(2), Some(4)));
    let threads = from_iter(&p, 0..64)
        .map(|_: &i32| rayon::current_num_threads())
        .to_set()?;
    assert_eq!(threads.into_iter().collect::<Vec<_>>(), vec![2]);
    Ok(())
}

#[test]
fn generators_run_as_a_single_chunk_in_parallel_mode() -> Result<()> {
    let p = Pipeline::parallel();
    let firsts = from_generator(&p, || 10u32..).limit(5).collect()?;
    assert_eq!(firsts, vec![10, 11, 12, 13, 14]);
    Ok(())
}

#[test]
fn order_sensitive_stages_apply_per_chunk_in_parallel() -> Result<()> {
    // Each of the 4 chunks keeps its own first element.
    let p = TestPipeline::parallel(4);
    let heads = from_iter(&p, 0..8).limit(1).collect()?;
    assert_eq!(heads, vec![0, 2, 4, 6]);

    let seq = from_iter(&TestPipeline::new(), 0..8).limit(1).collect()?;
    assert_eq!(seq, vec![0]);
    Ok(())
}
