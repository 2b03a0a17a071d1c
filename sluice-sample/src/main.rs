use std::error::Error;
use std::sync::Arc;

use sluice_core::Pipeline;
use sluice_pool::WorkerPool;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    creating_pipelines()?;
    intermediate_operations()?;
    terminal_operations()?;
    parallel_pipelines()?;
    Ok(())
}

fn creating_pipelines() -> Result<(), Box<dyn Error>> {
    info!("creating pipelines from different element sources");

    let mut from_collection = Pipeline::from_collection(vec!["red", "green", "blue"]);
    println!("from a collection: {:?}", from_collection.to_vec()?);

    let mut from_slice = Pipeline::from_slice(&[10, 20, 30]);
    println!("from a slice:      {:?}", from_slice.to_vec()?);

    let mut from_builder = Pipeline::builder().add("one").add("two").add("three").build();
    println!("from a builder:    {:?}", from_builder.to_vec()?);

    let mut from_range = Pipeline::from_range(1, 6);
    println!("from a range:      {:?}", from_range.to_vec()?);

    Ok(())
}

fn intermediate_operations() -> Result<(), Box<dyn Error>> {
    info!("chaining intermediate operations");

    let mut distinct = Pipeline::from_collection(vec!["a", "b", "b", "c"]).distinct();
    println!("distinct:          {:?}", distinct.to_vec()?);

    let mut paginated = Pipeline::from_range(1, 11).skip(3).limit(5);
    println!("skip 3, limit 5:   {:?}", paginated.to_vec()?);

    let mut sorted = Pipeline::from_collection(vec![12, 5, 62, 34, 2]).sorted();
    println!("sorted:            {:?}", sorted.to_vec()?);

    let mut reversed = Pipeline::from_collection(vec![12, 5, 62, 34, 2]).sorted_by(|a, b| b.cmp(a));
    println!("sorted (reverse):  {:?}", reversed.to_vec()?);

    let mut flattened = Pipeline::from_collection(vec![vec![1, 2], vec![3], vec![4, 5]])
        .flat_map(|group| group)
        .map(|n| n * 10);
    println!("flattened:         {:?}", flattened.to_vec()?);

    Ok(())
}

fn terminal_operations() -> Result<(), Box<dyn Error>> {
    info!("driving pipelines with terminal operations");

    let mut count = Pipeline::from_range(0, 100).filter(|n| n % 3 == 0);
    println!("count:             {}", count.count()?);

    let mut matches = Pipeline::from_collection(vec!["ant", "bee", "crab"]);
    println!(
        "any name > 3 chars: {}",
        matches.any_match(|name| name.len() > 3)?
    );

    let mut extremes = Pipeline::from_slice(&[2, 5, 4, 1]);
    println!("max:               {:?}", extremes.max()?);

    let mut first = Pipeline::from_collection(vec!["ant", "bee", "crab"])
        .filter(|name| name.contains('b'));
    println!("first match:       {:?}", first.find_first()?);

    let mut reduced = Pipeline::from_collection(vec![1, 1, 1]);
    println!("reduce from 23:    {}", reduced.reduce(23, |acc, n| acc + n)?);

    Ok(())
}

fn parallel_pipelines() -> Result<(), Box<dyn Error>> {
    info!("evaluating in parallel on a shared worker pool");

    let pool = Arc::new(WorkerPool::new(4)?);

    let pipeline = Pipeline::from_range(0, 10_000).parallel_with(Arc::clone(&pool));
    println!("is parallel:       {}", pipeline.is_parallel());

    let mut total = pipeline.map(|n| n * 12);
    println!("parallel sum:      {}", total.sum()?);

    let mut any_big = Pipeline::from_range(0, 10_000)
        .map(|n| n * 12)
        .parallel_with(Arc::clone(&pool));
    println!(
        "any product > 200: {}",
        any_big.any_match(|price| *price > 200)?
    );

    // Back to sequential mode on the same chain shape
    let mut sequential_again = Pipeline::from_range(0, 10_000)
        .map(|n| n * 12)
        .parallel_with(pool)
        .sequential();
    println!("sequential again:  {}", sequential_again.sum()?);

    Ok(())
}
