mod common;

use std::{num::NonZeroUsize, time::Duration};

use common::{MockPool, counting};
use driver::{DriverConfig, DriverErr, DriverState, IterativeDriver, JobId, Matrix};

fn config(workers: usize, iterations: usize) -> DriverConfig {
    DriverConfig::new(
        NonZeroUsize::new(workers).unwrap(),
        NonZeroUsize::new(iterations).unwrap(),
        NonZeroUsize::new(64).unwrap(),
    )
}

fn driver(pool: MockPool, workers: usize, iterations: usize) -> IterativeDriver<MockPool> {
    IterativeDriver::new(pool, config(workers, iterations), JobId::new("test", 0, 0))
}

#[tokio::test]
async fn identity_product_returns_the_left_operand() {
    let a = counting(4, 4);
    let mut driver = driver(MockPool::new(), 2, 2);

    let product = driver.run(a.clone(), Matrix::identity(4)).await.unwrap();

    assert_eq!(product, a);
    assert_eq!(driver.state(), DriverState::Completed);

    let calls = &driver.pool().calls;
    assert_eq!(calls.configure_static, 1);
    assert_eq!(calls.cache_dynamic, 2);
    assert_eq!(calls.evict_dynamic, 2);
    assert_eq!(calls.close, 1);
}

#[tokio::test]
async fn product_matches_the_local_reference() {
    let a = counting(7, 3);
    let b = counting(3, 5);
    let expected = a.multiply(&b).unwrap();

    let mut driver = driver(MockPool::new(), 3, 4);
    let product = driver.run(a, b).await.unwrap();

    assert_eq!(product, expected);
    assert_eq!(driver.pool().calls.configure_static, 1);
    assert_eq!(driver.pool().calls.run_round_broadcast, 4);
}

#[tokio::test]
async fn at_most_one_dynamic_block_is_cached() {
    let mut driver = driver(MockPool::new(), 2, 6);
    driver.run(counting(6, 2), counting(2, 2)).await.unwrap();

    assert_eq!(driver.pool().max_cached, 1);
    assert_eq!(driver.pool().cached(), 0);
}

#[tokio::test]
async fn failed_round_aborts_the_job() {
    let mut driver = driver(MockPool::failing_at(1), 2, 3);

    let err = driver.run(counting(3, 3), Matrix::identity(3)).await.unwrap_err();

    assert!(matches!(err, DriverErr::RoundFailure { iteration: 1, .. }));
    assert_eq!(driver.state(), DriverState::Failed);

    let calls = &driver.pool().calls;
    assert_eq!(calls.close, 1);
    // Only round 0 got its result fetched.
    assert_eq!(calls.round_result, 1);
    assert_eq!(calls.cache_dynamic, 2);
}

#[tokio::test]
async fn dimension_mismatch_never_reaches_the_pool() {
    let mut driver = driver(MockPool::new(), 1, 1);

    let err = driver.run(counting(2, 3), counting(2, 3)).await.unwrap_err();

    assert!(matches!(
        err,
        DriverErr::DimensionMismatch {
            left_width: 3,
            right_height: 2
        }
    ));
    assert_eq!(driver.state(), DriverState::Failed);

    let calls = &driver.pool().calls;
    assert_eq!(calls.configure_static, 0);
    assert_eq!(calls.close, 1);
}

#[tokio::test]
async fn too_many_workers_is_an_invalid_partition() {
    let mut driver = driver(MockPool::new(), 5, 1);

    let err = driver.run(counting(2, 2), counting(2, 2)).await.unwrap_err();

    assert!(matches!(err, DriverErr::InvalidPartition { parts: 5, size: 2 }));
    assert_eq!(driver.pool().calls.configure_static, 0);
    assert_eq!(driver.pool().calls.close, 1);
}

#[tokio::test]
async fn round_without_result_is_skipped() {
    let a = counting(4, 2);
    let mut driver = driver(MockPool::empty_at(0), 1, 2);

    let product = driver.run(a.clone(), Matrix::identity(2)).await.unwrap();

    // Round 1 lands where round 0 would have, the tail stays zeroed.
    assert_eq!(product.row(0), a.row(2));
    assert_eq!(product.row(1), a.row(3));
    assert_eq!(product.row(2), &[0.0, 0.0]);
    assert_eq!(product.row(3), &[0.0, 0.0]);
    assert_eq!(driver.state(), DriverState::Completed);
    assert_eq!(driver.pool().calls.evict_dynamic, 2);
}

#[tokio::test]
async fn silent_round_times_out() {
    let pool = MockPool::hanging();
    let config = config(1, 2).with_round_timeout(Duration::from_millis(50));
    let mut driver = IterativeDriver::new(pool, config, JobId::new("test", 0, 0));

    let err = driver.run(counting(2, 2), counting(2, 2)).await.unwrap_err();

    assert!(matches!(err, DriverErr::RoundTimeout { iteration: 0, .. }));
    assert_eq!(driver.state(), DriverState::Failed);
    assert_eq!(driver.pool().calls.close, 1);
    assert_eq!(driver.pool().calls.round_result, 0);
}
