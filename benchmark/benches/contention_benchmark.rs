use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fair_sync::{FairRwLock, FairSemaphore, Timeout};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const OPS_PER_THREAD: usize = 500;

fn run_threads<F>(threads: usize, work: F)
where
    F: Fn(usize) + Send + Sync + 'static,
{
    let work = Arc::new(work);
    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let work = Arc::clone(&work);
            thread::spawn(move || work(t))
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}

/// Many threads cycling through a small pool of permits.
fn bench_semaphore_contention(c: &mut Criterion) {
    let mut group = c.benchmark_group("semaphore_contention");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(5));

    for threads in [2usize, 4, 8] {
        group.bench_with_input(BenchmarkId::new("single_unit", threads), &threads, |b, &threads| {
            b.iter(|| {
                let sem = Arc::new(FairSemaphore::new(2));
                run_threads(threads, move |_| {
                    for _ in 0..OPS_PER_THREAD {
                        let permit = sem.permit(1, Timeout::Infinite).unwrap();
                        black_box(&permit);
                    }
                });
            });
        });

        // Mixed sizes exercise head-of-line blocking in the queue.
        group.bench_with_input(BenchmarkId::new("mixed_units", threads), &threads, |b, &threads| {
            b.iter(|| {
                let sem = Arc::new(FairSemaphore::new(4));
                run_threads(threads, move |t| {
                    for i in 0..OPS_PER_THREAD {
                        let units = 1 + (t + i) % 4;
                        let permit = sem.permit(units, Timeout::Infinite).unwrap();
                        black_box(&permit);
                    }
                });
            });
        });
    }

    group.finish();
}

/// Read-mostly workload, fair lock against parking_lot's RwLock.
fn bench_rwlock_contention(c: &mut Criterion) {
    let mut group = c.benchmark_group("rwlock_contention");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(5));

    for threads in [2usize, 4, 8] {
        group.bench_with_input(BenchmarkId::new("fair_sync", threads), &threads, |b, &threads| {
            b.iter(|| {
                let lock = Arc::new(FairRwLock::new());
                run_threads(threads, move |t| {
                    for i in 0..OPS_PER_THREAD {
                        if (t + i) % 8 == 0 {
                            let guard = lock.write(Timeout::Infinite).unwrap();
                            black_box(&guard);
                        } else {
                            let guard = lock.read(Timeout::Infinite).unwrap();
                            black_box(&guard);
                        }
                    }
                });
            });
        });

        group.bench_with_input(BenchmarkId::new("parking_lot", threads), &threads, |b, &threads| {
            b.iter(|| {
                let lock = Arc::new(parking_lot::RwLock::new(0usize));
                run_threads(threads, move |t| {
                    for i in 0..OPS_PER_THREAD {
                        if (t + i) % 8 == 0 {
                            *lock.write() += 1;
                        } else {
                            black_box(*lock.read());
                        }
                    }
                });
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_semaphore_contention, bench_rwlock_contention);
criterion_main!(benches);
