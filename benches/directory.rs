// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Benchmarks for the customer directory and account operations.
//!
//! Run with: cargo bench
//!
//! Benchmarks include:
//! - Single-threaded deposits and withdrawals
//! - Customer registration and account opening
//! - Multi-threaded operations on shared and separate accounts
//! - Statement rendering over growing histories

use bank_ledger::{CustomerId, Directory, LedgerConfig, Operation, Statement};
use chrono::NaiveDate;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rayon::prelude::*;
use rust_decimal::Decimal;

// =============================================================================
// Helper Functions
// =============================================================================

/// A directory whose withdrawal rules never get in the way of a benchmark.
fn unlimited_directory() -> Directory {
    Directory::with_config(LedgerConfig {
        withdrawal_limit: Decimal::MAX,
        max_withdrawals: u32::MAX,
        ..LedgerConfig::default()
    })
}

fn birth_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1990, 1, 1).unwrap()
}

/// Registers `count` customers and opens one account for each.
fn populate(directory: &Directory, count: u32) -> Vec<CustomerId> {
    (0..count)
        .map(|i| {
            let id = CustomerId::new(i.to_string());
            directory
                .register_customer(id.clone(), "Customer", birth_date(), "")
                .unwrap();
            directory.open_account(&id).unwrap();
            id
        })
        .collect()
}

fn amount(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

// =============================================================================
// Single-Threaded Benchmarks
// =============================================================================

fn bench_single_deposit(c: &mut Criterion) {
    let directory = unlimited_directory();
    let ids = populate(&directory, 1);

    c.bench_function("single_deposit", |b| {
        b.iter(|| {
            directory
                .execute(&ids[0], black_box(Operation::deposit(amount(10000))))
                .unwrap();
        })
    });
}

fn bench_single_withdrawal(c: &mut Criterion) {
    c.bench_function("single_withdrawal", |b| {
        b.iter_batched(
            || {
                let directory = unlimited_directory();
                let ids = populate(&directory, 1);
                directory
                    .execute(&ids[0], Operation::deposit(amount(10000)))
                    .unwrap();
                (directory, ids)
            },
            |(directory, ids)| {
                directory
                    .execute(&ids[0], black_box(Operation::withdrawal(amount(5000))))
                    .unwrap();
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench_deposit_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("deposit_throughput");

    for count in [100, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            b.iter(|| {
                let directory = unlimited_directory();
                let ids = populate(&directory, 1);
                for _ in 0..count {
                    directory
                        .execute(&ids[0], Operation::deposit(amount(10000)))
                        .unwrap();
                }
            })
        });
    }
    group.finish();
}

fn bench_rejected_withdrawals(c: &mut Criterion) {
    let directory = Directory::new();
    let ids = populate(&directory, 1);

    // Each rejection path returns before touching the balance.
    c.bench_function("rejected_withdrawal", |b| {
        b.iter(|| {
            let result = directory.execute(&ids[0], black_box(Operation::withdrawal(amount(100))));
            assert!(result.is_err());
        })
    });
}

// =============================================================================
// Directory Benchmarks
// =============================================================================

fn bench_onboarding(c: &mut Criterion) {
    let mut group = c.benchmark_group("onboarding");

    for count in [100u32, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            b.iter(|| {
                let directory = Directory::new();
                populate(&directory, count);
                black_box(directory.account_count())
            })
        });
    }
    group.finish();
}

fn bench_list_accounts(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_accounts");

    for count in [100u32, 1_000, 10_000].iter() {
        let directory = Directory::new();
        populate(&directory, *count);

        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, _| {
            b.iter(|| black_box(directory.list_accounts()))
        });
    }
    group.finish();
}

// =============================================================================
// Multi-Threaded Benchmarks
// =============================================================================

fn bench_parallel_deposits_same_customer(c: &mut Criterion) {
    let mut group = c.benchmark_group("parallel_deposits_same_customer");

    for count in [1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            b.iter(|| {
                let directory = unlimited_directory();
                let ids = populate(&directory, 1);
                (0..count).into_par_iter().for_each(|_| {
                    directory
                        .execute(&ids[0], Operation::deposit(amount(10000)))
                        .unwrap();
                });
            })
        });
    }
    group.finish();
}

fn bench_parallel_deposits_different_customers(c: &mut Criterion) {
    let mut group = c.benchmark_group("parallel_deposits_different_customers");

    for customers in [10u32, 100, 1_000].iter() {
        group.throughput(Throughput::Elements(*customers as u64 * 10));
        group.bench_with_input(
            BenchmarkId::from_parameter(customers),
            customers,
            |b, &customers| {
                let directory = unlimited_directory();
                let ids = populate(&directory, customers);
                b.iter(|| {
                    ids.par_iter().for_each(|id| {
                        for _ in 0..10 {
                            directory
                                .execute(id, Operation::deposit(amount(10000)))
                                .unwrap();
                        }
                    });
                })
            },
        );
    }
    group.finish();
}

fn bench_parallel_mixed_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("parallel_mixed_operations");

    for customers in [10u32, 100].iter() {
        group.throughput(Throughput::Elements(*customers as u64 * 20));
        group.bench_with_input(
            BenchmarkId::from_parameter(customers),
            customers,
            |b, &customers| {
                b.iter(|| {
                    let directory = unlimited_directory();
                    let ids = populate(&directory, customers);
                    ids.par_iter().for_each(|id| {
                        for _ in 0..10 {
                            directory
                                .execute(id, Operation::deposit(amount(10000)))
                                .unwrap();
                            directory
                                .execute(id, Operation::withdrawal(amount(2500)))
                                .unwrap();
                        }
                    });
                })
            },
        );
    }
    group.finish();
}

fn bench_parallel_onboarding(c: &mut Criterion) {
    c.bench_function("parallel_onboarding_1000", |b| {
        b.iter(|| {
            let directory = Directory::new();
            (0..1_000u32).into_par_iter().for_each(|i| {
                let id = CustomerId::new(i.to_string());
                directory
                    .register_customer(id.clone(), "Customer", birth_date(), "")
                    .unwrap();
                directory.open_account(&id).unwrap();
            });
            black_box(directory.account_count())
        })
    });
}

// =============================================================================
// Statement Benchmarks
// =============================================================================

fn bench_statement_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("statement_rendering");

    for history_size in [10, 100, 1_000].iter() {
        let directory = unlimited_directory();
        let ids = populate(&directory, 1);
        for _ in 0..*history_size {
            directory
                .execute(&ids[0], Operation::deposit(amount(10000)))
                .unwrap();
        }
        let account = directory.primary_account(&ids[0]).unwrap();

        group.throughput(Throughput::Elements(*history_size as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(history_size),
            history_size,
            |b, _| b.iter(|| black_box(Statement::for_account(&account))),
        );
    }
    group.finish();
}

// =============================================================================
// Criterion Groups
// =============================================================================

criterion_group!(
    single_threaded,
    bench_single_deposit,
    bench_single_withdrawal,
    bench_deposit_throughput,
    bench_rejected_withdrawals,
);

criterion_group!(directory, bench_onboarding, bench_list_accounts,);

criterion_group!(
    multi_threaded,
    bench_parallel_deposits_same_customer,
    bench_parallel_deposits_different_customers,
    bench_parallel_mixed_operations,
    bench_parallel_onboarding,
);

criterion_group!(statements, bench_statement_rendering,);

criterion_main!(single_threaded, directory, multi_threaded, statements);
