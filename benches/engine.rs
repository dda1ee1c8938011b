// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Booking Engine Contributors
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

//! Benchmarks for the booking engine.
//!
//! Run with: cargo bench
//!
//! Benchmarks include:
//! - Single-threaded booking and cancellation
//! - Availability search scaling with catalog size
//! - Month calendar rendering
//! - Multi-threaded concurrent booking across rooms

use booking_engine_rs::{
    AvailabilityQuery, BookingRequest, Engine, GuestDetails, NewRoom, PaymentStatus, Room,
    RoomStatus,
};
use chrono::{Days, NaiveDate};
use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rayon::prelude::*;
use rust_decimal::Decimal;

// =============================================================================
// Helper Functions
// =============================================================================

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn guest() -> GuestDetails {
    GuestDetails {
        first_name: "Bench".into(),
        last_name: "Guest".into(),
        email: "bench@example.com".into(),
        phone: "000".into(),
        nationality: None,
    }
}

fn engine_with_rooms(count: u32) -> (Engine, Vec<Room>) {
    let engine = Engine::new();
    let rooms = (0..count)
        .map(|i| {
            engine
                .add_room(NewRoom {
                    number: format!("room-{i}"),
                    capacity: 4,
                    price: Decimal::new(8_000 + (i as i64 % 40) * 250, 2),
                    status: RoomStatus::Available,
                })
                .unwrap()
        })
        .collect();
    (engine, rooms)
}

fn request(room: &Room, check_in: NaiveDate, nights: u64) -> BookingRequest {
    BookingRequest {
        room_id: room.id,
        guest: guest(),
        check_in,
        check_out: check_in + Days::new(nights),
        adults: 2,
        children: 0,
        payment_id: "bench-pay".into(),
        payment_status: PaymentStatus::Completed,
        total: Decimal::new(20_000, 2),
    }
}

// =============================================================================
// Single-Threaded Benchmarks
// =============================================================================

fn bench_single_booking(c: &mut Criterion) {
    c.bench_function("book_two_nights", |b| {
        b.iter_batched(
            || engine_with_rooms(1),
            |(engine, rooms)| {
                engine
                    .book(request(&rooms[0], d(2025, 6, 1), 2))
                    .unwrap()
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_book_then_cancel(c: &mut Criterion) {
    c.bench_function("book_then_cancel", |b| {
        b.iter_batched(
            || engine_with_rooms(1),
            |(engine, rooms)| {
                let reservation = engine
                    .book(request(&rooms[0], d(2025, 6, 1), 2))
                    .unwrap();
                engine
                    .cancel(reservation.id, None, d(2025, 5, 30))
                    .unwrap()
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_month_calendar(c: &mut Criterion) {
    let (engine, rooms) = engine_with_rooms(1);
    // a busy month: alternating two-night stays
    for i in 0..10u64 {
        engine
            .book(request(&rooms[0], d(2025, 6, 1) + Days::new(i * 3), 2))
            .unwrap();
    }

    c.bench_function("month_calendar_busy_month", |b| {
        b.iter(|| engine.month_calendar(rooms[0].id, 2025, 6).unwrap())
    });
}

// =============================================================================
// Search Scaling Benchmarks
// =============================================================================

fn bench_search_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_available");

    for room_count in [10u32, 100, 1000] {
        let (engine, rooms) = engine_with_rooms(room_count);
        // pre-book every other room for the queried range
        for room in rooms.iter().step_by(2) {
            engine.book(request(room, d(2025, 6, 1), 3)).unwrap();
        }

        group.throughput(Throughput::Elements(u64::from(room_count)));
        group.bench_with_input(
            BenchmarkId::from_parameter(room_count),
            &engine,
            |b, engine| {
                b.iter(|| {
                    engine
                        .search_available(&AvailabilityQuery {
                            check_in: d(2025, 6, 2),
                            check_out: d(2025, 6, 4),
                            adults: 2,
                            children: 0,
                        })
                        .unwrap()
                })
            },
        );
    }

    group.finish();
}

// =============================================================================
// Multi-Threaded Benchmarks
// =============================================================================

fn bench_concurrent_bookings(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_bookings");
    group.sample_size(20);

    for room_count in [16u32, 64] {
        group.throughput(Throughput::Elements(u64::from(room_count)));
        group.bench_with_input(
            BenchmarkId::from_parameter(room_count),
            &room_count,
            |b, &room_count| {
                b.iter_batched(
                    || engine_with_rooms(room_count),
                    |(engine, rooms)| {
                        rooms.par_iter().for_each(|room| {
                            engine.book(request(room, d(2025, 6, 1), 2)).unwrap();
                        });
                    },
                    BatchSize::SmallInput,
                )
            },
        );
    }

    group.finish();
}

fn bench_contended_room(c: &mut Criterion) {
    let mut group = c.benchmark_group("contended_room");
    group.sample_size(20);

    // every thread fights for the same room with disjoint weekly slots
    group.bench_function("disjoint_slots_16_threads", |b| {
        b.iter_batched(
            || engine_with_rooms(1),
            |(engine, rooms)| {
                (0..16u64).into_par_iter().for_each(|i| {
                    engine
                        .book(request(&rooms[0], d(2025, 6, 1) + Days::new(i * 7), 5))
                        .unwrap();
                });
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_single_booking,
    bench_book_then_cancel,
    bench_month_calendar,
    bench_search_scaling,
    bench_concurrent_bookings,
    bench_contended_room,
);
criterion_main!(benches);
