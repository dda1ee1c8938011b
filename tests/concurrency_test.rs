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

//! Concurrency tests using parking_lot's built-in deadlock detector.
//!
//! These tests verify two things: the per-room locking patterns never
//! deadlock under contention, and the transaction scope really does let at
//! most one booking win any contested night.

use booking_engine_rs::{
    AvailabilityQuery, BookingError, BookingRequest, Engine, GuestDetails, NewRoom, PaymentStatus,
    Room, RoomStatus,
};
use chrono::{Days, NaiveDate};
use parking_lot::deadlock;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

// === Helpers ===

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn guest() -> GuestDetails {
    GuestDetails {
        first_name: "Load".into(),
        last_name: "Test".into(),
        email: "load@example.com".into(),
        phone: "000".into(),
        nationality: None,
    }
}

fn engine_with_rooms(count: u16) -> (Engine, Vec<Room>) {
    let engine = Engine::new();
    let rooms = (0..count)
        .map(|i| {
            engine
                .add_room(NewRoom {
                    number: format!("1{:02}", i),
                    capacity: 4,
                    price: dec!(100.00),
                    status: RoomStatus::Available,
                })
                .unwrap()
        })
        .collect();
    (engine, rooms)
}

fn request(room: &Room, check_in: NaiveDate, check_out: NaiveDate) -> BookingRequest {
    BookingRequest {
        room_id: room.id,
        guest: guest(),
        check_in,
        check_out,
        adults: 2,
        children: 0,
        payment_id: "load-pay".into(),
        payment_status: PaymentStatus::Completed,
        total: dec!(200.00),
    }
}

// === Deadlock Detection Infrastructure ===

/// Starts a background thread that checks for deadlocks.
/// Returns a handle to stop the detector.
fn start_deadlock_detector() -> Arc<AtomicBool> {
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();

    thread::spawn(move || {
        while running_clone.load(Ordering::SeqCst) {
            thread::sleep(Duration::from_millis(100));
            let deadlocks = deadlock::check_deadlock();
            if !deadlocks.is_empty() {
                eprintln!("\n=== DEADLOCK DETECTED ===");
                for (i, threads) in deadlocks.iter().enumerate() {
                    eprintln!("\nDeadlock #{}", i + 1);
                    for t in threads {
                        eprintln!("Thread ID: {:?}", t.thread_id());
                        eprintln!("Backtrace:\n{:#?}", t.backtrace());
                    }
                }
                panic!("Deadlock detected! See output above for details.");
            }
        }
    });

    running
}

/// Stops the deadlock detector.
fn stop_deadlock_detector(running: Arc<AtomicBool>) {
    running.store(false, Ordering::SeqCst);
    thread::sleep(Duration::from_millis(150)); // Let detector thread exit
}

// === Tests ===

/// The core double-booking guarantee: many threads race for the same room
/// and range, exactly one commits, every loser sees a date conflict.
#[test]
fn contested_range_has_exactly_one_winner() {
    let detector = start_deadlock_detector();
    let (engine, rooms) = engine_with_rooms(1);
    let room = &rooms[0];

    const NUM_THREADS: usize = 32;

    let results = crossbeam::thread::scope(|s| {
        let handles: Vec<_> = (0..NUM_THREADS)
            .map(|_| {
                let engine = &engine;
                s.spawn(move |_| engine.book(request(room, d(2025, 6, 1), d(2025, 6, 4))))
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("thread panicked"))
            .collect::<Vec<_>>()
    })
    .expect("scope panicked");

    stop_deadlock_detector(detector);

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "exactly one booking must commit");
    for result in results.iter().filter(|r| r.is_err()) {
        assert_eq!(result.clone().unwrap_err(), BookingError::DateConflict);
    }
    assert_eq!(engine.reservations().len(), 1);

    println!(
        "Contested range test passed: 1/{} bookings committed",
        NUM_THREADS
    );
}

/// Disjoint ranges on the same room never block each other out.
#[test]
fn disjoint_ranges_all_commit() {
    let detector = start_deadlock_detector();
    let (engine, rooms) = engine_with_rooms(1);
    let room = &rooms[0];

    const NUM_THREADS: u64 = 10;

    let results = crossbeam::thread::scope(|s| {
        let handles: Vec<_> = (0..NUM_THREADS)
            .map(|i| {
                let engine = &engine;
                s.spawn(move |_| {
                    let check_in = d(2025, 6, 1) + Days::new(i * 7);
                    engine.book(request(room, check_in, check_in + Days::new(5)))
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("thread panicked"))
            .collect::<Vec<_>>()
    })
    .expect("scope panicked");

    stop_deadlock_detector(detector);

    assert!(results.iter().all(|r| r.is_ok()));
    assert_eq!(engine.reservations().len(), NUM_THREADS as usize);
}

/// Racing cancellations resolve to one winner and exactly one refund.
#[test]
fn concurrent_cancels_record_single_refund() {
    let detector = start_deadlock_detector();
    let (engine, rooms) = engine_with_rooms(1);
    let reservation = engine
        .book(request(&rooms[0], d(2025, 6, 1), d(2025, 6, 4)))
        .unwrap();

    const NUM_THREADS: usize = 16;

    let results = crossbeam::thread::scope(|s| {
        let handles: Vec<_> = (0..NUM_THREADS)
            .map(|_| {
                let engine = &engine;
                s.spawn(move |_| engine.cancel(reservation.id, None, d(2025, 5, 30)))
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("thread panicked"))
            .collect::<Vec<_>>()
    })
    .expect("scope panicked");

    stop_deadlock_detector(detector);

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "exactly one cancellation must win");
    for result in results.iter().filter(|r| r.is_err()) {
        assert_eq!(
            result.clone().unwrap_err(),
            BookingError::AlreadyCancelled
        );
    }
    assert_eq!(engine.refunds().len(), 1);
}

/// Readers (search, month views) run freely during a booking storm.
#[test]
fn no_deadlock_search_during_booking_storm() {
    let detector = start_deadlock_detector();
    let (engine, rooms) = engine_with_rooms(10);

    const WRITERS: usize = 8;
    const READERS: usize = 8;
    const OPS_PER_THREAD: usize = 50;

    crossbeam::thread::scope(|s| {
        for writer in 0..WRITERS {
            let engine = &engine;
            let rooms = &rooms;
            s.spawn(move |_| {
                for i in 0..OPS_PER_THREAD {
                    let room = &rooms[(writer + i) % rooms.len()];
                    let check_in = d(2025, 6, 1) + Days::new(((writer * 11 + i) % 90) as u64);
                    let _ = engine.book(request(room, check_in, check_in + Days::new(2)));
                }
            });
        }
        for reader in 0..READERS {
            let engine = &engine;
            let rooms = &rooms;
            s.spawn(move |_| {
                for i in 0..OPS_PER_THREAD {
                    let _ = engine.search_available(&AvailabilityQuery {
                        check_in: d(2025, 6, 1) + Days::new(((reader + i) % 60) as u64),
                        check_out: d(2025, 6, 4) + Days::new(((reader + i) % 60) as u64),
                        adults: 2,
                        children: 0,
                    });
                    let room = &rooms[(reader + i) % rooms.len()];
                    let _ = engine.month_calendar(room.id, 2025, 6);
                }
            });
        }
    })
    .expect("scope panicked");

    stop_deadlock_detector(detector);

    println!(
        "Booking storm test passed: {} reservations committed",
        engine.reservations().len()
    );
}

/// Mixed bookings, cancellations, and status flips keep every invariant.
#[test]
fn no_deadlock_mixed_operations() {
    let detector = start_deadlock_detector();
    let (engine, rooms) = engine_with_rooms(5);

    const NUM_THREADS: usize = 20;
    const OPS_PER_THREAD: usize = 40;

    crossbeam::thread::scope(|s| {
        for thread_id in 0..NUM_THREADS {
            let engine = &engine;
            let rooms = &rooms;
            s.spawn(move |_| {
                for i in 0..OPS_PER_THREAD {
                    let room = &rooms[(thread_id + i) % rooms.len()];
                    match i % 4 {
                        0 => {
                            let check_in =
                                d(2025, 6, 1) + Days::new(((thread_id * 13 + i) % 120) as u64);
                            if let Ok(reservation) =
                                engine.book(request(room, check_in, check_in + Days::new(3)))
                            {
                                if i % 2 == 0 {
                                    let _ =
                                        engine.cancel(reservation.id, None, d(2025, 5, 1));
                                }
                            }
                        }
                        1 => {
                            let status = if i % 2 == 0 {
                                RoomStatus::Occupied
                            } else {
                                RoomStatus::Available
                            };
                            let _ = engine.set_room_status(room.id, status);
                        }
                        2 => {
                            let _ = engine.month_calendar(room.id, 2025, 7);
                        }
                        _ => {
                            let _ = engine.reservations_for_room(room.id);
                        }
                    }
                }
            });
        }
    })
    .expect("scope panicked");

    stop_deadlock_detector(detector);

    // Per room, confirmed reservations never share a night.
    for room in &rooms {
        let confirmed: Vec<_> = engine
            .reservations_for_room(room.id)
            .into_iter()
            .filter(|r| r.status == booking_engine_rs::ReservationStatus::Confirmed)
            .collect();
        for (i, a) in confirmed.iter().enumerate() {
            for b in confirmed.iter().skip(i + 1) {
                let disjoint = a.check_out <= b.check_in || b.check_out <= a.check_in;
                assert!(
                    disjoint,
                    "rooms must never hold overlapping confirmed reservations"
                );
            }
        }
    }

    println!(
        "Mixed operations test passed: {} threads × {} ops",
        NUM_THREADS, OPS_PER_THREAD
    );
}

/// Rapid book/cancel cycling on one room stays consistent and lock-clean.
#[test]
fn no_deadlock_rapid_book_cancel_cycling() {
    let detector = start_deadlock_detector();
    let (engine, rooms) = engine_with_rooms(1);
    let room = &rooms[0];

    const NUM_THREADS: usize = 8;
    const CYCLES_PER_THREAD: usize = 100;

    crossbeam::thread::scope(|s| {
        for _ in 0..NUM_THREADS {
            let engine = &engine;
            s.spawn(move |_| {
                for _ in 0..CYCLES_PER_THREAD {
                    if let Ok(reservation) =
                        engine.book(request(room, d(2025, 6, 1), d(2025, 6, 3)))
                    {
                        engine
                            .cancel(reservation.id, None, d(2025, 5, 30))
                            .expect("own reservation must cancel");
                    }
                }
            });
        }
    })
    .expect("scope panicked");

    stop_deadlock_detector(detector);

    // every booked reservation was cancelled again
    assert!(
        engine
            .reservations()
            .iter()
            .all(|r| r.status == booking_engine_rs::ReservationStatus::Cancelled)
    );
    // the range must be bookable at the end
    assert!(engine.book(request(room, d(2025, 6, 1), d(2025, 6, 3))).is_ok());

    println!(
        "Rapid cycling test passed: {} threads × {} cycles",
        NUM_THREADS, CYCLES_PER_THREAD
    );
}
