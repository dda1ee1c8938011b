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

//! # Booking Engine
//!
//! This library provides a room-reservation engine for hotel backends:
//! date-range availability search, conflict-checked booking, and the
//! cancellation lifecycle (cancel, refund).
//!
//! ## Core Components
//!
//! - [`Engine`]: Central storage handle processing every booking operation
//! - [`RoomCalendar`]: Per-room night allocations, the conflict index
//! - [`RefundLedger`]: Append-only refund bookkeeping
//! - [`BookingError`]: Error types for booking failures
//!
//! ## Example
//!
//! ```
//! use booking_engine_rs::{BookingRequest, Engine, GuestDetails, NewRoom, PaymentStatus};
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//!
//! let engine = Engine::new();
//!
//! let room = engine
//!     .add_room(NewRoom {
//!         number: "101".into(),
//!         capacity: 2,
//!         price: dec!(100.00),
//!         status: Default::default(),
//!     })
//!     .unwrap();
//!
//! let reservation = engine
//!     .book(BookingRequest {
//!         room_id: room.id,
//!         guest: GuestDetails {
//!             first_name: "Ana".into(),
//!             last_name: "Suarez".into(),
//!             email: "ana@example.com".into(),
//!             phone: "+34 600 000 001".into(),
//!             nationality: None,
//!         },
//!         check_in: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
//!         check_out: NaiveDate::from_ymd_opt(2025, 6, 3).unwrap(),
//!         adults: 2,
//!         children: 0,
//!         payment_id: "pay-123".into(),
//!         payment_status: PaymentStatus::Completed,
//!         total: dec!(200.00),
//!     })
//!     .unwrap();
//!
//! assert_eq!(reservation.nights(), 2);
//! ```
//!
//! ## Thread Safety
//!
//! The engine serializes operations per room through each room's calendar
//! lock, allowing bookings on different rooms to proceed in parallel while
//! concurrent attempts on the same room resolve to exactly one winner per
//! contested night.

pub mod calendar;
mod base;
mod booking;
mod engine;
pub mod error;
mod ledger;
mod reservation;
mod room;

pub use base::{ReservationId, RoomId};
pub use booking::{AvailabilityQuery, BookingRequest, DateRange, GuestDetails};
pub use calendar::{DayAvailability, DayState, MonthAvailability, RoomCalendar};
pub use engine::Engine;
pub use error::{BookingError, ErrorCategory};
pub use ledger::RefundLedger;
pub use reservation::{
    CancellationOutcome, PaymentStatus, RefundRecord, Reservation, ReservationStatus,
};
pub use room::{NewRoom, Room, RoomStatus};
