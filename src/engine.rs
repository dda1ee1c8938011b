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

//! Booking engine.
//!
//! The [`Engine`] is the storage handle and the single entry point for every
//! operation: room catalog maintenance, availability search, booking,
//! cancellation, month views, and refund inspection. One engine is created
//! at process startup and shared by reference; there is no module-level
//! singleton.
//!
//! # Concurrency
//!
//! Rooms are independent. Each room's calendar mutex is its transaction
//! scope: booking and cancellation run their check-then-write sequences
//! under it, which is the only synchronization in the crate; callers never
//! take locks. The one lock-ordering rule is that nothing acquires a
//! calendar lock while holding a reservation-store entry.

use crate::base::{ReservationId, RoomId};
use crate::booking::{AvailabilityQuery, BookingRequest};
use crate::calendar::{MonthAvailability, RoomCalendar, intersects_window, month_bounds, month_days};
use crate::error::BookingError;
use crate::ledger::RefundLedger;
use crate::reservation::{
    CancellationOutcome, PaymentStatus, RefundRecord, Reservation, ReservationStatus,
};
use crate::room::{NewRoom, Room, RoomStatus};
use chrono::{NaiveDate, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::atomic::{AtomicU16, AtomicU32, Ordering};

/// Reason written to the ledger when the caller supplies none.
const DEFAULT_CANCEL_REASON: &str = "voluntary cancellation";

/// Booking engine managing rooms, reservations, and the refund ledger.
///
/// # Invariants
///
/// - Room numbers are unique across the catalog.
/// - For any room, the night sets of confirmed reservations are disjoint;
///   the per-room allocation map is the authoritative conflict index.
/// - Cancellation frees a reservation's nights in one calendar-lock
///   acquisition, atomically with the state change.
/// - At most one refund is ever recorded per reservation.
/// - Booking and cancellation never touch the room's manual status, and
///   status flips never touch allocations.
pub struct Engine {
    /// Per-room calendars indexed by room ID.
    rooms: DashMap<RoomId, RoomCalendar>,
    /// Room-number uniqueness index.
    room_numbers: DashMap<String, RoomId>,
    /// Reservation store indexed by reservation ID.
    reservations: DashMap<ReservationId, Reservation>,
    /// Append-only refund log.
    refunds: RefundLedger,
    next_room_id: AtomicU16,
    next_reservation_id: AtomicU32,
}

impl Engine {
    /// Creates a new engine with an empty catalog.
    pub fn new() -> Self {
        Engine {
            rooms: DashMap::new(),
            room_numbers: DashMap::new(),
            reservations: DashMap::new(),
            refunds: RefundLedger::new(),
            next_room_id: AtomicU16::new(1),
            next_reservation_id: AtomicU32::new(1),
        }
    }

    // === Room catalog ===

    /// Registers a room and assigns its ID.
    ///
    /// # Errors
    ///
    /// [`BookingError::DuplicateRoomNumber`] if the number is taken.
    pub fn add_room(&self, new_room: NewRoom) -> Result<Room, BookingError> {
        // Entry API claims the number atomically, so two concurrent adds of
        // the same number cannot both pass the uniqueness check.
        match self.room_numbers.entry(new_room.number.clone()) {
            Entry::Occupied(_) => Err(BookingError::DuplicateRoomNumber),
            Entry::Vacant(entry) => {
                // ids only need to be unique
                let id = RoomId(self.next_room_id.fetch_add(1, Ordering::Relaxed));
                let room = Room {
                    id,
                    number: new_room.number,
                    capacity: new_room.capacity,
                    price: new_room.price,
                    status: new_room.status,
                };
                entry.insert(id);
                self.rooms.insert(id, RoomCalendar::new(room.clone()));
                Ok(room)
            }
        }
    }

    /// Flips a room's manual occupancy flag (operator check-in/check-out or
    /// maintenance). The reservation calendar is not consulted or changed.
    pub fn set_room_status(&self, id: RoomId, status: RoomStatus) -> Result<Room, BookingError> {
        let calendar = self.rooms.get(&id).ok_or(BookingError::RoomNotFound)?;
        Ok(calendar.set_status(status))
    }

    /// Snapshot of one room.
    pub fn room(&self, id: RoomId) -> Option<Room> {
        self.rooms.get(&id).map(|calendar| calendar.room())
    }

    /// Looks a room up by its unique door number.
    pub fn room_by_number(&self, number: &str) -> Option<Room> {
        let id = *self.room_numbers.get(number)?;
        self.room(id)
    }

    /// Snapshot of the whole catalog, ordered by ID.
    pub fn rooms(&self) -> Vec<Room> {
        let mut rooms: Vec<Room> = self.rooms.iter().map(|entry| entry.value().room()).collect();
        rooms.sort_by_key(|room| room.id);
        rooms
    }

    // === Availability ===

    /// Returns the rooms that can host the stay, cheapest first.
    ///
    /// A room qualifies when its flag is `Available`, its capacity covers
    /// the party, and no confirmed reservation holds any night in the
    /// requested range. Ties on price break by room number so the order is
    /// deterministic.
    ///
    /// # Errors
    ///
    /// [`BookingError::InvalidDateRange`] or [`BookingError::EmptyParty`]
    /// for malformed queries.
    pub fn search_available(&self, query: &AvailabilityQuery) -> Result<Vec<Room>, BookingError> {
        let (range, occupants) = query.validate()?;

        let mut matches: Vec<Room> = self
            .rooms
            .iter()
            .filter(|entry| entry.value().accepts(&range, occupants))
            .map(|entry| entry.value().room())
            .collect();
        matches.sort_by(|a, b| a.price.cmp(&b.price).then_with(|| a.number.cmp(&b.number)));
        Ok(matches)
    }

    /// Month view for one room: a flag per calendar day plus the confirmed
    /// reservations whose stay intersects the month.
    ///
    /// # Errors
    ///
    /// [`BookingError::RoomNotFound`], or [`BookingError::InvalidMonth`]
    /// when the month is outside `1..=12`.
    pub fn month_calendar(
        &self,
        room_id: RoomId,
        year: i32,
        month: u32,
    ) -> Result<MonthAvailability, BookingError> {
        let (first, last) = month_bounds(year, month)?;
        let reserved = {
            let calendar = self.rooms.get(&room_id).ok_or(BookingError::RoomNotFound)?;
            calendar.reserved_dates_between(first, last)
        };
        let days = month_days(first, last, &reserved);

        let mut reservations: Vec<Reservation> = self
            .reservations
            .iter()
            .filter(|entry| {
                let r = entry.value();
                r.room_id == room_id
                    && r.status == ReservationStatus::Confirmed
                    && intersects_window(r.check_in, r.check_out, first, last)
            })
            .map(|entry| entry.value().clone())
            .collect();
        reservations.sort_by_key(|r| (r.check_in, r.id));

        Ok(MonthAvailability {
            year,
            month,
            days,
            reservations,
        })
    }

    // === Booking ===

    /// Creates a confirmed reservation.
    ///
    /// The protocol runs inside the room's calendar lock: re-verify the
    /// manual status and capacity, re-verify that no confirmed reservation
    /// holds a night in the range, then allocate every night. All checks
    /// precede all writes, so an error never leaves partial state, and the
    /// lock serializes concurrent attempts so at most one wins any
    /// contested night. Payment arrives pre-validated; booking never flips
    /// the room's manual status.
    ///
    /// # Errors
    ///
    /// - [`BookingError::InvalidDateRange`] / [`BookingError::EmptyParty`] —
    ///   malformed request.
    /// - [`BookingError::RoomNotFound`] - unknown room ID.
    /// - [`BookingError::RoomNotAvailable`] - manual flag not available, or
    ///   capacity exceeded.
    /// - [`BookingError::DateConflict`] - some requested night is taken.
    pub fn book(&self, request: BookingRequest) -> Result<Reservation, BookingError> {
        let (range, occupants) = request.validate()?;

        let calendar = self
            .rooms
            .get(&request.room_id)
            .ok_or(BookingError::RoomNotFound)?;

        let id = ReservationId(self.next_reservation_id.fetch_add(1, Ordering::Relaxed));
        calendar.reserve(&range, occupants, id)?;

        let reservation = Reservation {
            id,
            room_id: request.room_id,
            guest: request.guest,
            check_in: request.check_in,
            check_out: request.check_out,
            adults: request.adults,
            children: request.children,
            total: request.total,
            payment_id: request.payment_id,
            payment_status: request.payment_status,
            status: ReservationStatus::Confirmed,
            created_at: Utc::now(),
        };
        self.reservations.insert(id, reservation.clone());
        Ok(reservation)
    }

    // === Cancellation ===

    /// Cancels a reservation, freeing its nights and recording a refund
    /// when the payment had completed.
    ///
    /// `today` is supplied by the caller (the clock lives at the process
    /// edge): cancellation is allowed only strictly before the check-in
    /// day. The guard runs on the reservation entry, which serializes
    /// racing cancellations of the same reservation; the loser observes
    /// the cancelled state and errors, so the ledger sees exactly one
    /// record. The refund is written before any state mutation; the night
    /// set is then freed in a single calendar-lock acquisition.
    ///
    /// # Errors
    ///
    /// - [`BookingError::ReservationNotFound`] - unknown ID.
    /// - [`BookingError::AlreadyCancelled`] - cancelled is terminal.
    /// - [`BookingError::CancellationWindowClosed`] - `today` on or after
    ///   the check-in day.
    pub fn cancel(
        &self,
        id: ReservationId,
        reason: Option<String>,
        today: NaiveDate,
    ) -> Result<CancellationOutcome, BookingError> {
        let (room_id, check_in, check_out, snapshot, refund) = {
            let mut entry = self
                .reservations
                .get_mut(&id)
                .ok_or(BookingError::ReservationNotFound)?;

            if entry.status == ReservationStatus::Cancelled {
                return Err(BookingError::AlreadyCancelled);
            }
            if today >= entry.check_in {
                return Err(BookingError::CancellationWindowClosed);
            }

            let refund = if entry.payment_status == PaymentStatus::Completed {
                let record = RefundRecord {
                    reservation_id: id,
                    amount: entry.total,
                    reason: reason.unwrap_or_else(|| DEFAULT_CANCEL_REASON.to_string()),
                    recorded_at: Utc::now(),
                };
                self.refunds.push(record.clone())?;
                Some(record)
            } else {
                None
            };

            entry.status = ReservationStatus::Cancelled;
            if refund.is_some() {
                entry.payment_status = PaymentStatus::Refunded;
            }
            (
                entry.room_id,
                entry.check_in,
                entry.check_out,
                entry.clone(),
                refund,
            )
            // entry guard dropped here, before the calendar lock below
        };

        if let Some(calendar) = self.rooms.get(&room_id) {
            calendar.release(id, check_in, check_out);
        }

        Ok(CancellationOutcome {
            reservation: snapshot,
            refund,
        })
    }

    // === Lookups ===

    /// Snapshot of one reservation.
    pub fn reservation(&self, id: ReservationId) -> Option<Reservation> {
        self.reservations.get(&id).map(|entry| entry.clone())
    }

    /// All reservations, ordered by ID.
    pub fn reservations(&self) -> Vec<Reservation> {
        let mut all: Vec<Reservation> = self
            .reservations
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        all.sort_by_key(|r| r.id);
        all
    }

    /// Reservations for one room, ordered by check-in date.
    pub fn reservations_for_room(&self, room_id: RoomId) -> Vec<Reservation> {
        let mut matches: Vec<Reservation> = self
            .reservations
            .iter()
            .filter(|entry| entry.value().room_id == room_id)
            .map(|entry| entry.value().clone())
            .collect();
        matches.sort_by_key(|r| (r.check_in, r.id));
        matches
    }

    /// Refund ledger snapshot, in append order.
    pub fn refunds(&self) -> Vec<RefundRecord> {
        self.refunds.snapshot()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
