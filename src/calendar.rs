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

//! Per-room reservation calendar.
//!
//! Each room's record and its night allocations live behind one mutex; a
//! lock acquisition is the room's transaction scope. Booking runs its whole
//! check-then-write sequence inside a single acquisition, so concurrent
//! attempts against the same room serialize and at most one wins any
//! contested night. Rooms are mutually independent.
//!
//! # Example
//!
//! ```
//! use booking_engine_rs::{Room, RoomCalendar, RoomId, RoomStatus};
//! use rust_decimal_macros::dec;
//!
//! let calendar = RoomCalendar::new(Room {
//!     id: RoomId(1),
//!     number: "101".into(),
//!     capacity: 2,
//!     price: dec!(100.00),
//!     status: RoomStatus::Available,
//! });
//! assert_eq!(calendar.allocated_nights(), 0);
//! ```

use crate::base::ReservationId;
use crate::booking::DateRange;
use crate::error::BookingError;
use crate::reservation::Reservation;
use crate::room::{Room, RoomStatus};
use chrono::{Datelike, Days, Months, NaiveDate};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug)]
struct CalendarState {
    room: Room,
    /// One entry per allocated night; only confirmed reservations ever hold
    /// entries, so key uniqueness is the no-double-booking invariant.
    allocations: BTreeMap<NaiveDate, ReservationId>,
}

impl CalendarState {
    fn check(&self, range: &DateRange, occupants: u32) -> Result<(), BookingError> {
        if self.room.status != RoomStatus::Available {
            return Err(BookingError::RoomNotAvailable);
        }
        if u32::from(self.room.capacity) < occupants {
            return Err(BookingError::RoomNotAvailable);
        }
        if self
            .allocations
            .range(range.check_in()..range.check_out())
            .next()
            .is_some()
        {
            return Err(BookingError::DateConflict);
        }
        Ok(())
    }
}

/// A room plus its authoritative conflict index.
#[derive(Debug)]
pub struct RoomCalendar {
    inner: Mutex<CalendarState>,
}

impl RoomCalendar {
    pub fn new(room: Room) -> Self {
        Self {
            inner: Mutex::new(CalendarState {
                room,
                allocations: BTreeMap::new(),
            }),
        }
    }

    /// Snapshot of the room record.
    pub fn room(&self) -> Room {
        self.inner.lock().room.clone()
    }

    /// Flips the operator occupancy flag and returns the updated record.
    ///
    /// Allocations are untouched: the flag and the calendar are independent.
    pub fn set_status(&self, status: RoomStatus) -> Room {
        let mut state = self.inner.lock();
        state.room.status = status;
        state.room.clone()
    }

    /// Read-only availability check used by search.
    pub fn accepts(&self, range: &DateRange, occupants: u32) -> bool {
        self.inner.lock().check(range, occupants).is_ok()
    }

    /// Runs the booking protocol for one room: verify status, capacity, and
    /// night conflicts, then allocate every night in the range.
    ///
    /// All checks precede all writes and the whole sequence holds the
    /// calendar lock, so a failure never leaves partial allocations and no
    /// concurrent reader observes an in-progress booking.
    ///
    /// # Errors
    ///
    /// - [`BookingError::RoomNotAvailable`] - flag not `Available`, or the
    ///   party exceeds capacity.
    /// - [`BookingError::DateConflict`] - some night in the range is held
    ///   by a confirmed reservation.
    pub fn reserve(
        &self,
        range: &DateRange,
        occupants: u32,
        reservation_id: ReservationId,
    ) -> Result<(), BookingError> {
        let mut state = self.inner.lock();
        state.check(range, occupants)?;
        for night in range.iter_nights() {
            state.allocations.insert(night, reservation_id);
        }
        Ok(())
    }

    /// Frees every night the reservation holds in `[check_in, check_out)`.
    ///
    /// One lock acquisition removes the whole set, so readers never observe
    /// a partially freed calendar. Returns the number of nights freed.
    pub fn release(
        &self,
        reservation_id: ReservationId,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> usize {
        let mut state = self.inner.lock();
        let owned: Vec<NaiveDate> = state
            .allocations
            .range(check_in..check_out)
            .filter(|(_, id)| **id == reservation_id)
            .map(|(night, _)| *night)
            .collect();
        for night in &owned {
            state.allocations.remove(night);
        }
        owned.len()
    }

    /// Allocated nights within `[from, to]`, ascending.
    pub fn reserved_dates_between(&self, from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
        self.inner
            .lock()
            .allocations
            .range(from..=to)
            .map(|(night, _)| *night)
            .collect()
    }

    /// Total allocated nights across the whole calendar.
    pub fn allocated_nights(&self) -> usize {
        self.inner.lock().allocations.len()
    }
}

/// Day flag in a month view.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DayState {
    Available,
    Reserved,
}

/// One calendar day of a month view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayAvailability {
    pub date: NaiveDate,
    /// Day of month, 1-based.
    pub day: u32,
    /// Day of week, 0 = Sunday.
    pub weekday: u32,
    pub state: DayState,
}

/// A room's month view: per-day flags plus the confirmed reservations whose
/// interval intersects the month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthAvailability {
    pub year: i32,
    pub month: u32,
    pub days: Vec<DayAvailability>,
    pub reservations: Vec<Reservation>,
}

/// First and last day of a month.
pub(crate) fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), BookingError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(BookingError::InvalidMonth)?;
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|d| d.checked_sub_days(Days::new(1)))
        .ok_or(BookingError::InvalidMonth)?;
    Ok((first, last))
}

/// Builds the per-day entries for `[first, last]` against a set of reserved
/// dates.
pub(crate) fn month_days(
    first: NaiveDate,
    last: NaiveDate,
    reserved: &[NaiveDate],
) -> Vec<DayAvailability> {
    first
        .iter_days()
        .take_while(|d| *d <= last)
        .map(|date| DayAvailability {
            date,
            day: date.day(),
            weekday: date.weekday().num_days_from_sunday(),
            state: if reserved.binary_search(&date).is_ok() {
                DayState::Reserved
            } else {
                DayState::Available
            },
        })
        .collect()
}

/// The three-way interval test used for listing a month's reservations:
/// check-in inside the window, check-out inside the window, or the stay
/// spanning it entirely. Bounds are inclusive on both dates, matching the
/// calendar views this feeds.
pub(crate) fn intersects_window(
    check_in: NaiveDate,
    check_out: NaiveDate,
    first: NaiveDate,
    last: NaiveDate,
) -> bool {
    (check_in >= first && check_in <= last)
        || (check_out >= first && check_out <= last)
        || (check_in <= first && check_out >= last)
}
