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

//! Reservation records and the lifecycle enums.
//!
//! Reservation state machine:
//! - the engine creates reservations as [`Confirmed`]
//! - [`Confirmed`] → [`Cancelled`] (via cancel, strictly before check-in day)
//! - [`Pending`] exists for manually imported bookings and is cancellable
//!   under the same window rule; no engine path produces it
//! - [`Completed`] is an externally observed post-stay fact, not a guarded
//!   transition
//!
//! [`Confirmed`]: ReservationStatus::Confirmed
//! [`Cancelled`]: ReservationStatus::Cancelled
//! [`Pending`]: ReservationStatus::Pending
//! [`Completed`]: ReservationStatus::Completed

use crate::base::{ReservationId, RoomId};
use crate::booking::GuestDetails;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Refunded,
}

/// A guest's date-ranged claim on a room.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reservation {
    pub id: ReservationId,
    pub room_id: RoomId,
    pub guest: GuestDetails,
    /// First night of the stay.
    pub check_in: NaiveDate,
    /// Day the room is vacated; not slept, never allocated.
    pub check_out: NaiveDate,
    pub adults: u16,
    pub children: u16,
    pub total: Decimal,
    pub payment_id: String,
    pub payment_status: PaymentStatus,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    /// Number of allocated nights.
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }
}

/// Bookkeeping entry written when a paid reservation is cancelled.
///
/// No money moves here; the ledger exists for reconciliation with the
/// payment gateway.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefundRecord {
    pub reservation_id: ReservationId,
    /// Always the reservation's full total.
    pub amount: Decimal,
    pub reason: String,
    pub recorded_at: DateTime<Utc>,
}

/// Result of a successful cancellation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CancellationOutcome {
    /// The reservation after the state change.
    pub reservation: Reservation,
    /// Present only when the cancelled reservation had a completed payment.
    pub refund: Option<RefundRecord>,
}
