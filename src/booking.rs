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

//! Booking inputs: stay intervals, guest details, and request payloads.
//!
//! A stay is a half-open date interval `[check_in, check_out)`: the guest
//! sleeps every night from check-in up to, but not including, check-out day.
//! Back-to-back stays sharing a turnover day therefore never conflict.

use crate::base::RoomId;
use crate::error::BookingError;
use crate::reservation::PaymentStatus;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A validated half-open stay interval.
///
/// Construction enforces strict `check_in < check_out`, so a `DateRange`
/// always covers at least one night.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl DateRange {
    /// Builds a range, rejecting inverted or zero-length intervals.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::InvalidDateRange`] if `check_out <= check_in`.
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self, BookingError> {
        if check_out <= check_in {
            return Err(BookingError::InvalidDateRange);
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    /// Number of nights covered; always at least 1.
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// Iterates the nights in `[check_in, check_out)`.
    pub fn iter_nights(&self) -> impl Iterator<Item = NaiveDate> {
        let check_out = self.check_out;
        self.check_in.iter_days().take_while(move |d| *d < check_out)
    }
}

/// Guest contact fields, passed through verbatim; identity is owned upstream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GuestDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub nationality: Option<String>,
}

impl GuestDetails {
    /// Display name, `"First Last"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Availability search input.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub adults: u16,
    pub children: u16,
}

impl AvailabilityQuery {
    /// Validates dates and party size.
    ///
    /// # Errors
    ///
    /// [`BookingError::InvalidDateRange`] for inverted/empty intervals,
    /// [`BookingError::EmptyParty`] when no occupants were requested.
    pub fn validate(&self) -> Result<(DateRange, u32), BookingError> {
        let range = DateRange::new(self.check_in, self.check_out)?;
        let occupants = u32::from(self.adults) + u32::from(self.children);
        if occupants == 0 {
            return Err(BookingError::EmptyParty);
        }
        Ok((range, occupants))
    }
}

/// A complete booking request.
///
/// Payment is assumed pre-validated by the upstream gateway; only its id,
/// settled amount, and status arrive here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub room_id: RoomId,
    pub guest: GuestDetails,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub adults: u16,
    pub children: u16,
    pub payment_id: String,
    pub payment_status: PaymentStatus,
    pub total: Decimal,
}

impl BookingRequest {
    /// Validates dates and party size; same rules as availability search.
    pub fn validate(&self) -> Result<(DateRange, u32), BookingError> {
        AvailabilityQuery {
            check_in: self.check_in,
            check_out: self.check_out,
            adults: self.adults,
            children: self.children,
        }
        .validate()
    }
}
