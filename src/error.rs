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

//! Error types for booking operations.

use thiserror::Error;

/// Booking operation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// Check-in or check-out date is missing from the request
    #[error("check-in and check-out dates are required")]
    MissingDates,

    /// Check-out is on or before check-in
    #[error("check-out date must be after check-in date")]
    InvalidDateRange,

    /// Requested occupancy is zero
    #[error("at least one occupant is required")]
    EmptyParty,

    /// Month number outside 1..=12 or year out of calendar range
    #[error("invalid calendar month")]
    InvalidMonth,

    /// Referenced room ID does not exist
    #[error("room not found")]
    RoomNotFound,

    /// Referenced reservation ID does not exist
    #[error("reservation not found")]
    ReservationNotFound,

    /// Another room already uses the requested room number
    #[error("room number already in use")]
    DuplicateRoomNumber,

    /// Room is flagged occupied/maintenance, or too small for the party
    #[error("room is not available for booking")]
    RoomNotAvailable,

    /// A confirmed reservation already holds a night in the requested range
    #[error("room is already reserved for those dates")]
    DateConflict,

    /// A refund was already written for this reservation
    #[error("refund already recorded for this reservation")]
    RefundAlreadyRecorded,

    /// Reservation was cancelled previously
    #[error("reservation is already cancelled")]
    AlreadyCancelled,

    /// Cancellation requested on or after the check-in day
    #[error("reservations cannot be cancelled on or after the check-in day")]
    CancellationWindowClosed,
}

/// Coarse error classes, mirroring what callers need for response mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Conflict,
    State,
}

impl BookingError {
    /// Returns the taxonomy class this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingDates | Self::InvalidDateRange | Self::EmptyParty | Self::InvalidMonth => {
                ErrorCategory::Validation
            }
            Self::RoomNotFound | Self::ReservationNotFound => ErrorCategory::NotFound,
            Self::DuplicateRoomNumber
            | Self::RoomNotAvailable
            | Self::DateConflict
            | Self::RefundAlreadyRecorded => ErrorCategory::Conflict,
            Self::AlreadyCancelled | Self::CancellationWindowClosed => ErrorCategory::State,
        }
    }

    /// Stable machine-readable code for API responses.
    ///
    /// Raw storage/internal details are never surfaced to callers; these
    /// codes are the whole contract.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingDates => "MISSING_DATES",
            Self::InvalidDateRange => "INVALID_DATE_RANGE",
            Self::EmptyParty => "EMPTY_PARTY",
            Self::InvalidMonth => "INVALID_MONTH",
            Self::RoomNotFound => "ROOM_NOT_FOUND",
            Self::ReservationNotFound => "RESERVATION_NOT_FOUND",
            Self::DuplicateRoomNumber => "DUPLICATE_ROOM_NUMBER",
            Self::RoomNotAvailable => "ROOM_NOT_AVAILABLE",
            Self::DateConflict => "DATE_CONFLICT",
            Self::RefundAlreadyRecorded => "REFUND_ALREADY_RECORDED",
            Self::AlreadyCancelled => "ALREADY_CANCELLED",
            Self::CancellationWindowClosed => "CANCELLATION_WINDOW_CLOSED",
        }
    }
}
