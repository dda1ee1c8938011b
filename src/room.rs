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

//! Room catalog records.
//!
//! A room carries a manual occupancy flag set by operators at check-in and
//! check-out. The flag and the reservation calendar are independent axes:
//! flipping it never touches night allocations, and allocations never flip it.

use crate::base::RoomId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Operator-set room status.
///
/// Gates the entry check of booking and the availability search only; it is
/// not consulted by calendar or cancellation code paths.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    #[default]
    Available,
    Occupied,
    Maintenance,
}

/// A bookable room.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Room {
    pub id: RoomId,
    /// Door number, unique across the catalog.
    pub number: String,
    /// Maximum occupants (adults + children).
    pub capacity: u16,
    /// Price per night.
    pub price: Decimal,
    pub status: RoomStatus,
}

/// Payload for registering a room with the engine.
///
/// The engine assigns the [`RoomId`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRoom {
    pub number: String,
    pub capacity: u16,
    pub price: Decimal,
    #[serde(default)]
    pub status: RoomStatus,
}
