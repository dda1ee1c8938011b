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

//! Thread-safe append-only refund ledger.
//!
//! Records at most one refund per reservation while preserving append
//! order for reconciliation exports.

use crate::base::ReservationId;
use crate::error::BookingError;
use crate::reservation::RefundRecord;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::Mutex;

/// Append-only refund log with exactly-once semantics per reservation.
///
/// A [`DashMap`] keyed by reservation gives O(1) duplicate detection; the
/// ordered log behind a mutex preserves append order for snapshots.
#[derive(Debug)]
pub struct RefundLedger {
    /// Refunds indexed by reservation ID for O(1) duplicate detection.
    by_reservation: DashMap<ReservationId, RefundRecord>,

    /// Append-order log backing [`snapshot`](Self::snapshot).
    entries: Mutex<Vec<RefundRecord>>,
}

impl RefundLedger {
    /// Creates a new empty ledger.
    pub fn new() -> Self {
        Self {
            by_reservation: DashMap::new(),
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Appends a refund record.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::RefundAlreadyRecorded`] if a record for the
    /// same reservation already exists.
    pub fn push(&self, record: RefundRecord) -> Result<(), BookingError> {
        // Entry API gives atomic check-and-insert, so two concurrent
        // cancellations can never both record a refund.
        match self.by_reservation.entry(record.reservation_id) {
            Entry::Occupied(_) => Err(BookingError::RefundAlreadyRecorded),
            Entry::Vacant(entry) => {
                entry.insert(record.clone());
                self.entries.lock().push(record);
                Ok(())
            }
        }
    }

    /// Looks up the refund for a reservation, if one was recorded.
    pub fn for_reservation(&self, reservation_id: ReservationId) -> Option<RefundRecord> {
        self.by_reservation
            .get(&reservation_id)
            .map(|r| r.value().clone())
    }

    /// All records in append order.
    pub fn snapshot(&self) -> Vec<RefundRecord> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Default for RefundLedger {
    fn default() -> Self {
        Self::new()
    }
}
