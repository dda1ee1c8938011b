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

use booking_engine_rs::{
    BookingError, BookingRequest, Engine, GuestDetails, NewRoom, PaymentStatus, ReservationId,
    ReservationStatus,
};
use chrono::NaiveDate;
use clap::Parser;
use csv::{ReaderBuilder, Trim, Writer};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::PathBuf;
use std::process;

/// Booking Engine - Replay booking command CSV files
///
/// Reads booking commands from a CSV file and outputs reservation states
/// to stdout. Supports room registration, bookings, and cancellations.
#[derive(Parser, Debug)]
#[command(name = "booking-engine-rs")]
#[command(about = "A booking engine that replays reservation command CSVs", long_about = None)]
struct Args {
    /// Path to CSV file with booking commands
    ///
    /// Expected format: type,room,capacity,price,check_in,check_out,adults,children,paid,total,reservation,today
    /// Example: cargo run -- commands.csv > reservations.csv
    #[arg(value_name = "FILE")]
    input: PathBuf,
}

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // Open input file
    let file = match File::open(&args.input) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error opening file '{}': {}", args.input.display(), e);
            process::exit(1);
        }
    };

    // Replay commands from CSV
    let engine = match process_commands(BufReader::new(file)) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Error processing commands: {}", e);
            process::exit(1);
        }
    };

    // Write results to stdout
    if let Err(e) = write_reservations(&engine, std::io::stdout()) {
        eprintln!("Error writing output: {}", e);
        process::exit(1);
    }
}

/// Raw CSV record matching the input format.
///
/// Fields: `type, room, capacity, price, check_in, check_out, adults,
/// children, paid, total, reservation, today`
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(rename = "type")]
    op: String,
    #[serde(deserialize_with = "csv::invalid_option")]
    room: Option<String>,
    #[serde(deserialize_with = "csv::invalid_option")]
    capacity: Option<u16>,
    #[serde(deserialize_with = "csv::invalid_option")]
    price: Option<Decimal>,
    #[serde(deserialize_with = "csv::invalid_option")]
    check_in: Option<NaiveDate>,
    #[serde(deserialize_with = "csv::invalid_option")]
    check_out: Option<NaiveDate>,
    #[serde(deserialize_with = "csv::invalid_option")]
    adults: Option<u16>,
    #[serde(deserialize_with = "csv::invalid_option")]
    children: Option<u16>,
    #[serde(deserialize_with = "csv::invalid_option")]
    paid: Option<bool>,
    #[serde(deserialize_with = "csv::invalid_option")]
    total: Option<Decimal>,
    #[serde(deserialize_with = "csv::invalid_option")]
    reservation: Option<u32>,
    #[serde(deserialize_with = "csv::invalid_option")]
    today: Option<NaiveDate>,
}

/// A parsed replay command.
#[derive(Debug)]
enum Command {
    AddRoom {
        number: String,
        capacity: u16,
        price: Decimal,
    },
    Book {
        room: String,
        check_in: NaiveDate,
        check_out: NaiveDate,
        adults: u16,
        children: u16,
        paid: bool,
        total: Decimal,
    },
    Cancel {
        reservation: u32,
        today: NaiveDate,
    },
}

impl CsvRecord {
    /// Converts a CSV record to a command.
    ///
    /// Returns `None` for unknown command types or missing required fields.
    fn into_command(self) -> Option<Command> {
        match self.op.to_lowercase().as_str() {
            "room" => Some(Command::AddRoom {
                number: self.room?,
                capacity: self.capacity?,
                price: self.price?,
            }),
            "book" => Some(Command::Book {
                room: self.room?,
                check_in: self.check_in?,
                check_out: self.check_out?,
                adults: self.adults?,
                children: self.children.unwrap_or(0),
                // gateway-settled payments are the normal replay case
                paid: self.paid.unwrap_or(true),
                total: self.total?,
            }),
            "cancel" => Some(Command::Cancel {
                reservation: self.reservation?,
                today: self.today?,
            }),
            _ => None,
        }
    }
}

/// Placeholder guest used for replayed bookings; replay files carry no
/// contact data.
fn replay_guest() -> GuestDetails {
    GuestDetails {
        first_name: "Replay".into(),
        last_name: "Guest".into(),
        email: "replay@example.com".into(),
        phone: "000".into(),
        nationality: None,
    }
}

/// Replays commands from a CSV reader against a fresh engine.
///
/// Streaming parsing handles arbitrarily large files. Malformed rows and
/// rejected commands (conflicts, closed cancellation windows, unknown
/// rooms) are silently skipped; the replay continues.
///
/// # CSV Format
///
/// Columns: `type, room, capacity, price, check_in, check_out, adults,
/// children, paid, total, reservation, today`
/// - `type`: Command (room, book, cancel)
/// - `room`: Room number (room/book commands)
/// - `paid`: `true` if the payment settled (book; defaults to true)
/// - `reservation`/`today`: cancel target and the date the cancellation
///   was requested
///
/// # Example
///
/// ```csv
/// type,room,capacity,price,check_in,check_out,adults,children,paid,total,reservation,today
/// room,101,2,100.00,,,,,,,,
/// book,101,,,2025-06-01,2025-06-03,2,0,true,200.00,,
/// cancel,,,,,,,,,,1,2025-05-30
/// ```
///
/// # Errors
///
/// Returns a CSV error if the reader fails or the CSV structure is invalid.
pub fn process_commands<R: Read>(reader: R) -> Result<Engine, csv::Error> {
    let engine = Engine::new();

    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All) // Handle whitespace in fields like " book "
        .flexible(true) // Tolerate ragged rows
        .has_headers(true) // Skip first row as header
        .from_reader(reader);

    for result in rdr.deserialize::<CsvRecord>() {
        match result {
            Ok(record) => {
                let Some(command) = record.into_command() else {
                    #[cfg(debug_assertions)]
                    eprintln!("Skipping invalid command record");
                    continue;
                };
                if let Err(_e) = apply_command(&engine, command) {
                    #[cfg(debug_assertions)]
                    eprintln!("Skipping rejected command: {}", _e);
                }
            }
            Err(_e) => {
                // Skip malformed rows
                #[cfg(debug_assertions)]
                eprintln!("Skipping malformed row: {}", _e);
                continue;
            }
        }
    }

    Ok(engine)
}

fn apply_command(engine: &Engine, command: Command) -> Result<(), BookingError> {
    match command {
        Command::AddRoom {
            number,
            capacity,
            price,
        } => {
            engine.add_room(NewRoom {
                number,
                capacity,
                price,
                status: Default::default(),
            })?;
        }
        Command::Book {
            room,
            check_in,
            check_out,
            adults,
            children,
            paid,
            total,
        } => {
            let room = engine
                .room_by_number(&room)
                .ok_or(BookingError::RoomNotFound)?;
            engine.book(BookingRequest {
                room_id: room.id,
                guest: replay_guest(),
                check_in,
                check_out,
                adults,
                children,
                payment_id: format!("replay-{}", room.number),
                payment_status: if paid {
                    PaymentStatus::Completed
                } else {
                    PaymentStatus::Pending
                },
                total,
            })?;
        }
        Command::Cancel { reservation, today } => {
            engine.cancel(ReservationId(reservation), None, today)?;
        }
    }
    Ok(())
}

/// Flat output row, one per reservation.
#[derive(Debug, Serialize)]
struct ReservationRow {
    id: u32,
    room: String,
    check_in: NaiveDate,
    check_out: NaiveDate,
    nights: i64,
    total: Decimal,
    status: ReservationStatus,
    payment_status: PaymentStatus,
}

/// Write reservation states to a CSV writer.
///
/// Outputs all reservations, in creation order, including cancelled ones.
///
/// # CSV Format
///
/// Columns: `id, room, check_in, check_out, nights, total, status,
/// payment_status`
///
/// # Errors
///
/// Returns a CSV error if writing fails.
pub fn write_reservations<W: Write>(engine: &Engine, writer: W) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);

    for reservation in engine.reservations() {
        let room = engine
            .room(reservation.room_id)
            .map(|room| room.number)
            .unwrap_or_default();
        wtr.serialize(ReservationRow {
            id: reservation.id.0,
            room,
            check_in: reservation.check_in,
            check_out: reservation.check_out,
            nights: reservation.nights(),
            total: reservation.total,
            status: reservation.status,
            payment_status: reservation.payment_status,
        })?;
    }

    // Flush to ensure all data is written
    wtr.flush()?;
    Ok(())
}
