//! Simple REST API server example for the booking engine.
//!
//! Run with: `cargo run --example server`
//!
//! ## Endpoints
//!
//! - `POST /api/habitaciones` - Register a room
//! - `GET /api/habitaciones` - List rooms
//! - `PATCH /api/habitaciones/{id}/estado` - Flip a room's manual status
//! - `POST /api/habitaciones/disponibles` - Search available rooms
//! - `GET /api/habitaciones/{id}/disponibilidad` - Month calendar view
//! - `POST /api/reservas/crear` - Create a reservation
//! - `GET /api/reservas/{id}` - Get a reservation
//! - `PATCH /api/reservas/{id}/cancelar` - Cancel a reservation
//!
//! ## Example Usage
//!
//! ```bash
//! # Register a room
//! curl -X POST http://localhost:3000/api/habitaciones \
//!   -H "Content-Type: application/json" \
//!   -d '{"numero": "101", "capacidad": 2, "precio": "100.00"}'
//!
//! # Search availability
//! curl -X POST http://localhost:3000/api/habitaciones/disponibles \
//!   -H "Content-Type: application/json" \
//!   -d '{"entrada": "2025-06-01", "salida": "2025-06-03", "adultos": 2, "ninos": 0}'
//!
//! # Book
//! curl -X POST http://localhost:3000/api/reservas/crear \
//!   -H "Content-Type: application/json" \
//!   -d '{"habitacion_id": 1,
//!        "datos_personales": {"nombre": "Ana", "apellido": "Suarez",
//!                             "email": "ana@example.com", "telefono": "+34 600 000 001"},
//!        "datos_busqueda": {"entrada": "2025-06-01", "salida": "2025-06-03",
//!                           "adultos": 2, "ninos": 0},
//!        "pago_id": "pay-123", "total": "200.00"}'
//!
//! # Cancel
//! curl -X PATCH http://localhost:3000/api/reservas/1/cancelar \
//!   -H "Content-Type: application/json" \
//!   -d '{"motivo": "change of plans"}'
//! ```

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use booking_engine_rs::{
    AvailabilityQuery, BookingError, BookingRequest, DayState, Engine, ErrorCategory,
    GuestDetails, NewRoom, PaymentStatus, Reservation, ReservationId, Room, RoomId, RoomStatus,
};
use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;

// === Request/Response DTOs ===
//
// The wire shapes (Spanish field names) follow the upstream hotel API this
// engine backs; the engine itself speaks the typed English API.

#[derive(Debug, Deserialize)]
struct CrearHabitacion {
    numero: String,
    capacidad: u16,
    precio: Decimal,
    #[serde(default)]
    estado: RoomStatus,
}

#[derive(Debug, Deserialize)]
struct CambiarEstado {
    estado: RoomStatus,
}

#[derive(Debug, Deserialize)]
struct BusquedaDisponibles {
    entrada: Option<NaiveDate>,
    salida: Option<NaiveDate>,
    adultos: u16,
    #[serde(default)]
    ninos: u16,
}

#[derive(Debug, Serialize)]
struct HabitacionResponse {
    id: u16,
    numero: String,
    capacidad: u16,
    precio: Decimal,
    estado: RoomStatus,
}

impl From<Room> for HabitacionResponse {
    fn from(room: Room) -> Self {
        Self {
            id: room.id.0,
            numero: room.number,
            capacidad: room.capacity,
            precio: room.price,
            estado: room.status,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DatosPersonales {
    nombre: String,
    apellido: String,
    email: String,
    telefono: String,
    nacionalidad: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DatosBusqueda {
    entrada: Option<NaiveDate>,
    salida: Option<NaiveDate>,
    adultos: u16,
    #[serde(default)]
    ninos: u16,
}

#[derive(Debug, Deserialize)]
struct CrearReserva {
    habitacion_id: u16,
    datos_personales: DatosPersonales,
    datos_busqueda: DatosBusqueda,
    pago_id: String,
    total: Decimal,
}

#[derive(Debug, Serialize)]
struct ReservaResumen {
    id: u32,
    habitacion: String,
    cliente: String,
    email: String,
    entrada: NaiveDate,
    salida: NaiveDate,
    total: Decimal,
    #[serde(rename = "pagoId")]
    pago_id: String,
}

#[derive(Debug, Serialize)]
struct ReservaCreada {
    #[serde(rename = "reservaId")]
    reserva_id: u32,
    reserva: ReservaResumen,
    message: String,
}

#[derive(Debug, Default, Deserialize)]
struct CancelarBody {
    motivo: Option<String>,
}

#[derive(Debug, Serialize)]
struct Reembolso {
    monto: Decimal,
    motivo: String,
}

#[derive(Debug, Serialize)]
struct CancelacionResponse {
    message: String,
    reembolso: Option<Reembolso>,
}

#[derive(Debug, Deserialize)]
struct CalendarioQuery {
    mes: Option<u32>,
    #[serde(alias = "año")]
    anio: Option<i32>,
}

#[derive(Debug, Serialize)]
struct DiaResponse {
    fecha: NaiveDate,
    dia: u32,
    #[serde(rename = "diaSemana")]
    dia_semana: u32,
    estado: &'static str,
}

#[derive(Debug, Serialize)]
struct ReservaCalendario {
    id: u32,
    cliente_nombre: String,
    cliente_apellido: String,
    fecha_entrada: NaiveDate,
    fecha_salida: NaiveDate,
    estado: booking_engine_rs::ReservationStatus,
}

impl From<Reservation> for ReservaCalendario {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id.0,
            cliente_nombre: r.guest.first_name,
            cliente_apellido: r.guest.last_name,
            fecha_entrada: r.check_in,
            fecha_salida: r.check_out,
            estado: r.status,
        }
    }
}

#[derive(Debug, Serialize)]
struct CalendarioResponse {
    mes: u32,
    #[serde(rename = "año")]
    anio: i32,
    dias: Vec<DiaResponse>,
    reservas: Vec<ReservaCalendario>,
    #[serde(rename = "totalReservas")]
    total_reservas: usize,
}

/// Response body for errors.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    code: String,
}

// === Application State ===

/// Shared application state containing the booking engine.
#[derive(Clone)]
struct AppState {
    engine: Arc<Engine>,
}

// === Error Handling ===

/// Wrapper for converting `BookingError` into HTTP responses.
struct AppError(BookingError);

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Storage-level failures have no producer in the embedded engine;
        // anything else reaching here maps through the taxonomy. Raw
        // internals are never echoed to clients.
        let status = match self.0.category() {
            ErrorCategory::Validation => StatusCode::BAD_REQUEST,
            ErrorCategory::NotFound => StatusCode::NOT_FOUND,
            ErrorCategory::Conflict => StatusCode::CONFLICT,
            ErrorCategory::State => StatusCode::UNPROCESSABLE_ENTITY,
        };

        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
                code: self.0.code().to_string(),
            }),
        )
            .into_response()
    }
}

// === Handlers ===

/// POST /api/habitaciones - Register a room.
async fn crear_habitacion(
    State(state): State<AppState>,
    Json(request): Json<CrearHabitacion>,
) -> Result<(StatusCode, Json<HabitacionResponse>), AppError> {
    let room = state.engine.add_room(NewRoom {
        number: request.numero,
        capacity: request.capacidad,
        price: request.precio,
        status: request.estado,
    })?;
    Ok((StatusCode::CREATED, Json(room.into())))
}

/// GET /api/habitaciones - List all rooms.
async fn listar_habitaciones(State(state): State<AppState>) -> Json<Vec<HabitacionResponse>> {
    Json(state.engine.rooms().into_iter().map(Into::into).collect())
}

/// PATCH /api/habitaciones/{id}/estado - Flip a room's manual status.
async fn cambiar_estado(
    State(state): State<AppState>,
    Path(id): Path<u16>,
    Json(request): Json<CambiarEstado>,
) -> Result<Json<HabitacionResponse>, AppError> {
    let room = state.engine.set_room_status(RoomId(id), request.estado)?;
    Ok(Json(room.into()))
}

/// POST /api/habitaciones/disponibles - Search available rooms.
async fn buscar_disponibles(
    State(state): State<AppState>,
    Json(request): Json<BusquedaDisponibles>,
) -> Result<Json<Vec<HabitacionResponse>>, AppError> {
    let (entrada, salida) = match (request.entrada, request.salida) {
        (Some(entrada), Some(salida)) => (entrada, salida),
        _ => return Err(AppError(BookingError::MissingDates)),
    };
    let rooms = state.engine.search_available(&AvailabilityQuery {
        check_in: entrada,
        check_out: salida,
        adults: request.adultos,
        children: request.ninos,
    })?;
    Ok(Json(rooms.into_iter().map(Into::into).collect()))
}

/// GET /api/habitaciones/{id}/disponibilidad - Month calendar view.
async fn disponibilidad_mensual(
    State(state): State<AppState>,
    Path(id): Path<u16>,
    Query(query): Query<CalendarioQuery>,
) -> Result<Json<CalendarioResponse>, AppError> {
    // Default to the current month, like the upstream API
    let today = Utc::now().date_naive();
    let mes = query.mes.unwrap_or_else(|| today.month());
    let anio = query.anio.unwrap_or_else(|| today.year());

    let month = state.engine.month_calendar(RoomId(id), anio, mes)?;
    let dias = month
        .days
        .iter()
        .map(|day| DiaResponse {
            fecha: day.date,
            dia: day.day,
            dia_semana: day.weekday,
            estado: match day.state {
                DayState::Reserved => "reservada",
                DayState::Available => "disponible",
            },
        })
        .collect();
    let total_reservas = month.reservations.len();
    Ok(Json(CalendarioResponse {
        mes,
        anio,
        dias,
        reservas: month.reservations.into_iter().map(Into::into).collect(),
        total_reservas,
    }))
}

/// POST /api/reservas/crear - Create a reservation.
async fn crear_reserva(
    State(state): State<AppState>,
    Json(request): Json<CrearReserva>,
) -> Result<(StatusCode, Json<ReservaCreada>), AppError> {
    let (entrada, salida) = match (request.datos_busqueda.entrada, request.datos_busqueda.salida)
    {
        (Some(entrada), Some(salida)) => (entrada, salida),
        _ => return Err(AppError(BookingError::MissingDates)),
    };

    let reservation = state.engine.book(BookingRequest {
        room_id: RoomId(request.habitacion_id),
        guest: GuestDetails {
            first_name: request.datos_personales.nombre,
            last_name: request.datos_personales.apellido,
            email: request.datos_personales.email,
            phone: request.datos_personales.telefono,
            nationality: request.datos_personales.nacionalidad,
        },
        check_in: entrada,
        check_out: salida,
        adults: request.datos_busqueda.adultos,
        children: request.datos_busqueda.ninos,
        payment_id: request.pago_id.clone(),
        // the gateway confirmed the charge before this endpoint is called
        payment_status: PaymentStatus::Completed,
        total: request.total,
    })?;

    let habitacion = state
        .engine
        .room(reservation.room_id)
        .map(|room| room.number)
        .unwrap_or_default();
    let response = ReservaCreada {
        reserva_id: reservation.id.0,
        reserva: ReservaResumen {
            id: reservation.id.0,
            habitacion,
            cliente: reservation.guest.full_name(),
            email: reservation.guest.email.clone(),
            entrada: reservation.check_in,
            salida: reservation.check_out,
            total: reservation.total,
            pago_id: reservation.payment_id.clone(),
        },
        message: "Reserva creada exitosamente".to_string(),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/reservas/{id} - Get a reservation.
async fn obtener_reserva(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<ReservaCalendario>, AppError> {
    state
        .engine
        .reservation(ReservationId(id))
        .map(|reservation| Json(reservation.into()))
        .ok_or(AppError(BookingError::ReservationNotFound))
}

/// PATCH /api/reservas/{id}/cancelar - Cancel a reservation.
async fn cancelar_reserva(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    body: Option<Json<CancelarBody>>,
) -> Result<Json<CancelacionResponse>, AppError> {
    let motivo = body.and_then(|Json(b)| b.motivo);
    let today = Utc::now().date_naive();

    let outcome = state.engine.cancel(ReservationId(id), motivo, today)?;
    Ok(Json(CancelacionResponse {
        message: "Reserva cancelada exitosamente".to_string(),
        reembolso: outcome.refund.map(|refund| Reembolso {
            monto: refund.amount,
            motivo: refund.reason,
        }),
    }))
}

// === Router ===

fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/habitaciones", post(crear_habitacion).get(listar_habitaciones))
        .route("/api/habitaciones/{id}/estado", patch(cambiar_estado))
        .route("/api/habitaciones/disponibles", post(buscar_disponibles))
        .route(
            "/api/habitaciones/{id}/disponibilidad",
            get(disponibilidad_mensual),
        )
        .route("/api/reservas/crear", post(crear_reserva))
        .route("/api/reservas/{id}", get(obtener_reserva))
        .route("/api/reservas/{id}/cancelar", patch(cancelar_reserva))
        .with_state(state)
}

// === Main ===

#[tokio::main]
async fn main() {
    let state = AppState {
        engine: Arc::new(Engine::new()),
    };

    let app = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:3000").await.unwrap();
    println!("Booking API server running on http://127.0.0.1:3000");
    println!();
    println!("Endpoints:");
    println!("  POST  /api/habitaciones                      - Register a room");
    println!("  GET   /api/habitaciones                      - List rooms");
    println!("  PATCH /api/habitaciones/:id/estado           - Flip manual status");
    println!("  POST  /api/habitaciones/disponibles          - Search availability");
    println!("  GET   /api/habitaciones/:id/disponibilidad   - Month calendar");
    println!("  POST  /api/reservas/crear                    - Create a reservation");
    println!("  GET   /api/reservas/:id                      - Get a reservation");
    println!("  PATCH /api/reservas/:id/cancelar             - Cancel a reservation");

    axum::serve(listener, app).await.unwrap();
}
