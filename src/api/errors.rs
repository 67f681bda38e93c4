use serde::{Deserialize, Serialize};

use crate::engine::{EngineError, ManagerError};

/// Ошибки внешнего API (то, что отдаём клиенту).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ApiError {
    /// Неправильные входные данные (битый payload и т.п.).
    BadRequest(String),

    /// Комната не найдена по коду.
    RoomNotFound(String),

    /// Игрок не находится в комнате.
    NotInRoom,

    /// Команда доступна только сидящему за столом.
    NotSeated,

    /// Свободных мест нет.
    SeatsFull,

    /// Команда доступна только хосту.
    NotHost,

    /// Отказ движка (фаза, очередь, баланс) — состояние не изменилось.
    EngineError(String),

    /// Внутренняя ошибка сервера.
    Internal(String),
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        ApiError::EngineError(err.to_string())
    }
}

impl From<ManagerError> for ApiError {
    fn from(err: ManagerError) -> Self {
        match err {
            ManagerError::RoomNotFound(id) => ApiError::Internal(format!("комната {id} исчезла")),
            ManagerError::UnknownRoomCode(code) => ApiError::RoomNotFound(code),
            ManagerError::NotInRoom(_) => ApiError::NotInRoom,
            ManagerError::NoSeat(_) => ApiError::NotSeated,
            ManagerError::SeatsFull => ApiError::SeatsFull,
            ManagerError::NotHost => ApiError::NotHost,
            ManagerError::Engine(e) => ApiError::EngineError(e.to_string()),
        }
    }
}
