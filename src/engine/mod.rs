//! Движок раунда: фазы, легальность действий, расчёт, комнаты.
//!
//! Основные операции:
//!   - `round::start_round` / `round::place_bet` — запуск и ставки;
//!   - `round::apply_player_action` — ход по активной руке;
//!   - `round::mark_ready` — переход к следующему раунду;
//!   - `RoomManager` — маршрутизация команд по комнатам.

pub mod actions;
pub mod errors;
pub mod hand_history;
pub mod positions;
pub mod room_manager;
pub mod round;
pub mod rules;
pub mod settlement;
pub mod validation;

pub use actions::{PlayerAction, PlayerMove};
pub use errors::EngineError;
pub use hand_history::{HandHistoryRecord, RoomJournal, RoundEvent, RoundEventKind};
pub use room_manager::{ManagerError, Room, RoomManager};
pub use round::{DiceRoll, DiceRollSeat};
pub use rules::AvailableActions;
