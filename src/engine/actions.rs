use serde::{Deserialize, Serialize};

use crate::domain::{PlayerId, SeatIndex};

/// Ход игрока по активной руке.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlayerMove {
    /// Взять одну карту.
    Hit,
    /// Остановиться, ход уходит дальше.
    Stand,
    /// Удвоение (возможно повторное) с эскалацией ставки.
    Double,
}

/// Конкретное действие игрока: кто, с какого места, что делает.
/// Какая рука — решает стол: мутировать можно только активную.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerAction {
    pub player_id: PlayerId,
    pub seat: SeatIndex,
    pub kind: PlayerMove,
}
