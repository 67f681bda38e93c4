use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::hand::BjHand;
use crate::domain::PlayerId;

/// Максимум рук на одно сиденье.
pub const MAX_HANDS_PER_SEAT: usize = 5;

/// Состояние сиденья за столом.
///
/// Флаги `connected` / `is_away` переключает внешний session-слой;
/// движок только читает их при проверке очереди и готовности.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Seat {
    pub player_id: PlayerId,
    pub display_name: String,
    /// Текущий баланс (ставки списываются сразу при их приёме).
    pub balance: Chips,
    /// С чем игрок сел за стол.
    pub buy_in: Chips,
    /// Руки текущего раунда (1–5). Пусто между раундами.
    pub hands: Vec<BjHand>,
    /// Сайд-ставка раунда (на «дилер переберёт ровно 22»).
    pub side_bet: Chips,
    /// Ставка этого раунда принята.
    pub has_bet: bool,
    /// Готов к следующему раунду (фаза Settlement).
    pub is_ready: bool,
    pub connected: bool,
    pub is_away: bool,
}

impl Seat {
    pub fn new(player_id: PlayerId, display_name: String, buy_in: Chips) -> Self {
        Self {
            player_id,
            display_name,
            balance: buy_in,
            buy_in,
            hands: Vec::new(),
            side_bet: Chips::ZERO,
            has_bet: false,
            is_ready: false,
            connected: true,
            is_away: false,
        }
    }

    /// Участвует ли сиденье в текущем раунде.
    pub fn is_in_round(&self) -> bool {
        self.has_bet && !self.hands.is_empty()
    }

    /// Может ли сиденье сейчас действовать / принимать решения.
    pub fn is_present(&self) -> bool {
        self.connected && !self.is_away
    }

    /// Сброс пер-раундового состояния (руки, ставки, флаги).
    pub fn reset_for_next_round(&mut self) {
        self.hands.clear();
        self.side_bet = Chips::ZERO;
        self.has_bet = false;
        self.is_ready = false;
    }
}
