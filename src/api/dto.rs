use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::{HandAction, HandOutcome, RoundSettlement};
use crate::domain::table::{ActiveCursor, RoundPhase, SeedReveal};
use crate::domain::{PlayerId, RoomId};
use crate::engine::round::DiceRoll;
use crate::engine::rules::AvailableActions;

/// DTO одной руки. Руки всех мест видны всем — прячется только
/// закрытая карта дилера.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HandView {
    pub cards: Vec<Card>,
    pub value: u8,
    pub is_soft: bool,
    pub original_bet: Chips,
    pub double_count: u32,
    pub total_wager: Chips,
    pub just_doubled_on_lone_ace: bool,
    pub finished: bool,
    pub result: Option<HandOutcome>,
    pub actions: Vec<HandAction>,
    /// Доступные действия — только для активной руки самого зрителя.
    pub available: Option<AvailableActions>,
}

/// DTO сиденья.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SeatView {
    pub seat_index: u8,
    pub player_id: PlayerId,
    pub display_name: String,
    pub balance: Chips,
    pub buy_in: Chips,
    pub hands: Vec<HandView>,
    pub side_bet: Chips,
    pub has_bet: bool,
    pub is_ready: bool,
    pub connected: bool,
    pub is_away: bool,
    pub is_button: bool,
    /// Решение по страховке, если уже принято.
    pub insurance_taken: Option<bool>,
    pub insurance_bet: Chips,
}

/// Карты дилера глазами клиента: None — рубашка (закрытая карта).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DealerView {
    pub cards: Vec<Option<Card>>,
    /// Тотал только по видимым картам.
    pub visible_value: u8,
    pub hole_revealed: bool,
}

/// Provably-fair блок: commitment текущего раунда плюс полное раскрытие
/// предыдущего — этого достаточно, чтобы клиент сам пересчитал шуз
/// и сверил розданную последовательность.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProvablyFairView {
    pub server_seed_hash: String,
    pub client_seed: String,
    pub pending_client_seed: Option<String>,
    pub nonce: u64,
    pub previous: Option<SeedReveal>,
}

/// Состояние стола для конкретного зрителя.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientTableState {
    pub room_id: RoomId,
    pub room_code: String,
    pub viewer: PlayerId,
    pub viewer_seat: Option<u8>,
    pub host: PlayerId,

    pub phase: RoundPhase,
    pub round_number: u64,
    pub button: Option<u8>,
    pub active: Option<ActiveCursor>,

    pub seats: Vec<SeatView>,
    pub spectators: Vec<String>,
    pub dealer: DealerView,

    pub chip_denoms: Vec<u64>,
    pub min_bet: Chips,
    pub shoe_remaining: u16,
    pub cut_flag: bool,

    pub settlement: Option<RoundSettlement>,
    pub fair: ProvablyFairView,
}

/// Ответ API на команду.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum CommandResponse {
    /// Комната создана, вызывающий — хост на месте 0.
    RoomCreated {
        room_id: RoomId,
        room_code: String,
        player_id: PlayerId,
        state: ClientTableState,
    },

    /// Вход в комнату выполнен.
    RoomJoined {
        room_id: RoomId,
        room_code: String,
        player_id: PlayerId,
        seat: Option<u8>,
        state: ClientTableState,
    },

    /// Результат розыгрыша кнопки — рассылается всем в комнате.
    DiceRolled {
        roll: DiceRoll,
        state: ClientTableState,
    },

    /// Обновлённое состояние стола для вызывающего.
    State(ClientTableState),

    /// Игрок покинул комнату.
    Left { room_id: RoomId },
}
