use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::RoundSettlement;
use crate::domain::table::{ActiveCursor, SeedReveal};
use crate::domain::{PlayerId, SeatIndex};
use crate::engine::actions::PlayerMove;

/// Тип события в раунде.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum RoundEventKind {
    /// Стол открыл приём ставок.
    RoundOpened { round_number: u64 },

    /// Кнопка выбрана (вручную или костями).
    ButtonSelected { seat: SeatIndex, by_dice: bool },

    /// Ставка сиденья принята.
    BetPlaced {
        seat: SeatIndex,
        amount: Chips,
        side_bet: Chips,
        num_hands: u8,
    },

    /// Стартовые карты разложены (по одной на руку + две дилеру).
    CardsDealt { cards_used: u16 },

    /// Предложена страховка (открытая карта дилера — туз).
    InsuranceOffered,

    /// Сиденье решило по страховке.
    InsuranceDecided {
        seat: SeatIndex,
        taken: bool,
        bet: Chips,
    },

    /// Закрытая карта проверена на блэкджек.
    HoleChecked { dealer_blackjack: bool },

    /// Ход игрока по активной руке.
    PlayerActed {
        seat: SeatIndex,
        hand: u8,
        action: PlayerMove,
        card: Option<Card>,
        hand_total: u8,
    },

    /// Курсор передвинулся (None — ход уходит дилеру).
    TurnAdvanced { to: Option<ActiveCursor> },

    /// Закрытая карта дилера открыта.
    HoleRevealed { card: Card },

    /// Дилер добрал карту.
    DealerDrew { card: Card, dealer_total: u8 },

    /// Раунд рассчитан.
    RoundSettled { round_number: u64 },

    /// Сиденье готово к следующему раунду.
    ReadyMarked { seat: SeatIndex },

    /// Seed ротирован, шуз перевыведен.
    SeedRotated { nonce: u64, cut_flag_was: bool },

    /// Игрок сел за стол.
    SeatJoined { seat: SeatIndex, player_id: PlayerId },

    /// Игрок покинул стол.
    SeatLeft { seat: SeatIndex, player_id: PlayerId },

    /// Смена клиентского seed'а (вступит в силу со следующей деривации).
    ClientSeedChanged { seat: SeatIndex },

    /// Статус away/возврат.
    AwayToggled { seat: SeatIndex, is_away: bool },

    /// Внешний session-слой сменил статус подключения.
    ConnectionChanged { seat: SeatIndex, connected: bool },

    /// Докупка применена к балансу.
    BuyInApplied { seat: SeatIndex, amount: Chips },

    /// Докупка отложена до конца раунда.
    BuyInQueued { seat: SeatIndex, amount: Chips },
}

/// Событие раунда с порядковым номером.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RoundEvent {
    pub index: u32,
    pub kind: RoundEventKind,
}

/// Неизменяемая запись завершённого раунда: расчёт целиком плюс
/// раскрытые данные seed'а — достаточно для клиентской верификации.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HandHistoryRecord {
    pub settlement: RoundSettlement,
    pub reveal: SeedReveal,
}

/// Журнал комнаты: события текущего раунда + ограниченный архив
/// завершённых раундов. События чистятся на подготовке нового раунда,
/// архив переживает раунды (но не процесс).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RoomJournal {
    pub events: Vec<RoundEvent>,
    pub archive: VecDeque<HandHistoryRecord>,
    cap: usize,
}

impl RoomJournal {
    pub fn new(cap: usize) -> Self {
        Self {
            events: Vec::new(),
            archive: VecDeque::new(),
            cap,
        }
    }

    pub fn push(&mut self, kind: RoundEventKind) {
        let idx = self.events.len() as u32;
        self.events.push(RoundEvent { index: idx, kind });
    }

    /// Добавить запись раунда, вытесняя самую старую сверх лимита.
    pub fn record(&mut self, record: HandHistoryRecord) {
        if self.cap > 0 && self.archive.len() >= self.cap {
            self.archive.pop_front();
        }
        self.archive.push_back(record);
    }

    /// Сброс пер-раундового лога (архив не трогаем).
    pub fn start_new_round(&mut self) {
        self.events.clear();
    }
}
