use serde::{Deserialize, Serialize};

use crate::domain::card::{Card, Rank};
use crate::domain::chips::Chips;

/// Запись в логе действий руки: каждая взятая карта помечается,
/// пришла ли она от обычного hit или от дабла.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum HandAction {
    /// Обычный добор.
    Hit,
    /// Карта после удвоения.
    Double,
}

/// Итог одной руки после расчёта.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum HandOutcome {
    /// Выигрыш 1:1.
    Win,
    /// Проигрыш основной ставки.
    Lose,
    /// Ничья — ставка возвращается.
    Push,
    /// Блэкджек 3:2.
    Blackjack,
    /// Одномастный блэкджек 2:1.
    SuitedBlackjack,
    /// Перебор дилера ровно на 22 — возврат ставки.
    Push22,
}

/// Одна рука игрока. Сиденье может держать до пяти таких рук одновременно;
/// мутируется рука только пока курсор стола стоит на ней.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BjHand {
    pub cards: Vec<Card>,
    /// Исходная ставка (без учёта даблов).
    pub original_bet: Chips,
    /// Сколько удвоений уже сделано.
    pub double_count: u32,
    /// Терминальный флаг: дабл на одиночном тузе — больше действий нет.
    pub just_doubled_on_lone_ace: bool,
    /// Рука закончила действия в этом раунде (stand, перебор, 21,
    /// дабл на одиночном тузе). Курсор такие руки не посещает.
    pub finished: bool,
    /// Итог руки (появляется на расчёте).
    pub result: Option<HandOutcome>,
    /// Лог добора карт.
    pub actions: Vec<HandAction>,
}

impl BjHand {
    pub fn new(original_bet: Chips) -> Self {
        Self {
            cards: Vec::new(),
            original_bet,
            double_count: 0,
            just_doubled_on_lone_ace: false,
            finished: false,
            result: None,
            actions: Vec::new(),
        }
    }

    /// Рука из одного туза (перед даблом это особый случай).
    pub fn is_lone_ace(&self) -> bool {
        self.cards.len() == 1 && self.cards[0].rank == Rank::Ace
    }

    pub fn is_busted(&self) -> bool {
        hand_value(&self.cards).0 > 21
    }

    pub fn take_card(&mut self, card: Card, action: HandAction) {
        self.cards.push(card);
        self.actions.push(action);
    }
}

/// Стоимость руки: (тотал, мягкая ли).
///
/// Тузы сначала считаются по 11, затем понижаются до 1,
/// пока тотал выше 21. Рука мягкая, если хотя бы один туз
/// остался посчитанным как 11.
pub fn hand_value(cards: &[Card]) -> (u8, bool) {
    let mut value: u16 = 0;
    let mut aces: u8 = 0;

    for card in cards {
        if card.rank == Rank::Ace {
            aces += 1;
        }
        value += card.rank.blackjack_value() as u16;
    }

    while value > 21 && aces > 0 {
        value -= 10;
        aces -= 1;
    }

    let is_soft = aces > 0 && value <= 21;
    (value.min(255) as u8, is_soft)
}

/// Блэкджек — ровно две карты на 21.
pub fn is_blackjack(cards: &[Card]) -> bool {
    cards.len() == 2 && hand_value(cards).0 == 21
}

/// Одномастный блэкджек (платит 2:1 вместо 3:2).
pub fn is_suited_blackjack(cards: &[Card]) -> bool {
    is_blackjack(cards) && cards[0].suit == cards[1].suit
}

/// Расчёт одной руки: итог + возврат на баланс.
///
/// `payout` — сколько вернулось игроку (включая саму ставку, если она
/// уцелела): проигрыш — 0, пуш — total_wager, выигрыш 1:1 — 2×total_wager
/// и т.д. Чистый результат = payout − total_wager.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SettledHand {
    pub cards: Vec<Card>,
    pub original_bet: Chips,
    pub double_count: u32,
    pub outcome: HandOutcome,
    /// Полная ставка руки с учётом всех даблов.
    pub total_wager: Chips,
    pub payout: Chips,
    /// Выплата по сайд-ставке (привязана к первой руке сиденья).
    pub side_bet_payout: Chips,
    pub message: String,
}

/// Итог раунда для одного сиденья.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeatSettlement {
    pub seat: u8,
    pub player_id: crate::domain::PlayerId,
    pub display_name: String,
    pub hands: Vec<SettledHand>,
    pub side_bet: Chips,
    pub insurance_bet: Chips,
    pub insurance_taken: bool,
    /// Возврат по страховке (0, если не брал или дилер без блэкджека).
    pub insurance_payout: Chips,
    /// Суммарный возврат сиденья за раунд.
    pub total_payout: Chips,
}

/// Расчёт всего раунда по всем сиденьям и рукам.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundSettlement {
    pub round_number: u64,
    pub seats: Vec<SeatSettlement>,
    pub dealer_cards: Vec<Card>,
    pub dealer_total: u8,
    /// Общее сообщение раунда («Dealer busts at 22 — push» и т.п.).
    pub message: String,
    /// Балансы уже изменены и запись добавлена в историю.
    pub completed: bool,
}
