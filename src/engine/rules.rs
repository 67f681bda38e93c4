//! Чистые правила варианта: доступность действий, эскалация дабла,
//! политика дилера (H17), страховка и peek.
//!
//! Никакого состояния — только функции над картами и суммами,
//! поэтому всё проверяется таблично в тестах.

use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::hand_value;

/// Что доступно активной руке прямо сейчас.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AvailableActions {
    pub hit: bool,
    pub stand: bool,
    pub double: bool,
}

impl AvailableActions {
    pub const NONE: AvailableActions = AvailableActions {
        hit: false,
        stand: false,
        double: false,
    };
}

/// Доступные действия руки.
///
/// - после дабла на одиночном тузе и после перебора действий нет;
/// - ровно на 21 остаётся только stand (движок и так автоматически
///   передвинет ход);
/// - дабл требует баланса на следующую эскалированную ставку.
pub fn available_actions(
    cards: &[Card],
    double_count: u32,
    original_bet: Chips,
    balance: Chips,
    just_doubled_on_lone_ace: bool,
) -> AvailableActions {
    let (value, _) = hand_value(cards);

    if just_doubled_on_lone_ace || value > 21 {
        return AvailableActions::NONE;
    }

    if value == 21 {
        return AvailableActions {
            hit: false,
            stand: true,
            double: false,
        };
    }

    AvailableActions {
        hit: true,
        stand: true,
        double: balance >= next_double_wager(original_bet, double_count),
    }
}

/// Ставка очередного дабла: первый стоит как исходная ставка,
/// каждый следующий — originalBet * 2^doubleCount (эскалация, не флэт).
pub fn next_double_wager(original_bet: Chips, double_count: u32) -> Chips {
    if double_count == 0 {
        return original_bet;
    }
    let factor = 1u64
        .checked_shl(double_count)
        .unwrap_or(u64::MAX);
    original_bet.saturating_mul(factor)
}

/// Полная ставка руки: исходная плюс все сделанные даблы.
pub fn total_wager(original_bet: Chips, double_count: u32) -> Chips {
    let mut total = original_bet;
    for i in 0..double_count {
        total += next_double_wager(original_bet, i);
    }
    total
}

/// Политика дилера: добирает на жёстких ≤16 и на мягких 17 (H17),
/// иначе — или при переборе — стоит.
pub fn dealer_must_hit(dealer_cards: &[Card]) -> bool {
    let (value, is_soft) = hand_value(dealer_cards);
    if value > 21 {
        return false;
    }
    value < 17 || (value == 17 && is_soft)
}

/// Страховка предлагается, только если открытая карта дилера — туз.
pub fn should_offer_insurance(up_card: Card) -> bool {
    up_card.rank == crate::domain::card::Rank::Ace
}

/// Peek (проверка закрытой карты на блэкджек) — когда открытая карта
/// туз или десятка/картинка.
pub fn should_peek(up_card: Card) -> bool {
    up_card.rank == crate::domain::card::Rank::Ace || up_card.rank.is_ten_value()
}

/// Цена страховки одной руки: floor(originalBet / 2).
pub fn insurance_cost(original_bet: Chips) -> Chips {
    original_bet.halved_down()
}
