//! Расчёт раунда: приоритетная цепочка исходов и выплаты.
//!
//! Все суммы — целые центы; деление 3:2 округляется вниз.
//! `payout` всюду означает возврат на баланс (ставка включена,
//! если она уцелела); чистый результат = payout − total_wager.

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::{
    hand_value, is_blackjack, is_suited_blackjack, HandOutcome, RoundSettlement, SeatSettlement,
    SettledHand,
};
use crate::domain::shoe::CUT_POSITION;
use crate::domain::table::Table;
use crate::engine::positions::seats_in_round;
use crate::engine::rules::total_wager;

/// Сайд-ставка платит 11:1 ровно на перебор дилера в 22.
const SIDE_BET_MULTIPLIER: u64 = 11;

/// Расчёт одной руки против финальной руки дилера.
///
/// Приоритет (сверху вниз):
/// 1. блэкджек дилера — все незастрахованные ставки проигрывают;
/// 2. перебор игрока;
/// 3. двухкарточный блэкджек игрока (одномастный 2:1, иначе 3:2) —
///    важнее даже перебора дилера в 22;
/// 4. перебор дилера ровно 22 — пуш всех живых ставок;
/// 5. перебор дилера ≥23 — выигрыш 1:1;
/// 6. сравнение тоталов;
/// 7. пуш.
pub fn settle_hand(
    player_cards: &[Card],
    dealer_cards: &[Card],
    original_bet: Chips,
    double_count: u32,
    side_bet: Chips,
    dealer_has_blackjack: bool,
) -> SettledHand {
    let wager = total_wager(original_bet, double_count);
    let (player_total, _) = hand_value(player_cards);
    let (dealer_total, _) = hand_value(dealer_cards);

    let side_bet_payout = side_bet_payout(side_bet, dealer_cards);

    let (outcome, payout, message): (HandOutcome, Chips, &str) = if dealer_has_blackjack {
        (HandOutcome::Lose, Chips::ZERO, "Dealer blackjack")
    } else if player_total > 21 {
        (HandOutcome::Lose, Chips::ZERO, "Bust")
    } else if is_suited_blackjack(player_cards) {
        // 2:1 — возврат ставки плюс двойной выигрыш.
        (
            HandOutcome::SuitedBlackjack,
            wager.saturating_mul(3),
            "Suited blackjack pays 2:1",
        )
    } else if is_blackjack(player_cards) {
        // 3:2 с округлением вниз.
        (
            HandOutcome::Blackjack,
            wager + Chips(wager.0.saturating_mul(3) / 2),
            "Blackjack pays 3:2",
        )
    } else if dealer_total == 22 {
        (HandOutcome::Push22, wager, "Dealer busts at 22 — push")
    } else if dealer_total > 22 {
        (HandOutcome::Win, wager.saturating_mul(2), "Dealer busts")
    } else if player_total > dealer_total {
        (HandOutcome::Win, wager.saturating_mul(2), "Win")
    } else if player_total < dealer_total {
        (HandOutcome::Lose, Chips::ZERO, "Lose")
    } else {
        (HandOutcome::Push, wager, "Push")
    };

    SettledHand {
        cards: player_cards.to_vec(),
        original_bet,
        double_count,
        outcome,
        total_wager: wager,
        payout,
        side_bet_payout,
        message: message.to_string(),
    }
}

/// Выплата сайд-ставки: 12×ставка (возврат + 11:1) на дилерских 22.
pub fn side_bet_payout(side_bet: Chips, dealer_cards: &[Card]) -> Chips {
    if side_bet.is_zero() {
        return Chips::ZERO;
    }
    let (dealer_total, _) = hand_value(dealer_cards);
    if dealer_total == 22 {
        side_bet.saturating_mul(SIDE_BET_MULTIPLIER + 1)
    } else {
        Chips::ZERO
    }
}

/// Выплата страховки: 3×ставка (возврат + 2:1) при блэкджеке дилера.
pub fn insurance_payout(insurance_bet: Chips, taken: bool, dealer_has_blackjack: bool) -> Chips {
    if taken && dealer_has_blackjack {
        insurance_bet.saturating_mul(3)
    } else {
        Chips::ZERO
    }
}

/// Есть ли у дилера блэкджек (две карты ровно на 21).
pub fn dealer_blackjack(dealer_cards: &[Card]) -> bool {
    dealer_cards.len() == 2 && is_blackjack(dealer_cards)
}

/// Расчёт всего раунда: каждая рука каждого участвующего сиденья
/// против финальной руки дилера. Сайд-ставка привязана к первой руке
/// сиденья, страховка считается отдельно по пулу стола.
///
/// Чистая функция: балансы здесь НЕ меняются — это делает
/// отдельный шаг завершения в `round::complete_settlement`.
pub fn settle_round(table: &Table) -> RoundSettlement {
    let dealer_bj = dealer_blackjack(&table.dealer_cards);
    let (dealer_total, _) = hand_value(&table.dealer_cards);

    let mut seats = Vec::new();

    for seat_idx in seats_in_round(table) {
        let seat = match table.seat(seat_idx) {
            Some(s) => s,
            None => continue,
        };

        let insurance = table.insurance.get(&seat_idx).copied();
        let insurance_bet = insurance.map(|e| e.bet).unwrap_or(Chips::ZERO);
        let insurance_taken = insurance.map(|e| e.taken).unwrap_or(false);
        let ins_payout = insurance_payout(insurance_bet, insurance_taken, dealer_bj);

        let mut hands = Vec::new();
        let mut total_payout = ins_payout;

        for (hand_idx, hand) in seat.hands.iter().enumerate() {
            // Сайд-ставка сиденья едет на его первой руке.
            let side = if hand_idx == 0 {
                seat.side_bet
            } else {
                Chips::ZERO
            };

            let settled = settle_hand(
                &hand.cards,
                &table.dealer_cards,
                hand.original_bet,
                hand.double_count,
                side,
                dealer_bj,
            );
            total_payout += settled.payout + settled.side_bet_payout;
            hands.push(settled);
        }

        seats.push(SeatSettlement {
            seat: seat_idx,
            player_id: seat.player_id,
            display_name: seat.display_name.clone(),
            hands,
            side_bet: seat.side_bet,
            insurance_bet,
            insurance_taken,
            insurance_payout: ins_payout,
            total_payout,
        });
    }

    let message = if dealer_bj {
        "Dealer has blackjack".to_string()
    } else if dealer_total == 22 {
        "Dealer busts at 22 — all live hands push".to_string()
    } else if dealer_total > 22 {
        format!("Dealer busts at {dealer_total}")
    } else {
        format!("Dealer stands at {dealer_total}")
    };

    RoundSettlement {
        round_number: table.round_number,
        seats,
        dealer_cards: table.dealer_cards.clone(),
        dealer_total,
        message,
        completed: false,
    }
}

/// Пересёк ли шуз отсечку за этот раунд (следующий раунд обязан
/// начинаться со свежей перестановки).
pub fn shoe_needs_rebuild(table: &Table) -> bool {
    table.shoe.cut_flag || table.shoe.position >= CUT_POSITION
}
