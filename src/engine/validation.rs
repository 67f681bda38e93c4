//! Проверка легальности интентов ДО любой мутации.
//!
//! Правило одно: не прошла проверка — состояние стола не изменилось.
//! Частичных мутаций в движке не бывает.

use crate::domain::chips::Chips;
use crate::domain::table::{RoundPhase, SeatIndex, Table};
use crate::engine::actions::{PlayerAction, PlayerMove};
use crate::engine::errors::EngineError;
use crate::engine::rules::{available_actions, insurance_cost, next_double_wager};

/// Фаза должна совпасть, иначе интент отклоняется без изменений.
pub fn ensure_phase(table: &Table, expected: RoundPhase) -> Result<(), EngineError> {
    if table.phase == expected {
        Ok(())
    } else {
        Err(EngineError::WrongPhase)
    }
}

/// Валидация ставки. Возвращает полную сумму к списанию.
pub fn validate_bet(
    table: &Table,
    seat_idx: SeatIndex,
    amount: Chips,
    side_bet: Chips,
    num_hands: u8,
) -> Result<Chips, EngineError> {
    ensure_phase(table, RoundPhase::Betting)?;

    let seat = table
        .seat(seat_idx)
        .ok_or(EngineError::EmptySeat)?;

    if table.button == Some(seat_idx) {
        return Err(EngineError::ButtonSitsOut);
    }
    if !seat.is_present() {
        return Err(EngineError::IllegalAction);
    }
    if seat.has_bet {
        return Err(EngineError::AlreadyBet);
    }
    if num_hands == 0 || num_hands > table.config.max_hands_per_seat {
        return Err(EngineError::InvalidHandCount);
    }
    if amount < table.config.min_bet {
        return Err(EngineError::InvalidBet);
    }

    let total = amount.saturating_mul(num_hands as u64) + side_bet;
    if total > seat.balance {
        return Err(EngineError::NotEnoughBalance);
    }

    Ok(total)
}

/// Валидация хода по активной руке: фаза, курсор, владелец, доступность.
pub fn validate_player_action(table: &Table, action: &PlayerAction) -> Result<(), EngineError> {
    ensure_phase(table, RoundPhase::PlayerTurn)?;

    let cursor = table.active.ok_or(EngineError::Internal(
        "PlayerTurn без активного курсора",
    ))?;

    if cursor.seat != action.seat {
        return Err(EngineError::NotYourTurn);
    }

    let seat = table
        .seat(action.seat)
        .ok_or(EngineError::EmptySeat)?;
    if seat.player_id != action.player_id {
        return Err(EngineError::NotYourTurn);
    }

    let hand = seat
        .hands
        .get(cursor.hand as usize)
        .ok_or(EngineError::Internal("курсор указывает на несуществующую руку"))?;

    let avail = available_actions(
        &hand.cards,
        hand.double_count,
        hand.original_bet,
        seat.balance,
        hand.just_doubled_on_lone_ace,
    );

    match action.kind {
        PlayerMove::Hit if avail.hit => Ok(()),
        PlayerMove::Stand if avail.stand => Ok(()),
        PlayerMove::Double if avail.double => Ok(()),
        PlayerMove::Double => {
            // Отличаем «нет денег на дабл» от «дабл вообще недоступен».
            let needed = next_double_wager(hand.original_bet, hand.double_count);
            if avail.hit && seat.balance < needed {
                Err(EngineError::NotEnoughBalance)
            } else {
                Err(EngineError::IllegalAction)
            }
        }
        _ => Err(EngineError::IllegalAction),
    }
}

/// Валидация решения по страховке. Возвращает цену (0 при отказе).
pub fn validate_insurance(
    table: &Table,
    seat_idx: SeatIndex,
    take: bool,
) -> Result<Chips, EngineError> {
    ensure_phase(table, RoundPhase::InsuranceOffered)?;

    let seat = table
        .seat(seat_idx)
        .ok_or(EngineError::EmptySeat)?;

    if table.button == Some(seat_idx) || !seat.is_in_round() {
        return Err(EngineError::InsuranceNotAvailable);
    }
    if table.insurance.contains_key(&seat_idx) {
        return Err(EngineError::InsuranceNotAvailable);
    }

    if !take {
        return Ok(Chips::ZERO);
    }

    let cost = seat
        .hands
        .iter()
        .fold(Chips::ZERO, |acc, h| acc + insurance_cost(h.original_bet));

    if cost > seat.balance {
        return Err(EngineError::NotEnoughBalance);
    }

    Ok(cost)
}
