//! Порядок мест и продвижение курсора (seat, hand).

use crate::domain::table::{ActiveCursor, SeatIndex, Table};

/// Найти следующее занятое место по кругу (включая/исключая start).
pub fn next_occupied_seat(table: &Table, start: SeatIndex, include_start: bool) -> Option<SeatIndex> {
    if table.seats.is_empty() {
        return None;
    }

    let max = table.max_seats() as usize;
    let mut idx = start as usize;

    if !include_start {
        idx = (idx + 1) % max;
    }

    for _ in 0..max {
        if idx < table.seats.len() && table.seats[idx].is_some() {
            return Some(idx as SeatIndex);
        }
        idx = (idx + 1) % max;
    }

    None
}

/// Места, участвующие в раунде (ставка принята), в порядке раздачи.
pub fn seats_in_round(table: &Table) -> Vec<SeatIndex> {
    (0..table.max_seats())
        .filter(|idx| {
            table
                .seat(*idx)
                .map(|s| s.is_in_round())
                .unwrap_or(false)
        })
        .collect()
}

/// Места, от которых ждём ставку: занято, на связи, не away, не кнопка
/// и баланс позволяет хотя бы минимальную ставку. Сиденье без денег
/// не должно блокировать начало раздачи.
pub fn seats_expected_to_bet(table: &Table) -> Vec<SeatIndex> {
    (0..table.max_seats())
        .filter(|idx| {
            if !table.is_betting_seat(*idx) {
                return false;
            }
            table
                .seat(*idx)
                .map(|s| s.balance >= table.config.min_bet || s.has_bet)
                .unwrap_or(false)
        })
        .collect()
}

/// Кандидаты на кнопку: занятые места, которые на связи и не away.
pub fn button_candidates(table: &Table) -> Vec<SeatIndex> {
    (0..table.max_seats())
        .filter(|idx| {
            table
                .seat(*idx)
                .map(|s| s.is_present())
                .unwrap_or(false)
        })
        .collect()
}

/// Следующая позиция кнопки: по кругу на следующее занятое место.
pub fn next_button(table: &Table) -> Option<SeatIndex> {
    match table.button {
        Some(current) => next_occupied_seat(table, current, false),
        None => None,
    }
}

/// Может ли сиденье действовать в свою очередь прямо сейчас.
fn seat_can_act(table: &Table, seat: SeatIndex) -> bool {
    table
        .seat(seat)
        .map(|s| s.is_in_round() && s.is_present())
        .unwrap_or(false)
}

/// Играбельна ли рука: ещё не закончила действия.
fn hand_playable(table: &Table, seat: SeatIndex, hand: u8) -> bool {
    table
        .seat(seat)
        .and_then(|s| s.hands.get(hand as usize))
        .map(|h| !h.finished)
        .unwrap_or(false)
}

/// Следующая активная пара (seat, hand) строго вперёд от `from`:
/// сначала следующая рука того же места, затем первая рука следующего
/// подходящего места. Пропущенные позади руки не ревизитируются.
/// None — ход переходит к дилеру.
pub fn next_active_position(table: &Table, from: Option<ActiveCursor>) -> Option<ActiveCursor> {
    let (start_seat, start_hand) = match from {
        Some(cursor) => (cursor.seat, cursor.hand + 1),
        None => (0, 0),
    };

    for seat in start_seat..table.max_seats() {
        if !seat_can_act(table, seat) {
            continue;
        }
        let hand_count = table
            .seat(seat)
            .map(|s| s.hands.len() as u8)
            .unwrap_or(0);

        let first_hand = if seat == start_seat { start_hand } else { 0 };
        for hand in first_hand..hand_count {
            if hand_playable(table, seat, hand) {
                return Some(ActiveCursor { seat, hand });
            }
        }
    }

    None
}
