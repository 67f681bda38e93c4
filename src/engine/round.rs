//! Машина фаз раунда.
//!
//! Высокоуровневые операции:
//!   - `start_round` — открыть первый раунд из лобби;
//!   - `place_bet` — принять ставку (последняя ставка запускает раздачу);
//!   - `decide_insurance` — решение по страховке;
//!   - `apply_player_action` — ход по активной руке;
//!   - `mark_ready` / `prepare_next_round` — переход к следующему раунду.
//!
//! Транзитные фазы (Dealing, PeekCheck, DealerTurn) проходятся внутри
//! одной команды. Любой невалидный интент отклоняется до первой мутации.

use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::{hand_value, BjHand, HandAction};
use crate::domain::shoe::Shoe;
use crate::domain::table::{InsuranceEntry, RoundPhase, SeatIndex, Table};
use crate::domain::PlayerId;
use crate::engine::actions::{PlayerAction, PlayerMove};
use crate::engine::errors::EngineError;
use crate::engine::hand_history::{HandHistoryRecord, RoomJournal, RoundEventKind};
use crate::engine::positions::{
    button_candidates, next_active_position, next_button, seats_expected_to_bet, seats_in_round,
};
use crate::engine::rules::{next_double_wager, should_offer_insurance, should_peek};
use crate::engine::settlement::{self, dealer_blackjack};
use crate::engine::validation::{
    ensure_phase, validate_bet, validate_insurance, validate_player_action,
};
use crate::infra::crypto::{uniform_below, CryptoService};
use crate::infra::{seed, shuffle};

fn roll_pair<C: CryptoService + ?Sized>(crypto: &mut C) -> (u8, u8) {
    (
        uniform_below(crypto, 6) as u8 + 1,
        uniform_below(crypto, 6) as u8 + 1,
    )
}

/// Бросок пары костей одного кандидата на кнопку.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiceRollSeat {
    pub seat: SeatIndex,
    pub player_id: PlayerId,
    pub die1: u8,
    pub die2: u8,
}

/// Итог розыгрыша кнопки костями (уходит всем клиентам комнаты).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiceRoll {
    pub rolls: Vec<DiceRollSeat>,
    pub selected: SeatIndex,
}

// ---------------------------------------------------------------------------
// Лобби: кнопка и старт первого раунда
// ---------------------------------------------------------------------------

/// Хост выбирает кнопку вручную (только до первого раунда).
pub fn select_button(
    table: &mut Table,
    journal: &mut RoomJournal,
    seat: SeatIndex,
) -> Result<(), EngineError> {
    ensure_phase(table, RoundPhase::Lobby)?;
    if table.seat(seat).is_none() {
        return Err(EngineError::InvalidSeat(seat));
    }

    table.button = Some(seat);
    journal.push(RoundEventKind::ButtonSelected {
        seat,
        by_dice: false,
    });
    Ok(())
}

/// Розыгрыш кнопки костями: по паре костей на каждого кандидата,
/// ничьи среди лидеров перебрасываются до единственного максимума.
/// Перебросы симметричны, так что выбор равномерен по кандидатам.
pub fn roll_button_dice<C: CryptoService + ?Sized>(
    table: &mut Table,
    journal: &mut RoomJournal,
    crypto: &mut C,
) -> Result<DiceRoll, EngineError> {
    ensure_phase(table, RoundPhase::Lobby)?;

    let candidates = button_candidates(table);
    if candidates.is_empty() {
        return Err(EngineError::NoCandidates);
    }

    let mut rolls: Vec<DiceRollSeat> = candidates
        .iter()
        .map(|&seat| {
            let (die1, die2) = roll_pair(crypto);
            DiceRollSeat {
                seat,
                player_id: table.seat(seat).map(|s| s.player_id).unwrap_or(0),
                die1,
                die2,
            }
        })
        .collect();

    let mut contenders: Vec<SeatIndex> = candidates;
    let selected = loop {
        let best = contenders
            .iter()
            .filter_map(|&seat| {
                rolls
                    .iter()
                    .find(|r| r.seat == seat)
                    .map(|r| r.die1 + r.die2)
            })
            .max()
            .unwrap_or(0);

        let leaders: Vec<SeatIndex> = contenders
            .iter()
            .copied()
            .filter(|&seat| {
                rolls
                    .iter()
                    .find(|r| r.seat == seat)
                    .map(|r| r.die1 + r.die2 == best)
                    .unwrap_or(false)
            })
            .collect();

        if leaders.len() == 1 {
            break leaders[0];
        }

        // Переброс только среди лидеров.
        for roll in rolls.iter_mut().filter(|r| leaders.contains(&r.seat)) {
            let (die1, die2) = roll_pair(crypto);
            roll.die1 = die1;
            roll.die2 = die2;
        }
        contenders = leaders;
    };

    table.button = Some(selected);
    journal.push(RoundEventKind::ButtonSelected {
        seat: selected,
        by_dice: true,
    });

    Ok(DiceRoll { rolls, selected })
}

/// Лобби → первый раунд ставок.
pub fn start_round(table: &mut Table, journal: &mut RoomJournal) -> Result<(), EngineError> {
    ensure_phase(table, RoundPhase::Lobby)?;
    if seats_expected_to_bet(table).is_empty() {
        return Err(EngineError::NoCandidates);
    }

    table.round_number = 1;
    table.phase = RoundPhase::Betting;
    journal.push(RoundEventKind::RoundOpened { round_number: 1 });
    tracing::debug!(room = table.id, "первый раунд открыт");
    Ok(())
}

// ---------------------------------------------------------------------------
// Ставки и раздача
// ---------------------------------------------------------------------------

/// Принять ставку сиденья: `amount` на каждую из `num_hands` рук плюс
/// опциональная сайд-ставка. Списывается сразу и целиком.
/// Последняя ожидаемая ставка автоматически запускает раздачу.
pub fn place_bet(
    table: &mut Table,
    journal: &mut RoomJournal,
    seat_idx: SeatIndex,
    amount: Chips,
    side_bet: Chips,
    num_hands: u8,
) -> Result<(), EngineError> {
    let total = validate_bet(table, seat_idx, amount, side_bet, num_hands)?;

    let seat = table
        .seat_mut(seat_idx)
        .ok_or(EngineError::EmptySeat)?;
    seat.balance -= total;
    seat.side_bet = side_bet;
    seat.has_bet = true;
    seat.hands = (0..num_hands).map(|_| BjHand::new(amount)).collect();

    journal.push(RoundEventKind::BetPlaced {
        seat: seat_idx,
        amount,
        side_bet,
        num_hands,
    });

    maybe_start_dealing(table, journal)
}

/// Если все ожидаемые ставки собраны — раздаём.
pub(crate) fn maybe_start_dealing(
    table: &mut Table,
    journal: &mut RoomJournal,
) -> Result<(), EngineError> {
    if table.phase != RoundPhase::Betting {
        return Ok(());
    }

    let expected = seats_expected_to_bet(table);
    if expected.is_empty() {
        return Ok(());
    }
    let all_in = expected
        .iter()
        .all(|&s| table.seat(s).map(|seat| seat.has_bet).unwrap_or(false));
    if !all_in || seats_in_round(table).is_empty() {
        return Ok(());
    }

    deal_round(table, journal)
}

/// Раздача: по одной открытой карте на каждую руку (место за местом,
/// рука за рукой), затем дилеру — открытая и закрытая.
fn deal_round(table: &mut Table, journal: &mut RoomJournal) -> Result<(), EngineError> {
    table.phase = RoundPhase::Dealing;

    let order: Vec<(SeatIndex, usize)> = seats_in_round(table)
        .into_iter()
        .map(|s| (s, table.seat(s).map(|seat| seat.hands.len()).unwrap_or(0)))
        .collect();

    let needed: u16 = order.iter().map(|(_, n)| *n as u16).sum::<u16>() + 2;
    if table.shoe.remaining() < needed {
        return Err(EngineError::ShoeExhausted);
    }

    let mut cards_used = 0u16;
    for (seat_idx, hand_count) in order {
        for hand_idx in 0..hand_count {
            let card = draw_card(table)?;
            if let Some(seat) = table.seat_mut(seat_idx) {
                seat.hands[hand_idx].cards.push(card);
            }
            cards_used += 1;
        }
    }

    let up = draw_card(table)?;
    let hole = draw_card(table)?.face_down();
    table.dealer_cards = vec![up, hole];
    cards_used += 2;

    journal.push(RoundEventKind::CardsDealt { cards_used });
    tracing::debug!(
        room = table.id,
        round = table.round_number,
        cards_used,
        "раздача завершена"
    );

    if should_offer_insurance(up) {
        table.phase = RoundPhase::InsuranceOffered;
        journal.push(RoundEventKind::InsuranceOffered);
        // Все могли оказаться отключены — тогда решений ждать не от кого.
        maybe_resolve_insurance(table, journal)
    } else if should_peek(up) {
        run_peek_check(table, journal)
    } else {
        begin_player_turns(table, journal)
    }
}

/// Снять карту из шуза; индекс уходит в provably-fair реестр раунда.
fn draw_card(table: &mut Table) -> Result<Card, EngineError> {
    let (index, card) = table.shoe.draw().ok_or(EngineError::ShoeExhausted)?;
    table.fairness.dealt_this_round.push(index);
    Ok(card)
}

// ---------------------------------------------------------------------------
// Страховка и peek
// ---------------------------------------------------------------------------

/// Решение сиденья по страховке. Цена — floor(bet/2) за каждую руку,
/// списывается сразу. Последнее решение закрывает фазу.
pub fn decide_insurance(
    table: &mut Table,
    journal: &mut RoomJournal,
    seat_idx: SeatIndex,
    take: bool,
) -> Result<(), EngineError> {
    let cost = validate_insurance(table, seat_idx, take)?;

    if take {
        if let Some(seat) = table.seat_mut(seat_idx) {
            seat.balance -= cost;
        }
    }
    table.insurance.insert(
        seat_idx,
        InsuranceEntry {
            taken: take,
            bet: cost,
        },
    );
    journal.push(RoundEventKind::InsuranceDecided {
        seat: seat_idx,
        taken: take,
        bet: cost,
    });

    maybe_resolve_insurance(table, journal)
}

/// Страховка закрыта, когда решили все, от кого ждём решения.
/// Отключённые/away сиденья считаются отказавшимися.
pub(crate) fn maybe_resolve_insurance(
    table: &mut Table,
    journal: &mut RoomJournal,
) -> Result<(), EngineError> {
    if table.phase != RoundPhase::InsuranceOffered {
        return Ok(());
    }

    let undecided = seats_in_round(table).into_iter().any(|s| {
        table.button != Some(s)
            && table.seat(s).map(|seat| seat.is_present()).unwrap_or(false)
            && !table.insurance.contains_key(&s)
    });
    if undecided {
        return Ok(());
    }

    run_peek_check(table, journal)
}

/// Проверка закрытой карты: блэкджек дилера рассчитывает раунд сразу,
/// минуя все ходы игроков.
fn run_peek_check(table: &mut Table, journal: &mut RoomJournal) -> Result<(), EngineError> {
    table.phase = RoundPhase::PeekCheck;

    let bj = dealer_blackjack(&table.dealer_cards);
    journal.push(RoundEventKind::HoleChecked {
        dealer_blackjack: bj,
    });

    if bj {
        reveal_hole(table, journal);
        finish_round(table, journal)
    } else {
        begin_player_turns(table, journal)
    }
}

// ---------------------------------------------------------------------------
// Ходы игроков
// ---------------------------------------------------------------------------

fn begin_player_turns(table: &mut Table, journal: &mut RoomJournal) -> Result<(), EngineError> {
    table.phase = RoundPhase::PlayerTurn;
    table.active = next_active_position(table, None);
    journal.push(RoundEventKind::TurnAdvanced { to: table.active });

    if table.active.is_none() {
        after_player_turns(table, journal)
    } else {
        Ok(())
    }
}

/// Ход по активной руке. Рука на 21, перебор и дабл на одиночном тузе
/// автоматически передвигают курсор.
pub fn apply_player_action(
    table: &mut Table,
    journal: &mut RoomJournal,
    action: PlayerAction,
) -> Result<(), EngineError> {
    validate_player_action(table, &action)?;

    let cursor = table
        .active
        .ok_or(EngineError::Internal("PlayerTurn без курсора"))?;

    match action.kind {
        PlayerMove::Hit => {
            let card = draw_card(table)?;
            let seat = table
                .seat_mut(cursor.seat)
                .ok_or(EngineError::EmptySeat)?;
            let hand = &mut seat.hands[cursor.hand as usize];
            hand.take_card(card, HandAction::Hit);

            let (total, _) = hand_value(&hand.cards);
            if total >= 21 {
                hand.finished = true;
            }
            let finished = hand.finished;

            journal.push(RoundEventKind::PlayerActed {
                seat: cursor.seat,
                hand: cursor.hand,
                action: PlayerMove::Hit,
                card: Some(card),
                hand_total: total,
            });

            if finished {
                advance_turn(table, journal)?;
            }
        }

        PlayerMove::Double => {
            // Дабл на одиночном тузе терминален: одна карта и стоп.
            let (was_lone_ace, wager) = {
                let seat = table.seat(cursor.seat).ok_or(EngineError::EmptySeat)?;
                let hand = &seat.hands[cursor.hand as usize];
                (
                    hand.is_lone_ace(),
                    next_double_wager(hand.original_bet, hand.double_count),
                )
            };

            let card = draw_card(table)?;
            let seat = table
                .seat_mut(cursor.seat)
                .ok_or(EngineError::EmptySeat)?;
            seat.balance -= wager;
            let hand = &mut seat.hands[cursor.hand as usize];
            hand.double_count += 1;
            hand.take_card(card, HandAction::Double);

            let (total, _) = hand_value(&hand.cards);
            if was_lone_ace {
                hand.just_doubled_on_lone_ace = true;
                hand.finished = true;
            }
            if total >= 21 {
                hand.finished = true;
            }
            let finished = hand.finished;

            journal.push(RoundEventKind::PlayerActed {
                seat: cursor.seat,
                hand: cursor.hand,
                action: PlayerMove::Double,
                card: Some(card),
                hand_total: total,
            });

            if finished {
                advance_turn(table, journal)?;
            }
        }

        PlayerMove::Stand => {
            let seat = table
                .seat_mut(cursor.seat)
                .ok_or(EngineError::EmptySeat)?;
            let hand = &mut seat.hands[cursor.hand as usize];
            hand.finished = true;
            let (total, _) = hand_value(&hand.cards);

            journal.push(RoundEventKind::PlayerActed {
                seat: cursor.seat,
                hand: cursor.hand,
                action: PlayerMove::Stand,
                card: None,
                hand_total: total,
            });

            advance_turn(table, journal)?;
        }
    }

    Ok(())
}

/// Передвинуть курсор вперёд; None — ходы игроков закончились.
pub(crate) fn advance_turn(
    table: &mut Table,
    journal: &mut RoomJournal,
) -> Result<(), EngineError> {
    let next = next_active_position(table, table.active);
    table.active = next;
    journal.push(RoundEventKind::TurnAdvanced { to: next });

    if next.is_none() {
        after_player_turns(table, journal)
    } else {
        Ok(())
    }
}

/// После последнего хода: если все руки всех мест перебрали и сайд-ставок
/// нет — расчёт без добора дилера; иначе дилер играет.
fn after_player_turns(table: &mut Table, journal: &mut RoomJournal) -> Result<(), EngineError> {
    table.active = None;

    let in_round = seats_in_round(table);
    let all_busted = in_round.iter().all(|&s| {
        table
            .seat(s)
            .map(|seat| seat.hands.iter().all(|h| h.is_busted()))
            .unwrap_or(true)
    });
    let any_side_bet = in_round.iter().any(|&s| {
        table
            .seat(s)
            .map(|seat| !seat.side_bet.is_zero())
            .unwrap_or(false)
    });

    if all_busted && !any_side_bet {
        reveal_hole(table, journal);
        finish_round(table, journal)
    } else {
        dealer_play(table, journal)
    }
}

// ---------------------------------------------------------------------------
// Дилер и расчёт
// ---------------------------------------------------------------------------

fn reveal_hole(table: &mut Table, journal: &mut RoomJournal) {
    if let Some(card) = table.dealer_cards.get_mut(1) {
        if !card.face_up {
            card.face_up = true;
            journal.push(RoundEventKind::HoleRevealed { card: *card });
        }
    }
}

/// Добор дилера: открыть закрытую карту, брать пока H17 требует.
fn dealer_play(table: &mut Table, journal: &mut RoomJournal) -> Result<(), EngineError> {
    table.phase = RoundPhase::DealerTurn;
    reveal_hole(table, journal);

    while crate::engine::rules::dealer_must_hit(&table.dealer_cards) {
        let card = draw_card(table)?;
        table.dealer_cards.push(card);
        let (total, _) = hand_value(&table.dealer_cards);
        journal.push(RoundEventKind::DealerDrew {
            card,
            dealer_total: total,
        });
    }

    finish_round(table, journal)
}

/// Расчёт: чистое вычисление, затем отдельный шаг завершения
/// (балансы + история) — отображение и запись развязаны.
fn finish_round(table: &mut Table, journal: &mut RoomJournal) -> Result<(), EngineError> {
    let settlement = settlement::settle_round(table);
    table.settlement = Some(settlement);
    complete_settlement(table, journal)
}

/// Применить рассчитанный раунд: балансы, итоги рук, запись в архив.
/// Идемпотентно: повторный вызов для завершённого расчёта — no-op.
pub fn complete_settlement(
    table: &mut Table,
    journal: &mut RoomJournal,
) -> Result<(), EngineError> {
    let mut settlement = table
        .settlement
        .take()
        .ok_or(EngineError::Internal("нет рассчитанного раунда"))?;

    if !settlement.completed {
        for seat_result in &settlement.seats {
            if let Some(seat) = table.seat_mut(seat_result.seat) {
                seat.balance += seat_result.total_payout;
                for (idx, hand) in seat.hands.iter_mut().enumerate() {
                    if let Some(settled) = seat_result.hands.get(idx) {
                        hand.result = Some(settled.outcome);
                    }
                }
            }
        }
        settlement.completed = true;

        journal.record(HandHistoryRecord {
            settlement: settlement.clone(),
            reveal: seed::reveal_current(&table.fairness),
        });
        journal.push(RoundEventKind::RoundSettled {
            round_number: table.round_number,
        });
        tracing::debug!(
            room = table.id,
            round = table.round_number,
            dealer_total = settlement.dealer_total,
            "раунд рассчитан"
        );
    }

    table.settlement = Some(settlement);
    table.phase = RoundPhase::Settlement;
    table.active = None;
    Ok(())
}

// ---------------------------------------------------------------------------
// Между раундами
// ---------------------------------------------------------------------------

/// Готовность к следующему раунду. Когда готовы все присутствующие —
/// раунд подготавливается автоматически. Возвращает true, если стол
/// перешёл к новым ставкам.
pub fn mark_ready<C: CryptoService + ?Sized>(
    table: &mut Table,
    journal: &mut RoomJournal,
    crypto: &mut C,
    seat_idx: SeatIndex,
) -> Result<bool, EngineError> {
    ensure_phase(table, RoundPhase::Settlement)?;

    let seat = table
        .seat_mut(seat_idx)
        .ok_or(EngineError::EmptySeat)?;
    seat.is_ready = true;
    journal.push(RoundEventKind::ReadyMarked { seat: seat_idx });

    maybe_prepare_next_round(table, journal, crypto)
}

/// Если готовы все присутствующие сиденья — подготовить раунд.
pub(crate) fn maybe_prepare_next_round<C: CryptoService + ?Sized>(
    table: &mut Table,
    journal: &mut RoomJournal,
    crypto: &mut C,
) -> Result<bool, EngineError> {
    if table.phase != RoundPhase::Settlement {
        return Ok(false);
    }

    let mut any_present = false;
    for idx in 0..table.max_seats() {
        if let Some(seat) = table.seat(idx) {
            if seat.is_present() {
                any_present = true;
                if !seat.is_ready {
                    return Ok(false);
                }
            }
        }
    }
    if !any_present {
        return Ok(false);
    }

    prepare_next_round(table, journal, crypto)?;
    Ok(true)
}

/// Подготовка следующего раунда, атомарно:
/// - отложенные докупки применяются;
/// - server seed ротируется (предыдущий раскрыт), nonce растёт;
/// - шуз перевыводится свежим, курсор в ноль;
/// - пер-раундовое состояние сбрасывается, кнопка едет дальше.
///
/// Ни одна команда не видит стол между этими шагами.
pub fn prepare_next_round<C: CryptoService + ?Sized>(
    table: &mut Table,
    journal: &mut RoomJournal,
    crypto: &mut C,
) -> Result<(), EngineError> {
    ensure_phase(table, RoundPhase::Settlement)?;

    journal.start_new_round();

    for (seat_idx, amount) in std::mem::take(&mut table.pending_buy_ins) {
        if let Some(seat) = table.seat_mut(seat_idx) {
            seat.balance += amount;
            seat.buy_in += amount;
            journal.push(RoundEventKind::BuyInApplied {
                seat: seat_idx,
                amount,
            });
        }
    }

    let cut_flag_was = settlement::shoe_needs_rebuild(table);
    seed::rotate(&mut table.fairness, crypto);
    let order = shuffle::derive_shoe_order(
        crypto,
        &table.fairness.server_seed,
        &table.fairness.client_seed,
        table.fairness.nonce,
    );
    table.shoe = Shoe::from_order(order);

    for seat_opt in table.seats.iter_mut() {
        if let Some(seat) = seat_opt {
            seat.reset_for_next_round();
        }
    }

    table.dealer_cards.clear();
    table.insurance.clear();
    table.settlement = None;
    table.active = None;
    table.button = next_button(table);
    table.round_number += 1;
    table.phase = RoundPhase::Betting;

    journal.push(RoundEventKind::SeedRotated {
        nonce: table.fairness.nonce,
        cut_flag_was,
    });
    journal.push(RoundEventKind::RoundOpened {
        round_number: table.round_number,
    });
    tracing::debug!(
        room = table.id,
        round = table.round_number,
        nonce = table.fairness.nonce,
        cut_flag_was,
        "раунд подготовлен, шуз перевыведен"
    );

    Ok(())
}

// ---------------------------------------------------------------------------
// Присутствие, seed, номиналы, докупки
// ---------------------------------------------------------------------------

/// Сменить статус away. Может разблокировать раздачу, страховку,
/// ход или подготовку следующего раунда.
pub fn toggle_away<C: CryptoService + ?Sized>(
    table: &mut Table,
    journal: &mut RoomJournal,
    crypto: &mut C,
    seat_idx: SeatIndex,
) -> Result<bool, EngineError> {
    let seat = table
        .seat_mut(seat_idx)
        .ok_or(EngineError::EmptySeat)?;
    seat.is_away = !seat.is_away;
    let is_away = seat.is_away;

    journal.push(RoundEventKind::AwayToggled {
        seat: seat_idx,
        is_away,
    });
    presence_side_effects(table, journal, crypto)?;
    Ok(is_away)
}

/// Внешний session-слой сообщает о подключении/отключении.
/// Дисконнект не отменяет раунд: текущая рука остаётся как есть,
/// очередь идёт дальше.
pub fn set_connected<C: CryptoService + ?Sized>(
    table: &mut Table,
    journal: &mut RoomJournal,
    crypto: &mut C,
    seat_idx: SeatIndex,
    connected: bool,
) -> Result<(), EngineError> {
    let seat = table
        .seat_mut(seat_idx)
        .ok_or(EngineError::EmptySeat)?;
    if seat.connected == connected {
        return Ok(());
    }
    seat.connected = connected;

    journal.push(RoundEventKind::ConnectionChanged {
        seat: seat_idx,
        connected,
    });
    presence_side_effects(table, journal, crypto)?;
    Ok(())
}

/// Общие последствия смены присутствия для текущей фазы.
pub(crate) fn presence_side_effects<C: CryptoService + ?Sized>(
    table: &mut Table,
    journal: &mut RoomJournal,
    crypto: &mut C,
) -> Result<(), EngineError> {
    match table.phase {
        RoundPhase::Betting => maybe_start_dealing(table, journal),
        RoundPhase::InsuranceOffered => maybe_resolve_insurance(table, journal),
        RoundPhase::PlayerTurn => {
            if let Some(cursor) = table.active {
                let still_eligible = table
                    .seat(cursor.seat)
                    .map(|s| s.is_in_round() && s.is_present())
                    .unwrap_or(false);
                if !still_eligible {
                    return advance_turn(table, journal);
                }
            }
            Ok(())
        }
        RoundPhase::Settlement => maybe_prepare_next_round(table, journal, crypto).map(|_| ()),
        _ => Ok(()),
    }
}

/// Сменить клиентский seed комнаты. Вступает в силу со следующей
/// деривации шуза, текущий раунд не трогает.
pub fn set_client_seed(
    table: &mut Table,
    journal: &mut RoomJournal,
    seat_idx: SeatIndex,
    new_seed: String,
) -> Result<(), EngineError> {
    if table.seat(seat_idx).is_none() {
        return Err(EngineError::EmptySeat);
    }
    if new_seed.is_empty() || new_seed.len() > 64 {
        return Err(EngineError::InvalidClientSeed);
    }

    table.fairness.pending_client_seed = Some(new_seed);
    journal.push(RoundEventKind::ClientSeedChanged { seat: seat_idx });
    Ok(())
}

/// Сменить номиналы фишек стола (проверка «кто может» — у менеджера).
pub fn set_chip_denoms(table: &mut Table, denoms: Vec<u64>) -> Result<(), EngineError> {
    if denoms.is_empty() || denoms.iter().any(|d| *d == 0) {
        return Err(EngineError::InvalidDenominations);
    }
    table.chip_denoms = denoms;
    Ok(())
}

/// Докупка: пока деньги сиденья не в игре — применяем сразу,
/// иначе откладываем до подготовки следующего раунда.
pub fn request_buy_in(
    table: &mut Table,
    journal: &mut RoomJournal,
    seat_idx: SeatIndex,
    amount: Chips,
) -> Result<(), EngineError> {
    if amount.is_zero() {
        return Err(EngineError::InvalidBet);
    }
    let has_bet = table
        .seat(seat_idx)
        .ok_or(EngineError::EmptySeat)?
        .has_bet;

    let apply_now = matches!(table.phase, RoundPhase::Lobby)
        || (matches!(table.phase, RoundPhase::Betting) && !has_bet);

    if apply_now {
        let seat = table
            .seat_mut(seat_idx)
            .ok_or(EngineError::EmptySeat)?;
        seat.balance += amount;
        seat.buy_in += amount;
        journal.push(RoundEventKind::BuyInApplied {
            seat: seat_idx,
            amount,
        });
    } else {
        table.pending_buy_ins.push((seat_idx, amount));
        journal.push(RoundEventKind::BuyInQueued {
            seat: seat_idx,
            amount,
        });
    }
    Ok(())
}
