use serde::{Deserialize, Serialize};

use crate::domain::hand::hand_value;
use crate::domain::table::Table;
use crate::domain::PlayerId;
use crate::engine::hand_history::HandHistoryRecord;
use crate::engine::rules::available_actions;
use crate::engine::Room;

use super::dto::{ClientTableState, DealerView, HandView, ProvablyFairView, SeatView};

/// Запросы «только чтение».
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Query {
    /// Состояние стола глазами игрока.
    GetState,

    /// Архив завершённых раундов комнаты.
    GetHistory,
}

/// Результат запроса «только чтение».
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum QueryResponse {
    State(ClientTableState),
    History(Vec<HandHistoryRecord>),
}

/// Собрать состояние стола для конкретного зрителя.
///
/// Пер-зрительское здесь немного: руки всех мест открыты, прячется
/// только закрытая карта дилера (до reveal), а блок доступных действий
/// заполняется только для активной руки самого зрителя.
pub fn build_client_state(room: &Room, viewer: PlayerId) -> ClientTableState {
    let table = &room.table;
    let viewer_seat = table.seat_of(viewer);

    let seats = build_seats(table, viewer_seat);
    let dealer = build_dealer(table);

    ClientTableState {
        room_id: table.id,
        room_code: table.room_code.clone(),
        viewer,
        viewer_seat,
        host: table.host,
        phase: table.phase,
        round_number: table.round_number,
        button: table.button,
        active: table.active,
        seats,
        spectators: table
            .spectators
            .iter()
            .map(|s| s.display_name.clone())
            .collect(),
        dealer,
        chip_denoms: table.chip_denoms.clone(),
        min_bet: table.config.min_bet,
        shoe_remaining: table.shoe.remaining(),
        cut_flag: table.shoe.cut_flag,
        settlement: table.settlement.clone(),
        fair: ProvablyFairView {
            server_seed_hash: table.fairness.server_seed_hash.clone(),
            client_seed: table.fairness.client_seed.clone(),
            pending_client_seed: table.fairness.pending_client_seed.clone(),
            nonce: table.fairness.nonce,
            previous: table.fairness.previous.clone(),
        },
    }
}

/// Архив раздач комнаты (от старых к новым).
pub fn build_history(room: &Room) -> Vec<HandHistoryRecord> {
    room.journal.archive.iter().cloned().collect()
}

fn build_seats(table: &Table, viewer_seat: Option<u8>) -> Vec<SeatView> {
    let mut res = Vec::new();

    for (idx, seat_opt) in table.seats.iter().enumerate() {
        let seat = match seat_opt {
            Some(s) => s,
            None => continue,
        };
        let seat_idx = idx as u8;
        let insurance = table.insurance.get(&seat_idx);

        let hands = seat
            .hands
            .iter()
            .enumerate()
            .map(|(hand_idx, hand)| {
                let (value, is_soft) = hand_value(&hand.cards);

                // Доступные действия показываем только владельцу активной руки.
                let is_viewers_active_hand = viewer_seat == Some(seat_idx)
                    && table.active.map(|c| {
                        c.seat == seat_idx && c.hand == hand_idx as u8
                    }) == Some(true);
                let available = if is_viewers_active_hand {
                    Some(available_actions(
                        &hand.cards,
                        hand.double_count,
                        hand.original_bet,
                        seat.balance,
                        hand.just_doubled_on_lone_ace,
                    ))
                } else {
                    None
                };

                HandView {
                    cards: hand.cards.clone(),
                    value,
                    is_soft,
                    original_bet: hand.original_bet,
                    double_count: hand.double_count,
                    total_wager: crate::engine::rules::total_wager(
                        hand.original_bet,
                        hand.double_count,
                    ),
                    just_doubled_on_lone_ace: hand.just_doubled_on_lone_ace,
                    finished: hand.finished,
                    result: hand.result,
                    actions: hand.actions.clone(),
                    available,
                }
            })
            .collect();

        res.push(SeatView {
            seat_index: seat_idx,
            player_id: seat.player_id,
            display_name: seat.display_name.clone(),
            balance: seat.balance,
            buy_in: seat.buy_in,
            hands,
            side_bet: seat.side_bet,
            has_bet: seat.has_bet,
            is_ready: seat.is_ready,
            connected: seat.connected,
            is_away: seat.is_away,
            is_button: table.button == Some(seat_idx),
            insurance_taken: insurance.map(|e| e.taken),
            insurance_bet: insurance
                .map(|e| e.bet)
                .unwrap_or(crate::domain::chips::Chips::ZERO),
        });
    }

    res
}

fn build_dealer(table: &Table) -> DealerView {
    let visible: Vec<_> = table
        .dealer_cards
        .iter()
        .filter(|c| c.face_up)
        .copied()
        .collect();
    let (visible_value, _) = hand_value(&visible);

    DealerView {
        cards: table
            .dealer_cards
            .iter()
            .map(|c| if c.face_up { Some(*c) } else { None })
            .collect(),
        visible_value,
        hole_revealed: table
            .dealer_cards
            .get(1)
            .map(|c| c.face_up)
            .unwrap_or(false),
    }
}
