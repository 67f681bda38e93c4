// src/bin/blackjack_dev_cli.rs
//
// Dev-CLI: комната на трёх игроков, пара автоматических раундов
// (добор до 17, дальше stand) + верификация provably-fair раскрытия.

use blackjack_engine::api::{build_client_state, ClientTableState};
use blackjack_engine::domain::chips::Chips;
use blackjack_engine::domain::table::RoundPhase;
use blackjack_engine::domain::PlayerId;
use blackjack_engine::engine::{PlayerMove, RoomManager};
use blackjack_engine::infra::{verify_reveal, OsCrypto};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .init();

    println!("blackjack_dev_cli: стартуем dev-комнату…");

    let mut crypto = OsCrypto;
    let mut manager = RoomManager::new();

    // 1. Хост создаёт комнату, двое заходят по коду.
    let (room_id, code, host) =
        manager.create_room(&mut crypto, "Alice".to_string(), Chips::new(100_000));
    println!("[CLI] Комната {room_id}, код {code}");

    let (_, bob, _) = manager
        .join_room(&code, "Bob".to_string(), Chips::new(100_000), false)
        .expect("join Bob");
    let (_, carol, _) = manager
        .join_room(&code, "Carol".to_string(), Chips::new(100_000), false)
        .expect("join Carol");
    let players = [host, bob, carol];

    // 2. Кнопку разыгрываем костями и стартуем первый раунд.
    let roll = manager
        .roll_button_dice(&mut crypto, host)
        .expect("dice roll");
    println!(
        "[CLI] Кости: {:?} → кнопка на месте {}",
        roll.rolls
            .iter()
            .map(|r| (r.seat, r.die1, r.die2))
            .collect::<Vec<_>>(),
        roll.selected
    );
    manager.start_round(host).expect("start_round");

    for round in 1..=2u32 {
        println!();
        println!("================ ROUND {round} =================");
        play_round(&mut manager, &players);

        let state = snapshot(&manager, host);
        print_settlement(&state);

        // Готовность всех присутствующих запускает следующий раунд.
        for &pid in &players {
            if state.seats.iter().any(|s| s.player_id == pid) {
                let _ = manager.ready_for_next(&mut crypto, pid);
            }
        }

        // Верифицируем раскрытие только что сыгранного раунда.
        let state = snapshot(&manager, host);
        if let Some(reveal) = &state.fair.previous {
            let outcome = verify_reveal(&crypto, reveal);
            println!(
                "[CLI] verify: hash_match={} cards_match={} (nonce={})",
                outcome.hash_match, outcome.cards_match, reveal.nonce
            );
        }
    }

    println!("[CLI] Завершение работы dev-CLI.");
}

/// Один раунд: все ставят по 2 руки, дальше простая стратегия.
fn play_round(manager: &mut RoomManager, players: &[PlayerId]) {
    let host = players[0];

    for &pid in players {
        let state = snapshot(manager, host);
        let seated = state
            .seats
            .iter()
            .any(|s| s.player_id == pid && !s.is_button);
        if seated && state.phase == RoundPhase::Betting {
            match manager.place_bet(pid, Chips::new(500), Chips::new(100), 2) {
                Ok(()) => println!("[CLI] player {pid}: ставка принята"),
                Err(e) => println!("[CLI] player {pid}: ставка отклонена: {e:?}"),
            }
        }
    }

    // Страховка: всегда отказываемся.
    loop {
        let state = snapshot(manager, host);
        match state.phase {
            RoundPhase::InsuranceOffered => {
                for seat in &state.seats {
                    if seat.has_bet && seat.insurance_taken.is_none() {
                        let _ = manager.insurance_decision(seat.player_id, false);
                    }
                }
            }
            RoundPhase::PlayerTurn => {
                let Some(cursor) = state.active else { break };
                let seat = state
                    .seats
                    .iter()
                    .find(|s| s.seat_index == cursor.seat)
                    .expect("active seat");
                let hand = &seat.hands[cursor.hand as usize];
                let mv = if hand.value < 17 {
                    PlayerMove::Hit
                } else {
                    PlayerMove::Stand
                };
                if manager.player_action(seat.player_id, mv).is_err() {
                    break;
                }
            }
            RoundPhase::Settlement => break,
            _ => break,
        }
    }
}

fn snapshot(manager: &RoomManager, viewer: PlayerId) -> ClientTableState {
    let room_id = manager.room_of_player(viewer).expect("viewer in room");
    let room = manager.room(room_id).expect("room exists");
    build_client_state(room, viewer)
}

fn print_settlement(state: &ClientTableState) {
    let Some(settlement) = &state.settlement else {
        println!("[CLI] Раунд ещё не рассчитан");
        return;
    };
    println!(
        "[CLI] Дилер: {} | {}",
        settlement.dealer_total, settlement.message
    );
    for seat in &settlement.seats {
        for (idx, hand) in seat.hands.iter().enumerate() {
            println!(
                "[CLI]   {} рука {}: {:?} (+{})",
                seat.display_name, idx, hand.outcome, hand.payout
            );
        }
    }
}
