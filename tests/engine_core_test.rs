//! Базовый прогон машины фаз: ставки → раздача → ходы → дилер → расчёт
//! → подготовка следующего раунда.

use blackjack_engine::domain::card::{Card, Rank, Suit, SHOE_SIZE};
use blackjack_engine::domain::chips::Chips;
use blackjack_engine::domain::seat::Seat;
use blackjack_engine::domain::shoe::Shoe;
use blackjack_engine::domain::table::{ActiveCursor, RoundPhase, Table, TableConfig};
use blackjack_engine::domain::hand::HandOutcome;
use blackjack_engine::engine::actions::{PlayerAction, PlayerMove};
use blackjack_engine::engine::hand_history::RoomJournal;
use blackjack_engine::engine::round;
use blackjack_engine::infra::{initial_fairness, FixedCrypto};

// -----------------------------
// ВСПОМОГАТЕЛЬНЫЕ КОНСТРУКТОРЫ
// -----------------------------

fn idx(rank: Rank, suit: Suit) -> u16 {
    Card::shoe_index(rank, suit)
}

/// Шуз с заданным началом; остаток добивается по возрастанию индексов.
fn stacked_shoe(front: &[u16]) -> Shoe {
    let mut order: Vec<u16> = front.to_vec();
    for i in 0..SHOE_SIZE {
        if !order.contains(&i) {
            order.push(i);
        }
    }
    Shoe::from_order(order)
}

/// Стол с местами по списку балансов; player_id = номер места + 1.
fn make_table(balances: &[u64]) -> (Table, RoomJournal) {
    let mut crypto = FixedCrypto::from_u64(1);
    let fairness = initial_fairness(&mut crypto, "TEST01".to_string());
    let config = TableConfig::default();
    let cap = config.history_cap;
    let mut table = Table::new(1, "TEST01".to_string(), 1, config, fairness, stacked_shoe(&[]));
    for (i, bal) in balances.iter().enumerate() {
        table.seats[i] = Some(Seat::new(
            (i + 1) as u64,
            format!("P{}", i + 1),
            Chips(*bal),
        ));
    }
    (table, RoomJournal::new(cap))
}

fn act(table: &mut Table, journal: &mut RoomJournal, seat: u8, kind: PlayerMove) {
    let player_id = table.seat(seat).unwrap().player_id;
    round::apply_player_action(
        table,
        journal,
        PlayerAction {
            player_id,
            seat,
            kind,
        },
    )
    .expect("action must be legal");
}

//
// TEST 1 — полный раунд на два места
//
#[test]
fn full_round_two_seats() {
    let (mut table, mut journal) = make_table(&[10_000, 10_000]);
    table.shoe = stacked_shoe(&[
        idx(Rank::Ten, Suit::Clubs),  // seat 0
        idx(Rank::Six, Suit::Clubs),  // seat 1
        idx(Rank::Nine, Suit::Clubs), // дилер, открытая
        idx(Rank::Nine, Suit::Diamonds), // дилер, закрытая
        idx(Rank::Nine, Suit::Hearts), // hit seat 0
    ]);

    round::start_round(&mut table, &mut journal).unwrap();
    assert_eq!(table.phase, RoundPhase::Betting);
    assert_eq!(table.round_number, 1);

    // Первая ставка не запускает раздачу: ждём второе место.
    round::place_bet(&mut table, &mut journal, 0, Chips(100), Chips::ZERO, 1).unwrap();
    assert_eq!(table.phase, RoundPhase::Betting);
    assert_eq!(table.seat(0).unwrap().balance, Chips(9_900));

    // Вторая ставка — раздача и сразу ходы (9 открытая: ни страховки, ни peek).
    round::place_bet(&mut table, &mut journal, 1, Chips(100), Chips::ZERO, 1).unwrap();
    assert_eq!(table.phase, RoundPhase::PlayerTurn);
    assert_eq!(table.active, Some(ActiveCursor { seat: 0, hand: 0 }));

    // Каждая рука получила ровно одну открытую карту.
    assert_eq!(table.seat(0).unwrap().hands[0].cards.len(), 1);
    assert_eq!(table.seat(1).unwrap().hands[0].cards.len(), 1);
    assert_eq!(table.dealer_cards.len(), 2);
    assert!(table.dealer_cards[0].face_up);
    assert!(!table.dealer_cards[1].face_up, "hole card stays face down");

    // Seat 0: hit до 19, рука остаётся активной.
    act(&mut table, &mut journal, 0, PlayerMove::Hit);
    assert_eq!(table.active, Some(ActiveCursor { seat: 0, hand: 0 }));

    // Stand — ход уходит второму месту.
    act(&mut table, &mut journal, 0, PlayerMove::Stand);
    assert_eq!(table.active, Some(ActiveCursor { seat: 1, hand: 0 }));

    // Seat 1 stand — дилер (18) не добирает, раунд рассчитан.
    act(&mut table, &mut journal, 1, PlayerMove::Stand);
    assert_eq!(table.phase, RoundPhase::Settlement);
    assert!(table.dealer_cards[1].face_up, "hole revealed for settlement");

    let settlement = table.settlement.as_ref().expect("settlement stored");
    assert!(settlement.completed);
    assert_eq!(settlement.dealer_total, 18);
    assert_eq!(settlement.seats.len(), 2);
    assert_eq!(settlement.seats[0].hands[0].outcome, HandOutcome::Win);
    assert_eq!(settlement.seats[1].hands[0].outcome, HandOutcome::Lose);

    // Балансы применены отдельным шагом завершения.
    assert_eq!(table.seat(0).unwrap().balance, Chips(10_100));
    assert_eq!(table.seat(1).unwrap().balance, Chips(9_900));
    assert_eq!(table.seat(0).unwrap().hands[0].result, Some(HandOutcome::Win));

    // Запись истории появилась и содержит раскрытие раунда.
    assert_eq!(journal.archive.len(), 1);
    let record = journal.archive.back().unwrap();
    assert_eq!(record.reveal.nonce, 0);
    assert_eq!(record.reveal.dealt_indices.len(), 5);
    assert_eq!(
        record.reveal.server_seed_hash,
        table.fairness.server_seed_hash
    );
}

//
// TEST 2 — готовность всех запускает следующий раунд с новым шузом
//
#[test]
fn ready_flow_prepares_next_round() {
    let (mut table, mut journal) = make_table(&[10_000, 10_000]);
    table.shoe = stacked_shoe(&[
        idx(Rank::Ten, Suit::Clubs),
        idx(Rank::Six, Suit::Clubs),
        idx(Rank::Nine, Suit::Clubs),
        idx(Rank::Nine, Suit::Diamonds),
    ]);
    round::start_round(&mut table, &mut journal).unwrap();
    round::place_bet(&mut table, &mut journal, 0, Chips(100), Chips::ZERO, 1).unwrap();
    round::place_bet(&mut table, &mut journal, 1, Chips(100), Chips::ZERO, 1).unwrap();
    act(&mut table, &mut journal, 0, PlayerMove::Stand);
    act(&mut table, &mut journal, 1, PlayerMove::Stand);
    assert_eq!(table.phase, RoundPhase::Settlement);

    let old_hash = table.fairness.server_seed_hash.clone();
    let mut crypto = FixedCrypto::from_u64(2);

    let started = round::mark_ready(&mut table, &mut journal, &mut crypto, 0).unwrap();
    assert!(!started, "first ready must not flip the round");

    let started = round::mark_ready(&mut table, &mut journal, &mut crypto, 1).unwrap();
    assert!(started, "last ready prepares the next round");

    assert_eq!(table.phase, RoundPhase::Betting);
    assert_eq!(table.round_number, 2);
    assert_eq!(table.fairness.nonce, 1);
    assert_ne!(table.fairness.server_seed_hash, old_hash);
    assert_eq!(table.shoe.position, 0);
    assert!(!table.shoe.cut_flag);
    assert_eq!(table.shoe.order.len(), SHOE_SIZE as usize);

    // Предыдущий раунд раскрыт под старым commitment'ом.
    let prev = table.fairness.previous.as_ref().unwrap();
    assert_eq!(prev.server_seed_hash, old_hash);
    assert_eq!(prev.nonce, 0);

    // Пер-раундовое состояние сброшено, балансы живут дальше.
    let seat = table.seat(0).unwrap();
    assert!(seat.hands.is_empty());
    assert!(!seat.has_bet);
    assert!(!seat.is_ready);
    assert_eq!(table.dealer_cards.len(), 0);
    assert!(table.settlement.is_none());
}

//
// TEST 3 — несколько рук одного места идут по порядку
//
#[test]
fn multi_hand_cursor_order() {
    let (mut table, mut journal) = make_table(&[10_000]);
    table.shoe = stacked_shoe(&[
        idx(Rank::Ten, Suit::Clubs),   // рука 0
        idx(Rank::Nine, Suit::Clubs),  // рука 1
        idx(Rank::Eight, Suit::Clubs), // дилер, открытая
        idx(Rank::Eight, Suit::Diamonds), // дилер, закрытая
        idx(Rank::King, Suit::Diamonds),  // добор дилера (16 → 26)
    ]);

    round::start_round(&mut table, &mut journal).unwrap();
    round::place_bet(&mut table, &mut journal, 0, Chips(100), Chips::ZERO, 2).unwrap();
    assert_eq!(table.seat(0).unwrap().balance, Chips(9_800));
    assert_eq!(table.seat(0).unwrap().hands.len(), 2);
    assert_eq!(table.active, Some(ActiveCursor { seat: 0, hand: 0 }));

    act(&mut table, &mut journal, 0, PlayerMove::Stand);
    assert_eq!(
        table.active,
        Some(ActiveCursor { seat: 0, hand: 1 }),
        "next hand of the same seat comes first"
    );

    act(&mut table, &mut journal, 0, PlayerMove::Stand);
    assert_eq!(table.phase, RoundPhase::Settlement);

    // Дилер 16 обязан добрать и перебирает 26: обе руки выигрывают 1:1.
    let settlement = table.settlement.as_ref().unwrap();
    assert_eq!(settlement.dealer_total, 26);
    assert_eq!(settlement.seats[0].hands.len(), 2);
    assert!(settlement.seats[0]
        .hands
        .iter()
        .all(|h| h.outcome == HandOutcome::Win));
    assert_eq!(table.seat(0).unwrap().balance, Chips(10_200));
}

//
// TEST 4 — away-место не блокирует начало раздачи и не получает карт
//
#[test]
fn away_seat_is_skipped() {
    let (mut table, mut journal) = make_table(&[10_000, 10_000]);
    table.seat_mut(1).unwrap().is_away = true;
    table.shoe = stacked_shoe(&[
        idx(Rank::Ten, Suit::Clubs),
        idx(Rank::Nine, Suit::Clubs),
        idx(Rank::Nine, Suit::Diamonds),
    ]);

    round::start_round(&mut table, &mut journal).unwrap();
    round::place_bet(&mut table, &mut journal, 0, Chips(100), Chips::ZERO, 1).unwrap();

    // Единственная ожидаемая ставка собрана — раздача пошла сразу.
    assert_eq!(table.phase, RoundPhase::PlayerTurn);
    assert!(table.seat(1).unwrap().hands.is_empty());
    assert_eq!(table.active, Some(ActiveCursor { seat: 0, hand: 0 }));
}

//
// TEST 5 — кнопка сидит вне раунда
//
#[test]
fn button_seat_sits_out() {
    let (mut table, mut journal) = make_table(&[10_000, 10_000]);
    round::select_button(&mut table, &mut journal, 1).unwrap();
    table.shoe = stacked_shoe(&[
        idx(Rank::Ten, Suit::Clubs),
        idx(Rank::Nine, Suit::Clubs),
        idx(Rank::Nine, Suit::Diamonds),
    ]);

    round::start_round(&mut table, &mut journal).unwrap();
    round::place_bet(&mut table, &mut journal, 0, Chips(100), Chips::ZERO, 1).unwrap();

    assert_eq!(table.phase, RoundPhase::PlayerTurn);
    let button_seat = table.seat(1).unwrap();
    assert!(button_seat.hands.is_empty(), "button gets no cards");
    assert_eq!(button_seat.balance, Chips(10_000), "button bets nothing");

    act(&mut table, &mut journal, 0, PlayerMove::Stand);
    assert_eq!(table.phase, RoundPhase::Settlement);

    // Кнопка не попадает в расчёт.
    let settlement = table.settlement.as_ref().unwrap();
    assert!(settlement.seats.iter().all(|s| s.seat != 1));
    assert_eq!(table.seat(1).unwrap().balance, Chips(10_000));
}
