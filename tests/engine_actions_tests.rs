//! Действия по руке: hit/stand/double, автопереходы, дабл на одиночном
//! тузе, эскалация повторных даблов, расчёт без добора дилера.

use blackjack_engine::domain::card::{Card, Rank, Suit, SHOE_SIZE};
use blackjack_engine::domain::chips::Chips;
use blackjack_engine::domain::hand::HandOutcome;
use blackjack_engine::domain::seat::Seat;
use blackjack_engine::domain::shoe::Shoe;
use blackjack_engine::domain::table::{RoundPhase, Table, TableConfig};
use blackjack_engine::engine::actions::{PlayerAction, PlayerMove};
use blackjack_engine::engine::hand_history::RoomJournal;
use blackjack_engine::engine::round;
use blackjack_engine::infra::{initial_fairness, FixedCrypto};

fn idx(rank: Rank, suit: Suit) -> u16 {
    Card::shoe_index(rank, suit)
}

fn stacked_shoe(front: &[u16]) -> Shoe {
    let mut order: Vec<u16> = front.to_vec();
    for i in 0..SHOE_SIZE {
        if !order.contains(&i) {
            order.push(i);
        }
    }
    Shoe::from_order(order)
}

fn make_table(balances: &[u64]) -> (Table, RoomJournal) {
    let mut crypto = FixedCrypto::from_u64(1);
    let fairness = initial_fairness(&mut crypto, "TEST02".to_string());
    let config = TableConfig::default();
    let cap = config.history_cap;
    let mut table = Table::new(2, "TEST02".to_string(), 1, config, fairness, stacked_shoe(&[]));
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

/// Одно место, одна рука, раунд доведён до PlayerTurn.
fn start_single(front: &[u16], bet: u64, side_bet: u64) -> (Table, RoomJournal) {
    let (mut table, mut journal) = make_table(&[10_000]);
    table.shoe = stacked_shoe(front);
    round::start_round(&mut table, &mut journal).unwrap();
    round::place_bet(
        &mut table,
        &mut journal,
        0,
        Chips(bet),
        Chips(side_bet),
        1,
    )
    .unwrap();
    (table, journal)
}

//
// TEST 1 — дабл на одиночном тузе: одна карта и никакого продолжения
//
#[test]
fn lone_ace_double_is_terminal() {
    let (mut table, mut journal) = start_single(
        &[
            idx(Rank::Ace, Suit::Clubs),     // рука игрока
            idx(Rank::Nine, Suit::Clubs),    // дилер, открытая
            idx(Rank::Nine, Suit::Diamonds), // дилер, закрытая
            idx(Rank::Five, Suit::Diamonds), // карта дабла
        ],
        100,
        0,
    );
    assert_eq!(table.phase, RoundPhase::PlayerTurn);

    act(&mut table, &mut journal, 0, PlayerMove::Double);

    // Рука закончена немедленно, раунд дошёл до расчёта.
    assert_eq!(table.phase, RoundPhase::Settlement);
    let seat = table.seat(0).unwrap();
    let hand = &seat.hands[0];
    assert_eq!(hand.cards.len(), 2, "exactly one card after the double");
    assert!(hand.just_doubled_on_lone_ace);
    assert!(hand.finished);
    assert_eq!(hand.double_count, 1);

    // Списано: ставка 100 + дабл 100; дилер 18 против soft 16 — проигрыш.
    let settlement = table.settlement.as_ref().unwrap();
    assert_eq!(settlement.seats[0].hands[0].total_wager, Chips(200));
    assert_eq!(settlement.seats[0].hands[0].outcome, HandOutcome::Lose);
    assert_eq!(seat.balance, Chips(9_800));
}

//
// TEST 2 — повторные даблы эскалируют ставку: 100, 100, 200, 400
//
#[test]
fn redoubling_escalates_wager() {
    let (mut table, mut journal) = start_single(
        &[
            idx(Rank::Two, Suit::Clubs),
            idx(Rank::Nine, Suit::Clubs),    // дилер, открытая
            idx(Rank::Ten, Suit::Clubs),     // дилер, закрытая (19)
            idx(Rank::Two, Suit::Diamonds),  // дабл 1
            idx(Rank::Two, Suit::Hearts),    // дабл 2
            idx(Rank::Three, Suit::Clubs),   // дабл 3
        ],
        100,
        0,
    );

    act(&mut table, &mut journal, 0, PlayerMove::Double); // −100
    assert_eq!(table.phase, RoundPhase::PlayerTurn, "double does not end the turn");
    act(&mut table, &mut journal, 0, PlayerMove::Double); // −200
    act(&mut table, &mut journal, 0, PlayerMove::Double); // −400
    act(&mut table, &mut journal, 0, PlayerMove::Stand);

    assert_eq!(table.phase, RoundPhase::Settlement);
    let settlement = table.settlement.as_ref().unwrap();
    let hand = &settlement.seats[0].hands[0];
    assert_eq!(hand.double_count, 3);
    assert_eq!(hand.total_wager, Chips(800));
    assert_eq!(hand.outcome, HandOutcome::Lose); // 9 против 19

    // 10_000 − 100 − 100 − 200 − 400 = 9_200.
    assert_eq!(table.seat(0).unwrap().balance, Chips(9_200));
}

//
// TEST 3 — добор до 21 завершает руку автоматически
//
#[test]
fn hitting_to_21_auto_advances() {
    let (mut table, mut journal) = start_single(
        &[
            idx(Rank::Five, Suit::Clubs),
            idx(Rank::Nine, Suit::Clubs),
            idx(Rank::Nine, Suit::Diamonds), // дилер 18
            idx(Rank::Six, Suit::Clubs),     // hit → 11
            idx(Rank::King, Suit::Clubs),    // hit → 21
        ],
        100,
        0,
    );

    act(&mut table, &mut journal, 0, PlayerMove::Hit);
    assert_eq!(table.phase, RoundPhase::PlayerTurn);
    act(&mut table, &mut journal, 0, PlayerMove::Hit);

    // 21 — рука закрыта без явного stand, раунд рассчитан.
    assert_eq!(table.phase, RoundPhase::Settlement);
    let settlement = table.settlement.as_ref().unwrap();
    let hand = &settlement.seats[0].hands[0];
    // Три карты — это просто 21, не блэкджек.
    assert_eq!(hand.outcome, HandOutcome::Win);
    assert_eq!(hand.payout, Chips(200));
}

//
// TEST 4 — все руки перебрали, сайд-ставок нет: дилер не добирает
//
#[test]
fn all_bust_skips_dealer_draw() {
    let (mut table, mut journal) = start_single(
        &[
            idx(Rank::King, Suit::Clubs),
            idx(Rank::Nine, Suit::Clubs),
            idx(Rank::Seven, Suit::Diamonds), // дилер 16 — но добора не будет
            idx(Rank::Five, Suit::Clubs),     // hit → 15
            idx(Rank::Eight, Suit::Clubs),    // hit → 23, перебор
        ],
        100,
        0,
    );

    act(&mut table, &mut journal, 0, PlayerMove::Hit);
    act(&mut table, &mut journal, 0, PlayerMove::Hit);

    assert_eq!(table.phase, RoundPhase::Settlement);
    assert_eq!(
        table.dealer_cards.len(),
        2,
        "dealer must not draw when every hand busted and no side bet rides"
    );
    assert!(table.dealer_cards[1].face_up, "hole still revealed for display");
    let settlement = table.settlement.as_ref().unwrap();
    assert_eq!(settlement.seats[0].hands[0].outcome, HandOutcome::Lose);
}

//
// TEST 5 — сайд-ставка заставляет дилера доигрывать даже при переборе всех
//
#[test]
fn side_bet_forces_dealer_play() {
    let (mut table, mut journal) = start_single(
        &[
            idx(Rank::King, Suit::Clubs),
            idx(Rank::Nine, Suit::Clubs),
            idx(Rank::Seven, Suit::Diamonds), // дилер 16
            idx(Rank::Five, Suit::Clubs),     // hit → 15
            idx(Rank::Eight, Suit::Clubs),    // hit → 23, перебор
            idx(Rank::Six, Suit::Clubs),      // добор дилера → 22
        ],
        100,
        50,
    );

    act(&mut table, &mut journal, 0, PlayerMove::Hit);
    act(&mut table, &mut journal, 0, PlayerMove::Hit);

    assert_eq!(table.phase, RoundPhase::Settlement);
    assert_eq!(table.dealer_cards.len(), 3, "side bet keeps the dealer playing");

    let settlement = table.settlement.as_ref().unwrap();
    assert_eq!(settlement.dealer_total, 22);
    let seat_result = &settlement.seats[0];
    assert_eq!(seat_result.hands[0].outcome, HandOutcome::Lose);
    assert_eq!(seat_result.hands[0].side_bet_payout, Chips(600));

    // 10_000 − 100 − 50 + 600 = 10_450.
    assert_eq!(table.seat(0).unwrap().balance, Chips(10_450));
}

//
// TEST 6 — дабл после хита: ставка та же, рука продолжается
//
#[test]
fn double_after_hit_keeps_hand_alive() {
    let (mut table, mut journal) = start_single(
        &[
            idx(Rank::Three, Suit::Clubs),
            idx(Rank::Nine, Suit::Clubs),
            idx(Rank::Ten, Suit::Clubs),    // дилер 19
            idx(Rank::Four, Suit::Clubs),   // hit → 7
            idx(Rank::Four, Suit::Diamonds), // дабл → 11
            idx(Rank::King, Suit::Diamonds), // hit → 21
        ],
        100,
        0,
    );

    act(&mut table, &mut journal, 0, PlayerMove::Hit);
    act(&mut table, &mut journal, 0, PlayerMove::Double);
    assert_eq!(
        table.phase,
        RoundPhase::PlayerTurn,
        "non-lone-ace double leaves the hand playable"
    );
    act(&mut table, &mut journal, 0, PlayerMove::Hit);

    assert_eq!(table.phase, RoundPhase::Settlement);
    let settlement = table.settlement.as_ref().unwrap();
    let hand = &settlement.seats[0].hands[0];
    assert_eq!(hand.double_count, 1);
    assert_eq!(hand.total_wager, Chips(200));
    assert_eq!(hand.outcome, HandOutcome::Win); // 21 против 19
    assert_eq!(table.seat(0).unwrap().balance, Chips(10_200));
}
