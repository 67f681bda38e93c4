//! Тесты расчёта: приоритетная цепочка исходов, сайд-ставка,
//! страховка, целочисленные выплаты.
//!
//! `payout` — возврат на баланс; чистый результат = payout − total_wager.

use blackjack_engine::domain::card::{Card, Rank, Suit};
use blackjack_engine::domain::chips::Chips;
use blackjack_engine::domain::hand::HandOutcome;
use blackjack_engine::engine::settlement::{
    dealer_blackjack, insurance_payout, settle_hand, side_bet_payout,
};

fn c(rank: Rank, suit: Suit) -> Card {
    Card::new(rank, suit)
}

fn hand(ranks: &[Rank]) -> Vec<Card> {
    ranks.iter().map(|r| c(*r, Suit::Clubs)).collect()
}

/// Рука из разных мастей (чтобы не зацепить suited-ветку).
fn offsuit(ranks: &[Rank]) -> Vec<Card> {
    let suits = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];
    ranks
        .iter()
        .enumerate()
        .map(|(i, r)| c(*r, suits[i % 4]))
        .collect()
}

//
// 1. Блэкджек дилера бьёт всё
//
#[test]
fn dealer_blackjack_takes_priority() {
    let dealer = offsuit(&[Rank::Ace, Rank::King]);
    assert!(dealer_blackjack(&dealer));

    let player = offsuit(&[Rank::Ten, Rank::Nine]);
    let s = settle_hand(&player, &dealer, Chips(100), 0, Chips::ZERO, true);
    assert_eq!(s.outcome, HandOutcome::Lose);
    assert_eq!(s.payout, Chips::ZERO);
}

//
// 2. Перебор игрока проигрывает даже при переборе дилера
//
#[test]
fn player_bust_loses() {
    let dealer = offsuit(&[Rank::King, Rank::Six, Rank::Nine]); // 25
    let player = offsuit(&[Rank::King, Rank::Nine, Rank::Five]); // 24
    let s = settle_hand(&player, &dealer, Chips(100), 0, Chips::ZERO, false);
    assert_eq!(s.outcome, HandOutcome::Lose);
    assert_eq!(s.payout, Chips::ZERO);
}

//
// 3. Блэкджек игрока: 3:2 с floor, приоритет над Push 22
//
#[test]
fn blackjack_pays_three_to_two_floored() {
    let dealer = offsuit(&[Rank::Ten, Rank::Seven]);
    let player = offsuit(&[Rank::Ace, Rank::King]);

    let s = settle_hand(&player, &dealer, Chips(100), 0, Chips::ZERO, false);
    assert_eq!(s.outcome, HandOutcome::Blackjack);
    // net = floor(100 * 1.5) = 150, возврат = 100 + 150.
    assert_eq!(s.payout, Chips(250));

    // Нечётная ставка: floor(101 * 1.5) = 151.
    let s = settle_hand(&player, &dealer, Chips(101), 0, Chips::ZERO, false);
    assert_eq!(s.payout, Chips(101 + 151));
}

#[test]
fn blackjack_beats_dealer_push_22() {
    let dealer = offsuit(&[Rank::King, Rank::Six, Rank::Six]); // ровно 22
    let player = offsuit(&[Rank::Ace, Rank::Queen]);

    let s = settle_hand(&player, &dealer, Chips(100), 0, Chips::ZERO, false);
    assert_eq!(s.outcome, HandOutcome::Blackjack, "blackjack wins over push-22");
    assert_eq!(s.payout, Chips(250));
}

#[test]
fn suited_blackjack_pays_two_to_one() {
    let dealer = offsuit(&[Rank::Ten, Rank::Seven]);
    let player = vec![c(Rank::Ace, Suit::Hearts), c(Rank::Queen, Suit::Hearts)];

    let s = settle_hand(&player, &dealer, Chips(100), 0, Chips::ZERO, false);
    assert_eq!(s.outcome, HandOutcome::SuitedBlackjack);
    // net = 200, возврат = 300.
    assert_eq!(s.payout, Chips(300));
}

//
// 4. Push 22: живые ставки возвращаются
//
#[test]
fn dealer_22_pushes_live_hands() {
    let dealer = offsuit(&[Rank::King, Rank::Six, Rank::Six]); // 22
    let player = offsuit(&[Rank::Ten, Rank::Nine]); // hard 19

    let s = settle_hand(&player, &dealer, Chips(100), 0, Chips::ZERO, false);
    assert_eq!(s.outcome, HandOutcome::Push22);
    assert_eq!(s.payout, Chips(100), "push-22 is net zero");
}

//
// 5. Перебор дилера ≥23 — выигрыш 1:1
//
#[test]
fn dealer_bust_23_pays_even_money() {
    let dealer = offsuit(&[Rank::King, Rank::Six, Rank::Seven]); // 23
    let player = offsuit(&[Rank::Ten, Rank::Two]);

    let s = settle_hand(&player, &dealer, Chips(100), 0, Chips::ZERO, false);
    assert_eq!(s.outcome, HandOutcome::Win);
    assert_eq!(s.payout, Chips(200));
}

//
// 6. Сравнение тоталов и пуш
//
#[test]
fn high_card_comparison() {
    let dealer = offsuit(&[Rank::Ten, Rank::Eight]);

    let s = settle_hand(
        &offsuit(&[Rank::Ten, Rank::Nine]),
        &dealer,
        Chips(100),
        0,
        Chips::ZERO,
        false,
    );
    assert_eq!(s.outcome, HandOutcome::Win);
    assert_eq!(s.payout, Chips(200));

    let s = settle_hand(
        &offsuit(&[Rank::Ten, Rank::Seven]),
        &dealer,
        Chips(100),
        0,
        Chips::ZERO,
        false,
    );
    assert_eq!(s.outcome, HandOutcome::Lose);
    assert_eq!(s.payout, Chips::ZERO);

    let s = settle_hand(
        &offsuit(&[Rank::Nine, Rank::Nine]),
        &dealer,
        Chips(100),
        0,
        Chips::ZERO,
        false,
    );
    assert_eq!(s.outcome, HandOutcome::Push);
    assert_eq!(s.payout, Chips(100));
}

//
// 7. Дабл умножает и выигрыш, и проигрыш
//
#[test]
fn doubles_scale_payout() {
    let dealer = offsuit(&[Rank::Ten, Rank::Eight]);
    let player = offsuit(&[Rank::Ten, Rank::Nine]);

    // double_count=2 → total_wager = 400.
    let s = settle_hand(&player, &dealer, Chips(100), 2, Chips::ZERO, false);
    assert_eq!(s.total_wager, Chips(400));
    assert_eq!(s.payout, Chips(800));
}

//
// 8. Сайд-ставка: 11:1 ровно на 22
//
#[test]
fn side_bet_pays_only_on_exactly_22() {
    let bust_22 = offsuit(&[Rank::King, Rank::Six, Rank::Six]);
    let bust_23 = offsuit(&[Rank::King, Rank::Six, Rank::Seven]);
    let stand_20 = offsuit(&[Rank::King, Rank::Queen]);

    assert_eq!(side_bet_payout(Chips(50), &bust_22), Chips(600));
    assert_eq!(side_bet_payout(Chips(50), &bust_23), Chips::ZERO);
    assert_eq!(side_bet_payout(Chips(50), &stand_20), Chips::ZERO);
    assert_eq!(side_bet_payout(Chips::ZERO, &bust_22), Chips::ZERO);
}

#[test]
fn side_bet_rides_even_when_hand_busts() {
    let dealer = offsuit(&[Rank::King, Rank::Six, Rank::Six]); // 22
    let player = offsuit(&[Rank::King, Rank::Nine, Rank::Five]); // bust

    let s = settle_hand(&player, &dealer, Chips(100), 0, Chips(50), false);
    assert_eq!(s.outcome, HandOutcome::Lose);
    assert_eq!(s.payout, Chips::ZERO);
    assert_eq!(s.side_bet_payout, Chips(600));
}

//
// 9. Страховка: 2:1 только при блэкджеке дилера
//
#[test]
fn insurance_pays_two_to_one_on_dealer_blackjack() {
    assert_eq!(insurance_payout(Chips(50), true, true), Chips(150));
    assert_eq!(insurance_payout(Chips(50), true, false), Chips::ZERO);
    assert_eq!(insurance_payout(Chips(50), false, true), Chips::ZERO);
}

//
// 10. Консервация: ровно один исход, net соответствует таблице
//
#[test]
fn settlement_conservation() {
    let wager = Chips(100);
    let cases: Vec<(Vec<Card>, Vec<Card>, bool, HandOutcome, i64)> = vec![
        // (player, dealer, dealer_bj, outcome, net)
        (
            offsuit(&[Rank::Ten, Rank::Nine]),
            offsuit(&[Rank::Ace, Rank::King]),
            true,
            HandOutcome::Lose,
            -100,
        ),
        (
            offsuit(&[Rank::Ten, Rank::Nine]),
            offsuit(&[Rank::Ten, Rank::Eight]),
            false,
            HandOutcome::Win,
            100,
        ),
        (
            offsuit(&[Rank::Ace, Rank::King]),
            offsuit(&[Rank::Ten, Rank::Eight]),
            false,
            HandOutcome::Blackjack,
            150,
        ),
        (
            vec![c(Rank::Ace, Suit::Spades), c(Rank::King, Suit::Spades)],
            offsuit(&[Rank::Ten, Rank::Eight]),
            false,
            HandOutcome::SuitedBlackjack,
            200,
        ),
        (
            offsuit(&[Rank::Ten, Rank::Nine]),
            offsuit(&[Rank::King, Rank::Six, Rank::Six]),
            false,
            HandOutcome::Push22,
            0,
        ),
        (
            offsuit(&[Rank::Ten, Rank::Eight]),
            offsuit(&[Rank::Ten, Rank::Eight]),
            false,
            HandOutcome::Push,
            0,
        ),
    ];

    for (player, dealer, dealer_bj, outcome, net) in cases {
        let s = settle_hand(&player, &dealer, wager, 0, Chips::ZERO, dealer_bj);
        assert_eq!(s.outcome, outcome, "outcome for {player:?} vs {dealer:?}");
        let actual_net = s.payout.0 as i64 - s.total_wager.0 as i64;
        assert_eq!(actual_net, net, "net for {outcome:?}");
    }
}
