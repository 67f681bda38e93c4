use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Количество карт в одной колоде.
pub const CARDS_PER_DECK: u16 = 52;

/// Количество колод в шузе.
pub const DECKS_IN_SHOE: u16 = 6;

/// Полный размер шуза (312 карт).
pub const SHOE_SIZE: u16 = CARDS_PER_DECK * DECKS_IN_SHOE;

/// Масть карты.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Suit {
    Clubs,    // ♣
    Diamonds, // ♦
    Hearts,   // ♥
    Spades,   // ♠
}

/// Ранг карты.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum Rank {
    Two = 2,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    /// Базовая стоимость ранга в блэкджеке.
    /// Туз считается как 11; понижение до 1 делает подсчёт руки.
    pub fn blackjack_value(self) -> u8 {
        match self {
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => 10,
            Rank::Ace => 11,
        }
    }

    /// Десятка/картинка — для peek-проверки дилера.
    pub fn is_ten_value(self) -> bool {
        matches!(self, Rank::Ten | Rank::Jack | Rank::Queen | Rank::King)
    }
}

/// Карта в раздаче. `face_up` — видна ли она всем за столом
/// (закрытая карта дилера раздаётся с `face_up = false`).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
    pub face_up: bool,
}

const RANK_ORDER: [Rank; 13] = [
    Rank::Ace,
    Rank::Two,
    Rank::Three,
    Rank::Four,
    Rank::Five,
    Rank::Six,
    Rank::Seven,
    Rank::Eight,
    Rank::Nine,
    Rank::Ten,
    Rank::Jack,
    Rank::Queen,
    Rank::King,
];

const SUIT_ORDER: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self {
            rank,
            suit,
            face_up: true,
        }
    }

    /// Карта по индексу в шузе (0..312).
    ///
    /// Внутри каждой колоды: suit = (i % 52) / 13, rank = (i % 52) % 13,
    /// ранги от туза до короля. Эта же схема используется при верификации
    /// на клиенте, менять её нельзя.
    pub fn from_shoe_index(index: u16) -> Option<Self> {
        if index >= SHOE_SIZE {
            return None;
        }
        let in_deck = (index % CARDS_PER_DECK) as usize;
        let suit = SUIT_ORDER[in_deck / 13];
        let rank = RANK_ORDER[in_deck % 13];
        Some(Card::new(rank, suit))
    }

    /// Индекс карты в первой колоде шуза (удобно в тестах,
    /// когда шуз собирается вручную).
    pub fn shoe_index(rank: Rank, suit: Suit) -> u16 {
        let s = SUIT_ORDER.iter().position(|x| *x == suit).unwrap_or(0) as u16;
        let r = RANK_ORDER.iter().position(|x| *x == rank).unwrap_or(0) as u16;
        s * 13 + r
    }

    pub fn face_down(mut self) -> Self {
        self.face_up = false;
        self
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ch = match self {
            Suit::Clubs => 'c',
            Suit::Diamonds => 'd',
            Suit::Hearts => 'h',
            Suit::Spades => 's',
        };
        write!(f, "{ch}")
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ch = match self {
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
            r => char::from_digit(*r as u32, 10).unwrap(),
        };
        write!(f, "{ch}")
    }
}

impl fmt::Display for Card {
    /// Формат вида `Ah`, `Td`, `7c`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

/// Парсинг строки вида "Ah", "Td", "7c".
impl FromStr for Card {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 2 {
            return Err("Card string must have length 2".into());
        }
        let mut chars = s.chars();
        let r_ch = chars.next().unwrap();
        let s_ch = chars.next().unwrap();

        let rank = match r_ch {
            '2' => Rank::Two,
            '3' => Rank::Three,
            '4' => Rank::Four,
            '5' => Rank::Five,
            '6' => Rank::Six,
            '7' => Rank::Seven,
            '8' => Rank::Eight,
            '9' => Rank::Nine,
            'T' | 't' => Rank::Ten,
            'J' | 'j' => Rank::Jack,
            'Q' | 'q' => Rank::Queen,
            'K' | 'k' => Rank::King,
            'A' | 'a' => Rank::Ace,
            _ => return Err(format!("Invalid rank: {r_ch}")),
        };

        let suit = match s_ch {
            'c' | 'C' => Suit::Clubs,
            'd' | 'D' => Suit::Diamonds,
            'h' | 'H' => Suit::Hearts,
            's' | 'S' => Suit::Spades,
            _ => return Err(format!("Invalid suit: {s_ch}")),
        };

        Ok(Card::new(rank, suit))
    }
}
