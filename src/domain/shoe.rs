use serde::{Deserialize, Serialize};

use crate::domain::card::{Card, SHOE_SIZE};

/// Позиция «отсечки»: пройдено ~75% шуза (234 из 312).
pub const CUT_POSITION: u16 = SHOE_SIZE / 4 * 3;

/// Шуз — весь шестиколодный набор карт в порядке раздачи.
/// В домене это просто упорядоченный список индексов с курсором.
/// Сам порядок выводит infra (HMAC Fisher–Yates), НЕ здесь.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Shoe {
    /// Перестановка индексов карт 0..312.
    pub order: Vec<u16>,
    /// Курсор: сколько карт уже роздано.
    pub position: u16,
    /// Выставляется один раз, когда курсор пересёк `CUT_POSITION`.
    pub cut_flag: bool,
}

impl Shoe {
    /// Шуз из готовой перестановки (порядок выдаёт `infra::shuffle`).
    pub fn from_order(order: Vec<u16>) -> Self {
        Self {
            order,
            position: 0,
            cut_flag: false,
        }
    }

    pub fn remaining(&self) -> u16 {
        (self.order.len() as u16).saturating_sub(self.position)
    }

    /// Взять следующую карту. Индекс потраченной карты
    /// нужен для provably-fair реестра, поэтому возвращаем оба.
    pub fn draw(&mut self) -> Option<(u16, Card)> {
        let index = *self.order.get(self.position as usize)?;
        let card = Card::from_shoe_index(index)?;
        self.position += 1;
        if self.position >= CUT_POSITION {
            self.cut_flag = true;
        }
        Some((index, card))
    }
}
