// In crates/execution/src/ledger.rs

use crate::types::{Fill, LedgerSummary, Position, PositionSummary};
use crate::{Error, Result};
use core_types::{Side, Symbol};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// A paper-trading account that fills orders at the last observed price.
///
/// Prices are pushed in from outside via `update_price`, which makes the
/// ledger usable with a live ticker stream, a replayed history or a unit test.
/// Fills carry no fee.
///
/// The ledger does no locking of its own. Callers that receive prices on one
/// task and place orders on another must serialize `update_price` and
/// `execute_order` themselves.
#[derive(Debug, Clone)]
pub struct Ledger {
    starting_cash: Decimal,
    cash: Decimal,
    positions: HashMap<Symbol, Position>,
}

impl Ledger {
    /// Creates a new ledger holding only `starting_cash`.
    pub fn new(starting_cash: Decimal) -> Self {
        Self {
            starting_cash,
            cash: starting_cash,
            positions: HashMap::new(),
        }
    }

    /// Records the latest price for `symbol`, creating an empty position on
    /// first sight. A price of zero is accepted and blocks orders for the
    /// symbol until a positive price arrives.
    pub fn update_price(&mut self, symbol: &Symbol, price: Decimal) -> Result<()> {
        if price < Decimal::ZERO {
            return Err(Error::InvalidPrice(price));
        }
        let position = self.positions.entry(symbol.clone()).or_default();
        position.last_price = price;
        Ok(())
    }

    /// Fills an order for `quantity` units at the last recorded price.
    ///
    /// All checks run before any mutation, so a rejected order leaves cash and
    /// positions exactly as they were.
    pub fn execute_order(&mut self, symbol: &Symbol, side: Side, quantity: Decimal) -> Result<Fill> {
        if quantity <= Decimal::ZERO {
            return Err(Error::InvalidQuantity(quantity));
        }
        let position = match self.positions.get_mut(symbol) {
            Some(position) if !position.last_price.is_zero() => position,
            _ => {
                return Err(Error::NoPriceAvailable {
                    symbol: symbol.clone(),
                });
            }
        };

        let price = position.last_price;
        let notional = match side {
            Side::Buy => {
                // An unrepresentable notional is more than any cash balance.
                let required = quantity.checked_mul(price).unwrap_or(Decimal::MAX);
                if required > self.cash {
                    return Err(Error::InsufficientCash {
                        required,
                        available: self.cash,
                    });
                }
                let notional = required;
                let new_quantity = position
                    .quantity
                    .checked_add(quantity)
                    .ok_or(Error::Overflow)?;
                self.cash -= notional;
                position.quantity = new_quantity;
                notional
            }
            Side::Sell => {
                if quantity > position.quantity {
                    return Err(Error::InsufficientQuantity {
                        requested: quantity,
                        held: position.quantity,
                    });
                }
                let notional = quantity.checked_mul(price).ok_or(Error::Overflow)?;
                self.cash = self.cash.checked_add(notional).ok_or(Error::Overflow)?;
                position.quantity -= quantity;
                notional
            }
        };

        tracing::debug!(%symbol, %side, %quantity, %price, cash = %self.cash, "Paper order filled.");

        Ok(Fill {
            symbol: symbol.clone(),
            side,
            quantity,
            price,
            notional,
        })
    }

    /// Like `execute_order`, with the side given as text ("buy"/"sell",
    /// case-insensitive).
    pub fn place_order(&mut self, symbol: &Symbol, side: &str, quantity: Decimal) -> Result<Fill> {
        let side: Side = side
            .parse()
            .map_err(|_| Error::InvalidSide(side.to_string()))?;
        self.execute_order(symbol, side, quantity)
    }

    /// Cash plus the market value of every tracked position. Saturates at
    /// `Decimal::MAX` instead of overflowing.
    pub fn portfolio_value(&self) -> Decimal {
        self.positions
            .values()
            .map(Position::market_value)
            .fold(self.cash, Decimal::saturating_add)
    }

    /// Restores the starting cash and forgets every position.
    pub fn reset(&mut self) {
        self.cash = self.starting_cash;
        self.positions.clear();
    }

    pub fn summary(&self) -> LedgerSummary {
        let positions = self
            .positions
            .iter()
            .map(|(symbol, pos)| {
                (
                    symbol.0.clone(),
                    PositionSummary {
                        quantity: pos.quantity,
                        last_price: pos.last_price,
                        market_value: pos.market_value(),
                    },
                )
            })
            .collect();

        LedgerSummary {
            cash: self.cash,
            positions,
            portfolio_value: self.portfolio_value(),
        }
    }

    pub fn position(&self, symbol: &Symbol) -> Option<&Position> {
        self.positions.get(symbol)
    }

    pub fn cash(&self) -> Decimal {
        self.cash
    }

    pub fn starting_cash(&self) -> Decimal {
        self.starting_cash
    }
}
