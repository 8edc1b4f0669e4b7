//! Credit card products, a simple factory and factory-method creators.
//!
//! # Invariants
//! - Clients see cards only through `dyn CreditCard`.
//! - Unknown card kinds yield `None` from the simple factory and a
//!   `CardKindError` from parsing, never a panic.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub trait CreditCard {
    fn card_type(&self) -> &'static str;
    fn credit_limit(&self) -> u32;
    fn annual_charge(&self) -> u32;

    /// Three-line summary used by the demos.
    fn describe(&self) -> String {
        format!(
            "Card Type : {}\nCredit Limit : {}\nAnnual Charge :{}",
            self.card_type(),
            self.credit_limit(),
            self.annual_charge()
        )
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MoneyBack;

#[derive(Debug, Clone, Copy, Default)]
pub struct Titanium;

#[derive(Debug, Clone, Copy, Default)]
pub struct Platinum;

impl CreditCard for MoneyBack {
    fn card_type(&self) -> &'static str {
        "MoneyBack"
    }

    fn credit_limit(&self) -> u32 {
        15_000
    }

    fn annual_charge(&self) -> u32 {
        500
    }
}

impl CreditCard for Titanium {
    fn card_type(&self) -> &'static str {
        "Titanium Edge"
    }

    fn credit_limit(&self) -> u32 {
        25_000
    }

    fn annual_charge(&self) -> u32 {
        1_500
    }
}

impl CreditCard for Platinum {
    fn card_type(&self) -> &'static str {
        "Platinum Plus"
    }

    fn credit_limit(&self) -> u32 {
        35_000
    }

    fn annual_charge(&self) -> u32 {
        2_000
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    MoneyBack,
    Titanium,
    Platinum,
}

impl CardKind {
    pub const ALL: [CardKind; 3] = [Self::MoneyBack, Self::Titanium, Self::Platinum];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::MoneyBack => "MoneyBack",
            Self::Titanium => "Titanium",
            Self::Platinum => "Platinum",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardKindError(pub String);

impl Display for CardKindError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid card type `{}`; expected MoneyBack|Titanium|Platinum",
            self.0
        )
    }
}

impl Error for CardKindError {}

impl FromStr for CardKind {
    type Err = CardKindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CardKindError(trimmed.to_string()))
    }
}

/// Simple factory keyed by the exact card type name.
pub fn credit_card_factory(card_type: &str) -> Option<Box<dyn CreditCard>> {
    match card_type {
        "MoneyBack" => Some(Box::new(MoneyBack)),
        "Titanium" => Some(Box::new(Titanium)),
        "Platinum" => Some(Box::new(Platinum)),
        _ => None,
    }
}

/// Typed variant of the simple factory.
pub fn card_for(kind: CardKind) -> Box<dyn CreditCard> {
    match kind {
        CardKind::MoneyBack => Box::new(MoneyBack),
        CardKind::Titanium => Box::new(Titanium),
        CardKind::Platinum => Box::new(Platinum),
    }
}

/// Factory method: implementors choose the product, callers use
/// `create_product`.
pub trait CreditCardFactory {
    fn make_product(&self) -> Box<dyn CreditCard>;

    fn create_product(&self) -> Box<dyn CreditCard> {
        self.make_product()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MoneyBackFactory;

#[derive(Debug, Clone, Copy, Default)]
pub struct TitaniumFactory;

#[derive(Debug, Clone, Copy, Default)]
pub struct PlatinumFactory;

impl CreditCardFactory for MoneyBackFactory {
    fn make_product(&self) -> Box<dyn CreditCard> {
        Box::new(MoneyBack)
    }
}

impl CreditCardFactory for TitaniumFactory {
    fn make_product(&self) -> Box<dyn CreditCard> {
        Box::new(Titanium)
    }
}

impl CreditCardFactory for PlatinumFactory {
    fn make_product(&self) -> Box<dyn CreditCard> {
        Box::new(Platinum)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        card_for, credit_card_factory, CardKind, CreditCardFactory, MoneyBackFactory,
        PlatinumFactory, TitaniumFactory,
    };

    #[test]
    fn simple_factory_returns_original_card_values() {
        let money_back = credit_card_factory("MoneyBack").unwrap();
        assert_eq!(
            (money_back.card_type(), money_back.credit_limit(), money_back.annual_charge()),
            ("MoneyBack", 15_000, 500)
        );
        let titanium = credit_card_factory("Titanium").unwrap();
        assert_eq!(titanium.card_type(), "Titanium Edge");
        assert_eq!(titanium.credit_limit(), 25_000);
        assert!(credit_card_factory("Gold").is_none());
    }

    #[test]
    fn factory_methods_build_matching_products() {
        assert_eq!(PlatinumFactory.create_product().annual_charge(), 2_000);
        assert_eq!(TitaniumFactory.create_product().annual_charge(), 1_500);
        assert_eq!(
            MoneyBackFactory.create_product().describe(),
            "Card Type : MoneyBack\nCredit Limit : 15000\nAnnual Charge :500"
        );
    }

    #[test]
    fn card_kind_parses_case_insensitively() {
        assert_eq!(" platinum ".parse::<CardKind>().unwrap(), CardKind::Platinum);
        assert_eq!(card_for(CardKind::Platinum).card_type(), "Platinum Plus");
        let err = "Gold".parse::<CardKind>().unwrap_err();
        assert!(err.to_string().contains("Gold"));
    }
}
