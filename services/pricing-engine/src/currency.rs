//! Currency Selector
//!
//! Picks which of an offer's per-currency price lists to use.

use std::collections::BTreeMap;

use bomprice_models::PriceBreak;

/// The price list chosen for an offer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrencySelection<'a> {
    pub currency: &'a str,
    pub prices: &'a [PriceBreak],
}

/// Chooses, among the non-empty price lists, the requested currency, then
/// the default currency, then the lexicographically first code available.
pub fn select_currency<'a>(
    prices: &'a BTreeMap<String, Option<Vec<PriceBreak>>>,
    requested: &str,
    default: &str,
) -> Option<CurrencySelection<'a>> {
    let mut available = prices.iter().filter_map(|(currency, list)| match list {
        Some(list) if !list.is_empty() => Some(CurrencySelection {
            currency: currency.as_str(),
            prices: list.as_slice(),
        }),
        _ => None,
    });

    let first = available.next()?;
    let mut fallback = None;
    for candidate in std::iter::once(first).chain(available) {
        if candidate.currency == requested {
            return Some(candidate);
        }
        if candidate.currency == default {
            fallback = Some(candidate);
        }
    }

    Some(fallback.unwrap_or(first))
}

/// Preference order used when price lists in different currencies compete:
/// requested, then default, then by code. Smaller is better.
pub fn currency_rank<'a>(currency: &'a str, requested: &str, default: &str) -> (u8, &'a str) {
    let class = if currency == requested {
        0
    } else if currency == default {
        1
    } else {
        2
    };
    (class, currency)
}
