//! Progressive tariff math. Every monetary intermediate is rounded to two
//! decimals with round-half-away-from-zero before it is combined further, so
//! the results match the utility's printed invoices digit for digit.

use rust_decimal::{Decimal, RoundingStrategy};

use super::domain::{ChargeBreakdown, ConsumerCategory, SewagePercent};
use super::tariffs::{self, TariffError, BAND_BOUNDARIES};

/// Above this volume, social and vulnerable customers pay residential
/// marginal rates for the overage.
const SUBSIDY_LIMIT: u32 = 20;

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Progressive water charge for a consumption volume. The first band is
/// billed in full regardless of volume (the utility's minimum charge).
pub fn compute_water(
    volume: u32,
    category: ConsumerCategory,
    year: u16,
) -> Result<Decimal, TariffError> {
    if matches!(
        category,
        ConsumerCategory::Social | ConsumerCategory::Vulnerable
    ) && volume > SUBSIDY_LIMIT
    {
        // Subsidized rate up to the limit, residential marginal rates beyond.
        let subsidized = compute_water(SUBSIDY_LIMIT, category, year)?;
        let residential_full = compute_water(volume, ConsumerCategory::Residential, year)?;
        let residential_base = compute_water(SUBSIDY_LIMIT, ConsumerCategory::Residential, year)?;
        let overage = round2(residential_full - residential_base);
        return Ok(round2(subsidized + overage));
    }

    let tariff = tariffs::rates_for(year, category)?;
    let [first_boundary, second_boundary, third_boundary] = BAND_BOUNDARIES;

    let mut total = round2(tariff.band(0) * Decimal::from(first_boundary));

    if category.is_residential_like() {
        let band2_units = volume
            .saturating_sub(first_boundary)
            .min(second_boundary - first_boundary);
        let band3_units = volume
            .saturating_sub(second_boundary)
            .min(third_boundary - second_boundary);
        let band4_units = volume.saturating_sub(third_boundary);

        for (units, rate) in [
            (band2_units, tariff.band(1)),
            (band3_units, tariff.band(2)),
            (band4_units, tariff.band(3)),
        ] {
            if units > 0 {
                total += round2(rate * Decimal::from(units));
            }
        }
    } else {
        let overage_units = volume.saturating_sub(first_boundary);
        if overage_units > 0 {
            total += round2(tariff.band(1) * Decimal::from(overage_units));
        }
    }

    Ok(round2(total))
}

/// Attach the sewage surcharge to an already-computed water charge.
pub fn compute_total(water: Decimal, percent: SewagePercent) -> ChargeBreakdown {
    let sewage = round2(water * percent.factor());
    ChargeBreakdown {
        water,
        percent,
        sewage,
        total: round2(water + sewage),
    }
}
