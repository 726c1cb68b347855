//! Fixed-fee administrative service procedures, distinct from
//! consumption-based billing. Amounts are constants in cents (scale 2).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceProcedure {
    Reconnection,
    Displacement,
    FinalReading,
    OwnershipTransfer,
    NewConnection,
}

impl ServiceProcedure {
    pub const fn description(self) -> &'static str {
        match self {
            ServiceProcedure::Reconnection => "Reconnection of a suspended supply",
            ServiceProcedure::Displacement => "Displacement of the supply point",
            ServiceProcedure::FinalReading => "Final meter reading on contract closure",
            ServiceProcedure::OwnershipTransfer => "Ownership transfer of the service contract",
            ServiceProcedure::NewConnection => "New water connection",
        }
    }
}

/// Ground condition selecting the displacement fee variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplacementGround {
    Unpaved,
    Paved,
}

impl DisplacementGround {
    pub const fn label(self) -> &'static str {
        match self {
            DisplacementGround::Unpaved => "unpaved ground",
            DisplacementGround::Paved => "paved ground",
        }
    }
}

/// One fee line within a procedure quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcedureFee {
    pub variant: Option<&'static str>,
    pub amount: Decimal,
}

/// Full answer for a procedure inquiry: description plus every applicable
/// fee. When a displacement inquiry names no ground condition, both variants
/// are returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcedureQuote {
    pub procedure: ServiceProcedure,
    pub description: &'static str,
    pub fees: Vec<ProcedureFee>,
}

const RECONNECTION_CENTS: i64 = 3_694;
const DISPLACEMENT_UNPAVED_CENTS: i64 = 8_943;
const DISPLACEMENT_PAVED_CENTS: i64 = 13_412;
const FINAL_READING_CENTS: i64 = 1_847;
const OWNERSHIP_TRANSFER_CENTS: i64 = 2_315;
const NEW_CONNECTION_CENTS: i64 = 16_437;

fn fee(variant: Option<&'static str>, cents: i64) -> ProcedureFee {
    ProcedureFee {
        variant,
        amount: Decimal::new(cents, 2),
    }
}

pub fn lookup(procedure: ServiceProcedure, ground: Option<DisplacementGround>) -> ProcedureQuote {
    let fees = match (procedure, ground) {
        (ServiceProcedure::Reconnection, _) => vec![fee(None, RECONNECTION_CENTS)],
        (ServiceProcedure::Displacement, Some(ground)) => {
            let cents = match ground {
                DisplacementGround::Unpaved => DISPLACEMENT_UNPAVED_CENTS,
                DisplacementGround::Paved => DISPLACEMENT_PAVED_CENTS,
            };
            vec![fee(Some(ground.label()), cents)]
        }
        (ServiceProcedure::Displacement, None) => vec![
            fee(
                Some(DisplacementGround::Unpaved.label()),
                DISPLACEMENT_UNPAVED_CENTS,
            ),
            fee(
                Some(DisplacementGround::Paved.label()),
                DISPLACEMENT_PAVED_CENTS,
            ),
        ],
        (ServiceProcedure::FinalReading, _) => vec![fee(None, FINAL_READING_CENTS)],
        (ServiceProcedure::OwnershipTransfer, _) => vec![fee(None, OWNERSHIP_TRANSFER_CENTS)],
        (ServiceProcedure::NewConnection, _) => vec![fee(None, NEW_CONNECTION_CENTS)],
    };

    ProcedureQuote {
        procedure,
        description: procedure.description(),
        fees,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displacement_without_ground_lists_both_variants() {
        let quote = lookup(ServiceProcedure::Displacement, None);
        assert_eq!(quote.fees.len(), 2);
        assert_eq!(quote.fees[0].variant, Some("unpaved ground"));
        assert_eq!(quote.fees[1].variant, Some("paved ground"));
    }

    #[test]
    fn displacement_with_ground_selects_one_fee() {
        let quote = lookup(
            ServiceProcedure::Displacement,
            Some(DisplacementGround::Paved),
        );
        assert_eq!(quote.fees.len(), 1);
        assert_eq!(quote.fees[0].amount, Decimal::new(13_412, 2));
    }

    #[test]
    fn flat_procedures_have_a_single_fee() {
        for procedure in [
            ServiceProcedure::Reconnection,
            ServiceProcedure::FinalReading,
            ServiceProcedure::OwnershipTransfer,
            ServiceProcedure::NewConnection,
        ] {
            let quote = lookup(procedure, None);
            assert_eq!(quote.fees.len(), 1);
            assert!(quote.fees[0].amount > Decimal::ZERO);
        }
    }
}
