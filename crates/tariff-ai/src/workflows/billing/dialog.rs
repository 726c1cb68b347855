//! Per-message dispatch over the classified intent, first match wins:
//! procedure lookup, category prompt, water computation (with or without an
//! inline surcharge), sewage follow-up against the stored pending charge,
//! and finally deferral to the external assistant. Every domain error is
//! converted to reply text here; only an empty message surfaces to the
//! transport as an error.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::calculator;
use super::domain::{ChargeBreakdown, ConsumerCategory, SewagePercent, WaterCharge};
use super::intent::{classify, FaqTopic, MessageIntent};
use super::procedures::{self, ProcedureQuote};
use super::session::{SessionKey, SessionStore};
use super::tariffs::{self, TariffError};
use crate::config::TariffConfig;
use crate::workflows::assistant::{AssistantClient, AssistantError};

// Published installment terms for overdue bills.
const WATER_MAX_INSTALLMENTS: u32 = 5;
const SEWAGE_MAX_INSTALLMENTS: u32 = 48;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum DialogError {
    #[error("message text is empty")]
    EmptyInput,
}

pub struct DialogRouter<S: ?Sized, A: ?Sized> {
    store: Arc<S>,
    assistant: Arc<A>,
    policy: TariffConfig,
}

impl<S, A> DialogRouter<S, A>
where
    S: SessionStore + ?Sized,
    A: AssistantClient + ?Sized,
{
    pub fn new(store: Arc<S>, assistant: Arc<A>, policy: TariffConfig) -> Self {
        Self {
            store,
            assistant,
            policy,
        }
    }

    /// Resolve one inbound message into reply text, updating the session's
    /// pending state as a side effect.
    pub async fn resolve(&self, session: &SessionKey, text: &str) -> Result<String, DialogError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(DialogError::EmptyInput);
        }

        let intent = classify(trimmed);
        debug!(session = %session, intent = ?intent, "dispatching chat message");

        let reply = match intent {
            MessageIntent::Procedure { procedure, ground } => {
                procedure_reply(&procedures::lookup(procedure, ground))
            }
            MessageIntent::Faq { topic } => self.faq_reply(topic),
            MessageIntent::VolumeOnly { volume } => ask_category(volume),
            MessageIntent::VolumeAndCategory {
                volume,
                category,
                year,
                sewage,
            } => self.resolve_computation(session, volume, category, year, sewage),
            MessageIntent::SewageFollowUp { percent } => match self.store.take(session) {
                Some(pending) => {
                    let breakdown = calculator::compute_total(pending.amount, percent);
                    breakdown_reply(&pending, &breakdown)
                }
                None => resupply_reply(),
            },
            MessageIntent::Fallback => self.defer_to_assistant(trimmed).await,
        };

        Ok(reply)
    }

    fn resolve_computation(
        &self,
        session: &SessionKey,
        volume: u32,
        category: ConsumerCategory,
        year: Option<u16>,
        sewage: Option<SewagePercent>,
    ) -> String {
        let year = match year {
            Some(year) => year,
            None if self.policy.require_year => return ask_year(),
            None => self.policy.default_year,
        };

        let amount = match calculator::compute_water(volume, category, year) {
            Ok(amount) => amount,
            Err(err) => return tariff_error_reply(&err),
        };

        let charge = WaterCharge {
            volume,
            category,
            tariff_year: year,
            amount,
        };
        info!(session = %session, volume, %category, year, %amount, "computed water charge");

        match sewage {
            Some(percent) => {
                // Complete in one turn; drop any stale pending state.
                self.store.clear(session);
                let breakdown = calculator::compute_total(charge.amount, percent);
                breakdown_reply(&charge, &breakdown)
            }
            None => {
                let reply = pending_reply(&charge);
                self.store.put(session.clone(), charge);
                reply
            }
        }
    }

    fn faq_reply(&self, topic: FaqTopic) -> String {
        match topic {
            FaqTopic::MinimumCharge => {
                // The minimum charge is the first band billed in full, so it
                // falls out of the residential schedule at 10 m³.
                let year = self.policy.default_year;
                match calculator::compute_water(10, ConsumerCategory::Residential, year) {
                    Ok(minimum) => format!(
                        "The minimum water charge ({year} residential schedule) is R$ {minimum}; \
                         it covers consumption up to 10 m³."
                    ),
                    Err(err) => tariff_error_reply(&err),
                }
            }
            FaqTopic::Installments => format!(
                "Water bills can be split into up to {WATER_MAX_INSTALLMENTS} installments. \
                 Sewage bills can be split into up to {SEWAGE_MAX_INSTALLMENTS} installments."
            ),
        }
    }

    async fn defer_to_assistant(&self, text: &str) -> String {
        match self.assistant.submit(text).await {
            Ok(reply) => reply,
            Err(AssistantError::Disabled) => out_of_scope_reply(),
            Err(err) => {
                warn!(error = %err, "assistant collaborator failed");
                apology_reply()
            }
        }
    }
}

fn procedure_reply(quote: &ProcedureQuote) -> String {
    match quote.fees.as_slice() {
        [only] if only.variant.is_none() => {
            format!("{} costs R$ {}.", quote.description, only.amount)
        }
        fees => {
            let lines: Vec<String> = fees
                .iter()
                .map(|fee| match fee.variant {
                    Some(variant) => format!("{variant} R$ {}", fee.amount),
                    None => format!("R$ {}", fee.amount),
                })
                .collect();
            format!("{} fees: {}.", quote.description, lines.join(", "))
        }
    }
}

fn ask_category(volume: u32) -> String {
    let labels: Vec<&str> = ConsumerCategory::ALL
        .iter()
        .map(|category| category.label())
        .collect();
    format!(
        "To compute the charge for {volume} m³ I need the consumer category. \
         Which one applies: {}?",
        labels.join(", ")
    )
}

fn ask_year() -> String {
    let years: Vec<String> = tariffs::supported_years()
        .iter()
        .map(|year| year.to_string())
        .collect();
    format!(
        "Which tariff year should I use? Published schedules: {}.",
        years.join(", ")
    )
}

fn pending_reply(charge: &WaterCharge) -> String {
    format!(
        "Water charge for {} m³ ({}, {}): R$ {}. \
         Should I include the sewage surcharge at 80, 90 or 100%?",
        charge.volume, charge.category, charge.tariff_year, charge.amount
    )
}

fn breakdown_reply(charge: &WaterCharge, breakdown: &ChargeBreakdown) -> String {
    format!(
        "Water charge for {} m³ ({}, {}): R$ {}. Sewage at {}: R$ {}. Total: R$ {}.",
        charge.volume,
        charge.category,
        charge.tariff_year,
        breakdown.water,
        breakdown.percent.label(),
        breakdown.sewage,
        breakdown.total
    )
}

fn resupply_reply() -> String {
    "I don't have a pending water charge for this conversation. \
     Please send the consumption and category again, for example \"15 m3 residential 2025\"."
        .to_string()
}

fn tariff_error_reply(err: &TariffError) -> String {
    match err {
        TariffError::UnknownTariffYear(year) => {
            let years: Vec<String> = tariffs::supported_years()
                .iter()
                .map(|year| year.to_string())
                .collect();
            format!(
                "I don't have a tariff schedule for {year}. Published years: {}.",
                years.join(", ")
            )
        }
        TariffError::UnknownCategory(raw) => {
            format!("I don't recognize the consumer category \"{raw}\".")
        }
    }
}

fn out_of_scope_reply() -> String {
    "I can answer questions about water tariffs and service fees. \
     I couldn't find that in my billing rules."
        .to_string()
}

fn apology_reply() -> String {
    "Sorry, I couldn't reach the assistant right now. Please try again in a moment.".to_string()
}
