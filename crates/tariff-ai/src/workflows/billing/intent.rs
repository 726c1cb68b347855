//! Keyword-driven intent classification. Each signal is extracted
//! independently from the lower-cased message; classification never fails,
//! it only falls through to [`MessageIntent::Fallback`]. Trigger tables
//! accept the Portuguese spellings customers actually type alongside the
//! English ones.

use super::domain::{ConsumerCategory, SewagePercent};
use super::procedures::{DisplacementGround, ServiceProcedure};
use super::tariffs;

/// Frequently asked billing questions answered from local constants rather
/// than the external assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaqTopic {
    MinimumCharge,
    Installments,
}

/// Classified message, one variant per dialogue dispatch path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageIntent {
    Procedure {
        procedure: ServiceProcedure,
        ground: Option<DisplacementGround>,
    },
    Faq {
        topic: FaqTopic,
    },
    VolumeOnly {
        volume: u32,
    },
    VolumeAndCategory {
        volume: u32,
        category: ConsumerCategory,
        year: Option<u16>,
        sewage: Option<SewagePercent>,
    },
    SewageFollowUp {
        percent: SewagePercent,
    },
    Fallback,
}

const VOLUME_UNITS: [&str; 7] = ["m3", "m³", "cubic", "cubics", "cubicos", "metros", "meters"];

// Category keywords in fixed priority order; the first category with a
// matching token wins when a message names several.
const CATEGORY_KEYWORDS: [(ConsumerCategory, &[&str]); 6] = [
    (
        ConsumerCategory::Residential,
        &["residential", "residencial"],
    ),
    (
        ConsumerCategory::Commercial,
        &["commercial", "comercial", "comercio", "comércio"],
    ),
    (
        ConsumerCategory::Public,
        &["public", "publica", "publico", "pública", "público"],
    ),
    (ConsumerCategory::Industrial, &["industrial"]),
    (ConsumerCategory::Social, &["social"]),
    (
        ConsumerCategory::Vulnerable,
        &["vulnerable", "vulneravel", "vulnerável"],
    ),
];

const AFFIRMATIVE_TOKENS: [&str; 2] = ["yes", "sim"];

pub fn classify(text: &str) -> MessageIntent {
    let normalized = text.trim().to_lowercase();

    if let Some((procedure, ground)) = match_procedure(&normalized) {
        return MessageIntent::Procedure { procedure, ground };
    }

    if let Some(topic) = match_faq(&normalized) {
        return MessageIntent::Faq { topic };
    }

    let tokens: Vec<String> = normalized
        .split_whitespace()
        .map(clean_token)
        .filter(|token| !token.is_empty())
        .collect();

    let volume = extract_volume(&tokens);
    let category = extract_category(&tokens);
    let year = extract_year(&tokens);
    let sewage = extract_sewage(&tokens, volume.as_ref());

    match (volume, category) {
        (Some(found), Some(category)) => MessageIntent::VolumeAndCategory {
            volume: found.volume,
            category,
            year,
            sewage,
        },
        (Some(found), None) => MessageIntent::VolumeOnly {
            volume: found.volume,
        },
        (None, _) => {
            if let Some(percent) = sewage {
                MessageIntent::SewageFollowUp { percent }
            } else if tokens
                .iter()
                .any(|token| AFFIRMATIVE_TOKENS.contains(&token.as_str()))
            {
                // A bare affirmative accepts the surcharge at the full rate.
                MessageIntent::SewageFollowUp {
                    percent: SewagePercent::Full,
                }
            } else {
                MessageIntent::Fallback
            }
        }
    }
}

struct FoundVolume {
    volume: u32,
    token_index: usize,
}

fn clean_token(raw: &str) -> String {
    raw.trim_matches(|c: char| !(c.is_alphanumeric() || c == '%'))
        .to_string()
}

fn is_volume_unit(token: &str) -> bool {
    VOLUME_UNITS.contains(&token)
}

/// First integer immediately followed (with or without whitespace) by a
/// volume unit. `"15m3"` and `"15 m3"` both match; a bare number does not.
fn extract_volume(tokens: &[String]) -> Option<FoundVolume> {
    for (index, token) in tokens.iter().enumerate() {
        for unit in VOLUME_UNITS {
            if let Some(digits) = token.strip_suffix(unit) {
                if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
                    if let Ok(volume) = digits.parse::<u32>() {
                        return Some(FoundVolume {
                            volume,
                            token_index: index,
                        });
                    }
                }
            }
        }

        if token.chars().all(|c| c.is_ascii_digit()) && !token.is_empty() {
            if let Some(next) = tokens.get(index + 1) {
                if is_volume_unit(next) {
                    if let Ok(volume) = token.parse::<u32>() {
                        return Some(FoundVolume {
                            volume,
                            token_index: index,
                        });
                    }
                }
            }
        }
    }
    None
}

fn extract_category(tokens: &[String]) -> Option<ConsumerCategory> {
    for (category, keywords) in CATEGORY_KEYWORDS {
        if tokens
            .iter()
            .any(|token| keywords.contains(&token.as_str()))
        {
            return Some(category);
        }
    }
    None
}

/// Bare 4-digit token restricted to years with a published schedule.
fn extract_year(tokens: &[String]) -> Option<u16> {
    tokens
        .iter()
        .filter(|token| token.len() == 4 && token.chars().all(|c| c.is_ascii_digit()))
        .filter_map(|token| token.parse::<u16>().ok())
        .find(|year| tariffs::is_supported_year(*year))
}

/// Standalone 80/90/100, optionally suffixed with `%`. The token consumed by
/// the volume match is skipped so "80 m3" never reads as a surcharge choice.
fn extract_sewage(tokens: &[String], volume: Option<&FoundVolume>) -> Option<SewagePercent> {
    tokens
        .iter()
        .enumerate()
        .filter(|(index, _)| volume.map(|found| found.token_index) != Some(*index))
        .map(|(_, token)| token.trim_end_matches('%'))
        .filter(|token| !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()))
        .filter_map(|token| token.parse::<u32>().ok())
        .find_map(SewagePercent::from_number)
}

fn match_procedure(text: &str) -> Option<(ServiceProcedure, Option<DisplacementGround>)> {
    const TRIGGERS: [(ServiceProcedure, &[&str]); 5] = [
        (
            ServiceProcedure::OwnershipTransfer,
            &["ownership transfer", "troca de titularidade", "titularidade"],
        ),
        (
            ServiceProcedure::Reconnection,
            &["reconnection", "religacao", "religação"],
        ),
        (
            ServiceProcedure::NewConnection,
            &[
                "new connection",
                "ligacao nova",
                "ligação nova",
                "nova ligacao",
                "nova ligação",
            ],
        ),
        (
            ServiceProcedure::FinalReading,
            &["final reading", "leitura final", "afericao", "aferição"],
        ),
        (
            ServiceProcedure::Displacement,
            &["displacement", "deslocamento"],
        ),
    ];

    for (procedure, phrases) in TRIGGERS {
        if phrases.iter().any(|phrase| text.contains(phrase)) {
            let ground = if procedure == ServiceProcedure::Displacement {
                displacement_ground(text)
            } else {
                None
            };
            return Some((procedure, ground));
        }
    }
    None
}

fn match_faq(text: &str) -> Option<FaqTopic> {
    const MINIMUM_CHARGE: [&str; 3] = ["taxa minima", "taxa mínima", "minimum charge"];
    const INSTALLMENTS: [&str; 3] = ["parcelamento", "parcelar", "installment"];

    if MINIMUM_CHARGE.iter().any(|phrase| text.contains(phrase)) {
        Some(FaqTopic::MinimumCharge)
    } else if INSTALLMENTS.iter().any(|phrase| text.contains(phrase)) {
        Some(FaqTopic::Installments)
    } else {
        None
    }
}

fn displacement_ground(text: &str) -> Option<DisplacementGround> {
    // "unpaved" contains "paved", so the unpaved triggers are checked first.
    const UNPAVED: [&str; 3] = ["unpaved", "leito natural", "sem pavimento"];
    const PAVED: [&str; 3] = ["paved", "pavimentado", "asfalto"];

    if UNPAVED.iter().any(|phrase| text.contains(phrase)) {
        Some(DisplacementGround::Unpaved)
    } else if PAVED.iter().any(|phrase| text.contains(phrase)) {
        Some(DisplacementGround::Paved)
    } else {
        None
    }
}
