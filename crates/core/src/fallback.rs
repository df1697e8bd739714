//! Keyword-matched advice templates used when the provider cannot answer.
//!
//! Rules are evaluated in table order against the lower-cased symptom text and the first rule
//! with any matching keyword wins. Keywords match as substrings, so `"hot flushes"` and
//! `"feeling hot"` both select the fever template.

/// Which template produced a fallback reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackCategory {
    Fever,
    Respiratory,
    Headache,
    Fatigue,
    Digestive,
    /// No keyword matched; the template echoes the reported symptoms.
    General,
}

impl FallbackCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackCategory::Fever => "fever",
            FallbackCategory::Respiratory => "respiratory",
            FallbackCategory::Headache => "headache",
            FallbackCategory::Fatigue => "fatigue",
            FallbackCategory::Digestive => "digestive",
            FallbackCategory::General => "general",
        }
    }
}

pub struct FallbackRule {
    pub category: FallbackCategory,
    pub keywords: &'static [&'static str],
    pub template: &'static str,
}

/// Ordered rule table; earlier rules take priority.
pub const FALLBACK_RULES: &[FallbackRule] = &[
    FallbackRule {
        category: FallbackCategory::Fever,
        keywords: &["fever", "temperature", "hot"],
        template: "I see you have a fever. Monitor your temperature regularly and stay hydrated. If it persists beyond 3-4 days or exceeds 103°F (39.4°C), seek medical attention promptly.",
    },
    FallbackRule {
        category: FallbackCategory::Respiratory,
        keywords: &["cough", "throat", "sore"],
        template: "Coughing and sore throat can have various causes. Rest your voice, stay hydrated, and try throat lozenges. If it's accompanied by difficulty breathing or lasts over 2 weeks, see a doctor.",
    },
    FallbackRule {
        category: FallbackCategory::Headache,
        keywords: &["headache", "migraine", "head pain"],
        template: "Headaches can stem from dehydration, stress, or other causes. Try rest, hydration, and over-the-counter pain relief if appropriate. Recurring or severe headaches warrant a medical evaluation.",
    },
    FallbackRule {
        category: FallbackCategory::Fatigue,
        keywords: &["fatigue", "tired", "exhausted"],
        template: "Fatigue can indicate various conditions from lack of sleep to nutritional deficiencies. Ensure adequate rest, balanced nutrition, and hydration. Persistent fatigue warrants a medical evaluation.",
    },
    FallbackRule {
        category: FallbackCategory::Digestive,
        keywords: &["nausea", "vomiting", "stomach"],
        template: "Nausea and digestive issues may be related to diet, stress, or infection. Rest your digestive system, stay hydrated with clear fluids, and eat bland foods. Contact a doctor if symptoms worsen.",
    },
];

/// Template text for the general rule, echoing the reported symptoms.
pub fn general_template(symptoms: &str) -> String {
    format!(
        "I understand you're experiencing {symptoms}. This requires proper medical evaluation to determine the cause. Monitor your condition and consult a healthcare provider if symptoms persist or worsen."
    )
}

/// Pick exactly one fallback reply for the symptom text.
///
/// Returns `None` only when there is nothing to classify (blank symptoms).
pub fn classify(symptoms: &str) -> Option<(FallbackCategory, String)> {
    if symptoms.trim().is_empty() {
        return None;
    }

    let lowered = symptoms.to_lowercase();
    let matched = FALLBACK_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| lowered.contains(k)));

    Some(match matched {
        Some(rule) => (rule.category, rule.template.to_string()),
        None => (FallbackCategory::General, general_template(symptoms)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template_for(category: FallbackCategory) -> &'static str {
        FALLBACK_RULES
            .iter()
            .find(|r| r.category == category)
            .map(|r| r.template)
            .unwrap()
    }

    #[test]
    fn test_fever_wins_over_cough() {
        let (category, text) = classify("I have a fever and a cough").unwrap();

        assert_eq!(category, FallbackCategory::Fever);
        assert_eq!(text, template_for(FallbackCategory::Fever));
    }

    #[test]
    fn test_each_category_is_reachable() {
        let cases = [
            ("High TEMPERATURE since morning", FallbackCategory::Fever),
            ("my throat hurts", FallbackCategory::Respiratory),
            ("terrible migraine", FallbackCategory::Headache),
            ("always tired", FallbackCategory::Fatigue),
            ("upset stomach", FallbackCategory::Digestive),
        ];

        for (input, expected) in cases {
            let (category, _) = classify(input).unwrap();
            assert_eq!(category, expected, "input: {input}");
        }
    }

    #[test]
    fn test_general_template_echoes_symptoms() {
        let (category, text) = classify(" itchy rash on elbow ").unwrap();

        assert_eq!(category, FallbackCategory::General);
        assert_eq!(text, general_template(" itchy rash on elbow "));
        assert!(text.starts_with("I understand you're experiencing  itchy rash on elbow . "));
    }

    #[test]
    fn test_blank_symptoms_do_not_classify() {
        assert!(classify("   ").is_none());
    }
}
