//! Grounding instruction and user message construction for the primary provider call.

const ROLE_AND_TONE: &str = "You are Med-AI, an empathetic medical assistant. Provide helpful health guidance based on reported symptoms.
Guidelines:
- Be conversational and natural, not robotic or scripted
- Provide specific, contextual advice rather than generic templates
- Consider symptom severity and duration when mentioned
- Always recommend professional medical evaluation
- Be honest about the limitations of remote assessment
- Keep responses concise (2-4 sentences unless listing precautions)";

const FORMATTING_RULES: &str = "Formatting rules:
- When the symptoms match a disease in the knowledge base, name the disease and echo its precautions.
- Wrap every precaution or treatment section you echo in **double asterisks**.
- Do not invent diseases, descriptions or treatments that are not in the knowledge base.
- If nothing in the knowledge base matches, say so and recommend seeing a healthcare professional.";

/// Build the system instruction for the primary call.
///
/// `knowledge_base` is inserted verbatim. `reply_language` is only set in native language mode.
pub fn grounding_instruction(knowledge_base: Option<&str>, reply_language: Option<&str>) -> String {
    let mut instruction = String::from(ROLE_AND_TONE);

    if let Some(kb) = knowledge_base.filter(|kb| !kb.trim().is_empty()) {
        instruction.push_str("\n\nUse the following knowledge base as your reference:\n\n");
        instruction.push_str(kb);
        instruction.push_str("\n\n");
        instruction.push_str(FORMATTING_RULES);
    }

    if let Some(code) = reply_language {
        instruction.push_str(&format!(
            "\n\nReply only in {} (language code '{}').",
            language_name(code),
            code.trim()
        ));
    }

    instruction
}

/// `symptoms` plus `" (duration: <duration>)"` when a duration was given.
pub fn user_message(symptoms: &str, duration: Option<&str>) -> String {
    let symptoms = symptoms.trim();
    match duration.map(str::trim).filter(|d| !d.is_empty()) {
        Some(duration) => format!("{symptoms} (duration: {duration})"),
        None => symptoms.to_string(),
    }
}

/// English display name for the language codes the web client offers.
pub fn language_name(code: &str) -> &str {
    match code.trim().to_ascii_lowercase().as_str() {
        "en" | "english" => "English",
        "hi" => "Hindi",
        "mr" => "Marathi",
        "bn" => "Bengali",
        "ta" => "Tamil",
        "te" => "Telugu",
        "gu" => "Gujarati",
        "kn" => "Kannada",
        "ml" => "Malayalam",
        "pa" => "Punjabi",
        "ur" => "Urdu",
        "es" => "Spanish",
        "fr" => "French",
        "de" => "German",
        _ => code.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_appends_duration() {
        assert_eq!(
            user_message("sore throat", Some("3 days")),
            "sore throat (duration: 3 days)"
        );
        assert_eq!(user_message("sore throat", Some("  ")), "sore throat");
        assert_eq!(user_message("sore throat", None), "sore throat");
    }

    #[test]
    fn test_grounding_instruction_embeds_knowledge_verbatim() {
        let kb = "DISEASE: Malaria\nDESCRIPTION: x\n----------------------------------------";
        let instruction = grounding_instruction(Some(kb), None);

        assert!(instruction.contains(kb));
        assert!(instruction.contains("**double asterisks**"));
        assert!(!instruction.contains("Reply only in"));
    }

    #[test]
    fn test_grounding_instruction_without_knowledge_has_no_formatting_rules() {
        let instruction = grounding_instruction(None, None);

        assert!(instruction.starts_with("You are Med-AI"));
        assert!(!instruction.contains("knowledge base as your reference"));
    }

    #[test]
    fn test_grounding_instruction_names_reply_language() {
        let instruction = grounding_instruction(None, Some("mr"));

        assert!(instruction.ends_with("Reply only in Marathi (language code 'mr')."));
    }

    #[test]
    fn test_language_name_passes_unknown_codes_through() {
        assert_eq!(language_name("HI"), "Hindi");
        assert_eq!(language_name("sw"), "sw");
    }
}
