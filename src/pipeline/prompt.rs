//! Prompt templates for the pipeline stages.
//!
//! All stages request Czech clinical output; the instructions themselves are
//! kept terse and schema-first, which benchmarks better on small models than
//! long prose rules.

/// Diarization instruction for the transcription stage.
pub const DIARIZATION_SYSTEM_PROMPT: &str = "\
Jsi přepisovací asistent pro lékařské ordinace. Dostaneš nahrávku konzultace \
lékaře s pacientem v češtině. Přepiš ji doslovně a rozděl podle mluvčích.

Výstup je POUZE validní JSON tohoto tvaru:
{\"segments\": [{\"speaker\": \"Lékař\" | \"Pacient\" | \"Sestra\", \
\"text\": \"věta\", \"start\": sekundy, \"end\": sekundy}]}

Pravidla: mluvčí pouze z uvedené trojice, časy v sekundách od začátku \
nahrávky, nic nevynechávej ani nedoplňuj.";

/// Instruction sent along with the inline audio part.
pub const DIARIZATION_USER_PROMPT: &str =
    "Přepiš přiloženou nahrávku konzultace podle zadaného JSON tvaru.";

/// Entity extraction instruction.
pub const ENTITY_SYSTEM_PROMPT: &str = "\
Jsi asistent pro extrakci klinických entit z přepisu konzultace. Vyhledej \
všechny zmíněné diagnózy, léky, symptomy a osobní údaje. Extrahuj POUZE to, \
co je v přepisu výslovně uvedeno; nic nedovozuj.

Výstup je POUZE validní JSON tohoto tvaru:
{\"entities\": [{\"category\": \"DIAGNOSIS\" | \"MEDICATION\" | \"SYMPTOM\" \
| \"PII\" | \"OTHER\", \"text\": \"přesný text\"}]}";

/// Document classification instruction.
pub const CLASSIFY_SYSTEM_PROMPT: &str = "\
Jsi asistent, který z přepisu konzultace určí, jaké strukturované dokumenty \
je vhodné vystavit. Vyber jeden nebo více typů z této množiny:
ambulantni_zprava, osetrovatelsky_zapis, zadanka, potvrzeni_navstevy, \
doporuceni_lecby

Výstup je POUZE validní JSON: {\"documents\": [\"typ\", ...]}, seřazený od \
nejvhodnějšího typu.";

/// Report generation instruction. The per-type schema travels in the user
/// prompt, not here.
pub const REPORT_SYSTEM_PROMPT: &str = "\
Jsi asistent pro tvorbu strukturované zdravotnické dokumentace. Z přepisu \
konzultace a seznamu potvrzených entit vyplň zadané JSON schéma.

Pravidla — bez výjimek:
1. Použij POUZE informace výslovně uvedené v přepisu nebo v seznamu entit.
2. Entity označené \"provenance\": \"manual\" potvrdil lékař — převezmi je \
beze změny.
3. Chybějící hodnoty nech null, prázdné seznamy nech prázdné. Nic si \
nedomýšlej.
4. Výstup je POUZE jeden validní JSON objekt přesně podle schématu, bez \
pole \"typ\" a bez dalšího textu.";

/// User prompt for entity extraction.
pub fn build_entity_prompt(transcript: &str) -> String {
    format!("<prepis>\n{transcript}\n</prepis>\n\nExtrahuj klinické entity.")
}

/// User prompt for document classification.
pub fn build_classification_prompt(transcript: &str) -> String {
    format!("<prepis>\n{transcript}\n</prepis>\n\nUrči vhodné typy dokumentů.")
}

/// User prompt for structured report generation. Embeds the schema template,
/// the serialized entity list (anchoring the model to reviewed facts) and
/// the source transcript.
pub fn build_report_prompt(schema: &str, entities_json: &str, source_text: &str) -> String {
    format!(
        "Schéma dokumentu:\n```json\n{schema}\n```\n\n\
         Potvrzené entity:\n```json\n{entities_json}\n```\n\n\
         <prepis>\n{source_text}\n</prepis>\n\n\
         Vyplň schéma podle přepisu a entit."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_prompt_embeds_transcript() {
        let prompt = build_entity_prompt("Lékař: Dobrý den.");
        assert!(prompt.contains("<prepis>"));
        assert!(prompt.contains("Lékař: Dobrý den."));
    }

    #[test]
    fn report_prompt_embeds_all_three_inputs() {
        let prompt = build_report_prompt(
            "{\"plan\": []}",
            "[{\"text\":\"Paralen\"}]",
            "Pacient: Bolí mě hlava.",
        );
        assert!(prompt.contains("{\"plan\": []}"));
        assert!(prompt.contains("Paralen"));
        assert!(prompt.contains("Bolí mě hlava."));
    }

    #[test]
    fn classify_system_prompt_lists_all_wire_tags() {
        use crate::models::ReportType;
        for ty in ReportType::ALL {
            assert!(
                CLASSIFY_SYSTEM_PROMPT.contains(ty.as_str()),
                "classification prompt must list {}",
                ty.as_str()
            );
        }
    }
}
