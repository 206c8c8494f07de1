// src/services/prompt.rs

/// Fixed German instruction prompt. Neither input is sanitized.
pub fn compose_prompt(question: &str, context: &str) -> String {
    format!(
        "\nDu bist ein professioneller Kundenservice-Assistent von Planville GmbH.\n\
         Antworte bitte höflich, direkt und hilfreich basierend auf dem folgenden Kontext.\n\
         \n\
         🔎 Frage:\n\
         {question}\n\
         \n\
         📄 Kontext:\n\
         {context}\n"
    )
}
