//! Prompt builder for quiz question generation.
//!
//! The prompt embeds the full output contract: exact count, a bare JSON array,
//! the record schema with its cardinality constraints, and the language.

/// Builds the user prompt asking the model for `count` questions on `theme`.
///
/// The theme is inserted verbatim. A zero or negative `count` yields a
/// degenerate prompt that is still returned; bounding the count is the
/// caller's job.
///
/// # Examples
///
/// ```
/// use quizforge::prompts::build_questions_prompt;
///
/// let prompt = build_questions_prompt("astronomie", 3);
/// assert!(prompt.contains("exactement 3 questions"));
/// assert!(prompt.contains("\"astronomie\""));
/// ```
pub fn build_questions_prompt(theme: &str, count: i64) -> String {
    format!(
        r#"Génère exactement {count} questions de quiz de culture générale sur le thème "{theme}".

IMPORTANT: Ta réponse doit être UNIQUEMENT un tableau JSON valide, sans aucun texte avant ou après.

Format JSON requis:
[
  {{
    "question": "La question complète en français avec un point d'interrogation",
    "options": ["Option A", "Option B", "Option C", "Option D"],
    "reponseCorrecte": "La bonne réponse (doit être exactement une des 4 options)"
  }}
]

Règles strictes:
- Exactement {count} questions
- Questions en français
- Chaque question a exactement 4 options
- Une seule réponse correcte par question
- La reponseCorrecte doit correspondre EXACTEMENT à une des options
- Difficulté variée (facile, moyen, difficile)
- Questions factuelles avec des réponses vérifiables
- Évite les questions trop obscures ou controversées

Génère maintenant les {count} questions sur "{theme}":"#
    )
}
