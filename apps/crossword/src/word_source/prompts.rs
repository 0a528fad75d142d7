// Prompt constants for the LLM word source.
// Reuses the JSON-only fragment from llm_client::prompts.

/// System prompt for candidate generation.
pub const CANDIDATE_SYSTEM: &str = "You are a crossword constructor with a broad English vocabulary. \
    You suggest real, common English words that fit a letter pattern and write short, fair clues.";

/// Candidate prompt template. Replace `{pattern}`, `{length}`, `{theme_instruction}` and
/// `{json_instruction}` before sending.
pub const CANDIDATE_PROMPT_TEMPLATE: &str = r#"Suggest up to 10 English words for a crossword slot.

Pattern: {pattern}
- The pattern has exactly {length} characters.
- "?" is an unknown letter; any other character is a letter the word MUST have at that position.
- Words must be a single word of letters a-z only: no spaces, hyphens, digits, or proper nouns.
{theme_instruction}
Return a JSON array with this EXACT schema:
[
  {"word": "rails", "defs": ["n\tA track for a train"]}
]

Each "defs" entry starts with a part-of-speech tag (n, v, adj, adv), then a tab, then the clue.
Return [] if no word fits.

{json_instruction}"#;

/// Theme line inserted when the puzzle has a headline theme.
pub const THEME_INSTRUCTION_TEMPLATE: &str =
    "- Prefer words related to today's theme, and let the clue nod to it: \"{theme}\"";
