//! Prompt templates: the per-country persona and the government-search
//! instruction.

/// Build the system prompt that scopes the assistant to one destination.
///
/// Any non-empty name is accepted; names outside the catalog get the same
/// template with the literal name substituted.
pub fn build_persona(country: &str) -> String {
    format!(
        "You are an expert in helping immigrants integrate into a new country. \
         The user wants to move to {country}. \
         Provide detailed advice on paperwork, legal requirements, and practical steps \
         to move to this country. \
         Additionally, assist with translations and cultural integration questions \
         to help newcomers feel at home."
    )
}

/// Rewrite a user query into an instruction to search official sources with
/// the named tool.
pub fn government_search_prompt(tool_name: &str, query: &str, country: &str) -> String {
    format!(
        "Use {tool} to search for information about: {query} related to {country}. \
         Provide relevant information and links if available.",
        tool = tool_name.to_uppercase(),
    )
}
