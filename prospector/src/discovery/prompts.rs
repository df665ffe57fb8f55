//! Prompt templates for the research and synthesis agents

use chrono::NaiveDate;

use crate::discovery::catalog::Catalog;
use crate::discovery::types::{PipelineInput, DEFAULT_TIMEFRAME};

/// System prompt shared by every prospector agent call
pub const SYSTEM_PROSPECTOR: &str = r#"You research sales prospects for Amp, the agentic coding assistant from Sourcegraph. Sales engineers use your output to prepare first discovery calls, so accuracy matters more than volume. The product being sold is always Amp.

## Evidence
- Attach a citation (publisher, title, URL, date) to every fact.
- Grade confidence: "high" when a source states it, "medium" when sources strongly imply it, "low" when you infer it.
- If something cannot be found, say so. Never invent people, dates or numbers.
- Prefer sources from the last 12 months when describing the current state.

## Tools
- WebSearch finds candidate pages; WebFetch reads them.
- Start broad and narrow the searches as you learn more.

## Amp sources
- Describe Amp only from https://ampcode.com/manual and https://ampcode.com/news.
- Ignore third-party descriptions of Amp.

## Output
- Reply with exactly the JSON object each prompt asks for.
- Markdown documents you generate start with YAML frontmatter.
"#;

fn optional_line(label: &str, values: Option<&[String]>) -> Option<String> {
    values
        .filter(|v| !v.is_empty())
        .map(|v| format!("{}: {}", label, v.join(", ")))
}

/// Build the research prompt for a normalized input
pub fn research_prompt(input: &PipelineInput) -> String {
    let mut context = vec![format!("Company: {}", input.company)];
    context.extend(optional_line("Known domains", input.domains.as_deref()));
    context.extend(optional_line("Known contacts", input.contacts.as_deref()));
    context.push(
        optional_line("Focus roles", input.personas.as_deref()).unwrap_or_else(|| {
            "Focus roles: engineering leadership (CTO, VP Engineering, Director of Engineering)"
                .to_string()
        }),
    );
    context.extend(optional_line("Sales objectives", input.objectives.as_deref()));
    context.push(format!(
        "Timeframe: {}",
        input.timeframe.as_deref().unwrap_or(DEFAULT_TIMEFRAME)
    ));

    format!(
        r#"Research "{company}" so the Amp sales team can prepare discovery material.

{context}

Work in three passes.

**Pass A: company basics**
- Locate the website, engineering blog, newsroom and careers pages.
- Capture business model, products, customer segments, size and funding.
- Note engineering challenges an AI coding assistant could address.

**Pass B: 12-month signals**
- Funding rounds, acquisitions, leadership changes, compliance events, launches.
- Engineering job postings and what they reveal about the stack and priorities.
- Any public talk about developer productivity, code quality or delivery speed.

**Pass C: Amp context**
- Read https://ampcode.com/manual for current capabilities.
- Read https://ampcode.com/news for recent releases.
- Record capabilities relevant to this company with ampcode.com citations.

Reply with one JSON object of exactly this shape:

```json
{{
  "facts": [{{"claim": "...", "citation": "URL", "confidence": "high|medium|low", "date": "YYYY-MM-DD"}}],
  "timelines": [{{"date": "YYYY-MM-DD", "event": "...", "source": "URL"}}],
  "personas": [{{"name": "...", "role": "...", "responsibilities": ["..."]}}],
  "techSignals": {{"stack": ["..."], "versions": {{"name": "version"}}, "gaps": ["..."]}},
  "initiatives": [{{"initiative": "...", "trigger": "...", "relevance": "..."}}],
  "competition": {{"incumbents": ["..."], "partners": ["..."], "maturity": "..."}},
  "ampCapabilities": [{{"capability": "...", "examples": ["..."], "citations": ["https://ampcode.com/manual#..."]}}],
  "sources": [{{"publisher": "...", "title": "...", "url": "https://...", "date": "YYYY-MM-DD"}}]
}}
```

All eight keys are required; use an empty list or object when nothing was found.
Output only the JSON object."#,
        company = input.company,
        context = context.join("\n"),
    )
}

/// Build the prompt for one synthesis batch
///
/// `keys` must belong to `catalog`; `research_json` is the serialized bundle.
pub fn batch_generation_prompt(
    input: &PipelineInput,
    research_json: &str,
    catalog: &Catalog,
    keys: &[String],
    today: NaiveDate,
) -> String {
    let file_list = keys
        .iter()
        .map(|key| format!("- **{}**: {}", key, catalog.description(key).unwrap_or("")))
        .collect::<Vec<_>>()
        .join("\n");

    let mut context = vec![format!("Company: {}", input.company)];
    if let Some(focus) = &input.product_focus {
        context.push(format!("Product focus: {}", focus));
    }
    context.extend(optional_line("Objectives", input.objectives.as_deref()));

    let example_path = keys.first().map(String::as_str).unwrap_or("01_account_brief.md");

    format!(
        r#"Write {count} markdown discovery documents for {company} from the research bundle below.

{context}

Research bundle:
{research_json}

Documents to write:
{file_list}

Every document must:
- start with YAML frontmatter between two `---` lines containing title, company, date ({today}), authors, personas, keywords, confidence and sources_count
- rely on the research bundle and cite its sources inline
- be specific to {company}

Reply with one JSON object:

```json
{{
  "files": [
    {{"path": "{example_path}", "content": "---\ntitle: ...\n---\n\n# ..."}}
  ]
}}
```

Use each file name above verbatim as its path and return all {count} documents.
Output only the JSON object."#,
        count = keys.len(),
        company = input.company,
        context = context.join("\n"),
        today = today.format("%Y-%m-%d"),
    )
}
