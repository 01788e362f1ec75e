use globset::{GlobBuilder, GlobMatcher};
use sift_core::llm::{complete_cancellable, CompletionProvider, CompletionRequest};
use sift_core::model::{PriorityOverride, Signal};
use sift_core::{resolve_signal_ref, signal_ref};
use tokio_util::sync::CancellationToken;

use crate::error::AnalysisError;
use crate::parse::{parse_priority_response, PriorityItem};
use crate::text::prompt_snippet;

const SYSTEM_PROMPT: &str = "You are a senior engineer prioritizing a code-health backlog. \
Respond with JSON only, no prose.";

const MAX_TOKENS: u32 = 4096;

/// Assign P1-P4 to `signals` in place. Never fails.
///
/// LLM-assigned priorities come first; path overrides are then applied on
/// top (first matching override wins), and the resulting spread is checked
/// for obviously skewed output. Empty input is a no-op.
pub async fn infer_priorities(
    signals: &mut [Signal],
    provider: &dyn CompletionProvider,
    cancel: &CancellationToken,
    overrides: &[PriorityOverride],
) {
    if signals.is_empty() {
        return;
    }

    match request_priorities(signals, provider, cancel).await {
        Ok(items) => {
            let assigned = assign_priorities(signals, &items);
            tracing::info!("LLM assigned priorities to {assigned}/{} signals", signals.len());
        }
        Err(e) => tracing::warn!("Priority inference failed, applying overrides only: {e}"),
    }

    apply_overrides(signals, overrides);

    for warning in check_distribution(signals) {
        tracing::warn!("{warning}");
    }
}

async fn request_priorities(
    signals: &[Signal],
    provider: &dyn CompletionProvider,
    cancel: &CancellationToken,
) -> Result<Vec<PriorityItem>, AnalysisError> {
    let request = CompletionRequest::new(build_priority_prompt(signals))
        .with_system(SYSTEM_PROMPT)
        .with_max_tokens(MAX_TOKENS);
    let response = complete_cancellable(provider, cancel, request).await?;
    Ok(parse_priority_response(&response.content)?)
}

/// Write valid items onto their signals. Returns how many were applied.
fn assign_priorities(signals: &mut [Signal], items: &[PriorityItem]) -> usize {
    let mut applied = 0;
    for item in items {
        let Some(idx) = resolve_signal_ref(&item.id, signals.len()) else {
            tracing::debug!("Priority for unknown signal '{}' ignored", item.id);
            continue;
        };
        if !(1..=4).contains(&item.priority) {
            tracing::debug!("Out-of-range priority {} for {} ignored", item.priority, item.id);
            continue;
        }
        signals[idx].priority = Some(item.priority as u8);
        applied += 1;
    }
    applied
}

/// Apply path-based overrides. The first override (in slice order) whose
/// pattern matches a signal's file path sets its priority.
pub fn apply_overrides(signals: &mut [Signal], overrides: &[PriorityOverride]) {
    if overrides.is_empty() {
        return;
    }
    let compiled: Vec<(Option<GlobMatcher>, &PriorityOverride)> = overrides
        .iter()
        .map(|o| {
            let matcher = GlobBuilder::new(&o.pattern)
                .literal_separator(true)
                .build()
                .map(|g| g.compile_matcher())
                .map_err(|e| tracing::debug!("Invalid override pattern '{}': {e}", o.pattern))
                .ok();
            (matcher, o)
        })
        .collect();

    for sig in signals.iter_mut() {
        if sig.file_path.is_empty() {
            continue;
        }
        if let Some((_, o)) = compiled
            .iter()
            .find(|(matcher, o)| path_matches(matcher.as_ref(), &o.pattern, &sig.file_path))
        {
            sig.priority = Some(o.priority);
        }
    }
}

/// Glob match, falling back to a plain prefix match on the part of the
/// pattern before `**` when the glob does not match (or does not compile).
fn path_matches(matcher: Option<&GlobMatcher>, pattern: &str, path: &str) -> bool {
    if matcher.is_some_and(|m| m.is_match(path)) {
        return true;
    }
    match pattern.split_once("**") {
        Some((prefix, _)) if !prefix.is_empty() => path.starts_with(prefix),
        _ => false,
    }
}

/// Sanity checks on the final priority spread. Advisory only.
pub fn check_distribution(signals: &[Signal]) -> Vec<String> {
    let assigned: Vec<u8> = signals.iter().filter_map(|s| s.priority).collect();
    let mut warnings = Vec::new();
    if assigned.is_empty() {
        return warnings;
    }

    let p1 = assigned.iter().filter(|&&p| p == 1).count();
    if p1 * 2 > assigned.len() {
        warnings.push(format!(
            "{p1} of {} prioritized signals are P1; priorities may be inflated",
            assigned.len()
        ));
    }
    if assigned.len() > 1 && assigned.iter().all(|&p| p == assigned[0]) {
        warnings.push(format!(
            "All {} prioritized signals are P{}; priorities may not be discriminating",
            assigned.len(),
            assigned[0]
        ));
    }
    warnings
}

fn build_priority_prompt(signals: &[Signal]) -> String {
    let mut prompt = String::from(
        "Assign a priority from 1 to 4 to each work signal below.\n\n\
         Priority bands:\n\
         - P1: security vulnerabilities, data loss or corruption, outages.\n\
         - P2: user-facing bugs and broken functionality.\n\
         - P3: technical debt, missing tests, maintainability.\n\
         - P4: cosmetic issues, style, nice-to-haves.\n\n\
         Signals:\n",
    );
    for (i, sig) in signals.iter().enumerate() {
        prompt.push_str(&format!(
            "- {}: {} [kind: {}, source: {}",
            signal_ref(i),
            sig.title,
            sig.kind,
            sig.source
        ));
        let location = sig.location();
        if !location.is_empty() {
            prompt.push_str(&format!(", path: {location}"));
        }
        if !sig.tags.is_empty() {
            prompt.push_str(&format!(", tags: {}", sig.tags.join(", ")));
        }
        prompt.push_str(&format!(", confidence: {:.2}]\n", sig.confidence));
        if !sig.description.trim().is_empty() {
            prompt.push_str(&format!(
                "  description: {}\n",
                prompt_snippet(&sig.description, 200)
            ));
        }
    }
    prompt.push_str(
        "\nRespond with a single JSON object of this exact shape:\n\
         {\"priorities\": [{\"id\": \"sig-0\", \"priority\": 2, \"reasoning\": \"one sentence\"}]}\n\
         Include every signal ID listed above.\n",
    );
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{signal, MockProvider};

    fn override_(pattern: &str, priority: i64) -> PriorityOverride {
        PriorityOverride::new(pattern, priority).unwrap()
    }

    #[tokio::test]
    async fn test_empty_input_skips_provider() {
        let provider = MockProvider::failing();
        infer_priorities(&mut [], &provider, &CancellationToken::new(), &[]).await;
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_assigns_valid_priorities_only() {
        let mut signals = vec![
            signal("SQL injection in search", "src/search.rs", 0.9),
            signal("Typo in banner", "ui/banner.tsx", 0.5),
            signal("Missing tests", "src/lib.rs", 0.5),
        ];
        let provider = MockProvider::replying(&[r#"{"priorities":[
            {"id":"sig-0","priority":1,"reasoning":"security"},
            {"id":"sig-1","priority":9,"reasoning":"bogus"},
            {"id":"sig-7","priority":2,"reasoning":"unknown"},
            {"id":"sig-2","priority":3,"reasoning":"debt"}
        ]}"#]);

        infer_priorities(&mut signals, &provider, &CancellationToken::new(), &[]).await;

        assert_eq!(signals[0].priority, Some(1));
        assert_eq!(signals[1].priority, None);
        assert_eq!(signals[2].priority, Some(3));
        let prompt = provider.last_request().unwrap().prompt;
        assert!(prompt.contains("sig-2: Missing tests"));
        assert!(prompt.contains("P1: security"));
    }

    #[tokio::test]
    async fn test_provider_error_applies_overrides_only() {
        let mut signals = vec![
            signal("Check auth", "auth/session/x.go", 0.5),
            signal("Other", "lib/y.go", 0.5),
        ];
        let provider = MockProvider::failing();

        infer_priorities(
            &mut signals,
            &provider,
            &CancellationToken::new(),
            &[override_("auth/**", 2)],
        )
        .await;

        assert_eq!(provider.calls(), 1);
        assert_eq!(signals[0].priority, Some(2));
        assert_eq!(signals[1].priority, None);
    }

    #[tokio::test]
    async fn test_unparseable_reply_applies_overrides_only() {
        let mut signals = vec![
            signal("Check auth", "auth/session/x.go", 0.5),
            signal("Other", "lib/y.go", 0.5),
        ];
        let provider = MockProvider::replying(&["Sorry, I can't rank these right now."]);

        infer_priorities(
            &mut signals,
            &provider,
            &CancellationToken::new(),
            &[override_("auth/**", 2)],
        )
        .await;

        assert_eq!(provider.calls(), 1);
        assert_eq!(signals[0].priority, Some(2));
        assert_eq!(signals[1].priority, None);
    }

    #[tokio::test]
    async fn test_overrides_beat_llm_and_first_match_wins() {
        let mut signals = vec![signal("Check auth", "auth/x.go", 0.5)];
        let provider = MockProvider::replying(&[r#"[{"id":"sig-0","priority":3}]"#]);

        infer_priorities(
            &mut signals,
            &provider,
            &CancellationToken::new(),
            &[override_("auth/**", 1), override_("auth/**", 4)],
        )
        .await;

        assert_eq!(signals[0].priority, Some(1));
    }

    #[test]
    fn test_glob_semantics() {
        let mut signals = vec![
            signal("a", "docs/guide.md", 0.5),
            signal("b", "docs/api/ref.md", 0.5),
            signal("c", "src/main.rs", 0.5),
            signal("d", "", 0.5),
        ];
        apply_overrides(&mut signals, &[override_("docs/*.md", 4), override_("src/**", 3)]);
        assert_eq!(signals[0].priority, Some(4));
        // `*` does not cross directories.
        assert_eq!(signals[1].priority, None);
        assert_eq!(signals[2].priority, Some(3));
        assert_eq!(signals[3].priority, None);
    }

    #[test]
    fn test_prefix_fallback_for_uncompilable_pattern() {
        let mut signals = vec![signal("a", "vendor[old/lib.c", 0.5)];
        apply_overrides(&mut signals, &[override_("vendor[old/**", 4)]);
        assert_eq!(signals[0].priority, Some(4));
    }

    #[test]
    fn test_prefix_fallback_when_compiled_glob_misses() {
        let mut signals = vec![
            signal("a", "src/a/b/y", 0.5),
            signal("b", "lib/a/b/x", 0.5),
        ];
        // `src/**/x` compiles but only matches paths ending in `/x`.
        apply_overrides(&mut signals, &[override_("src/**/x", 2)]);
        assert_eq!(signals[0].priority, Some(2));
        assert_eq!(signals[1].priority, None);
    }

    #[test]
    fn test_leading_double_star_has_no_prefix_fallback() {
        let mut signals = vec![signal("a", "src/main.rs", 0.5)];
        apply_overrides(&mut signals, &[override_("**/x", 1)]);
        assert_eq!(signals[0].priority, None);
    }

    #[test]
    fn test_distribution_checks() {
        let mut signals = vec![
            signal("a", "", 0.5),
            signal("b", "", 0.5),
            signal("c", "", 0.5),
        ];
        assert!(check_distribution(&signals).is_empty());

        signals[0].priority = Some(1);
        signals[1].priority = Some(1);
        signals[2].priority = Some(3);
        let warnings = check_distribution(&signals);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("P1"));

        signals[0].priority = Some(2);
        signals[1].priority = Some(2);
        signals[2].priority = Some(2);
        let warnings = check_distribution(&signals);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("All 3"));
    }
}
