use std::collections::HashSet;

use sift_core::llm::{complete_cancellable, CompletionProvider, CompletionRequest};
use sift_core::model::{BeadDependency, DependencyType, Signal};
use sift_core::{resolve_signal_ref, signal_id, signal_ref};
use tokio_util::sync::CancellationToken;

use super::dag::{break_cycles, IndexEdge};
use crate::error::AnalysisError;
use crate::parse::{parse_dependency_response, DependencyItem};
use crate::text::prompt_snippet;

const SYSTEM_PROMPT: &str = "You are a senior engineer mapping dependencies between backlog \
items. Only report relationships you are confident about. Respond with JSON only, no prose.";

const MAX_TOKENS: u32 = 4096;

/// A dependency item that passed validation, still keyed by signal position.
#[derive(Debug, Clone, Copy)]
struct ResolvedDep {
    from: usize,
    to: usize,
    dep_type: DependencyType,
    confidence: f64,
}

/// Ask the LLM for typed relationships between `signals`. Never fails.
///
/// Dependencies are enrichment: on any provider or parse failure the result
/// is empty. Surviving "blocks" edges always form a DAG, and every endpoint
/// is reported as the stable bead ID for `id_prefix`.
pub async fn infer_dependencies(
    signals: &[Signal],
    provider: &dyn CompletionProvider,
    cancel: &CancellationToken,
    id_prefix: &str,
) -> Vec<BeadDependency> {
    if signals.len() < 2 {
        return Vec::new();
    }

    let items = match request_dependencies(signals, provider, cancel).await {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!("Dependency inference failed, continuing without dependencies: {e}");
            return Vec::new();
        }
    };

    let resolved = validate(&items, signals.len());
    let acyclic = remove_blocking_cycles(resolved);

    let deps: Vec<BeadDependency> = acyclic
        .into_iter()
        .filter_map(|d| {
            let from_id = signals.get(d.from).map(|s| signal_id(s, id_prefix))?;
            let to_id = signals.get(d.to).map(|s| signal_id(s, id_prefix))?;
            Some(BeadDependency {
                from_id,
                to_id,
                dep_type: d.dep_type,
                confidence: d.confidence,
            })
        })
        .collect();

    tracing::info!("Inferred {} dependencies from {} proposals", deps.len(), items.len());
    deps
}

async fn request_dependencies(
    signals: &[Signal],
    provider: &dyn CompletionProvider,
    cancel: &CancellationToken,
) -> Result<Vec<DependencyItem>, AnalysisError> {
    let request = CompletionRequest::new(build_dependency_prompt(signals))
        .with_system(SYSTEM_PROMPT)
        .with_max_tokens(MAX_TOKENS);
    let response = complete_cancellable(provider, cancel, request).await?;
    Ok(parse_dependency_response(&response.content)?)
}

/// Keep items with two known, distinct endpoints and a recognized type.
fn validate(items: &[DependencyItem], len: usize) -> Vec<ResolvedDep> {
    items
        .iter()
        .filter_map(|item| {
            let from = resolve_signal_ref(&item.from, len)?;
            let to = resolve_signal_ref(&item.to, len)?;
            let dep_type = DependencyType::parse(&item.dep_type)?;
            if from == to {
                return None;
            }
            Some(ResolvedDep {
                from,
                to,
                dep_type,
                confidence: item.confidence.clamp(0.0, 1.0),
            })
        })
        .collect()
}

/// Drop the weakest "blocks" edges until they form a DAG. Other relationship
/// types pass through untouched; relative order is preserved.
fn remove_blocking_cycles(deps: Vec<ResolvedDep>) -> Vec<ResolvedDep> {
    let blocking: Vec<usize> = deps
        .iter()
        .enumerate()
        .filter(|(_, d)| d.dep_type == DependencyType::Blocks)
        .map(|(i, _)| i)
        .collect();
    let edges: Vec<IndexEdge> = blocking
        .iter()
        .map(|&i| IndexEdge {
            from: deps[i].from,
            to: deps[i].to,
            confidence: deps[i].confidence,
        })
        .collect();

    let dropped: HashSet<usize> = break_cycles(&edges)
        .into_iter()
        .map(|slot| blocking[slot])
        .collect();
    if !dropped.is_empty() {
        tracing::warn!("Removed {} blocks edge(s) to keep the graph acyclic", dropped.len());
    }

    deps.into_iter()
        .enumerate()
        .filter(|(i, _)| !dropped.contains(i))
        .map(|(_, d)| d)
        .collect()
}

fn build_dependency_prompt(signals: &[Signal]) -> String {
    let mut prompt = String::from(
        "Identify relationships between the work signals below.\n\n\
         Relationship types:\n\
         - blocks: \"from\" must be finished before \"to\" can start.\n\
         - parent: \"from\" is a larger piece of work that contains \"to\".\n\
         - relates-to: the items touch the same area but neither blocks the other.\n\n\
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
        prompt.push_str("]\n");
        if !sig.description.trim().is_empty() {
            prompt.push_str(&format!(
                "  description: {}\n",
                prompt_snippet(&sig.description, 200)
            ));
        }
    }
    prompt.push_str(
        "\nRespond with a single JSON object of this exact shape:\n\
         {\"dependencies\": [{\"from\": \"sig-0\", \"to\": \"sig-1\", \"type\": \"blocks\", \
         \"confidence\": 0.8}]}\n\
         Confidence is between 0 and 1. Return {\"dependencies\": []} if there are none.\n",
    );
    prompt
}
