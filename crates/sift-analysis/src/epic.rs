use sift_core::llm::{complete_cancellable, CompletionProvider, CompletionRequest};
use sift_core::model::{push_unique, AnalysisBead, BeadType, Cluster, Signal};
use tokio_util::sync::CancellationToken;

use crate::error::AnalysisError;
use crate::merge::{merge_cluster_to_beads, resolve_members};
use crate::parse::{parse_epic_response, EpicResponse};
use crate::text::{prompt_snippet, truncate_chars};

/// Clusters with more resolved members than this become an epic with child tasks.
pub const EPIC_THRESHOLD: usize = 5;

const MAX_TITLE_CHARS: usize = 80;
const MAX_TOKENS: u32 = 512;

const SYSTEM_PROMPT: &str = "You are a technical project manager writing backlog epics. \
Respond with JSON only, no prose.";

/// Turn a cluster into beads. Never fails.
///
/// Clusters with at most [`EPIC_THRESHOLD`] resolved members are merged by
/// [`merge_cluster_to_beads`] without calling the LLM. Larger ones produce an
/// epic bead (titled by the LLM, or by the cluster itself if that fails)
/// followed by one task bead per member, in member order.
pub async fn create_epic_hierarchy(
    cluster: &Cluster,
    signals: &[Signal],
    provider: &dyn CompletionProvider,
    cancel: &CancellationToken,
) -> Vec<AnalysisBead> {
    let members = resolve_members(cluster, signals);
    if members.len() <= EPIC_THRESHOLD {
        return merge_cluster_to_beads(cluster, signals);
    }

    let (title, description) = match request_epic(cluster, &members, provider, cancel).await {
        Ok(epic) => (
            truncate_chars(epic.title.trim(), MAX_TITLE_CHARS).to_string(),
            epic.description.trim().to_string(),
        ),
        Err(e) => {
            tracing::warn!("Epic summary for {} failed, using cluster name: {e}", cluster.id);
            (cluster.name.clone(), cluster.description.clone())
        }
    };

    let mut tags = cluster.tags.clone();
    push_unique(&mut tags, "epic");

    let mut beads = Vec::with_capacity(members.len() + 1);
    beads.push(AnalysisBead {
        id: cluster.id.clone(),
        title,
        description,
        bead_type: BeadType::Epic,
        confidence: cluster.confidence,
        tags,
        parent_id: String::new(),
        source_signals: members.iter().map(|s| (*s).clone()).collect(),
    });
    for (n, sig) in members.iter().enumerate() {
        beads.push(AnalysisBead {
            id: format!("{}.{}", cluster.id, n + 1),
            title: sig.title.clone(),
            description: sig.description.clone(),
            bead_type: BeadType::Task,
            confidence: sig.confidence,
            tags: sig.tags.clone(),
            parent_id: cluster.id.clone(),
            source_signals: vec![(*sig).clone()],
        });
    }
    beads
}

async fn request_epic(
    cluster: &Cluster,
    members: &[&Signal],
    provider: &dyn CompletionProvider,
    cancel: &CancellationToken,
) -> Result<EpicResponse, AnalysisError> {
    let request = CompletionRequest::new(build_epic_prompt(cluster, members))
        .with_system(SYSTEM_PROMPT)
        .with_max_tokens(MAX_TOKENS);
    let response = complete_cancellable(provider, cancel, request).await?;
    Ok(parse_epic_response(&response.content)?)
}

fn build_epic_prompt(cluster: &Cluster, members: &[&Signal]) -> String {
    let mut prompt = format!(
        "These {} related work items were grouped as \"{}\".\n",
        members.len(),
        cluster.name
    );
    if !cluster.description.trim().is_empty() {
        prompt.push_str(&format!("Group summary: {}\n", cluster.description.trim()));
    }
    prompt.push_str("\nItems:\n");
    for sig in members {
        let location = sig.location();
        if location.is_empty() {
            prompt.push_str(&format!("- {}", sig.title));
        } else {
            prompt.push_str(&format!("- {} ({location})", sig.title));
        }
        if !sig.description.trim().is_empty() {
            prompt.push_str(&format!(": {}", prompt_snippet(&sig.description, 200)));
        }
        prompt.push('\n');
    }
    prompt.push_str(&format!(
        "\nWrite an epic that covers all of them: a title of at most {MAX_TITLE_CHARS} \
         characters and a 2-3 sentence description of the overall goal.\n\
         Respond with a single JSON object: {{\"title\": \"...\", \"description\": \"...\"}}\n"
    ));
    prompt
}
