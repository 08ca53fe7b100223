//! Dependency Resolution
//!
//! Produces a safe load order over a candidate set of plugins, or reports
//! a cycle. Ordering edges come from two places: declared hard
//! dependencies (plugin names), and inferred soft dependencies (another
//! candidate provides a blackboard key this plugin consumes). Inference
//! only looks at the candidate set itself; names outside the set are
//! reported separately at load time and never block resolution.

use crate::plugin::error::{PluginError, PluginResult};
use crate::plugin::types::PluginMetadata;
use std::collections::VecDeque;

/// Effective dependency set for one candidate: declared names first, then
/// every other candidate whose `provides` intersects this plugin's
/// `consumes`, in candidate order, deduplicated
pub(crate) fn effective_dependencies(
    subject: &PluginMetadata,
    candidates: &[(String, PluginMetadata)],
) -> Vec<String> {
    let mut deps: Vec<String> = Vec::new();

    for declared in &subject.dependencies {
        if !deps.contains(declared) {
            deps.push(declared.clone());
        }
    }

    for (other_name, other_metadata) in candidates {
        if *other_name == subject.name {
            continue;
        }
        let supplies_consumed_key = other_metadata
            .provides
            .iter()
            .any(|key| subject.consumes.contains(key));
        if supplies_consumed_key && !deps.contains(other_name) {
            deps.push(other_name.clone());
        }
    }

    deps
}

/// Topologically sort the candidate set so every effective dependency
/// precedes its dependents
///
/// Kahn's algorithm, processing zero-in-degree candidates in input order
/// so ties stay deterministic. Dependencies naming plugins outside the
/// candidate set do not contribute edges. On a cycle, the error names
/// exactly the entangled plugins in input order; candidates that merely
/// depend on the cycle are not listed.
pub(crate) fn resolve_load_order(
    candidates: &[(String, PluginMetadata)],
) -> PluginResult<Vec<String>> {
    let names: Vec<&str> = candidates.iter().map(|(n, _)| n.as_str()).collect();
    let deps: Vec<Vec<String>> = candidates
        .iter()
        .map(|(_, metadata)| effective_dependencies(metadata, candidates))
        .collect();

    let mut in_degree: Vec<usize> = deps
        .iter()
        .map(|d| {
            d.iter()
                .filter(|dep| names.contains(&dep.as_str()))
                .count()
        })
        .collect();

    let mut queue: VecDeque<usize> = (0..names.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut sorted: Vec<String> = Vec::with_capacity(names.len());

    while let Some(current) = queue.pop_front() {
        sorted.push(names[current].to_string());

        for (dependent, dependent_deps) in deps.iter().enumerate() {
            if dependent_deps.iter().any(|d| d == names[current]) {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    queue.push_back(dependent);
                }
            }
        }
    }

    if sorted.len() != names.len() {
        let remaining: Vec<usize> = (0..names.len())
            .filter(|i| !sorted.contains(&names[*i].to_string()))
            .collect();
        return Err(PluginError::CircularDependency {
            plugin_names: prune_to_cycle(&remaining, &names, &deps),
        });
    }

    Ok(sorted)
}

/// Strip acyclic dependents from the unprocessed remainder, leaving only
/// plugins that are actually part of a cycle
fn prune_to_cycle(remaining: &[usize], names: &[&str], deps: &[Vec<String>]) -> Vec<String> {
    let mut members: Vec<usize> = remaining.to_vec();

    loop {
        let leaf = members.iter().position(|&candidate| {
            !members.iter().any(|&dependent| {
                deps[dependent].iter().any(|d| d == names[candidate])
            })
        });
        match leaf {
            Some(pos) => {
                members.remove(pos);
            }
            None => break,
        }
    }

    if members.is_empty() {
        members = remaining.to_vec();
    }

    members.into_iter().map(|i| names[i].to_string()).collect()
}
