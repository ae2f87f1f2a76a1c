use crate::process::{IdSource, ProcessDefinition, generate_edge_id_with, generate_node_id_with};
use ahash::AHashSet;
use log::info;

/// Repairs import-time defects in place and returns one warning per repair.
///
/// In order: blank or colliding node ids are renamed, blank or colliding flow
/// ids are renamed, then flows whose endpoints do not resolve are dropped.
/// Flows keep pointing at the first node that used an id. The result depends
/// only on the input and on `ids`, so a fixed id source gives repeatable output.
pub fn auto_correct(definition: &mut ProcessDefinition, ids: &dyn IdSource) -> Vec<String> {
    let mut warnings = Vec::new();

    let mut taken: AHashSet<String> = AHashSet::new();
    for node in &mut definition.nodes {
        if node.id.trim().is_empty() {
            let renamed = unique(generate_node_id_with(ids, node.node_type()), &taken);
            warnings.push(format!(
                "Assigned id '{}' to node '{}' without an id",
                renamed, node.name
            ));
            node.id = renamed;
        } else if taken.contains(&node.id) {
            let renamed = unique(format!("{}_{}", node.id, ids.stamp()), &taken);
            warnings.push(format!(
                "Renamed duplicate node id '{}' to '{}'",
                node.id, renamed
            ));
            node.id = renamed;
        }
        taken.insert(node.id.clone());
    }
    let node_ids = taken;

    let mut taken: AHashSet<String> = AHashSet::new();
    for flow in &mut definition.flows {
        if flow.id.trim().is_empty() {
            let renamed = unique(generate_edge_id_with(ids, &flow.from, &flow.to), &taken);
            warnings.push(format!(
                "Assigned id '{}' to flow from '{}' to '{}'",
                renamed, flow.from, flow.to
            ));
            flow.id = renamed;
        } else if taken.contains(&flow.id) {
            let renamed = unique(format!("{}_{}", flow.id, ids.stamp()), &taken);
            warnings.push(format!(
                "Renamed duplicate flow id '{}' to '{}'",
                flow.id, renamed
            ));
            flow.id = renamed;
        }
        taken.insert(flow.id.clone());
    }

    definition.flows.retain(|flow| {
        let missing: Vec<String> = [flow.from.as_str(), flow.to.as_str()]
            .into_iter()
            .filter(|id| !node_ids.contains(*id))
            .map(|id| format!("'{}'", id))
            .collect();
        if missing.is_empty() {
            return true;
        }
        warnings.push(format!(
            "Removed flow '{}' referencing missing node(s): {}",
            flow.id,
            missing.join(", ")
        ));
        false
    });

    for warning in &warnings {
        info!("auto-correct: {}", warning);
    }
    warnings
}

fn unique(candidate: String, taken: &AHashSet<String>) -> String {
    if !taken.contains(&candidate) {
        return candidate;
    }
    (2..)
        .map(|n| format!("{}_{}", candidate, n))
        .find(|c| !taken.contains(c))
        .unwrap_or(candidate)
}
