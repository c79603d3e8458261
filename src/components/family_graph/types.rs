//! Family graph data model: people, typed relationships, and the
//! operations that grow or prune the tree.
//!
//! The model is plain value data. Simulation state (positions, velocities,
//! pins) lives in a separate index-based store owned by the layout engine
//! and is never attached to these types.

use std::collections::{BTreeSet, HashSet};

use log::warn;
use serde::{Deserialize, Serialize};

/// Kind of a directed relationship between two people.
///
/// Direction matters for [`RelationshipType::ParentOf`]: the link's source
/// is the parent. Spouse and sibling links are conceptually symmetric but
/// stored with one fixed direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipType {
	/// Source is a parent of target.
	ParentOf,
	/// Partners, same generation.
	SpouseOf,
	/// Siblings, same generation.
	SiblingOf,
}

/// A person in the family graph.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonNode {
	/// Unique identifier, referenced by links.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Optional display label such as "Dad" or "Aunt".
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub relation_label: Option<String>,
	/// Free-text biography.
	#[serde(default)]
	pub bio: String,
	/// Hierarchy level: 0 for the viewing user, negative for ancestors,
	/// positive for descendants.
	pub generation: i32,
	/// Optional classification used for grouping.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub group: Option<u32>,
	/// Optional age, kept as text to match the embedded data format.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub age: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub gender: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub location: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub occupation: Option<String>,
	/// UI-level access flag for close-family-only content.
	#[serde(default)]
	pub is_close_family: bool,
	/// Optional family group memberships.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub family_ids: Option<BTreeSet<String>>,
}

/// A typed directed relationship between two people.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipLink {
	/// Source node id.
	pub source: String,
	/// Target node id.
	pub target: String,
	/// Relationship kind, serialized as `type`.
	#[serde(rename = "type")]
	pub kind: RelationshipType,
}

/// The user-facing choice when adding a relative to an anchor person.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelativeKind {
	Parent,
	Child,
	Spouse,
	Sibling,
}

/// Details for a relative being added to the graph.
#[derive(Clone, Debug, Default)]
pub struct NewRelative {
	pub name: String,
	pub relation_label: Option<String>,
	pub bio: String,
	pub is_close_family: bool,
}

/// Complete family graph: ordered people and relationship lists.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FamilyGraph {
	pub nodes: Vec<PersonNode>,
	pub links: Vec<RelationshipLink>,
}

impl FamilyGraph {
	/// Look up a person by id.
	pub fn node(&self, id: &str) -> Option<&PersonNode> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// Allocate an id above the numeric maximum of the existing ids.
	fn next_id(&self) -> String {
		let mut candidate = self
			.nodes
			.iter()
			.filter_map(|n| n.id.parse::<u64>().ok())
			.max()
			.unwrap_or(0)
			+ 1;
		while self.nodes.iter().any(|n| n.id == candidate.to_string()) {
			candidate += 1;
		}
		candidate.to_string()
	}

	/// Add a relative anchored to an existing person.
	///
	/// The new node's generation and the link direction follow from `kind`:
	/// a parent sits one generation above the anchor and the link points
	/// from the new node to the anchor; a child is the mirror image; spouse
	/// and sibling stay on the anchor's generation with the link pointing
	/// from the anchor to the new node.
	///
	/// Returns the new node's id, or `None` if the anchor does not exist.
	pub fn add_relative(
		&mut self,
		anchor_id: &str,
		kind: RelativeKind,
		details: NewRelative,
	) -> Option<String> {
		let Some(anchor) = self.node(anchor_id) else {
			warn!("add_relative: unknown anchor id {anchor_id}");
			return None;
		};
		let anchor_generation = anchor.generation;
		let new_id = self.next_id();

		let (generation, link) = match kind {
			RelativeKind::Parent => (
				anchor_generation - 1,
				RelationshipLink {
					source: new_id.clone(),
					target: anchor_id.to_string(),
					kind: RelationshipType::ParentOf,
				},
			),
			RelativeKind::Child => (
				anchor_generation + 1,
				RelationshipLink {
					source: anchor_id.to_string(),
					target: new_id.clone(),
					kind: RelationshipType::ParentOf,
				},
			),
			RelativeKind::Spouse => (
				anchor_generation,
				RelationshipLink {
					source: anchor_id.to_string(),
					target: new_id.clone(),
					kind: RelationshipType::SpouseOf,
				},
			),
			RelativeKind::Sibling => (
				anchor_generation,
				RelationshipLink {
					source: anchor_id.to_string(),
					target: new_id.clone(),
					kind: RelationshipType::SiblingOf,
				},
			),
		};

		self.nodes.push(PersonNode {
			id: new_id.clone(),
			name: details.name,
			relation_label: details.relation_label,
			bio: if details.bio.is_empty() {
				"New family member".to_string()
			} else {
				details.bio
			},
			generation,
			group: Some(generation.unsigned_abs() % 5 + 1),
			is_close_family: details.is_close_family,
			..PersonNode::default()
		});
		self.links.push(link);
		Some(new_id)
	}

	/// Replace a person's fields by id. Returns false if the id is unknown.
	pub fn update_node(&mut self, updated: PersonNode) -> bool {
		match self.nodes.iter_mut().find(|n| n.id == updated.id) {
			Some(slot) => {
				*slot = updated;
				true
			}
			None => false,
		}
	}

	/// Remove a person and cascade-delete every link touching them.
	pub fn remove_node(&mut self, id: &str) -> bool {
		let before = self.nodes.len();
		self.nodes.retain(|n| n.id != id);
		if self.nodes.len() == before {
			return false;
		}
		self.links.retain(|l| l.source != id && l.target != id);
		true
	}

	/// Drop links that reference missing node ids.
	///
	/// The layout engine assumes referential integrity, so callers run this
	/// on a snapshot before handing it over.
	pub fn retain_valid_links(&mut self) {
		let ids: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
		self.links
			.retain(|l| ids.contains(l.source.as_str()) && ids.contains(l.target.as_str()));
	}

	/// Built-in demo family: three generations around the viewing user.
	pub fn seed_family() -> Self {
		let person = |id: &str,
		              name: &str,
		              label: &str,
		              bio: &str,
		              generation: i32,
		              group: u32,
		              age: &str,
		              gender: &str| PersonNode {
			id: id.to_string(),
			name: name.to_string(),
			relation_label: Some(label.to_string()),
			bio: bio.to_string(),
			generation,
			group: Some(group),
			age: Some(age.to_string()),
			gender: Some(gender.to_string()),
			is_close_family: true,
			..PersonNode::default()
		};
		let link = |source: &str, target: &str, kind: RelationshipType| RelationshipLink {
			source: source.to_string(),
			target: target.to_string(),
			kind,
		};

		let mut me = person(
			"1",
			"Me",
			"Self",
			"The center of this universe.",
			0,
			1,
			"28",
			"Male",
		);
		me.location = Some("New York, USA".to_string());
		me.occupation = Some("Software Engineer".to_string());

		Self {
			nodes: vec![
				me,
				person(
					"2",
					"Arthur",
					"Father",
					"Hardworking man who loves fishing.",
					-1,
					2,
					"62",
					"Male",
				),
				person(
					"3",
					"Molly",
					"Mother",
					"The best cook in the world.",
					-1,
					2,
					"60",
					"Female",
				),
				person("4", "Ginny", "Spouse", "My partner in crime.", 0, 1, "27", "Female"),
				person(
					"5",
					"James",
					"Son",
					"Full of energy and mischief.",
					1,
					3,
					"5",
					"Male",
				),
				person("6", "Albus", "Son", "Quiet and thoughtful.", 1, 3, "3", "Male"),
			],
			links: vec![
				link("2", "1", RelationshipType::ParentOf),
				link("3", "1", RelationshipType::ParentOf),
				link("1", "4", RelationshipType::SpouseOf),
				link("1", "5", RelationshipType::ParentOf),
				link("4", "5", RelationshipType::ParentOf),
				link("1", "6", RelationshipType::ParentOf),
				link("4", "6", RelationshipType::ParentOf),
			],
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn tiny_graph() -> FamilyGraph {
		FamilyGraph {
			nodes: vec![
				PersonNode {
					id: "a".into(),
					name: "A".into(),
					generation: -1,
					..PersonNode::default()
				},
				PersonNode {
					id: "b".into(),
					name: "B".into(),
					generation: 0,
					..PersonNode::default()
				},
				PersonNode {
					id: "c".into(),
					name: "C".into(),
					generation: 1,
					..PersonNode::default()
				},
			],
			links: vec![
				RelationshipLink {
					source: "a".into(),
					target: "b".into(),
					kind: RelationshipType::ParentOf,
				},
				RelationshipLink {
					source: "b".into(),
					target: "c".into(),
					kind: RelationshipType::ParentOf,
				},
			],
		}
	}

	#[test]
	fn deleting_a_node_cascades_to_its_links() {
		let mut graph = tiny_graph();
		assert!(graph.remove_node("b"));
		assert_eq!(
			graph.nodes.iter().map(|n| n.id.as_str()).collect::<Vec<_>>(),
			vec!["a", "c"]
		);
		assert!(graph.links.is_empty());
	}

	#[test]
	fn deleting_an_unknown_id_changes_nothing() {
		let mut graph = tiny_graph();
		assert!(!graph.remove_node("zz"));
		assert_eq!(graph.nodes.len(), 3);
		assert_eq!(graph.links.len(), 2);
	}

	#[test]
	fn adding_a_parent_links_new_to_anchor_one_generation_up() {
		let mut graph = FamilyGraph::seed_family();
		let id = graph
			.add_relative("1", RelativeKind::Parent, NewRelative::default())
			.unwrap();
		let added = graph.node(&id).unwrap();
		assert_eq!(added.generation, -1);
		let link = graph.links.last().unwrap();
		assert_eq!(link.source, id);
		assert_eq!(link.target, "1");
		assert_eq!(link.kind, RelationshipType::ParentOf);
	}

	#[test]
	fn adding_a_child_links_anchor_to_new_one_generation_down() {
		let mut graph = FamilyGraph::seed_family();
		let id = graph
			.add_relative("2", RelativeKind::Child, NewRelative::default())
			.unwrap();
		assert_eq!(graph.node(&id).unwrap().generation, 0);
		let link = graph.links.last().unwrap();
		assert_eq!((link.source.as_str(), link.target.as_str()), ("2", id.as_str()));
		assert_eq!(link.kind, RelationshipType::ParentOf);
	}

	#[test]
	fn spouse_and_sibling_stay_on_the_anchor_generation() {
		let mut graph = FamilyGraph::seed_family();
		let spouse = graph
			.add_relative("2", RelativeKind::Spouse, NewRelative::default())
			.unwrap();
		let sibling = graph
			.add_relative("5", RelativeKind::Sibling, NewRelative::default())
			.unwrap();
		assert_eq!(graph.node(&spouse).unwrap().generation, -1);
		assert_eq!(graph.node(&sibling).unwrap().generation, 1);
		assert_eq!(graph.links[7].kind, RelationshipType::SpouseOf);
		assert_eq!(graph.links[8].kind, RelationshipType::SiblingOf);
	}

	#[test]
	fn adding_to_an_unknown_anchor_is_rejected() {
		let mut graph = FamilyGraph::seed_family();
		assert!(graph
			.add_relative("404", RelativeKind::Child, NewRelative::default())
			.is_none());
		assert_eq!(graph.nodes.len(), 6);
	}

	#[test]
	fn allocated_ids_are_unique_and_numeric() {
		let mut graph = FamilyGraph::seed_family();
		let first = graph
			.add_relative("1", RelativeKind::Sibling, NewRelative::default())
			.unwrap();
		let second = graph
			.add_relative("1", RelativeKind::Sibling, NewRelative::default())
			.unwrap();
		assert_ne!(first, second);
		assert_eq!(first, "7");
		assert_eq!(second, "8");
	}

	#[test]
	fn retain_valid_links_drops_dangling_references() {
		let mut graph = tiny_graph();
		graph.links.push(RelationshipLink {
			source: "b".into(),
			target: "ghost".into(),
			kind: RelationshipType::SiblingOf,
		});
		graph.retain_valid_links();
		assert_eq!(graph.links.len(), 2);
	}

	#[test]
	fn snapshot_serializes_with_the_embedded_data_format() {
		let graph = FamilyGraph::seed_family();
		let json = serde_json::to_string(&graph).unwrap();
		assert!(json.contains("\"PARENT_OF\""));
		assert!(json.contains("\"SPOUSE_OF\""));
		assert!(json.contains("\"relationLabel\""));
		assert!(json.contains("\"isCloseFamily\""));

		let back: FamilyGraph = serde_json::from_str(&json).unwrap();
		assert_eq!(back, graph);
	}
}
