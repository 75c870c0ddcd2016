use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// Dense index of a node inside a [`GraphData`].
pub type NodeIdx = usize;

/// Which side of the bipartite graph a node belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
	Skill,
	Project,
}

impl fmt::Display for NodeKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			NodeKind::Skill => f.write_str("skill"),
			NodeKind::Project => f.write_str("project"),
		}
	}
}

/// Display metadata attached to a project key.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectInfo {
	pub name: String,
	pub impact: String,
	pub color: String,
}

impl ProjectInfo {
	pub fn new(name: impl Into<String>, impact: impl Into<String>, color: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			impact: impact.into(),
			color: color.into(),
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	pub key: String,
	pub kind: NodeKind,
	pub label: String,
	/// One-line impact summary, projects only.
	pub detail: Option<String>,
	pub color: Option<String>,
}

/// A skill → project relation, stored as node indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GraphLink {
	pub skill: NodeIdx,
	pub project: NodeIdx,
}

impl GraphLink {
	pub fn touches(&self, idx: NodeIdx) -> bool {
		self.skill == idx || self.project == idx
	}
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
	#[error("skill `{skill}` references unknown project `{project}`")]
	UnknownProject { skill: String, project: String },
	#[error("project `{0}` is listed more than once in the project table")]
	DuplicateProject(String),
	#[error("empty {0} identifier")]
	EmptyKey(NodeKind),
}

/// Static bipartite skills/projects graph. Immutable once built.
#[derive(Clone, Debug, Default)]
pub struct GraphData {
	nodes: Vec<GraphNode>,
	links: Vec<GraphLink>,
	adjacency: Vec<Vec<NodeIdx>>,
	index: HashMap<(NodeKind, String), NodeIdx>,
}

impl GraphData {
	/// Builds the graph from a skill → projects relation and the project metadata table.
	///
	/// Skills come first in relation order, followed by every project of the table in
	/// table order. Fails if a skill points at a project missing from the table.
	pub fn new<'a, R, P, I>(relation: R, projects: P) -> Result<Self, GraphError>
	where
		R: IntoIterator<Item = (&'a str, I)>,
		I: IntoIterator<Item = &'a str>,
		P: IntoIterator<Item = (&'a str, ProjectInfo)>,
	{
		let mut data = GraphData::default();
		let mut pending = Vec::new();

		for (skill, targets) in relation {
			if skill.is_empty() {
				return Err(GraphError::EmptyKey(NodeKind::Skill));
			}
			let idx = match data.find(NodeKind::Skill, skill) {
				Some(idx) => idx,
				None => data.push(GraphNode {
					key: skill.to_owned(),
					kind: NodeKind::Skill,
					label: skill.to_owned(),
					detail: None,
					color: None,
				}),
			};
			pending.extend(targets.into_iter().map(|project| (idx, project)));
		}

		for (key, info) in projects {
			if key.is_empty() {
				return Err(GraphError::EmptyKey(NodeKind::Project));
			}
			if data.find(NodeKind::Project, key).is_some() {
				return Err(GraphError::DuplicateProject(key.to_owned()));
			}
			data.push(GraphNode {
				key: key.to_owned(),
				kind: NodeKind::Project,
				label: info.name,
				detail: Some(info.impact),
				color: Some(info.color),
			});
		}

		for (skill, project) in pending {
			let Some(target) = data.find(NodeKind::Project, project) else {
				return Err(GraphError::UnknownProject {
					skill: data.nodes[skill].key.clone(),
					project: project.to_owned(),
				});
			};
			let link = GraphLink {
				skill,
				project: target,
			};
			if data.links.contains(&link) {
				continue;
			}
			data.links.push(link);
			data.adjacency[skill].push(target);
			data.adjacency[target].push(skill);
		}

		Ok(data)
	}

	fn push(&mut self, node: GraphNode) -> NodeIdx {
		let idx = self.nodes.len();
		self.index.insert((node.kind, node.key.clone()), idx);
		self.nodes.push(node);
		self.adjacency.push(Vec::new());
		idx
	}

	pub fn nodes(&self) -> &[GraphNode] {
		&self.nodes
	}

	pub fn links(&self) -> &[GraphLink] {
		&self.links
	}

	pub fn node(&self, idx: NodeIdx) -> Option<&GraphNode> {
		self.nodes.get(idx)
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn find(&self, kind: NodeKind, key: &str) -> Option<NodeIdx> {
		self.index.get(&(kind, key.to_owned())).copied()
	}

	/// Nodes sharing a link with `idx`. Always of the opposite kind.
	pub fn neighbors(&self, idx: NodeIdx) -> &[NodeIdx] {
		self.adjacency.get(idx).map(Vec::as_slice).unwrap_or(&[])
	}

	pub fn skill_count(&self) -> usize {
		self.count(NodeKind::Skill)
	}

	pub fn project_count(&self) -> usize {
		self.count(NodeKind::Project)
	}

	fn count(&self, kind: NodeKind) -> usize {
		self.nodes.iter().filter(|n| n.kind == kind).count()
	}

	pub fn skills_for_project(&self, key: &str) -> Vec<&GraphNode> {
		self.related(NodeKind::Project, key)
	}

	pub fn projects_for_skill(&self, key: &str) -> Vec<&GraphNode> {
		self.related(NodeKind::Skill, key)
	}

	fn related(&self, kind: NodeKind, key: &str) -> Vec<&GraphNode> {
		self.find(kind, key)
			.map(|idx| {
				self.neighbors(idx)
					.iter()
					.map(|&n| &self.nodes[n])
					.collect()
			})
			.unwrap_or_default()
	}
}
