//! Static portfolio data shared by the skills graph and the project pages.

use crate::components::skill_graph::{GraphData, GraphError, ProjectInfo};

/// Which projects each skill was used on.
pub const SKILL_PROJECTS: &[(&str, &[&str])] = &[
	("LangGraph", &["lululemon"]),
	("ChromaDB", &["lululemon"]),
	("Neo4j", &["lululemon"]),
	("OpenAI", &["lululemon", "meeting-prep", "support-assistant"]),
	("AWS Bedrock", &["lululemon"]),
	("LangSmith", &["lululemon"]),
	("TypeScript", &["lululemon"]),
	("Agents SDK", &["meeting-prep"]),
	("Pinecone", &["meeting-prep", "support-assistant"]),
	("GitHub Actions", &["meeting-prep"]),
	("Custom GPTs", &["support-assistant"]),
	("AWS", &["lululemon", "meeting-prep", "support-assistant"]),
	("LLaMA", &["product-analysis"]),
	("Snowflake Cortex", &["product-analysis"]),
	("SQL", &["product-analysis", "churn-prediction"]),
	("BigQuery", &["churn-prediction"]),
	("Spark", &["churn-prediction"]),
	("CI/CD", &["churn-prediction"]),
	("LSTM", &["sku-planning"]),
	("PyCaret", &["sku-planning"]),
	("Time Series", &["sku-planning"]),
	(
		"Python",
		&[
			"lululemon",
			"meeting-prep",
			"support-assistant",
			"product-analysis",
			"churn-prediction",
			"sku-planning",
		],
	),
];

/// `(key, name, impact, accent colour)`
pub const PROJECTS: &[(&str, &str, &str, &str)] = &[
	("lululemon", "Lululemon Automation", "60-70% cycle reduction", "#22c1c3"),
	("meeting-prep", "Meeting Prep Agent", "45-50min saved", "#60a5fa"),
	("support-assistant", "Support Assistant", "75% search reduction", "#34d399"),
	("product-analysis", "Product Analysis", "$135K revenue", "#f97316"),
	("churn-prediction", "Churn Prediction", "$150K retained", "#a78bfa"),
	("sku-planning", "SKU Planning", "$150K savings", "#fb923c"),
];

/// Builds the skills × projects graph from the tables above.
pub fn skill_graph() -> Result<GraphData, GraphError> {
	GraphData::new(
		SKILL_PROJECTS.iter().map(|&(skill, projects)| (skill, projects.iter().copied())),
		PROJECTS
			.iter()
			.map(|&(key, name, impact, color)| (key, ProjectInfo::new(name, impact, color))),
	)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::skill_graph::NodeKind;

	#[test]
	fn portfolio_tables_are_consistent() {
		let graph = skill_graph().expect("portfolio tables reference known projects");
		assert_eq!(graph.skill_count(), SKILL_PROJECTS.len());
		assert_eq!(graph.project_count(), PROJECTS.len());
		let pairs: usize = SKILL_PROJECTS.iter().map(|(_, p)| p.len()).sum();
		assert_eq!(graph.links().len(), pairs);
	}

	#[test]
	fn python_reaches_every_project() {
		let graph = skill_graph().unwrap();
		let python = graph.find(NodeKind::Skill, "Python").unwrap();
		assert_eq!(graph.neighbors(python).len(), PROJECTS.len());
	}
}
