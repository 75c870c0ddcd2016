use std::collections::BTreeSet;

use log::debug;

use super::physics::LayoutEngine;
use super::types::{GraphData, GraphLink, GraphNode, NodeIdx, NodeKind};

/// Pointer travel in screen pixels beyond which a press becomes a drag rather than a click.
pub const CLICK_THRESHOLD: f64 = 4.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Interaction {
	#[default]
	Idle,
	Hovering(NodeIdx),
	Dragging {
		node: NodeIdx,
		/// Pointer minus node position at press time.
		offset: (f64, f64),
	},
}

/// Emitted when a project node is clicked. The page shell does the routing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationIntent {
	pub project: String,
}

#[derive(Clone, Copy, Debug)]
struct Press {
	origin: (f64, f64),
	travel: f64,
}

impl Press {
	fn record(&mut self, (x, y): (f64, f64)) {
		self.travel = self.travel.max((x - self.origin.0).hypot(y - self.origin.1));
	}
}

/// Nodes drawn at full strength for the current interaction state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Highlight {
	pub focus: Option<NodeIdx>,
	pub active: BTreeSet<NodeIdx>,
}

impl Highlight {
	pub fn is_empty(&self) -> bool {
		self.focus.is_none()
	}

	pub fn is_focus(&self, idx: NodeIdx) -> bool {
		self.focus == Some(idx)
	}

	pub fn is_active(&self, idx: NodeIdx) -> bool {
		self.active.contains(&idx)
	}

	pub fn is_lit(&self, idx: NodeIdx) -> bool {
		self.is_focus(idx) || self.is_active(idx)
	}

	pub fn link_lit(&self, link: &GraphLink) -> bool {
		self.focus.is_some_and(|f| link.touches(f))
	}

	/// Active nodes of one kind, in graph order.
	pub fn active_of_kind<'a>(&self, kind: NodeKind, data: &'a GraphData) -> Vec<&'a GraphNode> {
		self.active
			.iter()
			.filter_map(|&i| data.node(i))
			.filter(|n| n.kind == kind)
			.collect()
	}
}

/// Turns pointer input into hover/drag state, node pinning and navigation intents.
#[derive(Clone, Debug)]
pub struct InteractionController {
	state: Interaction,
	press: Option<Press>,
	/// Screen pixels per graph unit.
	zoom: f64,
}

impl Default for InteractionController {
	fn default() -> Self {
		Self {
			state: Interaction::Idle,
			press: None,
			zoom: 1.0,
		}
	}
}

impl InteractionController {
	/// Pointer positions arrive in graph units; this converts press travel back to pixels.
	pub fn set_zoom(&mut self, zoom: f64) {
		if zoom.is_finite() && zoom > 0.0 {
			self.zoom = zoom;
		}
	}

	pub fn state(&self) -> Interaction {
		self.state
	}

	pub fn dragged(&self) -> Option<NodeIdx> {
		match self.state {
			Interaction::Dragging { node, .. } => Some(node),
			_ => None,
		}
	}

	pub fn hovered(&self) -> Option<NodeIdx> {
		match self.state {
			Interaction::Hovering(node) => Some(node),
			_ => None,
		}
	}

	/// Pointer entered `node`, or left every node when `None`. No effect mid-drag.
	pub fn hover(&mut self, node: Option<NodeIdx>) {
		if self.dragged().is_some() {
			return;
		}
		self.state = node.map_or(Interaction::Idle, Interaction::Hovering);
	}

	pub fn pointer_down(&mut self, node: NodeIdx, pointer: (f64, f64), engine: &LayoutEngine) {
		let Some((x, y)) = engine.position(node) else {
			self.reset();
			return;
		};
		debug!("drag start on node {node}");
		self.state = Interaction::Dragging {
			node,
			offset: (pointer.0 - x, pointer.1 - y),
		};
		self.press = Some(Press {
			origin: pointer,
			travel: 0.0,
		});
	}

	pub fn pointer_move(&mut self, pointer: (f64, f64), engine: &mut LayoutEngine) {
		let Interaction::Dragging { node, offset } = self.state else {
			return;
		};
		if !engine.contains(node) {
			self.reset();
			return;
		}
		if let Some(press) = self.press.as_mut() {
			press.record(pointer);
		}
		engine.pin(node, pointer.0 - offset.0, pointer.1 - offset.1);
	}

	/// Ends any drag. A press that stayed within [`CLICK_THRESHOLD`] pixels on a project
	/// node is a click and yields a [`NavigationIntent`].
	pub fn pointer_up(&mut self, pointer: (f64, f64), data: &GraphData) -> Option<NavigationIntent> {
		let node = self.dragged();
		let mut press = self.press.take();
		self.state = Interaction::Idle;
		let node = data.node(node?)?;

		let press = press.as_mut()?;
		press.record(pointer);
		if press.travel * self.zoom > CLICK_THRESHOLD {
			debug!("drag end on {} `{}`", node.kind, node.key);
			return None;
		}
		(node.kind == NodeKind::Project).then(|| NavigationIntent {
			project: node.key.clone(),
		})
	}

	/// Drops any hover or drag, e.g. when the view closes mid-gesture.
	pub fn cancel(&mut self) {
		self.reset();
	}

	fn reset(&mut self) {
		self.state = Interaction::Idle;
		self.press = None;
	}

	/// Focus node and its direct neighbours. Dragging takes priority over hover.
	pub fn highlight(&self, data: &GraphData) -> Highlight {
		let focus = match self.state {
			Interaction::Idle => None,
			Interaction::Hovering(node) | Interaction::Dragging { node, .. } => Some(node),
		};
		let Some(focus) = focus.filter(|&f| f < data.len()) else {
			return Highlight::default();
		};
		Highlight {
			focus: Some(focus),
			active: data.neighbors(focus).iter().copied().collect(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::super::physics::LayoutParams;
	use super::super::types::tests::sample;
	use super::*;

	fn setup() -> (GraphData, LayoutEngine, InteractionController) {
		let data = sample();
		let engine = LayoutEngine::new(&data, LayoutParams::default());
		(data, engine, InteractionController::default())
	}

	fn keys(nodes: Vec<&GraphNode>) -> Vec<&str> {
		nodes.iter().map(|n| n.key.as_str()).collect()
	}

	#[test]
	fn hover_lights_exactly_the_linked_projects() {
		let (data, _, mut ctl) = setup();
		let rust = data.find(NodeKind::Skill, "Rust").unwrap();
		ctl.hover(Some(rust));
		assert_eq!(ctl.state(), Interaction::Hovering(rust));

		let lit = ctl.highlight(&data);
		assert_eq!(keys(lit.active_of_kind(NodeKind::Project, &data)), ["engine", "site"]);
		assert!(lit.active_of_kind(NodeKind::Skill, &data).is_empty());

		ctl.hover(None);
		assert_eq!(ctl.state(), Interaction::Idle);
		assert!(ctl.highlight(&data).active.is_empty());
	}

	#[test]
	fn hovering_a_project_lights_its_skills() {
		let (data, _, mut ctl) = setup();
		let engine_project = data.find(NodeKind::Project, "engine").unwrap();
		ctl.hover(Some(engine_project));
		let lit = ctl.highlight(&data);
		assert_eq!(keys(lit.active_of_kind(NodeKind::Skill, &data)), ["Rust", "Python"]);
		let lit_links = data.links().iter().filter(|l| lit.link_lit(l)).count();
		assert_eq!(lit_links, 2);
	}

	#[test]
	fn hover_is_ignored_while_dragging() {
		let (data, engine, mut ctl) = setup();
		let site = data.find(NodeKind::Project, "site").unwrap();
		let sql = data.find(NodeKind::Skill, "SQL").unwrap();
		ctl.pointer_down(site, (100.0, 100.0), &engine);
		ctl.hover(Some(sql));
		assert_eq!(ctl.dragged(), Some(site));
		assert!(ctl.highlight(&data).is_focus(site));
	}

	#[test]
	fn drag_then_click() {
		let (data, mut engine, mut ctl) = setup();
		let site = data.find(NodeKind::Project, "site").unwrap();
		let (x0, y0) = engine.position(site).unwrap();
		let offset = (100.0 - x0, 100.0 - y0);

		ctl.pointer_down(site, (100.0, 100.0), &engine);
		ctl.pointer_move((150.0, 120.0), &mut engine);
		assert_eq!(ctl.pointer_up((150.0, 120.0), &data), None);
		assert_eq!(ctl.state(), Interaction::Idle);

		let (x, y) = engine.position(site).unwrap();
		assert!((x - (150.0 - offset.0)).abs() < 1e-9);
		assert!((y - (120.0 - offset.1)).abs() < 1e-9);

		ctl.pointer_down(site, (x, y), &engine);
		let intent = ctl.pointer_up((x, y), &data);
		assert_eq!(
			intent,
			Some(NavigationIntent {
				project: "site".into()
			})
		);
		assert_eq!(ctl.pointer_up((x, y), &data), None);
	}

	#[test]
	fn drag_returning_to_start_is_not_a_click() {
		let (data, mut engine, mut ctl) = setup();
		let site = data.find(NodeKind::Project, "site").unwrap();
		ctl.pointer_down(site, (100.0, 100.0), &engine);
		ctl.pointer_move((130.0, 100.0), &mut engine);
		ctl.pointer_move((100.0, 100.0), &mut engine);
		assert_eq!(ctl.pointer_up((100.0, 100.0), &data), None);
	}

	#[test]
	fn small_jitter_still_clicks() {
		let (data, mut engine, mut ctl) = setup();
		let site = data.find(NodeKind::Project, "site").unwrap();
		ctl.pointer_down(site, (100.0, 100.0), &engine);
		ctl.pointer_move((102.0, 101.0), &mut engine);
		assert!(ctl.pointer_up((102.0, 101.0), &data).is_some());
	}

	#[test]
	fn click_threshold_is_in_screen_pixels() {
		let (data, mut engine, mut ctl) = setup();
		let site = data.find(NodeKind::Project, "site").unwrap();

		// 3 graph units at 4x zoom is 12 pixels: a drag.
		ctl.set_zoom(4.0);
		ctl.pointer_down(site, (100.0, 100.0), &engine);
		ctl.pointer_move((103.0, 100.0), &mut engine);
		assert_eq!(ctl.pointer_up((103.0, 100.0), &data), None);

		// 8 graph units at quarter zoom is 2 pixels: still a click.
		ctl.set_zoom(0.25);
		ctl.pointer_down(site, (100.0, 100.0), &engine);
		ctl.pointer_move((108.0, 100.0), &mut engine);
		assert!(ctl.pointer_up((108.0, 100.0), &data).is_some());
	}

	#[test]
	fn clicking_a_skill_does_not_navigate() {
		let (data, engine, mut ctl) = setup();
		let rust = data.find(NodeKind::Skill, "Rust").unwrap();
		ctl.pointer_down(rust, (10.0, 10.0), &engine);
		assert_eq!(ctl.pointer_up((10.0, 10.0), &data), None);
		assert_eq!(ctl.state(), Interaction::Idle);
	}

	#[test]
	fn missing_node_falls_back_to_idle() {
		let (data, mut engine, mut ctl) = setup();
		ctl.pointer_down(42, (0.0, 0.0), &engine);
		assert_eq!(ctl.state(), Interaction::Idle);

		ctl.state = Interaction::Dragging {
			node: 42,
			offset: (0.0, 0.0),
		};
		ctl.pointer_move((5.0, 5.0), &mut engine);
		assert_eq!(ctl.state(), Interaction::Idle);
		assert_eq!(ctl.pointer_up((5.0, 5.0), &data), None);
	}

	#[test]
	fn cancel_ends_a_drag() {
		let (data, engine, mut ctl) = setup();
		ctl.pointer_down(0, (1.0, 1.0), &engine);
		ctl.cancel();
		assert_eq!(ctl.state(), Interaction::Idle);
		assert!(ctl.highlight(&data).is_empty());
	}
}
