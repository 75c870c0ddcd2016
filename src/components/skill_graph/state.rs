use log::info;

use super::interaction::{Highlight, InteractionController, NavigationIntent};
use super::physics::{LayoutEngine, LayoutParams};
use super::types::{GraphData, GraphNode, NodeIdx, NodeKind};

pub const SKILL_HEIGHT: f64 = 24.0;
pub const PROJECT_HEIGHT: f64 = 40.0;
const CHAR_WIDTH: f64 = 7.0;

/// Half width and half height of a node's box in graph units.
pub fn node_half_extent(node: &GraphNode) -> (f64, f64) {
	match node.kind {
		NodeKind::Skill => {
			let text = node.label.chars().count() as f64 * CHAR_WIDTH;
			(text / 2.0 + 12.0, SKILL_HEIGHT / 2.0)
		}
		NodeKind::Project => {
			let longest = node
				.label
				.chars()
				.count()
				.max(node.detail.as_deref().map_or(0, |d| d.chars().count()));
			((longest as f64 * CHAR_WIDTH) / 2.0 + 14.0, PROJECT_HEIGHT / 2.0)
		}
	}
}

#[derive(Clone, Debug)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Everything one open graph view mutates: layout, pointer state and camera.
pub struct SkillGraphState {
	pub data: GraphData,
	pub engine: LayoutEngine,
	pub controller: InteractionController,
	pub transform: ViewTransform,
	pub pan: PanState,
	pub width: f64,
	pub height: f64,
	/// Fade-in progress of the current highlight, 0..=1.
	pub highlight_t: f64,
	pub settled: bool,
}

impl SkillGraphState {
	pub fn new(data: GraphData, width: f64, height: f64) -> Self {
		let engine = LayoutEngine::new(
			&data,
			LayoutParams {
				width,
				height,
				..LayoutParams::default()
			},
		);
		info!(
			"skill graph opened: {} skills, {} projects, {} links",
			data.skill_count(),
			data.project_count(),
			data.links().len()
		);
		Self {
			data,
			engine,
			controller: InteractionController::default(),
			transform: ViewTransform::default(),
			pan: PanState::default(),
			width,
			height,
			highlight_t: 0.0,
			settled: false,
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost node under a screen point. Projects are drawn over skills.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<NodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let hits = |kind: NodeKind| {
			self.data
				.nodes()
				.iter()
				.zip(self.engine.bodies())
				.enumerate()
				.filter(move |(_, (node, _))| node.kind == kind)
				.filter(|(_, (node, body))| {
					let (hw, hh) = node_half_extent(node);
					(body.x - gx).abs() <= hw && (body.y - gy).abs() <= hh
				})
				.map(|(idx, _)| idx)
				.last()
		};
		hits(NodeKind::Project).or_else(|| hits(NodeKind::Skill))
	}

	pub fn highlight(&self) -> Highlight {
		self.controller.highlight(&self.data)
	}

	pub fn is_dragging(&self) -> bool {
		self.controller.dragged().is_some()
	}

	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		if let Some(idx) = self.node_at_position(sx, sy) {
			let pointer = self.screen_to_graph(sx, sy);
			self.controller.pointer_down(idx, pointer, &self.engine);
		} else {
			self.pan.active = true;
			self.pan.start_x = sx;
			self.pan.start_y = sy;
			self.pan.transform_start_x = self.transform.x;
			self.pan.transform_start_y = self.transform.y;
		}
	}

	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		if self.is_dragging() {
			let pointer = self.screen_to_graph(sx, sy);
			self.controller.pointer_move(pointer, &mut self.engine);
			self.settled = false;
		} else if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (sx - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (sy - self.pan.start_y);
		} else {
			let hovered = self.node_at_position(sx, sy);
			if hovered != self.controller.hovered() {
				self.highlight_t = 0.0;
			}
			self.controller.hover(hovered);
		}
	}

	pub fn pointer_up(&mut self, sx: f64, sy: f64) -> Option<NavigationIntent> {
		self.pan.active = false;
		let pointer = self.screen_to_graph(sx, sy);
		let intent = self.controller.pointer_up(pointer, &self.data);
		self.controller.hover(self.node_at_position(sx, sy));
		intent
	}

	/// Pointer left the canvas. A drag or pan in progress survives until the
	/// button is released, wherever that happens.
	pub fn pointer_leave(&mut self) {
		self.controller.hover(None);
	}

	/// The view is closing; drops any gesture in progress.
	pub fn close(&mut self) {
		self.pan.active = false;
		self.controller.cancel();
		info!("skill graph closed");
	}

	/// Zooms around a screen point; positive `delta_y` zooms out.
	pub fn zoom(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.transform.k * factor).clamp(0.25, 4.0);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
		self.controller.set_zoom(new_k);
	}

	pub fn tick(&mut self, dt: f64) {
		self.settled = !self.engine.tick(self.controller.dragged());
		if self.highlight().is_empty() {
			self.highlight_t = 0.0;
		} else {
			self.highlight_t = (self.highlight_t + dt * 5.0).min(1.0);
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.engine.resize(width, height);
	}
}

#[cfg(test)]
mod tests {
	use super::super::types::tests::sample;
	use super::*;

	fn state() -> SkillGraphState {
		let mut s = SkillGraphState::new(sample(), 800.0, 600.0);
		for _ in 0..400 {
			s.tick(0.016);
		}
		assert!(s.settled);
		s
	}

	fn screen_pos(state: &SkillGraphState, kind: NodeKind, key: &str) -> (NodeIdx, f64, f64) {
		let idx = state.data.find(kind, key).unwrap();
		let (x, y) = state.engine.position(idx).unwrap();
		(
			idx,
			x * state.transform.k + state.transform.x,
			y * state.transform.k + state.transform.y,
		)
	}

	#[test]
	fn hit_testing_finds_nodes() {
		let s = state();
		let (idx, x, y) = screen_pos(&s, NodeKind::Project, "warehouse");
		assert_eq!(s.node_at_position(x, y), Some(idx));
		assert_eq!(s.node_at_position(-500.0, -500.0), None);
	}

	#[test]
	fn hover_then_leave_clears_highlight() {
		let mut s = state();
		let (idx, x, y) = screen_pos(&s, NodeKind::Skill, "SQL");
		s.pointer_move(x, y);
		assert!(s.highlight().is_focus(idx));
		s.tick(0.016);
		assert!(s.highlight_t > 0.0);

		s.pointer_move(-500.0, -500.0);
		assert!(s.highlight().is_empty());
		s.tick(0.016);
		assert_eq!(s.highlight_t, 0.0);
	}

	#[test]
	fn click_on_project_yields_intent() {
		let mut s = state();
		let (_, x, y) = screen_pos(&s, NodeKind::Project, "engine");
		s.pointer_down(x, y);
		let intent = s.pointer_up(x, y).unwrap();
		assert_eq!(intent.project, "engine");
	}

	#[test]
	fn dragging_moves_node_with_pointer() {
		let mut s = state();
		let (idx, x, y) = screen_pos(&s, NodeKind::Project, "engine");
		s.pointer_down(x, y);
		s.pointer_move(x + 60.0, y + 20.0);
		s.tick(0.016);
		let (nx, ny) = s.engine.position(idx).unwrap();
		let (ox, oy) = s.screen_to_graph(x + 60.0, y + 20.0);
		assert!((nx - ox).abs() < 1e-9 && (ny - oy).abs() < 1e-9);
		assert!(s.pointer_up(x + 60.0, y + 20.0).is_none());
		assert!(!s.is_dragging());
	}

	#[test]
	fn background_drag_pans() {
		let mut s = state();
		s.pointer_down(5.0, 5.0);
		s.pointer_move(25.0, 15.0);
		s.pointer_up(25.0, 15.0);
		assert_eq!((s.transform.x, s.transform.y), (20.0, 10.0));
	}

	#[test]
	fn drag_survives_leaving_the_canvas() {
		let mut s = state();
		let (_, x, y) = screen_pos(&s, NodeKind::Skill, "Rust");
		s.pointer_down(x, y);
		s.pointer_leave();
		assert!(s.is_dragging());
		assert!(s.pointer_up(-50.0, -50.0).is_none());
		assert!(!s.is_dragging());
	}

	#[test]
	fn leaving_clears_hover() {
		let mut s = state();
		let (idx, x, y) = screen_pos(&s, NodeKind::Skill, "SQL");
		s.pointer_move(x, y);
		assert!(s.highlight().is_focus(idx));
		s.pointer_leave();
		assert!(s.highlight().is_empty());
	}

	#[test]
	fn close_ends_a_drag() {
		let mut s = state();
		let (_, x, y) = screen_pos(&s, NodeKind::Project, "site");
		s.pointer_down(x, y);
		s.close();
		assert!(!s.is_dragging());
	}

	#[test]
	fn jittery_click_navigates_at_any_zoom() {
		for delta in [1.0, -1.0] {
			let mut s = state();
			for _ in 0..20 {
				s.zoom(400.0, 300.0, delta);
			}
			assert!(s.transform.k == 0.25 || s.transform.k == 4.0);
			let (_, x, y) = screen_pos(&s, NodeKind::Project, "engine");
			s.pointer_down(x, y);
			s.pointer_move(x + 2.0, y);
			let intent = s.pointer_up(x + 2.0, y);
			assert_eq!(intent.map(|i| i.project), Some("engine".to_owned()), "zoom {}", s.transform.k);
		}
	}

	#[test]
	fn zoom_keeps_point_under_cursor() {
		let mut s = state();
		let before = s.screen_to_graph(300.0, 200.0);
		s.zoom(300.0, 200.0, -1.0);
		let after = s.screen_to_graph(300.0, 200.0);
		assert!((before.0 - after.0).abs() < 1e-9 && (before.1 - after.1).abs() < 1e-9);
		assert!(s.transform.k > 1.0);
	}
}
