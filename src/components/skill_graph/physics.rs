use std::f64::consts::TAU;

use super::types::{GraphData, NodeIdx, NodeKind};

/// Tuning knobs for [`LayoutEngine`].
#[derive(Clone, Debug)]
pub struct LayoutParams {
	pub width: f64,
	pub height: f64,
	/// Horizontal cluster centres as a fraction of the width.
	pub skill_column: f64,
	pub project_column: f64,
	pub center_gain: f64,
	pub vertical_gain: f64,
	pub repulsion_radius: f64,
	pub repulsion_strength: f64,
	/// Distances below this are treated as this value.
	pub min_distance: f64,
	pub anchor_gain: f64,
	pub link_distance: f64,
	pub link_gain: f64,
	pub damping: f64,
	pub margin: f64,
	/// Fraction of velocity kept (and reversed) when a node hits the margin.
	pub bounce: f64,
	pub warmup_ticks: usize,
	pub ring_spacing: f64,
}

impl Default for LayoutParams {
	fn default() -> Self {
		Self {
			width: 800.0,
			height: 600.0,
			skill_column: 0.3,
			project_column: 0.72,
			center_gain: 0.06,
			vertical_gain: 0.03,
			repulsion_radius: 130.0,
			repulsion_strength: 3.0,
			min_distance: 1.0,
			anchor_gain: 0.02,
			link_distance: 120.0,
			link_gain: 0.06,
			damping: 0.9,
			margin: 40.0,
			bounce: 0.5,
			warmup_ticks: 400,
			ring_spacing: 70.0,
		}
	}
}

const REST_SPEED: f64 = 0.01;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Body {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub anchor_x: f64,
	pub anchor_y: f64,
}

impl Body {
	fn at(x: f64, y: f64) -> Self {
		Self {
			x,
			y,
			anchor_x: x,
			anchor_y: y,
			..Self::default()
		}
	}

	pub fn anchor_distance(&self) -> f64 {
		(self.x - self.anchor_x).hypot(self.y - self.anchor_y)
	}
}

/// Fixed-step force layout over the nodes of a [`GraphData`].
#[derive(Clone, Debug)]
pub struct LayoutEngine {
	params: LayoutParams,
	bodies: Vec<Body>,
	kinds: Vec<NodeKind>,
	neighbors: Vec<Vec<NodeIdx>>,
	scratch: Vec<(f64, f64)>,
}

impl LayoutEngine {
	/// Seeds both clusters on rings, relaxes them into the anchor layout and
	/// puts every body back on its ring seed.
	pub fn new(data: &GraphData, params: LayoutParams) -> Self {
		let kinds: Vec<_> = data.nodes().iter().map(|n| n.kind).collect();
		let neighbors = (0..data.len()).map(|i| data.neighbors(i).to_vec()).collect();
		let mut engine = Self {
			bodies: Vec::with_capacity(kinds.len()),
			kinds,
			neighbors,
			scratch: Vec::new(),
			params,
		};

		let seeds = engine.ring_seeds();
		engine.bodies = seeds.iter().map(|&(x, y)| Body::at(x, y)).collect();
		for _ in 0..engine.params.warmup_ticks {
			engine.step(None, false);
		}
		for (body, &(x, y)) in engine.bodies.iter_mut().zip(&seeds) {
			body.anchor_x = body.x;
			body.anchor_y = body.y;
			body.x = x;
			body.y = y;
			body.vx = 0.0;
			body.vy = 0.0;
		}
		engine
	}

	fn cluster_center(&self, kind: NodeKind) -> (f64, f64) {
		let column = match kind {
			NodeKind::Skill => self.params.skill_column,
			NodeKind::Project => self.params.project_column,
		};
		(self.params.width * column, self.params.height / 2.0)
	}

	fn ring_seeds(&self) -> Vec<(f64, f64)> {
		let mut seeds = vec![(0.0, 0.0); self.kinds.len()];
		for kind in [NodeKind::Skill, NodeKind::Project] {
			let members: Vec<_> = (0..self.kinds.len()).filter(|&i| self.kinds[i] == kind).collect();
			let (cx, cy) = self.cluster_center(kind);
			let limit = (self.params.height / 2.0 - self.params.margin).max(0.0);
			let radius = (self.params.ring_spacing * members.len() as f64 / TAU).min(limit);
			for (slot, &i) in members.iter().enumerate() {
				let angle = slot as f64 * TAU / members.len() as f64;
				seeds[i] = (cx + radius * angle.cos(), cy + radius * angle.sin());
			}
		}
		seeds
	}

	pub fn params(&self) -> &LayoutParams {
		&self.params
	}

	pub fn bodies(&self) -> &[Body] {
		&self.bodies
	}

	pub fn contains(&self, idx: NodeIdx) -> bool {
		idx < self.bodies.len()
	}

	pub fn position(&self, idx: NodeIdx) -> Option<(f64, f64)> {
		self.bodies.get(idx).map(|b| (b.x, b.y))
	}

	/// Places a node directly, e.g. under the pointer during a drag.
	pub fn pin(&mut self, idx: NodeIdx, x: f64, y: f64) {
		if !x.is_finite() || !y.is_finite() {
			return;
		}
		if let Some(body) = self.bodies.get_mut(idx) {
			body.x = x;
			body.y = y;
			body.vx = 0.0;
			body.vy = 0.0;
		}
	}

	/// Sum of every node's distance from its anchor.
	pub fn anchor_displacement(&self) -> f64 {
		self.bodies.iter().map(Body::anchor_distance).sum()
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		if width <= 0.0 || height <= 0.0 {
			return;
		}
		let (sx, sy) = (width / self.params.width, height / self.params.height);
		for body in &mut self.bodies {
			body.anchor_x *= sx;
			body.anchor_y *= sy;
		}
		self.params.width = width;
		self.params.height = height;
	}

	/// Advances one frame. `dragged` is held where the pointer put it.
	/// Returns whether anything is still moving.
	pub fn tick(&mut self, dragged: Option<NodeIdx>) -> bool {
		self.step(dragged.filter(|&i| self.contains(i)), true)
	}

	fn step(&mut self, dragged: Option<NodeIdx>, anchored: bool) -> bool {
		let p = &self.params;
		let count = self.bodies.len();
		self.scratch.clear();
		self.scratch.resize(count, (0.0, 0.0));
		let follows = |i: NodeIdx| dragged.is_some_and(|d| self.neighbors[d].contains(&i));

		for i in 0..count {
			if Some(i) == dragged {
				continue;
			}
			let body = &self.bodies[i];
			let (mut fx, mut fy) = (0.0, 0.0);

			let (cx, cy) = self.cluster_center(self.kinds[i]);
			fx += (cx - body.x) * p.center_gain;
			fy += (cy - body.y) * p.vertical_gain;

			for (j, other) in self.bodies.iter().enumerate() {
				if i == j {
					continue;
				}
				let (dx, dy) = (body.x - other.x, body.y - other.y);
				let dist = dx.hypot(dy);
				if dist >= p.repulsion_radius {
					continue;
				}
				let (ux, uy) = if dist < p.min_distance {
					separation(i, j)
				} else {
					(dx / dist, dy / dist)
				};
				let push = p.repulsion_strength * (1.0 - dist.max(p.min_distance) / p.repulsion_radius);
				fx += ux * push;
				fy += uy * push;
			}

			if anchored && !follows(i) {
				fx += (body.anchor_x - body.x) * p.anchor_gain;
				fy += (body.anchor_y - body.y) * p.anchor_gain;
			}

			if let Some(d) = dragged.filter(|_| follows(i)) {
				let center = &self.bodies[d];
				let (dx, dy) = (body.x - center.x, body.y - center.y);
				let dist = dx.hypot(dy);
				let (ux, uy) = if dist < p.min_distance {
					separation(i, d)
				} else {
					(dx / dist, dy / dist)
				};
				let pull = (p.link_distance - dist.max(p.min_distance)) * p.link_gain;
				fx += ux * pull;
				fy += uy * pull;
			}

			self.scratch[i] = (fx, fy);
		}

		let (min_x, max_x) = (p.margin, (p.width - p.margin).max(p.margin));
		let (min_y, max_y) = (p.margin, (p.height - p.margin).max(p.margin));
		let mut moving = false;
		for (i, body) in self.bodies.iter_mut().enumerate() {
			if Some(i) == dragged {
				continue;
			}
			let (fx, fy) = self.scratch[i];
			body.vx = (body.vx + fx) * p.damping;
			body.vy = (body.vy + fy) * p.damping;
			body.x += body.vx;
			body.y += body.vy;

			if body.x < min_x || body.x > max_x {
				body.x = body.x.clamp(min_x, max_x);
				body.vx *= -p.bounce;
			}
			if body.y < min_y || body.y > max_y {
				body.y = body.y.clamp(min_y, max_y);
				body.vy *= -p.bounce;
			}
			moving |= body.vx.hypot(body.vy) > REST_SPEED;
		}
		moving
	}
}

/// Deterministic unit vector for coincident nodes, opposite for the swapped pair.
fn separation(i: NodeIdx, j: NodeIdx) -> (f64, f64) {
	let (lo, hi) = (i.min(j) as f64, i.max(j) as f64);
	let angle = (lo * 0.618_034 + hi * 0.414_214) * TAU;
	let sign = if i < j { 1.0 } else { -1.0 };
	(sign * angle.cos(), sign * angle.sin())
}

#[cfg(test)]
mod tests {
	use super::super::types::tests::sample;
	use super::*;

	fn engine() -> LayoutEngine {
		LayoutEngine::new(&sample(), LayoutParams::default())
	}

	fn settled() -> LayoutEngine {
		let mut engine = engine();
		for _ in 0..600 {
			engine.tick(None);
		}
		engine
	}

	fn all_finite(engine: &LayoutEngine) -> bool {
		engine
			.bodies()
			.iter()
			.all(|b| b.x.is_finite() && b.y.is_finite() && b.vx.is_finite() && b.vy.is_finite())
	}

	#[test]
	fn clusters_are_split_by_kind() {
		let data = sample();
		let engine = LayoutEngine::new(&data, LayoutParams::default());
		let mean_anchor_x = |kind| {
			let xs: Vec<_> = data
				.nodes()
				.iter()
				.zip(engine.bodies())
				.filter(|(n, _)| n.kind == kind)
				.map(|(_, b)| b.anchor_x)
				.collect();
			xs.iter().sum::<f64>() / xs.len() as f64
		};
		assert!(mean_anchor_x(NodeKind::Skill) < 400.0);
		assert!(mean_anchor_x(NodeKind::Project) > 400.0);
	}

	#[test]
	fn settles_onto_anchors() {
		let engine = settled();
		assert!(engine.anchor_displacement() < 1.0);
		assert!(all_finite(&engine));
	}

	#[test]
	fn returns_to_anchors_after_perturbation() {
		let mut engine = settled();
		let rest = engine.anchor_displacement();
		for i in 0..engine.bodies().len() {
			let (x, y) = engine.position(i).unwrap();
			let angle = i as f64 * 1.7;
			engine.pin(i, x + 30.0 * angle.cos(), y + 30.0 * angle.sin());
		}
		let start = engine.anchor_displacement();
		assert!(start > rest + 50.0);

		let mut previous_peak = f64::INFINITY;
		for _ in 0..10 {
			let mut peak: f64 = 0.0;
			for _ in 0..40 {
				engine.tick(None);
				peak = peak.max(engine.anchor_displacement());
			}
			assert!(peak <= previous_peak + 1e-6, "{peak} > {previous_peak}");
			previous_peak = peak;
		}
		assert!(engine.anchor_displacement() < rest + 0.05 * (start - rest));
	}

	#[test]
	fn coincident_nodes_stay_finite() {
		let mut engine = settled();
		engine.pin(0, 300.0, 300.0);
		engine.pin(1, 300.0, 300.0);
		engine.tick(None);
		assert!(all_finite(&engine));
		assert_ne!(engine.position(0), engine.position(1));
	}

	#[test]
	fn dragged_node_is_not_moved_by_forces() {
		let mut engine = settled();
		engine.pin(0, 100.0, 500.0);
		for _ in 0..20 {
			engine.tick(Some(0));
		}
		assert_eq!(engine.position(0), Some((100.0, 500.0)));
	}

	#[test]
	fn neighbors_follow_a_drag() {
		let data = sample();
		let mut engine = settled();
		let rust = data.find(NodeKind::Skill, "Rust").unwrap();
		let site = data.find(NodeKind::Project, "site").unwrap();
		let before = engine.position(site).unwrap();
		engine.pin(rust, 100.0, 80.0);
		for _ in 0..60 {
			engine.tick(Some(rust));
		}
		let after = engine.position(site).unwrap();
		let dist = |(x, y): (f64, f64)| (x - 100.0).hypot(y - 80.0);
		assert!(dist(after) < dist(before));
	}

	#[test]
	fn margins_reflect_velocity() {
		let mut engine = settled();
		engine.pin(0, 790.0, 300.0);
		engine.bodies[0].vx = 80.0;
		engine.tick(None);
		let body = &engine.bodies()[0];
		assert!(body.x <= 760.0);
		assert!(body.vx < 0.0);
	}

	#[test]
	fn pin_ignores_non_finite_input() {
		let mut engine = settled();
		let before = engine.position(2);
		engine.pin(2, f64::NAN, 10.0);
		assert_eq!(engine.position(2), before);
		engine.pin(99, 1.0, 1.0);
	}

	#[test]
	fn resize_rescales_anchors() {
		let mut engine = settled();
		let anchor = engine.bodies()[0].anchor_x;
		engine.resize(1600.0, 600.0);
		assert!((engine.bodies()[0].anchor_x - anchor * 2.0).abs() < 1e-9);
		assert_eq!(engine.params().width, 1600.0);
	}
}
