//! Layered layout for directed graphs.
//!
//! A small dagre-shaped engine: longest-path rank assignment, barycenter
//! ordering sweeps to reduce edge crossings, then rank-by-rank coordinate
//! assignment. Output is a center coordinate per node, deterministic for a
//! fixed input graph and configuration.

use std::collections::HashMap;

/// Primary flow direction of the layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
	LeftRight,
	TopBottom,
}

#[derive(Clone, Copy, Debug)]
pub struct LayeredConfig {
	/// Gap between adjacent nodes within a rank.
	pub node_sep: f64,
	/// Gap between adjacent ranks.
	pub rank_sep: f64,
}

impl Default for LayeredConfig {
	fn default() -> Self {
		Self {
			node_sep: 50.0,
			rank_sep: 100.0,
		}
	}
}

const ORDERING_SWEEPS: usize = 4;

/// Builder-style graph fed to the layout. Node order is insertion order and
/// acts as the tie-break everywhere, which keeps the result stable.
pub struct LayeredGraph {
	config: LayeredConfig,
	ids: Vec<String>,
	index: HashMap<String, usize>,
	sizes: Vec<(f64, f64)>,
	edges: Vec<(usize, usize)>,
}

impl LayeredGraph {
	pub fn new(config: LayeredConfig) -> Self {
		Self {
			config,
			ids: Vec::new(),
			index: HashMap::new(),
			sizes: Vec::new(),
			edges: Vec::new(),
		}
	}

	pub fn add_node(&mut self, id: &str, width: f64, height: f64) {
		if let Some(&i) = self.index.get(id) {
			self.sizes[i] = (width, height);
			return;
		}
		self.index.insert(id.to_owned(), self.ids.len());
		self.ids.push(id.to_owned());
		self.sizes.push((width, height));
	}

	/// Register a directed edge. Endpoints must have been added; unknown ids
	/// are ignored so the layout stays total.
	pub fn add_edge(&mut self, source: &str, target: &str) {
		if let (Some(&s), Some(&t)) = (self.index.get(source), self.index.get(target)) {
			if s != t {
				self.edges.push((s, t));
			}
		}
	}

	/// Compute center coordinates for every registered node.
	pub fn layout(&self, direction: Direction) -> HashMap<String, (f64, f64)> {
		let ranks = self.compute_ranks();
		let layers = self.order_layers(&ranks);
		self.assign_coordinates(&layers, direction)
	}

	/// Longest-path ranking. The sweep bound keeps cyclic input finite; the
	/// positions a cycle ends up with are unspecified but stable.
	fn compute_ranks(&self) -> Vec<usize> {
		let n = self.ids.len();
		let mut rank = vec![0usize; n];
		for _ in 0..n {
			let mut changed = false;
			for &(s, t) in &self.edges {
				if rank[t] < rank[s] + 1 {
					rank[t] = rank[s] + 1;
					changed = true;
				}
			}
			if !changed {
				break;
			}
		}
		rank
	}

	/// Group nodes by rank and run barycenter sweeps: each node is keyed by
	/// the mean in-layer position of its neighbors on the fixed side, then the
	/// layer is stably re-sorted.
	fn order_layers(&self, ranks: &[usize]) -> Vec<Vec<usize>> {
		let n = self.ids.len();
		let max_rank = ranks.iter().copied().max().unwrap_or(0);
		let mut layers: Vec<Vec<usize>> = vec![Vec::new(); max_rank + 1];
		for (node, &r) in ranks.iter().enumerate() {
			layers[r].push(node);
		}

		let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
		let mut succs: Vec<Vec<usize>> = vec![Vec::new(); n];
		for &(s, t) in &self.edges {
			preds[t].push(s);
			succs[s].push(t);
		}

		let mut pos = vec![0usize; n];
		for sweep in 0..ORDERING_SWEEPS {
			for layer in &layers {
				for (i, &node) in layer.iter().enumerate() {
					pos[node] = i;
				}
			}
			let downward = sweep % 2 == 0;
			let neighbors = if downward { &preds } else { &succs };
			for layer in layers.iter_mut() {
				let mut keyed: Vec<(f64, usize, usize)> = layer
					.iter()
					.enumerate()
					.map(|(i, &node)| {
						let adj = &neighbors[node];
						let key = if adj.is_empty() {
							i as f64
						} else {
							adj.iter().map(|&a| pos[a] as f64).sum::<f64>() / adj.len() as f64
						};
						(key, i, node)
					})
					.collect();
				keyed.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
				*layer = keyed.into_iter().map(|(_, _, node)| node).collect();
			}
		}
		layers
	}

	fn assign_coordinates(
		&self,
		layers: &[Vec<usize>],
		direction: Direction,
	) -> HashMap<String, (f64, f64)> {
		let horizontal = direction == Direction::LeftRight;
		let main_size = |node: usize| {
			let (w, h) = self.sizes[node];
			if horizontal { w } else { h }
		};
		let cross_size = |node: usize| {
			let (w, h) = self.sizes[node];
			if horizontal { h } else { w }
		};

		let mut out = HashMap::new();
		let mut main_cursor = 0.0;
		for layer in layers {
			if layer.is_empty() {
				continue;
			}
			let extent = layer.iter().map(|&n| main_size(n)).fold(0.0, f64::max);

			// Each rank is centered on the cross axis.
			let total: f64 = layer.iter().map(|&n| cross_size(n)).sum::<f64>()
				+ self.config.node_sep * (layer.len() - 1) as f64;
			let mut cross_cursor = -total / 2.0;

			for &node in layer {
				let main_center = main_cursor + extent / 2.0;
				let cross_center = cross_cursor + cross_size(node) / 2.0;
				let center = if horizontal {
					(main_center, cross_center)
				} else {
					(cross_center, main_center)
				};
				out.insert(self.ids[node].clone(), center);
				cross_cursor += cross_size(node) + self.config.node_sep;
			}
			main_cursor += extent + self.config.rank_sep;
		}
		out
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn graph(nodes: &[&str], edges: &[(&str, &str)]) -> LayeredGraph {
		let mut g = LayeredGraph::new(LayeredConfig::default());
		for id in nodes {
			g.add_node(id, 100.0, 40.0);
		}
		for (s, t) in edges {
			g.add_edge(s, t);
		}
		g
	}

	#[test]
	fn chain_flows_left_to_right() {
		let g = graph(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
		let pos = g.layout(Direction::LeftRight);
		assert!(pos["a"].0 < pos["b"].0);
		assert!(pos["b"].0 < pos["c"].0);
	}

	#[test]
	fn chain_flows_top_to_bottom() {
		let g = graph(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
		let pos = g.layout(Direction::TopBottom);
		assert!(pos["a"].1 < pos["b"].1);
		assert!(pos["b"].1 < pos["c"].1);
	}

	#[test]
	fn every_node_gets_a_finite_position() {
		let g = graph(
			&["a", "b", "c", "d", "lone"],
			&[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")],
		);
		let pos = g.layout(Direction::LeftRight);
		assert_eq!(pos.len(), 5);
		for (x, y) in pos.values() {
			assert!(x.is_finite() && y.is_finite());
		}
	}

	#[test]
	fn distinct_nodes_get_distinct_centers() {
		let g = graph(
			&["a", "b", "c", "d"],
			&[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")],
		);
		let pos = g.layout(Direction::LeftRight);
		let mut centers: Vec<_> = pos.values().collect();
		centers.sort_by(|a, b| a.partial_cmp(b).unwrap());
		centers.dedup();
		assert_eq!(centers.len(), 4);
	}

	#[test]
	fn siblings_share_a_rank() {
		let g = graph(&["root", "b", "c"], &[("root", "b"), ("root", "c")]);
		let pos = g.layout(Direction::LeftRight);
		assert_eq!(pos["b"].0, pos["c"].0);
		assert_ne!(pos["b"].1, pos["c"].1);
	}

	#[test]
	fn ordering_follows_parent_positions() {
		// c's parent sits below d's parent; the barycenter pass should swap
		// the children so the edges do not cross.
		let g = graph(
			&["a", "b", "c", "d"],
			&[("a", "d"), ("b", "c")],
		);
		let pos = g.layout(Direction::LeftRight);
		assert!(
			(pos["a"].1 < pos["b"].1) == (pos["d"].1 < pos["c"].1),
			"children should mirror parent order"
		);
	}

	#[test]
	fn layout_is_deterministic() {
		let build = || {
			graph(
				&["a", "b", "c", "d", "e"],
				&[("a", "b"), ("a", "c"), ("c", "d"), ("b", "d"), ("d", "e")],
			)
		};
		assert_eq!(
			build().layout(Direction::LeftRight),
			build().layout(Direction::LeftRight)
		);
	}

	#[test]
	fn cyclic_input_terminates() {
		let g = graph(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "a")]);
		let pos = g.layout(Direction::LeftRight);
		assert_eq!(pos.len(), 3);
		for (x, y) in pos.values() {
			assert!(x.is_finite() && y.is_finite());
		}
	}

	#[test]
	fn self_loops_and_unknown_endpoints_are_ignored() {
		let mut g = graph(&["a", "b"], &[]);
		g.add_edge("a", "a");
		g.add_edge("a", "ghost");
		g.add_edge("ghost", "b");
		let pos = g.layout(Direction::LeftRight);
		assert_eq!(pos.len(), 2);
	}
}
