//! Node arena and member list describing a plane frame.
//!
//! Nodes are stored densely in insertion order; the arena index of a node
//! decides its degrees of freedom (`3k`, `3k + 1`, `3k + 2`). Identifiers are
//! arbitrary integers supplied by the caller and mapped onto the arena.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::TopologyError;
use crate::geometry::Point;

/// Identifier of a node.
pub type NodeId = usize;

/// A frame joint.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Caller-supplied identifier.
    pub id: NodeId,
    /// Position in inches.
    pub position: Point,
}

/// A straight member joining two nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Member {
    /// First node.
    pub start: NodeId,
    /// Second node.
    pub end: NodeId,
}

impl Member {
    /// Create a member from `start` to `end`.
    #[must_use]
    pub const fn new(start: NodeId, end: NodeId) -> Self {
        Self { start, end }
    }
}

impl From<(NodeId, NodeId)> for Member {
    fn from((start, end): (NodeId, NodeId)) -> Self {
        Self::new(start, end)
    }
}

/// Node identifiers on each outer edge, sorted by ascending y then ascending x.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EdgeSets {
    /// Nodes at y = 0.
    pub bottom: Vec<NodeId>,
    /// Nodes at the largest y.
    pub top: Vec<NodeId>,
    /// Nodes at the smallest x.
    pub left: Vec<NodeId>,
    /// Nodes at the largest x.
    pub right: Vec<NodeId>,
}

/// A rectangular panel between two consecutive verticals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bay {
    /// Position of the bay counted from the left.
    pub index: usize,
    /// Lower left corner.
    pub bottom_left: NodeId,
    /// Lower right corner.
    pub bottom_right: NodeId,
    /// Upper left corner.
    pub top_left: NodeId,
    /// Upper right corner.
    pub top_right: NodeId,
}

/// Nodes and members of one candidate frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameTopology {
    /// Nodes in insertion order.
    nodes: Vec<Node>,
    /// Identifier to arena index.
    index: BTreeMap<NodeId, usize>,
    /// Members in insertion order.
    members: Vec<Member>,
}

impl FrameTopology {
    /// Build a frame with nodes only.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::DuplicateNode`] when an identifier repeats and
    /// [`TopologyError::DuplicateCoordinates`] when two nodes share a position.
    pub fn from_nodes(
        nodes: impl IntoIterator<Item = (NodeId, Point)>,
    ) -> Result<Self, TopologyError> {
        let mut topology = Self::default();
        for (id, position) in nodes {
            topology.add_node(id, position)?;
        }
        Ok(topology)
    }

    /// Build a frame and validate every member.
    ///
    /// # Errors
    ///
    /// Returns the node errors of [`FrameTopology::from_nodes`] and the member
    /// errors of [`FrameTopology::add_member`].
    ///
    /// # Examples
    /// ```
    /// use framecheck::{point, FrameTopology};
    ///
    /// let frame = FrameTopology::from_parts(
    ///     [(0, point(0.0, 0.0)), (1, point(0.0, 20.0))],
    ///     [(0, 1)],
    /// )
    /// .expect("valid frame");
    /// assert_eq!(frame.member_count(), 1);
    /// assert!(FrameTopology::from_parts([(0, point(0.0, 0.0))], [(0, 7)]).is_err());
    /// ```
    pub fn from_parts(
        nodes: impl IntoIterator<Item = (NodeId, Point)>,
        members: impl IntoIterator<Item = (NodeId, NodeId)>,
    ) -> Result<Self, TopologyError> {
        let mut topology = Self::from_nodes(nodes)?;
        for (start, end) in members {
            topology.add_member(Member::new(start, end))?;
        }
        Ok(topology)
    }

    /// Build a frame, dropping members that reference missing nodes.
    ///
    /// The dropped members are returned alongside the frame.
    ///
    /// # Errors
    ///
    /// Node errors as in [`FrameTopology::from_nodes`] and
    /// [`TopologyError::ZeroLengthMember`].
    pub fn from_parts_lenient(
        nodes: impl IntoIterator<Item = (NodeId, Point)>,
        members: impl IntoIterator<Item = (NodeId, NodeId)>,
    ) -> Result<(Self, Vec<Member>), TopologyError> {
        let mut topology = Self::from_nodes(nodes)?;
        let mut dropped = Vec::new();
        for (start, end) in members {
            match topology.add_member(Member::new(start, end)) {
                Ok(()) => {}
                Err(TopologyError::UnknownNode { missing, .. }) => {
                    warn!(start, end, missing, "dropping member with unknown node");
                    dropped.push(Member::new(start, end));
                }
                Err(other) => return Err(other),
            }
        }
        Ok((topology, dropped))
    }

    /// Generate a rectangular frame of `span` by `height` inches.
    ///
    /// Corners are nodes 0 `(0, 0)`, 1 `(span, 0)`, 2 `(0, height)` and
    /// 3 `(span, height)`. The remaining `target_nodes - 4` nodes, reduced to an
    /// odd count, are split evenly between the bottom and top edges so the
    /// layout is symmetric about the centreline. Verticals join matching
    /// bottom and top nodes; chords join consecutive nodes on each edge.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::InvalidDimensions`] for non-positive sizes.
    ///
    /// # Examples
    /// ```
    /// use framecheck::FrameTopology;
    ///
    /// let frame = FrameTopology::rectangular(138.0, 27.0, 10).expect("valid size");
    /// // 4 corners plus 2 nodes on each edge; 4 verticals and 3 + 3 chords.
    /// assert_eq!(frame.node_count(), 8);
    /// assert_eq!(frame.member_count(), 10);
    /// ```
    pub fn rectangular(span: f64, height: f64, target_nodes: usize) -> Result<Self, TopologyError> {
        if !(span.is_finite() && height.is_finite() && span > 0.0 && height > 0.0) {
            return Err(TopologyError::InvalidDimensions { span, height });
        }
        let mut nodes = vec![
            (0, Point::new(0.0, 0.0)),
            (1, Point::new(span, 0.0)),
            (2, Point::new(0.0, height)),
            (3, Point::new(span, height)),
        ];
        let mut remaining = target_nodes.saturating_sub(nodes.len());
        if remaining > 0 && remaining % 2 == 0 {
            remaining -= 1;
        }
        let per_edge = remaining / 2;
        let first = nodes.len();
        for k in 0..per_edge {
            #[allow(clippy::cast_precision_loss)]
            let x = span * (k + 1) as f64 / (per_edge + 1) as f64;
            nodes.push((first + k, Point::new(x, 0.0)));
            nodes.push((first + per_edge + k, Point::new(x, height)));
        }
        let mut topology = Self::from_nodes(nodes)?;

        let edges = topology.edges();
        let mut members: Vec<Member> = edges
            .bottom
            .iter()
            .zip(&edges.top)
            .map(|(&bottom, &top)| Member::new(bottom, top))
            .collect();
        for chord in [&edges.bottom, &edges.top] {
            members.extend(chord.windows(2).map(|pair| Member::new(pair[0], pair[1])));
        }
        for member in members {
            topology.add_member(member)?;
        }
        Ok(topology)
    }

    /// Insert a node.
    ///
    /// # Errors
    ///
    /// See [`FrameTopology::from_nodes`].
    pub fn add_node(&mut self, id: NodeId, position: Point) -> Result<(), TopologyError> {
        if self.index.contains_key(&id) {
            return Err(TopologyError::DuplicateNode(id));
        }
        if let Some(existing) = self.nodes.iter().find(|node| node.position == position) {
            return Err(TopologyError::DuplicateCoordinates {
                first: existing.id,
                second: id,
                x: position.x,
                y: position.y,
            });
        }
        self.index.insert(id, self.nodes.len());
        self.nodes.push(Node { id, position });
        Ok(())
    }

    /// Insert a member between two existing nodes.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::UnknownNode`] when an endpoint is missing and
    /// [`TopologyError::ZeroLengthMember`] when both endpoints coincide.
    pub fn add_member(&mut self, member: Member) -> Result<(), TopologyError> {
        let Member { start, end } = member;
        for id in [start, end] {
            if !self.index.contains_key(&id) {
                return Err(TopologyError::UnknownNode {
                    start,
                    end,
                    missing: id,
                });
            }
        }
        if start == end {
            return Err(TopologyError::ZeroLengthMember(start, end));
        }
        self.members.push(member);
        Ok(())
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of members.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Nodes in arena order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Members in insertion order.
    #[must_use]
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Arena index of a node.
    #[must_use]
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Position of a node.
    #[must_use]
    pub fn position(&self, id: NodeId) -> Option<Point> {
        self.index_of(id).map(|index| self.nodes[index].position)
    }

    /// Length of a member, when both endpoints exist.
    #[must_use]
    pub fn member_length(&self, member: &Member) -> Option<f64> {
        Some(self.position(member.start)?.distance_to(self.position(member.end)?))
    }

    /// Whether a member joins `a` and `b` in either direction.
    #[must_use]
    pub fn has_member(&self, a: NodeId, b: NodeId) -> bool {
        self.members
            .iter()
            .any(|m| (m.start == a && m.end == b) || (m.start == b && m.end == a))
    }

    /// Largest y coordinate, or `None` for an empty frame.
    #[must_use]
    pub fn max_y(&self) -> Option<f64> {
        self.nodes
            .iter()
            .map(|node| node.position.y)
            .reduce(f64::max)
    }

    /// Horizontal centre of the frame's bounding box.
    #[must_use]
    pub fn midpoint_x(&self) -> Option<f64> {
        let xs = self.nodes.iter().map(|node| node.position.x);
        let min = xs.clone().reduce(f64::min)?;
        let max = xs.reduce(f64::max)?;
        Some((min + max) / 2.0)
    }

    /// Classify nodes onto the four outer edges by coordinate equality.
    #[must_use]
    pub fn edges(&self) -> EdgeSets {
        let mut sorted: Vec<&Node> = self.nodes.iter().collect();
        sorted.sort_by(|a, b| {
            a.position
                .y
                .total_cmp(&b.position.y)
                .then(a.position.x.total_cmp(&b.position.x))
        });
        let Some(max_y) = self.max_y() else {
            return EdgeSets::default();
        };
        let min_x = sorted
            .iter()
            .map(|node| node.position.x)
            .fold(f64::INFINITY, f64::min);
        let max_x = sorted
            .iter()
            .map(|node| node.position.x)
            .fold(f64::NEG_INFINITY, f64::max);
        let select = |keep: &dyn Fn(Point) -> bool| -> Vec<NodeId> {
            sorted
                .iter()
                .filter(|node| keep(node.position))
                .map(|node| node.id)
                .collect()
        };
        EdgeSets {
            bottom: select(&|p: Point| p.y == 0.0),
            top: select(&|p: Point| p.y == max_y),
            left: select(&|p: Point| p.x == min_x),
            right: select(&|p: Point| p.x == max_x),
        }
    }

    /// Consecutive pairs of top-edge nodes ordered by x.
    #[must_use]
    pub fn top_edge_pairs(&self) -> Vec<(NodeId, NodeId)> {
        self.edges()
            .top
            .windows(2)
            .map(|pair| (pair[0], pair[1]))
            .collect()
    }

    /// Rectangular bays formed by consecutive bottom and top nodes.
    ///
    /// Bottom and top nodes are matched by their x order; a pair of columns
    /// only forms a bay when both verticals are plumb.
    #[must_use]
    pub fn bays(&self) -> Vec<Bay> {
        let edges = self.edges();
        let columns: Vec<(NodeId, NodeId)> = edges
            .bottom
            .iter()
            .copied()
            .zip(edges.top.iter().copied())
            .collect();
        columns
            .windows(2)
            .filter(|pair| {
                pair.iter().all(|&(bottom, top)| {
                    match (self.position(bottom), self.position(top)) {
                        (Some(b), Some(t)) => b.x == t.x,
                        _ => false,
                    }
                })
            })
            .enumerate()
            .map(|(index, pair)| Bay {
                index,
                bottom_left: pair[0].0,
                bottom_right: pair[1].0,
                top_left: pair[0].1,
                top_right: pair[1].1,
            })
            .collect()
    }

    /// Confirm every node sits on the perimeter of a `span` by `height`
    /// rectangle anchored at the origin.
    ///
    /// A node passes when it lies on a vertical side (`x` is 0 or `span`)
    /// within the height, or on a horizontal side (`y` is 0 or `height`)
    /// within the span.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::OutOfBounds`] for the first node off the
    /// perimeter.
    ///
    /// # Examples
    /// ```
    /// use framecheck::FrameTopology;
    ///
    /// let frame = FrameTopology::rectangular(90.0, 30.0, 10).expect("frame");
    /// assert!(frame.check_bounds(90.0, 30.0).is_ok());
    /// assert!(frame.check_bounds(60.0, 30.0).is_err());
    /// ```
    pub fn check_bounds(&self, span: f64, height: f64) -> Result<(), TopologyError> {
        let within = |value: f64, limit: f64| (0.0..=limit).contains(&value);
        let off_perimeter = self.nodes.iter().find(|node| {
            let Point { x, y } = node.position;
            let on_side = (x == 0.0 || x == span) && within(y, height);
            let on_chord = (y == 0.0 || y == height) && within(x, span);
            !(on_side || on_chord)
        });
        match off_perimeter {
            Some(node) => {
                warn!(
                    node = node.id,
                    x = node.position.x,
                    y = node.position.y,
                    "node off perimeter"
                );
                Err(TopologyError::OutOfBounds {
                    node: node.id,
                    x: node.position.x,
                    y: node.position.y,
                    span,
                    height,
                })
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::point;

    #[test]
    fn duplicate_nodes_are_rejected() {
        let error = FrameTopology::from_nodes([(0, point(0.0, 0.0)), (0, point(1.0, 0.0))])
            .expect_err("duplicate id rejected");
        assert_eq!(error, TopologyError::DuplicateNode(0));

        let error = FrameTopology::from_nodes([(0, point(1.0, 2.0)), (5, point(1.0, 2.0))])
            .expect_err("duplicate position rejected");
        assert!(matches!(
            error,
            TopologyError::DuplicateCoordinates {
                first: 0,
                second: 5,
                ..
            }
        ));
    }

    #[test]
    fn member_endpoints_are_validated() {
        let mut frame =
            FrameTopology::from_nodes([(0, point(0.0, 0.0)), (1, point(0.0, 10.0))]).expect("nodes");
        assert_eq!(
            frame.add_member(Member::new(0, 4)),
            Err(TopologyError::UnknownNode {
                start: 0,
                end: 4,
                missing: 4
            })
        );
        assert_eq!(
            frame.add_member(Member::new(1, 1)),
            Err(TopologyError::ZeroLengthMember(1, 1))
        );
        frame.add_member(Member::new(0, 1)).expect("valid member");
        assert_eq!(frame.member_length(&Member::new(0, 1)), Some(10.0));
    }

    #[test]
    fn lenient_build_drops_dangling_members() {
        let (frame, dropped) = FrameTopology::from_parts_lenient(
            [(0, point(0.0, 0.0)), (1, point(0.0, 10.0))],
            [(0, 1), (1, 9)],
        )
        .expect("frame builds");
        assert_eq!(frame.member_count(), 1);
        assert_eq!(dropped, vec![Member::new(1, 9)]);
    }

    #[test]
    fn rectangular_frame_is_symmetric() {
        let frame = FrameTopology::rectangular(100.0, 20.0, 12).expect("frame");
        // 12 - 4 = 8 is even, so 7 remain and 3 go to each edge.
        assert_eq!(frame.node_count(), 10);
        let edges = frame.edges();
        assert_eq!(edges.bottom, vec![0, 4, 5, 6, 1]);
        assert_eq!(edges.top, vec![2, 7, 8, 9, 3]);
        assert_eq!(edges.left, vec![0, 2]);
        assert_eq!(edges.right, vec![1, 3]);
        assert_eq!(frame.position(5), Some(point(50.0, 0.0)));
        assert_eq!(frame.midpoint_x(), Some(50.0));
        assert_eq!(frame.member_count(), 5 + 4 + 4);
        assert!(frame.has_member(8, 5));
    }

    #[test]
    fn small_targets_keep_only_corners() {
        for target in [0, 4, 5] {
            let frame = FrameTopology::rectangular(30.0, 10.0, target).expect("frame");
            assert_eq!(frame.node_count(), 4, "target {target}");
            assert_eq!(frame.member_count(), 4, "target {target}");
            assert_eq!(frame.bays().len(), 1);
        }
        assert!(FrameTopology::rectangular(0.0, 10.0, 8).is_err());
    }

    #[test]
    fn bays_follow_column_order() {
        let frame = FrameTopology::rectangular(90.0, 30.0, 10).expect("frame");
        let bays = frame.bays();
        assert_eq!(bays.len(), 3);
        assert_eq!(
            bays[0],
            Bay {
                index: 0,
                bottom_left: 0,
                bottom_right: 4,
                top_left: 2,
                top_right: 6
            }
        );
        assert_eq!(frame.top_edge_pairs(), vec![(2, 6), (6, 7), (7, 3)]);
    }

    #[test]
    fn nodes_must_lie_on_the_perimeter() {
        let mut frame = FrameTopology::rectangular(90.0, 30.0, 10).expect("frame");
        frame.check_bounds(90.0, 30.0).expect("generated frame is on the perimeter");

        frame.add_node(20, point(91.0, 15.0)).expect("new node");
        assert_eq!(
            frame.check_bounds(90.0, 30.0),
            Err(TopologyError::OutOfBounds {
                node: 20,
                x: 91.0,
                y: 15.0,
                span: 90.0,
                height: 30.0
            })
        );

        let interior = FrameTopology::from_nodes([(0, point(0.0, 0.0)), (1, point(45.0, 15.0))])
            .expect("nodes");
        assert!(matches!(
            interior.check_bounds(90.0, 30.0),
            Err(TopologyError::OutOfBounds { node: 1, .. })
        ));
        let above = FrameTopology::from_nodes([(0, point(0.0, 31.0))]).expect("nodes");
        assert!(above.check_bounds(90.0, 30.0).is_err());
    }
}
