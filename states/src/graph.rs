use std::{
    collections::{BTreeMap, BTreeSet, VecDeque},
    fmt::{Debug, Formatter},
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TopologyError<T>
where
    T: Debug,
{
    #[error("Cycle detected in dependency graph, from {:?}", .0)]
    CycleDetected(DepRoute<T>),
    #[error("Duplicate edge detected in dependency graph, from {:?} to {:?}", .0.route[0], .0.route[1])]
    DuplicateEdge(DepRoute<T>),
}

pub struct DepRoute<T> {
    // first is the start node, last is the end node
    route: Vec<T>,
}

impl<T> DepRoute<T> {
    pub fn nodes(&self) -> &[T] {
        &self.route
    }
}

impl<T> Debug for DepRoute<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let Some((last, rest)) = self.route.split_last() else {
            return write!(f, "[]");
        };
        for item in rest {
            write!(f, "{item:?} -> ")?;
        }
        write!(f, "{last:?}")
    }
}

/// Dependency graph between states and computes; an edge `a -> b` means
/// `b` reads `a`.
#[derive(Debug)]
pub struct Graph<Node>
where
    Node: Debug + Copy + Ord,
{
    nodes: BTreeSet<Node>,
    routes: Vec<(Node, Node)>,
}

impl<Node> Default for Graph<Node>
where
    Node: Debug + Copy + Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<Node> Graph<Node>
where
    Node: Debug + Copy + Ord,
{
    pub fn new() -> Self {
        Self {
            nodes: BTreeSet::new(),
            routes: Vec::new(),
        }
    }

    pub fn add_node(&mut self, node: Node) {
        self.nodes.insert(node);
    }

    pub fn route_to(&mut self, from: Node, to: Node) {
        self.nodes.insert(from);
        self.nodes.insert(to);
        self.routes.push((from, to));
    }

    /// Kahn's algorithm; dependencies come before their dependents.
    pub fn topology_sort(&self) -> Result<Vec<Node>, TopologyError<Node>> {
        let mut in_degree: BTreeMap<Node, usize> =
            self.nodes.iter().map(|node| (*node, 0)).collect();
        let mut adjacency: BTreeMap<Node, BTreeSet<Node>> = BTreeMap::new();

        for &(from, to) in &self.routes {
            if !adjacency.entry(from).or_default().insert(to) {
                return Err(TopologyError::DuplicateEdge(DepRoute {
                    route: vec![from, to],
                }));
            }
            *in_degree.entry(to).or_default() += 1;
        }

        let mut ready: VecDeque<Node> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(node, _)| *node)
            .collect();
        let mut order = Vec::with_capacity(self.nodes.len());

        while let Some(node) = ready.pop_front() {
            order.push(node);
            for next in adjacency.get(&node).into_iter().flatten() {
                if let Some(degree) = in_degree.get_mut(next) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push_back(*next);
                    }
                }
            }
        }

        if order.len() == self.nodes.len() {
            return Ok(order);
        }

        let remaining: Vec<Node> = in_degree
            .into_iter()
            .filter(|(_, degree)| *degree > 0)
            .map(|(node, _)| node)
            .collect();
        let route = self.find_cycle(&remaining, &adjacency).unwrap_or_default();
        Err(TopologyError::CycleDetected(DepRoute { route }))
    }

    fn find_cycle(
        &self,
        nodes: &[Node],
        adjacency: &BTreeMap<Node, BTreeSet<Node>>,
    ) -> Option<Vec<Node>> {
        let neighbours = |node: Node| -> std::vec::IntoIter<Node> {
            adjacency
                .get(&node)
                .into_iter()
                .flatten()
                .copied()
                .filter(|n| nodes.contains(n))
                .collect::<Vec<_>>()
                .into_iter()
        };

        let mut visited = BTreeSet::new();
        let mut path_set = BTreeSet::new();
        let mut path = Vec::new();
        let mut stack: Vec<(Node, std::vec::IntoIter<Node>)> = Vec::new();

        for &start in nodes {
            if visited.contains(&start) {
                continue;
            }

            stack.push((start, neighbours(start)));
            visited.insert(start);
            path_set.insert(start);
            path.push(start);

            while let Some((current, iter)) = stack.last_mut() {
                if let Some(next) = iter.next() {
                    if path_set.contains(&next) {
                        let pos = path.iter().position(|&x| x == next)?;
                        let mut cycle = path[pos..].to_vec();
                        cycle.push(next);
                        return Some(cycle);
                    }
                    if visited.insert(next) {
                        path_set.insert(next);
                        path.push(next);
                        stack.push((next, neighbours(next)));
                    }
                } else {
                    let done = *current;
                    stack.pop();
                    path_set.remove(&done);
                    path.pop();
                }
            }
        }
        None
    }
}
